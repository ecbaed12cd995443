//! # src/services/clock.rs
//!
//! Die Zeitquelle für den `GiftCardService`. Das Buch selbst liest nie eine
//! globale Uhr; es erhält `now` bei jedem Aufruf explizit. Die Fassade
//! bezieht diesen Wert aus einer injizierten `Clock`.

use chrono::{DateTime, Duration, Utc};
use std::sync::{Mutex, PoisonError};

/// Eine Quelle für den maßgeblichen Zeitpunkt eines Aufrufs.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Die Systemuhr.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Eine von Hand gestellte Uhr für deterministische Ablauf-Tests.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        ManualClock { now: Mutex::new(start) }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut guard = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *guard += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}
