//! # src/custody/account_book.rs
//!
//! Eine In-Memory-Implementierung des `ValueCustody`-Traits, die Guthaben je
//! Partei in einer Tabelle führt.

use super::{CustodyError, ValueCustody};
use crate::models::party::PartyId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Die serialisierbare Momentaufnahme eines `AccountBook`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct AccountBookSnapshot {
    pub balances: BTreeMap<PartyId, Decimal>,
}

/// Ein einfaches Kontenbuch. Alle Buchungen laufen unter einer Sperre und
/// sind damit untereinander atomar.
#[derive(Debug, Default)]
pub struct AccountBook {
    balances: Mutex<HashMap<PartyId, Decimal>>,
}

impl AccountBook {
    pub fn new() -> Self {
        AccountBook::default()
    }

    pub fn from_snapshot(snapshot: AccountBookSnapshot) -> Self {
        AccountBook {
            balances: Mutex::new(snapshot.balances.into_iter().collect()),
        }
    }

    pub fn snapshot(&self) -> Result<AccountBookSnapshot, CustodyError> {
        let balances = self.lock()?;
        Ok(AccountBookSnapshot {
            balances: balances.iter().map(|(p, b)| (p.clone(), *b)).collect(),
        })
    }

    /// Zahlt externes Guthaben auf das Konto einer Partei ein.
    pub fn deposit(&self, party: &PartyId, amount: Decimal) -> Result<Decimal, CustodyError> {
        self.credit(party, amount)?;
        self.balance_of(party)
    }

    /// Die Summe aller Guthaben.
    pub fn total_balance(&self) -> Result<Decimal, CustodyError> {
        let balances = self.lock()?;
        balances
            .values()
            .try_fold(Decimal::ZERO, |acc, b| acc.checked_add(*b))
            .ok_or_else(|| CustodyError::Overflow(PartyId::from("*")))
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<PartyId, Decimal>>, CustodyError> {
        self.balances.lock().map_err(|_| CustodyError::LockPoisoned)
    }
}

fn ensure_positive(amount: Decimal) -> Result<(), CustodyError> {
    if amount <= Decimal::ZERO {
        Err(CustodyError::NonPositiveAmount(amount))
    } else {
        Ok(())
    }
}

impl ValueCustody for AccountBook {
    fn debit(&self, party: &PartyId, amount: Decimal) -> Result<(), CustodyError> {
        ensure_positive(amount)?;
        let mut balances = self.lock()?;
        let available = balances.get(party).copied().unwrap_or(Decimal::ZERO);
        if available < amount {
            return Err(CustodyError::InsufficientFunds {
                party: party.clone(),
                available,
                needed: amount,
            });
        }
        balances.insert(party.clone(), available - amount);
        debug!(party = %party, %amount, "debited");
        Ok(())
    }

    fn credit(&self, party: &PartyId, amount: Decimal) -> Result<(), CustodyError> {
        ensure_positive(amount)?;
        let mut balances = self.lock()?;
        let current = balances.get(party).copied().unwrap_or(Decimal::ZERO);
        let updated = current
            .checked_add(amount)
            .ok_or_else(|| CustodyError::Overflow(party.clone()))?;
        balances.insert(party.clone(), updated);
        debug!(party = %party, %amount, "credited");
        Ok(())
    }

    fn balance_of(&self, party: &PartyId) -> Result<Decimal, CustodyError> {
        Ok(self.lock()?.get(party).copied().unwrap_or(Decimal::ZERO))
    }
}
