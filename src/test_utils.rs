//! # src/test_utils.rs
//!
//! Zentrale Hilfsfunktionen für alle Tests (intern und extern).

use lazy_static::lazy_static;
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::app_service::GiftCardService;
use crate::custody::account_book::{AccountBook, AccountBookSnapshot};
use crate::ledger::GiftCardLedger;
use crate::models::ledger_config::LedgerConfig;
use crate::models::party::PartyId;
use crate::models::snapshot::LedgerSnapshot;
use crate::services::clock::ManualClock;
use crate::services::crypto_utils::RedemptionCode;
use crate::storage::{Storage, StorageError};

/// Eine Struktur, die alle für Tests benötigten Parteien enthält.
#[allow(dead_code)]
pub struct TestActors {
    pub alice: PartyId,
    pub bob: PartyId,
    pub charlie: PartyId,
    pub david: PartyId,
    /// Eine Partei ohne Guthaben, die Codes errät oder fremde Karten zurückfordern will.
    pub hacker: PartyId,
}

lazy_static! {
    /// Initialisiert einmalig alle Akteure, sodass sie in allen Tests wiederverwendet werden können.
    pub static ref ACTORS: TestActors = TestActors {
        alice: PartyId::from("alice"),
        bob: PartyId::from("bob"),
        charlie: PartyId::from("charlie"),
        david: PartyId::from("david"),
        hacker: PartyId::from("hacker"),
    };
}

/// Das Startguthaben, das `setup_funded_ledger` Alice und Bob einzahlt.
pub const STARTING_BALANCE: Decimal = Decimal::TEN;

/// Ein fester Referenzzeitpunkt: 2024-01-01T00:00:00Z.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

/// Liest einen Betrag aus einem String, z.B. `amount("0.5")`.
pub fn amount(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

/// Ein deterministischer Einlöse-Code je Bezeichnung.
pub fn code(label: &str) -> RedemptionCode {
    RedemptionCode::new(format!("TEST-CODE-{}", label))
}

/// Ein leeres Buch mit Standardkonfiguration und leerem Kontenbuch.
pub fn setup_ledger() -> GiftCardLedger {
    setup_ledger_with_config(LedgerConfig::default())
}

pub fn setup_ledger_with_config(config: LedgerConfig) -> GiftCardLedger {
    GiftCardLedger::new(config, AccountBook::new()).unwrap()
}

/// Ein Buch, in dem Alice und Bob je `STARTING_BALANCE` eingezahlt haben.
pub fn setup_funded_ledger() -> GiftCardLedger {
    setup_funded_ledger_with_config(LedgerConfig::default())
}

pub fn setup_funded_ledger_with_config(config: LedgerConfig) -> GiftCardLedger {
    let ledger = setup_ledger_with_config(config);
    ledger.custody().deposit(&ACTORS.alice, STARTING_BALANCE).unwrap();
    ledger.custody().deposit(&ACTORS.bob, STARTING_BALANCE).unwrap();
    ledger
}

/// Ein Service auf `InMemoryStorage` mit einer bei `t0()` stehenden Uhr, in
/// dem Alice und Bob je `STARTING_BALANCE` eingezahlt haben.
pub fn setup_service() -> GiftCardService<InMemoryStorage, ManualClock> {
    setup_service_with_storage(InMemoryStorage::new(), LedgerConfig::default())
}

/// Wie `setup_service`, aber auf einem vom Test bereitgestellten Backend.
/// Ein Klon des Backends teilt sich den Schalter `fail_saves` mit dem Service.
pub fn setup_service_with_storage(
    storage: InMemoryStorage,
    config: LedgerConfig,
) -> GiftCardService<InMemoryStorage, ManualClock> {
    let mut service = GiftCardService::open(storage, ManualClock::new(t0()), config).unwrap();
    service.deposit(&ACTORS.alice, STARTING_BALANCE).unwrap();
    service.deposit(&ACTORS.bob, STARTING_BALANCE).unwrap();
    service
}

/// Ein Speicher-Backend im Arbeitsspeicher, dessen Schreibzugriffe gezielt
/// zum Scheitern gebracht werden können.
///
/// Der Schalter `fail_saves` wird geteilt, damit ein Test ihn auch umlegen
/// kann, nachdem das Backend an einen Service übergeben wurde.
#[derive(Clone, Default)]
pub struct InMemoryStorage {
    state: Option<(LedgerSnapshot, AccountBookSnapshot)>,
    pub fail_saves: Arc<AtomicBool>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Der zuletzt gespeicherte Zustand.
    pub fn saved_state(&self) -> Option<&(LedgerSnapshot, AccountBookSnapshot)> {
        self.state.as_ref()
    }
}

impl Storage for InMemoryStorage {
    fn state_exists(&self) -> bool {
        self.state.is_some()
    }

    fn load_state(&self) -> Result<(LedgerSnapshot, AccountBookSnapshot), StorageError> {
        self.state.clone().ok_or(StorageError::NotFound)
    }

    fn save_state(&mut self, ledger: &LedgerSnapshot, accounts: &AccountBookSnapshot) -> Result<(), StorageError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StorageError::Generic("simulated save failure".to_string()));
        }
        self.state = Some((ledger.clone(), accounts.clone()));
        Ok(())
    }
}
