//! # src/app_service/lifecycle.rs
//!
//! Öffnen des `GiftCardService` auf einem Speicher-Backend sowie das
//! gemeinsame Speichern und Wiederherstellen von Buch und Kontenbuch.

use super::GiftCardService;
use crate::custody::account_book::{AccountBook, AccountBookSnapshot};
use crate::error::GiftCardCoreError;
use crate::ledger::GiftCardLedger;
use crate::models::ledger_config::LedgerConfig;
use crate::models::snapshot::LedgerSnapshot;
use crate::services::clock::Clock;
use crate::storage::Storage;
use tracing::{info, warn};

impl<S: Storage, K: Clock> GiftCardService<S, K> {
    // --- Lebenszyklus-Management ---

    /// Öffnet den Service auf einem Speicher-Backend.
    ///
    /// Existiert bereits ein gespeichertes Buch, wird es geladen und dessen
    /// Konfiguration verwendet; `config` wird dann ignoriert. Andernfalls wird
    /// ein leeres Buch mit `config` angelegt und sofort gespeichert.
    ///
    /// # Errors
    /// Schlägt fehl, wenn der gespeicherte Zustand nicht lesbar ist, gegen die
    /// Invarianten des Buchs verstößt oder `config` ungültig ist.
    pub fn open(storage: S, clock: K, config: LedgerConfig) -> Result<Self, GiftCardCoreError> {
        if storage.state_exists() {
            let (ledger_snapshot, accounts_snapshot) = storage.load_state()?;
            if ledger_snapshot.config != config {
                warn!("stored ledger configuration differs from the requested one; keeping the stored one");
            }
            let ledger = restore(ledger_snapshot, accounts_snapshot)?;
            info!(records = ledger.len()?, "gift card ledger opened");
            return Ok(GiftCardService { ledger, storage, clock });
        }

        let ledger = GiftCardLedger::new(config, AccountBook::new())?;
        let mut service = GiftCardService { ledger, storage, clock };
        service.persist()?;
        info!("new gift card ledger created");
        Ok(service)
    }

    /// Gibt das Speicher-Backend frei, z.B. um es in einem Test erneut zu öffnen.
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Momentaufnahme von Buch und Kontenbuch als Sicherung vor einer Änderung.
    pub(super) fn backup(&self) -> Result<(LedgerSnapshot, AccountBookSnapshot), GiftCardCoreError> {
        Ok((self.ledger.snapshot()?, self.ledger.custody().snapshot()?))
    }

    /// Setzt den In-Memory-Zustand auf eine Sicherung zurück.
    pub(super) fn rollback(&mut self, backup: (LedgerSnapshot, AccountBookSnapshot)) -> Result<(), GiftCardCoreError> {
        let (ledger_snapshot, accounts_snapshot) = backup;
        self.ledger = restore(ledger_snapshot, accounts_snapshot)?;
        warn!("in-memory state rolled back to the last saved state");
        Ok(())
    }

    /// Speichert Buch und Kontenbuch gemeinsam.
    pub(super) fn persist(&mut self) -> Result<(), GiftCardCoreError> {
        let (ledger_snapshot, accounts_snapshot) = self.backup()?;
        self.storage.save_state(&ledger_snapshot, &accounts_snapshot)?;
        Ok(())
    }
}

fn restore(
    ledger_snapshot: LedgerSnapshot,
    accounts_snapshot: AccountBookSnapshot,
) -> Result<GiftCardLedger<AccountBook>, GiftCardCoreError> {
    GiftCardLedger::from_snapshot(ledger_snapshot, AccountBook::from_snapshot(accounts_snapshot))
}
