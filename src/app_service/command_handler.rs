//! # src/app_service/command_handler.rs
//!
//! Enthält die zentralen, schreibenden Aktionen (Commands) des `GiftCardService`,
//! die den Zustand des Buchs verändern und persistieren.

use super::GiftCardService;
use crate::custody::account_book::AccountBook;
use crate::error::GiftCardCoreError;
use crate::ledger::GiftCardLedger;
use crate::models::gift_card::{CodeHash, Payout, Receipt, Reclaim};
use crate::models::party::PartyId;
use crate::services::clock::Clock;
use crate::services::crypto_utils::RedemptionCode;
use crate::storage::Storage;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{error, info};

impl<S: Storage, K: Clock> GiftCardService<S, K> {
    // --- Aktionen (Commands) ---

    /// Zahlt externes Guthaben auf das Konto einer Partei ein.
    ///
    /// # Returns
    /// Den neuen Kontostand der Partei.
    pub fn deposit(&mut self, party: &PartyId, amount: Decimal) -> Result<Decimal, GiftCardCoreError> {
        let balance = self.commit(|ledger, _| Ok(ledger.custody().deposit(party, amount)?))?;
        info!(party = %party, %amount, "deposit booked");
        Ok(balance)
    }

    /// Kauft eine Karte für einen bereits gehashten Code und speichert den neuen Zustand.
    ///
    /// # Errors
    /// Alle Ablehnungsgründe von [`GiftCardLedger::buy`] sowie Speicherfehler.
    pub fn buy(&mut self, code_hash: CodeHash, value: Decimal, buyer: &PartyId) -> Result<Receipt, GiftCardCoreError> {
        self.commit(|ledger, now| Ok(ledger.buy(code_hash, value, buyer, now)?))
    }

    /// Kauft eine Karte für einen Klartext-Code. Nur der Hash erreicht das Buch.
    pub fn buy_with_code(
        &mut self,
        code: &RedemptionCode,
        value: Decimal,
        buyer: &PartyId,
    ) -> Result<Receipt, GiftCardCoreError> {
        self.buy(code.code_hash(), value, buyer)
    }

    /// Löst eine Karte ein und schreibt den Betrag dem `redeemer` gut.
    pub fn redeem(&mut self, code: &RedemptionCode, redeemer: &PartyId) -> Result<Payout, GiftCardCoreError> {
        self.commit(|ledger, now| Ok(ledger.redeem(code, redeemer, now)?))
    }

    /// Bucht das Guthaben einer abgelaufenen Karte an ihren Käufer zurück.
    pub fn reclaim_expired(&mut self, code_hash: &CodeHash, claimant: &PartyId) -> Result<Reclaim, GiftCardCoreError> {
        self.commit(|ledger, now| Ok(ledger.reclaim_expired(code_hash, claimant, now)?))
    }

    /// TRANSAKTIONALER ANSATZ:
    /// 1. Sicherung des aktuellen Zustands anlegen.
    /// 2. Operation auf dem Buch ausführen; bei Ablehnung ist nichts verändert.
    /// 3. Speichern ("Commit"); schlägt das fehl, Sicherung zurückspielen.
    fn commit<T>(
        &mut self,
        operation: impl FnOnce(&GiftCardLedger<AccountBook>, DateTime<Utc>) -> Result<T, GiftCardCoreError>,
    ) -> Result<T, GiftCardCoreError> {
        let backup = self.backup()?;
        let now = self.clock.now();
        let result = operation(&self.ledger, now)?;

        if let Err(e) = self.persist() {
            error!(error = %e, "failed to persist gift card ledger");
            self.rollback(backup)?;
            return Err(e);
        }
        Ok(result)
    }
}
