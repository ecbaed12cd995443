//! # src/app_service/queries.rs
//!
//! Enthält alle reinen Lese-Operationen (Queries) des `GiftCardService`.

use super::GiftCardService;
use crate::custody::account_book::AccountBook;
use crate::custody::ValueCustody;
use crate::error::GiftCardCoreError;
use crate::ledger::GiftCardLedger;
use crate::models::gift_card::{CodeHash, GiftCardStatus};
use crate::models::party::PartyId;
use crate::services::clock::Clock;
use crate::storage::Storage;
use rust_decimal::Decimal;

impl<S: Storage, K: Clock> GiftCardService<S, K> {
    // --- Datenabfragen (Queries) ---

    pub fn ledger(&self) -> &GiftCardLedger<AccountBook> {
        &self.ledger
    }

    pub fn clock(&self) -> &K {
        &self.clock
    }

    pub fn balance(&self, party: &PartyId) -> Result<Decimal, GiftCardCoreError> {
        Ok(self.ledger.custody().balance_of(party)?)
    }

    /// Der Status einer Karte zum aktuellen Zeitpunkt der Uhr.
    ///
    /// # Errors
    /// `CodeNotFound`, wenn für den Hash keine Karte existiert.
    pub fn status(&self, code_hash: &CodeHash) -> Result<GiftCardStatus, GiftCardCoreError> {
        Ok(self.ledger.get_status(code_hash, self.clock.now())?)
    }

    /// Die Summe aller aktuell verwahrten Kartenbeträge.
    pub fn total_custodied(&self) -> Result<Decimal, GiftCardCoreError> {
        Ok(self.ledger.total_custodied()?)
    }
}
