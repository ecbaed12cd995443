//! # src/ledger/queries.rs
//!
//! Die lesenden Abfragen des `GiftCardLedger`. Keine dieser Funktionen
//! verändert den Zustand; jede schlägt mit `CodeNotFound` fehl, wenn für den
//! Hash kein Datensatz existiert.

use super::{GiftCardLedger, LedgerError};
use crate::custody::{CustodyError, ValueCustody};
use crate::models::event::LedgerEvent;
use crate::models::gift_card::{CodeHash, GiftCardRecord, GiftCardStatus};
use crate::models::party::PartyId;
use crate::services::decimal_utils::checked_sum;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

impl<C: ValueCustody> GiftCardLedger<C> {
    /// Eine Kopie des Datensatzes zu einem Hash.
    pub fn get_record(&self, code_hash: &CodeHash) -> Result<GiftCardRecord, LedgerError> {
        let records = self.read_records()?;
        let record = Self::lock_record(&records, code_hash)?;
        Ok(record.clone())
    }

    /// `false` bis einschließlich `purchase_time + validity_period`, danach `true`.
    pub fn is_expired(&self, code_hash: &CodeHash, now: DateTime<Utc>) -> Result<bool, LedgerError> {
        let record = self.get_record(code_hash)?;
        Ok(record.is_expired_at(now, self.validity_period()))
    }

    pub fn get_purchase_time(&self, code_hash: &CodeHash) -> Result<DateTime<Utc>, LedgerError> {
        Ok(self.get_record(code_hash)?.purchase_time)
    }

    pub fn get_expiration_time(&self, code_hash: &CodeHash) -> Result<DateTime<Utc>, LedgerError> {
        Ok(self.get_record(code_hash)?.expiration_time(self.validity_period()))
    }

    pub fn get_value(&self, code_hash: &CodeHash) -> Result<Decimal, LedgerError> {
        Ok(self.get_record(code_hash)?.value)
    }

    pub fn is_redeemed(&self, code_hash: &CodeHash) -> Result<bool, LedgerError> {
        Ok(self.get_record(code_hash)?.redeemed)
    }

    /// Fasst alle Eigenschaften einer Karte zum Zeitpunkt `now` zusammen.
    pub fn get_status(&self, code_hash: &CodeHash, now: DateTime<Utc>) -> Result<GiftCardStatus, LedgerError> {
        let record = self.get_record(code_hash)?;
        let period = self.validity_period();
        Ok(GiftCardStatus {
            code_hash: record.code_hash,
            value: record.value,
            buyer: record.buyer.clone(),
            purchase_time: record.purchase_time,
            expiration_time: record.expiration_time(period),
            redeemed: record.redeemed,
            reclaimed: record.reclaimed,
            expired: record.is_expired_at(now, period),
            state: record.state_at(now, period),
        })
    }

    /// Prüft ohne Fehler, ob ein Hash bereits vergeben ist.
    pub fn contains(&self, code_hash: &CodeHash) -> Result<bool, LedgerError> {
        Ok(self.read_records()?.contains_key(code_hash))
    }

    pub fn len(&self) -> Result<usize, LedgerError> {
        Ok(self.read_records()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, LedgerError> {
        Ok(self.len()? == 0)
    }

    /// Die Summe aller Beträge, die das Buch aktuell verwahrt: jede Karte, die
    /// weder eingelöst noch zurückgefordert wurde, abgelaufen oder nicht.
    pub fn total_custodied(&self) -> Result<Decimal, LedgerError> {
        let records = self.read_records()?;
        let mut live = Vec::with_capacity(records.len());
        for cell in records.values() {
            let record = cell.lock().map_err(|_| LedgerError::LockPoisoned)?;
            if record.is_in_custody() {
                live.push(record.value);
            }
        }
        checked_sum(&live).ok_or_else(|| LedgerError::Custody(CustodyError::Overflow(PartyId::from("ledger"))))
    }

    /// Das vollständige Ereignisprotokoll in der Reihenfolge des Auftretens.
    pub fn events(&self) -> Result<Vec<LedgerEvent>, LedgerError> {
        Ok(self.lock_events()?.clone())
    }

    /// Alle Ereignisse zu einem bestimmten Code.
    pub fn events_for(&self, code_hash: &CodeHash) -> Result<Vec<LedgerEvent>, LedgerError> {
        Ok(self
            .lock_events()?
            .iter()
            .filter(|e| e.code_hash() == code_hash)
            .cloned()
            .collect())
    }
}
