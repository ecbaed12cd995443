//! # src/custody/mod.rs
//!
//! Definiert die Abstraktion für die Verwahrung von Werten. Das Buch belastet
//! beim Kauf den Käufer und schreibt bei der Einlösung dem Einlöser gut; wie
//! die Guthaben tatsächlich geführt werden, bleibt der Implementierung
//! überlassen.

use crate::models::party::PartyId;
use rust_decimal::Decimal;
use thiserror::Error;

pub mod account_book;

/// Ein Fehler-Typ für alle Verwahrungs-Operationen.
///
/// Jede fehlgeschlagene Operation lässt alle Guthaben unverändert.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CustodyError {
    #[error("Insufficient funds for '{party}': Available: {available}, Needed: {needed}")]
    InsufficientFunds {
        party: PartyId,
        available: Decimal,
        needed: Decimal,
    },

    #[error("Transfer amounts must be positive, found {0}.")]
    NonPositiveAmount(Decimal),

    #[error("Balance overflow for '{0}'.")]
    Overflow(PartyId),

    #[error("Custody state lock was poisoned by a panicking thread.")]
    LockPoisoned,
}

/// Die Schnittstelle zur Wertverwahrung.
///
/// `debit` und `credit` müssen atomar sein: Entweder wird der gesamte Betrag
/// gebucht, oder es ändert sich nichts.
pub trait ValueCustody: Send + Sync {
    /// Belastet das Guthaben einer Partei. Schlägt mit
    /// `CustodyError::InsufficientFunds` fehl, wenn es nicht ausreicht.
    fn debit(&self, party: &PartyId, amount: Decimal) -> Result<(), CustodyError>;

    /// Schreibt einer Partei einen Betrag gut.
    fn credit(&self, party: &PartyId, amount: Decimal) -> Result<(), CustodyError>;

    /// Das aktuelle Guthaben einer Partei. Unbekannte Parteien haben Guthaben null.
    fn balance_of(&self, party: &PartyId) -> Result<Decimal, CustodyError>;
}
