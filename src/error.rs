//! # src/error.rs
//!
//! Definiert den zentralen Fehlertyp für die gesamte giftcard_core-Bibliothek.
//! Verwendet `thiserror` zur einfachen Erstellung von aussagekräftigen Fehlern
//! und zur automatischen Konvertierung von untergeordneten Fehlertypen.

use crate::custody::CustodyError;
use crate::ledger::LedgerError;
use crate::models::gift_card::CodeHashParseError;
use crate::models::ledger_config::ConfigError;
use crate::storage::StorageError;
use thiserror::Error;

/// Der zentrale Fehlertyp für alle Operationen in der `giftcard_core`-Bibliothek.
///
/// Dieser Enum fasst Fehler aus allen Modulen (Buch, Verwahrung, Speicher,
/// Konfiguration, Serialisierung) an einem Ort zusammen und bildet die
/// einheitliche Fehler-API der Bibliothek.
#[derive(Error, Debug)]
pub enum GiftCardCoreError {
    /// Ein vom Buch abgelehnter Kauf, eine abgelehnte Einlösung oder Abfrage.
    /// Kapselt den spezifischeren `LedgerError`-Typ.
    #[error("Ledger Error: {0}")]
    Ledger(#[from] LedgerError),

    /// Ein Fehler des Verwahrungs-Backends außerhalb einer Buch-Operation (z.B. bei Einzahlungen).
    #[error("Custody Error: {0}")]
    Custody(#[from] CustodyError),

    /// Ein Fehler, der während einer Speicheroperation (Laden, Speichern) aufgetreten ist.
    #[error("Storage Error: {0}")]
    Storage(#[from] StorageError),

    /// Eine ungültige Buch-Konfiguration.
    #[error("Configuration Error: {0}")]
    Config(#[from] ConfigError),

    /// Ein Code-Hash konnte nicht aus seiner Hex-Darstellung gelesen werden.
    #[error("Code Hash Error: {0}")]
    CodeHash(#[from] CodeHashParseError),

    /// Ein Fehler bei der Verarbeitung von JSON (Serialisierung oder Deserialisierung).
    #[error("JSON Processing Error: {0}")]
    Json(#[from] serde_json::Error),

    /// Ein Fehler bei der Deserialisierung von TOML (z.B. beim Laden einer Konfiguration).
    #[error("TOML Deserialization Error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Ein Fehler bei der Konvertierung von Beträgen.
    #[error("Amount Conversion Error: {0}")]
    AmountConversion(#[from] rust_decimal::Error),

    /// Ein Fehler bei I/O-Operationen.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
