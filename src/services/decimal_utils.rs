// src/services/decimal_utils.rs

//! # decimal_utils.rs
//!
//! Enthält zentrale Hilfsfunktionen zur konsistenten Validierung, zum Parsen
//! und zur Formatierung von `Decimal`-Beträgen. Alle Beträge im Buch laufen
//! über diese Funktionen, damit Rundungs- und Vergleichsfehler ausgeschlossen
//! sind.

use crate::ledger::LedgerError;
use rust_decimal::Decimal;

/// **Prinzip: Strenge Validierung am Eingang.**
///
/// Stellt sicher, dass ein Betrag die erlaubte Anzahl an Nachkommastellen
/// nicht überschreitet. Nachgestellte Nullen zählen nicht (`0.0100` hat zwei
/// signifikante Nachkommastellen).
pub fn validate_precision(amount: &Decimal, allowed_places: u32) -> Result<(), LedgerError> {
    let found = amount.normalize().scale();
    if found > allowed_places {
        Err(LedgerError::AmountPrecisionExceeded {
            allowed: allowed_places,
            found,
        })
    } else {
        Ok(())
    }
}

/// Parst einen Betrag exakt aus einem String, ohne Rundung.
pub fn parse_amount(input: &str) -> Result<Decimal, rust_decimal::Error> {
    Decimal::from_str_exact(input.trim())
}

/// Formatiert einen Betrag ohne überflüssige Nullen (z.B. "0.0100" -> "0.01").
pub fn format_compact(amount: &Decimal) -> String {
    amount.normalize().to_string()
}

/// Summiert Beträge mit Überlaufprüfung.
pub fn checked_sum<'a>(amounts: impl IntoIterator<Item = &'a Decimal>) -> Option<Decimal> {
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, amount| acc.checked_add(*amount))
}
