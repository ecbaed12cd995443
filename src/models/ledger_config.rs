//! # src/models/ledger_config.rs
//!
//! Die Konfiguration eines Geschenkkarten-Buchs. Mindestbetrag und
//! Gültigkeitsdauer werden bei der Konstruktion festgelegt, damit Tests mit
//! verkürzten Zeitfenstern arbeiten können.
//!
//! Eine Konfiguration kann aus TOML geladen werden:
//!
//! ```toml
//! min_purchase_value = "0.001"
//! validity_period_secs = 2592000
//! amount_decimal_places = 18
//! ```

use crate::error::GiftCardCoreError;
use chrono::Duration;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Der Standard-Mindestbetrag eines Kaufs (0.001 Währungseinheiten).
pub const DEFAULT_MIN_PURCHASE_VALUE: Decimal = Decimal::from_parts(1, 0, 0, false, 3);
/// Die Standard-Gültigkeitsdauer: 30 Tage in Sekunden.
pub const DEFAULT_VALIDITY_PERIOD_SECS: i64 = 30 * 24 * 60 * 60;
/// Die Standard-Präzision: 18 Nachkommastellen, die kleinste Einheit der Basiswährung.
pub const DEFAULT_AMOUNT_DECIMAL_PLACES: u32 = 18;
/// Die maximale Skalierung, die `rust_decimal` darstellen kann.
pub const MAX_AMOUNT_DECIMAL_PLACES: u32 = 28;

/// Fehler bei der Validierung einer `LedgerConfig`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("The minimum purchase value must be positive, found {0}.")]
    NonPositiveMinimum(Decimal),

    #[error("The validity period must be positive, found {0} seconds.")]
    NonPositiveValidityPeriod(i64),

    #[error("The validity period of {0} seconds cannot be represented.")]
    ValidityPeriodOutOfRange(i64),

    #[error("At most {max} decimal places are supported, found {found}.")]
    TooManyDecimalPlaces { max: u32, found: u32 },

    #[error("The minimum purchase value {minimum} has more than the allowed {allowed} decimal places.")]
    MinimumPrecisionExceeded { minimum: Decimal, allowed: u32 },
}

/// Die Konstanten, unter denen ein Buch arbeitet.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LedgerConfig {
    /// Käufe unter diesem Betrag werden mit `BelowMinimumValue` abgelehnt.
    pub min_purchase_value: Decimal,
    /// Die Dauer nach dem Kauf, während der eine Einlösung möglich ist.
    pub validity_period_secs: i64,
    /// Die maximale Anzahl an Nachkommastellen eines Kaufbetrags.
    pub amount_decimal_places: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        LedgerConfig {
            min_purchase_value: DEFAULT_MIN_PURCHASE_VALUE,
            validity_period_secs: DEFAULT_VALIDITY_PERIOD_SECS,
            amount_decimal_places: DEFAULT_AMOUNT_DECIMAL_PLACES,
        }
    }
}

impl LedgerConfig {
    pub fn with_min_purchase_value(mut self, min_purchase_value: Decimal) -> Self {
        self.min_purchase_value = min_purchase_value;
        self
    }

    pub fn with_validity_period(mut self, validity_period: Duration) -> Self {
        self.validity_period_secs = validity_period.num_seconds();
        self
    }

    pub fn with_amount_decimal_places(mut self, places: u32) -> Self {
        self.amount_decimal_places = places;
        self
    }

    /// Die Gültigkeitsdauer als `chrono::Duration`.
    ///
    /// Nur für validierte Konfigurationen aussagekräftig; nicht darstellbare
    /// Werte werden auf die maximale Dauer begrenzt.
    pub fn validity_period(&self) -> Duration {
        Duration::try_seconds(self.validity_period_secs).unwrap_or(Duration::MAX)
    }

    /// Prüft die Konfiguration auf innere Konsistenz.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_purchase_value <= Decimal::ZERO {
            return Err(ConfigError::NonPositiveMinimum(self.min_purchase_value));
        }
        if self.validity_period_secs <= 0 {
            return Err(ConfigError::NonPositiveValidityPeriod(self.validity_period_secs));
        }
        if Duration::try_seconds(self.validity_period_secs).is_none() {
            return Err(ConfigError::ValidityPeriodOutOfRange(self.validity_period_secs));
        }
        if self.amount_decimal_places > MAX_AMOUNT_DECIMAL_PLACES {
            return Err(ConfigError::TooManyDecimalPlaces {
                max: MAX_AMOUNT_DECIMAL_PLACES,
                found: self.amount_decimal_places,
            });
        }
        if self.min_purchase_value.normalize().scale() > self.amount_decimal_places {
            return Err(ConfigError::MinimumPrecisionExceeded {
                minimum: self.min_purchase_value,
                allowed: self.amount_decimal_places,
            });
        }
        Ok(())
    }
}

/// Nimmt einen TOML-String entgegen, deserialisiert ihn in eine `LedgerConfig`
/// und validiert das Ergebnis. Fehlende Felder erhalten ihre Standardwerte.
pub fn load_ledger_config(toml_str: &str) -> Result<LedgerConfig, GiftCardCoreError> {
    let config: LedgerConfig = toml::from_str(toml_str)?;
    config.validate()?;
    Ok(config)
}
