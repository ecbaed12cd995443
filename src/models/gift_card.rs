//! # src/models/gift_card.rs
//!
//! Definiert den Datensatz einer Geschenkkarte sowie die Ergebnis-Strukturen
//! der zustandsändernden Operationen (`Receipt`, `Payout`, `Reclaim`) und die
//! zusammenfassende Statusansicht einer Karte.

use crate::models::party::PartyId;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Die Länge eines Code-Hashes in Bytes (Keccak-256).
pub const CODE_HASH_LEN: usize = 32;

/// Der Fehler beim Parsen eines Code-Hashes aus seiner Hex-Darstellung.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodeHashParseError {
    #[error("Invalid hex encoding: {0}")]
    InvalidHex(String),

    #[error("Invalid code hash length: expected {expected} bytes, found {found}.")]
    InvalidLength { expected: usize, found: usize },
}

/// Der Hash eines geheimen Karten-Codes. Dient als Schlüssel im Buch, damit der
/// Klartext-Code vor der Einlösung niemals offengelegt werden muss.
///
/// Der Null-Hash ist ein reservierter Platzhalter ("kein Code") und
/// identifiziert niemals eine gültige Karte.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct CodeHash(#[serde(with = "hex::serde")] [u8; CODE_HASH_LEN]);

impl CodeHash {
    /// Der reservierte Null-Hash.
    pub const ZERO: CodeHash = CodeHash([0u8; CODE_HASH_LEN]);

    pub const fn from_bytes(bytes: [u8; CODE_HASH_LEN]) -> Self {
        CodeHash(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; CODE_HASH_LEN] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// Eine gekürzte Darstellung für Logs (`0x1234abcd…`).
    pub fn short(&self) -> String {
        format!("0x{}…", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for CodeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for CodeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CodeHash({})", self)
    }
}

impl FromStr for CodeHash {
    type Err = CodeHashParseError;

    /// Akzeptiert 64 Hex-Zeichen, optional mit `0x`-Präfix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let hex_part = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        let bytes = hex::decode(hex_part).map_err(|e| CodeHashParseError::InvalidHex(e.to_string()))?;
        let found = bytes.len();
        let array: [u8; CODE_HASH_LEN] = bytes.try_into().map_err(|_| CodeHashParseError::InvalidLength {
            expected: CODE_HASH_LEN,
            found,
        })?;
        Ok(CodeHash(array))
    }
}

/// Ein Eintrag im Buch, genau einer pro eindeutigem Code-Hash.
///
/// `value`, `purchase_time` und `buyer` werden bei der Erstellung festgelegt
/// und danach nie wieder verändert. `redeemed` und `reclaimed` wechseln
/// jeweils höchstens einmal von `false` auf `true`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GiftCardRecord {
    pub code_hash: CodeHash,
    /// Der verwahrte Betrag in Währungseinheiten.
    pub value: Decimal,
    pub purchase_time: DateTime<Utc>,
    /// Wird ausschließlich durch eine erfolgreiche Einlösung gesetzt.
    pub redeemed: bool,
    /// Wird ausschließlich durch eine Rückforderung des abgelaufenen Guthabens gesetzt.
    #[serde(default)]
    pub reclaimed: bool,
    pub buyer: PartyId,
}

impl GiftCardRecord {
    pub fn new(code_hash: CodeHash, value: Decimal, buyer: PartyId, purchase_time: DateTime<Utc>) -> Self {
        GiftCardRecord {
            code_hash,
            value,
            purchase_time,
            redeemed: false,
            reclaimed: false,
            buyer,
        }
    }

    /// Der Ablaufzeitpunkt ist eine reine Funktion aus Kaufzeitpunkt und Gültigkeitsdauer.
    pub fn expiration_time(&self, validity_period: Duration) -> DateTime<Utc> {
        self.purchase_time
            .checked_add_signed(validity_period)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Der exakte Ablaufzeitpunkt zählt noch zur Gültigkeit.
    pub fn is_expired_at(&self, now: DateTime<Utc>, validity_period: Duration) -> bool {
        now > self.expiration_time(validity_period)
    }

    /// `true`, solange der Betrag noch vom Buch verwahrt wird.
    pub fn is_in_custody(&self) -> bool {
        !self.redeemed && !self.reclaimed
    }

    pub fn state_at(&self, now: DateTime<Utc>, validity_period: Duration) -> GiftCardState {
        if self.redeemed {
            GiftCardState::Redeemed
        } else if self.reclaimed {
            GiftCardState::Reclaimed
        } else if self.is_expired_at(now, validity_period) {
            GiftCardState::Expired
        } else {
            GiftCardState::Active
        }
    }
}

/// Der abgeleitete Lebenszyklus-Zustand einer Karte zu einem bestimmten Zeitpunkt.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GiftCardState {
    /// Nicht eingelöst und innerhalb der Gültigkeitsdauer.
    Active,
    /// Eingelöst. Der Datensatz bleibt als Grabstein gegen Wiederholungen bestehen.
    Redeemed,
    /// Abgelaufen, aber noch nicht vom Käufer zurückgefordert.
    Expired,
    /// Abgelaufen und vom Käufer zurückgefordert.
    Reclaimed,
}

impl fmt::Display for GiftCardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GiftCardState::Active => "active",
            GiftCardState::Redeemed => "redeemed",
            GiftCardState::Expired => "expired",
            GiftCardState::Reclaimed => "reclaimed",
        };
        f.write_str(label)
    }
}

/// Die Quittung eines erfolgreichen Kaufs.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Receipt {
    pub code_hash: CodeHash,
    pub value: Decimal,
    pub buyer: PartyId,
    pub purchase_time: DateTime<Utc>,
    pub expiration_time: DateTime<Utc>,
}

/// Die Auszahlung einer erfolgreichen Einlösung.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Payout {
    pub code_hash: CodeHash,
    pub value: Decimal,
    pub redeemer: PartyId,
    pub redeemed_at: DateTime<Utc>,
}

/// Die Rückbuchung eines abgelaufenen, nicht eingelösten Guthabens an den Käufer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Reclaim {
    pub code_hash: CodeHash,
    pub value: Decimal,
    pub buyer: PartyId,
    pub reclaimed_at: DateTime<Utc>,
}

/// Eine zusammenfassende Ansicht einer Karte, wie sie eine Oberfläche zur
/// Statusprüfung benötigt.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GiftCardStatus {
    pub code_hash: CodeHash,
    pub value: Decimal,
    pub buyer: PartyId,
    pub purchase_time: DateTime<Utc>,
    pub expiration_time: DateTime<Utc>,
    pub redeemed: bool,
    pub reclaimed: bool,
    pub expired: bool,
    pub state: GiftCardState,
}
