//! # src/services/crypto_utils.rs
//!
//! Kryptographische Hilfsfunktionen des Buchs: das Hashen geheimer
//! Karten-Codes, das Capability-Token `RedemptionCode` und das Erzeugen
//! zufälliger Codes.

use crate::models::gift_card::{CodeHash, CODE_HASH_LEN};
use rand::rngs::OsRng;
use rand::Rng;
use sha3::{Digest, Keccak256};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Der Zeichenvorrat für erzeugte Codes. Ohne leicht verwechselbare Zeichen (0/O, 1/I).
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Die Standardlänge erzeugter Codes.
pub const DEFAULT_CODE_LENGTH: usize = 16;

/// Berechnet den Keccak-256-Hash eines Klartext-Codes über seine UTF-8-Bytes.
///
/// Derselbe Hash wird vom Aufrufer vor dem Kauf und vom Buch bei der
/// Einlösung berechnet; beim Kauf verlässt der Klartext den Aufrufer nie.
pub fn hash_code(code: &str) -> CodeHash {
    let mut hasher = Keccak256::new();
    hasher.update(code.as_bytes());
    let mut digest = [0u8; CODE_HASH_LEN];
    digest.copy_from_slice(&hasher.finalize());
    CodeHash::from_bytes(digest)
}

/// Der Klartext-Code einer Karte als Inhaber-Berechtigung.
///
/// Wer dieses Token besitzt, darf die zugehörige Karte einlösen, unabhängig
/// von seiner Identität. Der Inhalt wird beim Verlassen des
/// Gültigkeitsbereichs genullt und erscheint nie in `Debug`-Ausgaben.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct RedemptionCode(String);

impl RedemptionCode {
    pub fn new(code: impl Into<String>) -> Self {
        RedemptionCode(code.into())
    }

    /// Der Hash, unter dem die zugehörige Karte im Buch geführt wird.
    pub fn code_hash(&self) -> CodeHash {
        hash_code(&self.0)
    }

    /// Gibt den Klartext frei, z.B. um ihn einem Empfänger mitzuteilen.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RedemptionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RedemptionCode(***)")
    }
}

impl From<&str> for RedemptionCode {
    fn from(code: &str) -> Self {
        RedemptionCode::new(code)
    }
}

impl From<String> for RedemptionCode {
    fn from(code: String) -> Self {
        RedemptionCode::new(code)
    }
}

/// Erzeugt einen zufälligen Code aus dem Betriebssystem-Zufallsgenerator.
pub fn generate_redemption_code(length: usize) -> RedemptionCode {
    let code: String = (0..length)
        .map(|_| {
            let idx = OsRng.gen_range(0..CODE_ALPHABET.len());
            CODE_ALPHABET[idx] as char
        })
        .collect();
    RedemptionCode(code)
}
