//! # src/models/party.rs
//!
//! Definiert die Identität einer am Buch beteiligten Partei (Käufer, Einlöser).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Die öffentliche Kennung einer Partei.
///
/// Die Kennung ist rein informativ: Die Einlösung einer Karte ist an den
/// Besitz des Klartext-Codes gebunden, nicht an eine bestimmte `PartyId`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct PartyId(String);

impl PartyId {
    pub fn new(id: impl Into<String>) -> Self {
        PartyId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PartyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PartyId {
    fn from(id: &str) -> Self {
        PartyId(id.to_string())
    }
}

impl From<String> for PartyId {
    fn from(id: String) -> Self {
        PartyId(id)
    }
}
