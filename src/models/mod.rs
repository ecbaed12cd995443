//! # src/models/mod.rs
//!
//! Die Datenstrukturen des Geschenkkarten-Buchs: Karten-Datensätze,
//! Quittungen, Ereignisse, Konfiguration und Snapshots.

pub mod event;
pub mod gift_card;
pub mod ledger_config;
pub mod party;
pub mod snapshot;
