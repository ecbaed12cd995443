//! # src/storage/mod.rs
//!
//! Definiert die Abstraktion für die persistente Speicherung eines Buchs.
//! Dies ermöglicht es, die Kernlogik von der konkreten Speichermethode zu entkoppeln.

use crate::custody::account_book::AccountBookSnapshot;
use crate::models::snapshot::LedgerSnapshot;
use thiserror::Error;

pub mod file_storage;

/// Ein generischer Fehler-Typ für alle Speicheroperationen.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Data not found for the given location.")]
    NotFound,

    #[error("Data is corrupted or has an invalid format: {0}")]
    InvalidFormat(String),

    #[error("Underlying I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("An unexpected error occurred: {0}")]
    Generic(String),
}

/// Die Schnittstelle für persistente Speicherung.
///
/// Buch und Kontenbuch werden immer gemeinsam gespeichert, damit ein
/// geladener Zustand nie eine Karte ohne die zugehörige Belastung enthält.
pub trait Storage {
    /// Prüft, ob am Speicherort bereits ein Buch existiert.
    fn state_exists(&self) -> bool;

    /// Lädt Buch und Kontenbuch.
    fn load_state(&self) -> Result<(LedgerSnapshot, AccountBookSnapshot), StorageError>;

    /// Speichert Buch und Kontenbuch als eine Einheit.
    fn save_state(&mut self, ledger: &LedgerSnapshot, accounts: &AccountBookSnapshot) -> Result<(), StorageError>;
}
