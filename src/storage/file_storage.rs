//! # src/storage/file_storage.rs
//!
//! Eine Implementierung des `Storage`-Traits, die Buch und Kontenbuch
//! gemeinsam in einer JSON-Datei (`state.json`) im Dateisystem speichert.
//!
//! Beide Momentaufnahmen liegen in derselben Datei und werden mit einem
//! einzigen Umbenennen ersetzt. Auf der Platte existiert damit immer nur ein
//! vollständiger alter oder ein vollständiger neuer Zustand.

use super::{Storage, StorageError};
use crate::custody::account_book::AccountBookSnapshot;
use crate::models::snapshot::LedgerSnapshot;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::{debug, info};

const STATE_FILE_NAME: &str = "state.json";
const FORMAT_VERSION: u32 = 2;

/// Container mit Formatversion um den eigentlichen Inhalt.
#[derive(Serialize, Deserialize)]
struct StorageContainer<T> {
    format_version: u32,
    payload: T,
}

/// Der gespeicherte Gesamtzustand. Beide Felder sind Pflicht.
#[derive(Serialize, Deserialize)]
struct StoredState<L, A> {
    ledger: L,
    accounts: A,
}

/// Eine Implementierung des `Storage`-Traits, die Daten in Dateien speichert.
pub struct FileStorage {
    /// Der Pfad zum Verzeichnis, das die Dateien enthält.
    directory: PathBuf,
}

impl FileStorage {
    /// Erstellt eine neue `FileStorage`-Instanz für ein bestimmtes Verzeichnis.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStorage { directory: path.into() }
    }

    pub fn directory(&self) -> &std::path::Path {
        &self.directory
    }

    /// Der Pfad der Zustandsdatei.
    pub fn state_path(&self) -> PathBuf {
        self.directory.join(STATE_FILE_NAME)
    }
}

impl Storage for FileStorage {
    fn state_exists(&self) -> bool {
        self.state_path().exists()
    }

    fn load_state(&self) -> Result<(LedgerSnapshot, AccountBookSnapshot), StorageError> {
        let path = self.state_path();
        if !path.exists() {
            return Err(StorageError::NotFound);
        }

        let bytes = fs::read(&path)?;
        let container: StorageContainer<StoredState<LedgerSnapshot, AccountBookSnapshot>> =
            serde_json::from_slice(&bytes).map_err(|e| StorageError::InvalidFormat(e.to_string()))?;
        if container.format_version != FORMAT_VERSION {
            return Err(StorageError::InvalidFormat(format!(
                "Unsupported format version {} in {}",
                container.format_version,
                path.display()
            )));
        }

        let StoredState { ledger, accounts } = container.payload;
        debug!(directory = %self.directory.display(), records = ledger.records.len(), "state loaded");
        Ok((ledger, accounts))
    }

    fn save_state(&mut self, ledger: &LedgerSnapshot, accounts: &AccountBookSnapshot) -> Result<(), StorageError> {
        fs::create_dir_all(&self.directory)?;
        let path = self.state_path();

        let bytes = serde_json::to_vec_pretty(&StorageContainer {
            format_version: FORMAT_VERSION,
            payload: StoredState { ledger, accounts },
        })
        .map_err(|e| StorageError::Generic(e.to_string()))?;

        // Erst die temporäre Datei vollständig schreiben, dann atomar umbenennen.
        let tmp_path = self.directory.join(format!("{}.tmp", STATE_FILE_NAME));
        fs::write(&tmp_path, bytes)?;
        fs::rename(&tmp_path, &path)?;

        info!(directory = %self.directory.display(), records = ledger.records.len(), "state saved");
        Ok(())
    }
}
