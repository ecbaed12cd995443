//! tests/persistence/file_storage.rs
//!
//! Enthält Integrationstests für `FileStorage`: Speichern und Laden von Buch
//! und Kontenbuch, atomares Schreiben und der Umgang mit fehlenden oder
//! beschädigten Dateien.

use std::fs;
use tempfile::tempdir;
use giftcard_lib::test_utils::{code, setup_funded_ledger, t0, ACTORS};
use giftcard_lib::{AccountBook, FileStorage, GiftCardLedger, Storage, StorageError, ValueCustody};
use chrono::Duration;
use rust_decimal_macros::dec;

#[test]
fn test_save_and_load_round_trip() {
    let dir = tempdir().unwrap();
    let mut storage = FileStorage::new(dir.path());
    assert!(!storage.state_exists());

    let ledger = setup_funded_ledger();
    let c = code("persisted");
    ledger.buy(c.code_hash(), dec!(1.25), &ACTORS.alice, t0()).unwrap();
    ledger.redeem(&c, &ACTORS.charlie, t0() + Duration::hours(3)).unwrap();
    ledger.buy(code("open").code_hash(), dec!(2), &ACTORS.bob, t0()).unwrap();

    let ledger_snapshot = ledger.snapshot().unwrap();
    let accounts_snapshot = ledger.custody().snapshot().unwrap();
    storage.save_state(&ledger_snapshot, &accounts_snapshot).unwrap();
    assert!(storage.state_exists());

    let (loaded_ledger, loaded_accounts) = storage.load_state().unwrap();
    assert_eq!(loaded_ledger, ledger_snapshot);
    assert_eq!(loaded_accounts, accounts_snapshot);

    let restored = GiftCardLedger::from_snapshot(loaded_ledger, AccountBook::from_snapshot(loaded_accounts)).unwrap();
    assert!(restored.is_redeemed(&c.code_hash()).unwrap());
    assert_eq!(restored.get_purchase_time(&c.code_hash()).unwrap(), t0());
    assert_eq!(restored.custody().balance_of(&ACTORS.charlie).unwrap(), dec!(1.25));
    assert_eq!(restored.events().unwrap().len(), 3);
}

#[test]
fn test_save_leaves_no_temporary_files() {
    let dir = tempdir().unwrap();
    let mut storage = FileStorage::new(dir.path().join("nested").join("ledger"));

    let ledger = setup_funded_ledger();
    storage
        .save_state(&ledger.snapshot().unwrap(), &ledger.custody().snapshot().unwrap())
        .unwrap();

    let mut names: Vec<String> = fs::read_dir(storage.directory())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["state.json".to_string()]);
}

#[test]
fn test_load_from_empty_directory_is_not_found() {
    let dir = tempdir().unwrap();
    let storage = FileStorage::new(dir.path());
    assert!(matches!(storage.load_state(), Err(StorageError::NotFound)));
}

#[test]
fn test_state_without_accounts_is_rejected() {
    let dir = tempdir().unwrap();
    let mut storage = FileStorage::new(dir.path());
    let ledger = setup_funded_ledger();
    ledger.buy(code("orphan").code_hash(), dec!(2), &ACTORS.alice, t0()).unwrap();
    storage
        .save_state(&ledger.snapshot().unwrap(), &ledger.custody().snapshot().unwrap())
        .unwrap();

    // Ein Buch ohne Kontenbuch darf nicht als leere Guthaben geladen werden.
    let path = dir.path().join("state.json");
    let mut json: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    json["payload"].as_object_mut().unwrap().remove("accounts");
    fs::write(&path, serde_json::to_vec_pretty(&json).unwrap()).unwrap();

    assert!(storage.state_exists());
    assert!(matches!(storage.load_state(), Err(StorageError::InvalidFormat(_))));
}

#[test]
fn test_unfinished_write_keeps_last_committed_state() {
    let dir = tempdir().unwrap();
    let mut storage = FileStorage::new(dir.path());
    let ledger = setup_funded_ledger();
    let c = code("half-written");
    ledger.buy(c.code_hash(), dec!(4), &ACTORS.alice, t0()).unwrap();
    let committed_ledger = ledger.snapshot().unwrap();
    let committed_accounts = ledger.custody().snapshot().unwrap();
    storage.save_state(&committed_ledger, &committed_accounts).unwrap();

    // Absturz nach dem Schreiben der temporären Datei, vor dem Umbenennen.
    ledger.redeem(&c, &ACTORS.bob, t0() + Duration::hours(1)).unwrap();
    fs::write(dir.path().join("state.json.tmp"), b"{ \"format_version\": 2, \"payload\": { \"ledg").unwrap();

    let (loaded_ledger, loaded_accounts) = storage.load_state().unwrap();
    assert_eq!(loaded_ledger, committed_ledger);
    assert_eq!(loaded_accounts, committed_accounts);

    // Der nächste Speichervorgang ersetzt die liegengebliebene Datei.
    storage
        .save_state(&ledger.snapshot().unwrap(), &ledger.custody().snapshot().unwrap())
        .unwrap();
    assert!(!dir.path().join("state.json.tmp").exists());
    let (_, accounts) = storage.load_state().unwrap();
    let restored = AccountBook::from_snapshot(accounts);
    assert_eq!(restored.balance_of(&ACTORS.bob).unwrap(), dec!(14));
}

#[test]
fn test_corrupted_ledger_file_is_invalid_format() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("state.json"), b"{ not json").unwrap();

    let storage = FileStorage::new(dir.path());
    assert!(storage.state_exists());
    assert!(matches!(storage.load_state(), Err(StorageError::InvalidFormat(_))));
}

#[test]
fn test_unknown_format_version_is_rejected() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("state.json"),
        br#"{ "format_version": 99, "payload": { "ledger": {}, "accounts": {} } }"#,
    )
    .unwrap();

    let storage = FileStorage::new(dir.path());
    match storage.load_state() {
        Err(StorageError::InvalidFormat(msg)) => assert!(msg.contains("99")),
        other => panic!("expected InvalidFormat, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_stored_json_is_human_readable() {
    let dir = tempdir().unwrap();
    let mut storage = FileStorage::new(dir.path());
    let ledger = setup_funded_ledger();
    let c = code("readable");
    ledger.buy(c.code_hash(), dec!(0.5), &ACTORS.alice, t0()).unwrap();
    storage
        .save_state(&ledger.snapshot().unwrap(), &ledger.custody().snapshot().unwrap())
        .unwrap();

    let json = fs::read_to_string(dir.path().join("state.json")).unwrap();
    let hex_hash = c.code_hash().to_string();
    assert!(json.contains(hex_hash.trim_start_matches("0x")));
    assert!(json.contains("\"format_version\": 2"));
    assert!(json.contains("GiftCardPurchased"));
}
