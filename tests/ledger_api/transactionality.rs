//! # tests/ledger_api/transactionality.rs
//!
//! Enthält Integrationstests, die sicherstellen, dass alle zustandsändernden
//! Operationen des `GiftCardService` atomar sind. Eine Operation muss entweder
//! vollständig erfolgreich sein (inklusive Speicherung) oder den In-Memory-Zustand
//! so hinterlassen, als wäre sie nie ausgeführt worden.

use giftcard_lib::test_utils::{code, setup_service_with_storage, InMemoryStorage, ACTORS, STARTING_BALANCE};
use giftcard_lib::{GiftCardCoreError, LedgerConfig, StorageError};
use rust_decimal_macros::dec;

/// Stellt sicher, dass ein Kauf bei einem Speicherfehler weder die Karte
/// anlegt noch den Käufer belastet.
#[test]
fn test_buy_is_transactional_on_save_failure() {
    // 1. ARRANGE
    let storage = InMemoryStorage::new();
    let mut service = setup_service_with_storage(storage.clone(), LedgerConfig::default());
    let c = code("unsaved");

    // 2. ACT
    storage.set_fail_saves(true);
    let err = service.buy_with_code(&c, dec!(2), &ACTORS.alice).unwrap_err();

    // 3. ASSERT
    assert!(matches!(err, GiftCardCoreError::Storage(StorageError::Generic(_))));
    assert!(!service.ledger().contains(&c.code_hash()).unwrap());
    assert_eq!(service.balance(&ACTORS.alice).unwrap(), STARTING_BALANCE);
    assert!(service.ledger().events().unwrap().is_empty());

    // Nach Behebung des Fehlers gelingt derselbe Kauf.
    storage.set_fail_saves(false);
    assert!(service.buy_with_code(&c, dec!(2), &ACTORS.alice).is_ok());
}

#[test]
fn test_redeem_is_transactional_on_save_failure() {
    let storage = InMemoryStorage::new();
    let mut service = setup_service_with_storage(storage.clone(), LedgerConfig::default());
    let c = code("retry");
    service.buy_with_code(&c, dec!(1), &ACTORS.alice).unwrap();

    storage.set_fail_saves(true);
    assert!(service.redeem(&c, &ACTORS.bob).is_err());
    assert!(!service.ledger().is_redeemed(&c.code_hash()).unwrap());
    assert_eq!(service.balance(&ACTORS.bob).unwrap(), STARTING_BALANCE);

    // Die Karte ist weiterhin einlösbar.
    storage.set_fail_saves(false);
    let payout = service.redeem(&c, &ACTORS.bob).unwrap();
    assert_eq!(payout.value, dec!(1));
    assert_eq!(service.balance(&ACTORS.bob).unwrap(), STARTING_BALANCE + dec!(1));
}

#[test]
fn test_deposit_is_transactional_on_save_failure() {
    let storage = InMemoryStorage::new();
    let mut service = setup_service_with_storage(storage.clone(), LedgerConfig::default());

    storage.set_fail_saves(true);
    assert!(service.deposit(&ACTORS.charlie, dec!(5)).is_err());
    assert_eq!(service.balance(&ACTORS.charlie).unwrap(), dec!(0));
}

#[test]
fn test_saved_state_matches_memory_after_failure() {
    let storage = InMemoryStorage::new();
    let mut service = setup_service_with_storage(storage.clone(), LedgerConfig::default());
    service.buy_with_code(&code("kept"), dec!(1), &ACTORS.alice).unwrap();

    storage.set_fail_saves(true);
    let _ = service.buy_with_code(&code("lost"), dec!(1), &ACTORS.alice);

    let in_memory = service.ledger().snapshot().unwrap();
    let accounts = service.ledger().custody().snapshot().unwrap();
    let storage = service.into_storage();
    let (saved_ledger, saved_accounts) = storage.saved_state().unwrap();

    assert_eq!(saved_ledger, &in_memory);
    assert_eq!(saved_accounts, &accounts);
    assert_eq!(saved_ledger.records.len(), 1);
}

/// Abgelehnte Operationen lösen keinen Speichervorgang aus und verändern nichts.
#[test]
fn test_rejected_operation_does_not_touch_storage() {
    let storage = InMemoryStorage::new();
    let mut service = setup_service_with_storage(storage.clone(), LedgerConfig::default());
    let before = service.ledger().snapshot().unwrap();

    storage.set_fail_saves(true);
    let err = service.redeem(&code("nothing"), &ACTORS.bob).unwrap_err();
    assert!(matches!(err, GiftCardCoreError::Ledger(_)));
    assert_eq!(service.ledger().snapshot().unwrap(), before);
}
