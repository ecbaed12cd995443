//! # tests/ledger_api/purchase_workflows.rs
//!
//! Integrationstests für den Kauf von Karten über den `GiftCardService`:
//! Hashing auf Aufruferseite, Quittung, Belastung des Käufers und die
//! Ablehnungsgründe eines Kaufs.

use giftcard_lib::test_utils::{self, code, setup_service, InMemoryStorage, ACTORS, STARTING_BALANCE};
use giftcard_lib::{
    generate_redemption_code, hash_code, load_ledger_config, GiftCardCoreError, GiftCardState, LedgerError,
};
use chrono::Duration;
use rust_decimal_macros::dec;

#[test]
fn test_buy_with_code_only_stores_the_hash() {
    let mut service = setup_service();
    let c = code("gift-for-bob");

    let receipt = service.buy_with_code(&c, dec!(2.5), &ACTORS.alice).unwrap();

    assert_eq!(receipt.code_hash, hash_code("TEST-CODE-gift-for-bob"));
    assert_eq!(receipt.purchase_time, test_utils::t0());
    assert_eq!(receipt.expiration_time, test_utils::t0() + Duration::days(30));
    assert_eq!(service.balance(&ACTORS.alice).unwrap(), dec!(7.5));

    let status = service.status(&receipt.code_hash).unwrap();
    assert_eq!(status.state, GiftCardState::Active);
    assert_eq!(status.buyer, ACTORS.alice);
    assert_eq!(status.value, dec!(2.5));

    // Der gespeicherte Zustand enthält nirgends den Klartext-Code.
    let json = serde_json::to_string(&service.ledger().snapshot().unwrap()).unwrap();
    assert!(!json.contains(c.expose()));
}

#[test]
fn test_generated_code_round_trip_between_parties() {
    let mut service = setup_service();

    // Alice erzeugt einen Code und übermittelt dem Buch nur dessen Hash.
    let secret = generate_redemption_code(16);
    service.buy(secret.code_hash(), dec!(1), &ACTORS.alice).unwrap();

    // Charlie erhält den Code außerhalb des Systems und löst ihn ein.
    let payout = service.redeem(&secret, &ACTORS.charlie).unwrap();
    assert_eq!(payout.value, dec!(1));
    assert_eq!(service.balance(&ACTORS.charlie).unwrap(), dec!(1));
    assert_eq!(service.status(&secret.code_hash()).unwrap().state, GiftCardState::Redeemed);
}

#[test]
fn test_rejected_purchases_surface_ledger_errors() {
    let mut service = setup_service();

    let err = service.buy_with_code(&code("tiny"), dec!(0.0001), &ACTORS.alice).unwrap_err();
    assert!(matches!(err, GiftCardCoreError::Ledger(LedgerError::BelowMinimumValue { .. })));

    let err = service.buy_with_code(&code("huge"), dec!(11), &ACTORS.alice).unwrap_err();
    assert!(matches!(
        err,
        GiftCardCoreError::Ledger(LedgerError::InsufficientFunds { available, needed })
            if available == STARTING_BALANCE && needed == dec!(11)
    ));

    service.buy_with_code(&code("taken"), dec!(1), &ACTORS.alice).unwrap();
    let err = service.buy_with_code(&code("taken"), dec!(1), &ACTORS.bob).unwrap_err();
    assert!(matches!(err, GiftCardCoreError::Ledger(LedgerError::DuplicateCode(_))));

    assert_eq!(service.ledger().len().unwrap(), 1);
    assert_eq!(service.balance(&ACTORS.bob).unwrap(), STARTING_BALANCE);
}

#[test]
fn test_configured_minimum_and_precision_apply() {
    let config = load_ledger_config(
        r#"
        min_purchase_value = "0.5"
        amount_decimal_places = 2
        "#,
    )
    .unwrap();
    let mut service = test_utils::setup_service_with_storage(InMemoryStorage::new(), config);

    let err = service.buy_with_code(&code("cheap"), dec!(0.49), &ACTORS.alice).unwrap_err();
    assert!(matches!(err, GiftCardCoreError::Ledger(LedgerError::BelowMinimumValue { .. })));

    let err = service.buy_with_code(&code("precise"), dec!(1.005), &ACTORS.alice).unwrap_err();
    assert!(matches!(
        err,
        GiftCardCoreError::Ledger(LedgerError::AmountPrecisionExceeded { allowed: 2, found: 3 })
    ));

    // Nachgestellte Nullen zählen nicht als Nachkommastellen.
    assert!(service.buy_with_code(&code("padded"), dec!(0.5000), &ACTORS.alice).is_ok());
}

#[test]
fn test_many_cards_from_one_buyer() {
    let mut service = setup_service();
    for i in 0..5 {
        service
            .buy_with_code(&code(&format!("batch-{}", i)), dec!(1.5), &ACTORS.bob)
            .unwrap();
    }
    assert_eq!(service.ledger().len().unwrap(), 5);
    assert_eq!(service.total_custodied().unwrap(), dec!(7.5));
    assert_eq!(service.balance(&ACTORS.bob).unwrap(), dec!(2.5));
}
