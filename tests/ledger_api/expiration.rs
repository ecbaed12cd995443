//! # tests/ledger_api/expiration.rs
//!
//! Integrationstests für den Ablauf von Karten mit einer von Hand gestellten
//! Uhr: die Grenze ist inklusiv, abgelaufene Karten bleiben in Verwahrung,
//! bis ihr Käufer sie zurückfordert.

use giftcard_lib::test_utils::{code, setup_service, t0, ACTORS, STARTING_BALANCE};
use giftcard_lib::utils::{format_remaining_validity, is_expiring_soon};
use giftcard_lib::{Clock, GiftCardCoreError, GiftCardState, LedgerError};
use chrono::Duration;
use rust_decimal_macros::dec;

#[test]
fn test_card_is_redeemable_until_the_last_second() {
    let mut service = setup_service();
    let c = code("deadline");
    service.buy_with_code(&c, dec!(1), &ACTORS.alice).unwrap();

    service.clock().advance(Duration::days(30));
    let status = service.status(&c.code_hash()).unwrap();
    assert!(!status.expired);
    assert_eq!(status.state, GiftCardState::Active);

    assert!(service.redeem(&c, &ACTORS.bob).is_ok());
}

#[test]
fn test_card_expires_one_second_after_the_period() {
    let mut service = setup_service();
    let c = code("missed");
    service.buy_with_code(&c, dec!(1), &ACTORS.alice).unwrap();

    service.clock().advance(Duration::days(30) + Duration::seconds(1));
    let err = service.redeem(&c, &ACTORS.bob).unwrap_err();
    assert!(matches!(
        err,
        GiftCardCoreError::Ledger(LedgerError::Expired { expired_at, .. }) if expired_at == t0() + Duration::days(30)
    ));
    assert_eq!(service.status(&c.code_hash()).unwrap().state, GiftCardState::Expired);
    assert_eq!(service.balance(&ACTORS.bob).unwrap(), STARTING_BALANCE);
}

#[test]
fn test_expired_value_goes_back_to_the_buyer_only() {
    let mut service = setup_service();
    let c = code("forgotten");
    service.buy_with_code(&c, dec!(4), &ACTORS.alice).unwrap();

    // Vor Ablauf ist keine Rückforderung möglich.
    let err = service.reclaim_expired(&c.code_hash(), &ACTORS.alice).unwrap_err();
    assert!(matches!(err, GiftCardCoreError::Ledger(LedgerError::NotExpired { .. })));

    service.clock().advance(Duration::days(45));
    assert_eq!(service.total_custodied().unwrap(), dec!(4));

    let err = service.reclaim_expired(&c.code_hash(), &ACTORS.bob).unwrap_err();
    assert!(matches!(err, GiftCardCoreError::Ledger(LedgerError::NotBuyer { .. })));

    let reclaim = service.reclaim_expired(&c.code_hash(), &ACTORS.alice).unwrap();
    assert_eq!(reclaim.value, dec!(4));
    assert_eq!(reclaim.reclaimed_at, t0() + Duration::days(45));
    assert_eq!(service.balance(&ACTORS.alice).unwrap(), STARTING_BALANCE);
    assert_eq!(service.total_custodied().unwrap(), dec!(0));
    assert_eq!(service.status(&c.code_hash()).unwrap().state, GiftCardState::Reclaimed);

    let err = service.redeem(&c, &ACTORS.bob).unwrap_err();
    assert!(matches!(err, GiftCardCoreError::Ledger(LedgerError::Expired { .. })));
}

#[test]
fn test_remaining_validity_reported_for_status() {
    let mut service = setup_service();
    let c = code("countdown");
    service.buy_with_code(&c, dec!(1), &ACTORS.alice).unwrap();

    service.clock().advance(Duration::days(28) + Duration::hours(12));
    let status = service.status(&c.code_hash()).unwrap();
    let now = service.clock().now();
    assert_eq!(format_remaining_validity(&status.expiration_time, &now), "1 day(s), 12 hour(s)");

    service.clock().set(status.expiration_time + Duration::minutes(1));
    let now = service.clock().now();
    assert_eq!(format_remaining_validity(&status.expiration_time, &now), "Expired");
}

#[test]
fn test_status_flags_cards_in_their_last_days() {
    let mut service = setup_service();
    let c = code("last-days");
    service.buy_with_code(&c, dec!(1), &ACTORS.alice).unwrap();
    let expires_at = service.status(&c.code_hash()).unwrap().expiration_time;

    service.clock().advance(Duration::days(26));
    assert!(!is_expiring_soon(&expires_at, &service.clock().now()));

    service.clock().advance(Duration::hours(1));
    let status = service.status(&c.code_hash()).unwrap();
    assert_eq!(status.state, GiftCardState::Active);
    assert!(is_expiring_soon(&status.expiration_time, &service.clock().now()));

    // Am letzten gültigen Zeitpunkt bleibt keine angebrochene Restzeit.
    service.clock().set(expires_at);
    assert!(!is_expiring_soon(&expires_at, &service.clock().now()));
    assert_eq!(service.status(&c.code_hash()).unwrap().state, GiftCardState::Active);
}
