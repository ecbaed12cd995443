//! # giftcard_core
//!
//! Die Kernlogik eines Geschenkkarten-Verwahrungsbuchs. Eine Partei hinterlegt
//! Guthaben gegen den Hash eines geheimen Codes; wer den Klartext-Code vorlegt,
//! erhält das Guthaben, solange die Karte weder eingelöst noch abgelaufen ist.
//!
//! Diese Bibliothek stellt das Buch selbst, die Wertverwahrung, die
//! Persistenz und eine Service-Fassade für Client-Anwendungen bereit.

// Deklariert die Hauptmodule der Bibliothek und macht sie öffentlich.
pub mod app_service;
pub mod custody;
pub mod error;
pub mod ledger;
pub mod models;
pub mod services;
pub mod storage;
pub mod test_utils;

// Re-exportiert die wichtigsten öffentlichen Typen für eine einfachere Nutzung.
// Anstatt `giftcard_lib::ledger::GiftCardLedger` können Benutzer nun `giftcard_lib::GiftCardLedger` schreiben.

// Buch und Fassade
pub use app_service::GiftCardService;
pub use ledger::{GiftCardLedger, LedgerError};

// Modelle
pub use models::event::LedgerEvent;
pub use models::gift_card::{
    CodeHash, CodeHashParseError, GiftCardRecord, GiftCardState, GiftCardStatus, Payout, Receipt, Reclaim,
};
pub use models::ledger_config::{load_ledger_config, ConfigError, LedgerConfig};
pub use models::party::PartyId;
pub use models::snapshot::LedgerSnapshot;

// Services
pub use services::clock::{Clock, ManualClock, SystemClock};
pub use services::crypto_utils::{self, generate_redemption_code, hash_code, RedemptionCode};
pub use services::decimal_utils;
pub use services::utils;

// Verwahrung und Speicher
pub use custody::account_book::{AccountBook, AccountBookSnapshot};
pub use custody::{CustodyError, ValueCustody};
pub use storage::file_storage::FileStorage;
pub use storage::{Storage, StorageError};

pub use error::GiftCardCoreError;
