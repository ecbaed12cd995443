//! # src/app_service/mod.rs
//!
//! Definiert den `GiftCardService`, eine Fassade über dem `GiftCardLedger`,
//! um die Kernlogik für Client-Anwendungen (z.B. eine CLI oder einen
//! Netzwerk-Adapter) zu vereinfachen.
//!
//! Diese Schicht bezieht den maßgeblichen Zeitpunkt aus einer `Clock` und
//! stellt sicher, dass jede Zustandsänderung automatisch gespeichert wird.
//!
//! ## Transaktionalität
//!
//! Jede schreibende Aktion arbeitet nach dem Muster Sichern-Ausführen-Speichern.
//! Schlägt das Speichern fehl, wird der In-Memory-Zustand auf die Sicherung
//! zurückgesetzt, sodass Speicher und Speicherabbild nie auseinanderlaufen.
//!
//! ## Beispiel
//!
//! ```no_run
//! use giftcard_lib::{FileStorage, GiftCardService, LedgerConfig, PartyId, RedemptionCode, SystemClock};
//! use rust_decimal::Decimal;
//!
//! let storage = FileStorage::new("/tmp/giftcards");
//! let mut service = GiftCardService::open(storage, SystemClock, LedgerConfig::default()).unwrap();
//!
//! let alice = PartyId::from("alice");
//! service.deposit(&alice, Decimal::ONE).unwrap();
//!
//! let code = RedemptionCode::new("HAPPY-BIRTHDAY-2024");
//! service.buy_with_code(&code, Decimal::new(5, 1), &alice).unwrap();
//! ```

use crate::custody::account_book::AccountBook;
use crate::ledger::GiftCardLedger;
use crate::services::clock::{Clock, SystemClock};
use crate::storage::file_storage::FileStorage;
use crate::storage::Storage;

mod command_handler;
mod lifecycle;
mod queries;

/// Die `GiftCardService`-Fassade.
///
/// Besitzt das Buch samt Kontenbuch, das Speicher-Backend und die Uhr. Jede
/// ändernde Methode nimmt `&mut self`, sodass zwischen Buch- und
/// Kontenbuch-Snapshot keine andere Operation des Services liegen kann.
pub struct GiftCardService<S: Storage = FileStorage, K: Clock = SystemClock> {
    ledger: GiftCardLedger<AccountBook>,
    storage: S,
    clock: K,
}
