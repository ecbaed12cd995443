//! # src/models/event.rs
//!
//! Die Ereignisse, die das Buch bei jeder erfolgreichen Zustandsänderung
//! protokolliert. Das Protokoll wächst nur und wird mit dem Buch gespeichert.

use crate::models::gift_card::CodeHash;
use crate::models::party::PartyId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Ein einzelner Eintrag im Ereignisprotokoll des Buchs.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum LedgerEvent {
    /// Eine Karte wurde gekauft und der Betrag in Verwahrung genommen.
    GiftCardPurchased {
        code_hash: CodeHash,
        value: Decimal,
        buyer: PartyId,
        timestamp: DateTime<Utc>,
    },
    /// Eine Karte wurde eingelöst und der Betrag an den Einlöser ausgezahlt.
    GiftCardRedeemed {
        code_hash: CodeHash,
        value: Decimal,
        redeemer: PartyId,
        timestamp: DateTime<Utc>,
    },
    /// Das Guthaben einer abgelaufenen Karte wurde an den Käufer zurückgebucht.
    GiftCardReclaimed {
        code_hash: CodeHash,
        value: Decimal,
        buyer: PartyId,
        timestamp: DateTime<Utc>,
    },
}

impl LedgerEvent {
    pub fn code_hash(&self) -> &CodeHash {
        match self {
            LedgerEvent::GiftCardPurchased { code_hash, .. }
            | LedgerEvent::GiftCardRedeemed { code_hash, .. }
            | LedgerEvent::GiftCardReclaimed { code_hash, .. } => code_hash,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            LedgerEvent::GiftCardPurchased { timestamp, .. }
            | LedgerEvent::GiftCardRedeemed { timestamp, .. }
            | LedgerEvent::GiftCardReclaimed { timestamp, .. } => *timestamp,
        }
    }
}
