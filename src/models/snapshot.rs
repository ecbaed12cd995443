//! # src/models/snapshot.rs
//!
//! Die serialisierbare Momentaufnahme eines kompletten Buchs, wie sie vom
//! `Storage`-Backend gespeichert und wieder geladen wird.

use crate::models::event::LedgerEvent;
use crate::models::gift_card::GiftCardRecord;
use crate::models::ledger_config::LedgerConfig;
use serde::{Deserialize, Serialize};

/// Der vollständige, konsistente Zustand eines `GiftCardLedger`.
///
/// Die Datensätze sind nach Kaufzeitpunkt und Code-Hash sortiert, damit
/// derselbe Zustand immer dieselbe Serialisierung ergibt.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct LedgerSnapshot {
    pub config: LedgerConfig,
    pub records: Vec<GiftCardRecord>,
    #[serde(default)]
    pub events: Vec<LedgerEvent>,
}
