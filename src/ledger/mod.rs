//! # src/ledger/mod.rs
//!
//! Definiert das `GiftCardLedger`, die zentrale Verwaltungsstruktur für
//! Geschenkkarten. Es hält die Tabelle `CodeHash -> GiftCardRecord`, setzt die
//! Regeln für Kauf, Einlösung und Ablauf durch und bucht die verwahrten
//! Beträge über ein `ValueCustody`-Backend.
//!
//! ## Nebenläufigkeit
//!
//! Die Tabelle liegt hinter einem `RwLock`, jeder Datensatz hinter einem
//! eigenen `Mutex`. `buy` hält die Schreibsperre der Tabelle für die gesamte
//! Folge Prüfen-Belasten-Einfügen. `redeem` und `reclaim_expired` halten die
//! Tabelle nur lesend und serialisieren sich am Datensatz, sodass sich
//! Operationen auf verschiedenen Codes nicht gegenseitig blockieren.
//! `snapshot` nimmt die Schreibsperre und sieht damit nie eine halb
//! ausgeführte Operation.
//!
//! Sperr-Reihenfolge: Tabelle, dann Datensatz, dann Ereignisprotokoll. Das
//! Ereignisprotokoll wird erst nach der Buchung und nur für das Anhängen
//! gesperrt, nie über einen Aufruf des Verwahrungs-Backends hinweg.

mod queries;

use crate::custody::account_book::AccountBook;
use crate::custody::{CustodyError, ValueCustody};
use crate::error::GiftCardCoreError;
use crate::models::event::LedgerEvent;
use crate::models::gift_card::{CodeHash, GiftCardRecord, Payout, Receipt, Reclaim};
use crate::models::ledger_config::{ConfigError, LedgerConfig};
use crate::models::party::PartyId;
use crate::models::snapshot::LedgerSnapshot;
use crate::services::crypto_utils::RedemptionCode;
use crate::services::decimal_utils::validate_precision;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Die Fehlerarten des Buchs.
///
/// Keiner dieser Fehler wird vom Buch selbst wiederholt; jeder lässt den
/// Zustand des Buchs und alle Guthaben unverändert.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Invalid code hash: the all-zero hash is reserved and cannot identify a gift card.")]
    InvalidCodeHash,

    #[error("Purchase value {found} is below the minimum of {minimum}.")]
    BelowMinimumValue { minimum: Decimal, found: Decimal },

    #[error("Amount precision exceeded: allowed {allowed} decimal places, found {found}.")]
    AmountPrecisionExceeded { allowed: u32, found: u32 },

    #[error("A gift card with code hash {0} already exists.")]
    DuplicateCode(CodeHash),

    #[error("No gift card found for code hash {0}.")]
    CodeNotFound(CodeHash),

    #[error("Gift card {0} has already been redeemed.")]
    AlreadyRedeemed(CodeHash),

    #[error("Gift card {code_hash} expired at {expired_at}.")]
    Expired {
        code_hash: CodeHash,
        expired_at: DateTime<Utc>,
    },

    #[error("Insufficient funds: Available: {available}, Needed: {needed}")]
    InsufficientFunds { available: Decimal, needed: Decimal },

    #[error("Gift card {0} has already been reclaimed by its buyer.")]
    AlreadyReclaimed(CodeHash),

    #[error("Gift card {code_hash} is still valid until {expires_at}.")]
    NotExpired {
        code_hash: CodeHash,
        expires_at: DateTime<Utc>,
    },

    #[error("Party '{claimant}' is not the buyer of gift card {code_hash}.")]
    NotBuyer { code_hash: CodeHash, claimant: PartyId },

    #[error("Custody error: {0}")]
    Custody(CustodyError),

    #[error("Ledger state lock was poisoned by a panicking thread.")]
    LockPoisoned,
}

impl From<CustodyError> for LedgerError {
    fn from(err: CustodyError) -> Self {
        match err {
            CustodyError::InsufficientFunds { available, needed, .. } => {
                LedgerError::InsufficientFunds { available, needed }
            }
            other => LedgerError::Custody(other),
        }
    }
}

/// Das Geschenkkarten-Buch.
///
/// Eine eigenständige Instanz mit explizitem Lebenszyklus; mehrere Bücher
/// können nebeneinander existieren. Jede Operation erhält den maßgeblichen
/// Zeitpunkt `now` als Parameter.
#[derive(Debug)]
pub struct GiftCardLedger<C = AccountBook> {
    config: LedgerConfig,
    custody: C,
    records: RwLock<HashMap<CodeHash, Mutex<GiftCardRecord>>>,
    events: Mutex<Vec<LedgerEvent>>,
}

impl<C: ValueCustody> GiftCardLedger<C> {
    /// Erstellt ein leeres Buch. Die Konfiguration wird vorab validiert.
    pub fn new(config: LedgerConfig, custody: C) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(GiftCardLedger {
            config,
            custody,
            records: RwLock::new(HashMap::new()),
            events: Mutex::new(Vec::new()),
        })
    }

    /// Stellt ein Buch aus einer Momentaufnahme wieder her.
    ///
    /// Lehnt Momentaufnahmen ab, die gegen die Invarianten verstoßen
    /// (Null-Hash, doppelte Codes, ungültige Konfiguration).
    pub fn from_snapshot(snapshot: LedgerSnapshot, custody: C) -> Result<Self, GiftCardCoreError> {
        let LedgerSnapshot { config, records, events } = snapshot;
        config.validate()?;

        let mut table = HashMap::with_capacity(records.len());
        for record in records {
            if record.code_hash.is_zero() {
                return Err(LedgerError::InvalidCodeHash.into());
            }
            let code_hash = record.code_hash;
            if table.insert(code_hash, Mutex::new(record)).is_some() {
                return Err(LedgerError::DuplicateCode(code_hash).into());
            }
        }
        info!(records = table.len(), events = events.len(), "gift card ledger restored");

        Ok(GiftCardLedger {
            config,
            custody,
            records: RwLock::new(table),
            events: Mutex::new(events),
        })
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn custody(&self) -> &C {
        &self.custody
    }

    pub fn validity_period(&self) -> Duration {
        self.config.validity_period()
    }

    /// Kauft eine Karte: legt den Datensatz an und nimmt `value` vom Käufer in Verwahrung.
    ///
    /// Der Aufrufer übergibt nur den Hash des Codes; der Klartext wird erst bei
    /// der Einlösung vorgelegt.
    ///
    /// # Errors
    /// `InvalidCodeHash`, `BelowMinimumValue`, `AmountPrecisionExceeded`,
    /// `DuplicateCode` (auch nach Einlösung oder Ablauf) und
    /// `InsufficientFunds`. In jedem Fehlerfall bleibt alles unverändert.
    pub fn buy(
        &self,
        code_hash: CodeHash,
        value: Decimal,
        buyer: &PartyId,
        now: DateTime<Utc>,
    ) -> Result<Receipt, LedgerError> {
        if code_hash.is_zero() {
            warn!(buyer = %buyer, "purchase rejected: zero code hash");
            return Err(LedgerError::InvalidCodeHash);
        }
        if value < self.config.min_purchase_value {
            warn!(code = %code_hash.short(), %value, "purchase rejected: below minimum value");
            return Err(LedgerError::BelowMinimumValue {
                minimum: self.config.min_purchase_value,
                found: value,
            });
        }
        validate_precision(&value, self.config.amount_decimal_places)?;

        let mut records = self.records.write().map_err(|_| LedgerError::LockPoisoned)?;
        if records.contains_key(&code_hash) {
            warn!(code = %code_hash.short(), "purchase rejected: duplicate code");
            return Err(LedgerError::DuplicateCode(code_hash));
        }

        self.custody.debit(buyer, value)?;

        let record = GiftCardRecord::new(code_hash, value, buyer.clone(), now);
        let receipt = Receipt {
            code_hash,
            value,
            buyer: buyer.clone(),
            purchase_time: now,
            expiration_time: record.expiration_time(self.validity_period()),
        };
        records.insert(code_hash, Mutex::new(record));
        self.record_event(LedgerEvent::GiftCardPurchased {
            code_hash,
            value,
            buyer: buyer.clone(),
            timestamp: now,
        });

        info!(code = %code_hash.short(), %value, buyer = %buyer, "gift card purchased");
        Ok(receipt)
    }

    /// Löst eine Karte ein. Die Berechtigung ist der Besitz des Klartext-Codes;
    /// jede Partei darf jeden gültigen Code vorlegen.
    ///
    /// Prüfreihenfolge: `CodeNotFound`, `AlreadyRedeemed`, `Expired`.
    /// Gelingt die Einlösung, wird der Betrag dem `redeemer` gutgeschrieben und
    /// die Karte dauerhaft als eingelöst markiert.
    pub fn redeem(
        &self,
        code: &RedemptionCode,
        redeemer: &PartyId,
        now: DateTime<Utc>,
    ) -> Result<Payout, LedgerError> {
        let code_hash = code.code_hash();
        let records = self.read_records()?;
        let mut record = Self::lock_record(&records, &code_hash)?;

        if record.redeemed {
            warn!(code = %code_hash.short(), redeemer = %redeemer, "redemption rejected: already redeemed");
            return Err(LedgerError::AlreadyRedeemed(code_hash));
        }
        let expires_at = record.expiration_time(self.validity_period());
        if record.reclaimed || now > expires_at {
            warn!(code = %code_hash.short(), %expires_at, "redemption rejected: expired");
            return Err(LedgerError::Expired {
                code_hash,
                expired_at: expires_at,
            });
        }

        self.custody.credit(redeemer, record.value)?;
        record.redeemed = true;

        let payout = Payout {
            code_hash,
            value: record.value,
            redeemer: redeemer.clone(),
            redeemed_at: now,
        };
        self.record_event(LedgerEvent::GiftCardRedeemed {
            code_hash,
            value: record.value,
            redeemer: redeemer.clone(),
            timestamp: now,
        });

        info!(code = %code_hash.short(), value = %record.value, redeemer = %redeemer, "gift card redeemed");
        Ok(payout)
    }

    /// Komfort-Variante von [`redeem`](Self::redeem) für einen Code als String.
    pub fn redeem_code(&self, code: &str, redeemer: &PartyId, now: DateTime<Utc>) -> Result<Payout, LedgerError> {
        self.redeem(&RedemptionCode::new(code), redeemer, now)
    }

    /// Bucht das Guthaben einer abgelaufenen, nicht eingelösten Karte an ihren
    /// Käufer zurück. Danach ist die Karte endgültig erledigt.
    ///
    /// Prüfreihenfolge: `CodeNotFound`, `AlreadyRedeemed`, `AlreadyReclaimed`,
    /// `NotBuyer`, `NotExpired`.
    pub fn reclaim_expired(
        &self,
        code_hash: &CodeHash,
        claimant: &PartyId,
        now: DateTime<Utc>,
    ) -> Result<Reclaim, LedgerError> {
        let records = self.read_records()?;
        let mut record = Self::lock_record(&records, code_hash)?;

        if record.redeemed {
            return Err(LedgerError::AlreadyRedeemed(*code_hash));
        }
        if record.reclaimed {
            return Err(LedgerError::AlreadyReclaimed(*code_hash));
        }
        if &record.buyer != claimant {
            warn!(code = %code_hash.short(), claimant = %claimant, "reclaim rejected: not the buyer");
            return Err(LedgerError::NotBuyer {
                code_hash: *code_hash,
                claimant: claimant.clone(),
            });
        }
        let expires_at = record.expiration_time(self.validity_period());
        if now <= expires_at {
            return Err(LedgerError::NotExpired {
                code_hash: *code_hash,
                expires_at,
            });
        }

        self.custody.credit(&record.buyer, record.value)?;
        record.reclaimed = true;

        let reclaim = Reclaim {
            code_hash: *code_hash,
            value: record.value,
            buyer: record.buyer.clone(),
            reclaimed_at: now,
        };
        self.record_event(LedgerEvent::GiftCardReclaimed {
            code_hash: *code_hash,
            value: record.value,
            buyer: record.buyer.clone(),
            timestamp: now,
        });

        info!(code = %code_hash.short(), value = %record.value, "expired gift card reclaimed by buyer");
        Ok(reclaim)
    }

    /// Erstellt eine konsistente Momentaufnahme des gesamten Buchs.
    pub fn snapshot(&self) -> Result<LedgerSnapshot, LedgerError> {
        let records = self.records.write().map_err(|_| LedgerError::LockPoisoned)?;
        let mut copied = Vec::with_capacity(records.len());
        for cell in records.values() {
            copied.push(cell.lock().map_err(|_| LedgerError::LockPoisoned)?.clone());
        }
        let events = self.lock_events()?.clone();
        drop(records);

        copied.sort_by(|a, b| {
            a.purchase_time
                .cmp(&b.purchase_time)
                .then_with(|| a.code_hash.cmp(&b.code_hash))
        });
        debug!(records = copied.len(), "ledger snapshot taken");

        Ok(LedgerSnapshot {
            config: self.config.clone(),
            records: copied,
            events,
        })
    }

    fn read_records(&self) -> Result<RwLockReadGuard<'_, HashMap<CodeHash, Mutex<GiftCardRecord>>>, LedgerError> {
        self.records.read().map_err(|_| LedgerError::LockPoisoned)
    }

    fn lock_record<'a>(
        records: &'a HashMap<CodeHash, Mutex<GiftCardRecord>>,
        code_hash: &CodeHash,
    ) -> Result<MutexGuard<'a, GiftCardRecord>, LedgerError> {
        records
            .get(code_hash)
            .ok_or(LedgerError::CodeNotFound(*code_hash))?
            .lock()
            .map_err(|_| LedgerError::LockPoisoned)
    }

    fn lock_events(&self) -> Result<MutexGuard<'_, Vec<LedgerEvent>>, LedgerError> {
        self.events.lock().map_err(|_| LedgerError::LockPoisoned)
    }

    /// Hängt ein Ereignis an das Protokoll an, nachdem die Änderung bereits
    /// gebucht ist. Das Protokoll wird nur für diesen einen `push` gesperrt.
    fn record_event(&self, event: LedgerEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
