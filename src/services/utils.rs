//! # utils.rs
//!
//! Enthält allgemeine Hilfsfunktionen für Zeitstempel und die Anzeige der
//! verbleibenden Gültigkeit einer Karte.

use chrono::{DateTime, Utc};

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;

/// Ab so vielen (angebrochenen) Resttagen gilt eine Karte als bald ablaufend.
pub const EXPIRING_SOON_DAYS: i64 = 3;

/// Formatiert einen Zeitpunkt im ISO 8601-Format in UTC mit Mikrosekunden-Präzision
/// (YYYY-MM-DDTHH:MM:SS.ffffffZ).
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

/// Die Anzahl der (angebrochenen) Tage bis zum Ablauf. Negativ nach dem Ablauf.
pub fn days_until_expiration(expires_at: &DateTime<Utc>, now: &DateTime<Utc>) -> i64 {
    let seconds = (*expires_at - *now).num_seconds();
    seconds.div_euclid(SECONDS_PER_DAY) + i64::from(seconds.rem_euclid(SECONDS_PER_DAY) != 0)
}

/// Prüft, ob eine noch gültige Karte höchstens `EXPIRING_SOON_DAYS`
/// angebrochene Tage Restlaufzeit hat.
pub fn is_expiring_soon(expires_at: &DateTime<Utc>, now: &DateTime<Utc>) -> bool {
    let days = days_until_expiration(expires_at, now);
    days > 0 && days <= EXPIRING_SOON_DAYS
}

/// Beschreibt die verbleibende Gültigkeit in menschenlesbarer Form.
///
/// Gibt `"Expired"` zurück, sobald keine Restzeit mehr bleibt. Sonst die zwei
/// größten Einheiten, z.B. `"3 day(s), 4 hour(s)"` oder `"12 minute(s)"`.
pub fn format_remaining_validity(expires_at: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let remaining = (*expires_at - *now).num_seconds();
    if remaining <= 0 {
        return "Expired".to_string();
    }

    let days = remaining / SECONDS_PER_DAY;
    let hours = (remaining % SECONDS_PER_DAY) / SECONDS_PER_HOUR;
    let minutes = (remaining % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;

    if days > 0 {
        format!("{} day(s), {} hour(s)", days, hours)
    } else if hours > 0 {
        format!("{} hour(s), {} minute(s)", hours, minutes)
    } else {
        format!("{} minute(s)", minutes)
    }
}
