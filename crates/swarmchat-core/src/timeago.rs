//! Relative-time display strings
//!
//! Messages carry a `timeago` string ("just now", "5 minutes ago", ...)
//! recomputed once per minute for the active channel. Older messages fall
//! back to an absolute date.

use chrono::DateTime;

use crate::types::Timestamp;

const MINUTE_MS: u64 = 60 * 1000;
const HOUR_MS: u64 = 60 * MINUTE_MS;
const DAY_MS: u64 = 24 * HOUR_MS;
const WEEK_MS: u64 = 7 * DAY_MS;

/// Human-friendly description of how long ago `then` was, seen from `now`
pub fn timeago(then: Timestamp, now: Timestamp) -> String {
    let elapsed = now - then;

    if elapsed < MINUTE_MS {
        return "just now".to_string();
    }
    if elapsed < HOUR_MS {
        return plural(elapsed / MINUTE_MS, "minute");
    }
    if elapsed < DAY_MS {
        return plural(elapsed / HOUR_MS, "hour");
    }
    if elapsed < WEEK_MS {
        return plural(elapsed / DAY_MS, "day");
    }

    match DateTime::from_timestamp_millis(then.as_millis() as i64) {
        Some(date) => date.format("%b %-d, %Y").to_string(),
        None => plural(elapsed / DAY_MS, "day"),
    }
}

fn plural(count: u64, unit: &str) -> String {
    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
