//! Pure transforms from a normalized forecast feed to display records.
//!
//! Labels are computed in a caller-supplied time zone so that the same feed
//! always buckets the same way regardless of where the process runs.

use chrono::{DateTime, Datelike, FixedOffset, Offset, TimeZone, Timelike, Utc, Weekday};

pub mod daily;
pub mod hourly;

pub use daily::aggregate_daily;
pub use hourly::{extract_hourly, round_temperature};

/// Hourly snapshots shown by default (not counting the synthetic "Now").
pub const DEFAULT_HOURLY_WINDOW: usize = 5;
/// Number of day summaries shown by default.
pub const DEFAULT_DAY_LIMIT: usize = 5;

/// Zone for a provider-reported UTC offset. Falls back to UTC when the
/// offset is outside what chrono accepts.
pub fn zone_for_offset(utc_offset_secs: i32) -> FixedOffset {
    FixedOffset::east_opt(utc_offset_secs).unwrap_or_else(|| {
        tracing::warn!(utc_offset_secs, "invalid UTC offset, labelling in UTC");
        Utc.fix()
    })
}

/// English weekday name of `timestamp` in `tz`, e.g. "Tuesday".
pub fn day_label<Tz: TimeZone>(timestamp: &DateTime<Utc>, tz: &Tz) -> &'static str {
    weekday_name(timestamp.with_timezone(tz).weekday())
}

/// 12-hour clock label of `timestamp` in `tz`, e.g. "3 PM".
pub fn hour_label<Tz: TimeZone>(timestamp: &DateTime<Utc>, tz: &Tz) -> String {
    let (is_pm, hour) = timestamp.with_timezone(tz).hour12();
    format!("{hour} {}", if is_pm { "PM" } else { "AM" })
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
