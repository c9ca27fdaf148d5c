use chrono::TimeZone;

use crate::model::{HourlySnapshot, RawForecastEntry, TimeLabel};

use super::hour_label;

/// Project the first `window_size` entries into hourly snapshots, led by a
/// synthetic "Now" snapshot taken from the first entry.
///
/// The first entry therefore shows up twice: once as "Now" and once under its
/// own hour label. An empty feed yields no snapshots at all, since there is
/// nothing to build "Now" from.
pub fn extract_hourly<Tz: TimeZone>(
    entries: &[RawForecastEntry],
    window_size: usize,
    tz: &Tz,
) -> Vec<HourlySnapshot> {
    let Some(first) = entries.first() else {
        return Vec::new();
    };

    let mut snapshots = Vec::with_capacity(window_size.min(entries.len()) + 1);
    snapshots.push(snapshot(first, TimeLabel::Now));
    snapshots.extend(
        entries
            .iter()
            .take(window_size)
            .map(|e| snapshot(e, TimeLabel::Hour(hour_label(&e.timestamp, tz)))),
    );
    snapshots
}

fn snapshot(entry: &RawForecastEntry, time_label: TimeLabel) -> HourlySnapshot {
    HourlySnapshot {
        time_label,
        temperature: round_temperature(entry.temperature),
        temperature_c: entry.temperature,
        icon: entry.icon(),
        timestamp: entry.timestamp,
    }
}

/// Round to the nearest degree, halves towards positive infinity
/// (`-2.5` becomes `-2`, `2.5` becomes `3`).
pub fn round_temperature(value: f64) -> i32 {
    // Saturating cast; real temperatures are nowhere near i32 bounds.
    (value + 0.5).floor() as i32
}
