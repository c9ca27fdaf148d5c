//! Plain-text rendering of core records.

use std::fmt::Write;

use skycast_core::{
    CurrentConditions, DaySummary, ForecastBundle, HourlySnapshot, TemperatureUnit,
    forecast::{round_temperature, zone_for_offset},
};

fn temp(celsius: f64, unit: TemperatureUnit) -> String {
    format!("{}{}", round_temperature(unit.convert(celsius)), unit.symbol())
}

fn compass(deg: u16) -> &'static str {
    const POINTS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];
    POINTS[((f64::from(deg % 360) + 22.5) / 45.0) as usize % 8]
}

pub fn current(c: &CurrentConditions, unit: TemperatureUnit) -> String {
    let mut out = String::new();
    let local = c.observation_time.with_timezone(&zone_for_offset(c.utc_offset_secs));

    let place = if c.country.is_empty() {
        c.location_name.clone()
    } else {
        format!("{}, {}", c.location_name, c.country)
    };
    let _ = writeln!(out, "{place}  ({})", local.format("%a %H:%M"));
    let _ = writeln!(out, "  {}  {}", temp(c.temperature_c, unit), c.condition);
    let _ = writeln!(
        out,
        "  Feels like {}  (low {}, high {})",
        temp(c.feels_like_c, unit),
        temp(c.temperature_min_c, unit),
        temp(c.temperature_max_c, unit),
    );
    let wind = match c.wind_direction_deg {
        Some(deg) => format!("{:.1} m/s {} ({deg}°)", c.wind_speed_mps, compass(deg)),
        None => format!("{:.1} m/s", c.wind_speed_mps),
    };
    let _ = writeln!(out, "  Wind {wind}  Humidity {}%", c.humidity_pct);
    out
}

pub fn hourly(hours: &[HourlySnapshot], unit: TemperatureUnit) -> String {
    let mut out = String::new();
    for h in hours {
        let shown = temp(h.temperature_c, unit);
        let _ = writeln!(out, "  {:>5}  {shown:>6}  {}", h.time_label.to_string(), h.icon.id);
    }
    out
}

pub fn daily(days: &[DaySummary], unit: TemperatureUnit) -> String {
    let mut out = String::new();
    for d in days {
        let _ = writeln!(
            out,
            "  {:<9}  {:>6} / {:<6}  {}",
            d.day_label,
            temp(d.min_temperature, unit),
            temp(d.max_temperature, unit),
            d.description,
        );
    }
    out
}

pub fn bundle(b: &ForecastBundle, unit: TemperatureUnit) -> String {
    let mut out = current(&b.current, unit);
    out.push_str("\nHourly\n");
    out.push_str(&hourly(&b.hourly, unit));
    out.push_str("\nDaily\n");
    out.push_str(&daily(&b.daily, unit));
    out
}
