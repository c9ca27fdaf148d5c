use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

/// Where to fetch weather for.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    City(String),
    Coordinates { latitude: f64, longitude: f64 },
}

impl Query {
    pub fn city(name: impl Into<String>) -> Self {
        Query::City(name.into())
    }

    pub fn coordinates(latitude: f64, longitude: f64) -> Self {
        Query::Coordinates { latitude, longitude }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::City(name) => f.write_str(name),
            Query::Coordinates { latitude, longitude } => write!(f, "{latitude:.4},{longitude:.4}"),
        }
    }
}

/// Provider icon code together with the image URL derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherIcon {
    pub id: String,
    pub url: String,
}

impl WeatherIcon {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let url = format!("{ICON_BASE_URL}/{id}@2x.png");
        Self { id, url }
    }
}

/// One entry of a forecast feed, already normalized to Celsius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawForecastEntry {
    pub timestamp: DateTime<Utc>,
    pub temperature: f64,
    pub temperature_min: f64,
    pub temperature_max: f64,
    pub icon_id: String,
    pub description: String,
}

impl RawForecastEntry {
    pub fn timestamp_seconds(&self) -> i64 {
        self.timestamp.timestamp()
    }

    pub fn icon(&self) -> WeatherIcon {
        WeatherIcon::new(self.icon_id.as_str())
    }
}

/// Normalized forecast response: where it is for, and its entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastFeed {
    pub city: String,
    pub country: String,
    /// Offset of the location from UTC, in seconds.
    pub utc_offset_secs: i32,
    pub entries: Vec<RawForecastEntry>,
}

/// Current conditions at a location. Temperatures in Celsius, wind in m/s.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentConditions {
    pub location_name: String,
    pub country: String,
    pub temperature_c: f64,
    pub temperature_min_c: f64,
    pub temperature_max_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub wind_direction_deg: Option<u16>,
    pub condition: String,
    pub icon: WeatherIcon,
    pub observation_time: DateTime<Utc>,
    pub utc_offset_secs: i32,
}

/// Per-day temperature range built by [`crate::forecast::aggregate_daily`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySummary {
    pub day_label: String,
    pub min_temperature: f64,
    pub max_temperature: f64,
    /// Icon of the first entry seen for the day.
    pub icon: WeatherIcon,
    pub description: String,
    pub first_seen: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeLabel {
    Now,
    Hour(String),
}

impl TimeLabel {
    pub fn is_now(&self) -> bool {
        matches!(self, TimeLabel::Now)
    }
}

impl fmt::Display for TimeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeLabel::Now => f.write_str("Now"),
            TimeLabel::Hour(label) => f.write_str(label),
        }
    }
}

impl Serialize for TimeLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlySnapshot {
    pub time_label: TimeLabel,
    /// Rounded, for display.
    pub temperature: i32,
    /// Source value in Celsius, for conversion before rounding.
    pub temperature_c: f64,
    pub icon: WeatherIcon,
    pub timestamp: DateTime<Utc>,
}

/// Everything one refresh produces for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastBundle {
    pub current: CurrentConditions,
    pub hourly: Vec<HourlySnapshot>,
    pub daily: Vec<DaySummary>,
}
