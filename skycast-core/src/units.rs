//! Unit conventions of the provider and of the display layer.
//!
//! Everything inside the crate is Celsius and metres per second. Provider
//! values are converted while the payload is mapped; display values are
//! converted by the caller that renders them.

use std::fmt;

use serde::{Deserialize, Serialize};

const KELVIN_OFFSET: f64 = 273.15;
const MPS_PER_MPH: f64 = 0.44704;

/// Unit system requested from (and reported by) OpenWeather.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// Kelvin, m/s. What the API returns when no `units` parameter is sent.
    Standard,
    #[default]
    Metric,
    /// Fahrenheit, mph.
    Imperial,
}

impl Units {
    /// Value for the `units` query parameter, `None` for the API default.
    pub fn query_value(self) -> Option<&'static str> {
        match self {
            Units::Standard => None,
            Units::Metric => Some("metric"),
            Units::Imperial => Some("imperial"),
        }
    }

    pub fn to_celsius(self, value: f64) -> f64 {
        match self {
            Units::Standard => value - KELVIN_OFFSET,
            Units::Metric => value,
            Units::Imperial => (value - 32.0) * 5.0 / 9.0,
        }
    }

    pub fn to_meters_per_second(self, speed: f64) -> f64 {
        match self {
            Units::Standard | Units::Metric => speed,
            Units::Imperial => speed * MPS_PER_MPH,
        }
    }
}

impl TryFrom<&str> for Units {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "standard" | "kelvin" => Ok(Units::Standard),
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown unit system '{value}'. Supported: standard, metric, imperial."
            )),
        }
    }
}

/// Temperature unit used when rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn convert(self, celsius: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => celsius,
            TemperatureUnit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemperatureUnit::Celsius => write!(f, "Celsius ({})", self.symbol()),
            TemperatureUnit::Fahrenheit => write!(f, "Fahrenheit ({})", self.symbol()),
        }
    }
}

impl TryFrom<&str> for TemperatureUnit {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "c" | "celsius" => Ok(TemperatureUnit::Celsius),
            "f" | "fahrenheit" => Ok(TemperatureUnit::Fahrenheit),
            _ => Err(anyhow::anyhow!("Unknown temperature unit '{value}'. Use c or f.")),
        }
    }
}
