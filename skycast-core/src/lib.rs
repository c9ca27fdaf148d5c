//! Core library for the `skycast` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather provider, normalizing every payload to Celsius
//! - Pure forecast transforms (daily aggregation, hourly snapshots)
//! - A latest-wins session for repeated refreshes
//!
//! It is used by `skycast-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod forecast;
pub mod model;
pub mod provider;
pub mod service;
pub mod session;
pub mod units;

#[cfg(test)]
pub(crate) mod testing;

pub use config::Config;
pub use error::{ErrorKind, WeatherError};
pub use forecast::{aggregate_daily, extract_hourly};
pub use model::{
    CurrentConditions, DaySummary, ForecastBundle, ForecastFeed, HourlySnapshot, Query,
    RawForecastEntry, TimeLabel, WeatherIcon,
};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider};
pub use service::WeatherService;
pub use session::{Applied, FetchState, ForecastSession};
pub use units::{TemperatureUnit, Units};
