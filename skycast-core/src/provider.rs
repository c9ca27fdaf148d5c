use crate::{
    error::{Result, WeatherError},
    model::{CurrentConditions, ForecastFeed, Query},
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Source of normalized weather data. Implementations convert provider
/// units to Celsius before returning.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, query: &Query) -> Result<CurrentConditions>;

    /// Forecast feed ordered by timestamp. Never empty on success.
    async fn forecast(&self, query: &Query) -> Result<ForecastFeed>;
}

/// Reject queries that cannot name a location before any request is made.
pub fn validate_query(query: &Query) -> Result<()> {
    match query {
        Query::City(name) if name.trim().is_empty() => {
            Err(WeatherError::InvalidQuery("city name is empty".to_string()))
        }
        Query::City(_) => Ok(()),
        Query::Coordinates { latitude, longitude } => {
            if !(-90.0..=90.0).contains(latitude) {
                return Err(WeatherError::InvalidQuery(format!(
                    "latitude {latitude} must be between -90 and 90"
                )));
            }
            if !(-180.0..=180.0).contains(longitude) {
                return Err(WeatherError::InvalidQuery(format!(
                    "longitude {longitude} must be between -180 and 180"
                )));
            }
            Ok(())
        }
    }
}
