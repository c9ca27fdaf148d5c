//! In-memory provider used by unit tests.

use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use reqwest::StatusCode;

use crate::{
    error::{Result, WeatherError},
    model::{CurrentConditions, ForecastFeed, Query, RawForecastEntry, WeatherIcon},
    provider::WeatherProvider,
};

/// 2024-01-16T12:00:00Z, a Tuesday.
const FEED_START: i64 = 1_705_406_400;

/// Eight 3-hourly entries for Kashgar (UTC+8), starting Tuesday 20:00 local.
pub fn sample_feed() -> ForecastFeed {
    let entries = (0..8)
        .map(|i| {
            let base = 10.0 + i as f64;
            RawForecastEntry {
                timestamp: DateTime::<Utc>::from_timestamp(FEED_START + i * 3 * 3600, 0).unwrap(),
                temperature: base,
                temperature_min: base - 1.0,
                temperature_max: base + 1.0,
                icon_id: "01d".to_string(),
                description: "clear sky".to_string(),
            }
        })
        .collect();

    ForecastFeed {
        city: "Kashgar".to_string(),
        country: "CN".to_string(),
        utc_offset_secs: 8 * 3600,
        entries,
    }
}

#[derive(Debug, Clone)]
pub struct FakeProvider {
    feed: ForecastFeed,
    fail_current: bool,
    delays: HashMap<String, Duration>,
    calls: Arc<Mutex<Vec<&'static str>>>,
}

impl FakeProvider {
    pub fn new(feed: ForecastFeed) -> Self {
        Self {
            feed,
            fail_current: false,
            delays: HashMap::new(),
            calls: Arc::default(),
        }
    }

    pub fn failing_current(mut self) -> Self {
        self.fail_current = true;
        self
    }

    /// Delay every response for `city` by `delay`.
    pub fn with_delay(mut self, city: &str, delay: Duration) -> Self {
        self.delays.insert(city.to_string(), delay);
        self
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().clone()
    }

    async fn pause_for(&self, query: &Query) {
        let Query::City(name) = query else { return };
        if let Some(delay) = self.delays.get(name) {
            tokio::time::sleep(*delay).await;
        }
    }
}

#[async_trait]
impl WeatherProvider for FakeProvider {
    async fn current(&self, query: &Query) -> Result<CurrentConditions> {
        self.calls.lock().push("current");
        self.pause_for(query).await;

        if self.fail_current {
            return Err(WeatherError::HttpStatus {
                endpoint: "weather",
                status: StatusCode::SERVICE_UNAVAILABLE,
                body: String::new(),
            });
        }

        let first = &self.feed.entries[0];
        Ok(CurrentConditions {
            location_name: query.to_string(),
            country: self.feed.country.clone(),
            temperature_c: first.temperature,
            temperature_min_c: first.temperature_min,
            temperature_max_c: first.temperature_max,
            feels_like_c: first.temperature - 2.0,
            humidity_pct: 40,
            wind_speed_mps: 3.0,
            wind_direction_deg: Some(180),
            condition: first.description.clone(),
            icon: WeatherIcon::new(first.icon_id.as_str()),
            observation_time: first.timestamp,
            utc_offset_secs: self.feed.utc_offset_secs,
        })
    }

    async fn forecast(&self, query: &Query) -> Result<ForecastFeed> {
        self.calls.lock().push("forecast");
        self.pause_for(query).await;
        Ok(self.feed.clone())
    }
}
