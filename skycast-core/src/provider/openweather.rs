use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, instrument, warn};

use crate::{
    config::{Config, DEFAULT_BASE_URL},
    error::{Result, WeatherError},
    model::{CurrentConditions, ForecastFeed, Query, RawForecastEntry, WeatherIcon},
    units::Units,
};

use super::{WeatherProvider, validate_query};

const CURRENT_ENDPOINT: &str = "weather";
const FORECAST_ENDPOINT: &str = "forecast";

/// Connection settings for [`OpenWeatherProvider`].
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub base_url: String,
    pub units: Units,
    pub timeout: Duration,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            units: Units::default(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl From<&Config> for ProviderSettings {
    fn from(config: &Config) -> Self {
        Self {
            base_url: config.base_url.clone(),
            units: config.units,
            timeout: config.request_timeout(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    http: Client,
    settings: ProviderSettings,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, settings: ProviderSettings) -> Result<Self> {
        let http = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(WeatherError::ClientBuild)?;

        Ok(Self { api_key, http, settings })
    }

    /// Build a provider from config, resolving the API key from the
    /// environment or the config file.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.api_key().ok_or(WeatherError::MissingApiKey)?;
        Self::new(api_key, ProviderSettings::from(config))
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &'static str, query: &Query) -> Result<T> {
        let url = format!("{}/{endpoint}", self.settings.base_url.trim_end_matches('/'));

        let mut params: Vec<(&str, String)> = match query {
            Query::City(name) => vec![("q", name.trim().to_string())],
            Query::Coordinates { latitude, longitude } => {
                vec![("lat", latitude.to_string()), ("lon", longitude.to_string())]
            }
        };
        params.push(("appid", self.api_key.clone()));
        if let Some(units) = self.settings.units.query_value() {
            params.push(("units", units.to_string()));
        }

        debug!(%url, "sending OpenWeather request");

        let res = self
            .http
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|source| WeatherError::Transport { endpoint, source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| WeatherError::Transport { endpoint, source })?;

        if !status.is_success() {
            warn!(%status, endpoint, "OpenWeather request failed");
            return Err(WeatherError::HttpStatus {
                endpoint,
                status,
                body: truncate_body(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| WeatherError::malformed(endpoint, e.to_string()))
    }

    fn map_current(&self, parsed: OwCurrentResponse) -> Result<CurrentConditions> {
        let units = self.settings.units;
        let weather = first_weather(&parsed.weather, CURRENT_ENDPOINT)?;

        Ok(CurrentConditions {
            location_name: parsed.name,
            country: parsed.sys.country.unwrap_or_default(),
            temperature_c: units.to_celsius(parsed.main.temp),
            temperature_min_c: units.to_celsius(parsed.main.temp_min),
            temperature_max_c: units.to_celsius(parsed.main.temp_max),
            feels_like_c: units.to_celsius(parsed.main.feels_like),
            humidity_pct: parsed.main.humidity,
            wind_speed_mps: units.to_meters_per_second(parsed.wind.speed),
            wind_direction_deg: parsed.wind.deg,
            condition: weather.description.clone(),
            icon: WeatherIcon::new(weather.icon.as_str()),
            observation_time: unix_to_utc(parsed.dt, CURRENT_ENDPOINT)?,
            utc_offset_secs: parsed.timezone,
        })
    }

    fn map_forecast(&self, parsed: OwForecastResponse) -> Result<ForecastFeed> {
        if parsed.list.is_empty() {
            return Err(WeatherError::EmptyResult { endpoint: FORECAST_ENDPOINT });
        }

        let units = self.settings.units;
        let mut entries = parsed
            .list
            .into_iter()
            .map(|e| {
                let weather = first_weather(&e.weather, FORECAST_ENDPOINT)?;
                Ok(RawForecastEntry {
                    timestamp: unix_to_utc(e.dt, FORECAST_ENDPOINT)?,
                    temperature: units.to_celsius(e.main.temp),
                    temperature_min: units.to_celsius(e.main.temp_min),
                    temperature_max: units.to_celsius(e.main.temp_max),
                    icon_id: weather.icon.clone(),
                    description: weather.description.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        if !entries.is_sorted_by_key(|e| e.timestamp) {
            warn!("forecast entries out of order, sorting by timestamp");
            entries.sort_by_key(|e| e.timestamp);
        }

        Ok(ForecastFeed {
            city: parsed.city.name,
            country: parsed.city.country.unwrap_or_default(),
            utc_offset_secs: parsed.city.timezone,
            entries,
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(skip_all, fields(query = %query))]
    async fn current(&self, query: &Query) -> Result<CurrentConditions> {
        validate_query(query)?;
        let parsed: OwCurrentResponse = self.get_json(CURRENT_ENDPOINT, query).await?;
        self.map_current(parsed)
    }

    #[instrument(skip_all, fields(query = %query))]
    async fn forecast(&self, query: &Query) -> Result<ForecastFeed> {
        validate_query(query)?;
        let parsed: OwForecastResponse = self.get_json(FORECAST_ENDPOINT, query).await?;
        let feed = self.map_forecast(parsed)?;
        debug!(entries = feed.entries.len(), city = %feed.city, "forecast feed normalized");
        Ok(feed)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
    temp_min: f64,
    temp_max: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
    #[serde(default)]
    deg: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
struct OwSys {
    #[serde(default)]
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    #[serde(default)]
    name: String,
    dt: i64,
    #[serde(default)]
    timezone: i32,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    #[serde(default)]
    sys: OwSys,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    #[serde(default)]
    name: String,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    timezone: i32,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwForecastMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

fn first_weather<'a>(weather: &'a [OwWeather], endpoint: &'static str) -> Result<&'a OwWeather> {
    weather
        .first()
        .ok_or_else(|| WeatherError::malformed(endpoint, "missing weather[0]"))
}

fn unix_to_utc(ts: i64, endpoint: &'static str) -> Result<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(ts, 0)
        .ok_or_else(|| WeatherError::malformed(endpoint, format!("timestamp {ts} out of range")))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
