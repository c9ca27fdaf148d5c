use tracing::debug;

use crate::{
    config::Config,
    error::Result,
    forecast::{aggregate_daily, extract_hourly, zone_for_offset},
    model::{CurrentConditions, DaySummary, ForecastBundle, ForecastFeed, HourlySnapshot, Query},
    provider::WeatherProvider,
};

/// Fetches from a provider and shapes the feed for display.
///
/// Labels are computed in the location's own UTC offset as reported by the
/// provider, so a forecast for Kashgar buckets by Kashgar days.
#[derive(Debug, Clone)]
pub struct WeatherService<P> {
    provider: P,
    hourly_window: usize,
    day_limit: usize,
}

impl<P: WeatherProvider> WeatherService<P> {
    pub fn new(provider: P, hourly_window: usize, day_limit: usize) -> Self {
        Self { provider, hourly_window, day_limit }
    }

    pub fn with_config(provider: P, config: &Config) -> Self {
        Self::new(provider, config.hourly_window, config.day_limit)
    }

    pub async fn current(&self, query: &Query) -> Result<CurrentConditions> {
        self.provider.current(query).await
    }

    pub async fn hourly(&self, query: &Query) -> Result<Vec<HourlySnapshot>> {
        let feed = self.provider.forecast(query).await?;
        Ok(self.hourly_from(&feed))
    }

    pub async fn daily(&self, query: &Query) -> Result<Vec<DaySummary>> {
        let feed = self.provider.forecast(query).await?;
        Ok(self.daily_from(&feed))
    }

    /// Current conditions, then one forecast request feeding both views.
    /// The second request starts only after the first has completed.
    pub async fn bundle(&self, query: &Query) -> Result<ForecastBundle> {
        let current = self.provider.current(query).await?;
        let feed = self.provider.forecast(query).await?;

        let bundle = ForecastBundle {
            current,
            hourly: self.hourly_from(&feed),
            daily: self.daily_from(&feed),
        };
        debug!(
            hourly = bundle.hourly.len(),
            daily = bundle.daily.len(),
            "forecast bundle assembled"
        );
        Ok(bundle)
    }

    fn hourly_from(&self, feed: &ForecastFeed) -> Vec<HourlySnapshot> {
        extract_hourly(&feed.entries, self.hourly_window, &zone_for_offset(feed.utc_offset_secs))
    }

    fn daily_from(&self, feed: &ForecastFeed) -> Vec<DaySummary> {
        aggregate_daily(&feed.entries, self.day_limit, &zone_for_offset(feed.utc_offset_secs))
    }
}
