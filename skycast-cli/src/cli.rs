use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Select, Text};
use serde::Serialize;
use skycast_core::{
    Config, FetchState, ForecastSession, OpenWeatherProvider, Query, TemperatureUnit,
    WeatherService,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Current, hourly and 5-day weather from OpenWeather")]
pub struct Cli {
    /// Print records as JSON (temperatures in Celsius).
    #[arg(long, global = true)]
    pub json: bool,

    /// Display unit: c or f. Defaults to the configured unit.
    #[arg(long, global = true, value_parser = parse_display_unit)]
    pub units: Option<TemperatureUnit>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key and preferences.
    Configure,

    /// Current conditions.
    Now {
        #[command(flatten)]
        location: LocationArgs,
    },

    /// Hourly snapshots, led by "Now".
    Hourly {
        #[command(flatten)]
        location: LocationArgs,

        /// Snapshots after "Now"; defaults to the configured window.
        #[arg(long)]
        hours: Option<usize>,
    },

    /// One summary per day.
    Daily {
        #[command(flatten)]
        location: LocationArgs,

        /// Number of days; defaults to the configured limit.
        #[arg(long)]
        days: Option<usize>,
    },

    /// Current conditions, hourly snapshots and day summaries.
    Show {
        #[command(flatten)]
        location: LocationArgs,
    },
}

#[derive(Debug, Args)]
pub struct LocationArgs {
    /// City name; falls back to the configured default city.
    pub city: Option<String>,

    #[arg(long, requires = "lon", conflicts_with = "city", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    #[arg(long, requires = "lat", conflicts_with = "city", allow_negative_numbers = true)]
    pub lon: Option<f64>,
}

impl LocationArgs {
    fn query(&self, config: &Config) -> anyhow::Result<Query> {
        match (&self.city, self.lat, self.lon) {
            (Some(city), _, _) => Ok(Query::city(city.as_str())),
            (None, Some(lat), Some(lon)) => Ok(Query::coordinates(lat, lon)),
            _ => config.default_query(),
        }
    }
}

fn parse_display_unit(value: &str) -> Result<TemperatureUnit, String> {
    TemperatureUnit::try_from(value).map_err(|e| e.to_string())
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;
        let unit = self.units.unwrap_or(config.display_unit);

        match self.command {
            Command::Configure => configure(&mut config)?,
            Command::Now { location } => {
                let query = location.query(&config)?;
                let current = service(&config)?.current(&query).await?;
                emit(self.json, &current, || render::current(&current, unit))?;
            }
            Command::Hourly { location, hours } => {
                let query = location.query(&config)?;
                if let Some(hours) = hours {
                    config.hourly_window = hours;
                }
                let hourly = service(&config)?.hourly(&query).await?;
                emit(self.json, &hourly, || render::hourly(&hourly, unit))?;
            }
            Command::Daily { location, days } => {
                let query = location.query(&config)?;
                if let Some(days) = days {
                    config.day_limit = days;
                }
                let daily = service(&config)?.daily(&query).await?;
                emit(self.json, &daily, || render::daily(&daily, unit))?;
            }
            Command::Show { location } => {
                let query = location.query(&config)?;
                let service = service(&config)?;
                let session = ForecastSession::new();
                session.refresh(&service, &query).await;

                match session.state() {
                    FetchState::Ready(bundle) => {
                        emit(self.json, &bundle, || render::bundle(&bundle, unit))?;
                    }
                    FetchState::Failed(msg) => bail!(msg),
                    state => bail!("Refresh did not finish (state: {state:?})"),
                }
            }
        }

        Ok(())
    }
}

fn service(config: &Config) -> anyhow::Result<WeatherService<OpenWeatherProvider>> {
    let provider = OpenWeatherProvider::from_config(config)?;
    Ok(WeatherService::with_config(provider, config))
}

fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce() -> String) -> anyhow::Result<()> {
    if json {
        let out = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
        println!("{out}");
    } else {
        print!("{}", text());
    }
    Ok(())
}

fn configure(config: &mut Config) -> anyhow::Result<()> {
    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Leave empty to keep the current key")
        .prompt()
        .context("Failed to read API key")?;
    if !api_key.trim().is_empty() {
        config.set_api_key(api_key);
    }

    let city = Text::new("Default city:")
        .with_initial_value(config.default_city.as_deref().unwrap_or_default())
        .prompt()
        .context("Failed to read default city")?;
    config.default_city = Some(city.trim().to_string()).filter(|c| !c.is_empty());

    let unit = Select::new("Display unit:", vec![TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit])
        .with_starting_cursor(usize::from(config.display_unit == TemperatureUnit::Fahrenheit))
        .prompt()
        .context("Failed to read display unit")?;
    config.display_unit = unit;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}
