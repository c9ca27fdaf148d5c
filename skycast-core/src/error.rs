use reqwest::StatusCode;
use thiserror::Error;

/// Coarse classification of a [`WeatherError`], used by callers that only
/// need to know which kind of failure surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    MalformedResponse,
    EmptyResult,
    Configuration,
}

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Request to {endpoint} failed")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} request failed with status {status}: {body}")]
    HttpStatus {
        endpoint: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("Malformed {endpoint} response: {reason}")]
    MalformedResponse {
        endpoint: &'static str,
        reason: String,
    },

    #[error("{endpoint} response contained no forecast entries")]
    EmptyResult { endpoint: &'static str },

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error(
        "No OpenWeather API key configured.\n\
         Hint: export OPENWEATHER_API_KEY or run `skycast configure`."
    )]
    MissingApiKey,

    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),
}

impl WeatherError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport { .. } | Self::HttpStatus { .. } => ErrorKind::Network,
            Self::MalformedResponse { .. } => ErrorKind::MalformedResponse,
            Self::EmptyResult { .. } => ErrorKind::EmptyResult,
            Self::InvalidQuery(_) | Self::MissingApiKey | Self::ClientBuild(_) => {
                ErrorKind::Configuration
            }
        }
    }

    pub(crate) fn malformed(endpoint: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedResponse { endpoint, reason: reason.into() }
    }

    /// One-line message suitable for showing to a user in place of data.
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport { source, .. } if source.is_timeout() => {
                "The weather service did not answer in time.".to_string()
            }
            Self::Transport { .. } => "Network error. Check your connection.".to_string(),
            Self::HttpStatus { status, .. } if *status == StatusCode::UNAUTHORIZED => {
                "The weather service rejected the API key.".to_string()
            }
            Self::HttpStatus { status, .. } if *status == StatusCode::NOT_FOUND => {
                "Location not found.".to_string()
            }
            Self::HttpStatus { status, .. } => {
                format!("The weather service returned an error ({status}).")
            }
            Self::MalformedResponse { .. } => {
                "The weather service sent data that could not be read.".to_string()
            }
            Self::EmptyResult { .. } => "No forecast data is available for this location.".to_string(),
            Self::InvalidQuery(msg) => format!("Invalid location: {msg}"),
            Self::MissingApiKey => {
                "No API key configured. Run `skycast configure` or set OPENWEATHER_API_KEY."
                    .to_string()
            }
            Self::ClientBuild(_) => "Could not initialise the HTTP client.".to_string(),
        }
    }
}

pub type Result<T, E = WeatherError> = std::result::Result<T, E>;
