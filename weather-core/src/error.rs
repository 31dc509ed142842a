use thiserror::Error;

use crate::config::ConfigKey;

/// Errors produced while building a weather report.
///
/// Each failure keeps its own variant so the CLI can tell an expired token apart from a
/// misspelled city or a forecast slot that the provider simply did not return.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("{0} is not a valid forecast hour; it must be a multiple of 3 between 0 and 21")]
    InvalidHour(u32),

    #[error("temperature {0:.2}°C is outside the supported range [-99, 99)")]
    OutOfRangeTemperature(f64),

    #[error("no forecast data for tomorrow at {hour:02}:00 UTC")]
    ForecastNotFound { hour: u32 },

    #[error("provider rejected the API token: {0}")]
    Authorization(String),

    #[error("location '{0}' could not be found")]
    LocationNotFound(String),

    #[error("no {} configured.\nHint: pass --{} or run `weather config --{}` first.", .0, .0.flag(), .0.flag())]
    ConfigurationMissing(ConfigKey),

    #[error("unknown unit system '{0}'. Supported unit systems: imperial, metric")]
    UnknownUnitSystem(String),

    #[error("unknown mode '{0}'. Supported modes: today, tomorrow")]
    UnknownMode(String),

    #[error("provider request failed with status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("failed to reach weather provider: {0}")]
    Network(#[from] reqwest::Error),

    #[error("failed to parse provider response: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for WeatherError {
    fn from(err: serde_json::Error) -> Self {
        WeatherError::Parse(err.to_string())
    }
}

pub type Result<T, E = WeatherError> = std::result::Result<T, E>;
