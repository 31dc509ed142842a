//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Unit conversion, temperature color bands and field formatting
//! - Selection of tomorrow's 3-hour forecast slot
//! - Report building on top of an abstract weather provider (OpenWeather by default)
//! - Configuration, report history and CSV export stores
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod forecast;
pub mod model;
pub mod provider;
pub mod report;
pub mod store;
pub mod units;

pub use config::{Config, ConfigKey};
pub use error::WeatherError;
pub use model::{DisplayReport, ForecastMode, RawWeatherSample, ReportRecord, WeatherReport};
pub use provider::WeatherProvider;
pub use report::{ReportBuilder, ReportRequest, ReportSettings};
pub use store::{HistoryStore, ReportStore};
pub use units::{ColorTag, UnitSystem};
