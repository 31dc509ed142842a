use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::{
    error::{Result, WeatherError},
    units::UnitSystem,
};

/// Which slot a report describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastMode {
    /// The latest observation.
    Today,
    /// Tomorrow's 3-hour forecast bucket at a given hour.
    Tomorrow,
}

impl ForecastMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForecastMode::Today => "today",
            ForecastMode::Tomorrow => "tomorrow",
        }
    }

    /// Capitalized name used in report headings.
    pub fn title(&self) -> &'static str {
        match self {
            ForecastMode::Today => "Today",
            ForecastMode::Tomorrow => "Tomorrow",
        }
    }

    pub fn needs_forecast(&self) -> bool {
        matches!(self, ForecastMode::Tomorrow)
    }
}

impl fmt::Display for ForecastMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ForecastMode {
    type Err = WeatherError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "today" | "current" => Ok(ForecastMode::Today),
            "tomorrow" => Ok(ForecastMode::Tomorrow),
            _ => Err(WeatherError::UnknownMode(value.to_string())),
        }
    }
}

/// One observation or forecast entry, in the provider's native units (Kelvin, m/s).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawWeatherSample {
    pub location_name: String,
    pub reference_time: DateTime<Utc>,
    pub temperature_min_k: f64,
    pub temperature_k: f64,
    pub temperature_max_k: f64,
    pub wind_speed_mps: f64,
    pub humidity_pct: u8,
    pub cloud_coverage_pct: u8,
}

/// Color-coded, unit-suffixed report meant for the terminal.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayReport {
    pub date: DateTime<Utc>,
    pub location: String,
    pub unit_system: UnitSystem,
    pub temperature_min: String,
    pub temperature_now: String,
    pub temperature_max: String,
    pub wind_speed: String,
    pub humidity: String,
    pub cloud_coverage: String,
}

impl DisplayReport {
    /// Field name / value pairs in display order, excluding the date.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Location", self.location.clone()),
            ("UnitSystem", self.unit_system.to_string()),
            ("TemperatureMin", self.temperature_min.clone()),
            ("TemperatureNow", self.temperature_now.clone()),
            ("TemperatureMax", self.temperature_max.clone()),
            ("WindSpeed", self.wind_speed.clone()),
            ("Humidity", self.humidity.clone()),
            ("CloudCoverage", self.cloud_coverage.clone()),
        ]
    }
}

/// Plain-number report persisted to history and CSV exports.
///
/// Numbers stay in the provider's native units so that a record always equals the sample
/// it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRecord {
    pub timestamp: DateTime<Utc>,
    pub location: String,
    pub unit_system: UnitSystem,
    pub temperature_min_k: f64,
    pub temperature_now_k: f64,
    pub temperature_max_k: f64,
    pub wind_speed_mps: f64,
    pub humidity_pct: u8,
    pub cloud_coverage_pct: u8,
}

impl ReportRecord {
    pub fn from_sample(
        sample: &RawWeatherSample,
        timestamp: DateTime<Utc>,
        location: &str,
        unit_system: UnitSystem,
    ) -> Self {
        Self {
            timestamp,
            location: location.to_string(),
            unit_system,
            temperature_min_k: sample.temperature_min_k,
            temperature_now_k: sample.temperature_k,
            temperature_max_k: sample.temperature_max_k,
            wind_speed_mps: sample.wind_speed_mps,
            humidity_pct: sample.humidity_pct,
            cloud_coverage_pct: sample.cloud_coverage_pct,
        }
    }
}

/// Both report variants, built from one sample.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub display: DisplayReport,
    pub record: Option<ReportRecord>,
}
