//! Turning provider samples into display and persistable reports.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::{
    config::{Config, ConfigKey},
    error::{Result, WeatherError},
    forecast::{select_forecast, validate_hour},
    model::{DisplayReport, ForecastMode, RawWeatherSample, ReportRecord, WeatherReport},
    provider::{WeatherProvider, provider_for_token},
    units::{UnitSystem, format_percentage, format_wind_speed, paint_temperature},
};

/// Token, location and unit system after applying overrides on top of the stored config.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSettings {
    pub token: String,
    pub location: String,
    pub unit_system: UnitSystem,
}

impl ReportSettings {
    /// Take each key from `overrides` when set, otherwise from `config`.
    pub fn resolve(overrides: &Config, config: &Config) -> Result<Self> {
        let mut merged = config.clone();
        merged.merge(overrides);

        Ok(Self {
            token: merged.token.ok_or(WeatherError::ConfigurationMissing(ConfigKey::Token))?,
            location: merged
                .location
                .ok_or(WeatherError::ConfigurationMissing(ConfigKey::Location))?,
            unit_system: merged
                .unit_system
                .ok_or(WeatherError::ConfigurationMissing(ConfigKey::UnitSystem))?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportRequest {
    pub location: String,
    pub unit_system: UnitSystem,
    pub mode: ForecastMode,
    /// Target hour for [`ForecastMode::Tomorrow`]; ignored otherwise.
    pub hour: u32,
    /// Also produce the raw [`ReportRecord`].
    pub persist: bool,
}

/// Capitalize the first letter of every whitespace-separated word and lowercase the rest.
pub fn normalize_location(location: &str) -> String {
    location
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Builds one report per call with a single provider query and no retries.
#[derive(Debug)]
pub struct ReportBuilder {
    provider: Box<dyn WeatherProvider>,
    now: Option<DateTime<Utc>>,
}

impl ReportBuilder {
    pub fn new(provider: Box<dyn WeatherProvider>) -> Self {
        Self { provider, now: None }
    }

    /// Builder backed by the OpenWeather provider.
    pub fn for_token(token: &str) -> Self {
        Self::new(provider_for_token(token))
    }

    /// Pin the reference time instead of reading the clock at the start of each build.
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    pub async fn build(&self, request: &ReportRequest) -> Result<WeatherReport> {
        let now = self.now.unwrap_or_else(Utc::now);
        let location = normalize_location(&request.location);
        let unit_system = request.unit_system;

        let (sample, date) = match request.mode {
            ForecastMode::Today => {
                let sample = self.provider.current(&location).await?;
                (sample, now)
            }
            ForecastMode::Tomorrow => {
                let hour = validate_hour(request.hour)?;
                let series = self.provider.forecast_series(&location).await?;
                debug!(entries = series.len(), "received forecast series");
                let sample = select_forecast(&series, now, hour)?.clone();
                let date = sample.reference_time;
                (sample, date)
            }
        };

        let display = display_report(&sample, date, &location, unit_system)?;
        let record = request
            .persist
            .then(|| ReportRecord::from_sample(&sample, date, &location, unit_system));

        info!(location = %location, mode = %request.mode, %date, "built weather report");

        Ok(WeatherReport { display, record })
    }
}

fn display_report(
    sample: &RawWeatherSample,
    date: DateTime<Utc>,
    location: &str,
    unit_system: UnitSystem,
) -> Result<DisplayReport> {
    let temperature =
        |kelvin: f64| paint_temperature(unit_system.temperature_from_kelvin(kelvin), unit_system);
    let wind_speed = unit_system.speed_from_mps(sample.wind_speed_mps);

    Ok(DisplayReport {
        date,
        location: location.to_string(),
        unit_system,
        temperature_min: temperature(sample.temperature_min_k)?,
        temperature_now: temperature(sample.temperature_k)?,
        temperature_max: temperature(sample.temperature_max_k)?,
        wind_speed: format_wind_speed(wind_speed, unit_system),
        humidity: format_percentage(sample.humidity_pct),
        cloud_coverage: format_percentage(sample.cloud_coverage_pct),
    })
}
