use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::{
    error::{Result, WeatherError},
    model::RawWeatherSample,
};

use super::WeatherProvider;

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

/// OpenWeather client returning samples in the API's standard units (Kelvin, m/s).
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: &str) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    async fn get(&self, endpoint: &str, location: &str) -> Result<String> {
        let url = format!("{}/data/2.5/{endpoint}", self.base_url);
        debug!(%url, location, "querying OpenWeather");

        let res = self
            .http
            .get(&url)
            .query(&[("q", location), ("appid", self.api_key.as_str())])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        match status {
            s if s.is_success() => Ok(body),
            StatusCode::UNAUTHORIZED => Err(WeatherError::Authorization(error_message(&body))),
            StatusCode::NOT_FOUND => Err(WeatherError::LocationNotFound(location.to_string())),
            s => Err(WeatherError::Api {
                status: s.as_u16(),
                body: truncate_body(&body),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    temp_min: f64,
    temp_max: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize, Default)]
struct OwClouds {
    all: u8,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    main: OwMain,
    wind: OwWind,
    #[serde(default)]
    clouds: OwClouds,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    wind: OwWind,
    #[serde(default)]
    clouds: OwClouds,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct OwErrorBody {
    message: String,
}

fn sample(
    location_name: &str,
    dt: i64,
    main: &OwMain,
    wind: &OwWind,
    clouds: &OwClouds,
) -> Result<RawWeatherSample> {
    Ok(RawWeatherSample {
        location_name: location_name.to_string(),
        reference_time: unix_to_utc(dt)?,
        temperature_min_k: main.temp_min,
        temperature_k: main.temp,
        temperature_max_k: main.temp_max,
        wind_speed_mps: wind.speed,
        humidity_pct: main.humidity,
        cloud_coverage_pct: clouds.all,
    })
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, location: &str) -> Result<RawWeatherSample> {
        let body = self.get("weather", location).await?;
        let parsed: OwCurrentResponse = serde_json::from_str(&body)?;

        sample(&parsed.name, parsed.dt, &parsed.main, &parsed.wind, &parsed.clouds)
    }

    async fn forecast_series(&self, location: &str) -> Result<Vec<RawWeatherSample>> {
        let body = self.get("forecast", location).await?;
        let parsed: OwForecastResponse = serde_json::from_str(&body)?;

        parsed
            .list
            .iter()
            .map(|e| sample(&parsed.city.name, e.dt, &e.main, &e.wind, &e.clouds))
            .collect()
    }
}

fn unix_to_utc(ts: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
        .ok_or_else(|| WeatherError::Parse(format!("invalid timestamp {ts}")))
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<OwErrorBody>(body)
        .map(|e| e.message)
        .unwrap_or_else(|_| truncate_body(body))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
