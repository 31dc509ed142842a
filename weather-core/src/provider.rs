use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::Result, model::RawWeatherSample, provider::openweather::OpenWeatherProvider,
};

pub mod openweather;

/// Source of raw weather samples.
///
/// Implementations fail with [`crate::WeatherError::Authorization`] when the token is rejected
/// and [`crate::WeatherError::LocationNotFound`] when the location cannot be resolved.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Latest observation for `location`.
    async fn current(&self, location: &str) -> Result<RawWeatherSample>;

    /// 3-hourly forecast entries for `location`, in provider order.
    async fn forecast_series(&self, location: &str) -> Result<Vec<RawWeatherSample>>;
}

/// Construct the OpenWeather provider for `token`.
pub fn provider_for_token(token: &str) -> Box<dyn WeatherProvider> {
    Box::new(OpenWeatherProvider::new(token.to_owned()))
}
