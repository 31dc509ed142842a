//! Selection of tomorrow's 3-hour forecast slot.
//!
//! "Tomorrow" compares the day-of-month of each sample against the day-of-month of the
//! reference time. Across a month boundary (e.g. now = Jan 31, sample = Feb 1) no sample has a
//! larger day-of-month, so the lookup reports [`WeatherError::ForecastNotFound`].

use chrono::{DateTime, Datelike, Timelike, Utc};
use tracing::debug;

use crate::{
    error::{Result, WeatherError},
    model::RawWeatherSample,
};

/// Step between forecast entries, in hours.
pub const FORECAST_INTERVAL_HOURS: u32 = 3;

/// Check that `hour` names a forecast slot: a multiple of 3 in `[0, 24)`.
pub fn validate_hour(hour: u32) -> Result<u32> {
    if hour % FORECAST_INTERVAL_HOURS != 0 || hour >= 24 {
        return Err(WeatherError::InvalidHour(hour));
    }
    Ok(hour)
}

/// Return the first sample, in provider order, whose UTC day-of-month is later than that of
/// `now` and whose UTC hour equals `hour`.
pub fn select_forecast<'a>(
    samples: &'a [RawWeatherSample],
    now: DateTime<Utc>,
    hour: u32,
) -> Result<&'a RawWeatherSample> {
    let hour = validate_hour(hour)?;
    let today = now.day();

    let selected = samples
        .iter()
        .find(|s| s.reference_time.day() > today && s.reference_time.hour() == hour)
        .ok_or(WeatherError::ForecastNotFound { hour })?;

    debug!(
        reference_time = %selected.reference_time,
        hour,
        candidates = samples.len(),
        "selected forecast slot"
    );

    Ok(selected)
}
