//! Unit conversion and terminal formatting of temperatures and wind speeds.
//!
//! Samples always carry the provider's native units (Kelvin, m/s). Values are converted
//! into the requested [`UnitSystem`] only when a report is formatted.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::{Result, WeatherError};

const KELVIN_OFFSET: f64 = 273.15;
const MPS_TO_MPH: f64 = 2.236936;
const ANSI_RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UnitSystem {
    /// Fahrenheit and miles per hour.
    Imperial,
    /// Celsius and meters per second.
    #[serde(alias = "SI")]
    Metric,
}

impl UnitSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Imperial => "IMPERIAL",
            UnitSystem::Metric => "METRIC",
        }
    }

    pub const fn all() -> &'static [UnitSystem] {
        &[UnitSystem::Imperial, UnitSystem::Metric]
    }

    /// Convert a native Kelvin reading into this system's temperature unit.
    pub fn temperature_from_kelvin(&self, kelvin: f64) -> f64 {
        let celsius = kelvin - KELVIN_OFFSET;
        match self {
            UnitSystem::Imperial => celsius * 1.8 + 32.0,
            UnitSystem::Metric => celsius,
        }
    }

    /// Convert a native m/s reading into this system's speed unit.
    pub fn speed_from_mps(&self, mps: f64) -> f64 {
        match self {
            UnitSystem::Imperial => mps * MPS_TO_MPH,
            UnitSystem::Metric => mps,
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitSystem {
    type Err = WeatherError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "imperial" => Ok(UnitSystem::Imperial),
            "metric" | "si" => Ok(UnitSystem::Metric),
            _ => Err(WeatherError::UnknownUnitSystem(value.to_string())),
        }
    }
}

/// Terminal color used to render a temperature band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorTag {
    DimCyan,
    Cyan,
    BrightCyan,
    DimYellow,
    Yellow,
    BrightYellow,
    DimRed,
    Red,
    BrightRed,
}

impl ColorTag {
    /// ANSI SGR prefix for this color.
    pub fn ansi(&self) -> &'static str {
        match self {
            ColorTag::DimCyan => "\x1b[2m\x1b[36m",
            ColorTag::Cyan => "\x1b[36m",
            ColorTag::BrightCyan => "\x1b[1m\x1b[36m",
            ColorTag::DimYellow => "\x1b[2m\x1b[33m",
            ColorTag::Yellow => "\x1b[33m",
            ColorTag::BrightYellow => "\x1b[1m\x1b[33m",
            ColorTag::DimRed => "\x1b[2m\x1b[31m",
            ColorTag::Red => "\x1b[31m",
            ColorTag::BrightRed => "\x1b[1m\x1b[31m",
        }
    }

    pub fn paint(&self, text: &str) -> String {
        format!("{}{text}{ANSI_RESET}", self.ansi())
    }
}

/// Half-open `[low, high)` integer Celsius ranges, coldest first.
pub const COLOR_BANDS: [(i32, i32, ColorTag); 9] = [
    (-99, 0, ColorTag::DimCyan),
    (0, 5, ColorTag::Cyan),
    (5, 10, ColorTag::BrightCyan),
    (10, 15, ColorTag::DimYellow),
    (15, 20, ColorTag::Yellow),
    (20, 25, ColorTag::BrightYellow),
    (25, 30, ColorTag::DimRed),
    (30, 35, ColorTag::Red),
    (35, 99, ColorTag::BrightRed),
];

/// Express `value`, given in `unit_system`, in degrees Celsius.
pub fn to_celsius(value: f64, unit_system: UnitSystem) -> f64 {
    match unit_system {
        UnitSystem::Imperial => (value - 32.0) / 1.8,
        UnitSystem::Metric => value,
    }
}

pub fn format_temperature(value: f64, unit_system: UnitSystem) -> String {
    match unit_system {
        UnitSystem::Metric => format!("{value:5.2}°C"),
        UnitSystem::Imperial => format!("{value:6.2}°F"),
    }
}

/// Pick the color band containing the truncated Celsius value of `value`.
///
/// Bands are defined in Celsius, so imperial values are converted first.
pub fn color_band(value: f64, unit_system: UnitSystem) -> Result<ColorTag> {
    let celsius = to_celsius(value, unit_system);
    let whole = celsius.trunc();

    if !whole.is_finite() {
        return Err(WeatherError::OutOfRangeTemperature(celsius));
    }

    let whole = whole as i64;
    COLOR_BANDS
        .iter()
        .find(|(low, high, _)| (i64::from(*low)..i64::from(*high)).contains(&whole))
        .map(|(_, _, tag)| *tag)
        .ok_or(WeatherError::OutOfRangeTemperature(celsius))
}

/// Formatted temperature wrapped in the color of its band.
pub fn paint_temperature(value: f64, unit_system: UnitSystem) -> Result<String> {
    let tag = color_band(value, unit_system)?;
    Ok(tag.paint(&format_temperature(value, unit_system)))
}

pub fn format_wind_speed(value: f64, unit_system: UnitSystem) -> String {
    match unit_system {
        UnitSystem::Metric => format!("{value:5.2} m/s"),
        UnitSystem::Imperial => format!("{value} mph"),
    }
}

pub fn format_percentage(value: u8) -> String {
    format!("{value:5}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_partition_supported_range() {
        for pair in COLOR_BANDS.windows(2) {
            assert_eq!(pair[0].1, pair[1].0, "bands must be contiguous");
        }
        assert_eq!(COLOR_BANDS[0].0, -99);
        assert_eq!(COLOR_BANDS[COLOR_BANDS.len() - 1].1, 99);

        for celsius in -99..99 {
            let matching = COLOR_BANDS
                .iter()
                .filter(|(low, high, _)| (*low..*high).contains(&celsius))
                .count();
            assert_eq!(matching, 1, "{celsius}°C must fall into exactly one band");
            assert!(color_band(f64::from(celsius), UnitSystem::Metric).is_ok());
        }
    }

    #[test]
    fn yellow_and_red_boundaries_are_distinct() {
        assert_eq!(color_band(24.9, UnitSystem::Metric).unwrap(), ColorTag::BrightYellow);
        assert_eq!(color_band(25.0, UnitSystem::Metric).unwrap(), ColorTag::DimRed);
        assert_eq!(color_band(20.0, UnitSystem::Metric).unwrap(), ColorTag::BrightYellow);
        assert_eq!(color_band(19.99, UnitSystem::Metric).unwrap(), ColorTag::Yellow);
        assert_eq!(color_band(34.0, UnitSystem::Metric).unwrap(), ColorTag::Red);
        assert_eq!(color_band(35.0, UnitSystem::Metric).unwrap(), ColorTag::BrightRed);
    }

    #[test]
    fn band_uses_truncation_toward_zero() {
        // -0.5 truncates to 0, which belongs to [0, 5).
        assert_eq!(color_band(-0.5, UnitSystem::Metric).unwrap(), ColorTag::Cyan);
        assert_eq!(color_band(-1.0, UnitSystem::Metric).unwrap(), ColorTag::DimCyan);
        assert_eq!(color_band(-99.9, UnitSystem::Metric).unwrap(), ColorTag::DimCyan);
    }

    #[test]
    fn imperial_values_are_banded_in_celsius() {
        // 80°F is about 26.7°C
        assert_eq!(color_band(80.0, UnitSystem::Imperial).unwrap(), ColorTag::DimRed);
        // 32°F == 0°C
        assert_eq!(color_band(32.0, UnitSystem::Imperial).unwrap(), ColorTag::Cyan);
    }

    #[test]
    fn out_of_range_temperature_is_an_error() {
        assert!(matches!(
            color_band(99.0, UnitSystem::Metric),
            Err(WeatherError::OutOfRangeTemperature(_))
        ));
        assert!(matches!(
            color_band(-100.0, UnitSystem::Metric),
            Err(WeatherError::OutOfRangeTemperature(_))
        ));
        assert!(matches!(
            color_band(f64::NAN, UnitSystem::Metric),
            Err(WeatherError::OutOfRangeTemperature(_))
        ));
    }

    #[test]
    fn imperial_to_celsius_formula() {
        for v in [-40.0, 0.0, 32.0, 50.5, 98.6, 212.0] {
            assert!((to_celsius(v, UnitSystem::Imperial) - (v - 32.0) / 1.8).abs() < 1e-9);
        }
        assert_eq!(to_celsius(21.5, UnitSystem::Metric), 21.5);
    }

    #[test]
    fn temperature_string_has_one_degree_sign_and_unit() {
        for system in UnitSystem::all() {
            for v in [-12.345, 0.0, 7.0, 101.25] {
                let s = format_temperature(v, *system);
                assert_eq!(s.matches('°').count(), 1);
                let unit = if *system == UnitSystem::Metric { 'C' } else { 'F' };
                assert!(s.ends_with(unit), "{s} should end with {unit}");
            }
        }
    }

    #[test]
    fn temperature_string_is_padded() {
        assert_eq!(format_temperature(5.0, UnitSystem::Metric), " 5.00°C");
        assert_eq!(format_temperature(5.0, UnitSystem::Imperial), "  5.00°F");
        assert_eq!(format_temperature(-12.346, UnitSystem::Metric), "-12.35°C");
    }

    #[test]
    fn wind_speed_formatting_is_asymmetric() {
        assert_eq!(format_wind_speed(3.5, UnitSystem::Metric), " 3.50 m/s");
        assert_eq!(format_wind_speed(7.25, UnitSystem::Imperial), "7.25 mph");
        // whole numbers print without a fractional part
        assert_eq!(format_wind_speed(5.0, UnitSystem::Imperial), "5 mph");
    }

    #[test]
    fn painted_temperature_is_wrapped_in_band_color() {
        let s = paint_temperature(12.0, UnitSystem::Metric).unwrap();
        assert!(s.starts_with(ColorTag::DimYellow.ansi()));
        assert!(s.ends_with(ANSI_RESET));
        assert!(s.contains("12.00°C"));
    }

    #[test]
    fn kelvin_and_speed_conversions() {
        assert!((UnitSystem::Metric.temperature_from_kelvin(273.15)).abs() < 1e-9);
        assert!((UnitSystem::Imperial.temperature_from_kelvin(373.15) - 212.0).abs() < 1e-9);
        assert_eq!(UnitSystem::Metric.speed_from_mps(4.0), 4.0);
        assert!((UnitSystem::Imperial.speed_from_mps(1.0) - 2.236936).abs() < 1e-9);
    }

    #[test]
    fn unit_system_parses_case_insensitively() {
        assert_eq!("Imperial".parse::<UnitSystem>().unwrap(), UnitSystem::Imperial);
        assert_eq!("METRIC".parse::<UnitSystem>().unwrap(), UnitSystem::Metric);
        assert_eq!("si".parse::<UnitSystem>().unwrap(), UnitSystem::Metric);

        let err = "kelvin".parse::<UnitSystem>().unwrap_err();
        assert!(err.to_string().contains("unknown unit system"));
    }

    #[test]
    fn percentage_is_padded() {
        assert_eq!(format_percentage(42), "   42%");
    }
}
