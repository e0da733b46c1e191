//! Unit conversion and suffix formatting shared by the normalizers.

use chrono::NaiveDate;

use crate::{error::FetchError, model::UnitSystem};

const MPH_PER_KMPH: f64 = 0.621371;

/// Converts km/h to mph, rounded to one decimal place.
pub fn kmph_to_mph(kmph: f64) -> f64 {
    (kmph * MPH_PER_KMPH * 10.0).round() / 10.0
}

/// Picks the Celsius or Fahrenheit reading and appends its suffix.
pub fn format_temperature(celsius: &str, fahrenheit: &str, units: UnitSystem) -> String {
    let value = match units {
        UnitSystem::Metric => celsius,
        UnitSystem::Imperial => fahrenheit,
    };
    format!("{value}{}", units.temperature_suffix())
}

/// Metric keeps the provider's km/h text untouched; imperial converts it.
pub fn format_wind_speed(kmph: &str, units: UnitSystem) -> Result<String, FetchError> {
    match units {
        UnitSystem::Metric => Ok(format!("{kmph} km/h")),
        UnitSystem::Imperial => {
            let value: f64 = kmph
                .trim()
                .parse()
                .map_err(|_| FetchError::Malformed(format!("invalid wind speed '{kmph}'")))?;
            Ok(format!("{:.1} mph", kmph_to_mph(value)))
        }
    }
}

/// Full English weekday name for an ISO `YYYY-MM-DD` date.
pub fn weekday_name(date: &str) -> Result<String, FetchError> {
    let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|e| FetchError::Malformed(format!("invalid date '{date}': {e}")))?;
    Ok(parsed.format("%A").to_string())
}
