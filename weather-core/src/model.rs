use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Which parallel set of upstream fields a report is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// Celsius and km/h.
    #[default]
    Metric,
    /// Fahrenheit and mph.
    Imperial,
}

impl UnitSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }

    pub const fn all() -> &'static [UnitSystem] {
        &[UnitSystem::Metric, UnitSystem::Imperial]
    }

    pub fn temperature_suffix(&self) -> &'static str {
        match self {
            UnitSystem::Metric => " °C",
            UnitSystem::Imperial => " °F",
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitSystem {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "metric" | "m" => Ok(UnitSystem::Metric),
            "imperial" | "u" => Ok(UnitSystem::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown unit system '{value}'. Supported: metric, imperial."
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WeatherRequest {
    pub city: String,
    pub units: UnitSystem,
}

impl WeatherRequest {
    pub fn new(city: impl Into<String>, units: UnitSystem) -> Self {
        Self { city: city.into(), units }
    }
}

/// Snapshot of the weather at request time. Every field is display-ready.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub location: String,
    pub temp: String,
    pub feels_like: String,
    pub conditions: String,
    pub wind: String,
    pub humidity: String,
    pub pressure: String,
    pub visibility: String,
    pub uv_index: String,
    pub sunrise: String,
    pub sunset: String,
    pub icon_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastDay {
    /// ISO date, `YYYY-MM-DD`.
    pub date: String,
    pub day_name: String,
    pub avg_temp: String,
    pub max_temp: String,
    pub min_temp: String,
    pub description: String,
    pub wind: String,
    pub icon_url: String,
}

/// One fetch worth of display records. Forecast days are in chronological order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub current: CurrentConditions,
    pub forecast: Vec<ForecastDay>,
}
