//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration handling
//! - The wttr.in fetcher and its normalization into display records
//! - The icon loader with its blank fallback
//!
//! It is used by `weather-cli`, but can also be reused by other front ends.

pub mod config;
pub mod error;
pub mod icon;
pub mod model;
pub mod provider;
pub mod units;

pub use config::Config;
pub use error::FetchError;
pub use icon::IconLoader;
pub use model::{CurrentConditions, ForecastDay, UnitSystem, WeatherReport, WeatherRequest};
pub use provider::{WeatherProvider, provider_from_config, wttr::WttrProvider};
