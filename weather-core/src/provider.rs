use crate::{
    Config, FetchError, WeatherReport, WeatherRequest, provider::wttr::WttrProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod wttr;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Fetch current conditions and the short forecast for one city.
    ///
    /// Implementations must reject an empty city without touching the network.
    async fn fetch_weather(&self, request: &WeatherRequest) -> Result<WeatherReport, FetchError>;
}

/// Construct the weather provider described by `config`.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let provider = WttrProvider::new(config)
        .map_err(|e| anyhow::anyhow!("Failed to initialise HTTP client: {e}"))?;
    Ok(Box::new(provider))
}
