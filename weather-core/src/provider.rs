use crate::{
    Config, WeatherResponse, error::UpstreamError, provider::meteoblue::MeteoblueProvider,
};
use async_trait::async_trait;
use reqwest::Client;
use std::fmt::Debug;

pub mod meteoblue;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions at the given coordinates, relayed as the provider sent them.
    async fn current_weather(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherResponse, UpstreamError>;
}

/// Construct the weather provider described by `config`.
pub fn provider_from_config(config: &Config, http: Client) -> Box<dyn WeatherProvider> {
    Box::new(MeteoblueProvider::with_base_url(
        http,
        config.api_key.clone(),
        config.weather_base_url.clone(),
    ))
}
