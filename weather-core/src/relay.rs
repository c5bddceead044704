//! The geolocate-then-fetch pipeline behind `/getWeather`.

use crate::{
    error::RelayError, geo::Geolocator, model::WeatherResponse, provider::WeatherProvider,
};

/// Resolve `ip` to a location, then fetch the current weather there.
///
/// The weather provider is only called once the lookup reported success.
pub async fn fetch_weather_for_ip(
    geo: &dyn Geolocator,
    weather: &dyn WeatherProvider,
    ip: &str,
) -> Result<WeatherResponse, RelayError> {
    let location = geo.locate(ip).await.map_err(RelayError::Location)?;

    tracing::info!(
        "Resolved {} to {}, {}",
        ip,
        location.city,
        location.country
    );

    weather
        .current_weather(location.latitude, location.longitude)
        .await
        .map_err(RelayError::Weather)
}
