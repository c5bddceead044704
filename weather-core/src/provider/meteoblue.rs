use async_trait::async_trait;
use reqwest::Client;

use crate::{
    error::{Upstream, UpstreamError},
    http::get_json,
    model::WeatherResponse,
};

use super::WeatherProvider;

#[derive(Clone)]
pub struct MeteoblueProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl MeteoblueProvider {
    pub fn with_base_url(http: Client, api_key: String, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { api_key, base_url, http }
    }

    fn current_url(&self) -> String {
        format!("{}/packages/current", self.base_url)
    }
}

impl std::fmt::Debug for MeteoblueProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeteoblueProvider")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Fixed-point with six fractional digits, e.g. `40.700000`.
fn format_coordinate(value: f64) -> String {
    format!("{value:.6}")
}

#[async_trait]
impl WeatherProvider for MeteoblueProvider {
    async fn current_weather(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherResponse, UpstreamError> {
        let lat = format_coordinate(latitude);
        let lon = format_coordinate(longitude);

        let request = self.http.get(self.current_url()).query(&[
            ("apikey", self.api_key.as_str()),
            ("lat", lat.as_str()),
            ("lon", lon.as_str()),
            ("format", "json"),
        ]);

        tracing::debug!("Fetching current weather for lat={} lon={}", lat, lon);

        get_json(request, Upstream::Weather).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> MeteoblueProvider {
        MeteoblueProvider::with_base_url(Client::new(), "KEY".to_string(), server.uri())
    }

    #[test]
    fn coordinates_use_six_decimals() {
        assert_eq!(format_coordinate(40.7), "40.700000");
        assert_eq!(format_coordinate(-74.0), "-74.000000");
        assert_eq!(format_coordinate(51.5074456), "51.507446");
    }

    #[test]
    fn current_url_ignores_trailing_slash() {
        let provider =
            MeteoblueProvider::with_base_url(Client::new(), "KEY".to_string(), "http://wx.test/");
        assert_eq!(provider.current_url(), "http://wx.test/packages/current");
    }

    #[tokio::test]
    async fn current_weather_sends_key_and_coordinates() {
        let server = MockServer::start().await;
        let payload = json!({
            "metadata": { "name": "", "latitude": 40.7 },
            "units": { "temperature": "C" },
            "data_current": { "temperature": 20.5 }
        });

        Mock::given(method("GET"))
            .and(path("/packages/current"))
            .and(query_param("apikey", "KEY"))
            .and(query_param("lat", "40.700000"))
            .and(query_param("lon", "-74.000000"))
            .and(query_param("format", "json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(payload.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let weather = provider_for(&server).current_weather(40.7, -74.0).await.unwrap();

        assert_eq!(serde_json::to_value(&weather).unwrap(), payload);
    }

    #[tokio::test]
    async fn error_payloads_are_relayed_as_is() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/packages/current"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(json!({ "error": true, "error_message": "invalid key" })),
            )
            .mount(&server)
            .await;

        let weather = provider_for(&server).current_weather(1.0, 2.0).await.unwrap();

        assert!(weather.metadata.is_null());
        assert!(weather.units.is_null());
        assert!(weather.data_current.is_null());
    }

    #[tokio::test]
    async fn current_weather_rejects_array_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 2])))
            .mount(&server)
            .await;

        let err = provider_for(&server).current_weather(1.0, 2.0).await.unwrap_err();

        assert!(matches!(err, UpstreamError::Parse { upstream: Upstream::Weather, .. }));
        assert!(err.to_string().contains("expected a JSON object, found an array"));
    }

    #[tokio::test]
    async fn current_weather_invalid_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = provider_for(&server).current_weather(1.0, 2.0).await.unwrap_err();

        assert!(matches!(err, UpstreamError::Parse { upstream: Upstream::Weather, .. }));
        assert!(err.to_string().starts_with("failed to parse weather API response"));
    }

    #[tokio::test]
    async fn current_weather_connection_refused() {
        let provider = MeteoblueProvider::with_base_url(
            Client::new(),
            "KEY".to_string(),
            "http://127.0.0.1:1",
        );

        let err = provider.current_weather(1.0, 2.0).await.unwrap_err();

        assert!(matches!(err, UpstreamError::Network { upstream: Upstream::Weather, .. }));
        assert!(err.to_string().starts_with("failed to query weather API"));
    }
}
