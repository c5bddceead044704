//! HTTP surface of the relay: a single `GET /getWeather` route.

use axum::{
    Json, Router,
    extract::{ConnectInfo, Query, Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use weather_core::{Geolocator, RelayError, WeatherProvider, fetch_weather_for_ip};

use crate::client_ip::{IpSource, resolve_client_ip};

/// Shared state for HTTP handlers
#[derive(Debug, Clone)]
pub struct AppState {
    pub geo: Arc<dyn Geolocator>,
    pub weather: Arc<dyn WeatherProvider>,
}

/// First `ip` value of the query string; later repeats are ignored.
fn query_ip(params: &[(String, String)]) -> Option<&str> {
    params
        .iter()
        .find(|(key, _)| key == "ip")
        .map(|(_, value)| value.as_str())
}

/// Relay failure rendered as a plain-text 500.
#[derive(Debug)]
pub struct ApiError(RelayError);

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.0.to_string();
        tracing::error!("{}", message);
        (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
    }
}

/// GET /getWeather - Current weather at the caller's (or `ip`'s) location
async fn get_weather(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
    request: Request,
) -> Result<Response, ApiError> {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string());

    let client = resolve_client_ip(query_ip(&params), request.headers(), peer.as_deref());
    match client.source {
        IpSource::Query => tracing::info!("Using IP from request parameter: {}", client.ip),
        IpSource::ForwardedFor | IpSource::Peer => {
            tracing::info!("Detected client IP: {}", client.ip)
        }
    }

    let weather =
        fetch_weather_for_ip(state.geo.as_ref(), state.weather.as_ref(), &client.ip).await?;

    Ok((StatusCode::OK, Json(weather)).into_response())
}

/// Create the HTTP router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/getWeather", get(get_weather))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
