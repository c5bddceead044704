//! Core library for the weather relay.
//!
//! This crate defines:
//! - Configuration resolution (flags, environment, config file)
//! - Clients for the geolocation and weather upstreams
//! - The relay pipeline tying them together
//! - Shared domain models (locations, weather payloads) and errors
//!
//! It is used by `weather-server`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod geo;
pub mod http;
pub mod model;
pub mod provider;
pub mod relay;

pub use config::{Config, ConfigOverrides, FileConfig};
pub use error::{RelayError, Upstream, UpstreamError};
pub use geo::Geolocator;
pub use model::{Location, SUCCESS_STATUS, WeatherResponse};
pub use provider::WeatherProvider;
pub use relay::fetch_weather_for_ip;
