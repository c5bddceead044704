use crate::{Config, Location, error::UpstreamError, geo::ipapi::IpApiGeolocator};
use async_trait::async_trait;
use reqwest::Client;
use std::fmt::Debug;

pub mod ipapi;

/// Resolves an IP address to a geographic location.
#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    /// Returns the location only when the lookup reported success.
    async fn locate(&self, ip: &str) -> Result<Location, UpstreamError>;
}

/// Construct the geolocation client described by `config`.
pub fn geolocator_from_config(config: &Config, http: Client) -> Box<dyn Geolocator> {
    Box::new(IpApiGeolocator::with_base_url(http, config.geo_base_url.clone()))
}
