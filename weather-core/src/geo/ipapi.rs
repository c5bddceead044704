use async_trait::async_trait;
use reqwest::Client;

use crate::{
    error::{Upstream, UpstreamError},
    http::get_json,
    model::Location,
};

use super::Geolocator;

/// Client for the ip-api.com JSON endpoint.
#[derive(Debug, Clone)]
pub struct IpApiGeolocator {
    base_url: String,
    http: Client,
}

impl IpApiGeolocator {
    pub fn with_base_url(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    fn lookup_url(&self, ip: &str) -> String {
        // An empty ip makes ip-api locate the caller, i.e. this relay.
        format!("{}/json/{}", self.base_url, ip)
    }
}

#[async_trait]
impl Geolocator for IpApiGeolocator {
    async fn locate(&self, ip: &str) -> Result<Location, UpstreamError> {
        let location: Location =
            get_json(self.http.get(self.lookup_url(ip)), Upstream::Geolocation).await?;

        if !location.is_success() {
            return Err(UpstreamError::Status {
                status: location.status,
                message: location.message,
            });
        }

        tracing::debug!(
            "Located {} in {}, {} ({}, {})",
            ip,
            location.city,
            location.country,
            location.latitude,
            location.longitude
        );

        Ok(location)
    }
}
