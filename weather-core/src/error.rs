use thiserror::Error;

/// The third-party API a request was addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Upstream {
    Geolocation,
    Weather,
}

impl Upstream {
    pub fn as_str(&self) -> &'static str {
        match self {
            Upstream::Geolocation => "IP location",
            Upstream::Weather => "weather",
        }
    }
}

impl std::fmt::Display for Upstream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure talking to a single upstream API.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("failed to query {upstream} API: {source}")]
    Network {
        upstream: Upstream,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to read {upstream} API response: {source}")]
    Read {
        upstream: Upstream,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to parse {upstream} API response: {source}")]
    Parse {
        upstream: Upstream,
        #[source]
        source: serde_json::Error,
    },

    #[error("IP location API returned non-success status: {status}{}", detail(.message))]
    Status {
        status: String,
        message: Option<String>,
    },
}

fn detail(message: &Option<String>) -> String {
    match message {
        Some(m) if !m.is_empty() => format!(" ({m})"),
        _ => String::new(),
    }
}

/// Failure of the geolocate-then-fetch pipeline, tagged with the failed stage.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Error getting location: {0}")]
    Location(#[source] UpstreamError),

    #[error("Error getting weather data: {0}")]
    Weather(#[source] UpstreamError),
}
