use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder};
use serde::de::{self, DeserializeOwned};
use serde_json::Value;
use std::time::Duration;

use crate::error::{Upstream, UpstreamError};

const USER_AGENT: &str = concat!("weather-relay/", env!("CARGO_PKG_VERSION"));

/// Build the outbound client shared by both upstreams.
///
/// Without a timeout a stalled upstream holds the request open indefinitely.
pub fn build_client(timeout: Option<Duration>) -> Result<Client> {
    let mut builder = Client::builder().user_agent(USER_AGENT);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }

    builder.build().context("Failed to build HTTP client")
}

/// Send `request` and decode the JSON body.
///
/// The HTTP status is only logged; callers decide from the payload itself
/// whether the upstream succeeded.
pub(crate) async fn get_json<T: DeserializeOwned>(
    request: RequestBuilder,
    upstream: Upstream,
) -> Result<T, UpstreamError> {
    let res = request
        .send()
        .await
        .map_err(|source| UpstreamError::Network { upstream, source })?;

    let status = res.status();
    let body = res
        .bytes()
        .await
        .map_err(|source| UpstreamError::Read { upstream, source })?;

    if !status.is_success() {
        tracing::warn!(
            "{} API responded with status {}: {}",
            upstream,
            status,
            truncate_body(&String::from_utf8_lossy(&body)),
        );
    }

    decode_object(&body).map_err(|source| UpstreamError::Parse { upstream, source })
}

/// Decode `body` into `T`, accepting only a top-level JSON object.
///
/// Derived struct deserializers also take arrays, which no upstream sends.
pub(crate) fn decode_object<T: DeserializeOwned>(body: &[u8]) -> serde_json::Result<T> {
    let value: Value = serde_json::from_slice(body)?;
    if !value.is_object() {
        return Err(de::Error::custom(format!(
            "expected a JSON object, found {}",
            kind(&value)
        )));
    }

    serde_json::from_value(value)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Shorten an upstream body for log output.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
