use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Status value ip-api reports for a resolved address.
pub const SUCCESS_STATUS: &str = "success";

/// Treat an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Location resolved for an IP address.
///
/// ip-api omits the coordinates and place names when the lookup fails, so
/// missing or `null` fields fall back to their zero value. `status` is kept
/// verbatim so a failure can report what the upstream actually said.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(rename = "lat", default, deserialize_with = "null_as_default")]
    pub latitude: f64,
    #[serde(rename = "lon", default, deserialize_with = "null_as_default")]
    pub longitude: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub country: String,
    /// Failure reason, only present when `status` is not `success`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Location {
    pub fn is_success(&self) -> bool {
        self.status == SUCCESS_STATUS
    }
}

/// Current weather as returned by the weather upstream.
///
/// The inner documents belong to the provider and are relayed untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResponse {
    #[serde(default)]
    pub metadata: Value,
    #[serde(default)]
    pub units: Value,
    #[serde(default)]
    pub data_current: Value,
}
