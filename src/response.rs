//! Reply of the Build Trigger API

use serde::{Deserialize, Deserializer};

use crate::error::{Result, TriggerError};

/// Machine tag the platform sends for an accepted trigger
pub const STATUS_OK: &str = "ok";

/// Decoded trigger reply.
///
/// The API names its keys the other way round: the wire key `message`
/// carries the human readable status and the wire key `status` carries
/// the machine tag. Both are mapped as sent so callers keep seeing the
/// upstream naming quirk instead of a silent fix.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct TriggerResponse {
    #[serde(rename = "message", deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(rename = "status", deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(deserialize_with = "null_as_default")]
    pub build_slug: String,
    #[serde(deserialize_with = "null_as_default")]
    pub build_number: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub build_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub triggered_workflow: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl TriggerResponse {
    /// Decode a raw response body. Unknown keys are ignored, missing ones default.
    pub fn decode(body: &[u8]) -> Result<Self> {
        serde_json::from_slice(body).map_err(|e| TriggerError::Decode(e.to_string()))
    }

    /// Whether the platform accepted the trigger. HTTP 200 replies can still carry a refusal.
    pub fn is_ok(&self) -> bool {
        self.message == STATUS_OK
    }
}
