//! Log retrieval DTOs

use serde::{Deserialize, Deserializer, Serialize};

/// Request body for `POST /rofl-scheduler/v1/logs/get`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsRequest {
    pub instance_id: String,
}

/// Response body of a successful log fetch
///
/// A missing or null `logs` value means no output yet. Any other value that
/// is not an array of strings fails deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogsResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub logs: Vec<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
