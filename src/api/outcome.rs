use serde::Serialize;
use serde_json::Value;

/// Normalized result of a single lookup.
///
/// Exactly one variant is produced per request; only `Success` carries a payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// The service answered with decodable JSON (including 400 error bodies)
    Success { payload: Value },

    /// The transport finished with a status outside the accepted set
    TransportFailure { exit_status: i32, raw_output: String },

    /// The transport finished cleanly but produced nothing to parse
    #[serde(rename = "empty_response")]
    EmptyResponseFailure,

    /// The transport output was not valid JSON
    DecodeFailure {
        raw_output: String,
        decode_error: String,
    },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    pub fn payload(&self) -> Option<&Value> {
        match self {
            Outcome::Success { payload } => Some(payload),
            _ => None,
        }
    }

    /// Stable tag used in logs and JSON output
    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::Success { .. } => "success",
            Outcome::TransportFailure { .. } => "transport_failure",
            Outcome::EmptyResponseFailure => "empty_response",
            Outcome::DecodeFailure { .. } => "decode_failure",
        }
    }
}
