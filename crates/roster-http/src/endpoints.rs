//! Endpoint paths and request/response bodies.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use roster_core::Record;

/// Credential exchange.
pub const LOGIN: &str = "auth/login";

/// Request body for login.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Response from login.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user: Option<Value>,
}

/// Error body. Servers vary on which field carries the text.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
}

impl ErrorResponse {
    /// The human-readable part of the body, if any.
    pub fn into_message(self) -> Option<String> {
        [self.message, self.error]
            .into_iter()
            .flatten()
            .find_map(|value| match value {
                Value::String(s) if !s.is_empty() => Some(s),
                // Validation libraries often send a list of messages.
                Value::Array(items) => {
                    let joined = items
                        .iter()
                        .filter_map(Value::as_str)
                        .collect::<Vec<_>>()
                        .join("; ");
                    (!joined.is_empty()).then_some(joined)
                }
                _ => None,
            })
    }
}

/// The record a write response carries, if it carries one.
///
/// Accepts the record itself or a `{"data": record}` envelope; either way
/// the record must have an id.
pub fn response_record(body: Value) -> Option<Record> {
    let value = match body {
        Value::Object(mut map) if !map.contains_key("_id") && !map.contains_key("id") => {
            map.remove("data")?
        }
        other => other,
    };
    Record::from_value(value).ok().filter(|r| r.id().is_some())
}
