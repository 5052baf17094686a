//! Normalized success and failure shapes returned by [`ApiClient`](super::ApiClient).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status code reported when no response was received at all.
pub const NETWORK_ERROR_STATUS: u16 = 500;

/// Code used when the server did not supply one.
pub const UNKNOWN_ERROR: &str = "UNKNOWN_ERROR";

/// Code used when no response was received (DNS, timeout, refused connection).
pub const NETWORK_ERROR: &str = "NETWORK_ERROR";

/// Code used when the request could not be encoded before dispatch.
pub const INVALID_REQUEST: &str = "INVALID_REQUEST";

/// Code used when a response body does not decode into the requested type.
pub const INVALID_RESPONSE: &str = "INVALID_RESPONSE";

/// Generic failure message shown when the server gave none.
pub const GENERIC_FAILURE_MESSAGE: &str = "请求失败";

/// Generic message for transport-level failures.
pub const NETWORK_FAILURE_MESSAGE: &str = "网络连接失败，请检查网络后重试";

/// Result of every facade call.
pub type ApiResult<T> = Result<SuccessEnvelope<T>, ErrorEnvelope>;

/// A completed call.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SuccessEnvelope<T> {
    pub status_code: u16,
    pub payload: T,
}

impl SuccessEnvelope<Value> {
    /// Builds an envelope from a raw body, substituting `""` for an absent or falsy one.
    pub fn from_body(status_code: u16, body: Option<Value>) -> Self {
        let payload = match body {
            Some(value) if !is_falsy(&value) => value,
            _ => Value::String(String::new()),
        };
        Self {
            status_code,
            payload,
        }
    }

    /// Decodes the payload into a concrete type.
    ///
    /// A payload that does not fit `T` resolves to an `INVALID_RESPONSE` error
    /// carrying the original status code.
    pub fn decode<T: serde::de::DeserializeOwned>(self) -> ApiResult<T> {
        let status_code = self.status_code;
        match serde_json::from_value::<T>(self.payload) {
            Ok(payload) => Ok(SuccessEnvelope {
                status_code,
                payload,
            }),
            Err(e) => {
                log::debug!("Failed to decode response payload: {}", e);
                Err(ErrorEnvelope::new(
                    status_code,
                    INVALID_RESPONSE,
                    GENERIC_FAILURE_MESSAGE,
                ))
            }
        }
    }
}

/// A failed call, whether reported by the server or by the transport.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub status_code: u16,
    pub code: String,
    pub message: String,
}

impl ErrorEnvelope {
    pub fn new(status_code: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status_code,
            code: code.into(),
            message: message.into(),
        }
    }

    /// The failure for a call that never got a response.
    pub fn network() -> Self {
        Self::new(NETWORK_ERROR_STATUS, NETWORK_ERROR, NETWORK_FAILURE_MESSAGE)
    }

    /// The failure for a call whose request could not be built.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(400, INVALID_REQUEST, message)
    }

    /// Normalizes an error response body.
    ///
    /// The server nests its error under `detail`, either as an object with
    /// optional `code` and `message` fields or as a bare message string.
    pub fn from_response(status_code: u16, body: Option<&Value>) -> Self {
        let detail = body.and_then(|b| b.get("detail"));

        let (code, message) = match detail {
            Some(Value::Object(map)) => (
                map.get("code").and_then(non_empty_str),
                map.get("message").and_then(non_empty_str),
            ),
            Some(other) => (None, non_empty_str(other)),
            None => (None, None),
        };

        Self::new(
            status_code,
            code.unwrap_or(UNKNOWN_ERROR),
            message.unwrap_or(GENERIC_FAILURE_MESSAGE),
        )
    }

    /// True when the failure happened below HTTP, so no server ever answered.
    pub fn is_network_error(&self) -> bool {
        self.code == NETWORK_ERROR
    }
}

impl std::fmt::Display for ErrorEnvelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{} {}] {}", self.status_code, self.code, self.message)
    }
}

impl std::error::Error for ErrorEnvelope {}

fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.is_empty())
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}
