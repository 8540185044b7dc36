//! Responses and the backend's response envelope.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, UpstreamError};

/// HTTP 205, overloaded by one backend revision as "refresh your credential".
pub const STATUS_RESET_CONTENT: u16 = 205;

/// HTTP 401.
pub const STATUS_UNAUTHORIZED: u16 = 401;

/// A response as returned by a [`Transport`](crate::Transport).
///
/// Non-2xx statuses are still responses at this level; classification
/// happens in the gateway.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse {
    status: u16,
    headers: BTreeMap<String, String>,
    body: Vec<u8>,
}

impl ApiResponse {
    /// Create a response. Header names are lowercased.
    pub fn new(status: u16, headers: BTreeMap<String, String>, body: Vec<u8>) -> Self {
        let headers = headers
            .into_iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v))
            .collect();
        Self {
            status,
            headers,
            body,
        }
    }

    /// Create a JSON response.
    pub fn json(status: u16, body: &Value) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());
        Self::new(status, headers, body.to_string().into_bytes())
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// Returns true for any 2xx status, including 205.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Returns the body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body as JSON.
    pub fn json_body<T: DeserializeOwned>(&self) -> Result<T, Error> {
        serde_json::from_slice(&self.body).map_err(|e| {
            UpstreamError::new(
                self.status,
                Some(format!("undecodable response body: {}", e)),
                self.body.clone(),
            )
            .into()
        })
    }

    /// Decode the body as the standard envelope.
    pub fn envelope<T: DeserializeOwned>(&self) -> Result<ApiEnvelope<T>, Error> {
        self.json_body()
    }

    /// Best-effort extraction of the envelope message, for error reporting.
    pub fn envelope_message(&self) -> Option<String> {
        let value: Value = serde_json::from_slice(&self.body).ok()?;
        value
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    /// Convert into a pass-through upstream error.
    pub fn into_upstream_error(self) -> UpstreamError {
        let message = self.envelope_message();
        UpstreamError::new(self.status, message, self.body)
    }
}

/// The `{ status, data, message }` envelope the backend wraps payloads in.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    /// Whether the backend considers the operation successful.
    #[serde(default)]
    pub status: bool,

    /// Operation payload.
    pub data: Option<T>,

    /// Human-readable message.
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Returns the payload of a successful envelope, or the backend's message.
    pub fn into_result(self, http_status: u16) -> Result<Option<T>, Error> {
        if self.status {
            Ok(self.data)
        } else {
            Err(UpstreamError::new(http_status, self.message, Vec::new()).into())
        }
    }
}
