//! Error types for the celebconnect client.
//!
//! This module provides a unified error type with explicit variants for
//! transport, authentication, upstream, storage, and input validation errors.

use std::fmt;
use thiserror::Error;

/// The unified error type for celebconnect operations.
///
/// Every gateway call either returns a response or one of these variants;
/// nothing is swallowed.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (DNS, TLS, connection, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authentication errors (expired session, refused login).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Non-2xx responses passed through from the backend.
    #[error("upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    /// Session store failures.
    #[error("session store error: {0}")]
    Store(#[from] StoreError),

    /// Input validation errors (invalid URL, path, OTP code).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

impl Error {
    /// Returns true if this error ended the session.
    ///
    /// Both terminal kinds imply the session store has already been cleared
    /// and a login redirect issued.
    pub fn is_terminal_auth(&self) -> bool {
        matches!(
            self,
            Error::Auth(AuthError::Expired { .. } | AuthError::RetryExhausted { .. })
        )
    }

    /// Returns the HTTP status associated with this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Auth(AuthError::Expired { status, .. }) => Some(*status),
            Error::Auth(AuthError::RetryExhausted { status }) => Some(*status),
            Error::Upstream(err) => Some(err.status),
            _ => None,
        }
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The credential was rejected and the refresh attempt failed.
    #[error("session expired (HTTP {status}): {reason}")]
    Expired { status: u16, reason: String },

    /// The credential was rejected again after a successful refresh.
    #[error("session rejected after refresh (HTTP {status})")]
    RetryExhausted { status: u16 },

    /// The backend refused a login or signup.
    #[error("rejected: {message}")]
    Rejected { message: String },
}

/// A non-2xx response passed through from the backend.
#[derive(Debug)]
pub struct UpstreamError {
    /// HTTP status code.
    pub status: u16,
    /// Envelope message from the backend (if present).
    pub message: Option<String>,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for UpstreamError {}

impl UpstreamError {
    /// Create a new upstream error.
    pub fn new(status: u16, message: Option<String>, body: Vec<u8>) -> Self {
        Self {
            status,
            message,
            body,
        }
    }

    /// Check if this is a server-side (5xx) failure.
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }
}

/// Session store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing storage failed.
    #[error("I/O error: {message}")]
    Io { message: String },

    /// The stored record could not be encoded or decoded.
    #[error("invalid session record: {message}")]
    Encoding { message: String },
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Encoding {
            message: err.to_string(),
        }
    }
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid API base URL.
    #[error("invalid base URL '{value}': {reason}")]
    BaseUrl { value: String, reason: String },

    /// Invalid request path.
    #[error("invalid path '{value}': {reason}")]
    Path { value: String, reason: String },

    /// Unsupported HTTP method.
    #[error("unsupported method '{value}'")]
    Method { value: String },

    /// Invalid one-time passcode.
    #[error("invalid OTP code: {reason}")]
    OtpCode { reason: String },

    /// Invalid date.
    #[error("invalid date '{value}': {reason}")]
    Date { value: String, reason: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_auth_kinds() {
        let expired: Error = AuthError::Expired {
            status: 401,
            reason: "refresh returned HTTP 401".to_string(),
        }
        .into();
        let exhausted: Error = AuthError::RetryExhausted { status: 205 }.into();
        let rejected: Error = AuthError::Rejected {
            message: "bad password".to_string(),
        }
        .into();

        assert!(expired.is_terminal_auth());
        assert!(exhausted.is_terminal_auth());
        assert!(!rejected.is_terminal_auth());
        assert_eq!(exhausted.status(), Some(205));
    }

    #[test]
    fn upstream_display_includes_message() {
        let err = UpstreamError::new(500, Some("database down".to_string()), Vec::new());
        assert_eq!(err.to_string(), "HTTP 500: database down");
        assert!(err.is_server_error());
    }
}
