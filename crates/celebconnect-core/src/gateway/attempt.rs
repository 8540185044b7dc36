//! Per-call retry state.

use crate::types::ApiRequest;

/// One logical call through the gateway.
///
/// The only way to obtain a retried attempt is [`RequestAttempt::into_retry`],
/// so a caller can never hand the gateway a pre-retried request, and every
/// call carries its own flag.
#[derive(Debug, Clone)]
pub struct RequestAttempt {
    request: ApiRequest,
    retried: bool,
}

impl RequestAttempt {
    /// Start a fresh attempt.
    pub fn new(request: ApiRequest) -> Self {
        Self {
            request,
            retried: false,
        }
    }

    pub fn request(&self) -> &ApiRequest {
        &self.request
    }

    /// Returns true once the attempt has used its single refresh.
    pub fn retried(&self) -> bool {
        self.retried
    }

    /// Consume the attempt and return the retried copy.
    #[must_use]
    pub fn into_retry(self) -> Self {
        Self {
            retried: true,
            ..self
        }
    }
}
