//! Transport trait.

use async_trait::async_trait;

use crate::Result;
use crate::types::{ApiRequest, ApiResponse, BaseUrl};

/// Something that can put an [`ApiRequest`] on the wire.
///
/// Implementations attach ambient credentials (cookies) themselves; the
/// gateway never sees credential bytes. Any status code the server returns,
/// including 4xx/5xx, is an `Ok` response. `Err` is reserved for transport
/// failures (connection refused, timeout, TLS).
#[async_trait]
pub trait Transport: Send + Sync {
    /// Returns the base URL requests are resolved against.
    fn base_url(&self) -> &BaseUrl;

    /// Execute a request.
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse>;
}
