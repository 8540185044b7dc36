//! celebconnect-http - reqwest transport for the session gateway.
//!
//! The backend keeps the credential in HTTP-only cookies, so the transport
//! is built around a [`CookieJar`] that can be persisted between runs.

mod cookies;
mod transport;

use std::sync::Arc;

use celebconnect_core::error::InvalidInputError;
use celebconnect_core::{GatewayConfig, Navigator, Result, SessionGateway, SessionStore};

pub use cookies::CookieJar;
pub use transport::HttpTransport;

/// Build a gateway that talks to `config.base_url` over HTTP.
///
/// # Errors
///
/// Fails if no base URL is configured or the HTTP client cannot be built.
pub fn connect(
    config: &GatewayConfig,
    jar: Arc<CookieJar>,
    store: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
) -> Result<SessionGateway> {
    let base_url = config
        .base_url
        .clone()
        .ok_or_else(|| InvalidInputError::BaseUrl {
            value: String::new(),
            reason: "no API base URL configured".to_string(),
        })?;
    let transport = HttpTransport::new(base_url, jar)?;
    Ok(SessionGateway::new(
        Arc::new(transport),
        store,
        navigator,
        config,
    ))
}
