//! The session gateway.
//!
//! [`SessionGateway`] stands in for a raw HTTP client. A call that comes back
//! 401 (or 205, when configured) gets exactly one silent refresh against the
//! stored role's refresh endpoint and exactly one retry. If that does not
//! recover the call, the cached session is cleared, the embedding app is sent
//! to the login page for its current area, and the call is rejected.
//!
//! Per call the states are:
//!
//! ```text
//! Initial -> Sent -> Success
//!                 -> AuthFailureDetected -> RefreshAttempted -> Retried -> Success
//!                                                                       -> Failed
//!                                        -> Failed (already retried / refresh failed)
//! Failed -> session cleared, redirect
//! ```

mod attempt;


pub use attempt::RequestAttempt;

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use crate::Result;
use crate::config::GatewayConfig;
use crate::error::{AuthError, Error, TransportError};
use crate::routes::RouteTable;
use crate::traits::{Navigator, SessionStore, Transport};
use crate::types::{
    ApiEnvelope, ApiRequest, ApiResponse, Role, STATUS_RESET_CONTENT, STATUS_UNAUTHORIZED,
    SessionRecord,
};

/// How the gateway treats a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Disposition {
    Success,
    AuthFailure,
    Upstream,
}

/// Session-aware client over a [`Transport`].
///
/// Cheap to clone (internal `Arc`); clones share the transport, store and
/// navigator. Concurrent calls each carry their own [`RequestAttempt`].
#[derive(Clone)]
pub struct SessionGateway {
    inner: Arc<GatewayInner>,
}

struct GatewayInner {
    transport: Arc<dyn Transport>,
    store: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
    routes: RouteTable,
    refresh_timeout: Duration,
    reset_content_is_auth_failure: bool,
}

impl SessionGateway {
    /// Assemble a gateway from its ports.
    pub fn new(
        transport: Arc<dyn Transport>,
        store: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
        config: &GatewayConfig,
    ) -> Self {
        Self {
            inner: Arc::new(GatewayInner {
                transport,
                store,
                navigator,
                routes: config.routes.clone(),
                refresh_timeout: config.refresh_timeout(),
                reset_content_is_auth_failure: config.reset_content_is_auth_failure,
            }),
        }
    }

    /// Send a request, recovering once from an expired credential.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Expired`] when the refresh failed
    /// - [`AuthError::RetryExhausted`] when the retried call was rejected again
    /// - [`Error::Upstream`] for any other non-2xx status
    /// - [`Error::Transport`] when the request never got a response
    ///
    /// Both auth errors clear the session store and navigate to a login page
    /// before they are returned.
    #[instrument(skip(self, request), fields(method = %request.method(), path = %request.path()))]
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let mut attempt = RequestAttempt::new(request);

        loop {
            let response = self.inner.transport.execute(attempt.request()).await?;
            let status = response.status();

            match self.classify(status) {
                Disposition::Success => {
                    debug!(status, retried = attempt.retried(), "request succeeded");
                    return Ok(response);
                }
                Disposition::Upstream => {
                    debug!(status, "passing through upstream error");
                    return Err(response.into_upstream_error().into());
                }
                Disposition::AuthFailure if attempt.retried() => {
                    warn!(status, "credential rejected again after refresh");
                    return Err(self.terminate(AuthError::RetryExhausted { status }));
                }
                Disposition::AuthFailure => {
                    attempt = attempt.into_retry();
                    info!(status, "credential rejected, attempting silent refresh");

                    if let Err(err) = self.refresh().await {
                        warn!(status, error = %err, "silent refresh failed");
                        return Err(self.terminate(AuthError::Expired {
                            status,
                            reason: err.to_string(),
                        }));
                    }
                }
            }
        }
    }

    /// Send a request and unwrap the `{ status, data, message }` envelope.
    ///
    /// An envelope with `status: false` becomes [`Error::Upstream`] carrying
    /// the backend's message.
    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<Option<T>> {
        let response = self.send(request).await?;
        let envelope: ApiEnvelope<T> = response.envelope()?;
        envelope.into_result(response.status())
    }

    /// Send a request straight to the transport, with no recovery policy.
    ///
    /// For public endpoints (login, signup) where a 401 means "wrong
    /// password", not "expired session".
    #[instrument(skip(self, request), fields(method = %request.method(), path = %request.path()))]
    pub async fn send_unguarded(&self, request: &ApiRequest) -> Result<ApiResponse> {
        self.inner.transport.execute(request).await
    }

    /// Renew the credential for the stored role.
    ///
    /// Issues a body-less POST to the role's refresh endpoint, bounded by the
    /// configured refresh timeout. The refresh call itself is never retried.
    /// If the response envelope carries an identity object, it replaces the
    /// stored session.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<()> {
        let stored = self.inner.store.get()?;
        let role = stored.as_ref().map(|record| record.role);
        let path = self.inner.routes.refresh_path(role)?;
        debug!(role = %role.unwrap_or_default(), %path, "resolved refresh endpoint");

        let request = ApiRequest::post(path.as_str())?;
        let timeout = self.inner.refresh_timeout;
        let response = tokio::time::timeout(timeout, self.inner.transport.execute(&request))
            .await
            .map_err(|_| TransportError::Timeout {
                duration_ms: timeout.as_millis() as u64,
            })??;

        // A refresh endpoint answering 205 is still a renewed credential.
        if !response.is_success() {
            return Err(response.into_upstream_error().into());
        }

        self.adopt_refreshed_identity(&response, role.unwrap_or_default());
        debug!("credential refreshed");
        Ok(())
    }

    /// Returns the cached session, if any.
    pub fn current_session(&self) -> Result<Option<SessionRecord>> {
        self.inner.store.get()
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.inner.store
    }

    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.inner.navigator
    }

    pub fn routes(&self) -> &RouteTable {
        &self.inner.routes
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.inner.transport
    }

    fn classify(&self, status: u16) -> Disposition {
        match status {
            STATUS_UNAUTHORIZED => Disposition::AuthFailure,
            STATUS_RESET_CONTENT if self.inner.reset_content_is_auth_failure => {
                Disposition::AuthFailure
            }
            200..=299 => Disposition::Success,
            _ => Disposition::Upstream,
        }
    }

    fn adopt_refreshed_identity(&self, response: &ApiResponse, current: Role) {
        let Ok(envelope) = response.envelope::<Value>() else {
            return;
        };
        let Some(record) = envelope
            .data
            .as_ref()
            .filter(|data| data.as_object().is_some_and(|object| !object.is_empty()))
            .and_then(|data| SessionRecord::from_payload(data, current))
        else {
            return;
        };

        match self.inner.store.set(&record) {
            Ok(()) => debug!(role = %record.role, "stored identity from refresh response"),
            Err(err) => warn!(error = %err, "failed to store refreshed identity"),
        }
    }

    /// Tear down the session and redirect. Runs before the caller sees `cause`.
    fn terminate(&self, cause: AuthError) -> Error {
        if let Err(err) = self.inner.store.clear() {
            error!(error = %err, "failed to clear session store");
        }

        let location = self.inner.navigator.current_path();
        let login = self.inner.routes.login_path_for_location(&location);
        warn!(%location, login, "session ended, redirecting to login");
        self.inner.navigator.navigate_to(login);

        Error::Auth(cause)
    }
}

impl std::fmt::Debug for SessionGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionGateway")
            .field("base_url", self.inner.transport.base_url())
            .field("routes", &self.inner.routes)
            .field("refresh_timeout", &self.inner.refresh_timeout)
            .finish()
    }
}
