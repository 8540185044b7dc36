//! HTTP transport implementation.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument, trace};

use celebconnect_core::error::{Error, TransportError};
use celebconnect_core::{ApiRequest, ApiResponse, BaseUrl, Method, Result, Transport};

use crate::cookies::CookieJar;

/// Upper bound on any single request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// [`Transport`] over a reqwest client that shares a [`CookieJar`].
///
/// Every status code comes back as a response; only failures to get one
/// at all are errors.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: BaseUrl,
    jar: Arc<CookieJar>,
}

impl HttpTransport {
    /// Create a transport for `base_url` whose cookies live in `jar`.
    pub fn new(base_url: BaseUrl, jar: Arc<CookieJar>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("celebconnect/", env!("CARGO_PKG_VERSION")))
            .cookie_provider(jar.clone())
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(map_reqwest)?;

        Ok(Self {
            client,
            base_url,
            jar,
        })
    }

    /// The cookie jar backing this transport.
    pub fn cookie_jar(&self) -> &Arc<CookieJar> {
        &self.jar
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    #[instrument(skip(self, request), fields(base = %self.base_url, method = %request.method(), path = %request.path()))]
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let url = self.base_url.join(request.path());
        debug!(%url, "HTTP request");

        let mut builder = self
            .client
            .request(to_reqwest_method(request.method()), &url)
            .query(request.query_pairs());
        for (name, value) in request.headers() {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(map_reqwest)?;
        let status = response.status().as_u16();

        let headers: BTreeMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await.map_err(map_reqwest)?;
        trace!(status, bytes = body.len(), "HTTP response");

        Ok(ApiResponse::new(status, headers, body.to_vec()))
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn map_reqwest(err: reqwest::Error) -> Error {
    let transport = if err.is_timeout() {
        TransportError::Timeout {
            duration_ms: REQUEST_TIMEOUT.as_millis() as u64,
        }
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else {
        TransportError::Http {
            message: err.to_string(),
        }
    };
    Error::Transport(transport)
}
