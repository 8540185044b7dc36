//! Outbound request descriptors.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, InvalidInputError};

/// HTTP methods used by the marketplace API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    /// Returns the uppercase method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            _ => Err(InvalidInputError::Method {
                value: s.to_string(),
            }
            .into()),
        }
    }
}

/// A request path relative to the configured base URL.
///
/// Paths must start with `/` and may not carry a scheme, host, query or
/// fragment; query parameters go through [`ApiRequest::query`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ApiPath(String);

impl ApiPath {
    /// Validate and wrap a path.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let invalid = |reason: &str| -> Error {
            InvalidInputError::Path {
                value: s.to_string(),
                reason: reason.to_string(),
            }
            .into()
        };

        if !s.starts_with('/') {
            return Err(invalid("must start with '/'"));
        }
        if s.starts_with("//") || s.contains("://") {
            return Err(invalid("must be relative to the base URL"));
        }
        if s.contains(['?', '#']) {
            return Err(invalid("query and fragment are not part of the path"));
        }
        if s.chars().any(char::is_whitespace) {
            return Err(invalid("must not contain whitespace"));
        }

        Ok(Self(s.to_string()))
    }

    /// Returns the path string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApiPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ApiPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// A request descriptor handed to the gateway.
///
/// Credentials are never part of the descriptor; the transport attaches
/// them ambiently.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    method: Method,
    path: ApiPath,
    query: Vec<(String, String)>,
    body: Option<Value>,
    headers: BTreeMap<String, String>,
}

impl ApiRequest {
    /// Create a request with no body.
    pub fn new(method: Method, path: impl AsRef<str>) -> Result<Self, Error> {
        Ok(Self {
            method,
            path: ApiPath::new(path)?,
            query: Vec::new(),
            body: None,
            headers: BTreeMap::new(),
        })
    }

    /// Shorthand for a GET request.
    pub fn get(path: impl AsRef<str>) -> Result<Self, Error> {
        Self::new(Method::Get, path)
    }

    /// Shorthand for a POST request.
    pub fn post(path: impl AsRef<str>) -> Result<Self, Error> {
        Self::new(Method::Post, path)
    }

    /// Shorthand for a PUT request.
    pub fn put(path: impl AsRef<str>) -> Result<Self, Error> {
        Self::new(Method::Put, path)
    }

    /// Shorthand for a PATCH request.
    pub fn patch(path: impl AsRef<str>) -> Result<Self, Error> {
        Self::new(Method::Patch, path)
    }

    /// Shorthand for a DELETE request.
    pub fn delete(path: impl AsRef<str>) -> Result<Self, Error> {
        Self::new(Method::Delete, path)
    }

    /// Attach a JSON body.
    pub fn json<B: Serialize>(mut self, body: &B) -> Result<Self, Error> {
        let value = serde_json::to_value(body).map_err(|e| InvalidInputError::Other {
            message: format!("request body is not serializable: {}", e),
        })?;
        self.body = Some(value);
        Ok(self)
    }

    /// Attach an already-built JSON body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Append a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Set an extra header. Header names are stored lowercase.
    pub fn header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &ApiPath {
        &self.path
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }
}
