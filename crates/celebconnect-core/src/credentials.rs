//! Login credentials type.

use std::fmt;

use serde::Serialize;

/// Email and password for a marketplace login.
///
/// # Security
///
/// The password is never exposed in Debug output to prevent accidental logging.
///
/// # Example
///
/// ```
/// use celebconnect_core::Credentials;
///
/// let creds = Credentials::new("ada@fans.test", "hunter2");
/// assert_eq!(creds.email(), "ada@fans.test");
/// ```
#[derive(Clone)]
pub struct Credentials {
    email: String,
    password: String,
}

/// Wire form of a login request.
#[derive(Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub(crate) fn to_request(&self) -> LoginRequest<'_> {
        LoginRequest {
            email: &self.email,
            password: &self.password,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_hides_password_in_debug() {
        let creds = Credentials::new("ada@fans.test", "secret123");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("ada@fans.test"));
        assert!(!debug.contains("secret123"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn request_carries_both_fields() {
        let creds = Credentials::new("ada@fans.test", "secret123");
        let body = serde_json::to_value(creds.to_request()).unwrap();
        assert_eq!(body["email"], "ada@fans.test");
        assert_eq!(body["password"], "secret123");
    }
}
