//! Account operations that create, patch and end the cached session.

use std::fmt;

use chrono::{NaiveDate, SecondsFormat};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, info, instrument, warn};

use crate::Result;
use crate::config::{AccountEndpoints, GatewayConfig};
use crate::credentials::Credentials;
use crate::error::{AuthError, InvalidInputError};
use crate::gateway::SessionGateway;
use crate::types::{ApiRequest, ApiResponse, Role, SessionRecord};

/// Length of the email verification code.
pub const OTP_LENGTH: usize = 6;

/// Details for a new customer account.
#[derive(Clone)]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub date_of_birth: NaiveDate,
    pub password: String,
}

#[derive(Serialize)]
struct SignupPayload<'a> {
    first_name: &'a str,
    last_name: &'a str,
    email: &'a str,
    date_of_birth: String,
    password: &'a str,
    phone_number: &'a str,
}

impl SignupRequest {
    fn payload(&self) -> SignupPayload<'_> {
        let midnight = self.date_of_birth.and_time(chrono::NaiveTime::MIN).and_utc();
        SignupPayload {
            first_name: &self.first_name,
            last_name: &self.last_name,
            email: &self.email,
            date_of_birth: midnight.to_rfc3339_opts(SecondsFormat::Millis, true),
            password: &self.password,
            phone_number: &self.phone_number,
        }
    }

    fn validate(&self) -> Result<()> {
        let required = [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("email", &self.email),
            ("phone_number", &self.phone_number),
            ("password", &self.password),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(InvalidInputError::Other {
                    message: format!("{} is required", field),
                }
                .into());
            }
        }
        Ok(())
    }
}

impl fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupRequest")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("phone_number", &self.phone_number)
            .field("date_of_birth", &self.date_of_birth)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Parse a `YYYY-MM-DD` date of birth.
pub fn parse_date_of_birth(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|e| {
        InvalidInputError::Date {
            value: s.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// Login, signup, logout and the session-patching account calls.
///
/// Login and signup go out unguarded: a 401 there means bad credentials.
/// Everything that needs an existing session goes through the gateway.
#[derive(Debug, Clone)]
pub struct AccountService {
    gateway: SessionGateway,
    endpoints: AccountEndpoints,
}

impl AccountService {
    pub fn new(gateway: SessionGateway, config: &GatewayConfig) -> Self {
        Self {
            gateway,
            endpoints: config.accounts.clone(),
        }
    }

    pub fn gateway(&self) -> &SessionGateway {
        &self.gateway
    }

    /// Log in with the role-specific login endpoint and cache the identity.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Rejected`] if the backend refuses the credentials.
    #[instrument(skip(self, credentials), fields(%role, email = %credentials.email()))]
    pub async fn login(&self, role: Role, credentials: &Credentials) -> Result<SessionRecord> {
        info!("Logging in");

        let request =
            ApiRequest::post(self.endpoints.login_for(role))?.json(&credentials.to_request())?;
        let response = self.gateway.send_unguarded(&request).await?;
        let record = establish(response, role)?;

        self.gateway.store().set(&record)?;
        debug!(role = %record.role, "session established");
        Ok(record)
    }

    /// Create a customer account and cache the returned identity.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn signup(&self, request: &SignupRequest) -> Result<SessionRecord> {
        info!("Signing up");
        request.validate()?;

        let api_request = ApiRequest::post(&self.endpoints.signup)?.json(&request.payload())?;
        let response = self.gateway.send_unguarded(&api_request).await?;
        let record = establish(response, Role::User)?;

        self.gateway.store().set(&record)?;
        Ok(record)
    }

    /// End the session.
    ///
    /// The backend is asked to drop its cookies, but a failure there is only
    /// logged: the local session is always cleared and the app is sent to the
    /// login page for the role that was signed in.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<()> {
        let role = match self.gateway.current_session() {
            Ok(session) => session.map(|record| record.role).unwrap_or_default(),
            Err(err) => {
                warn!(error = %err, "could not read session before logout");
                Role::Unknown
            }
        };

        let request = ApiRequest::post(&self.endpoints.logout)?;
        match self.gateway.send_unguarded(&request).await {
            Ok(response) if response.is_success() => debug!("backend session ended"),
            Ok(response) => warn!(status = response.status(), "logout request rejected"),
            Err(err) => warn!(error = %err, "logout request failed"),
        }

        let cleared = self.gateway.store().clear();
        let login = &self.gateway.routes().for_role(role).login_path;
        self.gateway.navigator().navigate_to(login);
        info!(login = %login, "Logged out");

        cleared
    }

    /// Ask the backend to email a verification code.
    ///
    /// Returns the backend's message, if any.
    #[instrument(skip(self))]
    pub async fn request_otp(&self) -> Result<Option<String>> {
        let response = self
            .gateway
            .send(ApiRequest::get(&self.endpoints.otp_request)?)
            .await?;
        let envelope = response.envelope::<Value>()?;
        let message = envelope.message.clone();
        envelope.into_result(response.status())?;
        Ok(message)
    }

    /// Submit a verification code and mark the cached identity verified.
    #[instrument(skip(self, code))]
    pub async fn validate_otp(&self, code: &str) -> Result<Option<SessionRecord>> {
        let code = code.trim();
        if code.chars().count() != OTP_LENGTH || code.chars().any(char::is_whitespace) {
            return Err(InvalidInputError::OtpCode {
                reason: format!("expected {} characters", OTP_LENGTH),
            }
            .into());
        }

        let request =
            ApiRequest::post(&self.endpoints.otp_validate)?.with_body(json!({ "otp_code": code }));
        self.gateway.send_json::<Value>(request).await?;

        let updated = self.gateway.store().update(&|record: &mut SessionRecord| {
            record.profile.insert("is_verified".to_string(), Value::Bool(true));
            record
                .profile
                .insert("level".to_string(), Value::String("Basic".to_string()));
        })?;
        info!("Email verified");
        Ok(updated)
    }

    /// Change an agent's password and mark their email verified.
    #[instrument(skip(self, old_password, new_password))]
    pub async fn update_agent_password(
        &self,
        old_password: &str,
        new_password: &str,
    ) -> Result<Option<SessionRecord>> {
        let request = ApiRequest::patch(&self.endpoints.agent_password)?.with_body(json!({
            "old_password": old_password,
            "new_password": new_password,
        }));
        self.gateway.send_json::<Value>(request).await?;

        let updated = self.gateway.store().update(&|record: &mut SessionRecord| {
            record
                .profile
                .insert("email_verified".to_string(), Value::Bool(true));
        })?;
        info!("Agent password updated");
        Ok(updated)
    }
}

/// Turn a login/signup response into the identity to cache.
fn establish(response: ApiResponse, role: Role) -> Result<SessionRecord> {
    let status = response.status();

    if (400..500).contains(&status) {
        let message = response
            .envelope_message()
            .unwrap_or_else(|| format!("HTTP {}", status));
        return Err(AuthError::Rejected { message }.into());
    }
    if !response.is_success() {
        return Err(response.into_upstream_error().into());
    }

    let envelope = response.envelope::<Value>()?;
    if !envelope.status {
        let message = envelope
            .message
            .unwrap_or_else(|| "request was not accepted".to_string());
        return Err(AuthError::Rejected { message }.into());
    }

    Ok(envelope
        .data
        .as_ref()
        .and_then(|data| SessionRecord::from_payload(data, role))
        .unwrap_or_else(|| SessionRecord::new(role)))
}
