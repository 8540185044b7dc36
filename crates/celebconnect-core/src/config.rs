//! Gateway configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::routes::RouteTable;
use crate::types::{BaseUrl, Role};

/// Default timeout for the refresh sub-call.
pub const DEFAULT_REFRESH_TIMEOUT_SECS: u64 = 10;

/// Account endpoints used by [`AccountService`](crate::AccountService).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountEndpoints {
    pub user_login: String,
    pub agent_login: String,
    pub admin_login: String,
    pub signup: String,
    pub logout: String,
    pub otp_request: String,
    pub otp_validate: String,
    pub agent_password: String,
}

impl Default for AccountEndpoints {
    fn default() -> Self {
        Self {
            user_login: "/auth/login".to_string(),
            agent_login: "/auth/agent/login".to_string(),
            admin_login: "/auth/admin/login".to_string(),
            signup: "/auth/signup".to_string(),
            logout: "/auth/logout".to_string(),
            otp_request: "/auth/otp/request".to_string(),
            otp_validate: "/auth/otp/validate".to_string(),
            agent_password: "/agent/password".to_string(),
        }
    }
}

impl AccountEndpoints {
    /// Returns the login endpoint for a role. `Unknown` logs in as a user.
    pub fn login_for(&self, role: Role) -> &str {
        match role {
            Role::User | Role::Unknown => &self.user_login,
            Role::Agent => &self.agent_login,
            Role::Admin => &self.admin_login,
        }
    }
}

/// Deployment configuration for the gateway and account service.
///
/// Every field has a default, so a config file only needs the values it
/// changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// API base URL. Required before a transport can be built.
    pub base_url: Option<BaseUrl>,

    /// Role routing table.
    pub routes: RouteTable,

    /// Account endpoints.
    pub accounts: AccountEndpoints,

    /// Upper bound on the refresh sub-call, in seconds.
    pub refresh_timeout_secs: u64,

    /// Treat HTTP 205 as an authorization failure.
    pub reset_content_is_auth_failure: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            routes: RouteTable::default(),
            accounts: AccountEndpoints::default(),
            refresh_timeout_secs: DEFAULT_REFRESH_TIMEOUT_SECS,
            reset_content_is_auth_failure: true,
        }
    }
}

impl GatewayConfig {
    /// Returns the refresh timeout. Zero is raised to one second.
    pub fn refresh_timeout(&self) -> Duration {
        Duration::from_secs(self.refresh_timeout_secs.max(1))
    }

    /// Parse a JSON config document.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            crate::error::InvalidInputError::Other {
                message: format!("invalid config: {}", e),
            }
            .into()
        })
    }
}
