//! Per-role refresh endpoints, login pages and app areas.

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::types::{ApiPath, Role};

/// Paths associated with one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRoutes {
    /// Backend endpoint that renews this role's credential.
    pub refresh_path: String,
    /// App page to send a signed-out session to.
    pub login_path: String,
    /// App page a signed-in session starts on.
    pub home_path: String,
    /// Location prefix of this role's area of the app. `None` means the
    /// role owns everything no other role claims.
    #[serde(default)]
    pub area_prefix: Option<String>,
}

impl RoleRoutes {
    /// Returns the refresh endpoint as a validated path.
    pub fn refresh(&self) -> Result<ApiPath> {
        ApiPath::new(&self.refresh_path)
    }

    fn owns(&self, location: &str) -> bool {
        match self.area_prefix.as_deref() {
            Some(prefix) => {
                let prefix = prefix.trim_end_matches('/');
                location == prefix
                    || location
                        .strip_prefix(prefix)
                        .is_some_and(|rest| rest.starts_with('/'))
            }
            None => false,
        }
    }
}

/// The role → routes mapping.
///
/// Adding a role means adding a row here; the `match` in [`RouteTable::for_role`]
/// keeps the mapping exhaustive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteTable {
    pub user: RoleRoutes,
    pub agent: RoleRoutes,
    pub admin: RoleRoutes,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            user: RoleRoutes {
                refresh_path: "/refresh".to_string(),
                login_path: "/login".to_string(),
                home_path: "/home".to_string(),
                area_prefix: None,
            },
            agent: RoleRoutes {
                refresh_path: "/auth/agent/refresh".to_string(),
                login_path: "/agent/login".to_string(),
                home_path: "/agent/dashboard".to_string(),
                area_prefix: Some("/agent".to_string()),
            },
            admin: RoleRoutes {
                refresh_path: "/auth/admin/refresh".to_string(),
                login_path: "/admin/login".to_string(),
                home_path: "/admin/dashboard".to_string(),
                area_prefix: Some("/admin".to_string()),
            },
        }
    }
}

impl RouteTable {
    /// Returns the routes for a role. `Unknown` shares the user row.
    pub fn for_role(&self, role: Role) -> &RoleRoutes {
        match role {
            Role::User | Role::Unknown => &self.user,
            Role::Agent => &self.agent,
            Role::Admin => &self.admin,
        }
    }

    /// Resolve the refresh endpoint for an optional stored role.
    pub fn refresh_path(&self, role: Option<Role>) -> Result<ApiPath> {
        self.for_role(role.unwrap_or_default()).refresh()
    }

    /// Returns the role whose app area contains `location`.
    pub fn area_of(&self, location: &str) -> Role {
        let path = location.split(['?', '#']).next().unwrap_or_default();
        if self.admin.owns(path) {
            Role::Admin
        } else if self.agent.owns(path) {
            Role::Agent
        } else {
            Role::User
        }
    }

    /// Returns the login page for the area `location` is in.
    pub fn login_path_for_location(&self, location: &str) -> &str {
        &self.for_role(self.area_of(location)).login_path
    }
}
