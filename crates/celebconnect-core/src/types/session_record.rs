//! The locally cached identity of the signed-in account.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Role;

/// The authenticated identity as last reported by the backend.
///
/// Only `role` is interpreted by this client. Everything else the backend
/// sends (names, email, verification flags) is kept verbatim in `profile`.
/// The record is a cache for routing decisions, never proof of authorization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// The account's role.
    #[serde(default)]
    pub role: Role,

    /// Opaque identity fields.
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

impl SessionRecord {
    /// Create a record with a role and no identity fields.
    pub fn new(role: Role) -> Self {
        Self {
            role,
            profile: Map::new(),
        }
    }

    /// Build a record from a backend payload.
    ///
    /// Returns `None` unless the payload is a JSON object. When the payload
    /// carries no recognizable role, `fallback` is used.
    pub fn from_payload(payload: &Value, fallback: Role) -> Option<Self> {
        let object = payload.as_object()?;
        let mut record: SessionRecord = serde_json::from_value(payload.clone()).ok()?;
        if record.role == Role::Unknown && !object.contains_key("role") {
            record.role = fallback;
        }
        Some(record)
    }

    /// Returns an identity field by name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.profile.get(key)
    }

    /// Returns a string identity field by name.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.profile.get(key).and_then(Value::as_str)
    }

    /// Set an identity field, returning the updated record.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.profile.insert(key.into(), value.into());
        self
    }

    /// Returns the best display label for the account.
    pub fn display_name(&self) -> Option<String> {
        if let Some(name) = self.get_str("name") {
            return Some(name.to_string());
        }
        match (self.get_str("first_name"), self.get_str("last_name")) {
            (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
            (Some(first), None) => Some(first.to_string()),
            _ => self.get_str("email").map(str::to_string),
        }
    }
}
