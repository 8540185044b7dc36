//! Authorization role of a session.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The authorization class of the current identity.
///
/// Parsing is infallible: the backend's role string is matched
/// case-insensitively and anything unrecognized becomes [`Role::Unknown`],
/// which routes exactly like [`Role::User`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Role {
    /// A marketplace customer.
    User,
    /// A talent agent managing celebrity profiles.
    Agent,
    /// A platform administrator.
    Admin,
    /// No role, or a role this client does not recognize.
    #[default]
    Unknown,
}

impl Role {
    /// Returns the canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Agent => "agent",
            Role::Admin => "admin",
            Role::Unknown => "unknown",
        }
    }
}

impl FromStr for Role {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let role = match s.trim().to_ascii_lowercase().as_str() {
            "user" => Role::User,
            "agent" => Role::Agent,
            "admin" => Role::Admin,
            _ => Role::Unknown,
        };
        Ok(role)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // Non-string roles (null, numbers) are treated as unknown.
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match value {
            serde_json::Value::String(s) => s.parse().unwrap_or_default(),
            _ => Role::Unknown,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Agent".parse::<Role>().unwrap(), Role::Agent);
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(" user ".parse::<Role>().unwrap(), Role::User);
    }

    #[test]
    fn unrecognized_is_unknown() {
        assert_eq!("superuser".parse::<Role>().unwrap(), Role::Unknown);
        let role: Role = serde_json::from_str("42").unwrap();
        assert_eq!(role, Role::Unknown);
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Agent).unwrap(), "\"agent\"");
    }
}
