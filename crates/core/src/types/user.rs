//! User profiles and roles.

use serde::{Deserialize, Serialize};

/// Caller-scoped profile data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Display name shown in navigation.
    pub name: String,
}

/// Role associated with an identity.
///
/// Assigned by the backend; an existing admin may grant admin to another
/// identity. Signed-out visitors are guests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    User,
    #[default]
    Guest,
}

impl Role {
    /// Wire/form value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
            Self::Guest => "guest",
        }
    }

    /// Whether this role grants access to the admin console.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}
