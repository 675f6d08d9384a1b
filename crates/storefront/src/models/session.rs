//! Session identity model.
//!
//! Stored in the server-side session after a successful identity-provider
//! callback, and forwarded to the backend on every caller-scoped request.
//! The storefront never inspects the token; the backend validates it.

use serde::{Deserialize, Serialize};

use sprtshop_core::PrincipalId;

/// Signed-in caller identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    /// Stable identifier issued by the identity provider.
    pub principal: PrincipalId,
    /// Opaque proof token, passed through to the backend verbatim.
    pub token: String,
}

/// An in-flight login, stored while the caller is away at the identity
/// provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginAttempt {
    /// Random value the provider must echo back in the callback.
    pub state: String,
    /// Storefront-local path to land on after signing in.
    pub return_to: Option<String>,
}

/// Session storage keys.
pub mod keys {
    /// Key under which [`super::Identity`] is stored.
    pub const IDENTITY: &str = "identity";
    /// Key under which [`super::LoginAttempt`] is stored.
    pub const LOGIN_ATTEMPT: &str = "login_attempt";
}
