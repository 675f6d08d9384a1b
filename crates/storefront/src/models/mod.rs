//! Session-scoped models.

pub mod session;

pub use session::{Identity, LoginAttempt, keys as session_keys};
