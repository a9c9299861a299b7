//! Session management - token persistence and role derivation
//!
//! The session is the only state shared across views: written by the login
//! and logout flows, read on every navigation. The stored token is the
//! single source of truth; the role is always derived from it.

pub mod claims;
pub mod store;

pub use claims::{peek_claims, Claims};
pub use store::{FileTokenStore, MemoryTokenStore, SessionStore, TokenStore};

use crate::domain::Role;

/// Point-in-time view of the session, the guard's only input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub role: Option<Role>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(token: impl Into<String>, role: Role) -> Self {
        Self {
            token: Some(token.into()),
            role: Some(role),
        }
    }
}
