//! Access token claims
//!
//! The client decodes the token payload without verifying the signature:
//! the backend re-validates the token on every call, and the decoded role
//! only steers navigation. Treat the result as a routing hint, never as an
//! authorization decision.

use chrono::Utc;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::Role;

/// Claims issued by `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user email)
    pub sub: String,
    /// Role claim
    #[serde(default)]
    pub role: Option<String>,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    pub fn role(&self) -> Option<Role> {
        self.role.as_deref().and_then(Role::parse)
    }
}

/// Decode a token's claims without signature verification.
///
/// Malformed and expired tokens both come back as `None`; the caller treats
/// either the same as having no token at all.
pub fn peek_claims(token: &str) -> Option<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;

    let data = decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation).ok()?;
    if data.claims.is_expired() {
        return None;
    }
    Some(data.claims)
}
