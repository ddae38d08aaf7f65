//! Role resolution.
//!
//! Tokens are decoded without signature verification. The result only
//! decides which parts of the widget are shown; it is never a security
//! boundary.

use super::credential::CredentialStore;
use super::model::Role;
use crate::error::{Result, WidgetError};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;

/// Redirect target returned by logout.
pub const LOGIN_PATH: &str = "/login";

/// Capability that yields the session role.
#[derive(Clone)]
pub enum IdentityProvider {
    /// Decode the `role` claim of the stored bearer token.
    TokenBased(Arc<dyn CredentialStore>),
    /// Always return the given role, ignoring any stored credential.
    Fixed(Role),
}

impl IdentityProvider {
    /// Builds a provider from an optional forced role and a credential store.
    ///
    /// A forced role takes precedence over the stored token.
    pub fn from_parts(forced_role: Option<Role>, store: Arc<dyn CredentialStore>) -> Self {
        match forced_role {
            Some(role) => Self::Fixed(role),
            None => Self::TokenBased(store),
        }
    }

    /// Resolves the role. Fails closed: anything unexpected yields `Role::User`.
    pub fn resolve_role(&self) -> Role {
        match self {
            Self::Fixed(role) => *role,
            Self::TokenBased(store) => {
                let Some(token) = store.load_token() else {
                    return Role::User;
                };

                match decode_role_claim(&token) {
                    Ok(role) => role,
                    Err(e) => {
                        tracing::warn!("[Identity] Invalid token, falling back to user role: {}", e);
                        Role::User
                    }
                }
            }
        }
    }
}

impl fmt::Debug for IdentityProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TokenBased(_) => f.write_str("IdentityProvider::TokenBased"),
            Self::Fixed(role) => write!(f, "IdentityProvider::Fixed({})", role),
        }
    }
}

#[derive(Deserialize)]
struct RoleClaims {
    role: Option<String>,
}

/// Extracts the `role` claim from a JWT's payload segment.
pub fn decode_role_claim(token: &str) -> Result<Role> {
    let payload = token
        .split('.')
        .nth(1)
        .filter(|segment| !segment.is_empty())
        .ok_or_else(|| WidgetError::credential("Token has no payload segment"))?;

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| WidgetError::Serialization {
            format: "JWT".to_string(),
            message: e.to_string(),
        })?;

    let claims: RoleClaims = serde_json::from_slice(&bytes)?;
    let role = claims
        .role
        .ok_or_else(|| WidgetError::credential("Token has no role claim"))?;

    // Exact match only; the lenient `FromStr` is for flags and settings.
    match role.as_str() {
        "admin" => Ok(Role::Admin),
        "user" => Ok(Role::User),
        other => Err(WidgetError::credential(format!(
            "Unknown role claim: {:?}",
            other
        ))),
    }
}
