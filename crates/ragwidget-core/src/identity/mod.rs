//! Identity domain module.
//!
//! Resolves the caller's role (admin or user) from a locally stored
//! credential token or from a fixed override.
//!
//! # Module Structure
//!
//! - `model`: The `Role` type
//! - `credential`: Credential store trait and the in-memory store
//! - `provider`: Role resolution (`IdentityProvider`)
//!
//! # Usage
//!
//! ```ignore
//! use ragwidget_core::identity::{IdentityProvider, Role};
//!
//! let provider = IdentityProvider::Fixed(Role::Admin);
//! assert_eq!(provider.resolve_role(), Role::Admin);
//! ```

mod credential;
mod model;
mod provider;

// Re-export public API
pub use credential::{CredentialStore, InMemoryCredentialStore};
pub use model::Role;
pub use provider::{IdentityProvider, LOGIN_PATH, decode_role_claim};
