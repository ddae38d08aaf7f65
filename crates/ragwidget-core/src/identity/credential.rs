//! Credential store abstraction.

use crate::error::Result;
use std::sync::{Arc, RwLock};

/// Read access to the locally stored bearer token, plus logout.
///
/// Role resolution only ever reads from the store; `clear` is reserved for
/// the logout action.
pub trait CredentialStore: Send + Sync {
    /// Returns the stored token, or `None` when nobody is logged in.
    fn load_token(&self) -> Option<String>;

    /// Removes the stored token.
    fn clear(&self) -> Result<()>;
}

/// Credential store kept in memory.
///
/// Used by embedding hosts that hand the token over directly, and by tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentialStore {
    token: Arc<RwLock<Option<String>>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Arc::new(RwLock::new(Some(token.into()))),
        }
    }

    pub fn set_token(&self, token: impl Into<String>) {
        if let Ok(mut guard) = self.token.write() {
            *guard = Some(token.into());
        }
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn load_token(&self) -> Option<String> {
        self.token.read().ok().and_then(|guard| guard.clone())
    }

    fn clear(&self) -> Result<()> {
        let mut guard = self
            .token
            .write()
            .map_err(|e| crate::WidgetError::credential(format!("Token lock poisoned: {}", e)))?;
        *guard = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_store_roundtrip() {
        let store = InMemoryCredentialStore::new();
        assert!(store.load_token().is_none());

        store.set_token("abc");
        assert_eq!(store.load_token().as_deref(), Some("abc"));

        store.clear().unwrap();
        assert!(store.load_token().is_none());
    }
}
