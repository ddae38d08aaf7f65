//! Runtime configuration handed to the orchestrator.
//!
//! Replaces ambient globals (API base URL, token storage, forced role) with
//! one value passed in at construction.

use crate::identity::{CredentialStore, IdentityProvider, Role};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_BULK_REFRESH_DELAY: Duration = Duration::from_secs(10);
pub const WIDGET_API_PREFIX: &str = "/rag-widget/widget";

/// Parameters sent with every query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    pub max_results: u32,
    pub include_sources: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            max_results: 5,
            include_sources: true,
        }
    }
}

/// Crawl limits sent with every bulk scrape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkScrapeOptions {
    pub max_depth: u32,
    pub max_urls: u32,
    pub auto_store: bool,
}

impl Default for BulkScrapeOptions {
    fn default() -> Self {
        Self {
            max_depth: 2,
            max_urls: 50,
            auto_store: true,
        }
    }
}

#[derive(Clone)]
pub struct WidgetConfig {
    pub api_base_url: String,
    pub credential_store: Arc<dyn CredentialStore>,
    pub identity: IdentityProvider,
    /// Delay before re-reading stats after a bulk scrape starts. The backend
    /// gives no completion signal, so this is only an estimate.
    pub bulk_refresh_delay: Duration,
    pub query: QueryOptions,
    pub bulk: BulkScrapeOptions,
}

impl WidgetConfig {
    /// Builds a config whose identity honours `forced_role` first and the
    /// stored token otherwise.
    pub fn new(
        api_base_url: impl Into<String>,
        credential_store: Arc<dyn CredentialStore>,
        forced_role: Option<Role>,
    ) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            identity: IdentityProvider::from_parts(forced_role, credential_store.clone()),
            credential_store,
            bulk_refresh_delay: DEFAULT_BULK_REFRESH_DELAY,
            query: QueryOptions::default(),
            bulk: BulkScrapeOptions::default(),
        }
    }

    pub fn with_bulk_refresh_delay(mut self, delay: Duration) -> Self {
        self.bulk_refresh_delay = delay;
        self
    }

    /// Full URL of the widget endpoints, without a trailing slash.
    pub fn widget_endpoint(&self) -> String {
        format!(
            "{}{}",
            self.api_base_url.trim_end_matches('/'),
            WIDGET_API_PREFIX
        )
    }
}

impl fmt::Debug for WidgetConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetConfig")
            .field("api_base_url", &self.api_base_url)
            .field("identity", &self.identity)
            .field("bulk_refresh_delay", &self.bulk_refresh_delay)
            .field("query", &self.query)
            .field("bulk", &self.bulk)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::InMemoryCredentialStore;

    #[test]
    fn test_defaults() {
        let config = WidgetConfig::new(
            DEFAULT_API_BASE_URL,
            Arc::new(InMemoryCredentialStore::new()),
            None,
        );
        assert_eq!(config.query.max_results, 5);
        assert!(config.query.include_sources);
        assert_eq!(config.bulk.max_depth, 2);
        assert_eq!(config.bulk.max_urls, 50);
        assert_eq!(config.bulk_refresh_delay, Duration::from_secs(10));
        assert!(matches!(config.identity, IdentityProvider::TokenBased(_)));
    }

    #[test]
    fn test_widget_endpoint_trims_trailing_slash() {
        let config = WidgetConfig::new(
            "http://example.com/api/",
            Arc::new(InMemoryCredentialStore::new()),
            Some(Role::Admin),
        );
        assert_eq!(
            config.widget_endpoint(),
            "http://example.com/api/rag-widget/widget"
        );
        assert!(matches!(config.identity, IdentityProvider::Fixed(Role::Admin)));
    }
}
