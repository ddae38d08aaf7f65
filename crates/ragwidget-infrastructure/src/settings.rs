//! Widget settings loaded from `~/.config/ragwidget/config.toml`.
//!
//! Precedence, highest first: explicit overrides from the caller (CLI
//! flags), `RAGWIDGET_*` environment variables, the TOML file, built-in
//! defaults.

use crate::paths::WidgetPaths;
use ragwidget_core::config::{DEFAULT_API_BASE_URL, WidgetConfig};
use ragwidget_core::identity::{CredentialStore, Role};
use ragwidget_core::{Result, WidgetError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::Duration;

pub const ENV_API_BASE_URL: &str = "RAGWIDGET_API_BASE_URL";
pub const ENV_FORCED_ROLE: &str = "RAGWIDGET_FORCED_ROLE";

pub const DEFAULT_WIDGET_ORIGIN: &str = "http://localhost:4200";
pub const DEFAULT_EMBED_PATH: &str = "/widget-embed";

/// Where the embeddable widget UI is served from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedSettings {
    pub widget_origin: String,
    pub embed_path: String,
}

impl Default for EmbedSettings {
    fn default() -> Self {
        Self {
            widget_origin: DEFAULT_WIDGET_ORIGIN.to_string(),
            embed_path: DEFAULT_EMBED_PATH.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetSettings {
    pub api_base_url: String,
    /// Overrides the role claim of the stored token.
    pub forced_role: Option<Role>,
    pub request_timeout_secs: u64,
    pub bulk_refresh_delay_secs: u64,
    pub embed: EmbedSettings,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            forced_role: None,
            request_timeout_secs: 60,
            bulk_refresh_delay_secs: 10,
            embed: EmbedSettings::default(),
        }
    }
}

impl WidgetSettings {
    /// Parses settings from TOML text. Blank text yields the defaults.
    pub fn from_toml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(toml::from_str(content)?)
    }

    /// Reads settings from a file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("[Settings] No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|e| {
            WidgetError::io(format!("Failed to read config file at {:?}: {}", path, e))
        })?;
        Self::from_toml(&content)
    }

    /// Applies `RAGWIDGET_*` overrides using the given variable lookup.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_BASE_URL).filter(|v| !v.trim().is_empty()) {
            self.api_base_url = url;
        }
        if let Some(role) = lookup(ENV_FORCED_ROLE).filter(|v| !v.trim().is_empty()) {
            self.forced_role = Some(
                role.parse::<Role>()
                    .map_err(|e| WidgetError::config(format!("{}: {}", ENV_FORCED_ROLE, e)))?,
            );
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Builds the orchestrator config around the given credential store.
    pub fn to_widget_config(&self, credential_store: Arc<dyn CredentialStore>) -> WidgetConfig {
        WidgetConfig::new(self.api_base_url.clone(), credential_store, self.forced_role)
            .with_bulk_refresh_delay(Duration::from_secs(self.bulk_refresh_delay_secs))
    }
}

/// Loads and caches widget settings.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached settings; filled on first access.
    settings: Arc<RwLock<Option<WidgetSettings>>>,
}

impl ConfigService {
    /// Uses the default config file location.
    pub fn new(paths: &WidgetPaths) -> Result<Self> {
        Ok(Self::with_path(paths.config_file()?))
    }

    /// Uses a custom config file (for testing or `--config`).
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            settings: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the settings, reading the file and environment on first access.
    pub fn get_settings(&self) -> Result<WidgetSettings> {
        if let Ok(read_lock) = self.settings.read()
            && let Some(cached) = read_lock.as_ref()
        {
            return Ok(cached.clone());
        }

        let mut loaded = WidgetSettings::load(&self.path)?;
        loaded.apply_env_overrides(|key| std::env::var(key).ok())?;

        if let Ok(mut write_lock) = self.settings.write() {
            *write_lock = Some(loaded.clone());
        }

        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        if let Ok(mut write_lock) = self.settings.write() {
            *write_lock = None;
        }
    }
}
