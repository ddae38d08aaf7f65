//! Wiring from global flags to a ready orchestrator.

use anyhow::{Context, Result};
use ragwidget_application::WidgetOrchestrator;
use ragwidget_core::config::WidgetConfig;
use ragwidget_core::identity::Role;
use ragwidget_infrastructure::{ConfigService, FileCredentialStore, WidgetPaths, WidgetSettings};
use ragwidget_interaction::WidgetApiClient;
use std::path::PathBuf;
use std::sync::Arc;

/// Flags shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct GlobalArgs {
    pub api_base_url: Option<String>,
    pub as_role: Option<Role>,
    pub config: Option<PathBuf>,
}

/// Settings with CLI flags applied on top of file and environment.
pub fn load_settings(args: &GlobalArgs) -> Result<WidgetSettings> {
    let service = match &args.config {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new(&WidgetPaths::new())?,
    };
    let mut settings = service
        .get_settings()
        .with_context(|| format!("Failed to load settings from {:?}", service.path()))?;

    if let Some(url) = &args.api_base_url {
        settings.api_base_url = url.clone();
    }
    if let Some(role) = args.as_role {
        settings.forced_role = Some(role);
    }
    Ok(settings)
}

pub fn credential_store() -> Result<FileCredentialStore> {
    Ok(FileCredentialStore::new(&WidgetPaths::new())?)
}

/// Runtime config backed by the token file.
pub fn widget_config(args: &GlobalArgs) -> Result<(WidgetSettings, WidgetConfig)> {
    let settings = load_settings(args)?;
    let config = settings.to_widget_config(Arc::new(credential_store()?));
    Ok((settings, config))
}

/// Builds the orchestrator without touching the network.
pub fn build(args: &GlobalArgs) -> Result<WidgetOrchestrator> {
    let (settings, config) = widget_config(args)?;
    let client = WidgetApiClient::from_config(&config, settings.request_timeout())?;
    Ok(WidgetOrchestrator::new(config, Arc::new(client)))
}

/// Like `build`, followed by the initial knowledge stats load.
pub async fn connect(args: &GlobalArgs) -> Result<WidgetOrchestrator> {
    let (settings, config) = widget_config(args)?;
    let client = WidgetApiClient::from_config(&config, settings.request_timeout())?;
    Ok(WidgetOrchestrator::initialize(config, Arc::new(client)).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_flags_override_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "api_base_url = \"http://file:1/api\"\nforced_role = \"user\"\n",
        )
        .unwrap();

        let args = GlobalArgs {
            api_base_url: Some("http://flag:2/api".to_string()),
            as_role: Some(Role::Admin),
            config: Some(path),
        };
        let settings = load_settings(&args).unwrap();
        assert_eq!(settings.api_base_url, "http://flag:2/api");
        assert_eq!(settings.forced_role, Some(Role::Admin));
    }

    #[test]
    fn test_file_values_kept_without_flags() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "request_timeout_secs = 5\n").unwrap();

        let args = GlobalArgs {
            config: Some(path),
            ..GlobalArgs::default()
        };
        let settings = load_settings(&args).unwrap();
        assert_eq!(settings.request_timeout_secs, 5);
    }
}
