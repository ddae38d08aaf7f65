//! Unified path management for ragwidget files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/ragwidget/         # Config directory
//! ├── config.toml              # Widget settings
//! └── token                    # Bearer token written by `ragwidget login`
//! ```

use std::path::{Path, PathBuf};

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for ragwidget_core::WidgetError {
    fn from(err: PathError) -> Self {
        ragwidget_core::WidgetError::config(err.to_string())
    }
}

/// Resolves ragwidget paths, optionally under a custom base directory.
#[derive(Debug, Clone, Default)]
pub struct WidgetPaths {
    base: Option<PathBuf>,
}

impl WidgetPaths {
    const APP_DIR: &'static str = "ragwidget";

    /// Uses the platform config directory (e.g. `~/.config/ragwidget/`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `base` as the config directory (for testing).
    pub fn with_base(base: impl AsRef<Path>) -> Self {
        Self {
            base: Some(base.as_ref().to_path_buf()),
        }
    }

    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(Self::APP_DIR))
                .ok_or(PathError::ConfigDirNotFound),
        }
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    pub fn token_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("token"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_under_custom_base() {
        let paths = WidgetPaths::with_base("/tmp/ragwidget-test");
        assert_eq!(
            paths.config_file().unwrap(),
            PathBuf::from("/tmp/ragwidget-test/config.toml")
        );
        assert_eq!(
            paths.token_file().unwrap(),
            PathBuf::from("/tmp/ragwidget-test/token")
        );
    }
}
