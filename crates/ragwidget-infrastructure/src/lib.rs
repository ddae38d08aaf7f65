//! Infrastructure layer for the RAG widget.
//!
//! File-backed implementations of the core abstractions: settings loading,
//! credential storage and platform paths.

pub mod credential_store;
pub mod paths;
pub mod settings;

pub use credential_store::FileCredentialStore;
pub use paths::WidgetPaths;
pub use settings::{ConfigService, EmbedSettings, WidgetSettings};
