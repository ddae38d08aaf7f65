//! Application layer for the RAG widget.
//!
//! The orchestrator coordinates backend calls with the domain state; the
//! embed module renders the loader script that hosts the widget on a
//! third-party page.

pub mod confirmation;
pub mod embed;
pub mod orchestrator;

pub use confirmation::{AutoConfirm, ConfirmationPrompt};
pub use embed::{EmbedConfig, EmbedSnippet};
pub use orchestrator::{ClearOutcome, WidgetOrchestrator, WidgetSnapshot};
