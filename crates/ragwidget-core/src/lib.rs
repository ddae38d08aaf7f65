//! Domain layer of the RAG widget client.
//!
//! Holds the state the orchestrator manipulates (conversation log,
//! knowledge state, operation slots), role resolution, and the backend
//! capability trait. No I/O happens here.

pub mod backend;
pub mod config;
pub mod conversation;
pub mod error;
pub mod event;
pub mod identity;
pub mod knowledge;
pub mod operation;
pub mod panel;

// Re-export common error type
pub use error::{Result, WidgetError};
