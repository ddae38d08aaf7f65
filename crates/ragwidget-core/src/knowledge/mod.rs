//! Knowledge state domain module.
//!
//! - `model`: Backend-reported ingestion statistics (`KnowledgeState`)
//! - `cache`: Last known snapshot (`KnowledgeStateCache`)

mod cache;
mod model;

pub use cache::KnowledgeStateCache;
pub use model::{KnowledgeState, KnowledgeStatus};
