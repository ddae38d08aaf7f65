//! Conversation domain module.
//!
//! - `entry`: Chat entry types (`ChatRole`, `ChatEntry`, `Source`)
//! - `log`: The append-only conversation log (`ConversationLog`)

mod entry;
mod log;

// Re-export public API
pub use entry::{ChatEntry, ChatRole, Source};
pub use log::{ADMIN_GREETING, ConversationLog, USER_GREETING};
