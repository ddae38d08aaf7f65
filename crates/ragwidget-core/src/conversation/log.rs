//! Append-only conversation log.

use super::entry::{ChatEntry, ChatRole, Source};
use crate::identity::Role;
use chrono::Utc;
use uuid::Uuid;

pub const ADMIN_GREETING: &str = "Welcome, Admin!";
pub const USER_GREETING: &str = "Welcome User !";

/// Time-ordered sequence of chat entries.
///
/// There is deliberately no way to edit or remove an entry; a reset means
/// building a new log.
#[derive(Debug, Clone, Default)]
pub struct ConversationLog {
    entries: Vec<ChatEntry>,
}

impl ConversationLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a log holding only the role-specific greeting.
    pub fn seeded(role: Role) -> Self {
        let mut log = Self::new();
        let greeting = if role.is_admin() {
            ADMIN_GREETING
        } else {
            USER_GREETING
        };
        log.append(ChatRole::Bot, greeting, Vec::new());
        log
    }

    /// Appends a new entry at the tail and returns it.
    ///
    /// The id is a fresh UUID. The timestamp never goes backwards, even if
    /// the wall clock does.
    pub fn append(
        &mut self,
        role: ChatRole,
        content: impl Into<String>,
        sources: Vec<Source>,
    ) -> &ChatEntry {
        let now = Utc::now();
        let created_at = match self.entries.last() {
            Some(last) if last.created_at > now => last.created_at,
            _ => now,
        };

        self.entries.push(ChatEntry {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            created_at,
            sources,
        });

        &self.entries[self.entries.len() - 1]
    }

    /// Read-only view of all entries in insertion order.
    pub fn all(&self) -> &[ChatEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&ChatEntry> {
        self.entries.last()
    }
}
