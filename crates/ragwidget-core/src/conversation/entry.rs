//! Conversation entry types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a chat entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Text typed by the end user.
    User,
    /// Answers, confirmations and error notices produced by the widget.
    Bot,
}

/// A knowledge-base document cited by an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub url: String,
    pub relevance_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_preview: Option<String>,
}

/// A single entry in the conversation log.
///
/// Entries are immutable once appended; the log hands out shared references
/// only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatEntry {
    /// Unique identifier within the session.
    pub id: String,
    pub role: ChatRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
    /// Cited sources, in the order the backend ranked them.
    #[serde(default)]
    pub sources: Vec<Source>,
}

impl ChatEntry {
    pub fn is_bot(&self) -> bool {
        self.role == ChatRole::Bot
    }
}
