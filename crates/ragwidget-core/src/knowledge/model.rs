use serde::{Deserialize, Serialize};
use std::fmt;

/// Status string reported by the backend.
///
/// Unknown values are kept verbatim so that newer backends still display.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum KnowledgeStatus {
    #[default]
    Unknown,
    Ready,
    Cleared,
    Error,
    Other(String),
}

impl KnowledgeStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Unknown => "unknown",
            Self::Ready => "ready",
            Self::Cleared => "cleared",
            Self::Error => "error",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for KnowledgeStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "unknown" => Self::Unknown,
            "ready" => Self::Ready,
            "cleared" => Self::Cleared,
            "error" => Self::Error,
            _ => Self::Other(value),
        }
    }
}

impl From<KnowledgeStatus> for String {
    fn from(value: KnowledgeStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for KnowledgeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of the knowledge base's ingestion statistics.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KnowledgeState {
    #[serde(default)]
    pub document_count: u64,
    #[serde(default)]
    pub status: KnowledgeStatus,
    /// Backend timestamp, or empty when unknown or cleared locally.
    #[serde(default)]
    pub last_updated: String,
}

impl KnowledgeState {
    /// The state applied locally after a successful clear.
    pub fn cleared() -> Self {
        Self {
            document_count: 0,
            status: KnowledgeStatus::Cleared,
            last_updated: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_backend_stats() {
        let state: KnowledgeState = serde_json::from_str(
            r#"{"document_count": 12, "status": "ready", "last_updated": "2024-05-01T10:00:00"}"#,
        )
        .unwrap();
        assert_eq!(state.document_count, 12);
        assert_eq!(state.status, KnowledgeStatus::Ready);
        assert_eq!(state.last_updated, "2024-05-01T10:00:00");
    }

    #[test]
    fn test_unknown_status_is_preserved() {
        let state: KnowledgeState =
            serde_json::from_str(r#"{"document_count": 3, "status": "indexing"}"#).unwrap();
        assert_eq!(state.status, KnowledgeStatus::Other("indexing".to_string()));
        assert_eq!(state.status.to_string(), "indexing");
        assert!(state.last_updated.is_empty());
    }
}
