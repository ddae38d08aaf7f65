use crate::conversation::Source;
use serde::{Deserialize, Serialize};

/// `status` value the backend uses when a bulk scrape discovers nothing.
pub const NO_URLS_FOUND: &str = "no_urls_found";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    pub max_results: u32,
    pub include_sources: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryAnswer {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub sources: Option<Vec<Source>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeRequest {
    pub url: String,
    pub store_in_knowledge: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScrapeReport {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content_length: u64,
    #[serde(default)]
    pub method_used: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkScrapeRequest {
    pub base_url: String,
    pub max_depth: u32,
    pub max_urls: u32,
    pub auto_store: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BulkScrapeReport {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub discovered_urls_count: Option<u64>,
    #[serde(default)]
    pub estimated_time: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub urls_preview: Vec<String>,
}

impl BulkScrapeReport {
    /// True when the crawl found nothing and no ingestion was started.
    pub fn found_nothing(&self) -> bool {
        self.status.as_deref() == Some(NO_URLS_FOUND)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_request_wire_names() {
        let body = serde_json::to_value(QueryRequest {
            query: "q".to_string(),
            max_results: 5,
            include_sources: true,
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"query": "q", "max_results": 5, "include_sources": true})
        );
    }

    #[test]
    fn test_query_answer_tolerates_nulls() {
        let answer: QueryAnswer =
            serde_json::from_str(r#"{"answer": null, "sources": null}"#).unwrap();
        assert!(answer.answer.is_none());
        assert!(answer.sources.is_none());
    }

    #[test]
    fn test_bulk_report_no_urls_found() {
        let report: BulkScrapeReport = serde_json::from_str(
            r#"{"status": "no_urls_found", "message": "No URLs discovered from the base URL"}"#,
        )
        .unwrap();
        assert!(report.found_nothing());
        assert!(report.discovered_urls_count.is_none());
    }
}
