//! Backend capability consumed by the orchestrator.
//!
//! The trait lives here so the orchestrator can be driven by the HTTP
//! client in `ragwidget-interaction` or by a scripted double in tests.
//!
//! - `wire`: Request and response shapes of the widget endpoints
//! - `upload`: Upload input, event stream and progress tracking

mod upload;
mod wire;

pub use upload::{ProgressTracker, UploadEvent, UploadEventStream, UploadFile, UploadReceipt};
pub use wire::{
    BulkScrapeReport, BulkScrapeRequest, NO_URLS_FOUND, QueryAnswer, QueryRequest, ScrapeReport,
    ScrapeRequest,
};

use crate::error::Result;
use crate::knowledge::KnowledgeState;
use async_trait::async_trait;

/// The external knowledge-base service, as seen by the widget.
#[async_trait]
pub trait WidgetBackend: Send + Sync {
    /// Asks a question against the knowledge base.
    async fn query(&self, request: &QueryRequest) -> Result<QueryAnswer>;

    /// Scrapes a single page.
    async fn scrape(&self, request: &ScrapeRequest) -> Result<ScrapeReport>;

    /// Starts a recursive scrape; ingestion continues on the backend.
    async fn bulk_scrape(&self, request: &BulkScrapeRequest) -> Result<BulkScrapeReport>;

    /// Reads the current ingestion statistics.
    async fn knowledge_stats(&self) -> Result<KnowledgeState>;

    /// Deletes every document in the knowledge base.
    async fn clear_knowledge(&self) -> Result<()>;

    /// Uploads a file, reporting progress.
    ///
    /// The returned stream is lazy, finite and not restartable. It yields
    /// zero or more `Progress` events followed by exactly one `Completed`
    /// or `Failed` event.
    fn upload_file(&self, file: UploadFile) -> UploadEventStream;
}
