//! Operation orchestrator.
//!
//! Owns the conversation log, the knowledge state cache and one slot per
//! operation kind. Every operation follows the same shape:
//!
//! 1. Validate input (empty input is ignored).
//! 2. Claim the slot; if it is already active the request is rejected.
//! 3. Await the backend call without holding the state lock.
//! 4. Fold the outcome into state and release the slot.
//!
//! Failures never escape: each one becomes a chat entry, a status record,
//! an upload error or an alert.

mod state;


pub use state::WidgetSnapshot;

use crate::confirmation::ConfirmationPrompt;
use futures::StreamExt;
use ragwidget_core::backend::{
    BulkScrapeRequest, QueryRequest, ScrapeRequest, UploadEvent, UploadFile, WidgetBackend,
};
use ragwidget_core::config::WidgetConfig;
use ragwidget_core::conversation::{ChatEntry, ChatRole, Source};
use ragwidget_core::event::WidgetEvent;
use ragwidget_core::identity::{LOGIN_PATH, Role};
use ragwidget_core::knowledge::KnowledgeState;
use ragwidget_core::operation::{
    Dispatch, DraftField, OperationKind, OperationSlot, SlotResult, StatusRecord,
};
use ragwidget_core::panel::WidgetKey;
use ragwidget_core::{Result, WidgetError};
use state::WidgetState;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::broadcast;

pub const QUERY_EMPTY_ANSWER: &str = "No response received.";
pub const QUERY_FAILURE_MESSAGE: &str =
    "Error while processing your question. Check if backend is running or try again later.";

pub const SCRAPE_SUCCESS_TITLE: &str = "Scraping Successful!";
pub const SCRAPE_FAILURE_TITLE: &str = "Scraping Failed";
pub const SCRAPE_FAILURE_MESSAGE: &str = "Unable to scrape URL. Please check and retry.";

pub const BULK_SUCCESS_TITLE: &str = "Bulk Scraping Started!";
pub const BULK_EMPTY_TITLE: &str = "No URLs Discovered";
pub const BULK_EMPTY_MESSAGE: &str = "No URLs discovered from the base URL.";
pub const BULK_FAILURE_TITLE: &str = "Bulk Scraping Failed";
pub const BULK_FAILURE_MESSAGE: &str = "Failed to bulk scrape. Check base URL.";

pub const UPLOAD_FAILURE_PREFIX: &str = "Upload failed: ";
pub const UPLOAD_FAILURE_MESSAGE: &str = "Unexpected error during upload.";

pub const CLEAR_CONFIRMATION_PROMPT: &str = "Are you sure you want to clear the knowledge base?";
pub const CLEAR_SUCCESS_MESSAGE: &str =
    "Knowledge base cleared. You can now scrape fresh content.";
pub const CLEAR_FAILURE_ALERT: &str = "Failed to clear knowledge base.";

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Result of `clear_knowledge`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClearOutcome {
    /// The user did not confirm; nothing was sent.
    Declined,
    Cleared,
    /// The backend call failed; the alert was also published as an event.
    Failed { alert: String },
}

struct Inner {
    config: WidgetConfig,
    backend: Arc<dyn WidgetBackend>,
    state: Mutex<WidgetState>,
    events: broadcast::Sender<WidgetEvent>,
}

/// The widget's client-side state machine.
///
/// Cheap to clone; clones share the same state. Different operation kinds
/// may run concurrently, e.g. with `tokio::join!`.
#[derive(Clone)]
pub struct WidgetOrchestrator {
    inner: Arc<Inner>,
}

/// Returns a slot to idle when dropped, so a cancelled future never leaves
/// its slot stuck in `Active`.
struct SlotGuard<'a> {
    orchestrator: &'a WidgetOrchestrator,
    kind: OperationKind,
    finished: bool,
}

impl SlotGuard<'_> {
    fn finish(mut self, result: SlotResult) {
        self.finished = true;
        self.orchestrator.release_slot(self.kind, result);
    }
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            tracing::debug!("[Orchestrator] {} dropped before completion", self.kind);
            self.orchestrator
                .release_slot(self.kind, SlotResult::Failed("cancelled".to_string()));
        }
    }
}

impl WidgetOrchestrator {
    /// Resolves the role and seeds the conversation. Performs no I/O.
    pub fn new(config: WidgetConfig, backend: Arc<dyn WidgetBackend>) -> Self {
        let role = config.identity.resolve_role();
        tracing::info!("[Orchestrator] Session initialized with role: {}", role);

        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                config,
                backend,
                state: Mutex::new(WidgetState::new(role)),
                events,
            }),
        }
    }

    /// Like `new`, followed by the initial knowledge stats refresh.
    pub async fn initialize(config: WidgetConfig, backend: Arc<dyn WidgetBackend>) -> Self {
        let orchestrator = Self::new(config, backend);
        orchestrator.refresh_knowledge_stats().await;
        orchestrator
    }

    // ============================================================================
    // Observation
    // ============================================================================

    pub fn subscribe(&self) -> broadcast::Receiver<WidgetEvent> {
        self.inner.events.subscribe()
    }

    pub fn snapshot(&self) -> WidgetSnapshot {
        self.with_state(|state| state.snapshot())
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.inner.config
    }

    pub fn role(&self) -> Role {
        self.with_state(|state| state.role)
    }

    pub fn entries(&self) -> Vec<ChatEntry> {
        self.with_state(|state| state.log.all().to_vec())
    }

    pub fn knowledge(&self) -> KnowledgeState {
        self.with_state(|state| state.knowledge.get().clone())
    }

    pub fn slot(&self, kind: OperationKind) -> OperationSlot {
        self.with_state(|state| state.slots.get(kind).clone())
    }

    pub fn scrape_status(&self) -> Option<StatusRecord> {
        self.with_state(|state| state.scrape_status.clone())
    }

    pub fn set_draft(&self, field: DraftField, value: impl Into<String>) {
        let value = value.into();
        self.with_state(|state| *state.drafts.field_mut(field) = value);
    }

    // ============================================================================
    // Operations
    // ============================================================================

    /// Sends a question and appends the answer (or a fixed error notice).
    pub async fn submit_query(&self, text: &str) -> Dispatch {
        let query = text.trim();
        if query.is_empty() {
            return Dispatch::Ignored;
        }

        // Claim the slot and record the question in one step so a rejected
        // submission leaves the log untouched.
        let claimed = self.with_state(|state| {
            if !state.slots.try_activate(OperationKind::Query) {
                return None;
            }
            state.drafts.clear(DraftField::Message);
            Some(state.log.append(ChatRole::User, query, Vec::new()).clone())
        });
        let Some(user_entry) = claimed else {
            tracing::debug!("[Orchestrator] Query rejected: slot busy");
            return Dispatch::Busy;
        };
        self.publish(WidgetEvent::EntryAppended { entry: user_entry });
        self.publish_slot(OperationKind::Query, true);
        let guard = self.guard(OperationKind::Query);

        let request = QueryRequest {
            query: query.to_string(),
            max_results: self.inner.config.query.max_results,
            include_sources: self.inner.config.query.include_sources,
        };
        tracing::info!("[Orchestrator] Dispatching query ({} chars)", query.len());

        let result = match self.inner.backend.query(&request).await {
            Ok(answer) => {
                let content = answer
                    .answer
                    .filter(|a| !a.trim().is_empty())
                    .unwrap_or_else(|| QUERY_EMPTY_ANSWER.to_string());
                self.append(ChatRole::Bot, content, answer.sources.unwrap_or_default());
                SlotResult::Succeeded
            }
            Err(e) => {
                tracing::warn!("[Orchestrator] Query failed: {}", e);
                self.append(ChatRole::Bot, QUERY_FAILURE_MESSAGE, Vec::new());
                SlotResult::Failed(e.to_string())
            }
        };

        guard.finish(result);
        Dispatch::Completed
    }

    /// Scrapes one page into the knowledge base.
    pub async fn scrape_url(&self, url: &str) -> Dispatch {
        let url = url.trim();
        if url.is_empty() {
            return Dispatch::Ignored;
        }
        let Some(guard) = self.begin(OperationKind::SingleScrape) else {
            return Dispatch::Busy;
        };
        self.set_scrape_status(None);

        let request = ScrapeRequest {
            url: url.to_string(),
            store_in_knowledge: true,
        };
        tracing::info!("[Orchestrator] Dispatching scrape: {}", url);

        match self.inner.backend.scrape(&request).await {
            Ok(report) => {
                let status = StatusRecord::new(
                    SCRAPE_SUCCESS_TITLE,
                    format!("Scraped \"{}\" and added to knowledge base.", report.title),
                )
                .with_details(format!(
                    "Content length: {}, Method: {}",
                    report.content_length, report.method_used
                ));
                self.set_scrape_status(Some(status));
                self.with_state(|state| state.drafts.clear(DraftField::ScrapeUrl));
                guard.finish(SlotResult::Succeeded);
                self.refresh_knowledge_stats().await;
            }
            Err(e) => {
                tracing::warn!("[Orchestrator] Scrape of {} failed: {}", url, e);
                self.set_scrape_status(Some(StatusRecord::new(
                    SCRAPE_FAILURE_TITLE,
                    detail_or(&e, SCRAPE_FAILURE_MESSAGE),
                )));
                guard.finish(SlotResult::Failed(e.to_string()));
            }
        }

        Dispatch::Completed
    }

    /// Starts a recursive scrape and schedules a deferred stats refresh.
    ///
    /// The slot is released as soon as the backend accepts the crawl; the
    /// deferred refresh runs in the background.
    pub async fn bulk_scrape(&self, base_url: &str) -> Dispatch {
        let base_url = base_url.trim();
        if base_url.is_empty() {
            return Dispatch::Ignored;
        }
        let Some(guard) = self.begin(OperationKind::BulkScrape) else {
            return Dispatch::Busy;
        };
        self.set_scrape_status(None);

        let options = self.inner.config.bulk;
        let request = BulkScrapeRequest {
            base_url: base_url.to_string(),
            max_depth: options.max_depth,
            max_urls: options.max_urls,
            auto_store: options.auto_store,
        };
        tracing::info!("[Orchestrator] Dispatching bulk scrape: {}", base_url);

        match self.inner.backend.bulk_scrape(&request).await {
            Ok(report) if report.found_nothing() => {
                let message = report
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| BULK_EMPTY_MESSAGE.to_string());
                self.set_scrape_status(Some(StatusRecord::new(BULK_EMPTY_TITLE, message)));
                self.with_state(|state| state.drafts.clear(DraftField::BulkScrapeUrl));
                guard.finish(SlotResult::Succeeded);
            }
            Ok(report) => {
                let status = StatusRecord::new(
                    BULK_SUCCESS_TITLE,
                    format!(
                        "Discovered {} URLs.",
                        report.discovered_urls_count.unwrap_or_default()
                    ),
                )
                .with_details(format!(
                    "Estimated time: {}",
                    report.estimated_time.as_deref().unwrap_or("unknown")
                ));
                self.set_scrape_status(Some(status));
                self.with_state(|state| state.drafts.clear(DraftField::BulkScrapeUrl));
                guard.finish(SlotResult::Succeeded);
                self.schedule_refresh();
            }
            Err(e) => {
                tracing::warn!("[Orchestrator] Bulk scrape of {} failed: {}", base_url, e);
                self.set_scrape_status(Some(StatusRecord::new(
                    BULK_FAILURE_TITLE,
                    detail_or(&e, BULK_FAILURE_MESSAGE),
                )));
                guard.finish(SlotResult::Failed(e.to_string()));
            }
        }

        Dispatch::Completed
    }

    /// Uploads a file, tracking progress until the terminal event.
    pub async fn upload_file(&self, file: UploadFile) -> Dispatch {
        let Some(guard) = self.begin(OperationKind::Upload) else {
            return Dispatch::Busy;
        };

        let file_name = file.file_name.clone();
        self.with_state(|state| {
            state.upload.uploading = true;
            state.upload.progress = 0;
            state.upload.file_name = Some(file_name.clone());
            state.upload.status = None;
            state.upload.error = None;
        });
        tracing::info!("[Orchestrator] Uploading {} ({} bytes)", file_name, file.len());

        let mut events = self.inner.backend.upload_file(file);
        let mut terminal = None;
        while let Some(event) = events.next().await {
            match event {
                UploadEvent::Progress(percent) => {
                    let percent = percent.min(100);
                    self.with_state(|state| state.upload.progress = percent);
                    self.publish(WidgetEvent::UploadProgress { percent });
                }
                other => {
                    terminal = Some(other);
                    break;
                }
            }
        }

        match terminal {
            Some(UploadEvent::Completed(receipt)) => {
                let status = format!("Uploaded: {} ({})", receipt.filename, receipt.format);
                self.with_state(|state| {
                    state.upload.status = Some(status.clone());
                    state.upload.uploading = false;
                });
                self.publish(WidgetEvent::UploadFinished {
                    status: Some(status),
                    error: None,
                });
                guard.finish(SlotResult::Succeeded);
                self.refresh_knowledge_stats().await;
            }
            other => {
                let detail = match other {
                    Some(UploadEvent::Failed(Some(detail))) if !detail.trim().is_empty() => detail,
                    _ => UPLOAD_FAILURE_MESSAGE.to_string(),
                };
                tracing::warn!("[Orchestrator] Upload of {} failed: {}", file_name, detail);
                let error = format!("{}{}", UPLOAD_FAILURE_PREFIX, detail);
                self.with_state(|state| {
                    state.upload.error = Some(error.clone());
                    state.upload.uploading = false;
                });
                self.publish(WidgetEvent::UploadFinished {
                    status: None,
                    error: Some(error),
                });
                guard.finish(SlotResult::Failed(detail));
            }
        }

        Dispatch::Completed
    }

    /// Clears the knowledge base after explicit confirmation.
    ///
    /// The cache is reset only once the backend confirms success.
    pub async fn clear_knowledge(&self, confirmer: &dyn ConfirmationPrompt) -> ClearOutcome {
        if !confirmer.confirm(CLEAR_CONFIRMATION_PROMPT) {
            return ClearOutcome::Declined;
        }

        tracing::info!("[Orchestrator] Clearing knowledge base");
        match self.inner.backend.clear_knowledge().await {
            Ok(()) => {
                self.set_knowledge(KnowledgeState::cleared());
                self.append(ChatRole::Bot, CLEAR_SUCCESS_MESSAGE, Vec::new());
                ClearOutcome::Cleared
            }
            Err(e) => {
                tracing::warn!("[Orchestrator] Clear failed: {}", e);
                self.publish(WidgetEvent::Alert {
                    message: CLEAR_FAILURE_ALERT.to_string(),
                });
                ClearOutcome::Failed {
                    alert: CLEAR_FAILURE_ALERT.to_string(),
                }
            }
        }
    }

    /// Re-reads the knowledge stats. Returns `true` if the cache changed.
    ///
    /// Failures are logged and otherwise ignored.
    pub async fn refresh_knowledge_stats(&self) -> bool {
        match self.inner.backend.knowledge_stats().await {
            Ok(stats) => {
                self.set_knowledge(stats);
                true
            }
            Err(e) => {
                tracing::error!("[Orchestrator] Failed to load knowledge stats: {}", e);
                false
            }
        }
    }

    /// Clears the stored credential and returns the login redirect target.
    pub fn logout(&self) -> Result<&'static str> {
        self.inner
            .config
            .credential_store
            .clear()
            .map_err(|e| WidgetError::credential(format!("Failed to clear token: {}", e)))?;
        tracing::info!("[Orchestrator] Logged out");
        Ok(LOGIN_PATH)
    }

    // ============================================================================
    // Panel
    // ============================================================================

    pub fn toggle_panel(&self) -> bool {
        let expanded = self.with_state(|state| state.panel.toggle());
        self.publish(WidgetEvent::PanelToggled { expanded });
        expanded
    }

    /// Returns `true` if the key changed the panel.
    pub fn handle_key(&self, key: WidgetKey) -> bool {
        let (changed, expanded) = self.with_state(|state| {
            let changed = state.panel.handle_key(key);
            (changed, state.panel.expanded)
        });
        if changed {
            self.publish(WidgetEvent::PanelToggled { expanded });
        }
        changed
    }

    // ============================================================================
    // Internals
    // ============================================================================

    fn with_state<R>(&self, f: impl FnOnce(&mut WidgetState) -> R) -> R {
        let mut state = self
            .inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    fn publish(&self, event: WidgetEvent) {
        // No subscribers is fine.
        let _ = self.inner.events.send(event);
    }

    fn publish_slot(&self, kind: OperationKind, active: bool) {
        self.publish(WidgetEvent::SlotChanged { kind, active });
    }

    fn guard(&self, kind: OperationKind) -> SlotGuard<'_> {
        SlotGuard {
            orchestrator: self,
            kind,
            finished: false,
        }
    }

    fn begin(&self, kind: OperationKind) -> Option<SlotGuard<'_>> {
        if !self.with_state(|state| state.slots.try_activate(kind)) {
            tracing::debug!("[Orchestrator] {} rejected: slot busy", kind);
            return None;
        }
        self.publish_slot(kind, true);
        Some(self.guard(kind))
    }

    fn release_slot(&self, kind: OperationKind, result: SlotResult) {
        self.with_state(|state| state.slots.finish(kind, result));
        self.publish_slot(kind, false);
    }

    fn append(&self, role: ChatRole, content: impl Into<String>, sources: Vec<Source>) {
        let entry = self.with_state(|state| state.log.append(role, content, sources).clone());
        self.publish(WidgetEvent::EntryAppended { entry });
    }

    fn set_scrape_status(&self, status: Option<StatusRecord>) {
        self.with_state(|state| state.scrape_status = status.clone());
        self.publish(WidgetEvent::StatusChanged { status });
    }

    fn set_knowledge(&self, knowledge: KnowledgeState) {
        self.with_state(|state| state.knowledge.set(knowledge.clone()));
        self.publish(WidgetEvent::KnowledgeUpdated { state: knowledge });
    }

    /// Refreshes stats after `bulk_refresh_delay`.
    ///
    /// The backend reports no completion for bulk ingestion, so this is a
    /// best-effort estimate of when new documents become visible.
    fn schedule_refresh(&self) {
        let delay = self.inner.config.bulk_refresh_delay;
        let orchestrator = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tracing::debug!("[Orchestrator] Running deferred stats refresh");
            orchestrator.refresh_knowledge_stats().await;
        });
    }
}

/// Backend detail when present, otherwise the fixed fallback.
fn detail_or(err: &WidgetError, fallback: &str) -> String {
    err.detail()
        .map(str::to_string)
        .unwrap_or_else(|| fallback.to_string())
}
