use ragwidget_core::conversation::{ChatEntry, ConversationLog};
use ragwidget_core::identity::Role;
use ragwidget_core::knowledge::{KnowledgeState, KnowledgeStateCache};
use ragwidget_core::operation::{InputDrafts, OperationSlots, StatusRecord, UploadState};
use ragwidget_core::panel::PanelState;
use serde::Serialize;

/// Mutable widget state, guarded by the orchestrator's mutex.
#[derive(Debug)]
pub(crate) struct WidgetState {
    pub role: Role,
    pub log: ConversationLog,
    pub knowledge: KnowledgeStateCache,
    pub slots: OperationSlots,
    /// Shared by single and bulk scrapes; reset when either is dispatched.
    pub scrape_status: Option<StatusRecord>,
    pub upload: UploadState,
    pub drafts: InputDrafts,
    pub panel: PanelState,
}

impl WidgetState {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            log: ConversationLog::seeded(role),
            knowledge: KnowledgeStateCache::new(),
            slots: OperationSlots::new(),
            scrape_status: None,
            upload: UploadState::default(),
            drafts: InputDrafts::default(),
            panel: PanelState::default(),
        }
    }

    pub fn snapshot(&self) -> WidgetSnapshot {
        WidgetSnapshot {
            role: self.role,
            entries: self.log.all().to_vec(),
            knowledge: self.knowledge.get().clone(),
            slots: self.slots.clone(),
            scrape_status: self.scrape_status.clone(),
            upload: self.upload.clone(),
            drafts: self.drafts.clone(),
            panel: self.panel,
        }
    }
}

/// Point-in-time copy of everything the presentation layer renders.
#[derive(Debug, Clone, Serialize)]
pub struct WidgetSnapshot {
    pub role: Role,
    pub entries: Vec<ChatEntry>,
    pub knowledge: KnowledgeState,
    pub slots: OperationSlots,
    pub scrape_status: Option<StatusRecord>,
    pub upload: UploadState,
    pub drafts: InputDrafts,
    pub panel: PanelState,
}
