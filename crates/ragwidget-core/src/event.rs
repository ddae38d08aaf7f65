use crate::conversation::ChatEntry;
use crate::knowledge::KnowledgeState;
use crate::operation::{OperationKind, StatusRecord};
use serde::Serialize;

/// Change notifications published by the orchestrator.
///
/// Observers re-read the snapshot they care about; events carry just
/// enough to render incrementally.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WidgetEvent {
    EntryAppended { entry: ChatEntry },
    SlotChanged { kind: OperationKind, active: bool },
    StatusChanged { status: Option<StatusRecord> },
    UploadProgress { percent: u8 },
    UploadFinished { status: Option<String>, error: Option<String> },
    KnowledgeUpdated { state: KnowledgeState },
    /// Blocking, user-visible failure notice.
    Alert { message: String },
    PanelToggled { expanded: bool },
}
