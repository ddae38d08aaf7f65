//! Operation slots.
//!
//! Each kind of operation owns exactly one slot. A slot is `Idle` or
//! `Active`; a second request for an active slot is rejected rather than
//! queued, while different kinds proceed independently.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

/// The four independent operation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OperationKind {
    Query,
    SingleScrape,
    BulkScrape,
    Upload,
}

impl OperationKind {
    fn index(self) -> usize {
        match self {
            Self::Query => 0,
            Self::SingleScrape => 1,
            Self::BulkScrape => 2,
            Self::Upload => 3,
        }
    }
}

/// Outcome of the last completed request in a slot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum SlotResult {
    #[default]
    None,
    Succeeded,
    Failed(String),
}

/// What happened to a request handed to the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dispatch {
    /// The request was sent and its outcome folded into state.
    Completed,
    /// Empty input; nothing happened.
    Ignored,
    /// The slot already had a request in flight; nothing happened.
    Busy,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OperationSlot {
    pub active: bool,
    pub last_result: SlotResult,
}

/// The fixed set of slots, one per `OperationKind`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OperationSlots {
    slots: [OperationSlot; 4],
}

impl OperationSlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: OperationKind) -> &OperationSlot {
        &self.slots[kind.index()]
    }

    pub fn is_active(&self, kind: OperationKind) -> bool {
        self.get(kind).active
    }

    /// Marks the slot active. Returns `false` if it already was.
    pub fn try_activate(&mut self, kind: OperationKind) -> bool {
        let slot = &mut self.slots[kind.index()];
        if slot.active {
            return false;
        }
        slot.active = true;
        true
    }

    /// Returns the slot to idle and records the outcome.
    pub fn finish(&mut self, kind: OperationKind, result: SlotResult) {
        let slot = &mut self.slots[kind.index()];
        slot.active = false;
        slot.last_result = result;
    }

    /// Kinds that currently have a request in flight.
    pub fn active_kinds(&self) -> Vec<OperationKind> {
        OperationKind::iter().filter(|k| self.is_active(*k)).collect()
    }
}
