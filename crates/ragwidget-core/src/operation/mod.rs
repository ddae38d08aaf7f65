//! Operation domain module.
//!
//! - `slot`: Per-kind concurrency gates (`OperationKind`, `OperationSlot`, `OperationSlots`)
//! - `status`: User-visible operation artifacts (`StatusRecord`, `UploadState`, `InputDrafts`)

mod slot;
mod status;

pub use slot::{Dispatch, OperationKind, OperationSlot, OperationSlots, SlotResult};
pub use status::{DraftField, InputDrafts, StatusRecord, UploadState};
