//! Activity event types and the derived "current files" view.
//!
//! An `ActivityEvent` records one user file action. Events are produced by an
//! external collaborator (the UI action handler) on every upload or delete,
//! are immutable once written, and are never destroyed under normal
//! operation.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The kind of file action an event records.
///
/// Serialized with the stable wire names `UPLOAD_FILE` / `DELETE_FILE`.
/// These strings participate in block hashing, so renaming a variant is a
/// breaking format change that invalidates every previously computed hash.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityAction {
    UploadFile,
    DeleteFile,
}

/// One user file action, as recorded in the activity log.
///
/// Field declaration order is load-bearing: the canonical JSON fed into the
/// block hash serializes fields in this order. Reordering fields is a
/// breaking format change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEvent {
    /// Opaque identifier of the acting user.
    pub user_id: String,

    /// Email of the acting user, denormalized for display.
    pub user_email: String,

    /// What the user did.
    pub action: ActivityAction,

    /// The file the action applied to.
    pub file_name: String,

    /// Download URL of the file, when one exists (uploads only).
    pub file_url: Option<String>,

    /// Server-assigned instant of the action. This is the single
    /// authoritative timestamp: it is copied into the block, hashed, and
    /// used for store ordering.
    pub timestamp: DateTime<Utc>,
}

/// Derive the set of currently-present files from an event history.
///
/// Walks events in ascending timestamp order and keeps the file names whose
/// latest action is an upload. Deletes of files never uploaded are ignored.
pub fn current_files(events: &[ActivityEvent]) -> Vec<String> {
    let mut ordered: Vec<&ActivityEvent> = events.iter().collect();
    ordered.sort_by_key(|e| e.timestamp);

    let mut present = BTreeSet::new();
    for event in ordered {
        match event.action {
            ActivityAction::UploadFile => {
                present.insert(event.file_name.clone());
            }
            ActivityAction::DeleteFile => {
                present.remove(&event.file_name);
            }
        }
    }
    present.into_iter().collect()
}
