//! Time ledger rows.

use serde::Serialize;
use sqlx::FromRow;
use timetrack_core::timer::OpenEntry;
use timetrack_core::types::{DbId, Timestamp};

/// One interval of work. `ended_at` is NULL while the timer runs.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TimeEntry {
    pub id: DbId,
    pub task_id: DbId,
    pub project_id: DbId,
    pub user_id: DbId,
    pub started_at: Timestamp,
    pub ended_at: Option<Timestamp>,
}

impl TimeEntry {
    /// The entry as an [`OpenEntry`], or `None` once it has been stopped.
    pub fn as_open(&self) -> Option<OpenEntry> {
        match self.ended_at {
            Some(_) => None,
            None => Some(OpenEntry {
                entry_id: self.id,
                task_id: self.task_id,
                project_id: self.project_id,
                started_at: self.started_at,
            }),
        }
    }
}
