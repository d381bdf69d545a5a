//! Timer state machine and productivity arithmetic.
//!
//! Each (task, user) pair is either [`TimerState::Idle`] or
//! [`TimerState::Active`]. A user may run at most one timer per project:
//! starting a timer while any sibling task in the same project has an open
//! entry is rejected with [`TimerError::AlreadyActive`]. Stopping an idle
//! pair is rejected with [`TimerError::NoActiveEntry`].
//!
//! The store enforces the same invariant with a partial unique index; the
//! checks here produce the precise error before the insert is attempted.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

const SECONDS_PER_HOUR: i64 = 3600;
const SECONDS_PER_MINUTE: i64 = 60;

/// An entry whose `ended_at` is still NULL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenEntry {
    pub entry_id: DbId,
    pub task_id: DbId,
    pub project_id: DbId,
    pub started_at: Timestamp,
}

/// Timer state of one (task, user) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TimerState {
    Idle,
    Active {
        entry_id: DbId,
        started_at: Timestamp,
    },
}

impl TimerState {
    /// Derive the state of `task_id` from the user's open entry in the project.
    ///
    /// An open entry on a sibling task leaves this task idle.
    pub fn for_task(task_id: DbId, open: Option<&OpenEntry>) -> Self {
        match open {
            Some(entry) if entry.task_id == task_id => TimerState::Active {
                entry_id: entry.entry_id,
                started_at: entry.started_at,
            },
            _ => TimerState::Idle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TimerError {
    /// The user already has an open entry somewhere in the project.
    #[error("A timer is already running in project {project_id}")]
    AlreadyActive { project_id: DbId },

    /// Stop was requested but nothing is running on the task.
    #[error("No active time entry for task {task_id}")]
    NoActiveEntry { task_id: DbId },
}

impl From<TimerError> for CoreError {
    fn from(err: TimerError) -> Self {
        match err {
            TimerError::AlreadyActive { .. } => CoreError::Conflict(err.to_string()),
            TimerError::NoActiveEntry { task_id } => CoreError::NotFound {
                entity: "Active time entry for task",
                id: task_id,
            },
        }
    }
}

/// Precondition for `Start`: no open entry for the user in the task's project.
///
/// `open_in_project` is the user's open entry in the project, if any.
pub fn check_start(open_in_project: Option<&OpenEntry>) -> Result<(), TimerError> {
    match open_in_project {
        Some(entry) => Err(TimerError::AlreadyActive {
            project_id: entry.project_id,
        }),
        None => Ok(()),
    }
}

/// Whole hours and remainder minutes, both rounded down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpentTime {
    pub hours: i64,
    pub minutes: i64,
}

impl SpentTime {
    pub fn from_seconds(total_seconds: i64) -> Self {
        let total_seconds = total_seconds.max(0);
        Self {
            hours: total_seconds / SECONDS_PER_HOUR,
            minutes: (total_seconds % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE,
        }
    }
}

/// Time a user spent on one task, derived from closed entries only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskProductivity {
    pub task_id: DbId,
    pub total_seconds: i64,
    pub spent_hours: i64,
    pub spent_minutes: i64,
}

impl TaskProductivity {
    pub fn new(task_id: DbId, total_seconds: i64) -> Self {
        let spent = SpentTime::from_seconds(total_seconds);
        Self {
            task_id,
            total_seconds,
            spent_hours: spent.hours,
            spent_minutes: spent.minutes,
        }
    }
}
