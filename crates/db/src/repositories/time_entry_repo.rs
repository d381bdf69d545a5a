//! Repository for the `time_entries` ledger.
//!
//! Start and stop return a nested result: the outer `sqlx::Error` is a
//! store failure, the inner [`TimerError`] is a rejected transition.

use sqlx::PgPool;
use timetrack_core::timer::{self, TaskProductivity, TimerError};
use timetrack_core::types::DbId;

use crate::models::time_entry::TimeEntry;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, task_id, project_id, user_id, started_at, ended_at";

/// Partial unique index allowing one open entry per user per project.
pub const OPEN_ENTRY_INDEX: &str = "uq_time_entries_open_per_user_project";

/// Provides the timer transitions and productivity aggregation.
pub struct TimeEntryRepo;

impl TimeEntryRepo {
    /// Open a new entry for `user_id` on `task_id`.
    ///
    /// Runs in one transaction holding a row lock on the user, so concurrent
    /// starts by the same user serialize. The partial unique index backs the
    /// check up if anything slips past the lock. A missing user or task is
    /// reported as `sqlx::Error::RowNotFound`.
    pub async fn start(
        pool: &PgPool,
        task_id: DbId,
        user_id: DbId,
    ) -> Result<Result<TimeEntry, TimerError>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("SELECT id FROM users WHERE id = $1 FOR UPDATE")
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        let project_id: DbId = sqlx::query_scalar("SELECT project_id FROM tasks WHERE id = $1")
            .bind(task_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        let query = format!(
            "SELECT {COLUMNS} FROM time_entries
             WHERE user_id = $1 AND project_id = $2 AND ended_at IS NULL"
        );
        let open = sqlx::query_as::<_, TimeEntry>(&query)
            .bind(user_id)
            .bind(project_id)
            .fetch_optional(&mut *tx)
            .await?;
        if let Err(rejected) = timer::check_start(open.and_then(|e| e.as_open()).as_ref()) {
            return Ok(Err(rejected));
        }

        let query = format!(
            "INSERT INTO time_entries (task_id, project_id, user_id, started_at)
             VALUES ($1, $2, $3, NOW())
             RETURNING {COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, TimeEntry>(&query)
            .bind(task_id)
            .bind(project_id)
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await;

        match inserted {
            Ok(entry) => {
                tx.commit().await?;
                Ok(Ok(entry))
            }
            Err(sqlx::Error::Database(db_err)) if db_err.constraint() == Some(OPEN_ENTRY_INDEX) => {
                tracing::debug!(task_id, user_id, project_id, "Concurrent start lost the race");
                Ok(Err(TimerError::AlreadyActive { project_id }))
            }
            Err(err) => Err(err),
        }
    }

    /// Close the open entry of `user_id` on `task_id`.
    ///
    /// Only a row with `ended_at IS NULL` matches, so stopping twice fails
    /// the second time and leaves the closed row untouched.
    pub async fn stop(
        pool: &PgPool,
        task_id: DbId,
        user_id: DbId,
    ) -> Result<Result<TimeEntry, TimerError>, sqlx::Error> {
        let query = format!(
            "UPDATE time_entries SET ended_at = NOW()
             WHERE task_id = $1 AND user_id = $2 AND ended_at IS NULL
             RETURNING {COLUMNS}"
        );
        let closed = sqlx::query_as::<_, TimeEntry>(&query)
            .bind(task_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
        Ok(closed.ok_or(TimerError::NoActiveEntry { task_id }))
    }

    /// The user's open entry anywhere in the project, if any.
    pub async fn find_open_in_project(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<Option<TimeEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM time_entries
             WHERE project_id = $1 AND user_id = $2 AND ended_at IS NULL"
        );
        sqlx::query_as::<_, TimeEntry>(&query)
            .bind(project_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Per-task totals of the user's closed entries in the project, largest
    /// first. Open entries contribute nothing until stopped.
    pub async fn member_productivity(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<Vec<TaskProductivity>, sqlx::Error> {
        let rows: Vec<(DbId, i64)> = sqlx::query_as(
            "SELECT task_id,
                    CAST(FLOOR(SUM(EXTRACT(EPOCH FROM (ended_at - started_at)))) AS BIGINT)
                        AS total_seconds
             FROM time_entries
             WHERE project_id = $1 AND user_id = $2 AND ended_at IS NOT NULL
             GROUP BY task_id
             ORDER BY total_seconds DESC, task_id",
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(task_id, total_seconds)| TaskProductivity::new(task_id, total_seconds))
            .collect())
    }
}
