//! Repository for the `tasks` and `task_members` tables.

use sqlx::PgPool;
use timetrack_core::types::DbId;

use super::USER_COLUMNS;
use crate::models::task::{CreateTask, Task, UpdateTask};
use crate::models::user::User;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, project_id, finished, created_at, updated_at";

/// Provides CRUD and membership operations for tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a task into `project_id`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateTask,
    ) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks (name, description, project_id)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(project_id)
            .fetch_one(pool)
            .await
    }

    /// Find a task by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a task only if it belongs to `project_id`.
    pub async fn find_in_project(
        pool: &PgPool,
        project_id: DbId,
        task_id: DbId,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1 AND project_id = $2");
        sqlx::query_as::<_, Task>(&query)
            .bind(task_id)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// All tasks of a project, oldest first.
    pub async fn list_by_project(pool: &PgPool, project_id: DbId) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE project_id = $1 ORDER BY id");
        sqlx::query_as::<_, Task>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Apply a partial update.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTask,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET
                name = CASE WHEN $2 THEN $3 ELSE name END,
                description = CASE WHEN $4 THEN $5 ELSE description END,
                finished = CASE WHEN $6 THEN $7 ELSE finished END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(input.name.is_set())
            .bind(input.name.value())
            .bind(input.description.is_set())
            .bind(input.description.value())
            .bind(input.finished.is_set())
            .bind(input.finished.value().copied())
            .fetch_optional(pool)
            .await
    }

    /// Delete a task. Task members and time entries cascade.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether a task membership row exists for the pair.
    pub async fn is_member(pool: &PgPool, task_id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM task_members WHERE task_id = $1 AND user_id = $2)",
        )
        .bind(task_id)
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Add a task member. Not idempotent: a repeat violates `uq_task_members`.
    pub async fn add_member(pool: &PgPool, task_id: DbId, user_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO task_members (task_id, user_id) VALUES ($1, $2)")
            .bind(task_id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Remove a task member. Returns `false` if no row matched.
    pub async fn remove_member(
        pool: &PgPool,
        task_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let removed = sqlx::query("DELETE FROM task_members WHERE task_id = $1 AND user_id = $2")
            .bind(task_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if removed == 0 {
            return Ok(false);
        }

        // A former member can no longer stop the timer themselves.
        sqlx::query(
            "UPDATE time_entries SET ended_at = NOW()
             WHERE task_id = $1 AND user_id = $2 AND ended_at IS NULL",
        )
        .bind(task_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Members of the task, ordered by user ID.
    pub async fn list_members(pool: &PgPool, task_id: DbId) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {USER_COLUMNS} FROM users u
             JOIN task_members tm ON tm.user_id = u.id
             WHERE tm.task_id = $1
             ORDER BY u.id"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(task_id)
            .fetch_all(pool)
            .await
    }
}
