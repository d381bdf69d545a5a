//! Repository for the `projects` and `project_members` tables.

use sqlx::PgPool;
use timetrack_core::types::DbId;

use super::USER_COLUMNS;
use crate::models::project::{CreateProject, Project, UpdateProject};
use crate::models::user::User;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, creator_id, created_at, updated_at";

/// Provides CRUD, ownership, and membership operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a project and enrol its creator as a member, atomically.
    ///
    /// Either both rows commit or neither does.
    pub async fn create(
        pool: &PgPool,
        creator_id: DbId,
        input: &CreateProject,
    ) -> Result<Project, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO projects (name, description, creator_id)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(creator_id)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO project_members (project_id, user_id) VALUES ($1, $2)")
            .bind(project.id)
            .bind(creator_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::debug!(project_id = project.id, creator_id, "Project and owner membership committed");
        Ok(project)
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Apply a partial update.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                name = CASE WHEN $2 THEN $3 ELSE name END,
                description = CASE WHEN $4 THEN $5 ELSE description END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(input.name.is_set())
            .bind(input.name.value())
            .bind(input.description.is_set())
            .bind(input.description.value())
            .fetch_optional(pool)
            .await
    }

    /// Delete a project. Members, tasks, and time entries cascade.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether `user_id` created the project.
    pub async fn is_owner(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM projects WHERE id = $1 AND creator_id = $2)")
            .bind(project_id)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Whether a membership row exists for the pair.
    pub async fn is_member(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS (
                SELECT 1 FROM project_members WHERE project_id = $1 AND user_id = $2
             )",
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Add a member. Not idempotent: a repeat violates `uq_project_members`.
    pub async fn add_member(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO project_members (project_id, user_id) VALUES ($1, $2)")
            .bind(project_id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Remove a member together with their task memberships in the project.
    /// Any timer they have running in the project is stopped.
    ///
    /// Returns `false` if the user was not a member; nothing is changed then.
    pub async fn remove_member(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let removed = sqlx::query("DELETE FROM project_members WHERE project_id = $1 AND user_id = $2")
            .bind(project_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if removed == 0 {
            return Ok(false);
        }

        sqlx::query(
            "DELETE FROM task_members tm
             USING tasks t
             WHERE tm.task_id = t.id AND t.project_id = $1 AND tm.user_id = $2",
        )
        .bind(project_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE time_entries SET ended_at = NOW()
             WHERE project_id = $1 AND user_id = $2 AND ended_at IS NULL",
        )
        .bind(project_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Members of the project, ordered by user ID.
    pub async fn list_members(pool: &PgPool, project_id: DbId) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {USER_COLUMNS} FROM users u
             JOIN project_members pm ON pm.user_id = u.id
             WHERE pm.project_id = $1
             ORDER BY u.id"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }
}
