//! Store-backed access checks.
//!
//! Handlers call [`authorize`] with the target resolved from the request
//! path before touching the resource. Denials become 403; a failing lookup
//! becomes a 500, never a 403.

use sqlx::PgPool;
use timetrack_core::access::{evaluate, AccessDecision, Capability, Grant, MembershipLookup, Target};
use timetrack_core::error::CoreError;
use timetrack_core::types::DbId;
use timetrack_db::repositories::{ProjectRepo, TaskRepo};

use super::auth::AuthUser;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// [`MembershipLookup`] answered by Postgres.
pub struct PgMembershipLookup<'a> {
    pool: &'a PgPool,
}

impl<'a> PgMembershipLookup<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

impl MembershipLookup for PgMembershipLookup<'_> {
    type Error = sqlx::Error;

    async fn is_project_owner(&self, project_id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        ProjectRepo::is_owner(self.pool, project_id, user_id).await
    }

    async fn is_project_member(&self, project_id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        ProjectRepo::is_member(self.pool, project_id, user_id).await
    }

    async fn is_task_member(&self, task_id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        TaskRepo::is_member(self.pool, task_id, user_id).await
    }
}

/// Authorize `user` for `capability` on `target`, returning the granting rung.
pub async fn authorize(
    state: &AppState,
    user: &AuthUser,
    target: Target,
    capability: Capability,
) -> AppResult<Grant> {
    let lookup = PgMembershipLookup::new(&state.pool);
    match evaluate(&lookup, user.principal(), target, capability).await {
        AccessDecision::Authorized(grant) => Ok(grant),
        AccessDecision::Denied => {
            tracing::debug!(user_id = user.user_id, ?target, ?capability, "Access denied");
            Err(AppError::Core(CoreError::not_permitted()))
        }
        AccessDecision::EvaluationFailed(err) => {
            tracing::error!(error = %err, user_id = user.user_id, ?target, "Access evaluation failed");
            Err(AppError::Database(err))
        }
    }
}
