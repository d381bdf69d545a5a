//! Request handlers.
//!
//! Each submodule holds the async handlers for one resource family. Every
//! handler that touches a project, task, or another user's profile runs
//! [`crate::middleware::access::authorize`] before loading anything.

pub mod projects;
pub mod tasks;
pub mod users;

use timetrack_core::error::CoreError;
use timetrack_core::types::DbId;
use timetrack_db::models::project::Project;
use timetrack_db::models::user::UserResponse;

use crate::error::{AppError, AppResult};
use crate::lookup;
use crate::state::AppState;

/// Load a project through the cache or fail with 404.
pub(crate) async fn require_project(state: &AppState, id: DbId) -> AppResult<Project> {
    lookup::load_project(&state.pool, state.cache.as_ref(), state.config.cache.ttl(), id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))
}

/// Load a sanitized user through the cache or fail with 404.
pub(crate) async fn require_user(state: &AppState, id: DbId) -> AppResult<UserResponse> {
    lookup::load_user(&state.pool, state.cache.as_ref(), state.config.cache.ttl(), id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))
}
