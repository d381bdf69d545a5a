//! Read-through and write-through glue between the store and the cache.
//!
//! Reads try the cache first and fall back to the store, populating the
//! cache on a hit there. Writes go to the store first; afterwards the cached
//! copy is refreshed or evicted. A cache failure is logged and swallowed:
//! the store result always wins.

use std::time::Duration;

use sqlx::PgPool;
use timetrack_core::cache::{self, Cache, CacheKind};
use timetrack_core::types::DbId;
use timetrack_db::models::project::Project;
use timetrack_db::models::user::UserResponse;
use timetrack_db::repositories::{ProjectRepo, UserRepo};

/// Load a sanitized user, cache first.
pub async fn load_user<C: Cache>(
    pool: &PgPool,
    cache: &C,
    ttl: Duration,
    id: DbId,
) -> Result<Option<UserResponse>, sqlx::Error> {
    match cache::get_json::<_, UserResponse>(cache, CacheKind::User, id).await {
        Ok(Some(user)) => return Ok(Some(user)),
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, user_id = id, "User cache read failed"),
    }

    let Some(user) = UserRepo::find_by_id(pool, id).await? else {
        return Ok(None);
    };
    let user = UserResponse::from(user);
    store_user(cache, ttl, &user).await;
    Ok(Some(user))
}

/// Refresh the cached copy of a user after a write.
pub async fn store_user<C: Cache>(cache: &C, ttl: Duration, user: &UserResponse) {
    if let Err(e) = cache::set_json(cache, CacheKind::User, user.id, user, ttl).await {
        tracing::warn!(error = %e, user_id = user.id, "User cache write failed");
    }
}

/// Load a project, cache first.
pub async fn load_project<C: Cache>(
    pool: &PgPool,
    cache: &C,
    ttl: Duration,
    id: DbId,
) -> Result<Option<Project>, sqlx::Error> {
    match cache::get_json::<_, Project>(cache, CacheKind::Project, id).await {
        Ok(Some(project)) => return Ok(Some(project)),
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, project_id = id, "Project cache read failed"),
    }

    let Some(project) = ProjectRepo::find_by_id(pool, id).await? else {
        return Ok(None);
    };
    store_project(cache, ttl, &project).await;
    Ok(Some(project))
}

/// Refresh the cached copy of a project after a write.
pub async fn store_project<C: Cache>(cache: &C, ttl: Duration, project: &Project) {
    if let Err(e) = cache::set_json(cache, CacheKind::Project, project.id, project, ttl).await {
        tracing::warn!(error = %e, project_id = project.id, "Project cache write failed");
    }
}

/// Drop a cached entry after a delete.
pub async fn evict<C: Cache>(cache: &C, kind: CacheKind, id: DbId) {
    if let Err(e) = cache.delete(kind, id).await {
        tracing::warn!(error = %e, kind = kind.as_str(), id, "Cache eviction failed");
    }
}
