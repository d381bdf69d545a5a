//! Handlers for the `/projects` resource and its membership sub-resources.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use timetrack_core::access::{Capability, Target};
use timetrack_core::cache::CacheKind;
use timetrack_core::error::CoreError;
use timetrack_core::timer::TaskProductivity;
use timetrack_core::types::DbId;
use timetrack_core::validation::{
    check_max_len, check_not_blank, check_patch_len, MAX_PROJECT_DESCRIPTION_LEN,
    MAX_PROJECT_NAME_LEN,
};
use timetrack_db::models::project::{CreateProject, Project, UpdateProject};
use timetrack_db::models::user::UserResponse;
use timetrack_db::repositories::{ProjectRepo, TimeEntryRepo};
use validator::Validate;

use super::{require_project, require_user};
use crate::error::{AppError, AppResult};
use crate::lookup;
use crate::middleware::access::authorize;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /projects`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    #[validate(length(max = 1024))]
    pub description: Option<String>,
}

/// Request body for `POST /projects/{project_id}/users`.
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    pub user_id: DbId,
}

fn validate_update(input: &UpdateProject) -> Result<(), CoreError> {
    input.name.reject_null("name")?;
    if let Some(name) = input.name.value() {
        check_not_blank("name", name)?;
        check_max_len("name", name, MAX_PROJECT_NAME_LEN)?;
    }
    check_patch_len("description", &input.description, MAX_PROJECT_DESCRIPTION_LEN)
}

/// POST /api/v1/projects
///
/// The caller becomes the owner and first member.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateProjectRequest>,
) -> AppResult<(StatusCode, Json<Project>)> {
    input.validate()?;
    check_not_blank("name", &input.name)?;

    let project = ProjectRepo::create(
        &state.pool,
        user.user_id,
        &CreateProject {
            name: input.name,
            description: input.description,
        },
    )
    .await?;
    lookup::store_project(state.cache.as_ref(), state.config.cache.ttl(), &project).await;
    tracing::info!(project_id = project.id, creator_id = user.user_id, "Project created");

    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/v1/projects/{project_id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Project>> {
    authorize(&state, &user, Target::Project { project_id: id }, Capability::Read).await?;
    Ok(Json(require_project(&state, id).await?))
}

/// PATCH /api/v1/projects/{project_id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<Project>> {
    authorize(&state, &user, Target::Project { project_id: id }, Capability::Modify).await?;
    validate_update(&input)?;

    let project = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    lookup::store_project(state.cache.as_ref(), state.config.cache.ttl(), &project).await;

    Ok(Json(project))
}

/// DELETE /api/v1/projects/{project_id}
///
/// Tasks, memberships, and time entries go with the project.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    authorize(&state, &user, Target::Project { project_id: id }, Capability::Modify).await?;

    if !ProjectRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }));
    }
    lookup::evict(state.cache.as_ref(), CacheKind::Project, id).await;
    tracing::info!(project_id = id, deleted_by = user.user_id, "Project deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/projects/{project_id}/users
pub async fn list_members(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    authorize(&state, &user, Target::Project { project_id: id }, Capability::Read).await?;
    require_project(&state, id).await?;

    let members = ProjectRepo::list_members(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: members.into_iter().map(UserResponse::from).collect(),
    }))
}

/// POST /api/v1/projects/{project_id}/users
pub async fn add_member(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<AddMemberRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    authorize(
        &state,
        &user,
        Target::Project { project_id: id },
        Capability::ManageMembership,
    )
    .await?;
    require_project(&state, id).await?;
    let member = require_user(&state, input.user_id).await?;

    ProjectRepo::add_member(&state.pool, id, member.id).await?;
    tracing::info!(project_id = id, user_id = member.id, "Project member added");

    Ok((StatusCode::CREATED, Json(member)))
}

/// GET /api/v1/projects/{project_id}/users/{user_id}
///
/// Time the member spent on each task of the project, closed entries only.
pub async fn member_productivity(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, member_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<Vec<TaskProductivity>>>> {
    authorize(
        &state,
        &user,
        Target::ProjectMember {
            project_id,
            user_id: member_id,
        },
        Capability::Read,
    )
    .await?;
    require_project(&state, project_id).await?;
    if !ProjectRepo::is_member(&state.pool, project_id, member_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Project member",
            id: member_id,
        }));
    }

    let data = TimeEntryRepo::member_productivity(&state.pool, project_id, member_id).await?;
    Ok(Json(DataResponse { data }))
}

/// DELETE /api/v1/projects/{project_id}/users/{user_id}
///
/// Owners remove members; members may remove themselves. The owner cannot
/// leave their own project.
pub async fn remove_member(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, member_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    authorize(
        &state,
        &user,
        Target::ProjectMember {
            project_id,
            user_id: member_id,
        },
        Capability::ManageMembership,
    )
    .await?;
    let project = require_project(&state, project_id).await?;
    if project.creator_id == member_id {
        return Err(AppError::Core(CoreError::Conflict(
            "The project owner cannot be removed from the project".into(),
        )));
    }

    if !ProjectRepo::remove_member(&state.pool, project_id, member_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Project member",
            id: member_id,
        }));
    }
    tracing::info!(
        project_id,
        user_id = member_id,
        removed_by = user.user_id,
        "Project member removed"
    );

    Ok(StatusCode::NO_CONTENT)
}
