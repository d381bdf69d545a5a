//! Handlers for tasks nested under a project, their timer, and their members.
//!
//! Every route carries the project id. A task that exists but belongs to a
//! different project is reported as not found.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use timetrack_core::access::{Capability, Target};
use timetrack_core::error::CoreError;
use timetrack_core::timer::TimerState;
use timetrack_core::types::DbId;
use timetrack_core::validation::{
    check_max_len, check_not_blank, check_patch_len, MAX_TASK_DESCRIPTION_LEN, MAX_TASK_NAME_LEN,
};
use timetrack_db::models::task::{CreateTask, Task, UpdateTask};
use timetrack_db::models::time_entry::TimeEntry;
use timetrack_db::models::user::UserResponse;
use timetrack_db::repositories::{ProjectRepo, TaskRepo, TimeEntryRepo};
use validator::Validate;

use super::{require_project, require_user};
use crate::error::{AppError, AppResult};
use crate::middleware::access::authorize;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /projects/{project_id}/tasks`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 256))]
    pub description: String,
}

/// Request body for `POST /projects/{project_id}/tasks/{task_id}/users`.
#[derive(Debug, Deserialize)]
pub struct AddTaskMemberRequest {
    pub user_id: DbId,
}

fn task_target(project_id: DbId, task_id: DbId) -> Target {
    Target::Task {
        project_id,
        task_id,
    }
}

/// Load a task and make sure it belongs to `project_id`.
async fn require_task(state: &AppState, project_id: DbId, task_id: DbId) -> AppResult<Task> {
    TaskRepo::find_in_project(&state.pool, project_id, task_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Task",
            id: task_id,
        }))
}

fn validate_update(input: &UpdateTask) -> Result<(), CoreError> {
    input.name.reject_null("name")?;
    input.description.reject_null("description")?;
    input.finished.reject_null("finished")?;
    if let Some(name) = input.name.value() {
        check_not_blank("name", name)?;
        check_max_len("name", name, MAX_TASK_NAME_LEN)?;
    }
    check_patch_len("description", &input.description, MAX_TASK_DESCRIPTION_LEN)
}

// ---------------------------------------------------------------------------
// Task CRUD
// ---------------------------------------------------------------------------

/// GET /api/v1/projects/{project_id}/tasks
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Task>>>> {
    authorize(&state, &user, Target::Project { project_id }, Capability::Read).await?;
    require_project(&state, project_id).await?;

    let data = TaskRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/projects/{project_id}/tasks
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateTaskRequest>,
) -> AppResult<(StatusCode, Json<Task>)> {
    authorize(
        &state,
        &user,
        Target::Project { project_id },
        Capability::CreateTask,
    )
    .await?;
    input.validate()?;
    check_not_blank("name", &input.name)?;
    require_project(&state, project_id).await?;

    let task = TaskRepo::create(
        &state.pool,
        project_id,
        &CreateTask {
            name: input.name,
            description: input.description,
        },
    )
    .await?;
    tracing::info!(project_id, task_id = task.id, created_by = user.user_id, "Task created");

    Ok((StatusCode::CREATED, Json(task)))
}

/// GET /api/v1/projects/{project_id}/tasks/{task_id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, task_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<Task>> {
    authorize(&state, &user, task_target(project_id, task_id), Capability::Read).await?;
    Ok(Json(require_task(&state, project_id, task_id).await?))
}

/// PATCH /api/v1/projects/{project_id}/tasks/{task_id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, task_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateTask>,
) -> AppResult<Json<Task>> {
    authorize(&state, &user, task_target(project_id, task_id), Capability::Modify).await?;
    validate_update(&input)?;
    require_task(&state, project_id, task_id).await?;

    let task = TaskRepo::update(&state.pool, task_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Task",
            id: task_id,
        }))?;
    Ok(Json(task))
}

/// DELETE /api/v1/projects/{project_id}/tasks/{task_id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, task_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    authorize(&state, &user, task_target(project_id, task_id), Capability::Modify).await?;
    require_task(&state, project_id, task_id).await?;

    if !TaskRepo::delete(&state.pool, task_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Task",
            id: task_id,
        }));
    }
    tracing::info!(project_id, task_id, deleted_by = user.user_id, "Task deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Timer
// ---------------------------------------------------------------------------

/// POST /api/v1/projects/{project_id}/tasks/{task_id}/start
///
/// Opens a time entry for the caller. 409 if the caller already has a
/// timer running anywhere in the project.
pub async fn start_timer(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, task_id)): Path<(DbId, DbId)>,
) -> AppResult<(StatusCode, Json<TimeEntry>)> {
    authorize(&state, &user, task_target(project_id, task_id), Capability::TrackTime).await?;
    require_task(&state, project_id, task_id).await?;

    let entry = TimeEntryRepo::start(&state.pool, task_id, user.user_id).await??;
    tracing::info!(
        entry_id = entry.id,
        task_id,
        user_id = user.user_id,
        "Timer started"
    );

    Ok((StatusCode::CREATED, Json(entry)))
}

/// POST /api/v1/projects/{project_id}/tasks/{task_id}/stop
///
/// Closes the caller's open entry on the task. 404 if nothing is running.
pub async fn stop_timer(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, task_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<TimeEntry>> {
    authorize(&state, &user, task_target(project_id, task_id), Capability::TrackTime).await?;
    require_task(&state, project_id, task_id).await?;

    let entry = TimeEntryRepo::stop(&state.pool, task_id, user.user_id).await??;
    tracing::info!(
        entry_id = entry.id,
        task_id,
        user_id = user.user_id,
        "Timer stopped"
    );

    Ok(Json(entry))
}

/// GET /api/v1/projects/{project_id}/tasks/{task_id}/timer
pub async fn timer_state(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, task_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<TimerState>> {
    authorize(&state, &user, task_target(project_id, task_id), Capability::TrackTime).await?;
    require_task(&state, project_id, task_id).await?;

    let open = TimeEntryRepo::find_open_in_project(&state.pool, project_id, user.user_id)
        .await?
        .and_then(|entry| entry.as_open());
    Ok(Json(TimerState::for_task(task_id, open.as_ref())))
}

// ---------------------------------------------------------------------------
// Task members
// ---------------------------------------------------------------------------

/// GET /api/v1/projects/{project_id}/tasks/{task_id}/users
pub async fn list_members(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, task_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    authorize(&state, &user, task_target(project_id, task_id), Capability::Read).await?;
    require_task(&state, project_id, task_id).await?;

    let members = TaskRepo::list_members(&state.pool, task_id).await?;
    Ok(Json(DataResponse {
        data: members.into_iter().map(UserResponse::from).collect(),
    }))
}

/// POST /api/v1/projects/{project_id}/tasks/{task_id}/users
///
/// Only project members can be assigned to a task.
pub async fn add_member(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, task_id)): Path<(DbId, DbId)>,
    Json(input): Json<AddTaskMemberRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    authorize(
        &state,
        &user,
        task_target(project_id, task_id),
        Capability::ManageMembership,
    )
    .await?;
    require_task(&state, project_id, task_id).await?;
    let member = require_user(&state, input.user_id).await?;

    if !ProjectRepo::is_member(&state.pool, project_id, member.id).await? {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "User {} must join project {project_id} before joining its tasks",
            member.id
        ))));
    }
    TaskRepo::add_member(&state.pool, task_id, member.id).await?;
    tracing::info!(task_id, user_id = member.id, "Task member added");

    Ok((StatusCode::CREATED, Json(member)))
}

/// DELETE /api/v1/projects/{project_id}/tasks/{task_id}/users/{user_id}
pub async fn remove_member(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, task_id, member_id)): Path<(DbId, DbId, DbId)>,
) -> AppResult<StatusCode> {
    authorize(
        &state,
        &user,
        task_target(project_id, task_id),
        Capability::ManageMembership,
    )
    .await?;
    require_task(&state, project_id, task_id).await?;

    if !TaskRepo::remove_member(&state.pool, task_id, member_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Task member",
            id: member_id,
        }));
    }
    tracing::info!(task_id, user_id = member_id, "Task member removed");

    Ok(StatusCode::NO_CONTENT)
}
