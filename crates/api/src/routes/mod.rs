pub mod health;
pub mod projects;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /users                                           register (public), search
/// /users/login                                     login (public)
/// /users/{user_id}                                 get, patch, delete
/// /users/{user_id}/admin                           grant/revoke admin (admin only)
///
/// /projects                                        create
/// /projects/{project_id}                           get, patch, delete
/// /projects/{project_id}/users                     list members, add member
/// /projects/{project_id}/users/{user_id}           productivity, remove member
/// /projects/{project_id}/tasks                     list, create
/// /projects/{project_id}/tasks/{task_id}           get, patch, delete
/// /projects/{project_id}/tasks/{task_id}/start     start timer
/// /projects/{project_id}/tasks/{task_id}/stop      stop timer
/// /projects/{project_id}/tasks/{task_id}/timer     timer state
/// /projects/{project_id}/tasks/{task_id}/users     list, add task member
/// /projects/{project_id}/tasks/{task_id}/users/{user_id}   remove task member
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/users", users::router())
        // Project routes (also nests tasks and memberships).
        .nest("/projects", projects::router())
}
