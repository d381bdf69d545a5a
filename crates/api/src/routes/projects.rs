//! Route definitions for the `/projects` resource.
//!
//! Also nests tasks, the task timer, and both membership levels under
//! `/projects/{project_id}/...`.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::{projects, tasks};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// POST   /                                            -> create
/// GET    /{project_id}                                -> get_by_id
/// PATCH  /{project_id}                                -> update
/// DELETE /{project_id}                                -> delete
/// GET    /{project_id}/users                          -> list_members
/// POST   /{project_id}/users                          -> add_member
/// GET    /{project_id}/users/{user_id}                -> member_productivity
/// DELETE /{project_id}/users/{user_id}                -> remove_member
///
/// GET    /{project_id}/tasks                          -> list
/// POST   /{project_id}/tasks                          -> create
/// GET    /{project_id}/tasks/{task_id}                -> get_by_id
/// PATCH  /{project_id}/tasks/{task_id}                -> update
/// DELETE /{project_id}/tasks/{task_id}                -> delete
/// POST   /{project_id}/tasks/{task_id}/start          -> start_timer
/// POST   /{project_id}/tasks/{task_id}/stop           -> stop_timer
/// GET    /{project_id}/tasks/{task_id}/timer          -> timer_state
/// GET    /{project_id}/tasks/{task_id}/users          -> list_members
/// POST   /{project_id}/tasks/{task_id}/users          -> add_member
/// DELETE /{project_id}/tasks/{task_id}/users/{user_id} -> remove_member
/// ```
pub fn router() -> Router<AppState> {
    let task_routes = Router::new()
        .route("/", get(tasks::list).post(tasks::create))
        .route(
            "/{task_id}",
            get(tasks::get_by_id)
                .patch(tasks::update)
                .delete(tasks::delete),
        )
        .route("/{task_id}/start", post(tasks::start_timer))
        .route("/{task_id}/stop", post(tasks::stop_timer))
        .route("/{task_id}/timer", get(tasks::timer_state))
        .route(
            "/{task_id}/users",
            get(tasks::list_members).post(tasks::add_member),
        )
        .route("/{task_id}/users/{user_id}", delete(tasks::remove_member));

    Router::new()
        .route("/", post(projects::create))
        .route(
            "/{project_id}",
            get(projects::get_by_id)
                .patch(projects::update)
                .delete(projects::delete),
        )
        .route(
            "/{project_id}/users",
            get(projects::list_members).post(projects::add_member),
        )
        .route(
            "/{project_id}/users/{user_id}",
            get(projects::member_productivity).delete(projects::remove_member),
        )
        .nest("/{project_id}/tasks", task_routes)
}
