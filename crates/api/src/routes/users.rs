//! Route definitions for the `/users` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /                    -> search
/// POST   /                    -> register
/// POST   /login               -> login
/// GET    /{user_id}           -> get_by_id
/// PATCH  /{user_id}           -> update
/// DELETE /{user_id}           -> delete
/// PUT    /{user_id}/admin     -> set_admin
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::search).post(users::register))
        .route("/login", post(users::login))
        .route(
            "/{user_id}",
            get(users::get_by_id)
                .patch(users::update)
                .delete(users::delete),
        )
        .route("/{user_id}/admin", put(users::set_admin))
}
