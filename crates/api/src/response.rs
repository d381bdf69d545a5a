//! Shared response envelope types for API handlers.

use serde::Serialize;
use timetrack_db::models::user::UserResponse;

/// Standard `{ "data": T }` envelope for list and search responses.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Returned by registration and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}
