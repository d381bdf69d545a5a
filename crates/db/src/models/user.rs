//! User entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use timetrack_core::patch::Patch;
use timetrack_core::types::{DbId, Timestamp};

/// Full user row from the `users` table.
///
/// Contains the password hash and passport identifiers -- NEVER serialize
/// this to API responses directly. Use [`UserResponse`] for external output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub surname: String,
    pub patronymic: Option<String>,
    pub address: String,
    pub is_admin: bool,
    pub passport_series: Option<i32>,
    pub passport_number: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Sanitized user representation: no password hash, no passport data.
///
/// Also the shape stored in the user cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: DbId,
    pub email: String,
    pub name: String,
    pub surname: String,
    pub patronymic: Option<String>,
    pub address: String,
    pub is_admin: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            surname: user.surname,
            patronymic: user.patronymic,
            address: user.address,
            is_admin: user.is_admin,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// DTO for inserting a user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub surname: String,
    pub patronymic: Option<String>,
    pub address: String,
    pub passport_series: Option<i32>,
    pub passport_number: Option<i32>,
}

/// DTO for a partial user update. `Missing` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub email: Patch<String>,
    pub password_hash: Patch<String>,
    pub name: Patch<String>,
    pub surname: Patch<String>,
    pub patronymic: Patch<String>,
    pub address: Patch<String>,
    pub passport_series: Patch<i32>,
    pub passport_number: Patch<i32>,
}

/// Filters for user search. Text filters are case-insensitive substring
/// matches; `None` disables a filter.
#[derive(Debug, Clone, Default)]
pub struct UserSearch {
    pub min_id: Option<DbId>,
    pub max_id: Option<DbId>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub patronymic: Option<String>,
    pub address: Option<String>,
}
