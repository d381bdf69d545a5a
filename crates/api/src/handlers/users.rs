//! Handlers for the `/users` resource: registration, login, profile, search.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use timetrack_core::access::{Capability, Target};
use timetrack_core::cache::CacheKind;
use timetrack_core::error::CoreError;
use timetrack_core::pagination::Paginated;
use timetrack_core::patch::Patch;
use timetrack_core::types::DbId;
use timetrack_core::validation::{
    check_max_len, check_not_blank, check_patch_len, normalize_email, MAX_PERSON_NAME_LEN,
    MIN_PASSWORD_LENGTH,
};
use timetrack_db::models::user::{CreateUser, UpdateUser, UserResponse};
use timetrack_db::repositories::UserRepo;
use validator::{Validate, ValidateEmail};

use super::require_user;
use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::lookup;
use crate::middleware::access::authorize;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::UserSearchParams;
use crate::response::{AuthResponse, DataResponse};
use crate::state::AppState;

const MAX_ADDRESS_LEN: usize = 256;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /users`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    pub password: String,
    #[validate(length(min = 2, max = 128))]
    pub name: String,
    #[validate(length(min = 2, max = 128))]
    pub surname: String,
    #[validate(length(max = 128))]
    pub patronymic: Option<String>,
    #[validate(length(min = 1, max = 256))]
    pub address: String,
    pub passport_series: Option<i32>,
    pub passport_number: Option<i32>,
}

/// Request body for `POST /users/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `PATCH /users/{user_id}`.
///
/// Absent keys are left alone, `null` clears nullable fields, and any
/// present value (including `""`) replaces the stored one.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub email: Patch<String>,
    #[serde(default)]
    pub password: Patch<String>,
    #[serde(default)]
    pub name: Patch<String>,
    #[serde(default)]
    pub surname: Patch<String>,
    #[serde(default)]
    pub patronymic: Patch<String>,
    #[serde(default)]
    pub address: Patch<String>,
    #[serde(default)]
    pub passport_series: Patch<i32>,
    #[serde(default)]
    pub passport_number: Patch<i32>,
}

/// Request body for `PUT /users/{user_id}/admin`.
#[derive(Debug, Deserialize)]
pub struct SetAdminRequest {
    pub is_admin: bool,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
}

fn hash_new_password(password: &str) -> AppResult<String> {
    validate_password_strength(password, MIN_PASSWORD_LENGTH).map_err(CoreError::Validation)?;
    hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))
}

fn issue_token(state: &AppState, user: UserResponse) -> AppResult<AuthResponse> {
    let access_token = generate_access_token(user.id, user.is_admin, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    Ok(AuthResponse {
        access_token,
        expires_in: state.config.jwt.expires_in_secs(),
        user,
    })
}

fn check_name(field: &str, value: &Patch<String>) -> Result<(), CoreError> {
    value.reject_null(field)?;
    if let Some(v) = value.value() {
        check_not_blank(field, v)?;
        check_max_len(field, v, MAX_PERSON_NAME_LEN)?;
    }
    Ok(())
}

/// Validate a patch body and turn it into a store update.
fn prepare_update(input: UpdateUserRequest) -> AppResult<UpdateUser> {
    input.email.reject_null("email")?;
    input.password.reject_null("password")?;
    input.address.reject_null("address")?;
    check_name("name", &input.name)?;
    check_name("surname", &input.surname)?;
    check_patch_len("patronymic", &input.patronymic, MAX_PERSON_NAME_LEN)?;
    check_patch_len("address", &input.address, MAX_ADDRESS_LEN)?;

    let email = input.email.try_map(|raw| {
        let email = normalize_email(&raw);
        if email.validate_email() {
            Ok(email)
        } else {
            Err(CoreError::Validation("Invalid email address".into()))
        }
    })?;
    let password_hash = input.password.try_map(|p| hash_new_password(&p))?;

    Ok(UpdateUser {
        email,
        password_hash,
        name: input.name,
        surname: input.surname,
        patronymic: input.patronymic,
        address: input.address,
        passport_series: input.passport_series,
        passport_number: input.passport_number,
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/users
///
/// Register a new account and log it in.
pub async fn register(
    State(state): State<AppState>,
    Json(mut input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    input.email = normalize_email(&input.email);
    input.validate()?;
    let password_hash = hash_new_password(&input.password)?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email: input.email,
            password_hash,
            name: input.name,
            surname: input.surname,
            patronymic: input.patronymic,
            address: input.address,
            passport_series: input.passport_series,
            passport_number: input.passport_number,
        },
    )
    .await?;
    tracing::info!(user_id = user.id, "User registered");

    let user = UserResponse::from(user);
    lookup::store_user(state.cache.as_ref(), state.config.cache.ttl(), &user).await;

    Ok((StatusCode::CREATED, Json(issue_token(&state, user)?)))
}

/// POST /api/v1/users/login
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let email = normalize_email(&input.email);
    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(invalid_credentials)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(user_id = user.id, "Rejected login with wrong password");
        return Err(invalid_credentials());
    }

    Ok(Json(issue_token(&state, UserResponse::from(user))?))
}

/// GET /api/v1/users
///
/// Search users by id range, text fields, and passport ranges. Results are
/// sanitized.
pub async fn search(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<UserSearchParams>,
) -> AppResult<Json<DataResponse<Paginated<UserResponse>>>> {
    let (search, page) = params.into_parts();
    let total = UserRepo::count(&state.pool, &search).await?;
    let users = UserRepo::search(&state.pool, &search, page).await?;
    let users = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(DataResponse {
        data: Paginated::new(users, page, total),
    }))
}

/// GET /api/v1/users/{user_id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<UserResponse>> {
    authorize(&state, &user, Target::User { user_id: id }, Capability::Read).await?;
    Ok(Json(require_user(&state, id).await?))
}

/// PATCH /api/v1/users/{user_id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    authorize(&state, &user, Target::User { user_id: id }, Capability::Modify).await?;
    let update = prepare_update(input)?;

    let updated = UserRepo::update(&state.pool, id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    let updated = UserResponse::from(updated);
    lookup::store_user(state.cache.as_ref(), state.config.cache.ttl(), &updated).await;

    Ok(Json(updated))
}

/// DELETE /api/v1/users/{user_id}
///
/// Refused with 409 while the user still owns projects.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    authorize(&state, &user, Target::User { user_id: id }, Capability::Modify).await?;

    if UserRepo::owns_projects(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "User still owns projects; delete them first".into(),
        )));
    }
    if !UserRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "User", id }));
    }
    lookup::evict(state.cache.as_ref(), CacheKind::User, id).await;
    tracing::info!(user_id = id, deleted_by = user.user_id, "User deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/users/{user_id}/admin
///
/// Grant or revoke admin rights. Admin only.
pub async fn set_admin(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<SetAdminRequest>,
) -> AppResult<Json<UserResponse>> {
    let updated = UserRepo::set_admin(&state.pool, id, input.is_admin)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    let updated = UserResponse::from(updated);
    lookup::store_user(state.cache.as_ref(), state.config.cache.ttl(), &updated).await;
    tracing::info!(
        user_id = id,
        is_admin = input.is_admin,
        changed_by = admin.user_id,
        "Admin flag changed"
    );

    Ok(Json(updated))
}
