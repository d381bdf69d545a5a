//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use timetrack_core::access::Principal;
use timetrack_core::error::CoreError;
use timetrack_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::lookup;
use crate::state::AppState;

/// Header accepted when `Authorization` is absent.
pub const ACCESS_TOKEN_HEADER: &str = "x-access-token";

/// Authenticated user resolved from a JWT.
///
/// The token only carries the id; the admin flag is read from the current
/// user record (cache first), so revoked admins and deleted users lose
/// access without waiting for their token to expire.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: DbId,
    pub is_admin: bool,
}

impl AuthUser {
    pub fn principal(&self) -> Principal {
        Principal {
            user_id: self.user_id,
            is_admin: self.is_admin,
        }
    }
}

fn unauthorized(msg: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(msg.into()))
}

/// Pull the raw token from `Authorization: Bearer <token>` or `X-Access-Token`.
fn extract_token(parts: &Parts) -> Result<&str, AppError> {
    if let Some(header) = parts.headers.get(AUTHORIZATION) {
        let value = header
            .to_str()
            .map_err(|_| unauthorized("Invalid Authorization header"))?;
        return value.strip_prefix("Bearer ").ok_or_else(|| {
            unauthorized("Invalid Authorization format. Expected: Bearer <token>")
        });
    }

    parts
        .headers
        .get(ACCESS_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| unauthorized("Missing Authorization header"))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(parts)?;

        let claims = validate_token(token, &state.config.jwt)
            .map_err(|_| unauthorized("Invalid or expired token"))?;

        let user = lookup::load_user(
            &state.pool,
            state.cache.as_ref(),
            state.config.cache.ttl(),
            claims.sub,
        )
        .await?
        .ok_or_else(|| unauthorized("User no longer exists"))?;

        Ok(AuthUser {
            user_id: user.id,
            is_admin: user.is_admin,
        })
    }
}
