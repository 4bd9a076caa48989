//! JWT-based authentication extractors for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use donut_core::error::CoreError;
use donut_db::models::user::User;
use donut_db::repositories::UserRepo;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Identity extracted from a valid JWT Bearer token.
///
/// Only `POST /users/me` should need this directly; everything else uses
/// [`CurrentUser`] or the RBAC extractors.
#[derive(Debug, Clone)]
pub struct AuthIdentity {
    pub token_identifier: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl FromRequestParts<AppState> for AuthIdentity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(AuthIdentity {
            token_identifier: claims.sub,
            name: claims.name,
            email: claims.email,
        })
    }
}

/// The stored user behind the request's identity.
///
/// Rejects with 401 when the identity has never been registered through
/// `POST /users/me`.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let identity = AuthIdentity::from_request_parts(parts, state).await?;
        let user = UserRepo::find_by_token_identifier(&state.pool, &identity.token_identifier)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "User is not registered. Call POST /users/me first".into(),
                ))
            })?;
        Ok(CurrentUser(user))
    }
}
