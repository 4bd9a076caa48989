//! Handlers for the current user's record.

use axum::extract::State;
use axum::Json;
use donut_db::models::user::{UpsertUser, UserResponse};
use donut_db::repositories::UserRepo;

use crate::error::AppResult;
use crate::middleware::auth::{AuthIdentity, CurrentUser};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/users/me
///
/// Create or refresh the stored user for the authenticated identity.
/// Idempotent: repeated calls return the same user.
pub async fn upsert_me(
    identity: AuthIdentity,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let name = identity
        .name
        .clone()
        .filter(|n| !n.trim().is_empty())
        .or_else(|| identity.email.clone())
        .unwrap_or_else(|| identity.token_identifier.clone());

    let user = UserRepo::upsert(
        &state.pool,
        &UpsertUser {
            token_identifier: identity.token_identifier,
            name,
            email: identity.email,
        },
    )
    .await?;

    tracing::debug!(user_id = user.id, "User upserted");
    Ok(Json(DataResponse {
        data: UserResponse::from(&user),
    }))
}

/// GET /api/v1/users/me
pub async fn get_me(CurrentUser(user): CurrentUser) -> Json<DataResponse<UserResponse>> {
    Json(DataResponse {
        data: UserResponse::from(&user),
    })
}
