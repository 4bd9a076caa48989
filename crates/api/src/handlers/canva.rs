//! Handlers for connecting a user's Canva account (OAuth 2.0 with PKCE).
//!
//! `GET /canva/authorize` stores a one-time `state` plus code verifier and
//! returns the browser URL. The frontend sends the resulting `code` and
//! `state` to `POST /canva/callback`, which exchanges them for tokens.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use donut_canva::CanvaApiError;
use donut_core::audit::action_types;
use donut_core::pkce::{code_challenge, generate_code_verifier, generate_state};
use donut_core::scheduling::token_expiry;
use donut_core::types::Timestamp;
use donut_db::models::activity::CreateActivity;
use donut_db::models::user::StoreCanvaTokens;
use donut_db::repositories::{ActivityRepo, OauthStateRepo, UserRepo};
use donut_pipeline::PipelineError;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::CurrentUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// How long an authorization `state` stays redeemable.
pub const OAUTH_STATE_MAX_AGE_SECS: i64 = 600;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizeResponse {
    pub authorize_url: String,
    pub state: String,
}

#[derive(Debug, Deserialize)]
pub struct CallbackRequest {
    pub code: String,
    pub state: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStatus {
    pub connected: bool,
    pub expires_at: Option<Timestamp>,
}

/// GET /api/v1/canva/authorize
pub async fn authorize(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<AuthorizeResponse>>> {
    let oauth_state = generate_state();
    let verifier = generate_code_verifier();
    OauthStateRepo::create(&state.pool, &oauth_state, user.id, &verifier).await?;

    let authorize_url = state
        .canva
        .authorize_url(&oauth_state, &code_challenge(&verifier))
        .map_err(PipelineError::Canva)?;

    Ok(Json(DataResponse {
        data: AuthorizeResponse {
            authorize_url,
            state: oauth_state,
        },
    }))
}

/// POST /api/v1/canva/callback
pub async fn callback(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(input): Json<CallbackRequest>,
) -> AppResult<Json<DataResponse<ConnectionStatus>>> {
    if input.code.trim().is_empty() {
        return Err(AppError::BadRequest("Authorization code is required".into()));
    }

    let pending =
        OauthStateRepo::consume(&state.pool, &input.state, user.id, OAUTH_STATE_MAX_AGE_SECS)
            .await?
            .ok_or_else(|| {
                AppError::BadRequest("Authorization state is invalid or has expired".into())
            })?;

    let tokens = state
        .canva
        .exchange_code(&input.code, &pending.code_verifier)
        .await
        .map_err(PipelineError::Canva)?;

    let now = Utc::now();
    let expires_at = token_expiry(now, tokens.expires_in)
        .ok_or(CanvaApiError::InvalidTokenLifetime(tokens.expires_in))
        .map_err(PipelineError::Canva)?;
    UserRepo::store_canva_tokens(
        &state.pool,
        user.id,
        &StoreCanvaTokens {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_at,
            refreshed_at: now,
        },
    )
    .await?;

    if let Some(organization_id) = user.organization_id {
        ActivityRepo::create(
            &state.pool,
            &CreateActivity::new(
                organization_id,
                Some(user.id),
                action_types::CANVA_CONNECT,
                "Connected Canva account",
            ),
        )
        .await?;
    }

    tracing::info!(user_id = user.id, "Canva account connected");
    Ok(Json(DataResponse {
        data: ConnectionStatus {
            connected: true,
            expires_at: Some(expires_at),
        },
    }))
}

/// GET /api/v1/canva/status
pub async fn status(CurrentUser(user): CurrentUser) -> Json<DataResponse<ConnectionStatus>> {
    Json(DataResponse {
        data: ConnectionStatus {
            connected: user.is_canva_connected(),
            expires_at: user.canva_token_expires_at,
        },
    })
}

/// DELETE /api/v1/canva/connection
pub async fn disconnect(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> AppResult<StatusCode> {
    UserRepo::clear_canva_tokens(&state.pool, user.id).await?;

    if let Some(organization_id) = user.organization_id {
        ActivityRepo::create(
            &state.pool,
            &CreateActivity::new(
                organization_id,
                Some(user.id),
                action_types::CANVA_DISCONNECT,
                "Disconnected Canva account",
            ),
        )
        .await?;
    }

    tracing::info!(user_id = user.id, "Canva account disconnected");
    Ok(StatusCode::NO_CONTENT)
}
