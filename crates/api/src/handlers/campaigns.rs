//! Handlers for campaign generation and campaign reads.
//!
//! Generation requests are accepted immediately and run in the background;
//! the response is the queued [`GenerationRun`] (or, for bulk requests, a
//! scheduling summary) that callers can poll.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use donut_core::campaign::CampaignRequest;
use donut_core::error::CoreError;
use donut_core::types::DbId;
use donut_db::models::campaign::{Campaign, CampaignListQuery, CampaignWithDesigns};
use donut_db::models::generation_run::GenerationRun;
use donut_db::repositories::{CampaignRepo, DesignRepo, GenerationRunRepo};
use donut_pipeline::orchestrator::BulkScheduleSummary;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{OrgMember, RequireEditor};
use crate::query::{DEFAULT_LIMIT, MAX_LIMIT};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /campaigns/generate`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCampaignRequest {
    pub customer_id: DbId,
    pub title: String,
    pub content_types: Vec<String>,
    /// Empty or absent means every platform.
    #[serde(default)]
    pub platforms: Vec<String>,
}

/// Request body for `POST /campaigns/generate-bulk`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkGenerateRequest {
    pub customer_ids: Vec<DbId>,
    pub title: String,
    pub content_types: Vec<String>,
    #[serde(default)]
    pub platforms: Vec<String>,
}

/// POST /api/v1/campaigns/generate
pub async fn generate(
    RequireEditor(member): RequireEditor,
    State(state): State<AppState>,
    Json(input): Json<GenerateCampaignRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<GenerationRun>>)> {
    let request = CampaignRequest::parse(&input.title, &input.content_types, &input.platforms)?;

    let run_id = state
        .orchestrator
        .schedule_campaign(
            member.user_id(),
            member.organization_id,
            input.customer_id,
            request,
        )
        .await?;

    let run = GenerationRunRepo::find_by_id(&state.pool, member.organization_id, run_id)
        .await?
        .ok_or_else(|| {
            AppError::InternalError(format!("Generation run {run_id} vanished after scheduling"))
        })?;

    Ok((StatusCode::ACCEPTED, Json(DataResponse { data: run })))
}

/// POST /api/v1/campaigns/generate-bulk
pub async fn generate_bulk(
    RequireEditor(member): RequireEditor,
    State(state): State<AppState>,
    Json(input): Json<BulkGenerateRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<BulkScheduleSummary>>)> {
    let request = CampaignRequest::parse(&input.title, &input.content_types, &input.platforms)?;

    let summary = state
        .orchestrator
        .schedule_bulk(
            member.user_id(),
            member.organization_id,
            &input.customer_ids,
            request,
        )
        .await?;

    Ok((StatusCode::ACCEPTED, Json(DataResponse { data: summary })))
}

/// GET /api/v1/campaigns
pub async fn list(
    member: OrgMember,
    State(state): State<AppState>,
    Query(params): Query<CampaignListQuery>,
) -> AppResult<Json<DataResponse<Vec<Campaign>>>> {
    let campaigns = CampaignRepo::list(
        &state.pool,
        member.organization_id,
        params.customer_id,
        donut_db::clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT),
        donut_db::clamp_offset(params.offset),
    )
    .await?;
    Ok(Json(DataResponse { data: campaigns }))
}

/// GET /api/v1/campaigns/{id}
pub async fn get_by_id(
    member: OrgMember,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CampaignWithDesigns>>> {
    let campaign = CampaignRepo::find_by_id(&state.pool, member.organization_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Campaign",
            id,
        }))?;
    let designs = DesignRepo::list_by_campaign(&state.pool, campaign.id).await?;
    Ok(Json(DataResponse {
        data: CampaignWithDesigns { campaign, designs },
    }))
}
