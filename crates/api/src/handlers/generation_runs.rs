//! Handlers for reading scheduled generation runs.

use axum::extract::{Path, Query, State};
use axum::Json;
use donut_core::error::CoreError;
use donut_core::types::DbId;
use donut_db::models::generation_run::{GenerationRun, GenerationRunQuery};
use donut_db::repositories::GenerationRunRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::OrgMember;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/generation-runs/{id}
pub async fn get_by_id(
    member: OrgMember,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<GenerationRun>>> {
    let run = GenerationRunRepo::find_by_id(&state.pool, member.organization_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "GenerationRun",
            id,
        }))?;
    Ok(Json(DataResponse { data: run }))
}

/// GET /api/v1/generation-runs?batch_id=
///
/// Every run created by one bulk request.
pub async fn list_by_batch(
    member: OrgMember,
    State(state): State<AppState>,
    Query(params): Query<GenerationRunQuery>,
) -> AppResult<Json<DataResponse<Vec<GenerationRun>>>> {
    let runs =
        GenerationRunRepo::list_by_batch(&state.pool, member.organization_id, params.batch_id)
            .await?;
    Ok(Json(DataResponse { data: runs }))
}
