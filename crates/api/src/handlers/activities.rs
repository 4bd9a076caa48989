//! Handler for the organization activity feed.

use axum::extract::{Query, State};
use axum::Json;
use donut_db::models::activity::{Activity, ActivityQuery};
use donut_db::repositories::ActivityRepo;

use crate::error::AppResult;
use crate::middleware::rbac::OrgMember;
use crate::query::{DEFAULT_LIMIT, MAX_LIMIT};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/activities?limit=&action_type=
pub async fn list(
    member: OrgMember,
    State(state): State<AppState>,
    Query(params): Query<ActivityQuery>,
) -> AppResult<Json<DataResponse<Vec<Activity>>>> {
    let activities = ActivityRepo::list_recent(
        &state.pool,
        member.organization_id,
        params.action_type.as_deref(),
        donut_db::clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT),
    )
    .await?;
    Ok(Json(DataResponse { data: activities }))
}
