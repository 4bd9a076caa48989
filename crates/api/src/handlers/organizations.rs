//! Handlers for the caller's organization and its brand.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use donut_core::audit::action_types;
use donut_core::error::CoreError;
use donut_core::roles::ROLE_ADMIN;
use donut_db::models::activity::CreateActivity;
use donut_db::models::organization::{CreateOrganization, Organization, UpdateBrand};
use donut_db::repositories::{ActivityRepo, OrganizationRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::CurrentUser;
use crate::middleware::rbac::{OrgMember, RequireEditor};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/organizations
///
/// Create an organization and make the caller its admin. A user belongs to
/// at most one organization.
pub async fn create(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(input): Json<CreateOrganization>,
) -> AppResult<(StatusCode, Json<DataResponse<Organization>>)> {
    if user.organization_id.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "User already belongs to an organization".into(),
        )));
    }
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Organization name is required".into(),
        )));
    }

    let org = OrganizationRepo::create(&state.pool, &input).await?;
    UserRepo::set_organization(&state.pool, user.id, org.id, ROLE_ADMIN).await?;
    ActivityRepo::create(
        &state.pool,
        &CreateActivity::new(
            org.id,
            Some(user.id),
            action_types::ORGANIZATION_CREATE,
            format!("Created organization '{}'", org.name),
        )
        .with_entity(org.id),
    )
    .await?;

    tracing::info!(organization_id = org.id, user_id = user.id, "Organization created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: org })))
}

/// GET /api/v1/organizations/current
pub async fn get_current(
    member: OrgMember,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Organization>>> {
    let org = OrganizationRepo::find_by_id(&state.pool, member.organization_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Organization",
            id: member.organization_id,
        }))?;
    Ok(Json(DataResponse { data: org }))
}

/// PUT /api/v1/organizations/current/brand
///
/// Update the brand name, description and product list used in generated
/// copy.
pub async fn update_brand(
    RequireEditor(member): RequireEditor,
    State(state): State<AppState>,
    Json(input): Json<UpdateBrand>,
) -> AppResult<Json<DataResponse<Organization>>> {
    if input.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(AppError::Core(CoreError::Validation(
            "Brand name must not be empty".into(),
        )));
    }

    let org = OrganizationRepo::update_brand(&state.pool, member.organization_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Organization",
            id: member.organization_id,
        }))?;

    ActivityRepo::create(
        &state.pool,
        &CreateActivity::new(
            org.id,
            Some(member.user_id()),
            action_types::BRAND_UPDATE,
            format!("Updated brand '{}'", org.name),
        )
        .with_entity(org.id),
    )
    .await?;

    Ok(Json(DataResponse { data: org }))
}
