//! Handlers for the caller's brand template overrides.

use axum::extract::State;
use axum::Json;
use donut_core::audit::action_types;
use donut_core::platform::ContentType;
use donut_db::models::activity::CreateActivity;
use donut_db::models::template_settings::{TemplateSettings, UpsertTemplateSettings};
use donut_db::repositories::{ActivityRepo, TemplateSettingsRepo};

use crate::error::AppResult;
use crate::middleware::auth::CurrentUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/template-settings
pub async fn list(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<TemplateSettings>>>> {
    let settings = TemplateSettingsRepo::list_for_user(&state.pool, user.id).await?;
    Ok(Json(DataResponse { data: settings }))
}

/// PUT /api/v1/template-settings
///
/// Replace the overrides for one content type. Empty strings are stored
/// but ignored at resolution time, so they reset a platform to the
/// built-in template.
pub async fn upsert(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(input): Json<UpsertTemplateSettings>,
) -> AppResult<Json<DataResponse<TemplateSettings>>> {
    let content_type = input.content_type.parse::<ContentType>()?.require_supported()?;

    let settings = TemplateSettingsRepo::upsert(
        &state.pool,
        user.id,
        user.organization_id,
        content_type.as_str(),
        &input.templates,
    )
    .await?;

    if let Some(organization_id) = user.organization_id {
        ActivityRepo::create(
            &state.pool,
            &CreateActivity::new(
                organization_id,
                Some(user.id),
                action_types::TEMPLATE_SETTINGS_UPDATE,
                format!("Updated {content_type} template settings"),
            )
            .with_entity(settings.id),
        )
        .await?;
    }

    Ok(Json(DataResponse { data: settings }))
}
