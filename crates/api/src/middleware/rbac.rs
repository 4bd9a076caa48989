//! Organization membership and role extractors.
//!
//! Each extractor wraps [`CurrentUser`] and rejects requests that do not
//! meet the requirement, so handlers enforce authorization at the type level.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use donut_core::error::CoreError;
use donut_core::roles::{can_mutate, ROLE_VIEWER};
use donut_core::types::DbId;
use donut_db::models::user::User;

use super::auth::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

/// A user who belongs to an organization. Rejects with 403 otherwise.
///
/// ```ignore
/// async fn list(member: OrgMember) -> AppResult<Json<()>> {
///     tracing::info!(organization_id = member.organization_id, "listing");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct OrgMember {
    pub user: User,
    pub organization_id: DbId,
    pub role: String,
}

impl OrgMember {
    pub fn user_id(&self) -> DbId {
        self.user.id
    }
}

impl FromRequestParts<AppState> for OrgMember {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        let organization_id = user.organization_id.ok_or_else(|| {
            AppError::Core(CoreError::Forbidden(
                "User does not belong to an organization".into(),
            ))
        })?;
        let role = user.role.clone().unwrap_or_else(|| ROLE_VIEWER.to_string());
        Ok(OrgMember {
            user,
            organization_id,
            role,
        })
    }
}

/// Requires the `admin` or `editor` role. Viewers get 403.
pub struct RequireEditor(pub OrgMember);

impl FromRequestParts<AppState> for RequireEditor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let member = OrgMember::from_request_parts(parts, state).await?;
        if !can_mutate(&member.role) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Editor or Admin role required".into(),
            )));
        }
        Ok(RequireEditor(member))
    }
}
