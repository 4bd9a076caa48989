//! Per-user brand template settings.

use donut_core::templates::TemplateOverrides;
use donut_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `brand_template_settings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TemplateSettings {
    pub id: DbId,
    pub user_id: DbId,
    pub organization_id: Option<DbId>,
    pub content_type: String,
    pub email_template_id: Option<String>,
    pub instagram_template_id: Option<String>,
    pub twitter_template_id: Option<String>,
    pub tiktok_template_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TemplateSettings {
    pub fn overrides(&self) -> TemplateOverrides {
        TemplateOverrides {
            email_template_id: self.email_template_id.clone(),
            instagram_template_id: self.instagram_template_id.clone(),
            twitter_template_id: self.twitter_template_id.clone(),
            tiktok_template_id: self.tiktok_template_id.clone(),
        }
    }
}

/// DTO for `PUT /template-settings`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertTemplateSettings {
    pub content_type: String,
    #[serde(flatten)]
    pub templates: TemplateOverrides,
}
