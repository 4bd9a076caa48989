//! Repository for the `brand_template_settings` table.

use donut_core::templates::TemplateOverrides;
use donut_core::types::DbId;
use sqlx::PgPool;

use crate::models::template_settings::TemplateSettings;

const COLUMNS: &str = "id, user_id, organization_id, content_type, email_template_id, \
    instagram_template_id, twitter_template_id, tiktok_template_id, created_at, updated_at";

pub struct TemplateSettingsRepo;

impl TemplateSettingsRepo {
    pub async fn find(
        pool: &PgPool,
        user_id: DbId,
        content_type: &str,
    ) -> Result<Option<TemplateSettings>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM brand_template_settings
             WHERE user_id = $1 AND content_type = $2"
        );
        sqlx::query_as::<_, TemplateSettings>(&query)
            .bind(user_id)
            .bind(content_type)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<TemplateSettings>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM brand_template_settings
             WHERE user_id = $1 ORDER BY content_type ASC"
        );
        sqlx::query_as::<_, TemplateSettings>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Insert or replace the overrides for one content type.
    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        organization_id: Option<DbId>,
        content_type: &str,
        templates: &TemplateOverrides,
    ) -> Result<TemplateSettings, sqlx::Error> {
        let query = format!(
            "INSERT INTO brand_template_settings (user_id, organization_id, content_type,
                email_template_id, instagram_template_id, twitter_template_id, tiktok_template_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (user_id, content_type) DO UPDATE SET
                organization_id = EXCLUDED.organization_id,
                email_template_id = EXCLUDED.email_template_id,
                instagram_template_id = EXCLUDED.instagram_template_id,
                twitter_template_id = EXCLUDED.twitter_template_id,
                tiktok_template_id = EXCLUDED.tiktok_template_id
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TemplateSettings>(&query)
            .bind(user_id)
            .bind(organization_id)
            .bind(content_type)
            .bind(&templates.email_template_id)
            .bind(&templates.instagram_template_id)
            .bind(&templates.twitter_template_id)
            .bind(&templates.tiktok_template_id)
            .fetch_one(pool)
            .await
    }
}
