//! Repository for the `designs` table.
//!
//! Status transitions are conditional on the row still being
//! `in_progress`, so terminal rows are never mutated even if two pollers
//! race.

use donut_core::status::DesignStatus;
use donut_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::design::{CompleteDesign, CreateDesign, Design, PendingDesign};

const COLUMNS: &str = "id, campaign_id, organization_id, created_by, platform, content_type, \
    title, canva_job_id, status, canva_design_id, edit_url, view_url, thumbnail_url, \
    error_message, created_at, updated_at";

pub struct DesignRepo;

impl DesignRepo {
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &CreateDesign,
    ) -> Result<Design, sqlx::Error> {
        let query = format!(
            "INSERT INTO designs (campaign_id, organization_id, created_by, platform,
                content_type, title, canva_job_id, status, error_message)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Design>(&query)
            .bind(input.campaign_id)
            .bind(input.organization_id)
            .bind(input.created_by)
            .bind(&input.platform)
            .bind(&input.content_type)
            .bind(&input.title)
            .bind(&input.canva_job_id)
            .bind(&input.status)
            .bind(&input.error_message)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Design>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM designs WHERE id = $1");
        sqlx::query_as::<_, Design>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Designs of one campaign in insertion order.
    pub async fn list_by_campaign(
        pool: &PgPool,
        campaign_id: DbId,
    ) -> Result<Vec<Design>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM designs WHERE campaign_id = $1 ORDER BY id ASC");
        sqlx::query_as::<_, Design>(&query)
            .bind(campaign_id)
            .fetch_all(pool)
            .await
    }

    /// Every design still waiting on its remote job, oldest first.
    pub async fn list_in_progress(pool: &PgPool) -> Result<Vec<PendingDesign>, sqlx::Error> {
        sqlx::query_as::<_, PendingDesign>(
            "SELECT id, campaign_id, created_by, canva_job_id FROM designs
             WHERE status = 'in_progress' AND canva_job_id IS NOT NULL
             ORDER BY id ASC",
        )
        .fetch_all(pool)
        .await
    }

    /// Status values of every design in a campaign.
    pub async fn statuses_for_campaign(
        pool: &PgPool,
        campaign_id: DbId,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT status FROM designs WHERE campaign_id = $1")
            .bind(campaign_id)
            .fetch_all(pool)
            .await
    }

    /// Mark an in-progress design completed. Returns `false` if the row was
    /// already terminal.
    pub async fn mark_completed(
        pool: &PgPool,
        id: DbId,
        result: &CompleteDesign,
    ) -> Result<bool, sqlx::Error> {
        let outcome = sqlx::query(
            "UPDATE designs SET
                status = $2,
                canva_design_id = $3,
                edit_url = $4,
                view_url = $5,
                thumbnail_url = $6
             WHERE id = $1 AND status = 'in_progress'",
        )
        .bind(id)
        .bind(DesignStatus::Completed.as_str())
        .bind(&result.canva_design_id)
        .bind(&result.edit_url)
        .bind(&result.view_url)
        .bind(&result.thumbnail_url)
        .execute(pool)
        .await?;
        Ok(outcome.rows_affected() > 0)
    }

    /// Mark an in-progress design failed. Returns `false` if the row was
    /// already terminal.
    pub async fn mark_failed(pool: &PgPool, id: DbId, message: &str) -> Result<bool, sqlx::Error> {
        let outcome = sqlx::query(
            "UPDATE designs SET status = $2, error_message = $3
             WHERE id = $1 AND status = 'in_progress'",
        )
        .bind(id)
        .bind(DesignStatus::Failed.as_str())
        .bind(message)
        .execute(pool)
        .await?;
        Ok(outcome.rows_affected() > 0)
    }
}
