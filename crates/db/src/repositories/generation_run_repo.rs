//! Repository for the `generation_runs` table.

use donut_core::status::GenerationRunStatus;
use donut_core::types::DbId;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::generation_run::{CreateGenerationRun, GenerationRun};

const COLUMNS: &str = "id, organization_id, customer_id, requested_by, batch_id, title, \
    content_types, platforms, status, campaign_id, error_message, scheduled_for, \
    started_at, finished_at, created_at, updated_at";

pub struct GenerationRunRepo;

impl GenerationRunRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateGenerationRun,
    ) -> Result<GenerationRun, sqlx::Error> {
        let query = format!(
            "INSERT INTO generation_runs (organization_id, customer_id, requested_by, batch_id,
                title, content_types, platforms, scheduled_for)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GenerationRun>(&query)
            .bind(input.organization_id)
            .bind(input.customer_id)
            .bind(input.requested_by)
            .bind(input.batch_id)
            .bind(&input.title)
            .bind(&input.content_types)
            .bind(&input.platforms)
            .bind(input.scheduled_for)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
    ) -> Result<Option<GenerationRun>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM generation_runs WHERE id = $1 AND organization_id = $2");
        sqlx::query_as::<_, GenerationRun>(&query)
            .bind(id)
            .bind(organization_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_by_batch(
        pool: &PgPool,
        organization_id: DbId,
        batch_id: Uuid,
    ) -> Result<Vec<GenerationRun>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM generation_runs
             WHERE organization_id = $1 AND batch_id = $2
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, GenerationRun>(&query)
            .bind(organization_id)
            .bind(batch_id)
            .fetch_all(pool)
            .await
    }

    /// `queued -> running`. Returns `false` if the run was not queued.
    pub async fn mark_running(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE generation_runs SET status = $2, started_at = NOW()
             WHERE id = $1 AND status = 'queued'",
        )
        .bind(id)
        .bind(GenerationRunStatus::Running.as_str())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// `running -> completed`, recording the persisted campaign.
    pub async fn mark_completed<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        campaign_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE generation_runs SET status = $2, campaign_id = $3, finished_at = NOW()
             WHERE id = $1 AND status = 'running'",
        )
        .bind(id)
        .bind(GenerationRunStatus::Completed.as_str())
        .bind(campaign_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark a non-terminal run failed.
    pub async fn mark_failed(pool: &PgPool, id: DbId, message: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE generation_runs SET status = $2, error_message = $3, finished_at = NOW()
             WHERE id = $1 AND status IN ('queued', 'running')",
        )
        .bind(id)
        .bind(GenerationRunStatus::Failed.as_str())
        .bind(message)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Fail every run left unfinished, e.g. by a restart. Returns the count.
    pub async fn fail_unfinished(pool: &PgPool, message: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE generation_runs SET status = 'failed', error_message = $1, finished_at = NOW()
             WHERE status IN ('queued', 'running')",
        )
        .bind(message)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
