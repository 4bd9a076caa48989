//! Repository for the `campaigns` table.

use donut_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::campaign::{Campaign, CreateCampaign};

const COLUMNS: &str =
    "id, organization_id, customer_id, created_by, title, status, platforms, created_at, updated_at";

pub struct CampaignRepo;

impl CampaignRepo {
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &CreateCampaign,
    ) -> Result<Campaign, sqlx::Error> {
        let query = format!(
            "INSERT INTO campaigns (organization_id, customer_id, created_by, title, status, platforms)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(input.organization_id)
            .bind(input.customer_id)
            .bind(input.created_by)
            .bind(&input.title)
            .bind(&input.status)
            .bind(&input.platforms)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
    ) -> Result<Option<Campaign>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM campaigns WHERE id = $1 AND organization_id = $2");
        sqlx::query_as::<_, Campaign>(&query)
            .bind(id)
            .bind(organization_id)
            .fetch_optional(pool)
            .await
    }

    /// List campaigns newest first, optionally narrowed to one customer.
    pub async fn list(
        pool: &PgPool,
        organization_id: DbId,
        customer_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Campaign>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM campaigns
             WHERE organization_id = $1 AND ($2::BIGINT IS NULL OR customer_id = $2)
             ORDER BY created_at DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(organization_id)
            .bind(customer_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn update_status(pool: &PgPool, id: DbId, status: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE campaigns SET status = $2 WHERE id = $1 AND status <> $2")
            .bind(id)
            .bind(status)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
