//! Repository for the append-only `activities` table.

use donut_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::activity::{Activity, CreateActivity};

const COLUMNS: &str =
    "id, organization_id, user_id, action_type, detail, entity_id, metadata, created_at";

/// Insert and list audit entries. There is no update or delete.
pub struct ActivityRepo;

impl ActivityRepo {
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &CreateActivity,
    ) -> Result<Activity, sqlx::Error> {
        let query = format!(
            "INSERT INTO activities (organization_id, user_id, action_type, detail, entity_id, metadata)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Activity>(&query)
            .bind(input.organization_id)
            .bind(input.user_id)
            .bind(&input.action_type)
            .bind(&input.detail)
            .bind(input.entity_id)
            .bind(&input.metadata)
            .fetch_one(executor)
            .await
    }

    /// Most recent activities first, optionally filtered by action type.
    pub async fn list_recent(
        pool: &PgPool,
        organization_id: DbId,
        action_type: Option<&str>,
        limit: i64,
    ) -> Result<Vec<Activity>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM activities
             WHERE organization_id = $1 AND ($2::TEXT IS NULL OR action_type = $2)
             ORDER BY created_at DESC, id DESC
             LIMIT $3"
        );
        sqlx::query_as::<_, Activity>(&query)
            .bind(organization_id)
            .bind(action_type)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
