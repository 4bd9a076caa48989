//! Repository for the `organizations` table.

use donut_core::types::DbId;
use sqlx::PgPool;

use crate::models::organization::{CreateOrganization, Organization, UpdateBrand};

const COLUMNS: &str = "id, name, description, products, created_at, updated_at";

/// Provides CRUD operations for organizations.
pub struct OrganizationRepo;

impl OrganizationRepo {
    /// Insert a new organization, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateOrganization,
    ) -> Result<Organization, sqlx::Error> {
        let query = format!(
            "INSERT INTO organizations (name, description, products)
             VALUES ($1, COALESCE($2, ''), COALESCE($3, '{{}}'::text[]))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Organization>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.products)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Organization>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM organizations WHERE id = $1");
        sqlx::query_as::<_, Organization>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update brand metadata. Only non-`None` fields are applied.
    pub async fn update_brand(
        pool: &PgPool,
        id: DbId,
        input: &UpdateBrand,
    ) -> Result<Option<Organization>, sqlx::Error> {
        let query = format!(
            "UPDATE organizations SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                products = COALESCE($4, products)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Organization>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.products)
            .fetch_optional(pool)
            .await
    }
}
