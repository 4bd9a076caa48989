//! Repository for the `customers` table.

use donut_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::customer::{CreateCustomer, Customer, UpdateCustomer};

const COLUMNS: &str = "id, organization_id, first_name, last_name, email, phone, \
    instagram_handle, twitter_handle, tiktok_handle, preferences, brand_name, notes, \
    campaign_ids, created_by, created_at, updated_at";

/// Provides CRUD operations for customers, scoped to an organization.
pub struct CustomerRepo;

impl CustomerRepo {
    /// Insert a new customer. Handles and email are stored as given; callers
    /// normalize them first.
    pub async fn create(
        pool: &PgPool,
        organization_id: DbId,
        created_by: Option<DbId>,
        input: &CreateCustomer,
    ) -> Result<Customer, sqlx::Error> {
        let query = format!(
            "INSERT INTO customers (organization_id, first_name, last_name, email, phone,
                instagram_handle, twitter_handle, tiktok_handle, preferences, brand_name,
                notes, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Customer>(&query)
            .bind(organization_id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.instagram_handle)
            .bind(&input.twitter_handle)
            .bind(&input.tiktok_handle)
            .bind(&input.preferences)
            .bind(&input.brand_name)
            .bind(&input.notes)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a customer by id within an organization.
    pub async fn find_by_id(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
    ) -> Result<Option<Customer>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM customers WHERE id = $1 AND organization_id = $2");
        sqlx::query_as::<_, Customer>(&query)
            .bind(id)
            .bind(organization_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a customer by id regardless of organization. Used by background
    /// generation, which already holds the owning run.
    pub async fn find_by_id_unscoped(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Customer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM customers WHERE id = $1");
        sqlx::query_as::<_, Customer>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List customers of an organization, ordered by last then first name.
    pub async fn list(
        pool: &PgPool,
        organization_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Customer>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM customers
             WHERE organization_id = $1
             ORDER BY last_name ASC, first_name ASC, id ASC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Customer>(&query)
            .bind(organization_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Lower-cased emails of every customer in the organization.
    pub async fn list_emails(
        pool: &PgPool,
        organization_id: DbId,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT lower(email) FROM customers WHERE organization_id = $1",
        )
        .bind(organization_id)
        .fetch_all(pool)
        .await
    }

    /// Update a customer. Only non-`None` fields in `input` are applied; an
    /// empty handle clears it.
    pub async fn update(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
        input: &UpdateCustomer,
    ) -> Result<Option<Customer>, sqlx::Error> {
        let query = format!(
            "UPDATE customers SET
                first_name = COALESCE($3, first_name),
                last_name = COALESCE($4, last_name),
                email = COALESCE($5, email),
                phone = COALESCE($6, phone),
                instagram_handle = NULLIF(COALESCE($7, instagram_handle), ''),
                twitter_handle = NULLIF(COALESCE($8, twitter_handle), ''),
                tiktok_handle = NULLIF(COALESCE($9, tiktok_handle), ''),
                preferences = COALESCE($10, preferences),
                brand_name = COALESCE($11, brand_name),
                notes = COALESCE($12, notes)
             WHERE id = $1 AND organization_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Customer>(&query)
            .bind(id)
            .bind(organization_id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.instagram_handle)
            .bind(&input.twitter_handle)
            .bind(&input.tiktok_handle)
            .bind(&input.preferences)
            .bind(&input.brand_name)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Delete a customer. Cascades to its campaigns and designs.
    pub async fn delete(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1 AND organization_id = $2")
            .bind(id)
            .bind(organization_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Append a campaign id to the customer's campaign list.
    pub async fn append_campaign<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        campaign_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE customers SET campaign_ids = array_append(campaign_ids, $2) WHERE id = $1",
        )
        .bind(id)
        .bind(campaign_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
