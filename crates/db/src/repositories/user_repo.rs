//! Repository for the `users` table, including cached design-API tokens.

use donut_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::user::{CanvaCredentials, StoreCanvaTokens, UpsertUser, User};

const COLUMNS: &str = "id, token_identifier, name, email, organization_id, role, \
    canva_access_token, canva_refresh_token, canva_token_expires_at, \
    canva_token_refreshed_at, created_at, updated_at";

/// Provides user lookup, membership and token persistence.
pub struct UserRepo;

impl UserRepo {
    /// Create the user on first sight, otherwise refresh name and email.
    pub async fn upsert(pool: &PgPool, input: &UpsertUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (token_identifier, name, email)
             VALUES ($1, $2, $3)
             ON CONFLICT (token_identifier) DO UPDATE SET
                name = EXCLUDED.name,
                email = COALESCE(EXCLUDED.email, users.email)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.token_identifier)
            .bind(&input.name)
            .bind(&input.email)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_token_identifier(
        pool: &PgPool,
        token_identifier: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE token_identifier = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(token_identifier)
            .fetch_optional(pool)
            .await
    }

    /// Attach a user to an organization with the given role.
    pub async fn set_organization(
        pool: &PgPool,
        id: DbId,
        organization_id: DbId,
        role: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET organization_id = $2, role = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(organization_id)
            .bind(role)
            .fetch_optional(pool)
            .await
    }

    /// Read only the cached design-API credentials.
    pub async fn get_canva_credentials(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CanvaCredentials>, sqlx::Error> {
        let row: Option<(
            Option<String>,
            Option<String>,
            Option<Timestamp>,
            Option<Timestamp>,
        )> = sqlx::query_as(
            "SELECT canva_access_token, canva_refresh_token,
                    canva_token_expires_at, canva_token_refreshed_at
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(
            |(access_token, refresh_token, expires_at, refreshed_at)| CanvaCredentials {
                access_token,
                refresh_token,
                expires_at,
                refreshed_at,
            },
        ))
    }

    /// Persist a new token pair. Returns `true` if the user exists.
    pub async fn store_canva_tokens(
        pool: &PgPool,
        id: DbId,
        tokens: &StoreCanvaTokens,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET
                canva_access_token = $2,
                canva_refresh_token = $3,
                canva_token_expires_at = $4,
                canva_token_refreshed_at = $5
             WHERE id = $1",
        )
        .bind(id)
        .bind(&tokens.access_token)
        .bind(&tokens.refresh_token)
        .bind(tokens.expires_at)
        .bind(tokens.refreshed_at)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Forget all cached design-API credentials.
    pub async fn clear_canva_tokens(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET
                canva_access_token = NULL,
                canva_refresh_token = NULL,
                canva_token_expires_at = NULL,
                canva_token_refreshed_at = NULL
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
