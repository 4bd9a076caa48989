//! Repository for pending PKCE authorizations.

use donut_core::types::DbId;
use sqlx::PgPool;

use crate::models::oauth_state::OauthState;

pub struct OauthStateRepo;

impl OauthStateRepo {
    pub async fn create(
        pool: &PgPool,
        state: &str,
        user_id: DbId,
        code_verifier: &str,
    ) -> Result<OauthState, sqlx::Error> {
        sqlx::query_as::<_, OauthState>(
            "INSERT INTO canva_oauth_states (state, user_id, code_verifier)
             VALUES ($1, $2, $3)
             RETURNING state, user_id, code_verifier, created_at",
        )
        .bind(state)
        .bind(user_id)
        .bind(code_verifier)
        .fetch_one(pool)
        .await
    }

    /// Delete and return the state row if it belongs to `user_id` and is
    /// younger than `max_age_secs`. A state can be consumed once.
    pub async fn consume(
        pool: &PgPool,
        state: &str,
        user_id: DbId,
        max_age_secs: i64,
    ) -> Result<Option<OauthState>, sqlx::Error> {
        sqlx::query_as::<_, OauthState>(
            "DELETE FROM canva_oauth_states
             WHERE state = $1 AND user_id = $2
               AND created_at > NOW() - make_interval(secs => $3)
             RETURNING state, user_id, code_verifier, created_at",
        )
        .bind(state)
        .bind(user_id)
        .bind(max_age_secs as f64)
        .fetch_optional(pool)
        .await
    }

    /// Remove expired states. Returns the number of rows deleted.
    pub async fn purge_expired(pool: &PgPool, max_age_secs: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM canva_oauth_states WHERE created_at <= NOW() - make_interval(secs => $1)",
        )
        .bind(max_age_secs as f64)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
