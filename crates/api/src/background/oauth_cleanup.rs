//! Removes Canva authorization states that were never redeemed.

use std::time::Duration;

use donut_db::repositories::OauthStateRepo;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use crate::handlers::canva::OAUTH_STATE_MAX_AGE_SECS;

const CLEANUP_INTERVAL: Duration = Duration::from_secs(3600);

/// Run the cleanup loop until `cancel` is triggered.
pub async fn run(pool: PgPool, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(CLEANUP_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("OAuth state cleanup stopping");
                break;
            }
            _ = interval.tick() => {
                match OauthStateRepo::purge_expired(&pool, OAUTH_STATE_MAX_AGE_SECS).await {
                    Ok(0) => tracing::debug!("OAuth state cleanup: nothing to purge"),
                    Ok(deleted) => tracing::info!(deleted, "OAuth state cleanup: purged expired states"),
                    Err(e) => tracing::error!(error = %e, "OAuth state cleanup failed"),
                }
            }
        }
    }
}
