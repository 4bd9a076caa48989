//! Per-user access tokens for the design API.
//!
//! A cached token is returned as long as it stays valid for longer than the
//! refresh buffer. Otherwise the refresh token is exchanged for a new pair
//! which is persisted before use. Refreshes for one user are serialized so
//! concurrent callers share a single refresh.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{Duration, Utc};
use donut_canva::CanvaApiError;
use donut_core::error::CoreError;
use donut_core::scheduling::{token_expiry, TOKEN_REFRESH_BUFFER_MINS};
use donut_core::types::{DbId, Timestamp};
use donut_db::models::user::{CanvaCredentials, StoreCanvaTokens};

use crate::error::PipelineError;
use crate::ports::{CredentialStore, DesignApi};

type RefreshLock = Arc<tokio::sync::Mutex<()>>;

pub struct TokenManager {
    store: Arc<dyn CredentialStore>,
    api: Arc<dyn DesignApi>,
    buffer: Duration,
    refresh_locks: Mutex<HashMap<DbId, RefreshLock>>,
}

impl TokenManager {
    pub fn new(store: Arc<dyn CredentialStore>, api: Arc<dyn DesignApi>) -> Self {
        Self {
            store,
            api,
            buffer: Duration::minutes(TOKEN_REFRESH_BUFFER_MINS),
            refresh_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Return a bearer token for `user_id` that is valid for at least the
    /// refresh buffer.
    pub async fn get_token(&self, user_id: DbId) -> Result<String, PipelineError> {
        let creds = self.load(user_id).await?;
        if let Some(token) = cached_token(&creds, Utc::now(), self.buffer) {
            return Ok(token);
        }

        let lock = self.refresh_lock(user_id);
        let result = {
            let _guard = lock.lock().await;
            self.refresh(user_id).await
        };
        self.release_refresh_lock(user_id, lock);
        result
    }

    /// Number of users whose refresh lock is currently held or awaited.
    pub fn active_refreshes(&self) -> usize {
        self.locks().len()
    }

    /// Refresh with the user's lock held.
    async fn refresh(&self, user_id: DbId) -> Result<String, PipelineError> {
        // Another caller may have refreshed while we waited.
        let creds = self.load(user_id).await?;
        if let Some(token) = cached_token(&creds, Utc::now(), self.buffer) {
            return Ok(token);
        }

        let refresh_token = creds
            .refresh_token
            .filter(|t| !t.is_empty())
            .ok_or(PipelineError::NotConnected)?;

        tracing::debug!(user_id, "Refreshing Canva access token");
        let response = self.api.refresh_token(&refresh_token).await?;

        let now = Utc::now();
        let expires_at = token_expiry(now, response.expires_in)
            .ok_or(CanvaApiError::InvalidTokenLifetime(response.expires_in))?;
        let tokens = StoreCanvaTokens {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            expires_at,
            refreshed_at: now,
        };
        self.store.save_credentials(user_id, &tokens).await?;
        tracing::info!(user_id, expires_at = %tokens.expires_at, "Canva access token refreshed");

        Ok(tokens.access_token)
    }

    /// Fail with [`PipelineError::NotConnected`] unless the user has cached
    /// credentials. Does not contact the design API.
    pub async fn ensure_connected(&self, user_id: DbId) -> Result<(), PipelineError> {
        let creds = self.load(user_id).await?;
        let has = |t: &Option<String>| t.as_deref().is_some_and(|t| !t.is_empty());
        if has(&creds.access_token) || has(&creds.refresh_token) {
            Ok(())
        } else {
            Err(PipelineError::NotConnected)
        }
    }

    async fn load(&self, user_id: DbId) -> Result<CanvaCredentials, PipelineError> {
        self.store
            .load_credentials(user_id)
            .await?
            .ok_or(PipelineError::Core(CoreError::NotFound {
                entity: "user",
                id: user_id,
            }))
    }

    fn locks(&self) -> MutexGuard<'_, HashMap<DbId, RefreshLock>> {
        self.refresh_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn refresh_lock(&self, user_id: DbId) -> RefreshLock {
        self.locks().entry(user_id).or_default().clone()
    }

    /// Drop the map entry once no other caller holds or waits on it.
    ///
    /// Clones are only taken under the map mutex, so a count of two (the
    /// map and `lock`) cannot grow while it is checked here.
    fn release_refresh_lock(&self, user_id: DbId, lock: RefreshLock) {
        let mut locks = self.locks();
        if Arc::strong_count(&lock) == 2 {
            locks.remove(&user_id);
        }
    }
}

/// The cached access token, if it outlives `now + buffer`.
fn cached_token(creds: &CanvaCredentials, now: Timestamp, buffer: Duration) -> Option<String> {
    let token = creds.access_token.as_deref().filter(|t| !t.is_empty())?;
    let expires_at = creds.expires_at?;
    (expires_at > now + buffer).then(|| token.to_string())
}
