//! Pending PKCE authorization for the design-API connect flow.

use donut_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `canva_oauth_states` table.
#[derive(Debug, Clone, FromRow)]
pub struct OauthState {
    pub state: String,
    pub user_id: DbId,
    pub code_verifier: String,
    pub created_at: Timestamp,
}
