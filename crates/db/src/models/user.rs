//! User entity model and DTOs.

use donut_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains cached design-API credentials -- NEVER serialize this to API
/// responses directly. Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub token_identifier: String,
    pub name: String,
    pub email: Option<String>,
    pub organization_id: Option<DbId>,
    pub role: Option<String>,
    pub canva_access_token: Option<String>,
    pub canva_refresh_token: Option<String>,
    pub canva_token_expires_at: Option<Timestamp>,
    pub canva_token_refreshed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Whether the user has ever completed the design-API connect flow.
    pub fn is_canva_connected(&self) -> bool {
        self.canva_refresh_token.is_some() || self.canva_access_token.is_some()
    }

    pub fn credentials(&self) -> CanvaCredentials {
        CanvaCredentials {
            access_token: self.canva_access_token.clone(),
            refresh_token: self.canva_refresh_token.clone(),
            expires_at: self.canva_token_expires_at,
            refreshed_at: self.canva_token_refreshed_at,
        }
    }
}

/// Safe user representation for API responses (no tokens).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub name: String,
    pub email: Option<String>,
    pub organization_id: Option<DbId>,
    pub role: Option<String>,
    pub canva_connected: bool,
    pub created_at: Timestamp,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            organization_id: user.organization_id,
            role: user.role.clone(),
            canva_connected: user.is_canva_connected(),
            created_at: user.created_at,
        }
    }
}

/// Identity fields copied from the identity provider's token.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertUser {
    pub token_identifier: String,
    pub name: String,
    pub email: Option<String>,
}

/// Cached OAuth credentials for the design API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanvaCredentials {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_at: Option<Timestamp>,
    pub refreshed_at: Option<Timestamp>,
}

/// A freshly issued token pair to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreCanvaTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: Timestamp,
    pub refreshed_at: Timestamp,
}
