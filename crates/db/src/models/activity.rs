//! Activity (audit trail) model and DTOs.

use donut_core::audit::redact_sensitive_fields;
use donut_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the append-only `activities` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Activity {
    pub id: DbId,
    pub organization_id: DbId,
    pub user_id: Option<DbId>,
    pub action_type: String,
    pub detail: String,
    pub entity_id: Option<DbId>,
    pub metadata: Option<serde_json::Value>,
    pub created_at: Timestamp,
}

/// Insert DTO.
#[derive(Debug, Clone)]
pub struct CreateActivity {
    pub organization_id: DbId,
    pub user_id: Option<DbId>,
    pub action_type: String,
    pub detail: String,
    pub entity_id: Option<DbId>,
    pub metadata: Option<serde_json::Value>,
}

impl CreateActivity {
    pub fn new(
        organization_id: DbId,
        user_id: Option<DbId>,
        action_type: &str,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            organization_id,
            user_id,
            action_type: action_type.to_string(),
            detail: detail.into(),
            entity_id: None,
            metadata: None,
        }
    }

    pub fn with_entity(mut self, entity_id: DbId) -> Self {
        self.entity_id = Some(entity_id);
        self
    }

    /// Attach metadata. Sensitive keys are redacted before storage.
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(redact_sensitive_fields(&metadata));
        self
    }
}

/// Query parameters for `GET /activities`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityQuery {
    pub limit: Option<i64>,
    pub action_type: Option<String>,
}
