//! Scheduled per-customer generation runs.

use donut_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `generation_runs` table.
///
/// One run exists for every scheduled customer generation; bulk requests
/// share a `batch_id`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GenerationRun {
    pub id: DbId,
    pub organization_id: DbId,
    pub customer_id: DbId,
    pub requested_by: DbId,
    pub batch_id: Option<Uuid>,
    pub title: String,
    pub content_types: Vec<String>,
    pub platforms: Vec<String>,
    pub status: String,
    pub campaign_id: Option<DbId>,
    pub error_message: Option<String>,
    pub scheduled_for: Timestamp,
    pub started_at: Option<Timestamp>,
    pub finished_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert DTO.
#[derive(Debug, Clone)]
pub struct CreateGenerationRun {
    pub organization_id: DbId,
    pub customer_id: DbId,
    pub requested_by: DbId,
    pub batch_id: Option<Uuid>,
    pub title: String,
    pub content_types: Vec<String>,
    pub platforms: Vec<String>,
    pub scheduled_for: Timestamp,
}

/// Query parameters for `GET /generation-runs`.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationRunQuery {
    pub batch_id: Uuid,
}
