//! Design entity model and DTOs.

use donut_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `designs` table: one generated design per platform.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Design {
    pub id: DbId,
    pub campaign_id: DbId,
    pub organization_id: DbId,
    pub created_by: DbId,
    pub platform: String,
    pub content_type: String,
    pub title: String,
    pub canva_job_id: Option<String>,
    pub status: String,
    pub canva_design_id: Option<String>,
    pub edit_url: Option<String>,
    pub view_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub error_message: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert DTO. `canva_job_id` is `None` only for designs that failed before
/// a remote job existed, in which case `error_message` is set.
#[derive(Debug, Clone)]
pub struct CreateDesign {
    pub campaign_id: DbId,
    pub organization_id: DbId,
    pub created_by: DbId,
    pub platform: String,
    pub content_type: String,
    pub title: String,
    pub canva_job_id: Option<String>,
    pub status: String,
    pub error_message: Option<String>,
}

/// An in-progress design the poller needs to check.
#[derive(Debug, Clone, FromRow)]
pub struct PendingDesign {
    pub id: DbId,
    pub campaign_id: DbId,
    pub created_by: DbId,
    pub canva_job_id: String,
}

/// Result fields written when a remote job completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompleteDesign {
    pub canva_design_id: String,
    pub edit_url: String,
    pub view_url: String,
    pub thumbnail_url: String,
}
