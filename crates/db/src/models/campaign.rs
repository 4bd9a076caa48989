//! Campaign entity model and DTOs.

use donut_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::design::Design;

/// A row from the `campaigns` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Campaign {
    pub id: DbId,
    pub organization_id: DbId,
    pub customer_id: DbId,
    pub created_by: DbId,
    pub title: String,
    pub status: String,
    /// Platforms that received a design, in generation order.
    pub platforms: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert DTO. Only ever built by the campaign persistence transaction.
#[derive(Debug, Clone)]
pub struct CreateCampaign {
    pub organization_id: DbId,
    pub customer_id: DbId,
    pub created_by: DbId,
    pub title: String,
    pub status: String,
    pub platforms: Vec<String>,
}

/// Query parameters for `GET /campaigns`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CampaignListQuery {
    pub customer_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// A campaign together with its designs.
#[derive(Debug, Clone, Serialize)]
pub struct CampaignWithDesigns {
    #[serde(flatten)]
    pub campaign: Campaign,
    pub designs: Vec<Design>,
}
