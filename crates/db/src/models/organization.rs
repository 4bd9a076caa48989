//! Organization (tenant) model and DTOs.

use donut_core::payload::BrandProfile;
use donut_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `organizations` table. Doubles as the brand record.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Organization {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub products: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Organization {
    pub fn brand_profile(&self) -> BrandProfile {
        BrandProfile {
            name: self.name.clone(),
            description: self.description.clone(),
            products: self.products.clone(),
        }
    }
}

/// DTO for `POST /organizations`.
#[derive(Debug, Deserialize)]
pub struct CreateOrganization {
    pub name: String,
    pub description: Option<String>,
    pub products: Option<Vec<String>>,
}

/// DTO for updating brand metadata. All fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdateBrand {
    pub name: Option<String>,
    pub description: Option<String>,
    pub products: Option<Vec<String>>,
}
