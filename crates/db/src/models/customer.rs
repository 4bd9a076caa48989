//! Customer entity model and DTOs.

use donut_core::payload::CustomerProfile;
use donut_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `customers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Customer {
    pub id: DbId,
    pub organization_id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub instagram_handle: Option<String>,
    pub twitter_handle: Option<String>,
    pub tiktok_handle: Option<String>,
    pub preferences: Vec<String>,
    pub brand_name: Option<String>,
    pub notes: Option<String>,
    pub campaign_ids: Vec<DbId>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Customer {
    /// The generation-facing view of this customer.
    ///
    /// Drops ids, tenant, notes, phone, timestamps and the campaign list.
    pub fn profile(&self) -> CustomerProfile {
        CustomerProfile {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            instagram_handle: self.instagram_handle.clone(),
            twitter_handle: self.twitter_handle.clone(),
            tiktok_handle: self.tiktok_handle.clone(),
            preferences: self.preferences.clone(),
            brand_name: self.brand_name.clone(),
        }
    }
}

/// DTO for creating a customer.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomer {
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub instagram_handle: Option<String>,
    pub twitter_handle: Option<String>,
    pub tiktok_handle: Option<String>,
    #[serde(default)]
    pub preferences: Vec<String>,
    pub brand_name: Option<String>,
    pub notes: Option<String>,
}

/// DTO for field-level customer edits. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomer {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub instagram_handle: Option<String>,
    pub twitter_handle: Option<String>,
    pub tiktok_handle: Option<String>,
    pub preferences: Option<Vec<String>>,
    pub brand_name: Option<String>,
    pub notes: Option<String>,
}

/// One row of a bulk import upload. Everything is optional so bad rows can
/// be reported instead of failing deserialization of the whole request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportCustomerRow {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub instagram_handle: Option<String>,
    pub twitter_handle: Option<String>,
    pub tiktok_handle: Option<String>,
    /// Comma or semicolon separated.
    pub preferences: Option<String>,
}

/// Per-row failure in an import.
#[derive(Debug, Clone, Serialize)]
pub struct ImportRowError {
    /// 1-based row number in the upload.
    pub row: usize,
    pub message: String,
}

/// Summary returned by a bulk import.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportSummary {
    pub added: usize,
    pub skipped: usize,
    pub errors: Vec<ImportRowError>,
}
