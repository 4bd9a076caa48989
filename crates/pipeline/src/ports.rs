//! Seams between the pipeline and the outside world.
//!
//! Production wiring uses [`crate::store::PgStore`] for both stores and
//! [`crate::adapters`] for the HTTP services; tests substitute in-memory
//! fakes.

use std::time::Duration;

use async_trait::async_trait;
use donut_canva::{AutofillJob, TokenResponse};
use donut_core::campaign::CampaignRequest;
use donut_core::payload::{BrandProfile, CustomerProfile, FieldValues};
use donut_core::platform::{ContentType, Platform};
use donut_core::status::{CampaignStatus, DesignStatus};
use donut_core::templates::TemplateOverrides;
use donut_core::types::DbId;
use donut_db::models::design::{CompleteDesign, PendingDesign};
use donut_db::models::user::{CanvaCredentials, StoreCanvaTokens};
use uuid::Uuid;

use crate::error::PipelineError;

// ---------------------------------------------------------------------------
// Records passed across the seams
// ---------------------------------------------------------------------------

/// A customer as seen by generation, with the owning organization's brand.
#[derive(Debug, Clone)]
pub struct CustomerRecord {
    pub id: DbId,
    pub organization_id: DbId,
    pub profile: CustomerProfile,
    pub brand: BrandProfile,
}

/// A design ready to be written alongside its campaign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDesign {
    pub platform: Platform,
    pub content_type: ContentType,
    pub title: String,
    /// `None` when job creation itself failed.
    pub job_id: Option<String>,
    pub status: DesignStatus,
    pub error_message: Option<String>,
}

/// Everything persisted for one successful customer generation.
#[derive(Debug, Clone)]
pub struct NewCampaign {
    pub organization_id: DbId,
    pub customer_id: DbId,
    pub created_by: DbId,
    /// Generation run completed by this write, if any.
    pub run_id: Option<DbId>,
    pub title: String,
    pub status: CampaignStatus,
    pub platforms: Vec<Platform>,
    pub designs: Vec<NewDesign>,
    pub activity_detail: String,
}

/// A generation run to create before scheduling.
#[derive(Debug, Clone)]
pub struct NewRun {
    pub organization_id: DbId,
    pub customer_id: DbId,
    pub requested_by: DbId,
    pub batch_id: Option<Uuid>,
    pub request: CampaignRequest,
}

/// Unit of work handed to the [`GenerationQueue`].
#[derive(Debug, Clone)]
pub struct ScheduledGeneration {
    pub run_id: DbId,
    pub user_id: DbId,
    pub customer_id: DbId,
    pub request: CampaignRequest,
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Cached design-API credentials per user.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// `None` when the user does not exist.
    async fn load_credentials(
        &self,
        user_id: DbId,
    ) -> Result<Option<CanvaCredentials>, PipelineError>;

    async fn save_credentials(
        &self,
        user_id: DbId,
        tokens: &StoreCanvaTokens,
    ) -> Result<(), PipelineError>;
}

/// Campaign, design and run persistence.
#[async_trait]
pub trait CampaignStore: Send + Sync {
    async fn load_customer(&self, customer_id: DbId)
        -> Result<Option<CustomerRecord>, PipelineError>;

    async fn load_template_overrides(
        &self,
        user_id: DbId,
        content_type: ContentType,
    ) -> Result<Option<TemplateOverrides>, PipelineError>;

    /// Write the campaign, its designs, the customer's campaign list, the
    /// activity entry and the run completion atomically.
    async fn persist_campaign(&self, campaign: &NewCampaign) -> Result<DbId, PipelineError>;

    async fn create_run(&self, run: &NewRun) -> Result<DbId, PipelineError>;

    /// `queued -> running`. Returns `false` if the run was not queued.
    async fn start_run(&self, run_id: DbId) -> Result<bool, PipelineError>;

    async fn fail_run(&self, run_id: DbId, message: &str) -> Result<(), PipelineError>;

    async fn record_activity(
        &self,
        organization_id: DbId,
        user_id: DbId,
        action_type: &str,
        detail: &str,
        metadata: serde_json::Value,
    ) -> Result<(), PipelineError>;

    async fn list_pending_designs(&self) -> Result<Vec<PendingDesign>, PipelineError>;

    /// Returns `false` if the design was already terminal.
    async fn complete_design(
        &self,
        design_id: DbId,
        result: &CompleteDesign,
    ) -> Result<bool, PipelineError>;

    /// Returns `false` if the design was already terminal.
    async fn fail_design(&self, design_id: DbId, message: &str) -> Result<bool, PipelineError>;

    /// Re-derive the campaign status from its designs.
    async fn refresh_campaign_status(
        &self,
        campaign_id: DbId,
    ) -> Result<CampaignStatus, PipelineError>;
}

/// The external design API.
#[async_trait]
pub trait DesignApi: Send + Sync {
    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenResponse, PipelineError>;

    async fn create_autofill(
        &self,
        access_token: &str,
        template_id: &str,
        title: &str,
        data: &FieldValues,
    ) -> Result<AutofillJob, PipelineError>;

    async fn get_autofill(
        &self,
        access_token: &str,
        job_id: &str,
    ) -> Result<AutofillJob, PipelineError>;
}

/// The generative text service. Returns the model's JSON object.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_json(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<serde_json::Value, PipelineError>;
}

/// Deferred execution of customer generations.
#[async_trait]
pub trait GenerationQueue: Send + Sync {
    async fn schedule(
        &self,
        job: ScheduledGeneration,
        delay: Duration,
    ) -> Result<(), PipelineError>;
}
