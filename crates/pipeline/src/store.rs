//! Postgres-backed [`CampaignStore`] and [`CredentialStore`].

use async_trait::async_trait;
use donut_core::audit::action_types;
use donut_core::error::CoreError;
use donut_core::platform::ContentType;
use donut_core::status::{CampaignStatus, DesignStatus};
use donut_core::templates::TemplateOverrides;
use donut_core::types::DbId;
use donut_db::models::activity::CreateActivity;
use donut_db::models::campaign::CreateCampaign;
use donut_db::models::design::{CompleteDesign, CreateDesign, PendingDesign};
use donut_db::models::generation_run::CreateGenerationRun;
use donut_db::models::user::{CanvaCredentials, StoreCanvaTokens};
use donut_db::repositories::{
    ActivityRepo, CampaignRepo, CustomerRepo, DesignRepo, GenerationRunRepo, OrganizationRepo,
    TemplateSettingsRepo, UserRepo,
};
use donut_db::DbPool;

use crate::error::PipelineError;
use crate::ports::{CampaignStore, CredentialStore, CustomerRecord, NewCampaign, NewRun};

#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgStore {
    async fn load_credentials(
        &self,
        user_id: DbId,
    ) -> Result<Option<CanvaCredentials>, PipelineError> {
        Ok(UserRepo::get_canva_credentials(&self.pool, user_id).await?)
    }

    async fn save_credentials(
        &self,
        user_id: DbId,
        tokens: &StoreCanvaTokens,
    ) -> Result<(), PipelineError> {
        if !UserRepo::store_canva_tokens(&self.pool, user_id, tokens).await? {
            return Err(CoreError::NotFound {
                entity: "user",
                id: user_id,
            }
            .into());
        }
        Ok(())
    }
}

#[async_trait]
impl CampaignStore for PgStore {
    async fn load_customer(
        &self,
        customer_id: DbId,
    ) -> Result<Option<CustomerRecord>, PipelineError> {
        let Some(customer) = CustomerRepo::find_by_id_unscoped(&self.pool, customer_id).await?
        else {
            return Ok(None);
        };
        let organization = OrganizationRepo::find_by_id(&self.pool, customer.organization_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "organization",
                id: customer.organization_id,
            })?;

        Ok(Some(CustomerRecord {
            id: customer.id,
            organization_id: customer.organization_id,
            profile: customer.profile(),
            brand: organization.brand_profile(),
        }))
    }

    async fn load_template_overrides(
        &self,
        user_id: DbId,
        content_type: ContentType,
    ) -> Result<Option<TemplateOverrides>, PipelineError> {
        let settings =
            TemplateSettingsRepo::find(&self.pool, user_id, content_type.as_str()).await?;
        Ok(settings.map(|s| s.overrides()))
    }

    async fn persist_campaign(&self, campaign: &NewCampaign) -> Result<DbId, PipelineError> {
        let mut tx = self.pool.begin().await?;

        let row = CampaignRepo::create(
            &mut *tx,
            &CreateCampaign {
                organization_id: campaign.organization_id,
                customer_id: campaign.customer_id,
                created_by: campaign.created_by,
                title: campaign.title.clone(),
                status: campaign.status.as_str().to_string(),
                platforms: campaign
                    .platforms
                    .iter()
                    .map(|p| p.as_str().to_string())
                    .collect(),
            },
        )
        .await?;

        for design in &campaign.designs {
            DesignRepo::create(
                &mut *tx,
                &CreateDesign {
                    campaign_id: row.id,
                    organization_id: campaign.organization_id,
                    created_by: campaign.created_by,
                    platform: design.platform.as_str().to_string(),
                    content_type: design.content_type.as_str().to_string(),
                    title: design.title.clone(),
                    canva_job_id: design.job_id.clone(),
                    status: design.status.as_str().to_string(),
                    error_message: design.error_message.clone(),
                },
            )
            .await?;
        }

        CustomerRepo::append_campaign(&mut *tx, campaign.customer_id, row.id).await?;

        let activity = CreateActivity::new(
            campaign.organization_id,
            Some(campaign.created_by),
            action_types::CAMPAIGN_CREATE,
            campaign.activity_detail.clone(),
        )
        .with_entity(row.id)
        .with_metadata(serde_json::json!({
            "customerId": campaign.customer_id,
            "platforms": campaign.platforms,
            "status": campaign.status,
        }));
        ActivityRepo::create(&mut *tx, &activity).await?;

        if let Some(run_id) = campaign.run_id {
            GenerationRunRepo::mark_completed(&mut *tx, run_id, row.id).await?;
        }

        tx.commit().await?;
        tracing::info!(
            campaign_id = row.id,
            customer_id = campaign.customer_id,
            designs = campaign.designs.len(),
            "Campaign persisted",
        );
        Ok(row.id)
    }

    async fn create_run(&self, run: &NewRun) -> Result<DbId, PipelineError> {
        let row = GenerationRunRepo::create(
            &self.pool,
            &CreateGenerationRun {
                organization_id: run.organization_id,
                customer_id: run.customer_id,
                requested_by: run.requested_by,
                batch_id: run.batch_id,
                title: run.request.title.clone(),
                content_types: run
                    .request
                    .content_types
                    .iter()
                    .map(|ct| ct.as_str().to_string())
                    .collect(),
                platforms: run
                    .request
                    .platforms
                    .iter()
                    .map(|p| p.as_str().to_string())
                    .collect(),
                scheduled_for: chrono::Utc::now(),
            },
        )
        .await?;
        Ok(row.id)
    }

    async fn start_run(&self, run_id: DbId) -> Result<bool, PipelineError> {
        Ok(GenerationRunRepo::mark_running(&self.pool, run_id).await?)
    }

    async fn fail_run(&self, run_id: DbId, message: &str) -> Result<(), PipelineError> {
        GenerationRunRepo::mark_failed(&self.pool, run_id, message).await?;
        Ok(())
    }

    async fn record_activity(
        &self,
        organization_id: DbId,
        user_id: DbId,
        action_type: &str,
        detail: &str,
        metadata: serde_json::Value,
    ) -> Result<(), PipelineError> {
        let activity = CreateActivity::new(organization_id, Some(user_id), action_type, detail)
            .with_metadata(metadata);
        ActivityRepo::create(&self.pool, &activity).await?;
        Ok(())
    }

    async fn list_pending_designs(&self) -> Result<Vec<PendingDesign>, PipelineError> {
        Ok(DesignRepo::list_in_progress(&self.pool).await?)
    }

    async fn complete_design(
        &self,
        design_id: DbId,
        result: &CompleteDesign,
    ) -> Result<bool, PipelineError> {
        Ok(DesignRepo::mark_completed(&self.pool, design_id, result).await?)
    }

    async fn fail_design(&self, design_id: DbId, message: &str) -> Result<bool, PipelineError> {
        Ok(DesignRepo::mark_failed(&self.pool, design_id, message).await?)
    }

    async fn refresh_campaign_status(
        &self,
        campaign_id: DbId,
    ) -> Result<CampaignStatus, PipelineError> {
        let statuses = DesignRepo::statuses_for_campaign(&self.pool, campaign_id)
            .await?
            .iter()
            .map(|s| s.parse::<DesignStatus>())
            .collect::<Result<Vec<_>, _>>()?;
        let status = CampaignStatus::aggregate(&statuses);
        CampaignRepo::update_status(&self.pool, campaign_id, status.as_str()).await?;
        Ok(status)
    }
}
