//! Campaign orchestration.
//!
//! Requests are validated and recorded as generation runs, then handed to a
//! [`GenerationQueue`]. When a run executes, one autofill job is created
//! per eligible platform and the campaign is persisted in a single write.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use donut_core::audit::action_types;
use donut_core::campaign::CampaignRequest;
use donut_core::error::CoreError;
use donut_core::naming::design_title;
use donut_core::payload::format_payload;
use donut_core::platform::{ContentType, Platform};
use donut_core::scheduling::{plan_batches, BULK_BATCH_SIZE, BULK_SCHEDULE_DELAY};
use donut_core::status::{CampaignStatus, DesignStatus};
use donut_core::templates::{self, TemplateOverrides};
use donut_core::types::DbId;
use donut_canva::JobOutcome;
use futures::future::join_all;
use serde::Serialize;
use uuid::Uuid;

use crate::content::ContentGenerator;
use crate::error::PipelineError;
use crate::ports::{
    CampaignStore, CustomerRecord, DesignApi, GenerationQueue, NewCampaign, NewDesign, NewRun,
    ScheduledGeneration,
};
use crate::token::TokenManager;

/// Result of a bulk scheduling request.
///
/// Counts reflect scheduling only; per-customer completion is tracked on
/// the generation runs sharing `batch_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkScheduleSummary {
    pub batch_id: Uuid,
    pub total_campaigns: usize,
    pub success_count: usize,
    pub failure_count: usize,
    pub batches: usize,
    pub run_ids: Vec<DbId>,
}

/// What a completed customer generation produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOutcome {
    pub campaign_id: DbId,
    pub status: CampaignStatus,
    pub designs: usize,
    pub failed_designs: usize,
}

pub struct CampaignOrchestrator {
    store: Arc<dyn CampaignStore>,
    tokens: Arc<TokenManager>,
    design_api: Arc<dyn DesignApi>,
    content: ContentGenerator,
    queue: Arc<dyn GenerationQueue>,
}

impl CampaignOrchestrator {
    pub fn new(
        store: Arc<dyn CampaignStore>,
        tokens: Arc<TokenManager>,
        design_api: Arc<dyn DesignApi>,
        content: ContentGenerator,
        queue: Arc<dyn GenerationQueue>,
    ) -> Self {
        Self {
            store,
            tokens,
            design_api,
            content,
            queue,
        }
    }

    // ---- scheduling ----

    /// Schedule generation for one customer and return the run id.
    ///
    /// Fails up front when the user has no design-API connection or the
    /// customer is not in `organization_id`. Generation itself happens
    /// later; its result is recorded on the run.
    pub async fn schedule_campaign(
        &self,
        user_id: DbId,
        organization_id: DbId,
        customer_id: DbId,
        request: CampaignRequest,
    ) -> Result<DbId, PipelineError> {
        self.tokens.ensure_connected(user_id).await?;
        self.schedule_one(
            user_id,
            organization_id,
            customer_id,
            &request,
            None,
            Duration::ZERO,
        )
        .await
    }

    /// Schedule generation for many customers.
    ///
    /// Customers are handled in batches of [`BULK_BATCH_SIZE`]. Within a
    /// batch every customer is scheduled concurrently with a
    /// [`BULK_SCHEDULE_DELAY`] offset; the next batch starts once every
    /// schedule call of the previous one has returned.
    pub async fn schedule_bulk(
        &self,
        user_id: DbId,
        organization_id: DbId,
        customer_ids: &[DbId],
        request: CampaignRequest,
    ) -> Result<BulkScheduleSummary, PipelineError> {
        if customer_ids.is_empty() {
            return Err(CoreError::Validation("At least one customer is required".into()).into());
        }
        self.tokens.ensure_connected(user_id).await?;

        let batch_id = Uuid::now_v7();
        let batches = plan_batches(customer_ids, BULK_BATCH_SIZE);
        let mut run_ids = Vec::with_capacity(customer_ids.len());
        let mut failure_count = 0;

        for (index, batch) in batches.iter().enumerate() {
            let results = join_all(batch.iter().map(|&customer_id| {
                self.schedule_one(
                    user_id,
                    organization_id,
                    customer_id,
                    &request,
                    Some(batch_id),
                    BULK_SCHEDULE_DELAY,
                )
            }))
            .await;

            for (customer_id, result) in batch.iter().zip(results) {
                match result {
                    Ok(run_id) => run_ids.push(run_id),
                    Err(e) => {
                        failure_count += 1;
                        tracing::warn!(
                            customer_id,
                            batch = index,
                            error = %e,
                            "Failed to schedule campaign generation",
                        );
                    }
                }
            }
        }

        let summary = BulkScheduleSummary {
            batch_id,
            total_campaigns: customer_ids.len(),
            success_count: run_ids.len(),
            failure_count,
            batches: batches.len(),
            run_ids,
        };

        let metadata = serde_json::json!({
            "batchId": summary.batch_id,
            "title": request.title,
            "totalCampaigns": summary.total_campaigns,
            "successCount": summary.success_count,
            "failureCount": summary.failure_count,
        });
        let detail = format!(
            "Scheduled '{}' for {} customers ({} scheduled, {} failed)",
            request.title, summary.total_campaigns, summary.success_count, summary.failure_count
        );
        // Every run is queued by now, so a logging failure only gets reported.
        if let Err(e) = self
            .store
            .record_activity(
                organization_id,
                user_id,
                action_types::CAMPAIGN_BULK_CREATE,
                &detail,
                metadata,
            )
            .await
        {
            tracing::error!(
                batch_id = %summary.batch_id,
                error = %e,
                "Failed to record bulk generation activity",
            );
        }

        tracing::info!(
            batch_id = %summary.batch_id,
            total = summary.total_campaigns,
            scheduled = summary.success_count,
            failed = summary.failure_count,
            "Bulk campaign generation scheduled",
        );
        Ok(summary)
    }

    async fn schedule_one(
        &self,
        user_id: DbId,
        organization_id: DbId,
        customer_id: DbId,
        request: &CampaignRequest,
        batch_id: Option<Uuid>,
        delay: Duration,
    ) -> Result<DbId, PipelineError> {
        let customer = self.load_customer(customer_id).await?;
        if customer.organization_id != organization_id {
            return Err(CoreError::NotFound {
                entity: "customer",
                id: customer_id,
            }
            .into());
        }

        let run_id = self
            .store
            .create_run(&NewRun {
                organization_id,
                customer_id,
                requested_by: user_id,
                batch_id,
                request: request.clone(),
            })
            .await?;

        let job = ScheduledGeneration {
            run_id,
            user_id,
            customer_id,
            request: request.clone(),
        };
        if let Err(e) = self.queue.schedule(job, delay).await {
            self.store.fail_run(run_id, &e.to_string()).await?;
            return Err(e);
        }

        tracing::debug!(run_id, customer_id, delay_secs = delay.as_secs(), "Generation scheduled");
        Ok(run_id)
    }

    // ---- execution ----

    /// Execute a scheduled generation and record the outcome on its run.
    pub async fn run_scheduled(&self, job: &ScheduledGeneration) {
        match self.store.start_run(job.run_id).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!(run_id = job.run_id, "Generation run is not queued, skipping");
                return;
            }
            Err(e) => {
                tracing::error!(run_id = job.run_id, error = %e, "Failed to start generation run");
                return;
            }
        }

        match self
            .generate_for_customer(job.user_id, job.customer_id, &job.request, Some(job.run_id))
            .await
        {
            Ok(outcome) => {
                tracing::info!(
                    run_id = job.run_id,
                    campaign_id = outcome.campaign_id,
                    designs = outcome.designs,
                    failed_designs = outcome.failed_designs,
                    "Campaign generated",
                );
            }
            Err(e) => {
                tracing::error!(
                    run_id = job.run_id,
                    customer_id = job.customer_id,
                    error = %e,
                    "Campaign generation failed",
                );
                if let Err(store_err) = self.store.fail_run(job.run_id, &e.to_string()).await {
                    tracing::error!(
                        run_id = job.run_id,
                        error = %store_err,
                        "Failed to record generation failure",
                    );
                }
            }
        }
    }

    /// Generate and persist one customer's campaign.
    ///
    /// Platforms are attempted independently. Nothing is written unless at
    /// least one autofill job was created; failed platforms are persisted
    /// as failed designs next to the successful ones.
    pub async fn generate_for_customer(
        &self,
        user_id: DbId,
        customer_id: DbId,
        request: &CampaignRequest,
        run_id: Option<DbId>,
    ) -> Result<GenerationOutcome, PipelineError> {
        let token = self.tokens.get_token(user_id).await?;
        let customer = self.load_customer(customer_id).await?;

        let assignments = request.assignments(&customer.profile);
        let overrides = self.load_overrides(user_id, &assignments).await?;

        let mut designs = Vec::with_capacity(assignments.len());
        for &(platform, content_type) in &assignments {
            let title = design_title(
                platform,
                &customer.profile.first_name,
                &customer.profile.last_name,
                &request.title,
            );
            let template_id =
                templates::resolve(content_type, platform, overrides.get(&content_type));

            let design = match self
                .create_design_job(&token, &customer, platform, content_type, &template_id, &title)
                .await
            {
                Ok(job) if job.id.trim().is_empty() => {
                    tracing::warn!(customer_id, %platform, "Autofill job created without an id");
                    failed_design(
                        platform,
                        content_type,
                        title,
                        None,
                        "Canva did not return an autofill job id".to_string(),
                    )
                }
                Ok(job) => {
                    tracing::debug!(customer_id, %platform, job_id = %job.id, "Autofill job created");
                    match job.outcome() {
                        JobOutcome::Failed { message } => {
                            failed_design(platform, content_type, title, Some(job.id), message)
                        }
                        _ => NewDesign {
                            platform,
                            content_type,
                            title,
                            job_id: Some(job.id),
                            status: DesignStatus::InProgress,
                            error_message: None,
                        },
                    }
                }
                Err(e) => {
                    tracing::warn!(customer_id, %platform, error = %e, "Design creation failed");
                    failed_design(platform, content_type, title, None, e.to_string())
                }
            };
            designs.push(design);
        }

        let statuses: Vec<DesignStatus> = designs.iter().map(|d| d.status).collect();
        let failed_designs = statuses
            .iter()
            .filter(|s| **s == DesignStatus::Failed)
            .count();
        if failed_designs == designs.len() {
            let reasons: Vec<String> = designs
                .iter()
                .map(|d| {
                    format!(
                        "{}: {}",
                        d.platform,
                        d.error_message.as_deref().unwrap_or("unknown error")
                    )
                })
                .collect();
            return Err(PipelineError::AllPlatformsFailed(reasons.join("; ")));
        }

        let status = CampaignStatus::aggregate(&statuses);
        let platforms: Vec<Platform> = designs.iter().map(|d| d.platform).collect();
        let activity_detail = format!(
            "Created campaign '{}' for {} {} ({} designs)",
            request.title,
            customer.profile.first_name,
            customer.profile.last_name,
            designs.len()
        );
        let design_count = designs.len();

        let campaign_id = self
            .store
            .persist_campaign(&NewCampaign {
                organization_id: customer.organization_id,
                customer_id,
                created_by: user_id,
                run_id,
                title: request.title.clone(),
                status,
                platforms,
                designs,
                activity_detail,
            })
            .await?;

        Ok(GenerationOutcome {
            campaign_id,
            status,
            designs: design_count,
            failed_designs,
        })
    }

    async fn create_design_job(
        &self,
        token: &str,
        customer: &CustomerRecord,
        platform: Platform,
        content_type: ContentType,
        template_id: &str,
        title: &str,
    ) -> Result<donut_canva::AutofillJob, PipelineError> {
        let content = self
            .content
            .generate(content_type, &customer.profile, &customer.brand)
            .await?;
        let fields = format_payload(
            content_type,
            platform,
            &customer.profile,
            &customer.brand,
            &content,
        )?;
        self.design_api
            .create_autofill(token, template_id, title, &fields)
            .await
    }

    async fn load_customer(&self, customer_id: DbId) -> Result<CustomerRecord, PipelineError> {
        self.store
            .load_customer(customer_id)
            .await?
            .ok_or(PipelineError::Core(CoreError::NotFound {
                entity: "customer",
                id: customer_id,
            }))
    }

    /// Template settings for every content type in use, read once.
    async fn load_overrides(
        &self,
        user_id: DbId,
        assignments: &[(Platform, ContentType)],
    ) -> Result<HashMap<ContentType, TemplateOverrides>, PipelineError> {
        let mut overrides = HashMap::new();
        let mut content_types: Vec<ContentType> = assignments.iter().map(|&(_, ct)| ct).collect();
        content_types.sort_by_key(|ct| ct.as_str());
        content_types.dedup();

        for content_type in content_types {
            if let Some(settings) = self
                .store
                .load_template_overrides(user_id, content_type)
                .await?
            {
                overrides.insert(content_type, settings);
            }
        }
        Ok(overrides)
    }
}

fn failed_design(
    platform: Platform,
    content_type: ContentType,
    title: String,
    job_id: Option<String>,
    message: String,
) -> NewDesign {
    NewDesign {
        platform,
        content_type,
        title,
        job_id,
        status: DesignStatus::Failed,
        error_message: Some(message),
    }
}
