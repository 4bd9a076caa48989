//! Sweeps in-progress designs and records the result of their autofill jobs.
//!
//! Each job is checked independently: a failure is logged and the sweep
//! moves on. Design updates only apply to rows still `in_progress`, and the
//! owning campaign's status is re-derived after any change.

use std::collections::BTreeSet;
use std::sync::Arc;

use donut_canva::types::view_url_from_edit;
use donut_canva::JobOutcome;
use donut_core::types::DbId;
use donut_db::models::design::{CompleteDesign, PendingDesign};

use crate::error::PipelineError;
use crate::ports::{CampaignStore, DesignApi};
use crate::token::TokenManager;

/// Counters for one sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollSummary {
    pub checked: usize,
    pub completed: usize,
    pub failed: usize,
    pub pending: usize,
    pub errors: usize,
}

/// What happened to one design during a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DesignUpdate {
    Completed,
    Failed,
    Pending,
    /// The row became terminal before our update landed.
    AlreadyTerminal,
}

pub struct JobPoller {
    store: Arc<dyn CampaignStore>,
    tokens: Arc<TokenManager>,
    design_api: Arc<dyn DesignApi>,
}

impl JobPoller {
    pub fn new(
        store: Arc<dyn CampaignStore>,
        tokens: Arc<TokenManager>,
        design_api: Arc<dyn DesignApi>,
    ) -> Self {
        Self {
            store,
            tokens,
            design_api,
        }
    }

    /// Check every in-progress design once.
    ///
    /// Only a failure to list pending designs is returned as an error.
    pub async fn poll_once(&self) -> Result<PollSummary, PipelineError> {
        let pending = self.store.list_pending_designs().await?;
        let mut summary = PollSummary::default();
        let mut touched_campaigns = BTreeSet::new();

        for design in &pending {
            summary.checked += 1;
            match self.check_design(design).await {
                Ok(DesignUpdate::Completed) => {
                    summary.completed += 1;
                    touched_campaigns.insert(design.campaign_id);
                }
                Ok(DesignUpdate::Failed) => {
                    summary.failed += 1;
                    touched_campaigns.insert(design.campaign_id);
                }
                Ok(DesignUpdate::Pending) => summary.pending += 1,
                Ok(DesignUpdate::AlreadyTerminal) => {
                    tracing::debug!(design_id = design.id, "Design already terminal, skipped");
                }
                Err(e) => {
                    summary.errors += 1;
                    tracing::warn!(
                        design_id = design.id,
                        job_id = %design.canva_job_id,
                        user_id = design.created_by,
                        error = %e,
                        "Failed to check autofill job",
                    );
                }
            }
        }

        for campaign_id in touched_campaigns {
            self.refresh_campaign(campaign_id).await;
        }

        Ok(summary)
    }

    async fn check_design(&self, design: &PendingDesign) -> Result<DesignUpdate, PipelineError> {
        let token = self.tokens.get_token(design.created_by).await?;
        let job = self
            .design_api
            .get_autofill(&token, &design.canva_job_id)
            .await?;

        let applied = match job.outcome() {
            JobOutcome::Pending => return Ok(DesignUpdate::Pending),
            JobOutcome::Succeeded {
                design_id,
                edit_url,
                thumbnail_url,
            } => {
                let result = CompleteDesign {
                    canva_design_id: design_id,
                    view_url: view_url_from_edit(&edit_url),
                    edit_url,
                    thumbnail_url,
                };
                self.store
                    .complete_design(design.id, &result)
                    .await?
                    .then_some(DesignUpdate::Completed)
            }
            JobOutcome::Failed { message } => {
                tracing::info!(design_id = design.id, reason = %message, "Autofill job failed");
                self.store
                    .fail_design(design.id, &message)
                    .await?
                    .then_some(DesignUpdate::Failed)
            }
        };

        Ok(applied.unwrap_or(DesignUpdate::AlreadyTerminal))
    }

    async fn refresh_campaign(&self, campaign_id: DbId) {
        match self.store.refresh_campaign_status(campaign_id).await {
            Ok(status) => {
                tracing::debug!(campaign_id, %status, "Campaign status refreshed");
            }
            Err(e) => {
                tracing::error!(campaign_id, error = %e, "Failed to refresh campaign status");
            }
        }
    }
}
