//! In-memory fakes for every pipeline seam.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use donut_canva::{AutofillJob, CanvaApiError, TokenResponse};
use donut_core::payload::{BrandProfile, CustomerProfile, FieldValues};
use donut_core::platform::ContentType;
use donut_core::status::{CampaignStatus, DesignStatus, GenerationRunStatus};
use donut_core::templates::TemplateOverrides;
use donut_core::types::DbId;
use donut_db::models::design::{CompleteDesign, PendingDesign};
use donut_db::models::user::{CanvaCredentials, StoreCanvaTokens};
use donut_pipeline::content::ContentGenerator;
use donut_pipeline::orchestrator::CampaignOrchestrator;
use donut_pipeline::poller::JobPoller;
use donut_pipeline::ports::{
    CampaignStore, CredentialStore, CustomerRecord, DesignApi, GenerationQueue, NewCampaign,
    NewRun, ScheduledGeneration, TextGenerator,
};
use donut_pipeline::token::TokenManager;
use donut_pipeline::PipelineError;

pub const ORG_ID: DbId = 1;
pub const USER_ID: DbId = 7;

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct StoredDesign {
    pub id: DbId,
    pub campaign_id: DbId,
    pub created_by: DbId,
    pub job_id: Option<String>,
    pub status: DesignStatus,
    pub completion: Option<CompleteDesign>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StoredRun {
    pub run: NewRun,
    pub status: GenerationRunStatus,
    pub campaign_id: Option<DbId>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StoredActivity {
    pub action_type: String,
    pub detail: String,
    pub metadata: serde_json::Value,
}

#[derive(Default)]
pub struct State {
    pub credentials: HashMap<DbId, CanvaCredentials>,
    pub credential_saves: usize,
    pub customers: HashMap<DbId, CustomerRecord>,
    pub overrides: HashMap<(DbId, ContentType), TemplateOverrides>,
    pub campaigns: HashMap<DbId, NewCampaign>,
    pub campaign_status: HashMap<DbId, CampaignStatus>,
    pub designs: Vec<StoredDesign>,
    pub runs: HashMap<DbId, StoredRun>,
    pub activities: Vec<StoredActivity>,
    pub activity_fails: bool,
    next_id: DbId,
}

impl State {
    fn next_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    pub state: Mutex<State>,
}

impl InMemoryStore {
    pub fn with<R>(&self, f: impl FnOnce(&mut State) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }

    pub fn connect_user(&self, user_id: DbId, expires_in_mins: Option<i64>) {
        self.with(|s| {
            s.credentials.insert(
                user_id,
                CanvaCredentials {
                    access_token: Some("cached-token".into()),
                    refresh_token: Some("refresh-token".into()),
                    expires_at: expires_in_mins.map(|m| Utc::now() + chrono::Duration::minutes(m)),
                    refreshed_at: None,
                },
            );
        });
    }

    pub fn add_user_without_tokens(&self, user_id: DbId) {
        self.with(|s| {
            s.credentials.insert(user_id, CanvaCredentials::default());
        });
    }

    pub fn add_customer(&self, id: DbId, profile: CustomerProfile) {
        self.add_customer_in_org(id, ORG_ID, profile);
    }

    pub fn add_customer_in_org(&self, id: DbId, organization_id: DbId, profile: CustomerProfile) {
        self.with(|s| {
            s.customers.insert(
                id,
                CustomerRecord {
                    id,
                    organization_id,
                    profile,
                    brand: BrandProfile {
                        name: "Lard Lad".into(),
                        description: "Colossal donuts".into(),
                        products: vec!["Glazed".into()],
                    },
                },
            );
        });
    }

    /// Add an in-progress design under a fresh campaign.
    pub fn add_pending_design(&self, job_id: &str) -> (DbId, DbId) {
        self.with(|s| {
            let campaign_id = s.next_id();
            let design_id = s.next_id();
            s.campaign_status
                .insert(campaign_id, CampaignStatus::InProgress);
            s.designs.push(StoredDesign {
                id: design_id,
                campaign_id,
                created_by: USER_ID,
                job_id: Some(job_id.into()),
                status: DesignStatus::InProgress,
                completion: None,
                error_message: None,
            });
            (campaign_id, design_id)
        })
    }

    pub fn design(&self, id: DbId) -> StoredDesign {
        self.with(|s| s.designs.iter().find(|d| d.id == id).cloned().unwrap())
    }

    pub fn designs_for(&self, campaign_id: DbId) -> Vec<StoredDesign> {
        self.with(|s| {
            s.designs
                .iter()
                .filter(|d| d.campaign_id == campaign_id)
                .cloned()
                .collect()
        })
    }

    pub fn campaign_count(&self) -> usize {
        self.with(|s| s.campaigns.len())
    }

    pub fn run(&self, id: DbId) -> StoredRun {
        self.with(|s| s.runs[&id].clone())
    }
}

#[async_trait]
impl CredentialStore for InMemoryStore {
    async fn load_credentials(
        &self,
        user_id: DbId,
    ) -> Result<Option<CanvaCredentials>, PipelineError> {
        Ok(self.with(|s| s.credentials.get(&user_id).cloned()))
    }

    async fn save_credentials(
        &self,
        user_id: DbId,
        tokens: &StoreCanvaTokens,
    ) -> Result<(), PipelineError> {
        self.with(|s| {
            s.credential_saves += 1;
            s.credentials.insert(
                user_id,
                CanvaCredentials {
                    access_token: Some(tokens.access_token.clone()),
                    refresh_token: Some(tokens.refresh_token.clone()),
                    expires_at: Some(tokens.expires_at),
                    refreshed_at: Some(tokens.refreshed_at),
                },
            );
        });
        Ok(())
    }
}

#[async_trait]
impl CampaignStore for InMemoryStore {
    async fn load_customer(
        &self,
        customer_id: DbId,
    ) -> Result<Option<CustomerRecord>, PipelineError> {
        Ok(self.with(|s| s.customers.get(&customer_id).cloned()))
    }

    async fn load_template_overrides(
        &self,
        user_id: DbId,
        content_type: ContentType,
    ) -> Result<Option<TemplateOverrides>, PipelineError> {
        Ok(self.with(|s| s.overrides.get(&(user_id, content_type)).cloned()))
    }

    async fn persist_campaign(&self, campaign: &NewCampaign) -> Result<DbId, PipelineError> {
        Ok(self.with(|s| {
            let campaign_id = s.next_id();
            for design in &campaign.designs {
                let id = s.next_id();
                s.designs.push(StoredDesign {
                    id,
                    campaign_id,
                    created_by: campaign.created_by,
                    job_id: design.job_id.clone(),
                    status: design.status,
                    completion: None,
                    error_message: design.error_message.clone(),
                });
            }
            s.campaign_status.insert(campaign_id, campaign.status);
            s.campaigns.insert(campaign_id, campaign.clone());
            s.activities.push(StoredActivity {
                action_type: "campaign_create".into(),
                detail: campaign.activity_detail.clone(),
                metadata: serde_json::Value::Null,
            });
            if let Some(run) = campaign.run_id.and_then(|id| s.runs.get_mut(&id)) {
                run.status = GenerationRunStatus::Completed;
                run.campaign_id = Some(campaign_id);
            }
            campaign_id
        }))
    }

    async fn create_run(&self, run: &NewRun) -> Result<DbId, PipelineError> {
        Ok(self.with(|s| {
            let id = s.next_id();
            s.runs.insert(
                id,
                StoredRun {
                    run: run.clone(),
                    status: GenerationRunStatus::Queued,
                    campaign_id: None,
                    error_message: None,
                },
            );
            id
        }))
    }

    async fn start_run(&self, run_id: DbId) -> Result<bool, PipelineError> {
        Ok(self.with(|s| match s.runs.get_mut(&run_id) {
            Some(run) if run.status == GenerationRunStatus::Queued => {
                run.status = GenerationRunStatus::Running;
                true
            }
            _ => false,
        }))
    }

    async fn fail_run(&self, run_id: DbId, message: &str) -> Result<(), PipelineError> {
        self.with(|s| {
            if let Some(run) = s.runs.get_mut(&run_id) {
                if !run.status.is_terminal() {
                    run.status = GenerationRunStatus::Failed;
                    run.error_message = Some(message.to_string());
                }
            }
        });
        Ok(())
    }

    async fn record_activity(
        &self,
        _organization_id: DbId,
        _user_id: DbId,
        action_type: &str,
        detail: &str,
        metadata: serde_json::Value,
    ) -> Result<(), PipelineError> {
        if self.with(|s| s.activity_fails) {
            return Err(PipelineError::Database(sqlx::Error::PoolTimedOut));
        }
        self.with(|s| {
            s.activities.push(StoredActivity {
                action_type: action_type.to_string(),
                detail: detail.to_string(),
                metadata,
            })
        });
        Ok(())
    }

    async fn list_pending_designs(&self) -> Result<Vec<PendingDesign>, PipelineError> {
        Ok(self.with(|s| {
            s.designs
                .iter()
                .filter(|d| d.status == DesignStatus::InProgress)
                .filter_map(|d| {
                    Some(PendingDesign {
                        id: d.id,
                        campaign_id: d.campaign_id,
                        created_by: d.created_by,
                        canva_job_id: d.job_id.clone()?,
                    })
                })
                .collect()
        }))
    }

    async fn complete_design(
        &self,
        design_id: DbId,
        result: &CompleteDesign,
    ) -> Result<bool, PipelineError> {
        Ok(self.with(|s| {
            match s
                .designs
                .iter_mut()
                .find(|d| d.id == design_id && d.status == DesignStatus::InProgress)
            {
                Some(d) => {
                    d.status = DesignStatus::Completed;
                    d.completion = Some(result.clone());
                    true
                }
                None => false,
            }
        }))
    }

    async fn fail_design(&self, design_id: DbId, message: &str) -> Result<bool, PipelineError> {
        Ok(self.with(|s| {
            match s
                .designs
                .iter_mut()
                .find(|d| d.id == design_id && d.status == DesignStatus::InProgress)
            {
                Some(d) => {
                    d.status = DesignStatus::Failed;
                    d.error_message = Some(message.to_string());
                    true
                }
                None => false,
            }
        }))
    }

    async fn refresh_campaign_status(
        &self,
        campaign_id: DbId,
    ) -> Result<CampaignStatus, PipelineError> {
        Ok(self.with(|s| {
            let statuses: Vec<DesignStatus> = s
                .designs
                .iter()
                .filter(|d| d.campaign_id == campaign_id)
                .map(|d| d.status)
                .collect();
            let status = CampaignStatus::aggregate(&statuses);
            s.campaign_status.insert(campaign_id, status);
            status
        }))
    }
}

// ---------------------------------------------------------------------------
// Design API
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct CreatedJob {
    pub template_id: String,
    pub title: String,
    pub data: FieldValues,
}

pub struct FakeDesignApi {
    pub refresh_calls: AtomicUsize,
    pub refresh_delay: Duration,
    pub refresh_fails: bool,
    pub expires_in: i64,
    pub failing_templates: Mutex<HashSet<String>>,
    pub unidentified_templates: Mutex<HashSet<String>>,
    pub created: Mutex<Vec<CreatedJob>>,
    pub jobs: Mutex<HashMap<String, serde_json::Value>>,
    pub broken_jobs: Mutex<HashSet<String>>,
}

impl Default for FakeDesignApi {
    fn default() -> Self {
        Self {
            refresh_calls: AtomicUsize::new(0),
            refresh_delay: Duration::ZERO,
            refresh_fails: false,
            expires_in: 14_400,
            failing_templates: Mutex::new(HashSet::new()),
            unidentified_templates: Mutex::new(HashSet::new()),
            created: Mutex::new(Vec::new()),
            jobs: Mutex::new(HashMap::new()),
            broken_jobs: Mutex::new(HashSet::new()),
        }
    }
}

impl FakeDesignApi {
    pub fn refresh_count(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn fail_template(&self, template_id: &str) {
        self.failing_templates
            .lock()
            .unwrap()
            .insert(template_id.to_string());
    }

    /// Make `create_autofill` answer without a job id for `template_id`.
    pub fn omit_job_id(&self, template_id: &str) {
        self.unidentified_templates
            .lock()
            .unwrap()
            .insert(template_id.to_string());
    }

    /// Set the job body returned by `get_autofill` for `job_id`.
    pub fn set_job(&self, job_id: &str, job: serde_json::Value) {
        self.jobs.lock().unwrap().insert(job_id.to_string(), job);
    }

    /// Make `get_autofill` return a 500 for `job_id`.
    pub fn break_job(&self, job_id: &str) {
        self.broken_jobs.lock().unwrap().insert(job_id.to_string());
    }

    pub fn created_jobs(&self) -> Vec<CreatedJob> {
        self.created.lock().unwrap().clone()
    }
}

fn api_error(status: u16, body: &str) -> PipelineError {
    PipelineError::Canva(CanvaApiError::ApiError {
        status,
        body: body.to_string(),
    })
}

#[async_trait]
impl DesignApi for FakeDesignApi {
    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenResponse, PipelineError> {
        let call = self.refresh_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.refresh_delay.is_zero() {
            tokio::time::sleep(self.refresh_delay).await;
        }
        if self.refresh_fails {
            return Err(api_error(400, "invalid_grant"));
        }
        Ok(TokenResponse {
            access_token: format!("fresh-token-{call}"),
            refresh_token: format!("{refresh_token}-next"),
            expires_in: self.expires_in,
            token_type: Some("Bearer".into()),
            scope: None,
        })
    }

    async fn create_autofill(
        &self,
        _access_token: &str,
        template_id: &str,
        title: &str,
        data: &FieldValues,
    ) -> Result<AutofillJob, PipelineError> {
        if self.failing_templates.lock().unwrap().contains(template_id) {
            return Err(api_error(400, "brand template not found"));
        }
        let mut created = self.created.lock().unwrap();
        created.push(CreatedJob {
            template_id: template_id.to_string(),
            title: title.to_string(),
            data: data.clone(),
        });
        if self.unidentified_templates.lock().unwrap().contains(template_id) {
            return Ok(job_from(serde_json::json!({ "status": "in_progress" })));
        }
        Ok(job_from(serde_json::json!({
            "id": format!("job-{}", created.len()),
            "status": "in_progress"
        })))
    }

    async fn get_autofill(
        &self,
        _access_token: &str,
        job_id: &str,
    ) -> Result<AutofillJob, PipelineError> {
        if self.broken_jobs.lock().unwrap().contains(job_id) {
            return Err(api_error(500, "upstream unavailable"));
        }
        let body = self
            .jobs
            .lock()
            .unwrap()
            .get(job_id)
            .cloned()
            .unwrap_or_else(|| serde_json::json!({ "id": job_id, "status": "in_progress" }));
        Ok(job_from(body))
    }
}

pub fn job_from(value: serde_json::Value) -> AutofillJob {
    serde_json::from_value(value).unwrap()
}

pub fn successful_job(design_id: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "ignored",
        "status": "success",
        "result": {
            "design": {
                "id": design_id,
                "url": format!("https://www.canva.com/design/{design_id}/edit"),
                "thumbnail": { "url": format!("https://thumbs.test/{design_id}.png") }
            }
        }
    })
}

// ---------------------------------------------------------------------------
// Text generator and queue
// ---------------------------------------------------------------------------

/// Returns one object carrying both quiz and myth fields.
#[derive(Default)]
pub struct FakeText {
    pub calls: AtomicUsize,
}

#[async_trait]
impl TextGenerator for FakeText {
    async fn generate_json(
        &self,
        _system_prompt: &str,
        _user_prompt: &str,
    ) -> Result<serde_json::Value, PipelineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(serde_json::json!({
            "question": "Which topping is most popular?",
            "options": ["Sprinkles", "Glaze", "Maple"],
            "correctAnswer": "Glaze",
            "explanation": "Glaze wins every survey.",
            "reward": "Free donut hole",
            "mythOne": "Donuts are Dutch",
            "mythTwo": "Holes are wasteful",
            "factOne": "They are American",
            "factTwo": "Holes are sold too",
            "deal": "Dozen for 10"
        }))
    }
}

/// Records scheduled jobs instead of running them.
#[derive(Default)]
pub struct RecordingQueue {
    pub scheduled: Mutex<Vec<(ScheduledGeneration, Duration)>>,
}

impl RecordingQueue {
    pub fn jobs(&self) -> Vec<(ScheduledGeneration, Duration)> {
        self.scheduled.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationQueue for RecordingQueue {
    async fn schedule(
        &self,
        job: ScheduledGeneration,
        delay: Duration,
    ) -> Result<(), PipelineError> {
        self.scheduled.lock().unwrap().push((job, delay));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Wiring
// ---------------------------------------------------------------------------

pub struct Harness {
    pub store: Arc<InMemoryStore>,
    pub api: Arc<FakeDesignApi>,
    pub text: Arc<FakeText>,
    pub queue: Arc<RecordingQueue>,
    pub tokens: Arc<TokenManager>,
    pub orchestrator: CampaignOrchestrator,
    pub poller: JobPoller,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_api(FakeDesignApi::default())
    }

    pub fn with_api(api: FakeDesignApi) -> Self {
        let store = Arc::new(InMemoryStore::default());
        let api = Arc::new(api);
        let text = Arc::new(FakeText::default());
        let queue = Arc::new(RecordingQueue::default());
        let tokens = Arc::new(TokenManager::new(store.clone(), api.clone()));
        let orchestrator = CampaignOrchestrator::new(
            store.clone(),
            tokens.clone(),
            api.clone(),
            ContentGenerator::new(text.clone()),
            queue.clone(),
        );
        let poller = JobPoller::new(store.clone(), tokens.clone(), api.clone());
        Self {
            store,
            api,
            text,
            queue,
            tokens,
            orchestrator,
            poller,
        }
    }
}

pub fn email_only_customer() -> CustomerProfile {
    CustomerProfile {
        first_name: "Lisa".into(),
        last_name: "Simpson".into(),
        email: "lisa@springfield.test".into(),
        preferences: vec!["Maple".into()],
        ..Default::default()
    }
}

pub fn instagram_customer() -> CustomerProfile {
    CustomerProfile {
        instagram_handle: Some("@sprinkle".into()),
        ..email_only_customer()
    }
}
