use std::sync::Arc;

use donut_canva::CanvaApi;
use donut_pipeline::content::ContentGenerator;
use donut_pipeline::orchestrator::CampaignOrchestrator;
use donut_pipeline::poller::JobPoller;
use donut_pipeline::ports::{DesignApi, TextGenerator};
use donut_pipeline::scheduler::{GenerationScheduler, QueuedGeneration};
use donut_pipeline::store::PgStore;
use donut_pipeline::token::TokenManager;
use tokio::sync::mpsc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind an `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: donut_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Design API client, used directly for the OAuth connect flow.
    pub canva: CanvaApi,
    pub orchestrator: Arc<CampaignOrchestrator>,
}

/// Background pieces created alongside the state; `main` runs them.
pub struct PipelineHandles {
    /// Receiving end of the generation queue, for `scheduler::run_worker`.
    pub generation_rx: mpsc::UnboundedReceiver<QueuedGeneration>,
    pub poller: JobPoller,
}

impl AppState {
    /// Wire the pipeline onto Postgres and the given external services.
    pub fn new(
        pool: donut_db::DbPool,
        config: ServerConfig,
        canva: CanvaApi,
        text: Arc<dyn TextGenerator>,
    ) -> (Self, PipelineHandles) {
        let store = Arc::new(PgStore::new(pool.clone()));
        let design_api: Arc<dyn DesignApi> = Arc::new(canva.clone());
        let tokens = Arc::new(TokenManager::new(store.clone(), design_api.clone()));
        let (scheduler, generation_rx) = GenerationScheduler::channel();

        let orchestrator = Arc::new(CampaignOrchestrator::new(
            store.clone(),
            tokens.clone(),
            design_api.clone(),
            ContentGenerator::new(text),
            Arc::new(scheduler),
        ));
        let poller = JobPoller::new(store, tokens, design_api);

        let state = Self {
            pool,
            config: Arc::new(config),
            canva,
            orchestrator,
        };
        (
            state,
            PipelineHandles {
                generation_rx,
                poller,
            },
        )
    }
}
