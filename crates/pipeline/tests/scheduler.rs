mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{email_only_customer, InMemoryStore, FakeDesignApi, FakeText, ORG_ID, USER_ID};
use donut_core::campaign::CampaignRequest;
use donut_core::status::GenerationRunStatus;
use donut_pipeline::content::ContentGenerator;
use donut_pipeline::orchestrator::CampaignOrchestrator;
use donut_pipeline::scheduler::{run_worker, GenerationScheduler};
use donut_pipeline::token::TokenManager;
use tokio_util::sync::CancellationToken;

struct Worker {
    store: Arc<InMemoryStore>,
    orchestrator: Arc<CampaignOrchestrator>,
    cancel: CancellationToken,
    handle: tokio::task::JoinHandle<()>,
}

fn start_worker() -> Worker {
    let store = Arc::new(InMemoryStore::default());
    let api = Arc::new(FakeDesignApi::default());
    let tokens = Arc::new(TokenManager::new(store.clone(), api.clone()));
    let (scheduler, rx) = GenerationScheduler::channel();
    let orchestrator = Arc::new(CampaignOrchestrator::new(
        store.clone(),
        tokens,
        api,
        ContentGenerator::new(Arc::new(FakeText::default())),
        Arc::new(scheduler),
    ));
    let cancel = CancellationToken::new();
    let handle = tokio::spawn(run_worker(
        rx,
        orchestrator.clone(),
        cancel.clone(),
        Duration::from_secs(5),
    ));
    store.connect_user(USER_ID, Some(60));
    store.add_customer(100, email_only_customer());
    Worker {
        store,
        orchestrator,
        cancel,
        handle,
    }
}

fn request() -> CampaignRequest {
    CampaignRequest::parse("Spring", &["quiz".to_string()], &[]).unwrap()
}

async fn wait_for_status(store: &InMemoryStore, run_id: i64, status: GenerationRunStatus) {
    for _ in 0..100 {
        if store.run(run_id).status == status {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("run {run_id} never reached {status}");
}

#[tokio::test]
async fn worker_executes_scheduled_generation() {
    let w = start_worker();

    let run_id = w
        .orchestrator
        .schedule_campaign(USER_ID, ORG_ID, 100, request())
        .await
        .unwrap();

    wait_for_status(&w.store, run_id, GenerationRunStatus::Completed).await;
    assert_eq!(w.store.campaign_count(), 1);

    w.cancel.cancel();
    w.handle.await.unwrap();
}

#[tokio::test]
async fn delayed_jobs_are_abandoned_at_shutdown() {
    let w = start_worker();

    let summary = w
        .orchestrator
        .schedule_bulk(USER_ID, ORG_ID, &[100], request())
        .await
        .unwrap();
    w.cancel.cancel();
    w.handle.await.unwrap();

    let run = w.store.run(summary.run_ids[0]);
    assert_eq!(run.status, GenerationRunStatus::Queued);
    assert_eq!(w.store.campaign_count(), 0);
}

#[tokio::test]
async fn scheduling_after_shutdown_fails_the_run() {
    let w = start_worker();
    w.cancel.cancel();
    w.handle.await.unwrap();

    let err = w
        .orchestrator
        .schedule_campaign(USER_ID, ORG_ID, 100, request())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("not running"));
    let runs = w.store.with(|s| s.runs.values().cloned().collect::<Vec<_>>());
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].status, GenerationRunStatus::Failed);
}
