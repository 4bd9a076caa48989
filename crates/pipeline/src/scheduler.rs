//! In-process scheduler for campaign generation runs.
//!
//! [`GenerationScheduler`] is the [`GenerationQueue`] handed to the
//! orchestrator; it forwards jobs over a channel to [`run_worker`], which
//! spawns one task per job, waits out its delay and executes it. Tasks are
//! tracked so shutdown can wait for in-flight generations.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::error::PipelineError;
use crate::orchestrator::CampaignOrchestrator;
use crate::ports::{GenerationQueue, ScheduledGeneration};

/// A job waiting for the worker.
#[derive(Debug)]
pub struct QueuedGeneration {
    pub job: ScheduledGeneration,
    pub delay: Duration,
}

/// Sending half of the generation queue.
#[derive(Clone)]
pub struct GenerationScheduler {
    tx: mpsc::UnboundedSender<QueuedGeneration>,
}

impl GenerationScheduler {
    /// Create the scheduler and the receiver to pass to [`run_worker`].
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<QueuedGeneration>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl GenerationQueue for GenerationScheduler {
    async fn schedule(
        &self,
        job: ScheduledGeneration,
        delay: Duration,
    ) -> Result<(), PipelineError> {
        self.tx
            .send(QueuedGeneration { job, delay })
            .map_err(|_| PipelineError::SchedulerClosed)
    }
}

/// Receive scheduled jobs and run each on its own task until `cancel`
/// fires, then wait up to `drain_timeout` for running tasks.
///
/// Jobs still waiting out their delay at shutdown are abandoned; their runs
/// stay `queued`.
pub async fn run_worker(
    mut rx: mpsc::UnboundedReceiver<QueuedGeneration>,
    orchestrator: Arc<CampaignOrchestrator>,
    cancel: CancellationToken,
    drain_timeout: Duration,
) {
    let tracker = TaskTracker::new();
    tracing::info!("Generation worker started");

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Generation worker stopping");
                break;
            }
            queued = rx.recv() => {
                let Some(QueuedGeneration { job, delay }) = queued else {
                    tracing::info!("Generation queue closed");
                    break;
                };
                let orchestrator = Arc::clone(&orchestrator);
                let cancel = cancel.clone();
                tracker.spawn(async move {
                    if !delay.is_zero() {
                        tokio::select! {
                            _ = cancel.cancelled() => {
                                tracing::info!(run_id = job.run_id, "Scheduled generation abandoned at shutdown");
                                return;
                            }
                            _ = tokio::time::sleep(delay) => {}
                        }
                    }
                    orchestrator.run_scheduled(&job).await;
                });
            }
        }
    }

    tracker.close();
    if tokio::time::timeout(drain_timeout, tracker.wait())
        .await
        .is_err()
    {
        tracing::warn!(
            remaining = tracker.len(),
            "Timed out waiting for in-flight generations"
        );
    }
}
