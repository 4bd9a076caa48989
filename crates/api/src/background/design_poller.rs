//! Periodic sweep of in-progress design jobs.
//!
//! Wraps [`JobPoller::poll_once`] in a fixed interval. A failed sweep is
//! logged and retried on the next tick.

use std::time::Duration;

use donut_pipeline::poller::JobPoller;
use tokio_util::sync::CancellationToken;

/// Run the design poller loop until `cancel` is triggered.
pub async fn run(poller: JobPoller, every: Duration, cancel: CancellationToken) {
    tracing::info!(interval_secs = every.as_secs(), "Design poller started");

    let mut interval = tokio::time::interval(every);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Design poller stopping");
                break;
            }
            _ = interval.tick() => {
                match poller.poll_once().await {
                    Ok(summary) if summary.checked == 0 => {
                        tracing::debug!("Design poller: nothing in progress");
                    }
                    Ok(summary) => {
                        tracing::info!(
                            checked = summary.checked,
                            completed = summary.completed,
                            failed = summary.failed,
                            pending = summary.pending,
                            errors = summary.errors,
                            "Design poller sweep finished",
                        );
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Design poller sweep failed");
                    }
                }
            }
        }
    }
}
