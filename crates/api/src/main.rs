use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use donut_api::background;
use donut_api::config::ServerConfig;
use donut_api::router::build_app_router;
use donut_api::state::AppState;
use donut_canva::{CanvaApi, CanvaConfig};
use donut_db::repositories::GenerationRunRepo;
use donut_openai::{OpenAiClient, OpenAiConfig};
use donut_pipeline::scheduler;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "donut_api=debug,donut_pipeline=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    let canva_config = CanvaConfig::from_env();
    let openai_config = OpenAiConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = donut_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    donut_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    donut_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // Runs queued or running when the last process died will never finish.
    match GenerationRunRepo::fail_unfinished(&pool, "Interrupted by server restart").await {
        Ok(0) => {}
        Ok(n) => tracing::warn!(runs = n, "Marked interrupted generation runs as failed"),
        Err(e) => tracing::error!(error = %e, "Failed to close interrupted generation runs"),
    }

    // --- App state and pipeline ---
    let text = Arc::new(OpenAiClient::new(openai_config));
    let (state, handles) = AppState::new(
        pool.clone(),
        config.clone(),
        CanvaApi::new(canva_config),
        text,
    );

    let cancel = CancellationToken::new();
    let shutdown_timeout = Duration::from_secs(config.shutdown_timeout_secs);

    let worker_handle = tokio::spawn(scheduler::run_worker(
        handles.generation_rx,
        Arc::clone(&state.orchestrator),
        cancel.clone(),
        shutdown_timeout,
    ));
    let poller_handle = tokio::spawn(background::design_poller::run(
        handles.poller,
        Duration::from_secs(config.design_poll_interval_secs),
        cancel.clone(),
    ));
    let cleanup_handle = tokio::spawn(background::oauth_cleanup::run(pool, cancel.clone()));
    tracing::info!("Background tasks started (generation worker, design poller, oauth cleanup)");

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");
    cancel.cancel();

    // The worker drains in-flight generations itself, bounded by
    // `shutdown_timeout`; allow a little slack on top.
    let grace = shutdown_timeout + Duration::from_secs(5);
    let _ = tokio::time::timeout(grace, worker_handle).await;
    tracing::info!("Generation worker stopped");

    let _ = tokio::time::timeout(Duration::from_secs(5), poller_handle).await;
    let _ = tokio::time::timeout(Duration::from_secs(5), cleanup_handle).await;
    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
