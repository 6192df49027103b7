//! # kelvin-dashd — kelvin dashboard daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Initialise `tracing` from the configured filter
//! - Construct the HTTP readings source (driven adapter)
//! - Construct the display surface, refresh service and poller
//! - Build the axum router over the display surface
//! - Bind to a TCP port and serve
//! - Handle graceful shutdown (SIGTERM/SIGINT), stopping the poller too
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;

use anyhow::Context;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use kelvin_adapter_http_axum::router;
use kelvin_adapter_http_axum::state::AppState;
use kelvin_adapter_http_reqwest::HttpReadingSource;
use kelvin_app::display_surface::DisplaySurface;
use kelvin_app::poller::Poller;
use kelvin_app::services::refresh_service::RefreshService;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    let filter = EnvFilter::try_new(&config.logging.filter)
        .with_context(|| format!("invalid logging filter {:?}", config.logging.filter))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Readings source
    let source =
        HttpReadingSource::new(&config.source).context("failed to build readings source")?;
    tracing::info!(
        url = source.url(),
        timeout_secs = config.source.timeout_secs,
        "using readings provider"
    );

    // Display surface, service and poller
    let surface = Arc::new(DisplaySurface::new());
    let service = Arc::new(RefreshService::new(source, Arc::clone(&surface)));

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let poller = Poller::new(service, config.poll_interval()).spawn(async move {
        let _ = shutdown_rx.wait_for(|stopping| *stopping).await;
    });

    // HTTP
    let state = AppState::new(surface, config.poller.interval_secs)
        .with_shutdown(shutdown_tx.subscribe());
    let app = router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!("kelvin-dashd listening on http://{bind_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = shutdown_tx.send(true);
        })
        .await
        .context("HTTP server failed")?;

    poller.await.context("poller task panicked")?;
    tracing::info!("kelvin-dashd stopped");

    Ok(())
}

/// Resolve on SIGINT, or on SIGTERM on unix.
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => tracing::info!("received SIGINT"),
        () = terminate => tracing::info!("received SIGTERM"),
    }
}
