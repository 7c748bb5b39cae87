// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! ZenStep local server
//!
//! Loads the persisted step history, then serves the JSON API used by the
//! web front end to stream motion samples and read dashboards.

use anyhow::Context;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zenstep::{
    config::Config,
    db::{FileStore, LocalDb},
    services::{CoachService, Tracker},
    time_utils::SystemClock,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(port = config.port, "Starting ZenStep");

    // Open the local store and load persisted state before serving anything
    let store = FileStore::open(&config.data_dir).context("Failed to open data directory")?;
    let db = LocalDb::new(Arc::new(store));
    let tracker = Tracker::bootstrap(db, Arc::new(SystemClock::new()));

    let coach = CoachService::from_config(&config);

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        tracker: Mutex::new(tracker),
        coach,
    });

    // Build router
    let app = zenstep::routes::create_router(state);

    // Local app: listen on loopback only
    let addr = format!("127.0.0.1:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("zenstep=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
