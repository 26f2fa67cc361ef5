use anyhow::{Context, Result};
use tokio::net::TcpListener;

use calmirror::config::Config;
use calmirror::server;
use calmirror::store::Database;
use calmirror::sync::scheduler;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Any failure from here to the listener bind is fatal: exit non-zero
    // before the scheduler starts. Cycle failures later on never are.
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::debug!(?config, "Loaded configuration");

    let db = Database::connect(&config)
        .await
        .context("Failed to open event store")?;

    let client = reqwest::Client::new();
    tokio::spawn(scheduler::run(
        db.clone(),
        client,
        config.feed_url.clone(),
        config.update_interval,
    ));

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    tracing::info!(
        addr = %config.bind_addr,
        interval_secs = config.update_interval.as_secs(),
        "Serving mirrored calendar"
    );

    axum::serve(listener, server::router(db))
        .await
        .context("HTTP server terminated")?;

    Ok(())
}
