//! Render worker binary.
//!
//! Usage: `shorts-worker <manifest.json>`. Prints the render report as JSON.

use anyhow::Context;
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use shorts_worker::{ProjectRenderer, RenderManifest, WorkerConfig};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    if let Err(e) = init_tracing() {
        eprintln!("Failed to initialize logging: {e:#}");
        std::process::exit(1);
    }

    if let Err(e) = run().await {
        error!("Render failed: {:#}", e);
        std::process::exit(1);
    }
}

/// Colored output for dev, JSON for production.
fn init_tracing() -> anyhow::Result<()> {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env().add_directive("shorts=info".parse()?);

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    let manifest_path = std::env::args()
        .nth(1)
        .context("usage: shorts-worker <manifest.json>")?;

    let config = WorkerConfig::from_env();
    info!("Worker config: {:?}", config);

    let manifest = RenderManifest::from_path(&manifest_path)
        .await
        .with_context(|| format!("loading manifest {manifest_path}"))?;

    let (cancel_tx, cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Received shutdown signal, cancelling render");
            let _ = cancel_tx.send(true);
        }
    });

    let renderer = ProjectRenderer::new(config).with_cancel(cancel_rx);
    let report = renderer.render(&manifest).await?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
