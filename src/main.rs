//! Site payroll HTTP server.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use site_payroll::api::{create_router, AppState};
use site_payroll::config::ConfigLoader;

/// Labor, salary snapshot and preview service
#[derive(Parser, Debug)]
#[command(name = "site-payroll")]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory holding service.yaml, workers.yaml and users.yaml
    #[arg(short, long, default_value = "./config/default")]
    config: PathBuf,

    /// Listen address, overriding server.bind from service.yaml
    #[arg(long)]
    bind: Option<String>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ConfigLoader::load(&args.config)
        .with_context(|| format!("failed to load configuration from {}", args.config.display()))?;
    let bind = args
        .bind
        .clone()
        .unwrap_or_else(|| config.service().server.bind.clone());

    info!(
        workers = config.config().workers().len(),
        users = config.config().users().len(),
        preview_ttl_secs = config.service().preview.default_ttl_secs,
        "Configuration loaded"
    );

    let router = create_router(AppState::new(config));
    let listener = TcpListener::bind(&bind)
        .await
        .with_context(|| format!("failed to bind {}", bind))?;
    info!(address = %bind, "Listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
