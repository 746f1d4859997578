use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use hub_api::{config::load_config, routes::configure_routes, state::AppState};
use sheet_ingestor::providers::google_sheets::GoogleSheetsProvider;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

#[derive(Parser)]
#[command(version, about = "Paid Media Hub API server")]
struct Cli {
    /// TOML config file (defaults to $PAID_MEDIA_HUB_CONFIG, then ./hub.toml).
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Listen address; overrides `bind` from the config file.
    #[arg(long, value_name = "ADDR")]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = load_config(cli.config)?;
    if let Some(bind) = cli.bind {
        config.bind = bind;
        config.validate()?;
    }
    let addr = config.bind_addr()?;

    // Credentials are read per request, so a missing key surfaces as a 500 on
    // the first read rather than a startup failure.
    let provider = GoogleSheetsProvider::new(config.request_timeout())
        .context("failed to build the Google Sheets client")?;
    let state = Arc::new(AppState::new(Arc::new(provider), &config));

    let app = configure_routes()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, master = %config.master_range, creatives = %config.creatives_range, "paid media hub listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("paid media hub stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
