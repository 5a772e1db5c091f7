use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use careplan_core::{api_router, AppState, Settings};
use careplan_llm::OpenAiClient;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "careplan-server", about = "Oncology care-plan service", version)]
struct Cli {
    /// Config file (defaults to ./careplan.toml if present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Port to listen on, overriding config and $PORT.
    #[arg(long)]
    port: Option<u16>,

    /// Address to bind, overriding config.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(careplan_core::config::default_log_filter())),
        )
        .init();

    let mut settings = Settings::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(port) = cli.port {
        settings.port = port;
    }
    if let Some(bind) = cli.bind {
        settings.bind = bind;
    }

    if !settings.has_api_key() {
        tracing::warn!("OPENAI_API_KEY not set; /api/guidelines will fail until configured");
    }

    let client = OpenAiClient::new(settings.openai()).context("building model API client")?;
    let state = AppState::new(Arc::new(client), settings.default_schema);
    let app = api_router(state);

    let addr = format!("{}:{}", settings.bind, settings.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    tracing::info!(
        version = careplan_core::config::APP_VERSION,
        %addr,
        model = %settings.openai_model,
        schema = %settings.default_schema,
        "careplan-server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("careplan-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
