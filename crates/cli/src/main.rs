use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::Parser;
use chatrelay_core::AppConfig;
use chatrelay_http::{AppState, cors_layer, create_router, load_index_html};
use chatrelay_llm::LlmClient;
use chatrelay_search::{SearchClient, WebSearch};
use chatrelay_service::{ConversationService, ConversationSettings};
use chatrelay_storage::MetricsRecorder;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chatrelay", version)]
#[command(about = "Chatbot backend relaying conversations to a hosted LLM", long_about = None)]
struct Cli {
    /// Listen address [default: $HOST or 0.0.0.0]
    #[arg(short = 'H', long)]
    host: Option<String>,
    /// Listen port [default: $PORT or 3000]
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is the normal case in production.
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "loaded .env");
    }

    let cli = Cli::parse();
    let mut config = AppConfig::from_env().context("invalid configuration")?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    run(config).await
}

async fn run(config: AppConfig) -> Result<()> {
    let metrics = MetricsRecorder::from_config(&config.metrics);
    metrics.ensure_metrics_row().await;

    let llm = Arc::new(LlmClient::from_config(&config.llm)?);
    let search: Option<Arc<dyn WebSearch>> = match &config.search {
        Some(search) => {
            tracing::info!(base_url = %search.base_url, "citation search enabled");
            Some(Arc::new(SearchClient::from_config(search)))
        },
        None => {
            tracing::info!("GOOGLE_API_KEY/GOOGLE_CSE_ID not set, citation search disabled");
            None
        },
    };
    let conversation =
        ConversationService::new(llm, search, ConversationSettings::from(&config));
    let index_html = load_index_html(config.server.index_html_path.as_deref())?;

    let state = Arc::new(AppState {
        conversation: Arc::new(conversation),
        metrics,
        admin_password: config.admin_password.clone(),
        index_html,
    });
    if state.admin_password.is_none() {
        tracing::warn!("ADMIN_PASSWORD not set, /admin will reject every request");
    }

    let router = create_router(state).layer(cors_layer(config.server.cors_origin.as_deref())?);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("Starting HTTP server on {}", addr);
    axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
