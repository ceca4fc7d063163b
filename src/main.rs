use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use taskpilot::cache::SuggestionCache;
use taskpilot::client::GeminiClient;
use taskpilot::config::AppConfig;
use taskpilot::handler::{AppState, router};
use taskpilot::metrics::AssistMetrics;
use taskpilot::store::TaskStore;

#[derive(Debug, Parser)]
#[command(name = "taskpilot", about = "AI-assisted task management service")]
struct Args {
    /// Path to a TOML config file; environment variables are used if omitted
    #[arg(short, long)]
    config: Option<String>,

    /// Override the listen address
    #[arg(short, long)]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::from_env()?,
    };
    if let Some(listen) = args.listen {
        config.server.listen_addr = listen;
    }
    config.validate()?;

    info!("Starting taskpilot");
    info!("  Listen: {}", config.server.listen_addr);
    info!("  Gemini endpoint: {}", config.gemini.endpoint);
    info!("  Model: {}", config.gemini.model);
    info!("  Store: {}", config.store.path);

    let provider = Arc::new(GeminiClient::new(config.gemini.clone())?);
    let store = Arc::new(TaskStore::load(&config.store.path)?);

    let state = Arc::new(AppState {
        provider,
        store,
        metrics: AssistMetrics::new(),
        tag_cache: SuggestionCache::new(),
        temperature: config.gemini.temperature,
    });

    let listener = tokio::net::TcpListener::bind(&config.server.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.listen_addr))?;

    info!("Taskpilot ready");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install ctrl-c handler");
    info!("Shutting down");
}
