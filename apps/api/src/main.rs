mod config;
mod document;
mod errors;
mod evaluation;
mod llm_client;
mod routes;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::evaluation::rubric::Rubric;
use crate::evaluation::synthesizer::ReportSynthesizer;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{MemoryResultStore, RedisResultStore, ResultStore};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting cvreview API v{}", env!("CARGO_PKG_VERSION"));

    let llm = LlmClient::new(config.anthropic_api_key.clone())
        .context("Failed to build LLM HTTP client")?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let store: Arc<dyn ResultStore> = match &config.redis_url {
        Some(url) => {
            let client = redis::Client::open(url.as_str()).context("Invalid REDIS_URL")?;
            info!("Result store: Redis");
            Arc::new(RedisResultStore::new(
                client,
                config.result_ttl,
                config.sweep_interval,
            ))
        }
        None => {
            let memory = MemoryResultStore::new(config.result_ttl);
            memory.cache().spawn_sweeper(config.sweep_interval);
            info!(
                "Result store: in-memory (ttl {}s, sweep every {}s)",
                config.result_ttl.as_secs(),
                config.sweep_interval.as_secs()
            );
            Arc::new(memory)
        }
    };

    let state = AppState {
        generator: Arc::new(llm),
        store,
        synthesizer: ReportSynthesizer::new(Arc::new(Rubric::standard())),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
