//! Taleturn Engine - Main entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taleturn_engine::api;
use taleturn_engine::app::{App, Repositories};
use taleturn_engine::infrastructure::{
    clock::{SeededRandom, SystemClock, SystemRandom},
    config::{load_dotenv_from_repo_root, EngineConfig},
    memory::InMemorySessionStore,
    ollama::OllamaClient,
    ports::{ClockPort, RandomPort},
    resilient_llm::{ResilientLlmClient, RetryConfig},
    sqlite::SqliteSessionStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the binary may be run from `crates/engine`).
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taleturn_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Taleturn Engine");

    let config = EngineConfig::from_env();

    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());
    let random: Arc<dyn RandomPort> = match config.random_seed {
        Some(seed) => {
            tracing::info!(seed, "Using seeded dice rolls");
            Arc::new(SeededRandom::new(seed))
        }
        None => Arc::new(SystemRandom::new()),
    };

    // Session storage
    let repositories = match &config.session_db {
        Some(path) => {
            tracing::info!(path = %path, "Storing sessions in SQLite");
            Repositories::shared(Arc::new(SqliteSessionStore::new(path).await?))
        }
        None => {
            tracing::warn!("SESSION_DB not set, sessions are kept in memory only");
            Repositories::shared(Arc::new(InMemorySessionStore::new()))
        }
    };

    // Text generation
    let ollama_client = Arc::new(OllamaClient::with_timeout(
        &config.ollama_url,
        &config.ollama_model,
        config.llm_timeout_secs,
    ));
    let retry_config = RetryConfig::default().with_max_retries(config.llm_max_retries);
    tracing::info!(
        url = %config.ollama_url,
        model = %config.ollama_model,
        max_retries = retry_config.max_retries,
        base_delay_ms = retry_config.base_delay_ms,
        "LLM client configured"
    );
    let llm = Arc::new(ResilientLlmClient::new(ollama_client, retry_config));

    let app = Arc::new(App::new(repositories, llm, clock, random, &config));

    let mut router = api::http::routes()
        .with_state(app)
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = build_cors_layer(config.cors_allowed_origins.as_deref()) {
        router = router.layer(cors);
    }

    let addr: SocketAddr = config.bind_address().parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

fn build_cors_layer(allowed_origins: Option<&str>) -> Option<CorsLayer> {
    let allowed_origins = allowed_origins?;

    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    if allowed_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        if origins.is_empty() {
            return None;
        }

        cors = cors.allow_origin(origins);
    }

    Some(cors)
}
