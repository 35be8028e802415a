mod config;
mod db;
mod errors;
mod llm_client;
mod normalize;
mod query;
mod resume;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::db::seed::{init_schema, seed_sample_data};
use crate::llm_client::{LlmClient, EXTRACTION_SAMPLING, SQL_SAMPLING};
use crate::query::agent::SqlAgent;
use crate::query::assistant::QueryAssistant;
use crate::query::executor::SqliteExecutor;
use crate::query::retry::RetryPolicy;
use crate::resume::store::ResumeStore;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Extractor API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize SQLite and the sample social-media tables
    let db = create_pool(&config.database_url).await?;
    init_schema(&db).await?;
    if config.seed_sample_data {
        seed_sample_data(&db).await?;
    }

    // One client per sampling profile
    let extraction_llm = LlmClient::new(
        config.together_api_url.clone(),
        config.together_api_key.clone(),
        config.llm_model.clone(),
        EXTRACTION_SAMPLING,
    )?;
    let sql_llm = Arc::new(LlmClient::new(
        config.together_api_url.clone(),
        config.together_api_key.clone(),
        config.llm_model.clone(),
        SQL_SAMPLING,
    )?);
    info!("LLM clients initialized (model: {})", sql_llm.model());

    let executor = Arc::new(SqliteExecutor::new(db.clone()));
    let agent = Arc::new(
        SqlAgent::new(sql_llm.clone(), executor.clone(), db.clone())
            .with_max_iterations(config.agent_max_iterations),
    );
    let assistant = QueryAssistant::new(
        agent,
        sql_llm,
        executor.clone(),
        RetryPolicy::new(config.agent_max_retries),
    );
    info!(
        "Query assistant ready (agent attempts before fallback: {}, steps per attempt: {})",
        config.agent_max_retries, config.agent_max_iterations
    );

    let store = ResumeStore::new(config.resume_store_path.clone());
    info!("Resume store at {}", store.path().display());

    // Build app state
    let state = AppState {
        db,
        extraction_llm: Arc::new(extraction_llm),
        store: Arc::new(store),
        executor,
        assistant: Arc::new(assistant),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
