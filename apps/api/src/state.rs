use std::sync::Arc;

use sqlx::SqlitePool;

use crate::llm_client::TextCompletion;
use crate::query::assistant::QueryAssistant;
use crate::query::executor::SqlExecutor;
use crate::resume::store::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    /// Completion profile for resume extraction (deterministic, long output).
    pub extraction_llm: Arc<dyn TextCompletion>,
    pub store: Arc<ResumeStore>,
    pub executor: Arc<dyn SqlExecutor>,
    pub assistant: Arc<QueryAssistant>,
}
