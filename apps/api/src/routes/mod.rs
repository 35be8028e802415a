pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::query::handlers as query;
use crate::resume::handlers as resume;
use crate::state::AppState;

/// Largest accepted resume upload.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resume API
        .route(
            "/api/v1/resumes",
            get(resume::handle_list_resumes).post(resume::handle_save_resume),
        )
        .route("/api/v1/resumes/skills", get(resume::handle_list_skills))
        .route(
            "/api/v1/resumes/extract",
            post(resume::handle_extract_pdf).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route(
            "/api/v1/resumes/extract/text",
            post(resume::handle_extract_text),
        )
        // Query API
        .route("/api/v1/query", post(query::handle_ask))
        .route("/api/v1/sql", post(query::handle_run_sql))
        .route("/api/v1/tables", get(query::handle_list_tables))
        .route("/api/v1/tables/:name", get(query::handle_table_rows))
        .route("/api/v1/schema", get(query::handle_schema))
        .with_state(state)
}
