//! Axum route handlers for the query API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::normalize::sql::normalize_sql;
use crate::query::executor::QueryResult;
use crate::query::schema::{describe_schema, list_tables, quote_identifier};
use crate::query::session::QuerySession;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
    /// Session returned by the previous call, if any.
    #[serde(default)]
    pub session: Option<QuerySession>,
}

#[derive(Debug, Deserialize)]
pub struct RunSqlRequest {
    pub sql: String,
}

#[derive(Debug, Serialize)]
pub struct SchemaResponse {
    pub schema: String,
}

/// POST /api/v1/query
pub async fn handle_ask(
    State(state): State<AppState>,
    Json(req): Json<AskRequest>,
) -> Result<Json<QuerySession>, AppError> {
    let schema = describe_schema(&state.db, None).await?;
    let session = state
        .assistant
        .answer(&req.question, &schema, req.session.unwrap_or_default())
        .await?;
    Ok(Json(session))
}

/// POST /api/v1/sql
///
/// User-typed SQL goes through the same allow-list as generated SQL.
pub async fn handle_run_sql(
    State(state): State<AppState>,
    Json(req): Json<RunSqlRequest>,
) -> Result<Json<QueryResult>, AppError> {
    let sql = normalize_sql(&req.sql)?;
    info!("Running user SQL: {sql}");
    Ok(Json(state.executor.execute(&sql).await?))
}

/// GET /api/v1/tables
pub async fn handle_list_tables(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(list_tables(&state.db).await?))
}

/// GET /api/v1/tables/:name
pub async fn handle_table_rows(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<QueryResult>, AppError> {
    let tables = list_tables(&state.db).await?;
    let table = tables
        .into_iter()
        .find(|t| t.eq_ignore_ascii_case(&name))
        .ok_or_else(|| AppError::NotFound(format!("Table '{name}' does not exist")))?;

    let sql = normalize_sql(&format!("SELECT * FROM {}", quote_identifier(&table)))?;
    Ok(Json(state.executor.execute(&sql).await?))
}

/// GET /api/v1/schema
pub async fn handle_schema(
    State(state): State<AppState>,
) -> Result<Json<SchemaResponse>, AppError> {
    let schema = describe_schema(&state.db, None).await?;
    Ok(Json(SchemaResponse { schema }))
}
