//! Read-only statement execution against SQLite.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Executor, Row, SqlitePool, TypeInfo, ValueRef};
use thiserror::Error;
use tracing::debug;

use crate::normalize::sql::NormalizedSql;

/// Rows kept in an agent observation before the rest is summarised.
const MAX_OBSERVATION_ROWS: usize = 50;

/// Tabular result set. `columns` preserves the statement's column order;
/// each row maps column name to value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Map<String, Value>>,
}

impl QueryResult {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Pipe-separated text rendering used as an agent observation.
    pub fn to_observation(&self) -> String {
        if self.rows.is_empty() {
            return "No rows returned.".to_string();
        }

        let mut lines = vec![self.columns.join(" | ")];
        for row in self.rows.iter().take(MAX_OBSERVATION_ROWS) {
            let cells: Vec<String> = self
                .columns
                .iter()
                .map(|c| cell_text(row.get(c).unwrap_or(&Value::Null)))
                .collect();
            lines.push(cells.join(" | "));
        }
        if self.rows.len() > MAX_OBSERVATION_ROWS {
            lines.push(format!(
                "... ({} more rows)",
                self.rows.len() - MAX_OBSERVATION_ROWS
            ));
        }
        lines.join("\n")
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Engine-side failure; carries the engine's message and no partial rows.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("{0}")]
    Database(#[from] sqlx::Error),
}

/// Runs validated statements. Takes `NormalizedSql` so that rejected text
/// cannot be executed.
#[async_trait]
pub trait SqlExecutor: Send + Sync {
    async fn execute(&self, statement: &NormalizedSql) -> Result<QueryResult, ExecutionError>;
}

#[derive(Clone)]
pub struct SqliteExecutor {
    pool: SqlitePool,
}

impl SqliteExecutor {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SqlExecutor for SqliteExecutor {
    async fn execute(&self, statement: &NormalizedSql) -> Result<QueryResult, ExecutionError> {
        let sql = statement.as_str();
        let rows = sqlx::query(sql).fetch_all(&self.pool).await?;
        debug!("Query returned {} rows: {sql}", rows.len());

        let columns = match rows.first() {
            Some(row) => column_names(row),
            None => self
                .pool
                .describe(sql)
                .await?
                .columns()
                .iter()
                .map(|c| c.name().to_string())
                .collect(),
        };

        let rows = rows
            .iter()
            .map(row_to_map)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(QueryResult { columns, rows })
    }
}

pub(crate) fn column_names(row: &SqliteRow) -> Vec<String> {
    row.columns().iter().map(|c| c.name().to_string()).collect()
}

/// Decodes one row by the storage class of each cell.
pub(crate) fn row_to_map(row: &SqliteRow) -> Result<Map<String, Value>, sqlx::Error> {
    let mut map = Map::new();
    for (idx, column) in row.columns().iter().enumerate() {
        map.insert(column.name().to_string(), cell_value(row, idx)?);
    }
    Ok(map)
}

fn cell_value(row: &SqliteRow, idx: usize) -> Result<Value, sqlx::Error> {
    let raw = row.try_get_raw(idx)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let storage = raw.type_info().name().to_string();

    let value = match storage.as_str() {
        "INTEGER" | "BOOLEAN" => Value::from(row.try_get_unchecked::<i64, _>(idx)?),
        "REAL" => Number::from_f64(row.try_get_unchecked::<f64, _>(idx)?)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        "BLOB" => {
            let bytes = row.try_get_unchecked::<Vec<u8>, _>(idx)?;
            Value::String(format!("<{} bytes>", bytes.len()))
        }
        _ => Value::String(row.try_get_unchecked::<String, _>(idx)?),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::sql::normalize_sql;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn memory_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::query(
            "CREATE TABLE Users (user_id INTEGER PRIMARY KEY, username TEXT NOT NULL, age INTEGER, score REAL, avatar BLOB)",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO Users (username, age, score, avatar) VALUES ('john_doe', 28, 4.5, x'0102'), ('giulia_rossi', NULL, NULL, NULL)",
        )
        .execute(&pool)
        .await
        .unwrap();
        pool
    }

    #[tokio::test]
    async fn test_execute_decodes_storage_classes() {
        let executor = SqliteExecutor::new(memory_pool().await);
        let sql = normalize_sql("SELECT username, age, score, avatar FROM Users ORDER BY user_id").unwrap();
        let result = executor.execute(&sql).await.unwrap();

        assert_eq!(result.columns, vec!["username", "age", "score", "avatar"]);
        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.rows[0]["username"], "john_doe");
        assert_eq!(result.rows[0]["age"], 28);
        assert_eq!(result.rows[0]["score"], 4.5);
        assert_eq!(result.rows[0]["avatar"], "<2 bytes>");
        assert!(result.rows[1]["age"].is_null());
    }

    #[tokio::test]
    async fn test_empty_result_still_reports_columns() {
        let executor = SqliteExecutor::new(memory_pool().await);
        let sql = normalize_sql("SELECT username, age FROM Users WHERE age > 100").unwrap();
        let result = executor.execute(&sql).await.unwrap();
        assert!(result.is_empty());
        assert_eq!(result.columns, vec!["username", "age"]);
    }

    #[tokio::test]
    async fn test_unknown_column_is_a_diagnostic() {
        let executor = SqliteExecutor::new(memory_pool().await);
        let sql = normalize_sql("SELECT nickname FROM Users").unwrap();
        let err = executor.execute(&sql).await.unwrap_err();
        assert!(err.to_string().contains("nickname"));
    }

    #[tokio::test]
    async fn test_aggregate_columns() {
        let executor = SqliteExecutor::new(memory_pool().await);
        let sql = normalize_sql("SELECT COUNT(*) AS total FROM Users").unwrap();
        let result = executor.execute(&sql).await.unwrap();
        assert_eq!(result.rows[0]["total"], 2);
    }

    #[test]
    fn test_observation_rendering() {
        let mut row = Map::new();
        row.insert("username".into(), Value::from("john_doe"));
        row.insert("age".into(), Value::Null);
        let result = QueryResult {
            columns: vec!["username".into(), "age".into()],
            rows: vec![row],
        };
        assert_eq!(result.to_observation(), "username | age\njohn_doe | NULL");
        assert_eq!(QueryResult::default().to_observation(), "No rows returned.");
    }

    #[test]
    fn test_observation_truncates_long_results() {
        let rows = (0..(MAX_OBSERVATION_ROWS + 5))
            .map(|i| {
                let mut row = Map::new();
                row.insert("n".into(), Value::from(i));
                row
            })
            .collect();
        let result = QueryResult {
            columns: vec!["n".into()],
            rows,
        };
        assert!(result.to_observation().ends_with("... (5 more rows)"));
    }
}
