//! Schema description used to ground SQL prompts: each table's DDL followed
//! by a few sample rows.

use sqlx::SqlitePool;

use crate::query::executor::{column_names, row_to_map};

const SAMPLE_ROWS: usize = 3;

/// User tables in name order, excluding SQLite's internal ones.
pub async fn list_tables(pool: &SqlitePool) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )
    .fetch_all(pool)
    .await
}

/// Builds the table-info text for all tables, or only for `only` when given.
/// Unknown names in `only` are ignored.
pub async fn describe_schema(
    pool: &SqlitePool,
    only: Option<&[String]>,
) -> Result<String, sqlx::Error> {
    let tables: Vec<(String, String)> = sqlx::query_as(
        "SELECT name, sql FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )
    .fetch_all(pool)
    .await?;

    let mut sections = Vec::new();
    for (name, ddl) in tables {
        if let Some(wanted) = only {
            if !wanted.iter().any(|w| w.eq_ignore_ascii_case(&name)) {
                continue;
            }
        }
        let samples = sample_rows(pool, &name).await?;
        sections.push(format!("{}\n\n{}", ddl.trim(), samples));
    }
    Ok(sections.join("\n\n"))
}

async fn sample_rows(pool: &SqlitePool, table: &str) -> Result<String, sqlx::Error> {
    let sql = format!(
        "SELECT * FROM {} LIMIT {SAMPLE_ROWS}",
        quote_identifier(table)
    );
    let rows = sqlx::query(&sql).fetch_all(pool).await?;

    let columns = rows.first().map(column_names).unwrap_or_default();
    let mut lines = vec![format!("/*\n{SAMPLE_ROWS} rows from {table} table:")];
    if !columns.is_empty() {
        lines.push(columns.join("\t"));
    }
    for row in &rows {
        let values = row_to_map(row)?;
        let cells: Vec<String> = columns
            .iter()
            .map(|c| match values.get(c) {
                Some(serde_json::Value::String(s)) => s.clone(),
                Some(serde_json::Value::Null) | None => "None".to_string(),
                Some(other) => other.to_string(),
            })
            .collect();
        lines.push(cells.join("\t"));
    }
    lines.push("*/".to_string());
    Ok(lines.join("\n"))
}

/// Double-quotes an identifier for interpolation into SQL.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
