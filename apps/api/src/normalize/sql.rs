//! SQL response normalizer: cleans an LLM reply down to a single statement and
//! allows it through only when it is a read-only `SELECT`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::normalize::fence::strip_sql_fences;

const STATEMENT_TERMINATOR: char = ';';
const ALLOWED_VERB: &str = "select";
/// Longest verb echoed back in a rejection message.
const MAX_VERB_CHARS: usize = 32;

/// A statement that passed the allow-list. Only [`normalize_sql`] builds one,
/// so anything holding a `NormalizedSql` is safe to hand to an executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedSql(String);

impl NormalizedSql {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for NormalizedSql {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SqlRejection {
    #[error("LLM output is empty; there is no SQL statement to run")]
    Empty,

    #[error("LLM output does not appear to be a valid SELECT SQL query (it starts with '{verb}')")]
    NotSelect { verb: String },
}

/// Strips fences, keeps only the text before the first `;`, and trims.
pub fn sanitize_sql(raw: &str) -> &str {
    let unfenced = strip_sql_fences(raw);
    unfenced
        .split(STATEMENT_TERMINATOR)
        .next()
        .unwrap_or_default()
        .trim()
}

/// First token of a statement: the leading run of ASCII alphanumerics or `_`.
pub fn leading_keyword(statement: &str) -> &str {
    let statement = statement.trim_start();
    let end = statement
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(statement.len());
    &statement[..end]
}

/// Sanitizes `raw` and validates it against the `SELECT`-only allow-list.
pub fn normalize_sql(raw: &str) -> Result<NormalizedSql, SqlRejection> {
    let statement = sanitize_sql(raw);
    if statement.is_empty() {
        return Err(SqlRejection::Empty);
    }

    let keyword = leading_keyword(statement);
    if !keyword.eq_ignore_ascii_case(ALLOWED_VERB) {
        return Err(SqlRejection::NotSelect {
            verb: describe_verb(statement, keyword),
        });
    }

    Ok(NormalizedSql(statement.to_string()))
}

fn describe_verb(statement: &str, keyword: &str) -> String {
    let verb = if keyword.is_empty() {
        statement.split_whitespace().next().unwrap_or(statement)
    } else {
        keyword
    };
    verb.chars().take(MAX_VERB_CHARS).collect()
}
