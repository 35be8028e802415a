//! Per-request query context. The client sends the previous session back and
//! receives the updated one; nothing is kept server-side between requests.

use serde::{Deserialize, Serialize};

use crate::normalize::sql::SqlRejection;
use crate::query::executor::QueryResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerSource {
    Agent,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryOutcome {
    pub source: AnswerSource,
    /// Statement that was run, or the sanitized text that was rejected.
    pub sql: Option<String>,
    /// Agent final answer that could not be used as SQL.
    pub agent_answer: Option<String>,
    /// Why the agent path was abandoned, when it was.
    pub fallback_reason: Option<String>,
    pub rejection: Option<SqlRejection>,
    pub result: Option<QueryResult>,
    /// Engine diagnostic for an accepted statement that failed to run.
    pub error: Option<String>,
    pub agent_logs: Option<String>,
}

impl QueryOutcome {
    pub fn new(source: AnswerSource) -> Self {
        Self {
            source,
            sql: None,
            agent_answer: None,
            fallback_reason: None,
            rejection: None,
            result: None,
            error: None,
            agent_logs: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuerySession {
    pub question: String,
    pub outcome: Option<QueryOutcome>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_session_accepts_sparse_json() {
        let session: QuerySession = serde_json::from_value(json!({
            "question": "Show me all the male users",
            "outcome": { "source": "fallback", "sql": "SELECT * FROM Users WHERE gender = 'M'" }
        }))
        .unwrap();

        let outcome = session.outcome.unwrap();
        assert_eq!(outcome.source, AnswerSource::Fallback);
        assert!(outcome.rejection.is_none());
        assert!(outcome.result.is_none());
    }

    #[test]
    fn test_rejection_serializes_with_kind() {
        let mut outcome = QueryOutcome::new(AnswerSource::Fallback);
        outcome.rejection = Some(SqlRejection::NotSelect {
            verb: "DROP".into(),
        });
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["rejection"]["kind"], "not_select");
        assert_eq!(value["rejection"]["verb"], "DROP");
        assert_eq!(value["source"], "fallback");
    }
}
