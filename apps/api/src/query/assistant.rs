//! NL-to-SQL pipeline: agent under the retry policy, direct completion as the
//! fallback, and the SQL normalizer in front of every execution.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::llm_client::TextCompletion;
use crate::normalize::sql::{normalize_sql, sanitize_sql, NormalizedSql};
use crate::query::agent::QueryAgent;
use crate::query::executor::SqlExecutor;
use crate::query::logs::clean_agent_logs;
use crate::query::prompts::build_sql_prompt;
use crate::query::retry::{Resolution, RetryPolicy};
use crate::query::session::{AnswerSource, QueryOutcome, QuerySession};

pub struct QueryAssistant {
    agent: Arc<dyn QueryAgent>,
    llm: Arc<dyn TextCompletion>,
    executor: Arc<dyn SqlExecutor>,
    policy: RetryPolicy,
}

impl QueryAssistant {
    pub fn new(
        agent: Arc<dyn QueryAgent>,
        llm: Arc<dyn TextCompletion>,
        executor: Arc<dyn SqlExecutor>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            agent,
            llm,
            executor,
            policy,
        }
    }

    /// Answers `question` and returns the updated session. A blank question
    /// returns `previous` untouched. Fails only when the direct completion
    /// itself fails.
    pub async fn answer(
        &self,
        question: &str,
        schema: &str,
        previous: QuerySession,
    ) -> Result<QuerySession, AppError> {
        let question = question.trim();
        if question.is_empty() {
            return Ok(previous);
        }

        let agent = self.agent.as_ref();
        let resolution = self
            .policy
            .run(
                |attempt| {
                    debug!("Agent attempt {attempt} for: {question}");
                    agent.run(question, schema)
                },
                |_| self.direct_sql(question, schema),
            )
            .await?;

        let outcome = match resolution {
            Resolution::Agent { output: run, attempts } => {
                let logs = clean_agent_logs(&run.transcript);
                match normalize_sql(&run.answer) {
                    Ok(sql) => {
                        info!("Agent produced SQL after {attempts} attempt(s)");
                        let mut outcome = self.run_sql(sql, AnswerSource::Agent).await;
                        outcome.agent_logs = Some(logs);
                        outcome
                    }
                    Err(rejection) => {
                        warn!("Agent answer is not runnable SQL ({rejection}); using direct completion");
                        let raw = self.direct_sql(question, schema).await?;
                        let mut outcome = self.resolve(&raw, AnswerSource::Fallback).await;
                        outcome.agent_answer = Some(run.answer);
                        outcome.fallback_reason = Some(rejection.to_string());
                        outcome.agent_logs = Some(logs);
                        outcome
                    }
                }
            }
            Resolution::Fallback { output: raw, cause } => {
                let mut outcome = self.resolve(&raw, AnswerSource::Fallback).await;
                outcome.fallback_reason = Some(cause.to_string());
                outcome
            }
        };

        Ok(QuerySession {
            question: question.to_string(),
            outcome: Some(outcome),
        })
    }

    /// One completion of the SQL instruction prompt, with no agent involved.
    async fn direct_sql(&self, question: &str, schema: &str) -> Result<String, AppError> {
        let prompt = build_sql_prompt(schema, question);
        self.llm
            .complete(&prompt, &[])
            .await
            .map_err(|e| AppError::Llm(format!("SQL generation failed: {e}")))
    }

    /// Normalizes raw LLM text and runs it when accepted.
    async fn resolve(&self, raw: &str, source: AnswerSource) -> QueryOutcome {
        match normalize_sql(raw) {
            Ok(sql) => self.run_sql(sql, source).await,
            Err(rejection) => {
                warn!("Rejected generated SQL: {rejection}");
                let sanitized = sanitize_sql(raw);
                let mut outcome = QueryOutcome::new(source);
                outcome.sql = (!sanitized.is_empty()).then(|| sanitized.to_string());
                outcome.rejection = Some(rejection);
                outcome
            }
        }
    }

    async fn run_sql(&self, sql: NormalizedSql, source: AnswerSource) -> QueryOutcome {
        let mut outcome = QueryOutcome::new(source);
        match self.executor.execute(&sql).await {
            Ok(result) => {
                if result.is_empty() {
                    debug!("Generated SQL matched no rows: {sql}");
                }
                outcome.result = Some(result);
            }
            Err(e) => {
                warn!("Generated SQL failed to execute: {e}");
                outcome.error = Some(e.to_string());
            }
        }
        outcome.sql = Some(sql.into_inner());
        outcome
    }
}
