//! ReAct-style SQL agent.
//!
//! Each step asks the LLM for either a tool call (`Action:` / `Action Input:`)
//! or a `Final Answer:`. Tool results are appended to the scratchpad as
//! `Observation:` lines and the prompt is sent again, up to `max_iterations`.

use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::llm_client::{LlmError, TextCompletion};
use crate::normalize::sql::normalize_sql;
use crate::query::executor::SqlExecutor;
use crate::query::prompts::{build_checker_prompt, build_explainer_prompt, build_react_prompt};
use crate::query::schema::{describe_schema, list_tables};

pub const DEFAULT_MAX_ITERATIONS: usize = 8;
/// Stop sequence for every agent completion; the LLM must not write observations itself.
pub const OBSERVATION_STOP: &str = "\nObservation:";
const FINAL_ANSWER: &str = "Final Answer:";

static ACTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)Action\s*\d*\s*:[\s]*(.*?)[\s]*Action\s*\d*\s*Input\s*\d*\s*:[\s]*(.*)")
        .expect("action pattern is valid")
});

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Could not parse LLM output: {0}")]
    OutputParse(String),

    #[error("Agent stopped after {0} iterations without a final answer")]
    IterationLimit(usize),

    #[error("Failed to parse LLM output after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },

    #[error("LLM call failed: {0}")]
    Llm(#[from] LlmError),
}

/// A finished agent run: the final answer text and a readable step log.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentRun {
    pub answer: String,
    pub transcript: String,
}

#[async_trait]
pub trait QueryAgent: Send + Sync {
    /// Answers `question` against the database described by `schema`.
    async fn run(&self, question: &str, schema: &str) -> Result<AgentRun, AgentError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tool {
    Query,
    Schema,
    ListTables,
    QueryChecker,
    QueryExplainer,
}

impl Tool {
    const ALL: [Tool; 5] = [
        Tool::Query,
        Tool::Schema,
        Tool::ListTables,
        Tool::QueryChecker,
        Tool::QueryExplainer,
    ];

    fn name(self) -> &'static str {
        match self {
            Tool::Query => "sql_db_query",
            Tool::Schema => "sql_db_schema",
            Tool::ListTables => "sql_db_list_tables",
            Tool::QueryChecker => "sql_db_query_checker",
            Tool::QueryExplainer => "QueryExplainer",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Tool::Query => {
                "Input to this tool is a detailed and correct SQL query, output is a result from the database. \
                 If the query is not correct, an error message will be returned. \
                 If an error is returned, rewrite the query, check the query, and try again. \
                 If you encounter an issue with an unknown column, use sql_db_schema to query the correct table fields."
            }
            Tool::Schema => {
                "Input to this tool is a comma-separated list of tables, output is the schema and sample rows for those tables. \
                 Be sure that the tables actually exist by calling sql_db_list_tables first! \
                 Example Input: table1, table2, table3"
            }
            Tool::ListTables => {
                "Input is an empty string, output is a comma-separated list of tables in the database."
            }
            Tool::QueryChecker => {
                "Use this tool to double check if your query is correct before executing it. \
                 Always use this tool before executing a query with sql_db_query!"
            }
            Tool::QueryExplainer => {
                "Use this tool when the user's question is vague, emotional, or subjective. \
                 This tool helps clarify terms like 'negative', 'frequent', 'popular', etc. \
                 Input should be the raw user question. The tool explains how to interpret the query clearly."
            }
        }
    }

    fn from_name(name: &str) -> Option<Tool> {
        Tool::ALL.into_iter().find(|t| t.name() == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AgentStep {
    Action { tool: String, input: String },
    Finish(String),
}

fn parse_step(text: &str) -> Result<AgentStep, AgentError> {
    let action = ACTION_RE.captures(text);
    let final_answer = text.find(FINAL_ANSWER);

    match (action, final_answer) {
        (Some(_), Some(_)) => Err(AgentError::OutputParse(
            "LLM output contains both a final answer and an action".to_string(),
        )),
        (Some(caps), None) => Ok(AgentStep::Action {
            tool: caps[1].trim().to_string(),
            input: caps[2].trim().trim_matches('"').to_string(),
        }),
        (None, Some(idx)) => Ok(AgentStep::Finish(
            text[idx + FINAL_ANSWER.len()..].trim().to_string(),
        )),
        (None, None) => Err(AgentError::OutputParse(format!(
            "no action or final answer in `{}`",
            text.trim()
        ))),
    }
}

/// Drops anything the LLM wrote from its own `Observation:` onwards.
fn cut_at_observation(reply: &str) -> &str {
    reply.split(OBSERVATION_STOP).next().unwrap_or(reply)
}

/// Agent with the SQL toolkit plus the query explainer.
pub struct SqlAgent {
    llm: Arc<dyn TextCompletion>,
    executor: Arc<dyn SqlExecutor>,
    db: SqlitePool,
    max_iterations: usize,
}

impl SqlAgent {
    pub fn new(
        llm: Arc<dyn TextCompletion>,
        executor: Arc<dyn SqlExecutor>,
        db: SqlitePool,
    ) -> Self {
        Self {
            llm,
            executor,
            db,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Runs one tool. Only a failed LLM call is an error; everything else the
    /// agent should see becomes observation text.
    async fn invoke_tool(&self, name: &str, input: &str) -> Result<String, AgentError> {
        let Some(tool) = Tool::from_name(name) else {
            let names: Vec<&str> = Tool::ALL.iter().map(|t| t.name()).collect();
            return Ok(format!(
                "{name} is not a valid tool, try one of [{}].",
                names.join(", ")
            ));
        };

        let observation = match tool {
            Tool::Query => match normalize_sql(input) {
                Ok(sql) => match self.executor.execute(&sql).await {
                    Ok(result) => result.to_observation(),
                    Err(e) => format!("Error: {e}"),
                },
                Err(rejection) => format!("Error: {rejection}"),
            },
            Tool::Schema => {
                let names: Vec<String> = input
                    .split(',')
                    .map(|s| s.trim().trim_matches('"').to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
                match describe_schema(&self.db, Some(&names)).await {
                    Ok(schema) if schema.is_empty() => {
                        format!("Error: table_names {names:?} not found in database")
                    }
                    Ok(schema) => schema,
                    Err(e) => format!("Error: {e}"),
                }
            }
            Tool::ListTables => match list_tables(&self.db).await {
                Ok(tables) => tables.join(", "),
                Err(e) => format!("Error: {e}"),
            },
            Tool::QueryChecker => self
                .llm
                .complete(&build_checker_prompt(input), &[])
                .await?
                .trim()
                .to_string(),
            Tool::QueryExplainer => self
                .llm
                .complete(&build_explainer_prompt(input), &[])
                .await?
                .trim()
                .to_string(),
        };
        Ok(observation)
    }
}

#[async_trait]
impl QueryAgent for SqlAgent {
    async fn run(&self, question: &str, schema: &str) -> Result<AgentRun, AgentError> {
        let tools: Vec<(&str, &str)> = Tool::ALL
            .iter()
            .map(|t| (t.name(), t.description()))
            .collect();
        let mut scratchpad = String::new();
        let mut transcript = format!("Question: {question}\n");

        for step in 1..=self.max_iterations {
            let prompt = build_react_prompt(schema, question, &tools, &scratchpad);
            let reply = self.llm.complete(&prompt, &[OBSERVATION_STOP]).await?;
            let reply = cut_at_observation(&reply);
            transcript.push_str(&format!("Thought:{reply}\n"));

            match parse_step(reply)? {
                AgentStep::Finish(answer) => {
                    info!("Agent finished after {step} step(s)");
                    return Ok(AgentRun { answer, transcript });
                }
                AgentStep::Action { tool, input } => {
                    debug!("Agent step {step}: {tool}({input})");
                    let observation = self.invoke_tool(&tool, &input).await?;
                    transcript.push_str(&format!("Observation: {observation}\n"));
                    scratchpad.push_str(reply);
                    scratchpad.push_str(&format!("\nObservation: {observation}\nThought:"));
                }
            }
        }

        warn!(
            "Agent hit the iteration limit ({}) without a final answer",
            self.max_iterations
        );
        Err(AgentError::IterationLimit(self.max_iterations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::seed::init_schema;
    use crate::llm_client::testing::ScriptedCompletion;
    use crate::query::executor::SqliteExecutor;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn seeded_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        init_schema(&pool).await.unwrap();
        sqlx::query("INSERT INTO Users (username, password, gmail, age, gender) VALUES ('john_doe', 'pw', 'john@gmail.com', 28, 'M')")
            .execute(&pool)
            .await
            .unwrap();
        pool
    }

    async fn agent_with(llm: Arc<ScriptedCompletion>) -> SqlAgent {
        let pool = seeded_pool().await;
        SqlAgent::new(llm, Arc::new(SqliteExecutor::new(pool.clone())), pool)
    }

    #[test]
    fn test_parse_action_step() {
        let step = parse_step(" I need the count.\nAction: sql_db_query\nAction Input: \"SELECT 1\"").unwrap();
        assert_eq!(
            step,
            AgentStep::Action {
                tool: "sql_db_query".into(),
                input: "SELECT 1".into()
            }
        );
    }

    #[test]
    fn test_parse_final_answer() {
        let step = parse_step(" I now know the final answer\nFinal Answer: SELECT * FROM Users").unwrap();
        assert_eq!(step, AgentStep::Finish("SELECT * FROM Users".into()));
    }

    #[test]
    fn test_parse_rejects_both_or_neither() {
        assert!(matches!(
            parse_step("Action: sql_db_query\nAction Input: SELECT 1\nFinal Answer: 1"),
            Err(AgentError::OutputParse(_))
        ));
        assert!(matches!(
            parse_step("The answer is probably SELECT 1"),
            Err(AgentError::OutputParse(_))
        ));
    }

    #[test]
    fn test_cut_at_observation_drops_invented_results() {
        assert_eq!(
            cut_at_observation("Action: sql_db_list_tables\nAction Input: \nObservation: Users"),
            "Action: sql_db_list_tables\nAction Input: "
        );
    }

    #[tokio::test]
    async fn test_run_executes_tool_then_finishes() {
        let llm = Arc::new(ScriptedCompletion::new([
            " I should count the users.\nAction: sql_db_query\nAction Input: SELECT COUNT(*) AS total FROM Users",
            " I now know the final answer\nFinal Answer: SELECT COUNT(*) AS total FROM Users",
        ]));
        let agent = agent_with(llm.clone()).await;

        let run = agent.run("How many users?", "schema").await.unwrap();
        assert_eq!(run.answer, "SELECT COUNT(*) AS total FROM Users");
        assert!(run.transcript.contains("Observation: total\n1"));

        let prompts = llm.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[1].contains("\nObservation: total\n1\nThought:"));
    }

    #[tokio::test]
    async fn test_query_tool_rejects_writes_without_executing() {
        let llm = Arc::new(ScriptedCompletion::new([
            " Remove them.\nAction: sql_db_query\nAction Input: DROP TABLE Users",
            " Final Answer: SELECT * FROM Users",
        ]));
        let agent = agent_with(llm.clone()).await;

        let run = agent.run("Delete users", "schema").await.unwrap();
        assert!(run.transcript.contains("Observation: Error: LLM output does not appear to be a valid SELECT"));

        let tables = list_tables(&agent.db).await.unwrap();
        assert!(tables.contains(&"Users".to_string()));
    }

    #[tokio::test]
    async fn test_schema_and_list_tables_tools() {
        let agent = agent_with(Arc::new(ScriptedCompletion::new(Vec::<String>::new()))).await;

        let tables = agent.invoke_tool("sql_db_list_tables", "").await.unwrap();
        assert_eq!(tables, "Comments, Posts, Users");

        let schema = agent.invoke_tool("sql_db_schema", "Users").await.unwrap();
        assert!(schema.contains("username TEXT NOT NULL"));

        let missing = agent.invoke_tool("sql_db_schema", "Likes").await.unwrap();
        assert!(missing.starts_with("Error: table_names"));
    }

    #[tokio::test]
    async fn test_unknown_tool_lists_valid_tools() {
        let agent = agent_with(Arc::new(ScriptedCompletion::new(Vec::<String>::new()))).await;
        let observation = agent.invoke_tool("python_repl", "1+1").await.unwrap();
        assert!(observation.starts_with("python_repl is not a valid tool"));
        assert!(observation.contains("QueryExplainer"));
    }

    #[tokio::test]
    async fn test_explainer_tool_asks_llm() {
        let llm = Arc::new(ScriptedCompletion::new(["  'Popular' means many comments.  "]));
        let agent = agent_with(llm.clone()).await;
        let observation = agent.invoke_tool("QueryExplainer", "popular posts").await.unwrap();
        assert_eq!(observation, "'Popular' means many comments.");
        assert!(llm.prompts.lock().unwrap()[0].contains("\"popular posts\""));
    }

    #[tokio::test]
    async fn test_unparseable_reply_is_output_parse_error() {
        let llm = Arc::new(ScriptedCompletion::new(["I am not sure what to do."]));
        let agent = agent_with(llm).await;
        assert!(matches!(
            agent.run("?", "schema").await,
            Err(AgentError::OutputParse(_))
        ));
    }

    #[tokio::test]
    async fn test_iteration_limit() {
        let llm = Arc::new(ScriptedCompletion::new([
            " Action: sql_db_list_tables\nAction Input: ",
            " Action: sql_db_list_tables\nAction Input: ",
        ]));
        let agent = agent_with(llm).await.with_max_iterations(2);
        assert!(matches!(
            agent.run("?", "schema").await,
            Err(AgentError::IterationLimit(2))
        ));
    }
}
