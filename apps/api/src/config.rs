use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::llm_client::{DEFAULT_API_URL, DEFAULT_MODEL};
use crate::query::agent::DEFAULT_MAX_ITERATIONS;
use crate::query::retry::DEFAULT_MAX_RETRIES;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub resume_store_path: PathBuf,
    pub together_api_key: String,
    pub together_api_url: String,
    pub llm_model: String,
    /// Agent attempts before falling back to a direct completion.
    pub agent_max_retries: u32,
    /// Tool-use steps per agent attempt.
    pub agent_max_iterations: usize,
    pub seed_sample_data: bool,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: env_or("DATABASE_URL", "sqlite:social_media.db"),
            resume_store_path: PathBuf::from(env_or("RESUME_STORE_PATH", "resumes.json")),
            together_api_key: require_env("TOGETHER_API_KEY")?,
            together_api_url: env_or("TOGETHER_API_URL", DEFAULT_API_URL),
            llm_model: env_or("LLM_MODEL", DEFAULT_MODEL),
            agent_max_retries: parse_env("AGENT_MAX_RETRIES", DEFAULT_MAX_RETRIES)?,
            agent_max_iterations: parse_env("AGENT_MAX_ITERATIONS", DEFAULT_MAX_ITERATIONS)?,
            seed_sample_data: parse_flag(&env_or("SEED_SAMPLE_DATA", "true"))
                .context("SEED_SAMPLE_DATA must be true or false")?,
            port: parse_env("PORT", 8080)?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value: '{raw}'")),
        Err(_) => Ok(default),
    }
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("unrecognised boolean '{other}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag_accepts_common_spellings() {
        assert!(parse_flag("true").unwrap());
        assert!(parse_flag(" YES ").unwrap());
        assert!(parse_flag("1").unwrap());
        assert!(!parse_flag("off").unwrap());
        assert!(!parse_flag("False").unwrap());
    }

    #[test]
    fn test_parse_flag_rejects_garbage() {
        assert!(parse_flag("maybe").is_err());
    }

    #[test]
    fn test_parse_env_uses_default_when_unset() {
        let value: u32 = parse_env("EXTRACTOR_API_TEST_UNSET_VARIABLE", 7).unwrap();
        assert_eq!(value, 7);
    }
}
