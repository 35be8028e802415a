//! Bounded retry of the agent with a single fallback.

use std::future::Future;

use tracing::warn;

use crate::query::agent::AgentError;

pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// How many agent attempts to make before falling back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

/// Which path produced the output.
#[derive(Debug)]
pub enum Resolution<A, F> {
    Agent { output: A, attempts: u32 },
    Fallback { output: F, cause: AgentError },
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self { max_retries }
    }

    /// Calls `attempt(n)` for `n = 1..=max_retries`, retrying only on output
    /// parse errors. Any other agent error, or running out of attempts, hands
    /// over to `fallback` exactly once. Only the fallback's own error is
    /// returned as `Err`.
    pub async fn run<A, F, E, Att, AttFut, Fb, FbFut>(
        &self,
        mut attempt: Att,
        fallback: Fb,
    ) -> Result<Resolution<A, F>, E>
    where
        Att: FnMut(u32) -> AttFut,
        AttFut: Future<Output = Result<A, AgentError>>,
        Fb: FnOnce(&AgentError) -> FbFut,
        FbFut: Future<Output = Result<F, E>>,
    {
        let mut attempts = 0;
        let cause = loop {
            if attempts >= self.max_retries {
                break AgentError::RetriesExhausted { attempts };
            }
            attempts += 1;

            match attempt(attempts).await {
                Ok(output) => return Ok(Resolution::Agent { output, attempts }),
                Err(AgentError::OutputParse(detail)) => {
                    warn!(
                        "Agent attempt {attempts}/{} produced unparseable output: {detail}",
                        self.max_retries
                    );
                }
                Err(other) => break other,
            }
        };

        warn!("Falling back to direct completion: {cause}");
        let output = fallback(&cause).await?;
        Ok(Resolution::Fallback { output, cause })
    }
}
