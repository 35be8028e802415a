//! Resume extraction: resume text → prompt → LLM → normalized record.

use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::llm_client::TextCompletion;
use crate::normalize::json::{extract_and_parse, JsonOutcome};
use crate::resume::models::ResumeRecord;
use crate::resume::prompts::build_extraction_prompt;

/// Asks the LLM for structured resume data and normalizes its reply.
///
/// Only a failed LLM call is an error. A reply without usable JSON comes back
/// as `JsonOutcome::Raw` so the caller can show the text instead.
pub async fn extract_resume(
    resume_text: &str,
    llm: &dyn TextCompletion,
) -> Result<JsonOutcome<ResumeRecord>, AppError> {
    if resume_text.trim().is_empty() {
        return Err(AppError::Validation("Resume text is empty".to_string()));
    }

    let prompt = build_extraction_prompt(resume_text);
    let response = llm
        .complete(&prompt, &[])
        .await
        .map_err(|e| AppError::Llm(format!("Resume extraction failed: {e}")))?;
    debug!("Resume extraction raw response: {} chars", response.len());

    let outcome = extract_and_parse::<ResumeRecord>(&response);
    match &outcome {
        JsonOutcome::Parsed(record) => info!(
            "Extracted resume: {} skills, {} roles",
            record.skills.len(),
            record.work_experience.len()
        ),
        JsonOutcome::Raw { warning, .. } => warn!("Resume extraction fell back to raw text: {warning}"),
    }
    Ok(outcome)
}
