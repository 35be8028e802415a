//! Axum route handlers for the Resume API.

use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::normalize::json::JsonOutcome;
use crate::resume::extractor::extract_resume;
use crate::resume::models::ResumeRecord;
use crate::resume::pdf::extract_pdf_text;
use crate::resume::store::{all_skills, filter_by_skills};
use crate::resume::summary::render_summary;
use crate::state::AppState;

const UPLOAD_FIELD: &str = "file";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ExtractTextRequest {
    pub resume_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractStatus {
    Parsed,
    Raw,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub status: ExtractStatus,
    pub record: Option<ResumeRecord>,
    pub summary: Option<String>,
    /// Cleaned LLM output, present when no record could be parsed.
    pub raw_text: Option<String>,
    pub warning: Option<String>,
}

impl From<JsonOutcome<ResumeRecord>> for ExtractResponse {
    fn from(outcome: JsonOutcome<ResumeRecord>) -> Self {
        match outcome {
            JsonOutcome::Parsed(record) => ExtractResponse {
                status: ExtractStatus::Parsed,
                summary: Some(render_summary(&record)),
                record: Some(record),
                raw_text: None,
                warning: None,
            },
            JsonOutcome::Raw { text, warning } => ExtractResponse {
                status: ExtractStatus::Raw,
                record: None,
                summary: None,
                raw_text: Some(text),
                warning: Some(warning.to_string()),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub saved: bool,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Comma-separated skills; a resume must have all of them.
    pub skills: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SavedResume {
    pub record: ResumeRecord,
    pub summary: String,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub total: usize,
    pub matched: usize,
    pub all_skills: Vec<String>,
    pub resumes: Vec<SavedResume>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes/extract
pub async fn handle_extract_pdf(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ExtractResponse>, AppError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() == Some(UPLOAD_FIELD) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Could not read upload: {e}")))?;
            upload = Some(bytes);
            break;
        }
    }

    let bytes = upload
        .ok_or_else(|| AppError::Validation(format!("Missing '{UPLOAD_FIELD}' field")))?;
    let text = extract_pdf_text(bytes).await?;
    let outcome = extract_resume(&text, state.extraction_llm.as_ref()).await?;
    Ok(Json(outcome.into()))
}

/// POST /api/v1/resumes/extract/text
pub async fn handle_extract_text(
    State(state): State<AppState>,
    Json(req): Json<ExtractTextRequest>,
) -> Result<Json<ExtractResponse>, AppError> {
    let outcome = extract_resume(&req.resume_text, state.extraction_llm.as_ref()).await?;
    Ok(Json(outcome.into()))
}

/// POST /api/v1/resumes
pub async fn handle_save_resume(
    State(state): State<AppState>,
    Json(record): Json<ResumeRecord>,
) -> Result<(StatusCode, Json<SaveResponse>), AppError> {
    let total = state.store.append(record).await?;
    Ok((StatusCode::CREATED, Json(SaveResponse { saved: true, total })))
}

/// GET /api/v1/resumes?skills=a,b
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Result<Json<ListResponse>, AppError> {
    let records = state.store.load().await?;
    let selected = parse_skill_list(params.skills.as_deref());

    let resumes: Vec<SavedResume> = filter_by_skills(&records, &selected)
        .into_iter()
        .map(|record| SavedResume {
            summary: render_summary(record),
            record: record.clone(),
        })
        .collect();

    Ok(Json(ListResponse {
        total: records.len(),
        matched: resumes.len(),
        all_skills: all_skills(&records),
        resumes,
    }))
}

/// GET /api/v1/resumes/skills
pub async fn handle_list_skills(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, AppError> {
    let records = state.store.load().await?;
    Ok(Json(all_skills(&records)))
}

fn parse_skill_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::json::ExtractionWarning;

    #[test]
    fn test_parse_skill_list() {
        assert_eq!(
            parse_skill_list(Some(" Python, SQL ,,")),
            vec!["Python".to_string(), "SQL".to_string()]
        );
        assert!(parse_skill_list(None).is_empty());
        assert!(parse_skill_list(Some("")).is_empty());
    }

    #[test]
    fn test_parsed_outcome_carries_record_and_summary() {
        let response = ExtractResponse::from(JsonOutcome::Parsed(ResumeRecord {
            name: Some("A".into()),
            ..Default::default()
        }));
        assert_eq!(response.status, ExtractStatus::Parsed);
        assert!(response.summary.unwrap().contains("**Name:** A"));
        assert!(response.raw_text.is_none());
    }

    #[test]
    fn test_raw_outcome_carries_text_and_warning() {
        let response = ExtractResponse::from(JsonOutcome::<ResumeRecord>::Raw {
            text: "no data".into(),
            warning: ExtractionWarning::NoObjectFound,
        });
        assert_eq!(response.status, ExtractStatus::Raw);
        assert!(response.record.is_none());
        assert_eq!(response.raw_text.as_deref(), Some("no data"));
        assert!(response.warning.is_some());
    }
}
