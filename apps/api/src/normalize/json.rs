//! JSON response normalizer: pulls the first balanced object out of an LLM
//! reply and parses it into a typed record, degrading to raw text on failure.

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::normalize::fence::strip_enclosing_fences;

/// Why a response could not be turned into a structured record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionWarning {
    /// The text has no `{`, or the first `{` is never closed.
    NoObjectFound,
    /// A span was found but it is not valid JSON for the expected schema.
    Malformed(String),
}

impl std::fmt::Display for ExtractionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractionWarning::NoObjectFound => {
                write!(f, "Could not find structured data in the LLM output. Showing raw output.")
            }
            ExtractionWarning::Malformed(reason) => write!(
                f,
                "Could not parse LLM output as JSON ({reason}). Showing raw output."
            ),
        }
    }
}

/// Result of normalizing a JSON-bearing response. Never an error: the caller
/// always gets either a record or displayable text.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonOutcome<T> {
    Parsed(T),
    Raw {
        /// Fence-stripped response text, verbatim.
        text: String,
        warning: ExtractionWarning,
    },
}

/// Returns the first balanced `{ ... }` span of `text`.
///
/// Scanning starts at the first `{`; depth goes up on `{`, down on `}`, and
/// the span ends where depth first returns to zero. Braces inside string
/// literals are counted too.
pub fn extract_first_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth: i64 = 0;
    for (offset, ch) in text[start..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Fence-strips `raw`, extracts the first balanced object and parses it as `T`.
pub fn extract_and_parse<T: DeserializeOwned>(raw: &str) -> JsonOutcome<T> {
    let cleaned = strip_enclosing_fences(raw);

    let Some(span) = extract_first_json_object(cleaned) else {
        return JsonOutcome::Raw {
            text: cleaned.to_string(),
            warning: ExtractionWarning::NoObjectFound,
        };
    };
    debug!("Extracted JSON span ({} bytes)", span.len());

    match serde_json::from_str::<T>(span) {
        Ok(record) => JsonOutcome::Parsed(record),
        Err(e) => JsonOutcome::Raw {
            text: cleaned.to_string(),
            warning: ExtractionWarning::Malformed(e.to_string()),
        },
    }
}
