//! Cleanup of agent transcripts for display.

use once_cell::sync::Lazy;
use regex::Regex;

static ANSI_ESCAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\x1B\[[0-?]*[ -/]*[@-~]").expect("ANSI pattern is valid"));
static BLANK_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("blank-line pattern is valid"));

/// Strips terminal colour codes, maps box-drawing characters to ASCII and
/// collapses runs of blank lines.
pub fn clean_agent_logs(logs: &str) -> String {
    let plain = ANSI_ESCAPE.replace_all(logs, "");
    let ascii: String = plain
        .chars()
        .map(|c| match c {
            '│' | '║' => '|',
            '─' => '-',
            '═' => '=',
            '└' | '┌' | '┐' | '┘' | '╭' | '╰' | '╯' | '╮' => '+',
            other => other,
        })
        .collect();
    BLANK_RUNS.replace_all(&ascii, "\n\n").trim().to_string()
}
