//! Code-fence cleanup shared by the JSON and SQL normalizers.

/// Triple-backtick marker LLMs use to delimit code blocks.
pub const FENCE: &str = "```";

const SQL_FENCE_TAG: &str = "sql";

/// Strips fence markers that enclose the whole text.
///
/// While the trimmed text both starts and ends with a fence, one marker is
/// removed from each end and the rest is re-trimmed. A single fenced block
/// loses exactly one marker per side; the loop only matters for doubly
/// wrapped output and keeps the operation idempotent.
pub fn strip_enclosing_fences(text: &str) -> &str {
    let mut current = text.trim();
    while current.starts_with(FENCE) && current.ends_with(FENCE) {
        if current.len() < FENCE.len() * 2 {
            // Markers overlap: nothing but backticks left.
            return "";
        }
        current = current[FENCE.len()..current.len() - FENCE.len()].trim();
    }
    current
}

/// Strips a leading "```sql" (or bare "```") marker and everything from the
/// next fence onwards, trimming at each step.
pub fn strip_sql_fences(text: &str) -> &str {
    let mut current = text.trim();

    if let Some(rest) = current.strip_prefix(FENCE) {
        current = strip_sql_tag(rest).trim_start();
    }

    if let Some(end) = current.find(FENCE) {
        current = &current[..end];
    }

    current.trim()
}

/// Removes a case-insensitive `sql` language tag directly after an opening fence.
fn strip_sql_tag(rest: &str) -> &str {
    let tagged = rest
        .get(..SQL_FENCE_TAG.len())
        .is_some_and(|tag| tag.eq_ignore_ascii_case(SQL_FENCE_TAG));
    if !tagged {
        return rest;
    }
    let after = &rest[SQL_FENCE_TAG.len()..];
    // "```sqlite" is a different tag; leave it for validation to reject.
    match after.chars().next() {
        Some(c) if c.is_ascii_alphanumeric() || c == '_' => rest,
        _ => after,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_enclosing_fences_plain_block() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_enclosing_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_enclosing_fences_keeps_language_tag() {
        // Only the markers go; the JSON span scan skips the leftover tag.
        let input = "  ```json\n{\"a\": 1}\n```  ";
        assert_eq!(strip_enclosing_fences(input), "json\n{\"a\": 1}");
    }

    #[test]
    fn test_strip_enclosing_fences_requires_both_ends() {
        let input = "Here you go:\n```\n{\"a\": 1}\n```";
        assert_eq!(strip_enclosing_fences(input), input.trim());
    }

    #[test]
    fn test_strip_enclosing_fences_no_fences_only_trims() {
        assert_eq!(strip_enclosing_fences("  {\"a\": 1}\n"), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_enclosing_fences_is_idempotent() {
        let inputs = [
            "```\n{}\n```",
            "``````{\"a\":1}``````",
            "plain text",
            "```",
            "````",
            "```x```",
            "",
        ];
        for input in inputs {
            let once = strip_enclosing_fences(input);
            assert_eq!(strip_enclosing_fences(once), once, "input: {input:?}");
            assert!(!(once.starts_with(FENCE) && once.ends_with(FENCE)));
        }
    }

    #[test]
    fn test_strip_enclosing_fences_backticks_only() {
        assert_eq!(strip_enclosing_fences("```"), "");
        assert_eq!(strip_enclosing_fences("`````"), "");
        assert_eq!(strip_enclosing_fences("``````"), "");
    }

    #[test]
    fn test_strip_sql_fences_tagged_block() {
        let input = "```sql\nSELECT * FROM Users;\n```";
        assert_eq!(strip_sql_fences(input), "SELECT * FROM Users;");
    }

    #[test]
    fn test_strip_sql_fences_uppercase_tag() {
        assert_eq!(strip_sql_fences("```SQL\nSELECT 1\n```"), "SELECT 1");
    }

    #[test]
    fn test_strip_sql_fences_bare_block() {
        assert_eq!(strip_sql_fences("```\nSELECT 1\n```"), "SELECT 1");
    }

    #[test]
    fn test_strip_sql_fences_drops_commentary_after_closing_fence() {
        let input = "```sql\nSELECT name FROM Users\n```\nThis returns every name.";
        assert_eq!(strip_sql_fences(input), "SELECT name FROM Users");
    }

    #[test]
    fn test_strip_sql_fences_trailing_fence_without_opening() {
        assert_eq!(strip_sql_fences("SELECT 1```"), "SELECT 1");
    }

    #[test]
    fn test_strip_sql_fences_other_tag_is_kept() {
        assert_eq!(strip_sql_fences("```sqlite\nSELECT 1\n```"), "sqlite\nSELECT 1");
    }

    #[test]
    fn test_strip_sql_fences_plain_statement_untouched() {
        assert_eq!(strip_sql_fences("  SELECT 1  "), "SELECT 1");
    }
}
