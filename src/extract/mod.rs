//! SQL extraction from raw model completions
//!
//! Completion servers rarely return a bare query: the statement arrives
//! wrapped in prose, markdown fences, or trailing commentary. Extraction
//! runs an ordered rule cascade and returns the first candidate produced.
//! An empty string means no statement could be recovered; callers treat
//! that as a failed extraction, never as an error.

use regex::Regex;
use std::sync::OnceLock;

fn sql_fence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)```sql\s*(.*?)\s*```").unwrap())
}

fn any_fence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)```\s*(.*?)\s*```").unwrap())
}

/// One extraction rule. `Some` short-circuits the cascade, even when the
/// candidate is empty - a tagged fence is authoritative about its content.
type Rule = fn(&str) -> Option<String>;

const RULES: &[Rule] = &[tagged_fence, untagged_fence, trailing_select];

/// Extract the most plausible SQL statement from raw completion text.
///
/// Returns an empty string when no rule matches. Total over all string
/// inputs: never panics, performs no I/O, and is deterministic.
pub fn extract_sql(raw: &str) -> String {
    RULES.iter().find_map(|rule| rule(raw)).unwrap_or_default()
}

/// A ` ```sql ` fence (case-insensitive tag) is the most reliable format.
fn tagged_fence(text: &str) -> Option<String> {
    sql_fence_re()
        .captures(text)
        .map(|caps| caps[1].trim().to_string())
}

/// An untagged fence is accepted only when its interior reads like a query,
/// so that fenced commentary or non-SQL code is not captured by accident.
fn untagged_fence(text: &str) -> Option<String> {
    let caps = any_fence_re().captures(text)?;
    let candidate = caps[1].trim().to_string();
    if candidate.to_lowercase().starts_with("select") {
        Some(candidate)
    } else {
        None
    }
}

/// Take everything from the last `select` in the text, cut at the next fence
/// marker. Searching from the end skips SQL echoed back from the prompt.
fn trailing_select(text: &str) -> Option<String> {
    let pos = rfind_ignore_ascii_case(text, "select")?;
    let tail = &text[pos..];
    let tail = tail.split("```").next().unwrap_or(tail);
    Some(tail.trim().to_string())
}

/// Byte-wise reverse search, ASCII case-insensitive. The needle is plain
/// ASCII here, so a match always lands on a char boundary of the haystack.
fn rfind_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    let haystack = haystack.as_bytes();
    let needle = needle.as_bytes();
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    (0..=haystack.len() - needle.len())
        .rev()
        .find(|&i| haystack[i..i + needle.len()].eq_ignore_ascii_case(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_fence_wins() {
        assert_eq!(extract_sql("```sql\nSELECT 1\n```"), "SELECT 1");
    }

    #[test]
    fn test_tagged_fence_case_insensitive() {
        assert_eq!(
            extract_sql("Here you go:\n```SQL\nSELECT a FROM b\n```"),
            "SELECT a FROM b"
        );
    }

    #[test]
    fn test_tagged_fence_is_authoritative() {
        // Tagged fences win even over a later bare SELECT.
        let text = "```sql\nSELECT 1\n```\nAlternatively: select 2";
        assert_eq!(extract_sql(text), "SELECT 1");
    }

    #[test]
    fn test_untagged_fence_accepted_when_select() {
        assert_eq!(extract_sql("```\nSELECT * FROM a\n```"), "SELECT * FROM a");
    }

    #[test]
    fn test_untagged_fence_rejected_when_not_select() {
        assert_eq!(extract_sql("```\nprint('hi')\n```"), "");
    }

    #[test]
    fn test_trailing_select_scan() {
        let text = "Sure! select * from patients;\nHope that helps";
        assert_eq!(extract_sql(text), "select * from patients;\nHope that helps");
    }

    #[test]
    fn test_trailing_select_uses_last_occurrence() {
        // The echoed prompt contains a SELECT; only the final one counts.
        let text = "Given SELECT x FROM t, a better answer is:\nSELECT y FROM t";
        assert_eq!(extract_sql(text), "SELECT y FROM t");
    }

    #[test]
    fn test_trailing_select_truncates_at_fence() {
        let text = "print('no')\nselect id from labs```\nsome explanation";
        assert_eq!(extract_sql(text), "select id from labs");
    }

    #[test]
    fn test_rejected_fence_falls_through_to_trailing_scan() {
        let text = "```\nnot sql\n```\nUse select count(*) from visits";
        assert_eq!(extract_sql(text), "select count(*) from visits");
    }

    #[test]
    fn test_no_match_returns_empty() {
        assert_eq!(extract_sql("no sql here"), "");
        assert_eq!(extract_sql(""), "");
    }

    #[test]
    fn test_unmatched_fence_does_not_panic() {
        assert_eq!(extract_sql("```sql\nSELECT 1"), "SELECT 1");
    }

    #[test]
    fn test_empty_tagged_fence_short_circuits() {
        // An empty tagged fence is still authoritative: no fallback to the
        // select mentioned in the surrounding prose.
        assert_eq!(extract_sql("```sql\n```\ntry select later"), "");
    }

    #[test]
    fn test_deterministic() {
        let text = "maybe ```\nSELECT a\n``` or not";
        assert_eq!(extract_sql(text), extract_sql(text));
    }
}
