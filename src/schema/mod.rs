//! Schema pruning
//!
//! Given a schema's `CREATE TABLE` statements and a natural-language
//! question, select the statements whose table name occurs in the question.
//! The relevance test is a bare case-folded substring match. That is
//! deliberately permissive - short table names over-match - and downstream
//! evaluation is tuned to exactly this heuristic, so keep it as is.

use regex::Regex;
use std::sync::OnceLock;

fn statement_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)CREATE TABLE.+?;").unwrap())
}

fn table_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // The name is the first whitespace/paren-delimited token after the
    // keyword, with an optional IF NOT EXISTS in between.
    RE.get_or_init(|| {
        Regex::new(r"(?i)CREATE TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?([^\s(]+)").unwrap()
    })
}

/// Split raw schema text into individual `CREATE TABLE ... ;` statements.
///
/// Each statement runs from the keyword to the first following semicolon.
/// Text between statements (comments, indexes, inserts) is ignored.
pub fn split_statements(schema_sql: &str) -> Vec<String> {
    statement_re()
        .find_iter(schema_sql)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Extract the table name from a `CREATE TABLE` statement.
///
/// Returns `None` when no name can be found; such statements are excluded
/// from pruning rather than reported as errors.
pub fn table_name(statement: &str) -> Option<String> {
    table_name_re()
        .captures(statement)
        .map(|caps| caps[1].to_string())
}

/// Select the statements relevant to `question`, in document order.
///
/// A statement is relevant when its case-folded table name appears as a
/// substring of the case-folded question. Each statement is included at
/// most once. No relevant table yields an empty vec, never the full input;
/// callers decide whether to fall back to the whole schema.
pub fn prune(statements: &[String], question: &str) -> Vec<String> {
    let question = question.to_lowercase();
    statements
        .iter()
        .filter(|stmt| {
            table_name(stmt)
                .map(|name| question.contains(&name.to_lowercase()))
                .unwrap_or(false)
        })
        .cloned()
        .collect()
}

/// Split a raw schema blob and prune it against `question` in one step.
pub fn prune_schema(schema_sql: &str, question: &str) -> Vec<String> {
    prune(&split_statements(schema_sql), question)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = "CREATE TABLE patients (id int);\nCREATE TABLE labs (id int);";

    #[test]
    fn test_split_statements() {
        let stmts = split_statements(SCHEMA);
        assert_eq!(stmts.len(), 2);
        assert_eq!(stmts[0], "CREATE TABLE patients (id int);");
        assert_eq!(stmts[1], "CREATE TABLE labs (id int);");
    }

    #[test]
    fn test_split_multiline_statement() {
        let sql = "CREATE TABLE admissions (\n  id int,\n  subject_id int\n);\n";
        let stmts = split_statements(sql);
        assert_eq!(stmts.len(), 1);
        assert!(stmts[0].ends_with(';'));
    }

    #[test]
    fn test_split_skips_surrounding_text() {
        let sql = "-- schema dump\nCREATE TABLE a (x int);\nCREATE INDEX idx ON a(x);";
        let stmts = split_statements(sql);
        assert_eq!(stmts, vec!["CREATE TABLE a (x int);".to_string()]);
    }

    #[test]
    fn test_table_name() {
        assert_eq!(
            table_name("CREATE TABLE patients (id int);").as_deref(),
            Some("patients")
        );
        assert_eq!(
            table_name("create table Labs(id int);").as_deref(),
            Some("Labs")
        );
    }

    #[test]
    fn test_table_name_if_not_exists() {
        assert_eq!(
            table_name("CREATE TABLE IF NOT EXISTS labs (id int);").as_deref(),
            Some("labs")
        );
    }

    #[test]
    fn test_table_name_unparsable() {
        assert_eq!(table_name("CREATE TABLE (id int);"), None);
    }

    #[test]
    fn test_prune_matches_question() {
        let pruned = prune_schema(SCHEMA, "how many patients");
        assert_eq!(pruned, vec!["CREATE TABLE patients (id int);".to_string()]);
    }

    #[test]
    fn test_prune_is_case_insensitive() {
        let sql = "CREATE TABLE Patients (id int);";
        let pruned = prune_schema(sql, "count the PATIENTS admitted in 2019");
        assert_eq!(pruned.len(), 1);
    }

    #[test]
    fn test_prune_no_match_is_empty_not_full() {
        let pruned = prune_schema(SCHEMA, "what is the weather like");
        assert!(pruned.is_empty());
    }

    #[test]
    fn test_prune_preserves_document_order() {
        let sql = "CREATE TABLE labs (id int);\nCREATE TABLE patients (id int);";
        let pruned = prune_schema(sql, "patients with labs");
        assert_eq!(
            pruned,
            vec![
                "CREATE TABLE labs (id int);".to_string(),
                "CREATE TABLE patients (id int);".to_string(),
            ]
        );
    }

    #[test]
    fn test_prune_if_not_exists_matches_table_name() {
        let sql = "CREATE TABLE IF NOT EXISTS patients (id int);";
        let pruned = prune_schema(sql, "how many patients");
        assert_eq!(pruned.len(), 1);
    }

    #[test]
    fn test_prune_includes_each_statement_once() {
        // "labs" matches the question twice; the statement appears once.
        let sql = "CREATE TABLE labs (id int);";
        let pruned = prune_schema(sql, "labs and more labs");
        assert_eq!(pruned.len(), 1);
    }

    #[test]
    fn test_prune_substring_heuristic_overmatches_short_names() {
        // Accepted limitation: "id" is a substring of "midnight".
        let sql = "CREATE TABLE id (x int);";
        let pruned = prune_schema(sql, "events around midnight");
        assert_eq!(pruned.len(), 1);
    }

    #[test]
    fn test_prune_malformed_schema_does_not_panic() {
        assert!(prune_schema("CREATE TABLE", "anything").is_empty());
        assert!(prune_schema("", "anything").is_empty());
        assert!(prune_schema("garbage ;;; text", "anything").is_empty());
    }

    #[test]
    fn test_prune_idempotent() {
        let first = prune_schema(SCHEMA, "how many patients");
        let second = prune(&first, "how many patients");
        assert_eq!(first, second);
    }
}
