//! SQLite access for the reference evaluation database
//!
//! Two uses: pulling a live schema out of `sqlite_master` for RAG prompts,
//! and executing ground-truth queries to check they are valid SQL.

use crate::error::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use tracing::debug;

pub struct EvalDb {
    pool: SqlitePool,
}

impl EvalDb {
    /// Open an existing database file. The file is not created if missing -
    /// the evaluation database is reference data, never built by this tool.
    pub async fn open(path: &Path) -> Result<Self> {
        let options = SqliteConnectOptions::new().filename(path);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        debug!("Opened evaluation database at {}", path.display());
        Ok(Self { pool })
    }

    /// Retrieve all user-table `CREATE TABLE` statements, joined with blank
    /// lines - the same shape a schema `.sql` file provides.
    pub async fn fetch_schema(&self) -> Result<String> {
        let statements: Vec<String> = sqlx::query_scalar(
            "SELECT sql FROM sqlite_master \
             WHERE type = 'table' AND sql IS NOT NULL AND name NOT LIKE 'sqlite_%'",
        )
        .fetch_all(&self.pool)
        .await?;
        debug!("Retrieved schema for {} tables", statements.len());
        Ok(statements.join("\n\n"))
    }

    /// Execute a gold query to check the database accepts it. Returns the
    /// error text on failure instead of an `Err`, so a malformed query never
    /// aborts a validation batch.
    pub async fn check_query(&self, sql: &str) -> Option<String> {
        match sqlx::query(sql).fetch_all(&self.pool).await {
            Ok(_) => None,
            Err(e) => Some(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_db() -> EvalDb {
        let options = SqliteConnectOptions::new().in_memory(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();
        EvalDb { pool }
    }

    #[tokio::test]
    async fn test_fetch_schema_lists_user_tables() {
        let db = memory_db().await;
        sqlx::query("CREATE TABLE patients (id INTEGER PRIMARY KEY, name TEXT)")
            .execute(&db.pool)
            .await
            .unwrap();
        sqlx::query("CREATE TABLE labs (id INTEGER, value REAL)")
            .execute(&db.pool)
            .await
            .unwrap();

        let schema = db.fetch_schema().await.unwrap();
        assert!(schema.contains("CREATE TABLE patients"));
        assert!(schema.contains("CREATE TABLE labs"));
        assert!(schema.contains("\n\n"));
    }

    #[tokio::test]
    async fn test_fetch_schema_empty_database() {
        let db = memory_db().await;
        assert_eq!(db.fetch_schema().await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_check_query_valid_and_invalid() {
        let db = memory_db().await;
        sqlx::query("CREATE TABLE t (x INTEGER)")
            .execute(&db.pool)
            .await
            .unwrap();

        assert!(db.check_query("SELECT x FROM t").await.is_none());
        assert!(db.check_query("SELECT nope FROM missing").await.is_some());
        assert!(db.check_query("not sql at all").await.is_some());
    }

    #[tokio::test]
    async fn test_open_missing_file_fails() {
        let tmp = tempfile::TempDir::new().unwrap();
        assert!(EvalDb::open(&tmp.path().join("absent.sqlite")).await.is_err());
    }
}
