//! SQLite pool setup and schema application.

use sqlx::sqlite::{SqliteConnection, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use tracing::{debug, info};

/// Open (or create) the database at `db_path` and bring it up to date.
///
/// Every pooled connection gets the same pragma set. The schema is written
/// with `IF NOT EXISTS` throughout, so applying it on every start is safe.
///
/// # Errors
/// Returns an error when the file cannot be opened or a schema statement
/// fails.
pub async fn init_db(db_path: &str) -> Result<SqlitePool, sqlx::Error> {
    ensure_parent_dir(db_path);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .after_connect(|conn, _meta| Box::pin(configure_connection(conn)))
        .connect(&format!("sqlite:{}?mode=rwc", db_path))
        .await?;

    apply_schema(&pool).await?;
    info!("database ready at {}", db_path);

    Ok(pool)
}

fn ensure_parent_dir(db_path: &str) {
    let parent = Path::new(db_path).parent();
    if let Some(dir) = parent.filter(|p| !p.as_os_str().is_empty()) {
        // If this fails, connect reports the missing directory anyway
        let _ = std::fs::create_dir_all(dir);
    }
}

/// Apply `schema.sql` statement by statement.
///
/// The file must hold plain statements only (no BEGIN..END blocks); it is
/// split on semicolons.
async fn apply_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let statements = include_str!("schema.sql")
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty());

    for statement in statements {
        sqlx::query(statement).execute(pool).await?;
    }

    debug!("schema applied");
    Ok(())
}

/// Pragmas applied to every pooled connection: referential integrity on,
/// writers wait instead of failing fast, WAL journaling.
async fn configure_connection(conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    use sqlx::Row;

    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&mut *conn)
        .await?;
    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&mut *conn)
        .await?;
    sqlx::query("PRAGMA synchronous = NORMAL")
        .execute(&mut *conn)
        .await?;

    // This pragma answers with the mode actually in effect
    let row = sqlx::query("PRAGMA journal_mode = WAL")
        .fetch_one(&mut *conn)
        .await?;
    let mode: String = row.get(0);
    debug!("sqlite journal_mode: {}", mode);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn open_temp_db() -> (SqlitePool, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir
            .path()
            .join("test.db")
            .to_string_lossy()
            .to_string();
        let pool = init_db(&db_path).await.expect("init_db failed");
        (pool, temp_dir)
    }

    #[tokio::test]
    async fn test_init_db_creates_file_and_answers_queries() {
        let (pool, temp) = open_temp_db().await;
        assert!(temp.path().join("test.db").exists());

        let row: (i64,) = sqlx::query_as("SELECT 1")
            .fetch_one(&pool)
            .await
            .expect("query failed");
        assert_eq!(row.0, 1);
    }

    #[tokio::test]
    async fn test_schema_creates_ledger_tables() {
        let (pool, _temp) = open_temp_db().await;

        for table in ["users", "purchases", "sales"] {
            let row: (String,) =
                sqlx::query_as("SELECT name FROM sqlite_master WHERE type='table' AND name=?")
                    .bind(table)
                    .fetch_one(&pool)
                    .await
                    .expect("query failed");
            assert_eq!(row.0, table);
        }
    }

    #[tokio::test]
    async fn test_schema_reapplies_cleanly() {
        let (pool, _temp) = open_temp_db().await;

        apply_schema(&pool).await.expect("second apply failed");
        apply_schema(&pool).await.expect("third apply failed");

        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sqlite_master WHERE type='table'")
            .fetch_one(&pool)
            .await
            .expect("query failed");
        assert!(row.0 >= 3);
    }

    #[tokio::test]
    async fn test_connection_pragmas() {
        let (pool, _temp) = open_temp_db().await;

        let fk: (i64,) = sqlx::query_as("PRAGMA foreign_keys")
            .fetch_one(&pool)
            .await
            .expect("query failed");
        assert_eq!(fk.0, 1);

        let journal: (String,) = sqlx::query_as("PRAGMA journal_mode")
            .fetch_one(&pool)
            .await
            .expect("query failed");
        // WAL can be refused on some filesystems
        assert!(
            matches!(journal.0.as_str(), "wal" | "delete"),
            "unexpected journal_mode: {}",
            journal.0
        );
    }
}
