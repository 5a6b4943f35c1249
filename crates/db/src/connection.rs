use std::time::Duration;

use sqlx::sqlite::SqlitePoolOptions;

use quoteforge_core::config::DatabaseConfig;

pub type DbPool = sqlx::SqlitePool;

/// Opens a pool sized and timed from the `[database]` config section.
pub async fn connect(database: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
    connect_with_settings(&database.url, database.max_connections, database.timeout_secs).await
}

/// Pool constructor for callers that do not load a full config (tests,
/// mostly). `timeout_secs` bounds both pool acquisition and SQLite's busy
/// handler, so a locked database gives up within the configured window.
pub async fn connect_with_settings(
    database_url: &str,
    max_connections: u32,
    timeout_secs: u64,
) -> Result<DbPool, sqlx::Error> {
    let timeout = Duration::from_secs(timeout_secs.max(1));
    let busy_timeout_pragma = format!("PRAGMA busy_timeout = {}", timeout.as_millis());

    SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .acquire_timeout(timeout)
        .after_connect(move |conn, _meta| {
            let busy_timeout_pragma = busy_timeout_pragma.clone();
            Box::pin(async move {
                sqlx::query("PRAGMA foreign_keys = ON").execute(&mut *conn).await?;
                sqlx::query("PRAGMA journal_mode = WAL").execute(&mut *conn).await?;
                sqlx::query(&busy_timeout_pragma).execute(&mut *conn).await?;
                Ok(())
            })
        })
        .connect(database_url)
        .await
}

#[cfg(test)]
mod tests {
    use sqlx::Row;

    use quoteforge_core::config::DatabaseConfig;

    use super::{connect, connect_with_settings};

    #[tokio::test]
    async fn busy_timeout_tracks_the_configured_timeout() {
        let pool = connect_with_settings("sqlite::memory:", 1, 7).await.expect("pool");
        let row =
            sqlx::query("PRAGMA busy_timeout").fetch_one(&pool).await.expect("read pragma");
        let timeout_ms: i64 = row.get("timeout");
        assert_eq!(timeout_ms, 7_000);
    }

    #[tokio::test]
    async fn connect_uses_the_database_config_section() {
        let database = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            timeout_secs: 5,
        };
        let pool = connect(&database).await.expect("pool");
        sqlx::query("SELECT 1").execute(&pool).await.expect("query");
    }
}
