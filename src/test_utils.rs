pub mod test_helpers {
    use std::sync::Arc;

    use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

    use crate::config::AppConfig;
    use crate::db;
    use crate::state::AppState;

    /// Fresh in-memory SQLite with the schema applied. Capped at a single
    /// connection because every `sqlite::memory:` connection is its own
    /// database.
    pub async fn create_test_pool() -> anyhow::Result<SqlitePool> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        db::init_schema(&pool).await?;
        Ok(pool)
    }

    /// App state over a fresh in-memory store, for driving the router in
    /// tests without binding a listener.
    pub async fn create_test_state() -> anyhow::Result<AppState> {
        let pool = create_test_pool().await?;
        let config = Arc::new(AppConfig {
            database_url: "sqlite::memory:".into(),
            host: "127.0.0.1".into(),
            port: 0,
        });
        Ok(AppState::from_parts(pool, config))
    }
}
