//! Session database (`SQLite`).
//!
//! The only persisted data is the visitor session table managed by
//! `tower-sessions-sqlx-store`, which holds each visitor's selection slot.
//! The table is created on startup.

use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tower_sessions_sqlx_store::SqliteStore;

/// Create a `SQLite` connection pool.
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string, e.g. `sqlite://advisor.db?mode=rwc`
///
/// # Errors
///
/// Returns `sqlx::Error` if the database cannot be opened.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url)
        .await
}

/// Create the session store and its table.
///
/// # Errors
///
/// Returns `sqlx::Error` if the session table cannot be created.
pub async fn create_session_store(pool: SqlitePool) -> Result<SqliteStore, sqlx::Error> {
    let store = SqliteStore::new(pool);
    store.migrate().await?;
    Ok(store)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::Session;

    use routine_advisor_core::{ProductId, SelectionSet};

    use super::*;
    use crate::services::{load_selection, save_selection};

    #[tokio::test]
    async fn test_selection_survives_in_sqlite_store() {
        let path = std::env::temp_dir().join(format!("advisor-{}.db", uuid::Uuid::new_v4()));
        let url = format!("sqlite://{}?mode=rwc", path.display());
        let pool = create_pool(&url).await.expect("pool");
        let store = Arc::new(create_session_store(pool).await.expect("store"));
        let selection = SelectionSet::from_ids([ProductId::new(5), ProductId::new(2)]);

        let session = Session::new(None, store.clone(), None);
        save_selection(&session, &selection).await.expect("save");
        session.save().await.expect("persist");
        let id = session.id().expect("session id");

        let reopened = Session::new(Some(id), store, None);
        assert_eq!(load_selection(&reopened).await, selection);

        let _ = std::fs::remove_file(path);
    }
}
