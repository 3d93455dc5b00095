// Seen-set storage — SQLite persistence for alerted listings and scan state.
//
// We use rusqlite with the "bundled" feature so there's no system SQLite
// dependency. The database file lives wherever STATE_PATH points
// (defaults to ./adwatch.db).

pub mod models;
pub mod queries;
pub mod schema;
pub mod sqlite;
pub mod traits;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::warn;

pub use models::Listing;
pub use traits::SeenStore;

/// Open (or create) the seen-set database and run migrations.
///
/// This is the main entry point, called by `adwatch init` and by any
/// command that needs the store.
pub fn initialize(db_path: &str) -> Result<Arc<dyn SeenStore>> {
    let conn = open_connection(db_path)?;
    Ok(Arc::new(sqlite::SqliteStore::new(conn)))
}

/// Open the store, failing open on storage trouble.
///
/// If the backing file is unreadable or corrupt, a scan should still run
/// rather than crash: we log a warning and fall back to an empty in-memory
/// store. Listings alerted against the fallback are not persisted, so a
/// later cycle with a healthy file may re-alert. That trade-off favors
/// never losing alerts.
pub fn open_or_fallback(db_path: &str) -> Arc<dyn SeenStore> {
    match open_connection(db_path) {
        Ok(conn) => Arc::new(sqlite::SqliteStore::new(conn)),
        Err(e) => {
            warn!(path = db_path, error = %e, "Seen-set store unavailable, starting empty");
            in_memory()
        }
    }
}

/// Open the store only if the backing file already exists.
///
/// Read-only commands (status, recent) go through here so they never
/// create an empty database as a side effect. None means the database
/// hasn't been initialized yet.
pub fn open_if_exists(db_path: &str) -> Option<Arc<dyn SeenStore>> {
    if !Path::new(db_path).exists() {
        return None;
    }
    Some(open_or_fallback(db_path))
}

/// An empty in-memory store. Used by the fail-open path and by tests.
pub fn in_memory() -> Arc<dyn SeenStore> {
    // open_in_memory and create_tables only fail on OOM-class conditions
    let conn = Connection::open_in_memory().expect("in-memory SQLite open cannot fail");
    schema::create_tables(&conn).expect("in-memory schema creation cannot fail");
    Arc::new(sqlite::SqliteStore::new(conn))
}

fn open_connection(db_path: &str) -> Result<Connection> {
    // Create parent directories if needed
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory for database: {db_path}"))?;
        }
    }

    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open database at {db_path}"))?;

    // Enable WAL mode for better concurrent read performance.
    // This is also where a corrupt file surfaces: the pragma touches the
    // header, so open_or_fallback can catch it and start empty.
    conn.pragma_update(None, "journal_mode", "WAL")
        .with_context(|| format!("Database at {db_path} is unreadable or corrupt"))?;

    schema::create_tables(&conn)?;

    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_or_fallback_on_corrupt_file_starts_empty() {
        let dir = std::env::temp_dir().join("adwatch-corrupt-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.db");
        // Not a SQLite file at all
        std::fs::write(&path, b"this is not a database").unwrap();

        let store = open_or_fallback(path.to_str().unwrap());
        assert_eq!(store.seen_count().await.unwrap(), 0);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_open_if_exists_does_not_create_the_file() {
        let dir = std::env::temp_dir().join("adwatch-open-if-exists-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("never-initialized.db");

        assert!(open_if_exists(path.to_str().unwrap()).is_none());
        // A read-only lookup must not leave an empty database behind
        assert!(!path.exists());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_open_if_exists_opens_initialized_store() {
        let dir = std::env::temp_dir().join("adwatch-open-existing-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("state.db");

        // Initialize first, as `adwatch init` would
        initialize(path.to_str().unwrap()).unwrap();

        let store = open_if_exists(path.to_str().unwrap()).expect("store exists");
        assert_eq!(store.seen_count().await.unwrap(), 0);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_in_memory_store_is_empty() {
        let store = in_memory();
        assert_eq!(store.seen_count().await.unwrap(), 0);
        assert!(store.seen_ids().await.unwrap().is_empty());
    }
}
