// SqliteStore — rusqlite backend implementing the SeenStore trait.
//
// The Connection is wrapped in tokio::sync::Mutex because Connection is !Send.
// Trait methods lock the mutex, do synchronous rusqlite work, and return.
// The lock is never held across .await points; Rust enforces this because
// MutexGuard is !Send.
//
// The free functions in queries.rs remain the single home for SQL, so their
// tests keep running against Connection directly.

use std::collections::HashSet;

use anyhow::Result;
use async_trait::async_trait;
use rusqlite::Connection;
use tokio::sync::Mutex;

use super::models::Listing;
use super::traits::SeenStore;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Wrap an already-opened rusqlite Connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

#[async_trait]
impl SeenStore for SqliteStore {
    async fn table_count(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::schema::table_count(&conn)
    }

    async fn is_seen(&self, id: &str) -> Result<bool> {
        let conn = self.conn.lock().await;
        super::queries::is_seen(&conn, id)
    }

    async fn mark_seen(&self, listing: &Listing) -> Result<()> {
        let conn = self.conn.lock().await;
        super::queries::mark_seen(&conn, listing)
    }

    async fn seen_ids(&self) -> Result<HashSet<String>> {
        let conn = self.conn.lock().await;
        super::queries::seen_ids(&conn)
    }

    async fn seen_count(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::queries::seen_count(&conn)
    }

    async fn recent_alerted(&self, limit: u32) -> Result<Vec<Listing>> {
        let conn = self.conn.lock().await;
        super::queries::recent_alerted(&conn, limit)
    }

    async fn get_scan_state(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().await;
        super::queries::get_scan_state(&conn, key)
    }

    async fn set_scan_state(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock().await;
        super::queries::set_scan_state(&conn, key, value)
    }
}
