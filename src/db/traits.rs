// SeenStore trait — async interface for the seen-set.
//
// The store is passed around as an explicit `Arc<dyn SeenStore>` handle
// rather than module-level state, so the scan cycle and the novelty filter
// can be exercised against an in-memory store in tests.

use std::collections::HashSet;

use anyhow::Result;
use async_trait::async_trait;

use super::models::Listing;

#[async_trait]
pub trait SeenStore: Send + Sync {
    // --- Lifecycle ---

    /// Count the number of user-created tables in the database.
    async fn table_count(&self) -> Result<i64>;

    // --- Seen-set ---

    /// True if this listing id was previously alerted on.
    async fn is_seen(&self, id: &str) -> Result<bool>;

    /// Record a listing as seen (idempotent).
    async fn mark_seen(&self, listing: &Listing) -> Result<()>;

    /// Snapshot of every seen id for one filtering pass.
    async fn seen_ids(&self) -> Result<HashSet<String>>;

    /// Total number of listings ever alerted on.
    async fn seen_count(&self) -> Result<i64>;

    /// The most recently alerted listings, newest first.
    async fn recent_alerted(&self, limit: u32) -> Result<Vec<Listing>>;

    // --- Scan state ---

    /// Get a scan state value by key (e.g., "last_scan_at").
    async fn get_scan_state(&self, key: &str) -> Result<Option<String>>;

    /// Set a scan state value (upsert).
    async fn set_scan_state(&self, key: &str, value: &str) -> Result<()>;
}
