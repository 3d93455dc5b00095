// Database queries — all SQL for the seen-set and scan state.
//
// Every database interaction goes through this module. This keeps SQL
// contained in one place and gives the rest of the app clean Rust interfaces.
//
// Note there is deliberately no DELETE here: the seen-set grows
// monotonically so a listing can never be re-alerted.

use std::collections::HashSet;

use anyhow::Result;
use rusqlite::{params, Connection};

use super::models::Listing;

// --- Seen-set ---

/// True if this listing id has already been alerted on.
pub fn is_seen(conn: &Connection, id: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM seen_listings WHERE id = ?1",
        params![id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Record a listing as seen. Idempotent: re-adding an already-present id
/// is a no-op and keeps the original alerted_at.
pub fn mark_seen(conn: &Connection, listing: &Listing) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO seen_listings (id, title, price, link, alerted_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            listing.id,
            listing.title,
            listing.price,
            listing.link,
            listing.first_seen,
        ],
    )?;
    Ok(())
}

/// Snapshot of every seen id, for the pure novelty filter.
pub fn seen_ids(conn: &Connection) -> Result<HashSet<String>> {
    let mut stmt = conn.prepare("SELECT id FROM seen_listings")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut ids = HashSet::new();
    for row in rows {
        ids.insert(row?);
    }
    Ok(ids)
}

/// Total number of listings ever alerted on.
pub fn seen_count(conn: &Connection) -> Result<i64> {
    let count: i64 =
        conn.query_row("SELECT COUNT(*) FROM seen_listings", [], |row| row.get(0))?;
    Ok(count)
}

/// The most recently alerted listings, newest first.
pub fn recent_alerted(conn: &Connection, limit: u32) -> Result<Vec<Listing>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, price, link, alerted_at
         FROM seen_listings
         ORDER BY alerted_at DESC, rowid DESC
         LIMIT ?1",
    )?;

    let rows = stmt.query_map(params![limit], |row| {
        Ok(Listing {
            id: row.get(0)?,
            title: row.get(1)?,
            price: row.get(2)?,
            link: row.get(3)?,
            first_seen: row.get(4)?,
        })
    })?;

    let mut listings = Vec::new();
    for row in rows {
        listings.push(row?);
    }
    Ok(listings)
}

// --- Scan state ---

/// Get a scan state value by key (e.g., "last_scan_at").
pub fn get_scan_state(conn: &Connection, key: &str) -> Result<Option<String>> {
    let mut stmt = conn.prepare("SELECT value FROM scan_state WHERE key = ?1")?;
    let result = stmt.query_row(params![key], |row| row.get(0)).optional()?;
    Ok(result)
}

/// Set a scan state value (upsert).
pub fn set_scan_state(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO scan_state (key, value, updated_at)
         VALUES (?1, ?2, datetime('now'))
         ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
        params![key, value],
    )?;
    Ok(())
}

// rusqlite's optional() helper — converts "no rows" into None
use rusqlite::OptionalExtension;
