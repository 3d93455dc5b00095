// Data models — Rust structs that map to database rows.
//
// Separate from the queries so the extractor, filter, and notifier can use
// them without depending on rusqlite directly.

use serde::{Deserialize, Serialize};

/// A single vehicle ad extracted from the target page.
///
/// Identity is `id` (the absolutized post URL); every other field is
/// descriptive only and never participates in dedup decisions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: String,
    pub title: String,
    pub price: Option<String>,
    pub link: String,
    /// When this listing was first extracted (RFC 3339, UTC).
    pub first_seen: String,
}

impl Listing {
    /// Build a listing whose identity is its post URL.
    pub fn from_link(link: &str, title: &str, price: Option<String>) -> Self {
        Self {
            id: link.trim().to_string(),
            title: title.trim().to_string(),
            price,
            link: link.trim().to_string(),
            first_seen: chrono::Utc::now().to_rfc3339(),
        }
    }
}
