// Extractor trait — the seam between the scan cycle and the page mechanics.
//
// The cycle only ever sees an ordered batch of listings; where they came
// from (live HTTP, a fixture, a test mock) is the implementor's business.

use anyhow::Result;
use async_trait::async_trait;

use crate::db::models::Listing;

/// Produces the current page state as an ordered sequence of listings.
/// Implementations own their timeouts; a failed extraction aborts the
/// cycle and is retried on the next tick.
#[async_trait]
pub trait ListingExtractor: Send + Sync {
    async fn extract(&self) -> Result<Vec<Listing>>;
}
