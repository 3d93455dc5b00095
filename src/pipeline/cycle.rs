// One scan cycle: extract, filter for novelty, notify, persist.
//
// Marking order is the dedup contract: a listing is marked seen only after
// its notification succeeds. A failed send leaves the listing unmarked so
// the next cycle retries it. That makes delivery at-least-once (a crash
// between send and mark can duplicate an alert); losing alerts would be
// worse than repeating one.

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use crate::db::models::Listing;
use crate::db::SeenStore;
use crate::extract::ListingExtractor;
use crate::notify::Notifier;
use crate::novelty;

/// Scan state keys recorded after each (non-dry-run) cycle.
pub const STATE_LAST_SCAN_AT: &str = "last_scan_at";
pub const STATE_LAST_NEW_COUNT: &str = "last_new_count";

/// What one cycle did, for logging and the CLI summary.
#[derive(Debug, Default, Clone)]
pub struct CycleOutcome {
    /// Listings the extractor returned.
    pub extracted: usize,
    /// Listings that passed the novelty filter, in page order.
    pub fresh: Vec<Listing>,
    /// Alerts delivered (and marked seen).
    pub notified: usize,
    /// Alerts that failed to deliver (left unmarked, retried next cycle).
    pub failed: usize,
}

/// Run one complete extract-filter-notify-persist pass.
///
/// Extraction failure aborts the whole cycle (the caller logs it and the
/// next tick retries). Notification failures are per-listing and never
/// abort the cycle. With `dry_run` set, nothing is marked seen and no
/// scan state is written.
pub async fn run(
    extractor: &dyn ListingExtractor,
    notifier: &dyn Notifier,
    store: &Arc<dyn SeenStore>,
    dry_run: bool,
) -> Result<CycleOutcome> {
    let batch = extractor.extract().await?;

    let seen = store.seen_ids().await?;
    let fresh = novelty::filter_new(&batch, &seen);

    let mut notified = 0;
    let mut failed = 0;

    for listing in &fresh {
        match notifier.notify(listing).await {
            Ok(()) => {
                if !dry_run {
                    if let Err(e) = store.mark_seen(listing).await {
                        // Alert went out but the id didn't persist; the
                        // next cycle may repeat it (at-least-once).
                        warn!(id = %listing.id, error = %e, "Failed to record alerted listing");
                    }
                }
                notified += 1;
            }
            Err(e) => {
                warn!(id = %listing.id, error = %e, "Notification failed, will retry next cycle");
                failed += 1;
            }
        }
    }

    if !dry_run {
        let now = chrono::Utc::now().to_rfc3339();
        store.set_scan_state(STATE_LAST_SCAN_AT, &now).await?;
        store
            .set_scan_state(STATE_LAST_NEW_COUNT, &fresh.len().to_string())
            .await?;
    }

    info!(
        extracted = batch.len(),
        fresh = fresh.len(),
        notified,
        failed,
        "Scan cycle complete"
    );

    Ok(CycleOutcome {
        extracted: batch.len(),
        fresh,
        notified,
        failed,
    })
}
