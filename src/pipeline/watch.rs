// Watch loop — fixed-interval scanning until externally terminated.
//
// Two states by construction: waiting on the ticker, or running one cycle.
// The cycle is awaited before the ticker is polled again, so scans never
// overlap, and MissedTickBehavior::Skip drops any tick that would have
// fired while a slow cycle was still running instead of bursting to catch
// up. A stuck cycle therefore just delays the next one.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use super::cycle;
use crate::db::SeenStore;
use crate::extract::ListingExtractor;
use crate::notify::Notifier;

/// Scan at a fixed interval until ctrl-c. The first scan runs immediately.
/// Cycle failures are logged and retried on the next tick, never fatal.
pub async fn run(
    extractor: &dyn ListingExtractor,
    notifier: &dyn Notifier,
    store: &Arc<dyn SeenStore>,
    poll_interval: Duration,
    dry_run: bool,
) -> Result<()> {
    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(interval_secs = poll_interval.as_secs(), "Watching for new listings");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match cycle::run(extractor, notifier, store, dry_run).await {
                    Ok(outcome) if !outcome.fresh.is_empty() => {
                        println!(
                            "  {} new listing(s), {} notified, {} failed",
                            outcome.fresh.len(), outcome.notified, outcome.failed
                        );
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!(error = %e, "Scan cycle failed, retrying on next tick");
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                return Ok(());
            }
        }
    }
}
