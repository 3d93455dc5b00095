// Novelty filter — the one piece of real logic in the scan cycle.
//
// Pure function of (scan batch, seen-set snapshot). Performs no I/O and
// mutates nothing; the caller notifies and marks listings seen afterwards.

use std::collections::HashSet;

use crate::db::models::Listing;

/// Select the listings not yet in the seen-set.
///
/// Preserves the extractor's original ordering. A listing id present in
/// `seen` is dropped; an id repeated within the batch (the same ad
/// extracted twice) is produced at most once.
pub fn filter_new(batch: &[Listing], seen: &HashSet<String>) -> Vec<Listing> {
    let mut emitted: HashSet<&str> = HashSet::new();
    batch
        .iter()
        .filter(|listing| !seen.contains(&listing.id) && emitted.insert(listing.id.as_str()))
        .cloned()
        .collect()
}
