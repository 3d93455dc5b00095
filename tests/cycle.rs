// Scan cycle behavior against an in-memory store with mock collaborators:
// dedup across cycles, intra-batch dedup, at-least-once delivery on
// notifier failure, and dry-run isolation.

use std::collections::HashSet;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;

use adwatch::db::models::Listing;
use adwatch::extract::ListingExtractor;
use adwatch::notify::Notifier;
use adwatch::pipeline::cycle;

fn listing(id: &str) -> Listing {
    Listing::from_link(id, &format!("Ad {id}"), Some("Rs. 1,000,000".to_string()))
}

/// Extractor that returns a fixed page state.
struct FixedExtractor {
    listings: Vec<Listing>,
}

#[async_trait]
impl ListingExtractor for FixedExtractor {
    async fn extract(&self) -> Result<Vec<Listing>> {
        Ok(self.listings.clone())
    }
}

/// Extractor that always fails, like a network error or selector drift.
struct BrokenExtractor;

#[async_trait]
impl ListingExtractor for BrokenExtractor {
    async fn extract(&self) -> Result<Vec<Listing>> {
        anyhow::bail!("page fetch failed")
    }
}

/// Notifier that records every delivery and fails for chosen ids.
struct RecordingNotifier {
    fail_ids: HashSet<String>,
    sent: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    fn new() -> Self {
        Self::failing_for(&[])
    }

    fn failing_for(ids: &[&str]) -> Self {
        Self {
            fail_ids: ids.iter().map(|s| s.to_string()).collect(),
            sent: Mutex::new(Vec::new()),
        }
    }

    fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, listing: &Listing) -> Result<()> {
        if self.fail_ids.contains(&listing.id) {
            anyhow::bail!("smtp refused {}", listing.id);
        }
        self.sent.lock().unwrap().push(listing.id.clone());
        Ok(())
    }
}

#[tokio::test]
async fn first_cycle_alerts_everything_and_marks_seen() {
    let store = adwatch::db::in_memory();
    let extractor = FixedExtractor {
        listings: vec![listing("A1"), listing("A2")],
    };
    let notifier = RecordingNotifier::new();

    let outcome = cycle::run(&extractor, &notifier, &store, false)
        .await
        .unwrap();

    assert_eq!(outcome.extracted, 2);
    assert_eq!(outcome.notified, 2);
    assert_eq!(outcome.failed, 0);
    assert_eq!(notifier.sent(), vec!["A1", "A2"]);
    assert!(store.is_seen("A1").await.unwrap());
    assert!(store.is_seen("A2").await.unwrap());
}

#[tokio::test]
async fn repeat_cycle_with_same_page_alerts_nothing() {
    let store = adwatch::db::in_memory();
    let extractor = FixedExtractor {
        listings: vec![listing("A1"), listing("A2")],
    };
    let notifier = RecordingNotifier::new();

    cycle::run(&extractor, &notifier, &store, false)
        .await
        .unwrap();
    let second = cycle::run(&extractor, &notifier, &store, false)
        .await
        .unwrap();

    assert_eq!(second.extracted, 2);
    assert!(second.fresh.is_empty());
    // Notifier was only ever called in the first cycle
    assert_eq!(notifier.sent().len(), 2);
}

#[tokio::test]
async fn seen_and_batch_duplicates_are_filtered() {
    // S = {A1, A2}, page = [A1, A3, A3, A4] -> alerts [A3, A4]
    let store = adwatch::db::in_memory();
    store.mark_seen(&listing("A1")).await.unwrap();
    store.mark_seen(&listing("A2")).await.unwrap();

    let extractor = FixedExtractor {
        listings: vec![listing("A1"), listing("A3"), listing("A3"), listing("A4")],
    };
    let notifier = RecordingNotifier::new();

    let outcome = cycle::run(&extractor, &notifier, &store, false)
        .await
        .unwrap();

    assert_eq!(notifier.sent(), vec!["A3", "A4"]);
    assert_eq!(outcome.notified, 2);
    assert_eq!(store.seen_count().await.unwrap(), 4);
}

#[tokio::test]
async fn failed_notification_is_retried_next_cycle() {
    let store = adwatch::db::in_memory();
    store.mark_seen(&listing("A1")).await.unwrap();
    store.mark_seen(&listing("A2")).await.unwrap();

    let extractor = FixedExtractor {
        listings: vec![listing("A1"), listing("A3"), listing("A3"), listing("A4")],
    };

    // A4's email bounces: only A3 gets marked seen
    let flaky = RecordingNotifier::failing_for(&["A4"]);
    let outcome = cycle::run(&extractor, &flaky, &store, false)
        .await
        .unwrap();

    assert_eq!(outcome.notified, 1);
    assert_eq!(outcome.failed, 1);
    assert!(store.is_seen("A3").await.unwrap());
    assert!(!store.is_seen("A4").await.unwrap());

    // Next cycle, same page state: only A4 comes back (at-least-once)
    let healthy = RecordingNotifier::new();
    let retry = cycle::run(&extractor, &healthy, &store, false)
        .await
        .unwrap();

    assert_eq!(healthy.sent(), vec!["A4"]);
    assert_eq!(retry.failed, 0);
    assert!(store.is_seen("A4").await.unwrap());
}

#[tokio::test]
async fn empty_page_mutates_nothing() {
    let store = adwatch::db::in_memory();
    let extractor = FixedExtractor { listings: vec![] };
    let notifier = RecordingNotifier::new();

    let outcome = cycle::run(&extractor, &notifier, &store, false)
        .await
        .unwrap();

    assert_eq!(outcome.extracted, 0);
    assert!(outcome.fresh.is_empty());
    assert!(notifier.sent().is_empty());
    assert_eq!(store.seen_count().await.unwrap(), 0);
}

#[tokio::test]
async fn extraction_failure_aborts_cycle_and_leaves_store_untouched() {
    let store = adwatch::db::in_memory();
    let notifier = RecordingNotifier::new();

    let result = cycle::run(&BrokenExtractor, &notifier, &store, false).await;

    assert!(result.is_err());
    assert!(notifier.sent().is_empty());
    assert_eq!(store.seen_count().await.unwrap(), 0);
    // The loop treats this as retryable: no scan state was recorded either
    assert_eq!(
        store.get_scan_state(cycle::STATE_LAST_SCAN_AT).await.unwrap(),
        None
    );
}

#[tokio::test]
async fn dry_run_notifies_but_marks_nothing() {
    let store = adwatch::db::in_memory();
    let extractor = FixedExtractor {
        listings: vec![listing("A1"), listing("A2")],
    };
    let notifier = RecordingNotifier::new();

    let outcome = cycle::run(&extractor, &notifier, &store, true)
        .await
        .unwrap();

    assert_eq!(outcome.notified, 2);
    assert_eq!(store.seen_count().await.unwrap(), 0);
    assert_eq!(
        store.get_scan_state(cycle::STATE_LAST_SCAN_AT).await.unwrap(),
        None
    );

    // A real run afterwards still alerts everything
    let real = RecordingNotifier::new();
    cycle::run(&extractor, &real, &store, false).await.unwrap();
    assert_eq!(real.sent(), vec!["A1", "A2"]);
}

#[tokio::test]
async fn scan_state_records_last_scan() {
    let store = adwatch::db::in_memory();
    let extractor = FixedExtractor {
        listings: vec![listing("A1")],
    };
    let notifier = RecordingNotifier::new();

    cycle::run(&extractor, &notifier, &store, false)
        .await
        .unwrap();

    assert!(store
        .get_scan_state(cycle::STATE_LAST_SCAN_AT)
        .await
        .unwrap()
        .is_some());
    assert_eq!(
        store
            .get_scan_state(cycle::STATE_LAST_NEW_COUNT)
            .await
            .unwrap(),
        Some("1".to_string())
    );
}
