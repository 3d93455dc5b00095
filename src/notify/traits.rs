// Notifier trait — the swap-ready alert channel.
//
// The default implementation sends SMTP email. LogNotifier stands in for
// dry runs: it prints the alert instead of delivering it, and the cycle
// skips seen-set writes so a later real run still alerts.

use anyhow::Result;
use async_trait::async_trait;
use colored::Colorize;

use crate::db::models::Listing;

/// Delivers one alert per novel listing. Implementations must be async
/// because delivery is a network call.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, listing: &Listing) -> Result<()>;
}

/// Prints alerts to the terminal instead of sending them. Used by
/// `--dry-run` so a scan can be previewed without SMTP credentials.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, listing: &Listing) -> Result<()> {
        let price = listing.price.as_deref().unwrap_or("price n/a");
        println!(
            "  {} {} ({})\n      {}",
            "NEW".green().bold(),
            listing.title.bold(),
            price,
            listing.link.dimmed(),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn log_notifier_always_succeeds() {
        let listing = Listing::from_link("https://x/ad/1", "Honda Fit 2014", None);
        assert!(LogNotifier.notify(&listing).await.is_ok());
    }
}
