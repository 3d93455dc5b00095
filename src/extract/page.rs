// Page extractor — fetches the target page and pulls listings out of it
// with CSS selectors.
//
// Each element matching the post selector is one ad: its first <a> supplies
// the title (anchor text) and the link (href, absolutized against the page
// URL). The absolutized link doubles as the listing's unique id, since the
// site embeds the post id in the URL. Containers without an anchor are
// skipped. Matching zero containers is an error, not an empty page: it
// almost always means the page structure changed under the selector.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Url;
use scraper::{Html, Selector};
use tracing::debug;

use super::traits::ListingExtractor;
use crate::db::models::Listing;

/// Scrapes one classifieds page over HTTP.
pub struct PageExtractor {
    client: reqwest::Client,
    url: Url,
    post_selector: Selector,
    price_selector: Option<Selector>,
}

impl PageExtractor {
    pub fn new(url: &str, post_selector: &str, price_selector: Option<&str>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("adwatch/0.1 (new-listing alerts)")
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;

        let url = Url::parse(url.trim()).with_context(|| format!("Invalid TARGET_URL: {url}"))?;

        let post_selector = parse_selector(post_selector)
            .with_context(|| format!("Invalid POST_SELECTOR: {post_selector}"))?;

        let price_selector = match price_selector {
            Some(raw) => Some(
                parse_selector(raw).with_context(|| format!("Invalid PRICE_SELECTOR: {raw}"))?,
            ),
            None => None,
        };

        Ok(Self {
            client,
            url,
            post_selector,
            price_selector,
        })
    }
}

#[async_trait]
impl ListingExtractor for PageExtractor {
    async fn extract(&self) -> Result<Vec<Listing>> {
        debug!(url = %self.url, "Fetching listing page");

        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", self.url))?;

        if !response.status().is_success() {
            anyhow::bail!("{} returned {}", self.url, response.status());
        }

        let html = response
            .text()
            .await
            .with_context(|| format!("Failed to read body from {}", self.url))?;

        let listings = parse_listings(
            &html,
            &self.post_selector,
            self.price_selector.as_ref(),
            &self.url,
        );

        if listings.is_empty() {
            anyhow::bail!(
                "No listings matched the post selector on {} (page structure changed?)",
                self.url
            );
        }

        debug!(count = listings.len(), "Extracted listings");
        Ok(listings)
    }
}

/// Parse listings out of an already-fetched HTML document.
///
/// Split out from the HTTP path so parsing is testable against fixtures.
pub fn parse_listings(
    html: &str,
    post_selector: &Selector,
    price_selector: Option<&Selector>,
    base_url: &Url,
) -> Vec<Listing> {
    // First <a> within each matched container
    let anchor = Selector::parse("a").expect("static selector");

    let document = Html::parse_document(html);
    let mut listings = Vec::new();

    for container in document.select(post_selector) {
        let Some(link_tag) = container.select(&anchor).next() else {
            // Ad containers without a link (banners, spacers) are skipped
            continue;
        };
        let Some(href) = link_tag.value().attr("href") else {
            continue;
        };
        let Ok(link) = base_url.join(href.trim()) else {
            continue;
        };

        let title = link_tag.text().collect::<String>();
        if title.trim().is_empty() {
            continue;
        }

        let price = price_selector.and_then(|sel| {
            container
                .select(sel)
                .next()
                .map(|el| el.text().collect::<String>().trim().to_string())
                .filter(|p| !p.is_empty())
        });

        listings.push(Listing::from_link(link.as_str(), &title, price));
    }

    listings
}

/// Selector::parse's error borrows the input, so anchor it to an owned
/// message before it crosses into anyhow.
fn parse_selector(raw: &str) -> Result<Selector> {
    Selector::parse(raw.trim()).map_err(|e| anyhow::anyhow!("{e}"))
}
