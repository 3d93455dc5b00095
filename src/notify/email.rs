// Email notifier — SMTP delivery via lettre.
//
// One message per novel listing, over implicit TLS (port 465 by default).
// Delivery failure surfaces as an error so the cycle leaves the listing
// unmarked and retries it next tick: at-least-once, never lost.

use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use super::traits::Notifier;
use crate::config::SmtpConfig;
use crate::db::models::Listing;

pub struct EmailNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl EmailNotifier {
    /// Build the transport from config. Call `Config::require_smtp` first;
    /// this only fails on malformed addresses or hostnames.
    pub fn new(config: &SmtpConfig) -> Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .with_context(|| format!("Invalid SMTP_HOST: {}", config.host))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        let from = config
            .from
            .parse::<Mailbox>()
            .with_context(|| format!("Invalid SMTP_FROM address: {}", config.from))?;
        let to = config
            .to
            .parse::<Mailbox>()
            .with_context(|| format!("Invalid SMTP_TO address: {}", config.to))?;

        Ok(Self {
            transport,
            from,
            to,
        })
    }

    fn build_message(&self, listing: &Listing) -> Result<Message> {
        Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(format!("New listing: {}", listing.title))
            .header(ContentType::TEXT_HTML)
            .body(render_body(listing))
            .context("Failed to build alert email")
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn notify(&self, listing: &Listing) -> Result<()> {
        let message = self.build_message(listing)?;
        self.transport
            .send(message)
            .await
            .with_context(|| format!("SMTP delivery failed for {}", listing.id))?;
        debug!(id = %listing.id, "Alert email sent");
        Ok(())
    }
}

/// HTML body: linked title plus price, nothing else.
fn render_body(listing: &Listing) -> String {
    let price = listing
        .price
        .as_deref()
        .map(|p| format!(" <b>{}</b>", escape_html(p)))
        .unwrap_or_default();
    format!(
        "<h3>New listing detected:</h3>\
         <ul><li><a href='{}'>{}</a>{}</li></ul>",
        escape_html(&listing.link),
        escape_html(&listing.title),
        price,
    )
}

/// Escape text for interpolation into HTML, including quoted attribute
/// values. URL parsing leaves quotes intact, so a link scraped off the
/// page cannot be trusted inside href='...' without this.
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
