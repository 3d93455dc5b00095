use std::env;
use std::time::Duration;

use anyhow::Result;

/// Default CSS selector for listing containers on the target page.
pub const DEFAULT_POST_SELECTOR: &str = ".item";

/// Default seconds between scan cycles.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 300;

/// Central configuration loaded from environment variables.
///
/// All secrets come from env vars (never hardcoded). The .env file
/// is loaded automatically at startup via dotenvy.
pub struct Config {
    /// The classifieds page to scan for new listings.
    pub target_url: String,
    /// CSS selector matching one listing container per ad.
    pub post_selector: String,
    /// Optional CSS selector for the price element inside a container.
    pub price_selector: Option<String>,
    /// Seconds between scan cycles in watch mode.
    pub poll_interval: Duration,
    /// Path to the seen-set SQLite file.
    pub state_path: String,
    pub smtp: SmtpConfig,
}

/// Mail transport settings. Only validated when an email notifier is
/// actually constructed, so `--dry-run`, `status`, and `recent` work
/// without any SMTP setup.
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Sender address (defaults to the username).
    pub from: String,
    /// Recipient address for alerts.
    pub to: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Only the polling interval can fail to parse here; everything else
    /// defaults to empty and is checked by the `require_*` gates before
    /// the operations that need it.
    pub fn load() -> Result<Self> {
        let poll_interval = match env::var("POLL_INTERVAL") {
            Ok(raw) => parse_poll_interval(&raw)?,
            Err(_) => Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
        };

        let port = match env::var("SMTP_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| anyhow::anyhow!("SMTP_PORT is not a valid port number: {raw}"))?,
            // Implicit-TLS submission port, same as the original alerter used.
            Err(_) => 465,
        };

        let username = env::var("SMTP_USERNAME").unwrap_or_default();
        let from = env::var("SMTP_FROM").unwrap_or_else(|_| username.clone());

        Ok(Self {
            target_url: env::var("TARGET_URL").unwrap_or_default(),
            post_selector: env::var("POST_SELECTOR")
                .unwrap_or_else(|_| DEFAULT_POST_SELECTOR.to_string()),
            price_selector: env::var("PRICE_SELECTOR").ok().filter(|s| !s.is_empty()),
            poll_interval,
            state_path: env::var("STATE_PATH").unwrap_or_else(|_| "./adwatch.db".to_string()),
            smtp: SmtpConfig {
                host: env::var("SMTP_HOST").unwrap_or_default(),
                port,
                username,
                password: env::var("SMTP_PASSWORD").unwrap_or_default(),
                from,
                to: env::var("SMTP_TO").unwrap_or_default(),
            },
        })
    }

    /// Check that the target page is configured.
    /// Call this before any operation that scans the site.
    pub fn require_target(&self) -> Result<()> {
        if self.target_url.is_empty() {
            anyhow::bail!(
                "TARGET_URL not set. Add the classifieds page URL to your .env file."
            );
        }
        Ok(())
    }

    /// Check that the mail transport is fully configured.
    /// Call this before any operation that sends real email.
    pub fn require_smtp(&self) -> Result<()> {
        let missing: Vec<&str> = [
            ("SMTP_HOST", &self.smtp.host),
            ("SMTP_USERNAME", &self.smtp.username),
            ("SMTP_PASSWORD", &self.smtp.password),
            ("SMTP_TO", &self.smtp.to),
        ]
        .iter()
        .filter(|(_, v)| v.is_empty())
        .map(|(k, _)| *k)
        .collect();

        if !missing.is_empty() {
            anyhow::bail!(
                "Missing mail settings: {}. Add them to your .env file, \
                 or pass --dry-run to print alerts instead of emailing them.",
                missing.join(", ")
            );
        }
        Ok(())
    }
}

/// Parse POLL_INTERVAL (whole seconds, must be positive).
pub fn parse_poll_interval(raw: &str) -> Result<Duration> {
    let secs: u64 = raw
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("POLL_INTERVAL is not a whole number of seconds: {raw}"))?;
    if secs == 0 {
        anyhow::bail!("POLL_INTERVAL must be at least 1 second");
    }
    Ok(Duration::from_secs(secs))
}
