use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use adwatch::config::Config;
use adwatch::db::SeenStore;
use adwatch::extract::PageExtractor;
use adwatch::notify::{EmailNotifier, LogNotifier, Notifier};
use adwatch::{db, output, pipeline, status};

/// Adwatch: email alerts for new classifieds listings.
///
/// Scans a classifieds page on a fixed interval and emails one alert per
/// newly posted listing, never re-alerting on a listing already recorded.
#[derive(Parser)]
#[command(name = "adwatch", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the state database
    Init,

    /// Run a single scan cycle now
    Scan {
        /// Print alerts instead of emailing, and don't mark anything seen
        #[arg(long)]
        dry_run: bool,
    },

    /// Scan repeatedly at POLL_INTERVAL until interrupted
    Watch {
        /// Print alerts instead of emailing, and don't mark anything seen
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the most recently alerted listings
    Recent {
        /// How many listings to show
        #[arg(long, default_value = "20")]
        limit: u32,
    },

    /// Show system status (seen-set size, last scan, recent alerts)
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("adwatch=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            let config = Config::load()?;
            info!("Initializing state database...");
            let store = db::initialize(&config.state_path)?;
            let table_count = store.table_count().await?;
            println!("Database initialized at: {}", config.state_path);
            println!("Tables created: {table_count}");
            println!("\nAdwatch is ready. Next step: set TARGET_URL and the SMTP_*");
            println!("variables in your .env file, then run: adwatch scan --dry-run");
        }

        Commands::Scan { dry_run } => {
            let config = Config::load()?;
            config.require_target()?;

            let (store, notifier) = prepare(&config, dry_run)?;
            let extractor = build_extractor(&config)?;

            println!("Scanning {} ...", config.target_url);

            let outcome =
                pipeline::cycle::run(&extractor, notifier.as_ref(), &store, dry_run).await?;

            if !dry_run {
                // Dry runs already printed each alert via LogNotifier
                output::terminal::display_new_listings(&outcome.fresh);
            }

            println!("\n{}", "Scan complete.".bold());
            println!("  Listings on page: {}", outcome.extracted);
            println!("  New this cycle:   {}", outcome.fresh.len());
            if dry_run {
                println!("  (dry run: nothing emailed or marked seen)");
            } else {
                println!("  Alerts sent:      {}", outcome.notified);
                if outcome.failed > 0 {
                    println!(
                        "  {} {} alert(s) failed and will retry next scan",
                        "!".yellow(),
                        outcome.failed
                    );
                }
            }
        }

        Commands::Watch { dry_run } => {
            let config = Config::load()?;
            config.require_target()?;

            let (store, notifier) = prepare(&config, dry_run)?;
            let extractor = build_extractor(&config)?;

            println!(
                "Watching {} every {}s (ctrl-c to stop)...",
                config.target_url,
                config.poll_interval.as_secs()
            );

            pipeline::watch::run(
                &extractor,
                notifier.as_ref(),
                &store,
                config.poll_interval,
                dry_run,
            )
            .await?;
        }

        Commands::Recent { limit } => {
            let config = Config::load()?;
            let Some(store) = open_existing(&config.state_path) else {
                return Ok(());
            };
            let listings = store.recent_alerted(limit).await?;
            output::terminal::display_recent(&listings);
        }

        Commands::Status => {
            let config = Config::load()?;
            let Some(store) = open_existing(&config.state_path) else {
                return Ok(());
            };
            status::show(&store, &config.state_path).await?;
        }
    }

    Ok(())
}

/// Open the store (failing open on corruption) and pick the notifier.
/// Dry runs print alerts instead of emailing and skip the SMTP checks.
fn prepare(config: &Config, dry_run: bool) -> Result<(Arc<dyn SeenStore>, Box<dyn Notifier>)> {
    let store = db::open_or_fallback(&config.state_path);

    let notifier: Box<dyn Notifier> = if dry_run {
        Box::new(LogNotifier)
    } else {
        config.require_smtp()?;
        Box::new(EmailNotifier::new(&config.smtp)?)
    };

    Ok((store, notifier))
}

/// Open the store for read-only commands without creating the file.
/// Prints guidance and returns None when the database doesn't exist yet.
fn open_existing(state_path: &str) -> Option<Arc<dyn SeenStore>> {
    match db::open_if_exists(state_path) {
        Some(store) => Some(store),
        None => {
            println!("Database: not initialized");
            println!("\nRun `adwatch init` to set up the state database.");
            None
        }
    }
}

fn build_extractor(config: &Config) -> Result<PageExtractor> {
    PageExtractor::new(
        &config.target_url,
        &config.post_selector,
        config.price_selector.as_deref(),
    )
}
