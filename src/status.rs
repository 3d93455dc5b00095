// System status display — DB stats, last scan time, recent alerts.

use std::sync::Arc;

use anyhow::Result;

use crate::db::SeenStore;
use crate::pipeline::cycle::{STATE_LAST_NEW_COUNT, STATE_LAST_SCAN_AT};

/// Display system status to the terminal.
/// The caller checks the database exists before opening the store.
pub async fn show(store: &Arc<dyn SeenStore>, db_path: &str) -> Result<()> {
    let file_size = std::fs::metadata(db_path)
        .map(|m| format_bytes(m.len()))
        .unwrap_or_else(|_| "unknown".to_string());
    println!("Database: {} ({})", db_path, file_size);

    let seen = store.seen_count().await?;
    println!("Seen listings: {seen} alerted on so far");

    match store.get_scan_state(STATE_LAST_SCAN_AT).await? {
        Some(last_scan) => {
            println!("Last scan: {last_scan}");
            if let Some(count) = store.get_scan_state(STATE_LAST_NEW_COUNT).await? {
                println!("  New listings that cycle: {count}");
            }
        }
        None => println!("Last scan: never"),
    }

    let recent = store.recent_alerted(5).await?;
    if recent.is_empty() {
        println!("Recent alerts: none yet");
        println!("  Run `adwatch scan` to check for new listings");
    } else {
        println!("Recent alerts: {} most recent:", recent.len());
        for listing in &recent {
            println!(
                "  {} ({})",
                crate::output::truncate_chars(&listing.title, 60),
                listing.first_seen.get(..10).unwrap_or(&listing.first_seen),
            );
        }
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
