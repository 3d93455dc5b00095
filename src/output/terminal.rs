// Colored terminal output for listing tables.
//
// This module handles all terminal-specific formatting. The main.rs
// display paths delegate here.

use colored::Colorize;

use crate::db::models::Listing;
use crate::output::truncate_chars;

/// Display the listings a scan just alerted on.
pub fn display_new_listings(listings: &[Listing]) {
    if listings.is_empty() {
        println!("No new listings this cycle.");
        return;
    }

    println!(
        "\n{}",
        format!("=== {} new listing(s) ===", listings.len()).bold()
    );
    for listing in listings {
        let price = listing.price.as_deref().unwrap_or("-");
        println!(
            "  {} {} ({})",
            "+".green().bold(),
            truncate_chars(&listing.title, 60),
            price,
        );
        println!("    {}", listing.link.dimmed());
    }
}

/// Display previously alerted listings, newest first.
pub fn display_recent(listings: &[Listing]) {
    if listings.is_empty() {
        println!("No listings alerted on yet. Run `adwatch scan` first.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Recent alerts ({}) ===", listings.len()).bold()
    );
    println!(
        "  {:<62} {:>14}  {}",
        "Title".dimmed(),
        "Price".dimmed(),
        "Alerted".dimmed(),
    );
    println!("  {}", "-".repeat(96).dimmed());

    for listing in listings {
        println!(
            "  {:<62} {:>14}  {}",
            truncate_chars(&listing.title, 58),
            listing.price.as_deref().unwrap_or("-"),
            // RFC 3339 date prefix is enough here
            listing.first_seen.get(..10).unwrap_or(&listing.first_seen),
        );
    }
}
