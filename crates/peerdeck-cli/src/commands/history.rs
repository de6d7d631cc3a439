//! History command implementation.

use anyhow::{Context, Result};

use peerdeck_core::ledger::{TransferLedger, TransferRecord};

use super::HistoryArgs;

/// Run the history command.
pub async fn run(args: HistoryArgs) -> Result<()> {
    let config = super::load_config();
    let mut ledger = TransferLedger::load_with_config(&config.ledger)
        .context("Failed to load transfer history")?;

    if args.clear {
        ledger.clear()?;
        println!("History cleared.");
        return Ok(());
    }

    let records = ledger.list();
    let records = match args.limit {
        Some(n) => &records[..n.min(records.len())],
        None => records,
    };

    if args.json {
        let output = serde_json::json!({ "transfers": records });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    display_history(records);
    Ok(())
}

fn display_history(records: &[TransferRecord]) {
    println!();
    println!("Recent Transfers:");
    println!("{}", "─".repeat(96));
    println!(
        "  {:16}  {:8}  {:28}  {:21}  {:>9}  {:11}",
        "Date", "Dir", "File", "Peer", "Size", "Status"
    );
    println!("{}", "─".repeat(96));

    if records.is_empty() {
        println!("  (no transfer history)");
    }

    for record in records {
        println!(
            "  {:16}  {:8}  {:28}  {:21}  {:>9}  {:11}",
            format_timestamp(&record.timestamp),
            record.direction,
            super::status::truncate(&record.filename, 28),
            super::status::truncate(&record.peer, 21),
            record.size,
            record.status
        );
    }

    println!("{}", "─".repeat(96));
}

/// Render a stored ISO-8601 timestamp as a short local-agnostic date.
fn format_timestamp(timestamp: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(timestamp).map_or_else(
        |_| timestamp.to_string(),
        |dt| dt.format("%Y-%m-%d %H:%M").to_string(),
    )
}
