//! Status command implementation: the dashboard view.

use anyhow::{bail, Result};

use peerdeck_core::api::{FileDescriptor, PeerDescriptor, StatsSnapshot};

use super::StatusArgs;

/// Run the status command.
///
/// The three dashboard fetches are issued concurrently and the view only
/// renders once every one of them has come back; any single failure fails
/// the whole refresh.
pub async fn run(args: StatusArgs) -> Result<()> {
    let config = super::load_config();
    let client = super::api_client(&config);

    let (files, peers, stats) =
        tokio::try_join!(client.list_files(), client.list_peers(), client.stats())?;

    if !files.success {
        bail!(files
            .message
            .unwrap_or_else(|| "Failed to load files".to_string()));
    }
    if !peers.success {
        bail!(peers
            .message
            .unwrap_or_else(|| "Failed to load peers".to_string()));
    }
    if !stats.success {
        bail!(stats
            .message
            .unwrap_or_else(|| "Failed to load stats".to_string()));
    }

    if args.json {
        let output = serde_json::json!({
            "stats": stats.stats,
            "files": files.files,
            "active_peers": peers.active_peers,
            "peers": peers.peers,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!();
    println!("Peerdeck Dashboard ({})", client.base_url());
    display_stats(&stats.stats.unwrap_or_default());
    display_recent_files(&files.files);
    display_active_peers(&peers.active_peers);

    Ok(())
}

fn display_stats(stats: &StatsSnapshot) {
    println!("{}", "─".repeat(64));
    println!(
        "  {:>6} files ({})    {:>4} peers, {} active",
        stats.total_files,
        if stats.total_file_size_human.is_empty() {
            "0 B"
        } else {
            &stats.total_file_size_human
        },
        stats.total_peers,
        stats.active_peers,
    );
}

fn display_recent_files(files: &[FileDescriptor]) {
    println!();
    println!("Recent Files:");
    println!("{}", "─".repeat(64));

    if files.is_empty() {
        println!("  (no files in shared storage)");
        return;
    }

    for file in files.iter().take(6) {
        println!(
            "  {:32}  {:>10}  {:16}",
            truncate(&file.name, 32),
            file.size_human,
            file.modified
        );
    }
}

fn display_active_peers(active: &std::collections::HashMap<String, PeerDescriptor>) {
    println!();
    println!("Active Peers:");
    println!("{}", "─".repeat(64));

    if active.is_empty() {
        println!("  (no active peers)");
        return;
    }

    let mut entries: Vec<_> = active.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    for (peer_id, peer) in entries.into_iter().take(5) {
        println!("  {:24}  {:21}", truncate(&peer.name, 24), peer_id);
    }
}

/// Shorten a string to `max` characters for table display.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{head}...")
    }
}
