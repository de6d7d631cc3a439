//! Peers command implementation.

use anyhow::{bail, Result};

use peerdeck_core::api::PeersResponse;
use peerdeck_core::ledger::{TransferDirection, TransferStatus};

use super::PeersAction;

/// Run the peers command.
pub async fn run(args: super::PeersArgs) -> Result<()> {
    match args.action {
        PeersAction::List { json } => list(json).await,
        PeersAction::Add { ip, port, name } => add(&ip, port, name.as_deref()).await,
        PeersAction::Remove { peer_id } => remove(&peer_id).await,
        PeersAction::Test { peer_id } => test(&peer_id).await,
        PeersAction::Files { peer_id, json } => files(&peer_id, json).await,
        PeersAction::Fetch { peer_id, filename } => fetch(&peer_id, &filename).await,
        PeersAction::Refresh => refresh().await,
    }
}

async fn list(json: bool) -> Result<()> {
    let config = super::load_config();
    let client = super::api_client(&config);

    let resp = client.list_peers().await?;
    if !resp.success {
        bail!(resp
            .message
            .unwrap_or_else(|| "Failed to list peers".to_string()));
    }

    if json {
        let output = serde_json::json!({
            "peers": resp.peers,
            "active_peers": resp.active_peers,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    display_peers(&resp);
    Ok(())
}

fn display_peers(resp: &PeersResponse) {
    println!();
    println!("Known Peers:");
    println!("{}", "─".repeat(64));
    println!("  {:24}  {:21}  {:8}", "Name", "Address", "Status");
    println!("{}", "─".repeat(64));

    if resp.peers.is_empty() {
        println!("  (no peers registered)");
    }

    let mut entries: Vec<_> = resp.peers.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    for (peer_id, peer) in entries {
        // Liveness comes from the active set, not the stored status field.
        let status = if resp.active_peers.contains_key(peer_id) {
            "online"
        } else if peer.status.is_empty() {
            "unknown"
        } else {
            peer.status.as_str()
        };
        println!(
            "  {:24}  {:21}  {:8}",
            super::status::truncate(&peer.name, 24),
            peer_id,
            status
        );
    }

    println!("{}", "─".repeat(64));
}

async fn add(ip: &str, port: u16, name: Option<&str>) -> Result<()> {
    let config = super::load_config();
    let client = super::api_client(&config);

    let resp = client.add_peer(ip, port, name).await?;
    if !resp.success {
        bail!(resp
            .message
            .unwrap_or_else(|| "Failed to add peer".to_string()));
    }

    println!(
        "{}",
        resp.message.as_deref().unwrap_or("Peer added successfully")
    );
    Ok(())
}

async fn remove(peer_id: &str) -> Result<()> {
    let config = super::load_config();
    let client = super::api_client(&config);

    let resp = client.remove_peer(peer_id).await?;
    if !resp.success {
        bail!(resp
            .message
            .unwrap_or_else(|| "Failed to remove peer".to_string()));
    }

    println!(
        "{}",
        resp.message
            .as_deref()
            .unwrap_or("Peer removed successfully")
    );
    Ok(())
}

async fn test(peer_id: &str) -> Result<()> {
    let config = super::load_config();
    let client = super::api_client(&config);

    let resp = client.test_peer(peer_id).await?;
    if !resp.success {
        bail!(resp
            .message
            .unwrap_or_else(|| "Failed to test peer".to_string()));
    }

    println!(
        "{}",
        resp.message
            .as_deref()
            .unwrap_or("Peer test started")
    );
    Ok(())
}

async fn files(peer_id: &str, json: bool) -> Result<()> {
    let config = super::load_config();
    let client = super::api_client(&config);

    let resp = client.peer_files(peer_id).await?;
    if !resp.success {
        bail!(resp
            .message
            .unwrap_or_else(|| "Failed to list peer files".to_string()));
    }

    if json {
        let output = serde_json::json!({ "files": resp.files });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!();
    println!("Files shared by {peer_id}:");
    super::files::display_files(&resp.files);
    Ok(())
}

/// Fetch a peer's file into shared storage, recording the attempt.
///
/// The attempt is logged as two separate history entries: one in-progress
/// record before the call, and one completed/failed record after. The size
/// is unknown on this side; the backend reports it once the file lands.
async fn fetch(peer_id: &str, filename: &str) -> Result<()> {
    let config = super::load_config();
    let client = super::api_client(&config);

    super::record_transfer(
        &config,
        filename,
        TransferDirection::Download,
        peer_id,
        "Unknown",
        TransferStatus::InProgress,
    );

    match client.download_from_peer(peer_id, filename).await {
        Ok(resp) if resp.success => {
            super::record_transfer(
                &config,
                filename,
                TransferDirection::Download,
                peer_id,
                "Unknown",
                TransferStatus::Completed,
            );
            println!(
                "{}",
                resp.message.as_deref().unwrap_or("Download started")
            );
            Ok(())
        }
        Ok(resp) => {
            super::record_transfer(
                &config,
                filename,
                TransferDirection::Download,
                peer_id,
                "Unknown",
                TransferStatus::Failed,
            );
            bail!(resp
                .message
                .unwrap_or_else(|| "Failed to download from peer".to_string()));
        }
        Err(e) => {
            super::record_transfer(
                &config,
                filename,
                TransferDirection::Download,
                peer_id,
                "Unknown",
                TransferStatus::Failed,
            );
            Err(e.into())
        }
    }
}

async fn refresh() -> Result<()> {
    let config = super::load_config();
    let client = super::api_client(&config);

    let resp = client.refresh_peers().await?;
    if !resp.success {
        bail!(resp
            .message
            .unwrap_or_else(|| "Failed to refresh peers".to_string()));
    }

    println!(
        "{}",
        resp.message
            .as_deref()
            .unwrap_or("Peer refresh started")
    );
    Ok(())
}
