//! CLI command definitions and handlers.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use peerdeck_core::api::ApiClient;
use peerdeck_core::config::Config;
use peerdeck_core::ledger::{TransferDirection, TransferLedger, TransferStatus};

pub mod files;
pub mod health;
pub mod history;
pub mod peers;
pub mod status;

/// Load configuration with graceful fallback to defaults.
///
/// If the config file doesn't exist or can't be parsed, commands proceed
/// with the default backend address and ledger settings.
pub fn load_config() -> Config {
    Config::load().unwrap_or_default()
}

/// Build the API client for the configured backend.
pub fn api_client(config: &Config) -> ApiClient {
    ApiClient::new(&config.api.base_url)
}

/// Record a transfer attempt in the local history, best-effort.
///
/// History problems never fail the command that triggered the transfer;
/// a ledger that can't be opened only logs a warning.
pub fn record_transfer(
    config: &Config,
    filename: &str,
    direction: TransferDirection,
    peer: &str,
    size: &str,
    status: TransferStatus,
) {
    if !config.ledger.enabled {
        return;
    }

    match TransferLedger::load_with_config(&config.ledger) {
        Ok(mut ledger) => ledger.record(filename, direction, peer, size, status),
        Err(e) => tracing::warn!(error = %e, "Skipping transfer history record"),
    }
}

/// Peerdeck - Dashboard over a peer-to-peer file sharing backend
#[derive(Parser)]
#[command(name = "peerdeck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand)]
pub enum Command {
    /// Show the dashboard: storage stats, recent files, active peers
    Status(StatusArgs),

    /// Manage files in the backend's shared storage
    Files(FilesArgs),

    /// Manage known peers
    Peers(PeersArgs),

    /// View locally recorded transfer history
    History(HistoryArgs),

    /// Check backend connectivity and health
    Health(HealthArgs),
}

/// Arguments for the status command
#[derive(Parser)]
pub struct StatusArgs {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the files command
#[derive(Parser)]
pub struct FilesArgs {
    /// File subcommand
    #[command(subcommand)]
    pub action: FilesAction,
}

/// File subcommands
#[derive(Subcommand)]
pub enum FilesAction {
    /// List files in shared storage
    List {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Upload a file into shared storage
    Upload {
        /// File to upload
        path: PathBuf,

        /// Minimal output (no progress readout)
        #[arg(short, long)]
        quiet: bool,
    },

    /// Open a browser download for a shared file
    Download {
        /// Name of the file to download
        filename: String,
    },

    /// Delete a file from shared storage
    Delete {
        /// Name of the file to delete
        filename: String,
    },
}

/// Arguments for the peers command
#[derive(Parser)]
pub struct PeersArgs {
    /// Peer subcommand
    #[command(subcommand)]
    pub action: PeersAction,
}

/// Peer subcommands
#[derive(Subcommand)]
pub enum PeersAction {
    /// List known peers and their liveness
    List {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Register a peer by address
    Add {
        /// Peer IP address
        ip: String,

        /// Peer port
        port: u16,

        /// Display name for the peer
        #[arg(long)]
        name: Option<String>,
    },

    /// Remove a peer
    Remove {
        /// Peer identifier (ip:port)
        peer_id: String,
    },

    /// Test reachability of a peer
    Test {
        /// Peer identifier (ip:port)
        peer_id: String,
    },

    /// List files shared by a peer
    Files {
        /// Peer identifier (ip:port)
        peer_id: String,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Fetch a peer's file into shared storage
    Fetch {
        /// Peer identifier (ip:port)
        peer_id: String,

        /// Name of the file to fetch
        filename: String,
    },

    /// Force a refresh of peer liveness
    Refresh,
}

/// Arguments for the history command
#[derive(Parser)]
pub struct HistoryArgs {
    /// Maximum number of entries to show
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,

    /// Delete all recorded history
    #[arg(long)]
    pub clear: bool,
}

/// Arguments for the health command
#[derive(Parser)]
pub struct HealthArgs {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
