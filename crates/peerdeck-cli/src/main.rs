//! Peerdeck CLI - Dashboard over a peer-to-peer file sharing backend
//!
//! Peerdeck manages the backend's shared files and known peers and keeps a
//! local history of transfer attempts.
//!
//! ## Quick Start
//!
//! ```bash
//! # Dashboard overview
//! peerdeck status
//!
//! # Upload a file into shared storage
//! peerdeck files upload ./document.pdf
//!
//! # Fetch a file from a peer
//! peerdeck peers fetch 192.168.1.7:5000 notes.txt
//! ```

#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::unused_async)]

use anyhow::Result;
use clap::Parser;

mod commands;

use commands::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();

    match cli.command {
        Command::Status(args) => commands::status::run(args).await,
        Command::Files(args) => commands::files::run(args).await,
        Command::Peers(args) => commands::peers::run(args).await,
        Command::History(args) => commands::history::run(args).await,
        Command::Health(args) => commands::health::run(args).await,
    }
}

fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,peerdeck=info,peerdeck_core=info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}
