//! # Peerdeck Core Library
//!
//! `peerdeck-core` provides the client-side building blocks for Peerdeck,
//! a dashboard over a peer-to-peer file sharing backend service.
//!
//! The backend owns all networking, storage, and peer discovery; this
//! library is the presentation layer's toolbox:
//!
//! - [`api`] - HTTP API client for the backend (files, peers, stats)
//! - [`config`] - Configuration management
//! - [`error`] - Unified error type
//! - [`mod@file`] - File size formatting helpers
//! - [`ledger`] - Locally persisted transfer history
//!
//! ## Example
//!
//! ```rust,ignore
//! use peerdeck_core::api::ApiClient;
//! use peerdeck_core::ledger::TransferLedger;
//!
//! let client = ApiClient::new("http://localhost:5000");
//! let files = client.list_files().await?;
//!
//! let mut ledger = TransferLedger::load()?;
//! println!("{} past transfers", ledger.list().len());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]

pub mod api;
pub mod config;
pub mod error;
pub mod file;
pub mod ledger;

pub use error::{Error, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default backend base URL
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Default cap on persisted transfer history entries
pub const DEFAULT_HISTORY_ENTRIES: usize = 50;
