//! Wire payload shapes for the backend API.
//!
//! These are read-only projections of backend-owned entities. Every
//! response carries an application-level `success` flag; a `false` flag
//! with a 2xx status is a business-logic failure and is surfaced through
//! the payload rather than as an error. Fields beyond `success` default
//! when absent so a failure payload still deserializes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A file known to the backend, either local or on a peer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileDescriptor {
    /// File name
    pub name: String,
    /// Size in bytes
    #[serde(default)]
    pub size: u64,
    /// Human-readable size
    #[serde(default)]
    pub size_human: String,
    /// Last-modified timestamp (ISO-8601)
    #[serde(default)]
    pub modified: String,
    /// File extension, lowercased with leading dot
    #[serde(default)]
    pub extension: String,
}

/// A peer known to the backend. Peers are identified as `"{ip}:{port}"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerDescriptor {
    /// Peer IP address
    pub ip: String,
    /// Peer port
    pub port: u16,
    /// Display name (defaults to the peer id on the backend)
    #[serde(default)]
    pub name: String,
    /// Liveness status reported by the backend (`online`, `offline`, ...)
    #[serde(default)]
    pub status: String,
    /// When the backend last heard from this peer
    #[serde(default)]
    pub last_seen: Option<String>,
}

/// Aggregate counters for the dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Number of files in local storage
    #[serde(default)]
    pub total_files: u64,
    /// Human-readable total size of local storage
    #[serde(default)]
    pub total_file_size_human: String,
    /// Number of known peers
    #[serde(default)]
    pub total_peers: u64,
    /// Number of peers currently considered alive
    #[serde(default)]
    pub active_peers: u64,
}

/// Generic `{success, message}` response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    /// Application-level success flag
    pub success: bool,
    /// Human-readable outcome description
    #[serde(default)]
    pub message: Option<String>,
}

/// Response to file listing calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesResponse {
    /// Application-level success flag
    pub success: bool,
    /// Listed files; empty on failure
    #[serde(default)]
    pub files: Vec<FileDescriptor>,
    /// Failure description, if any
    #[serde(default)]
    pub message: Option<String>,
}

/// Response to the peer listing call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeersResponse {
    /// Application-level success flag
    pub success: bool,
    /// All known peers, keyed by peer id
    #[serde(default)]
    pub peers: HashMap<String, PeerDescriptor>,
    /// Peers currently considered alive, keyed by peer id
    #[serde(default)]
    pub active_peers: HashMap<String, PeerDescriptor>,
    /// Failure description, if any
    #[serde(default)]
    pub message: Option<String>,
}

/// Response to the add-peer call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddPeerResponse {
    /// Application-level success flag
    pub success: bool,
    /// Human-readable outcome description
    #[serde(default)]
    pub message: Option<String>,
    /// Identifier assigned to the new peer (`"{ip}:{port}"`)
    #[serde(default)]
    pub peer_id: Option<String>,
}

/// Response to the stats call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    /// Application-level success flag
    pub success: bool,
    /// Aggregate counters; absent on failure
    #[serde(default)]
    pub stats: Option<StatsSnapshot>,
    /// Failure description, if any
    #[serde(default)]
    pub message: Option<String>,
}
