//! Transfer history ledger for Peerdeck.
//!
//! The ledger is a bounded, ordered, locally persisted log of upload and
//! download attempts. It has no server-side counterpart: the backend never
//! sees it, and it survives restarts through a single JSON file in the
//! platform data directory.
//!
//! ## Rules
//!
//! - Entries are kept newest-first and capped at `max_entries` (50 by
//!   default); inserting past the cap evicts the oldest entry.
//! - Records are immutable once created. A transfer that progresses from
//!   in-progress to completed is logged as two separate records.
//! - Clearing the ledger is idempotent.

use std::fs;
use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::LedgerConfig;
use crate::error::{Error, Result};

/// Direction of a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferDirection {
    /// A file was pushed to the backend's local storage
    Upload,
    /// A file was fetched, either locally or from a peer
    Download,
}

impl std::fmt::Display for TransferDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Upload => write!(f, "Upload"),
            Self::Download => write!(f, "Download"),
        }
    }
}

/// Outcome recorded for a transfer attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferStatus {
    /// Transfer has been started but not finished
    InProgress,
    /// Transfer completed successfully
    Completed,
    /// Transfer failed
    Failed,
}

impl std::fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InProgress => write!(f, "In Progress"),
            Self::Completed => write!(f, "Completed"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

/// A single transfer attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    /// Name of the file being transferred
    pub filename: String,
    /// Extension derived from the filename (see [`derive_extension`])
    pub extension: String,
    /// Direction of the transfer
    pub direction: TransferDirection,
    /// Peer identifier (`"{ip}:{port}"`), or `"Local"`/`"Unknown"` when
    /// the transfer was not peer-initiated
    pub peer: String,
    /// Human-readable size, or `"Unknown"` when not yet known
    pub size: String,
    /// Outcome of this attempt
    pub status: TransferStatus,
    /// ISO-8601 timestamp assigned at record creation
    pub timestamp: String,
}

impl TransferRecord {
    /// Create a new record with the current timestamp and derived extension.
    #[must_use]
    pub fn new(
        filename: impl Into<String>,
        direction: TransferDirection,
        peer: impl Into<String>,
        size: impl Into<String>,
        status: TransferStatus,
    ) -> Self {
        let filename = filename.into();
        let extension = derive_extension(&filename);
        Self {
            filename,
            extension,
            direction,
            peer: peer.into(),
            size: size.into(),
            status,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Derive the display extension for a filename.
///
/// The rule is a dot plus the substring after the last `.` in the name. A
/// filename without any dot yields the whole name behind an extra dot
/// (`"noext"` becomes `".noext"`), and a trailing dot yields a bare `"."`.
/// Only the final suffix is taken: `"archive.tar.gz"` becomes `".gz"`.
#[must_use]
pub fn derive_extension(filename: &str) -> String {
    match filename.rsplit_once('.') {
        Some((_, suffix)) => format!(".{suffix}"),
        None => format!(".{filename}"),
    }
}

/// Bounded, persisted transfer history.
#[derive(Debug)]
pub struct TransferLedger {
    /// Path to the history file
    path: PathBuf,
    /// Records, newest first
    records: Vec<TransferRecord>,
    /// Cap on stored records
    max_entries: usize,
}

impl TransferLedger {
    /// Load the ledger from the default location with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing history file cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_with_config(&LedgerConfig::default())
    }

    /// Load the ledger with custom settings.
    ///
    /// The history file lives at `config.path` when set, otherwise in the
    /// platform data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing history file cannot be read or parsed.
    pub fn load_with_config(config: &LedgerConfig) -> Result<Self> {
        let path = config
            .path
            .clone()
            .or_else(Self::default_path)
            .unwrap_or_else(|| PathBuf::from("transfer_history.json"));
        Self::load_from(path, config)
    }

    /// Load the ledger from a specific path.
    ///
    /// A missing file yields an empty ledger.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: PathBuf, config: &LedgerConfig) -> Result<Self> {
        let max_entries = config.max_entries;

        if !path.exists() {
            return Ok(Self {
                path,
                records: Vec::new(),
                max_entries,
            });
        }

        let file = fs::File::open(&path).map_err(|e| {
            Error::Ledger(format!(
                "Failed to open transfer history at {}: {}",
                path.display(),
                e
            ))
        })?;

        let reader = BufReader::new(file);
        let mut records: Vec<TransferRecord> = serde_json::from_reader(reader).map_err(|e| {
            Error::Ledger(format!(
                "Failed to parse transfer history at {}: {}",
                path.display(),
                e
            ))
        })?;

        // A lowered cap applies to previously persisted entries too.
        records.truncate(max_entries);

        Ok(Self {
            path,
            records,
            max_entries,
        })
    }

    /// Get the default history file path.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "peerdeck", "Peerdeck")
            .map(|dirs| dirs.data_dir().join("transfer_history.json"))
    }

    /// Record a transfer attempt.
    ///
    /// The record is timestamped now, prepended (newest first), and the
    /// sequence is truncated to the cap before being persisted. Persistence
    /// is best-effort: a write failure is logged and the in-memory state is
    /// kept, so recording never fails visibly to the caller.
    pub fn record(
        &mut self,
        filename: &str,
        direction: TransferDirection,
        peer: &str,
        size: &str,
        status: TransferStatus,
    ) {
        let record = TransferRecord::new(filename, direction, peer, size, status);
        self.records.insert(0, record);

        if self.records.len() > self.max_entries {
            self.records.truncate(self.max_entries);
        }

        if let Err(e) = self.save() {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to persist transfer history"
            );
        }
    }

    /// List all records, newest first.
    #[must_use]
    pub fn list(&self) -> &[TransferRecord] {
        &self.records
    }

    /// Get a record by index (0 = most recent).
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&TransferRecord> {
        self.records.get(index)
    }

    /// Get the total number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the ledger is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Delete all records, including the backing file.
    ///
    /// Clearing an already-empty ledger is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing history file cannot be removed.
    pub fn clear(&mut self) -> Result<()> {
        self.records.clear();

        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Ledger(format!(
                "Failed to clear transfer history at {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    /// Get the path to the history file.
    #[must_use]
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Ledger(format!(
                    "Failed to create history directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let file = fs::File::create(&self.path).map_err(|e| {
            Error::Ledger(format!(
                "Failed to create transfer history at {}: {}",
                self.path.display(),
                e
            ))
        })?;

        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &self.records).map_err(|e| {
            Error::Ledger(format!(
                "Failed to write transfer history at {}: {}",
                self.path.display(),
                e
            ))
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_ledger(path: PathBuf, max_entries: usize) -> TransferLedger {
        let config = LedgerConfig {
            enabled: true,
            max_entries,
            path: None,
        };
        TransferLedger::load_from(path, &config).unwrap()
    }

    #[test]
    fn test_config_path_override() {
        let tmp_dir = TempDir::new().unwrap();
        let path = tmp_dir.path().join("custom_history.json");

        let config = LedgerConfig {
            path: Some(path.clone()),
            ..LedgerConfig::default()
        };
        let ledger = TransferLedger::load_with_config(&config).unwrap();
        assert_eq!(ledger.path(), &path);
    }

    #[test]
    fn test_record_and_reload() {
        let tmp_dir = TempDir::new().unwrap();
        let path = tmp_dir.path().join("transfer_history.json");

        let mut ledger = open_ledger(path.clone(), 50);
        ledger.record(
            "report.pdf",
            TransferDirection::Upload,
            "Local",
            "2.4 MB",
            TransferStatus::Completed,
        );

        let reloaded = open_ledger(path, 50);
        assert_eq!(reloaded.len(), 1);
        let record = reloaded.get(0).unwrap();
        assert_eq!(record.filename, "report.pdf");
        assert_eq!(record.extension, ".pdf");
        assert_eq!(record.peer, "Local");
        assert_eq!(record.status, TransferStatus::Completed);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let tmp_dir = TempDir::new().unwrap();
        let path = tmp_dir.path().join("transfer_history.json");

        let mut ledger = open_ledger(path, 50);
        for i in 0..55 {
            ledger.record(
                &format!("file{i}.txt"),
                TransferDirection::Download,
                "192.168.1.7:5000",
                "Unknown",
                TransferStatus::Completed,
            );
        }

        // Exactly the 50 most recent, in reverse call order.
        assert_eq!(ledger.len(), 50);
        assert_eq!(ledger.get(0).unwrap().filename, "file54.txt");
        assert_eq!(ledger.get(49).unwrap().filename, "file5.txt");
    }

    #[test]
    fn test_newest_first_order() {
        let tmp_dir = TempDir::new().unwrap();
        let path = tmp_dir.path().join("transfer_history.json");

        let mut ledger = open_ledger(path, 50);
        ledger.record(
            "first.txt",
            TransferDirection::Upload,
            "Local",
            "1 KB",
            TransferStatus::Completed,
        );
        ledger.record(
            "second.txt",
            TransferDirection::Upload,
            "Local",
            "1 KB",
            TransferStatus::Completed,
        );

        let names: Vec<_> = ledger.list().iter().map(|r| r.filename.as_str()).collect();
        assert_eq!(names, vec!["second.txt", "first.txt"]);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let tmp_dir = TempDir::new().unwrap();
        let path = tmp_dir.path().join("transfer_history.json");

        let mut ledger = open_ledger(path.clone(), 50);
        ledger.record(
            "file.txt",
            TransferDirection::Upload,
            "Local",
            "1 KB",
            TransferStatus::Completed,
        );

        ledger.clear().unwrap();
        assert!(ledger.is_empty());
        assert!(!path.exists());

        // Clearing an empty ledger is a no-op.
        ledger.clear().unwrap();
        assert!(ledger.is_empty());

        let reloaded = open_ledger(path, 50);
        assert!(reloaded.is_empty());
    }

    #[test]
    fn test_load_nonexistent_file() {
        let tmp_dir = TempDir::new().unwrap();
        let path = tmp_dir.path().join("nonexistent.json");

        let ledger = open_ledger(path, 50);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_lowered_cap_applies_on_load() {
        let tmp_dir = TempDir::new().unwrap();
        let path = tmp_dir.path().join("transfer_history.json");

        let mut ledger = open_ledger(path.clone(), 50);
        for i in 0..10 {
            ledger.record(
                &format!("file{i}.txt"),
                TransferDirection::Upload,
                "Local",
                "1 KB",
                TransferStatus::Completed,
            );
        }

        let shrunk = open_ledger(path, 3);
        assert_eq!(shrunk.len(), 3);
        assert_eq!(shrunk.get(0).unwrap().filename, "file9.txt");
    }

    #[test]
    fn test_record_is_best_effort_on_unwritable_path() {
        let tmp_dir = TempDir::new().unwrap();
        // Parent "blocker" is a file, so creating the history directory fails.
        let blocker = tmp_dir.path().join("blocker");
        std::fs::write(&blocker, b"x").unwrap();
        let path = blocker.join("sub").join("transfer_history.json");

        let mut ledger = open_ledger(path, 50);
        ledger.record(
            "file.txt",
            TransferDirection::Upload,
            "Local",
            "1 KB",
            TransferStatus::Completed,
        );

        // The write failed silently; the in-memory state still advanced.
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_extension_derivation() {
        assert_eq!(derive_extension("archive.tar.gz"), ".gz");
        assert_eq!(derive_extension("report.pdf"), ".pdf");
        // The literal rule: no dot keeps the whole name behind an extra dot.
        assert_eq!(derive_extension("noext"), ".noext");
        assert_eq!(derive_extension("trailing."), ".");
        assert_eq!(derive_extension(".bashrc"), ".bashrc");
    }

    #[test]
    fn test_status_change_is_a_new_record() {
        let tmp_dir = TempDir::new().unwrap();
        let path = tmp_dir.path().join("transfer_history.json");

        let mut ledger = open_ledger(path, 50);
        ledger.record(
            "movie.mkv",
            TransferDirection::Download,
            "10.0.0.3:5000",
            "Unknown",
            TransferStatus::InProgress,
        );
        ledger.record(
            "movie.mkv",
            TransferDirection::Download,
            "10.0.0.3:5000",
            "Unknown",
            TransferStatus::Completed,
        );

        // One logical transfer, two immutable entries.
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.get(0).unwrap().status, TransferStatus::Completed);
        assert_eq!(ledger.get(1).unwrap().status, TransferStatus::InProgress);
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let record = TransferRecord::new(
            "file.txt",
            TransferDirection::Download,
            "Unknown",
            "Unknown",
            TransferStatus::InProgress,
        );
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"download\""));
        assert!(json.contains("\"in_progress\""));
    }

    #[test]
    fn test_display_impls() {
        assert_eq!(format!("{}", TransferDirection::Upload), "Upload");
        assert_eq!(format!("{}", TransferDirection::Download), "Download");
        assert_eq!(format!("{}", TransferStatus::InProgress), "In Progress");
        assert_eq!(format!("{}", TransferStatus::Completed), "Completed");
        assert_eq!(format!("{}", TransferStatus::Failed), "Failed");
    }
}
