//! Error types for Peerdeck.
//!
//! This module provides a unified error type for all Peerdeck operations.
//! Error messages are written to be shown to the user as-is; backend
//! failures carry the backend's own `message` field when one is available.

use std::io;

use thiserror::Error;

/// A specialized `Result` type for Peerdeck operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Peerdeck.
#[derive(Error, Debug)]
pub enum Error {
    /// A standard API call failed, either at the transport level or with a
    /// non-2xx HTTP response. The message is the backend's `message` field
    /// when the response carried one.
    #[error("{message}")]
    Request {
        /// Human-readable failure description
        message: String,
    },

    /// A file upload failed at the transport level or with a non-2xx
    /// completion.
    #[error("{message}")]
    Upload {
        /// Human-readable failure description
        message: String,
    },

    /// Configuration file error
    #[error("configuration error: {0}")]
    Config(String),

    /// Transfer history store error
    #[error("transfer history error: {0}")]
    Ledger(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Build a request error from a display-ready message.
    pub(crate) fn request(message: impl Into<String>) -> Self {
        Self::Request {
            message: message.into(),
        }
    }

    /// Build an upload error from a display-ready message.
    pub(crate) fn upload(message: impl Into<String>) -> Self {
        Self::Upload {
            message: message.into(),
        }
    }
}
