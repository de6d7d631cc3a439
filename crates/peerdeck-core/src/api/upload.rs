//! File upload with progress reporting.
//!
//! Uploads take a distinct path from standard calls because they must
//! report granular progress while the body streams out, which a plain
//! request/response exchange cannot do. Progress is published on a
//! `tokio::sync::watch` channel the caller subscribes to; the channel is
//! optional and its absence changes nothing about the transfer.

use std::path::Path;

use futures::StreamExt;
use reqwest::multipart;
use reqwest::Body;
use tokio::sync::watch;
use tokio_util::io::ReaderStream;

use crate::error::{Error, Result};

use super::{ApiClient, ApiResponse};

/// Byte-level progress of an in-flight upload.
#[derive(Debug, Clone, Copy, Default)]
pub struct UploadProgress {
    /// Bytes handed to the transport so far
    pub loaded: u64,
    /// Total bytes to send
    pub total: u64,
}

impl UploadProgress {
    /// Progress as a percentage in `[0, 100]`.
    ///
    /// An empty upload is complete the moment it starts.
    #[must_use]
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            (self.loaded as f64 / self.total as f64) * 100.0
        }
    }
}

impl ApiClient {
    /// Upload a file into the backend's local storage.
    ///
    /// The file is sent as a multipart form with a single `file` part,
    /// streamed from disk. Each chunk handed to the transport publishes an
    /// [`UploadProgress`] on `progress`; after a 2xx completion a final
    /// 100% value is published. Percentages are monotonically
    /// non-decreasing.
    ///
    /// A failed upload cannot be resumed; the caller restarts from scratch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Upload`] if the file cannot be read, the transport
    /// fails, or the backend answers with a non-2xx status.
    pub async fn upload_file(
        &self,
        path: &Path,
        progress: Option<watch::Sender<UploadProgress>>,
    ) -> Result<ApiResponse> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_owned)
            .ok_or_else(|| Error::upload(format!("invalid file name: {}", path.display())))?;

        let file = tokio::fs::File::open(path)
            .await
            .map_err(|e| Error::upload(format!("cannot open {}: {e}", path.display())))?;
        let total = file
            .metadata()
            .await
            .map_err(|e| Error::upload(format!("cannot stat {}: {e}", path.display())))?
            .len();

        let chunk_progress = progress.clone();
        let mut loaded: u64 = 0;
        let stream = ReaderStream::new(file).map(move |chunk| {
            if let Ok(bytes) = &chunk {
                loaded += bytes.len() as u64;
                if let Some(tx) = &chunk_progress {
                    let _ = tx.send(UploadProgress { loaded, total });
                }
            }
            chunk
        });

        let part = multipart::Part::stream_with_length(Body::wrap_stream(stream), total)
            .file_name(file_name);
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(format!("{}/api/files/upload", self.base_url()))
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(path = %path.display(), error = %e, "File upload failed");
                Error::upload(format!("upload failed: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(path = %path.display(), status = status.as_u16(), "File upload failed");
            return Err(Error::upload(format!(
                "upload failed: status {}",
                status.as_u16()
            )));
        }

        let parsed = response
            .json::<ApiResponse>()
            .await
            .map_err(|e| Error::upload(format!("invalid upload response: {e}")))?;

        if let Some(tx) = progress {
            let _ = tx.send(UploadProgress {
                loaded: total,
                total,
            });
        }

        Ok(parsed)
    }
}
