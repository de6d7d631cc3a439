//! Files command implementation.

use std::io::{self, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use tokio::sync::watch;

use peerdeck_core::api::{FileDescriptor, UploadProgress};
use peerdeck_core::file::format_size;
use peerdeck_core::ledger::{TransferDirection, TransferStatus};

use super::FilesAction;

/// Run the files command.
pub async fn run(args: super::FilesArgs) -> Result<()> {
    match args.action {
        FilesAction::List { json } => list(json).await,
        FilesAction::Upload { path, quiet } => upload(&path, quiet).await,
        FilesAction::Download { filename } => download(&filename),
        FilesAction::Delete { filename } => delete(&filename).await,
    }
}

async fn list(json: bool) -> Result<()> {
    let config = super::load_config();
    let client = super::api_client(&config);

    let resp = client.list_files().await?;
    if !resp.success {
        bail!(resp
            .message
            .unwrap_or_else(|| "Failed to list files".to_string()));
    }

    if json {
        let output = serde_json::json!({ "files": resp.files });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    display_files(&resp.files);
    Ok(())
}

/// Display a file table, shared with `peers files`.
pub fn display_files(files: &[FileDescriptor]) {
    println!();
    println!("{}", "─".repeat(64));
    println!("  {:36}  {:>10}  {:16}", "Name", "Size", "Modified");
    println!("{}", "─".repeat(64));

    if files.is_empty() {
        println!("  (no files)");
    }

    for file in files {
        println!(
            "  {:36}  {:>10}  {:16}",
            super::status::truncate(&file.name, 36),
            file.size_human,
            file.modified
        );
    }

    println!("{}", "─".repeat(64));
}

async fn upload(path: &Path, quiet: bool) -> Result<()> {
    let config = super::load_config();
    let client = super::api_client(&config);

    let size = std::fs::metadata(path)
        .with_context(|| format!("Cannot read {}", path.display()))?
        .len();
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let (progress, printer) = if quiet {
        (None, None)
    } else {
        let (tx, mut rx) = watch::channel(UploadProgress::default());
        let printer = tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let percent = rx.borrow().percent();
                print!("\r  Uploading... {percent:>3.0}%");
                let _ = io::stdout().flush();
            }
            println!();
        });
        (Some(tx), Some(printer))
    };

    let result = client.upload_file(path, progress).await;
    if let Some(printer) = printer {
        // The sender is gone either way, so the printer is finishing up.
        let _ = printer.await;
    }

    let resp = result?;
    if !resp.success {
        bail!(resp
            .message
            .unwrap_or_else(|| "Upload failed".to_string()));
    }

    super::record_transfer(
        &config,
        &filename,
        TransferDirection::Upload,
        "Local",
        &format_size(size),
        TransferStatus::Completed,
    );

    println!(
        "{}",
        resp.message
            .as_deref()
            .unwrap_or("File uploaded successfully")
    );
    Ok(())
}

fn download(filename: &str) -> Result<()> {
    let config = super::load_config();
    let client = super::api_client(&config);

    // Fire-and-forget: the browser owns the actual byte transfer.
    client.download_file(filename)?;
    println!("Opened download for '{filename}'");
    println!("  {}", client.download_url(filename));
    Ok(())
}

async fn delete(filename: &str) -> Result<()> {
    let config = super::load_config();
    let client = super::api_client(&config);

    let resp = client.delete_file(filename).await?;
    if !resp.success {
        bail!(resp
            .message
            .unwrap_or_else(|| "Failed to delete file".to_string()));
    }

    println!(
        "{}",
        resp.message
            .as_deref()
            .unwrap_or("File deleted successfully")
    );
    Ok(())
}
