// src/fetch/client.rs

//! Transports for downloading source archives
//!
//! Remote archives go through a [`Transport`]. The default [`HttpTransport`]
//! wraps a blocking reqwest client and streams the body into a temporary
//! file next to the target, renaming it into place once complete. A failed
//! download therefore never leaves a truncated archive at the target path.

use crate::error::{Error, Result};
use crate::fetch::FetchConfig;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::Client;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Buffer size for streaming downloads (8 KB)
const STREAM_BUFFER_SIZE: usize = 8192;

/// Something that can download a URL to a file
pub trait Transport {
    /// Download `url` to `dest`, replacing any existing file
    ///
    /// Returns the number of bytes written.
    fn download(&self, url: &str, dest: &Path) -> Result<u64>;
}

/// HTTP(S) transport backed by reqwest
pub struct HttpTransport {
    client: Client,
    progress: bool,
}

impl HttpTransport {
    /// Create a transport honoring the timeout and progress settings
    ///
    /// With no timeout configured requests may block indefinitely.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::InitError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            progress: config.progress,
        })
    }

    fn progress_bar(&self, total_size: u64, display_name: &str) -> Option<ProgressBar> {
        if !self.progress {
            return None;
        }

        let pb = if total_size > 0 {
            let pb = ProgressBar::new(total_size);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{msg} [{bar:40.green/dim}] {bytes}/{total_bytes} ({bytes_per_sec})")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("##-"),
            );
            pb.set_message(display_name.to_string());
            pb
        } else {
            // Unknown size: count bytes without a percentage
            let pb = ProgressBar::new_spinner();
            pb.set_message(format!("{} (unknown size)", display_name));
            pb
        };
        Some(pb)
    }
}

impl Transport for HttpTransport {
    fn download(&self, url: &str, dest: &Path) -> Result<u64> {
        info!("Downloading {} to {}", url, dest.display());

        let mut response = self
            .client
            .get(url)
            .send()
            .map_err(|e| Error::DownloadError(format!("Failed to fetch {}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(Error::DownloadError(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        let total_size = response.content_length().unwrap_or(0);
        let display_name = dest
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| url.to_string());
        let progress_bar = self.progress_bar(total_size, &display_name);

        let mut file = temp_file_beside(dest)?;
        let mut downloaded: u64 = 0;
        let mut buffer = [0u8; STREAM_BUFFER_SIZE];

        loop {
            let bytes_read = response
                .read(&mut buffer)
                .map_err(|e| Error::DownloadError(format!("Failed to read response from {url}: {e}")))?;

            if bytes_read == 0 {
                break;
            }

            file.write_all(&buffer[..bytes_read])
                .map_err(|e| Error::IoError(format!("Failed to write data: {e}")))?;

            downloaded += bytes_read as u64;
            if let Some(pb) = &progress_bar {
                pb.set_position(downloaded);
            }
        }

        if let Some(pb) = &progress_bar {
            pb.finish_with_message(format!("{} [done]", display_name));
        }

        persist(file, dest)?;
        debug!("Downloaded {} bytes", downloaded);
        Ok(downloaded)
    }
}

/// Copy a local archive to `dest`
///
/// Copying a file onto itself is a no-op.
pub fn copy_local(source: &Path, dest: &Path) -> Result<u64> {
    let source_meta = fs::metadata(source).map_err(|e| {
        Error::DownloadError(format!("Failed to read {}: {}", source.display(), e))
    })?;

    if is_same_file(source, dest) {
        debug!("{} is already in place", dest.display());
        return Ok(source_meta.len());
    }

    info!("Copying {} to {}", source.display(), dest.display());
    let mut input = fs::File::open(source).map_err(|e| {
        Error::DownloadError(format!("Failed to open {}: {}", source.display(), e))
    })?;
    let mut file = temp_file_beside(dest)?;
    let copied = std::io::copy(&mut input, &mut file).map_err(|e| {
        Error::IoError(format!("Failed to copy {}: {}", source.display(), e))
    })?;

    persist(file, dest)?;
    Ok(copied)
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn temp_file_beside(dest: &Path) -> Result<NamedTempFile> {
    let parent = dest
        .parent()
        .ok_or_else(|| Error::InvalidPath(format!("{} has no parent directory", dest.display())))?;

    NamedTempFile::new_in(parent).map_err(|e| {
        Error::IoError(format!("Failed to create temporary file in {}: {e}", parent.display()))
    })
}

fn persist(file: NamedTempFile, dest: &Path) -> Result<()> {
    file.persist(dest).map_err(|e| {
        Error::IoError(format!("Failed to move download to {}: {}", dest.display(), e.error))
    })?;
    Ok(())
}
