//! Streaming recitation downloads with progress reporting.

use std::path::Path;

use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;

use crate::client::MushafClient;
use crate::error::{ClientError, Result};

/// Progress information during a download.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DownloadProgress {
    pub downloaded: u64,
    /// Zero when the server sent no content length.
    pub total: u64,
}

impl DownloadProgress {
    #[must_use]
    pub fn new(downloaded: u64, total: u64) -> Self {
        Self { downloaded, total }
    }

    /// Fraction complete in `0.0..=1.0`; zero while the total is unknown.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.downloaded as f64 / self.total as f64).min(1.0)
        }
    }

    #[must_use]
    pub fn percentage(&self) -> u8 {
        (self.fraction() * 100.0) as u8
    }

    #[must_use]
    pub fn downloaded_display(&self) -> String {
        format_bytes(self.downloaded)
    }

    #[must_use]
    pub fn total_display(&self) -> String {
        format_bytes(self.total)
    }
}

/// Formats a byte count in human-readable form.
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}

impl MushafClient {
    /// Stream `url` into `destination`, reporting progress after each chunk.
    ///
    /// Returns the number of bytes written. A partial file is removed when
    /// the transfer fails.
    pub async fn download_to<F>(&self, url: &str, destination: &Path, on_progress: F) -> Result<u64>
    where
        F: Fn(DownloadProgress),
    {
        tracing::info!(%url, destination = %destination.display(), "starting download");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let total = response.content_length().unwrap_or(0);
        let mut file = tokio::fs::File::create(destination).await?;
        let mut downloaded: u64 = 0;
        let mut stream = response.bytes_stream();

        let outcome: Result<()> = async {
            while let Some(chunk) = stream.next().await {
                let chunk = chunk?;
                file.write_all(&chunk).await?;
                downloaded += chunk.len() as u64;

                let progress = DownloadProgress::new(downloaded, total);
                on_progress(progress);
                tracing::trace!(
                    downloaded = %progress.downloaded_display(),
                    total = %progress.total_display(),
                    "download progress"
                );
            }
            file.flush().await?;
            Ok(())
        }
        .await;

        if let Err(error) = outcome {
            drop(file);
            if let Err(remove_error) = tokio::fs::remove_file(destination).await {
                tracing::warn!(%remove_error, "could not remove partial download");
            }
            return Err(error);
        }

        tracing::info!(size = %format_bytes(downloaded), "download complete");
        Ok(downloaded)
    }
}
