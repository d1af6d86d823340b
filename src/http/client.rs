use anyhow::{Context, Result};
use log::{debug, warn};
use reqwest::Client;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::error::DownloaderError;

/// HTTP client wrapping a configured reqwest Client.
///
/// Timeouts come from the wrapped client; failures are propagated to the
/// caller without retries.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Performs a GET request and buffers the full response body as text.
    /// A non-success status fails with [`DownloaderError::DownloadFailed`].
    #[tracing::instrument(skip(self))]
    pub async fn get_text(&self, url: &str) -> Result<String> {
        debug!("GET {}...", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloaderError::DownloadFailed {
                url: url.to_string(),
                status,
            }
            .into());
        }

        response
            .text()
            .await
            .context("Failed to read response body")
    }

    /// Downloads a URL to the given path, streaming the body chunk-by-chunk.
    /// Returns the number of bytes written.
    ///
    /// The status is checked before the output file is created, so an error
    /// page is never written to disk. Any transfer or write failure after
    /// the file was created removes the partial file before the error is
    /// returned.
    #[tracing::instrument(skip(self))]
    pub async fn download_to(&self, url: &str, dest: &Path) -> Result<u64> {
        debug!("Downloading {} to {:?}...", url, dest);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to start download request")?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloaderError::DownloadFailed {
                url: url.to_string(),
                status,
            }
            .into());
        }

        let file = File::create(dest)
            .with_context(|| format!("Failed to create output file at {:?}", dest))?;

        match stream_body(response, file).await {
            Ok(bytes) => {
                debug!("Downloaded {:.2} MB", bytes as f64 / (1024.0 * 1024.0));
                Ok(bytes)
            }
            Err(e) => {
                // Never leave a truncated file that looks complete
                if let Err(remove_err) = fs::remove_file(dest) {
                    warn!("Failed to remove partial file {:?}: {}", dest, remove_err);
                }
                Err(e)
            }
        }
    }
}

/// Consumes the response body into the writer and flushes it.
async fn stream_body(mut response: reqwest::Response, mut file: File) -> Result<u64> {
    let mut written: u64 = 0;

    while let Some(chunk) = response
        .chunk()
        .await
        .context("Failed to read chunk from download stream")?
    {
        file.write_all(&chunk)
            .context("Failed to write chunk to file")?;
        written += chunk.len() as u64;
    }

    file.flush().context("Failed to flush output file")?;
    Ok(written)
}
