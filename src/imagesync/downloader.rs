use reqwest::{Client, StatusCode};
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Download failure, split by whether the run may continue
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// The server answered with a non-success status; skip this asset
    #[error("Failed to download {url}: {status}")]
    Status { url: String, status: StatusCode },

    /// The request could not be completed; fatal for the run
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to write download: {0}")]
    Io(#[from] std::io::Error),
}

impl DownloadError {
    /// Whether the failure only concerns this asset
    #[must_use]
    pub const fn is_skippable(&self) -> bool {
        matches!(self, Self::Status { .. })
    }
}

/// Downloader for CDN image assets
#[derive(Clone)]
pub struct Downloader {
    client: Client,
}

impl Downloader {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(concat!("imagesync/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self { client })
    }

    /// Download `url` to `destination`.
    ///
    /// The body is written to a temporary file next to the destination and
    /// renamed into place, so a failed download never leaves a partial file.
    pub async fn fetch(&self, url: &str, destination: &Path) -> Result<(), DownloadError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Status {
                url: url.to_string(),
                status,
            });
        }

        let bytes = response.bytes().await?;
        let dir = destination.parent().unwrap_or_else(|| Path::new("."));

        let (file, temp_path) = tempfile::NamedTempFile::new_in(dir)?.into_parts();
        let mut file = tokio::fs::File::from_std(file);
        file.write_all(&bytes).await?;
        file.flush().await?;
        drop(file);

        temp_path.persist(destination).map_err(|e| e.error)?;

        debug!("Downloaded {} ({} bytes) -> {:?}", url, bytes.len(), destination);
        Ok(())
    }
}
