mod builder;
mod color_map;
mod downloader;
mod fetcher;
mod naming;
mod resolver;
mod run_log;


pub use builder::{BuildConfig, BuildReport, ImageBuilder, ProductOutcome};
pub use color_map::{ColorBucket, ColorMap};
pub use downloader::{DownloadError, Downloader};
pub use fetcher::{FetchConfig, FetchReport, ImageFetcher};
pub use naming::{ProductNaming, slugify};
pub use resolver::{LocalResolver, RemoteAsset, RemoteResolver};
pub use run_log::{LOG_FILE_NAME, RunLog};

/// Image sync result type
pub type Result<T> = std::result::Result<T, SyncError>;

/// Image sync error types
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error(transparent)]
    Download(#[from] DownloadError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid product id: {0:?}")]
    InvalidProductId(String),
}
