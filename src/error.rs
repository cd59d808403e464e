use crate::imagesync::SyncError;

/// Application result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Errors surfaced at the command boundary
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("{0} is an invalid connection. CORE and PROFILE are valid connections.")]
    UnknownDatabase(String),

    #[error(transparent)]
    Sync(#[from] SyncError),
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        Self::Sync(SyncError::Database(e))
    }
}
