//! Logical databases and the run-scoped connection manager

use sqlx::AnyPool;
use sqlx::any::AnyPoolOptions;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::error::{AppError, Result};

/// The two data stores the catalog lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalDatabase {
    /// Product images
    Core,
    /// Products and colours
    Profile,
}

impl LogicalDatabase {
    pub const ALL: [Self; 2] = [Self::Core, Self::Profile];

    /// Lower-case prefix used by the configuration keys
    #[must_use]
    pub const fn env_prefix(self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::Profile => "profile",
        }
    }
}

impl fmt::Display for LogicalDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Core => write!(f, "CORE"),
            Self::Profile => write!(f, "PROFILE"),
        }
    }
}

impl FromStr for LogicalDatabase {
    type Err = AppError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let name = s.to_uppercase();
        match name.as_str() {
            "CORE" => Ok(Self::Core),
            "PROFILE" => Ok(Self::Profile),
            _ => Err(AppError::UnknownDatabase(name)),
        }
    }
}

/// Owns at most one live connection per logical database.
///
/// Pools are opened lazily on first use and must be released with
/// [`ConnectionManager::close`] before the process exits.
pub struct ConnectionManager {
    core_url: String,
    profile_url: String,
    core: OnceCell<AnyPool>,
    profile: OnceCell<AnyPool>,
}

impl ConnectionManager {
    /// Create a manager for the given connection URLs. Nothing is opened yet.
    pub fn new(core_url: impl Into<String>, profile_url: impl Into<String>) -> Self {
        sqlx::any::install_default_drivers();

        Self {
            core_url: core_url.into(),
            profile_url: profile_url.into(),
            core: OnceCell::new(),
            profile: OnceCell::new(),
        }
    }

    /// Create a manager from application configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let core_url = config
            .database(LogicalDatabase::Core)
            .connection_url(LogicalDatabase::Core)?;
        let profile_url = config
            .database(LogicalDatabase::Profile)
            .connection_url(LogicalDatabase::Profile)?;

        Ok(Self::new(core_url, profile_url))
    }

    /// Get the pool for a logical database, connecting on first use
    pub async fn pool(&self, db: LogicalDatabase) -> std::result::Result<&AnyPool, sqlx::Error> {
        let (cell, url) = self.slot(db);
        cell.get_or_try_init(|| async {
            debug!("Connecting to {} database", db);
            connect(url).await
        })
        .await
    }

    /// Whether a connection to the database has been established
    #[must_use]
    pub fn is_connected(&self, db: LogicalDatabase) -> bool {
        self.slot(db).0.get().is_some_and(|pool| !pool.is_closed())
    }

    /// Close every established connection
    pub async fn close(&self) {
        for db in LogicalDatabase::ALL {
            if !self.is_connected(db) {
                continue;
            }
            if let Some(pool) = self.slot(db).0.get() {
                pool.close().await;
                info!("Closed {} database connection", db);
            }
        }
    }

    fn slot(&self, db: LogicalDatabase) -> (&OnceCell<AnyPool>, &str) {
        match db {
            LogicalDatabase::Core => (&self.core, &self.core_url),
            LogicalDatabase::Profile => (&self.profile, &self.profile_url),
        }
    }
}

async fn connect(url: &str) -> std::result::Result<AnyPool, sqlx::Error> {
    AnyPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(None)
        .max_lifetime(None)
        .connect(url)
        .await
}
