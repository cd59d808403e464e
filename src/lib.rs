pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod imagesync;

pub use crate::config::AppConfig;
pub use db::{ConnectionManager, LogicalDatabase};
pub use error::AppError;
