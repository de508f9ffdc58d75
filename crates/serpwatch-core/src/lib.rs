//! Shared domain types for the serpwatch workspace.
//!
//! Defines the position-source contract consumed by the collector, the
//! competitor entry shape stored and snapshotted by the database layer, and
//! the environment-driven application configuration.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

pub mod app_config;
pub mod config;
pub mod source;
pub mod types;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use source::{PositionSource, SourceError};
pub use types::{CompetitorEntry, FetchOptions, FetchedPosition};
