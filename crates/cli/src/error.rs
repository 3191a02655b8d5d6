//! CLI error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

/// CLI errors.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The audit database does not exist yet.
    #[error("audit database not found at {path}. Run 'warden exec' first")]
    DatabaseNotFound { path: PathBuf },

    /// The --args payload was not a JSON object.
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    /// The execution reached a terminal failure state.
    #[error("execution failed (decision: {decision})")]
    ExecutionFailed { decision: String },

    /// Configuration is invalid or unreadable.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An error occurred in the catalog layer.
    #[error(transparent)]
    Catalog(#[from] catalog::Error),

    /// An error occurred in the audit layer.
    #[error(transparent)]
    Audit(#[from] audit::Error),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A JSON encoding error occurred.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
