//! Catalog error types.

use thiserror::Error;

/// Catalog errors.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A tool definition failed validation and cannot be registered.
    ///
    /// This is a fatal configuration error at startup: a catalog that
    /// rejects one of its built-in definitions is misconfigured.
    #[error("invalid tool definition: {0}")]
    InvalidDefinition(String),
}

pub type Result<T> = std::result::Result<T, Error>;
