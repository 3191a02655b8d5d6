//! Oracle client error types.
//!
//! These classify *why* a policy call could not complete. Inside
//! [`crate::OracleClient::evaluate`] every variant is mapped to a `deny`
//! evaluation with the error text as the reason; only the approval status
//! lookup surfaces them directly.

use thiserror::Error;

/// Oracle transport and protocol errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The request could not be sent or timed out.
    #[error("policy service unreachable: {0}")]
    Network(String),

    /// The service answered with a non-success status.
    #[error("policy service error: [{code}] {body}")]
    Status { code: u16, body: String },

    /// The response body was not a valid decision document.
    #[error("malformed policy response: {0}")]
    Malformed(String),
}

pub type Result<T> = std::result::Result<T, Error>;
