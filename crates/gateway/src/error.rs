//! Gateway error taxonomy.

use thiserror::Error;

/// Terminal failure modes of one execution request.
///
/// All of these surface as structured [`crate::ExecutionResult`]s from
/// [`crate::Gateway::execute`]; only [`crate::Gateway::execute_direct`]
/// returns them directly.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// No definition with this name is registered.
    #[error("tool not found: {0}")]
    NotFound(String),

    /// The effective tier resolved to deny.
    #[error("tool denied: {0}")]
    PermissionDenied(String),

    /// A sandbox rule rejected a path argument.
    #[error(transparent)]
    PathViolation(#[from] catalog::SandboxViolation),

    /// The policy authority denied the action.
    #[error("denied by policy: {0}")]
    PolicyDenied(String),

    /// The policy authority deferred to out-of-band human approval.
    /// Distinct from denial: the ticket can be polled later.
    #[error("pending manual approval (ticket {cheq_id})")]
    PolicyReview { cheq_id: String },

    /// The definition has no handler binding.
    #[error("tool has no handler: {0}")]
    HandlerMissing(String),

    /// The handler returned an error.
    #[error("handler failed: {0}")]
    HandlerFailed(String),

    /// The handler exceeded its wall-clock budget and was cancelled.
    #[error("handler timed out after {secs}s")]
    TimedOut { secs: u64 },

    /// A catalog operation failed.
    #[error(transparent)]
    Catalog(#[from] catalog::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
