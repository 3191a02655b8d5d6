//! SQLite-backed audit trail for Warden executions.
//!
//! Every execution request that reaches a terminal state (denied, rejected
//! by the sandbox, deferred for approval, succeeded, failed, timed out) is
//! captured as an [`AuditRecord`] so operators can answer "what ran, who
//! asked, and what did the policy decide" after the fact.
//!
//! Records are correlated by trace id: the same id flows through the
//! execution request, the policy evaluation, and the stored record.
//!
//! # Example
//!
//! ```no_run
//! use audit::{AuditRecord, AuditStore};
//!
//! let store = AuditStore::open("audit.db")?;
//! store.record(&AuditRecord::new("t-1", "exec", "deny", false).with_detail("path blocked"))?;
//!
//! for record in store.by_trace("t-1")? {
//!     println!("{} {} {}", record.timestamp, record.tool, record.decision);
//! }
//! # Ok::<(), audit::Error>(())
//! ```

mod error;
mod record;
mod store;

pub use error::{Error, Result};
pub use record::AuditRecord;
pub use store::AuditStore;
