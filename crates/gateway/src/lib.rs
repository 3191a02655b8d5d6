//! Warden execution gateway.
//!
//! The gateway turns a capability invocation request into an audited,
//! policy-checked, bounded-time execution:
//!
//! ```text
//! lookup -> local permission -> sandbox check -> (conditional) policy
//! oracle -> bounded handler invocation -> result assembly
//! ```
//!
//! Every failure mode is a structured [`ExecutionResult`], never an uncaught
//! fault: the request fails, the process continues.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use catalog::ToolRegistry;
//! use gateway::{handlers, ExecutionRequest, Gateway};
//! use oracle::OracleClient;
//!
//! # async fn example() -> gateway::Result<()> {
//! let registry = Arc::new(ToolRegistry::new());
//! handlers::register_builtins(&registry).await?;
//!
//! let gateway = Gateway::new(Arc::clone(&registry), OracleClient::disabled());
//! let result = gateway
//!     .execute(ExecutionRequest::new("list_dir").with_arg("path", "/tmp"))
//!     .await;
//! assert!(result.success);
//! # Ok(())
//! # }
//! ```

mod error;
mod exec;
pub mod handlers;
mod request;

pub use error::{Error, Result};
pub use exec::Gateway;
pub use request::{DecisionTag, ExecutionRequest, ExecutionResult};
