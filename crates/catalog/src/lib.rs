//! Capability catalog for the Warden gateway.
//!
//! Core principle: **every invocable capability is a named, registered
//! definition with an explicit trust tier.**
//!
//! This crate provides:
//!
//! - [`ToolDefinition`]: a named capability with an argument schema, trust
//!   tier, sandbox rules, and an optional handler binding.
//! - [`ToolRegistry`]: the shared catalog of definitions, constructed
//!   explicitly and passed to the gateway (no process-wide singleton).
//! - [`PermissionMode`] and [`effective_tier`]: resolution of the global
//!   override mode against a definition's own tier.
//! - [`sandbox`]: path-prefix allow/block checks for path-bearing arguments.

mod error;
mod permission;
mod registry;
pub mod sandbox;
mod tool;

pub use error::{Error, Result};
pub use permission::{effective_tier, PermissionMode};
pub use registry::ToolRegistry;
pub use sandbox::SandboxViolation;
pub use tool::{HandlerFuture, Tier, ToolDefinition, ToolHandler};
