//! Policy oracle client for the Warden gateway.
//!
//! Capabilities with tier `manual` (and, when the oracle is globally
//! enabled, every capability) are adjudicated by an out-of-process policy
//! authority. This crate provides the wire contract and an HTTP client that
//! **fails closed**: any transport failure, non-success status, or malformed
//! response resolves to `deny`, never to an approval.
//!
//! A `review` decision means the action is suspended pending out-of-band
//! human approval; the response carries a `cheq_id` ticket the caller can
//! poll later via [`OracleClient::approval_status`].

mod client;
mod error;
mod protocol;

pub use client::{OracleClient, PolicyOracle, DEFAULT_ORACLE_TIMEOUT};
pub use error::{Error, Result};
pub use protocol::{AuthRequest, AuthResponse, Evaluation, PolicyDecision};
