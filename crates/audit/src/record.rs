//! Audit record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One terminal execution outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: Uuid,
    /// Correlation id shared with the execution request and any policy call.
    pub trace_id: String,
    /// The capability name that was requested.
    pub tool: String,
    /// Decision tag of the terminal outcome (allow/auto/deny/review/error).
    pub decision: String,
    pub success: bool,
    /// Error message or approval ticket, depending on the outcome.
    pub detail: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl AuditRecord {
    pub fn new(
        trace_id: impl Into<String>,
        tool: impl Into<String>,
        decision: impl Into<String>,
        success: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            trace_id: trace_id.into(),
            tool: tool.into(),
            decision: decision.into(),
            success,
            detail: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}
