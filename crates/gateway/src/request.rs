//! Execution request and result types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A requested capability invocation. Immutable once submitted: the gateway
/// takes it by value.
#[derive(Debug, Clone)]
pub struct ExecutionRequest {
    /// Name of the tool to invoke; resolved against the catalog at request
    /// time, never a direct pointer.
    pub tool_name: String,
    /// Argument mapping, validated loosely against the tool's schema.
    pub arguments: Map<String, Value>,
    /// Requesting identity; `"anonymous"` when absent.
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    /// Correlation id; generated if absent.
    pub trace_id: Option<String>,
    /// Caller timeout override in seconds; capped at the definition's budget.
    pub timeout_override_secs: Option<u64>,
    /// Free-form context forwarded to the policy oracle.
    pub context: BTreeMap<String, String>,
}

impl ExecutionRequest {
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments: Map::new(),
            user_id: None,
            session_id: None,
            trace_id: None,
            timeout_override_secs: None,
            context: BTreeMap::new(),
        }
    }

    /// Replace the argument mapping.
    pub fn with_arguments(mut self, arguments: Map<String, Value>) -> Self {
        self.arguments = arguments;
        self
    }

    /// Set a single argument.
    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_override_secs = Some(secs);
        self
    }

    /// Add a context entry forwarded to the policy oracle.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }
}

/// Decision tag on a terminal outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionTag {
    /// Approved by the policy oracle.
    Allow,
    /// Approved locally without remote adjudication.
    Auto,
    /// Rejected: unknown tool, denied tier, sandbox violation, or policy
    /// denial (including fail-closed oracle failures).
    Deny,
    /// Suspended pending out-of-band human approval.
    Review,
    /// The handler was authorized but did not complete: missing, failed, or
    /// timed out.
    Error,
}

impl std::fmt::Display for DecisionTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Allow => "allow",
            Self::Auto => "auto",
            Self::Deny => "deny",
            Self::Review => "review",
            Self::Error => "error",
        };
        write!(f, "{s}")
    }
}

/// Terminal outcome of one execution request.
///
/// Exactly one of `result` / `error` is populated.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub decision: DecisionTag,
    /// Echoes the request's trace id, or the generated one.
    pub trace_id: String,
    /// Approval ticket; present only when `decision` is `review`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cheq_id: Option<String>,
}

impl ExecutionResult {
    /// Successful execution.
    pub fn ok(value: Value, decision: DecisionTag, trace_id: impl Into<String>) -> Self {
        Self {
            success: true,
            result: Some(value),
            error: None,
            decision,
            trace_id: trace_id.into(),
            cheq_id: None,
        }
    }

    /// Failed execution with the given decision tag.
    pub fn failed(
        error: impl Into<String>,
        decision: DecisionTag,
        trace_id: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(error.into()),
            decision,
            trace_id: trace_id.into(),
            cheq_id: None,
        }
    }

    /// Deferred for human approval, carrying the correlation ticket.
    pub fn review(
        error: impl Into<String>,
        cheq_id: impl Into<String>,
        trace_id: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(error.into()),
            decision: DecisionTag::Review,
            trace_id: trace_id.into(),
            cheq_id: Some(cheq_id.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_builder() {
        let req = ExecutionRequest::new("exec")
            .with_arg("command", "ls")
            .with_user("alice")
            .with_trace_id("t-9")
            .with_context("origin", "test");

        assert_eq!(req.tool_name, "exec");
        assert_eq!(req.arguments.get("command"), Some(&json!("ls")));
        assert_eq!(req.user_id.as_deref(), Some("alice"));
        assert_eq!(req.context.get("origin").map(String::as_str), Some("test"));
    }

    #[test]
    fn result_populates_exactly_one_side() {
        let ok = ExecutionResult::ok(json!("hi"), DecisionTag::Auto, "t-1");
        assert!(ok.success && ok.result.is_some() && ok.error.is_none());

        let failed = ExecutionResult::failed("boom", DecisionTag::Error, "t-1");
        assert!(!failed.success && failed.result.is_none() && failed.error.is_some());

        let review = ExecutionResult::review("pending", "T-1", "t-1");
        assert_eq!(review.decision, DecisionTag::Review);
        assert_eq!(review.cheq_id.as_deref(), Some("T-1"));
    }

    #[test]
    fn result_serializes_without_empty_fields() {
        let ok = ExecutionResult::ok(json!(1), DecisionTag::Auto, "t-1");
        let json = serde_json::to_string(&ok).unwrap();
        assert!(json.contains("\"decision\":\"auto\""));
        assert!(!json.contains("cheq_id"));
        assert!(!json.contains("error"));
    }
}
