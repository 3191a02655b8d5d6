//! Policy oracle wire contract.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Authorization request sent to the policy service.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AuthRequest {
    /// Requesting identity (or `"anonymous"`).
    pub subject: String,
    /// The capability name being invoked.
    pub action: String,
    /// Best-effort resource string: command, path, or URL extracted from the
    /// arguments, falling back to the tool name.
    pub resource: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub command: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub working_dir: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub context: BTreeMap<String, String>,
    /// Correlation id, echoed back by the service.
    pub trace_id: String,
}

/// Decision document returned by the policy service.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub decision: PolicyDecision,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub trace_id: String,
    /// Approval ticket, present iff the decision is `review`.
    #[serde(default)]
    pub cheq_id: Option<String>,
}

/// The policy authority's verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyDecision {
    Allow,
    Auto,
    Deny,
    /// Suspended pending out-of-band human approval. Neither approved nor
    /// denied yet; the gateway treats it as a failed execution for this
    /// call and surfaces the ticket id.
    #[serde(alias = "pending")]
    Review,
}

impl PolicyDecision {
    /// Whether this decision permits execution.
    pub fn is_approved(self) -> bool {
        matches!(self, Self::Allow | Self::Auto)
    }
}

impl std::fmt::Display for PolicyDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Allow => "allow",
            Self::Auto => "auto",
            Self::Deny => "deny",
            Self::Review => "review",
        };
        write!(f, "{s}")
    }
}

/// Outcome of one policy evaluation, after fail-closed mapping.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub decision: PolicyDecision,
    pub reason: Option<String>,
    pub trace_id: String,
    pub cheq_id: Option<String>,
}

impl Evaluation {
    /// Trivial auto-approval (oracle disabled).
    pub fn auto(trace_id: impl Into<String>) -> Self {
        Self {
            decision: PolicyDecision::Auto,
            reason: None,
            trace_id: trace_id.into(),
            cheq_id: None,
        }
    }

    /// Fail-closed denial with an explanatory reason.
    pub fn deny(trace_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            decision: PolicyDecision::Deny,
            reason: Some(reason.into()),
            trace_id: trace_id.into(),
            cheq_id: None,
        }
    }

    pub(crate) fn from_response(response: AuthResponse, fallback_trace: &str) -> Self {
        let trace_id = if response.trace_id.is_empty() {
            fallback_trace.to_string()
        } else {
            response.trace_id
        };
        Self {
            decision: response.decision,
            reason: response.reason,
            trace_id,
            cheq_id: response.cheq_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_skips_empty_optionals() {
        let req = AuthRequest {
            subject: "alice".into(),
            action: "exec".into(),
            resource: "ls -la".into(),
            trace_id: "t-123".into(),
            ..Default::default()
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"subject\":\"alice\""));
        assert!(!json.contains("command"));
        assert!(!json.contains("working_dir"));
        assert!(!json.contains("context"));
    }

    #[test]
    fn response_with_ticket() {
        let json = r#"{"decision":"review","reason":"needs sign-off","trace_id":"t-1","cheq_id":"T-1"}"#;
        let resp: AuthResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.decision, PolicyDecision::Review);
        assert_eq!(resp.cheq_id.as_deref(), Some("T-1"));
        assert!(!resp.decision.is_approved());
    }

    #[test]
    fn pending_is_review() {
        let resp: AuthResponse =
            serde_json::from_str(r#"{"decision":"pending","cheq_id":"T-2"}"#).unwrap();
        assert_eq!(resp.decision, PolicyDecision::Review);
    }

    #[test]
    fn minimal_response() {
        let resp: AuthResponse = serde_json::from_str(r#"{"decision":"allow"}"#).unwrap();
        assert!(resp.decision.is_approved());
        assert!(resp.cheq_id.is_none());

        let eval = Evaluation::from_response(resp, "fallback");
        assert_eq!(eval.trace_id, "fallback");
    }

    #[test]
    fn unknown_decision_is_rejected() {
        assert!(serde_json::from_str::<AuthResponse>(r#"{"decision":"maybe"}"#).is_err());
    }
}
