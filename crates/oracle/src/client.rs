//! HTTP client for the policy service.

use std::future::Future;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::protocol::{AuthRequest, AuthResponse, Evaluation};

const AUTH_EXEC_PATH: &str = "/api/v1/auth/exec";
const APPROVALS_PATH: &str = "/api/v1/approvals";

/// Budget for a single policy evaluation. No retries: one bounded call.
pub const DEFAULT_ORACLE_TIMEOUT: Duration = Duration::from_secs(10);

/// Seam between the gateway and the policy authority.
///
/// `evaluate` is infallible: implementations resolve every failure mode to a
/// decision (fail-closed to deny) rather than surfacing transport errors to
/// the gateway.
pub trait PolicyOracle: Send + Sync {
    /// Whether remote adjudication is active. When true, the gateway
    /// consults the oracle for every capability regardless of tier.
    fn is_enabled(&self) -> bool;

    /// Evaluate one authorization request.
    fn evaluate(&self, request: AuthRequest) -> impl Future<Output = Evaluation> + Send;
}

/// Client for the external policy service.
///
/// A disabled client resolves every evaluation to `auto`, bypassing remote
/// checks entirely. This is the mode used when no authority is configured.
pub struct OracleClient {
    base_url: String,
    enabled: bool,
    http: reqwest::Client,
}

impl OracleClient {
    /// Create an enabled client targeting `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            enabled: true,
            http: reqwest::Client::new(),
        }
    }

    /// Create a client that approves everything locally (no remote checks).
    pub fn disabled() -> Self {
        Self {
            base_url: String::new(),
            enabled: false,
            http: reqwest::Client::new(),
        }
    }

    /// Poll the status of a pending approval ticket.
    ///
    /// One-shot: the caller owns any retry cadence.
    pub async fn approval_status(&self, cheq_id: &str) -> Result<AuthResponse> {
        let url = format!("{}{}/{}", self.base_url, APPROVALS_PATH, cheq_id);
        let response = self
            .http
            .get(&url)
            .timeout(DEFAULT_ORACLE_TIMEOUT)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        Self::decode(response).await
    }

    async fn post_evaluation(&self, request: &AuthRequest) -> Result<AuthResponse> {
        let url = format!("{}{}", self.base_url, AUTH_EXEC_PATH);
        let response = self
            .http
            .post(&url)
            .timeout(DEFAULT_ORACLE_TIMEOUT)
            .json(request)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        Self::decode(response).await
    }

    async fn decode(response: reqwest::Response) -> Result<AuthResponse> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(Error::Status {
                code: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| Error::Malformed(e.to_string()))
    }
}

impl PolicyOracle for OracleClient {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn evaluate(&self, request: AuthRequest) -> Evaluation {
        if !self.enabled {
            return Evaluation::auto(request.trace_id);
        }

        match self.post_evaluation(&request).await {
            Ok(response) => {
                tracing::debug!(
                    action = %request.action,
                    decision = %response.decision,
                    trace_id = %request.trace_id,
                    "policy evaluation"
                );
                Evaluation::from_response(response, &request.trace_id)
            }
            Err(e) => {
                // Fail closed: an unreachable or broken authority denies.
                tracing::warn!(
                    action = %request.action,
                    trace_id = %request.trace_id,
                    error = %e,
                    "policy evaluation failed, denying"
                );
                Evaluation::deny(request.trace_id, e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::PolicyDecision;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn request(action: &str) -> AuthRequest {
        AuthRequest {
            subject: "anonymous".into(),
            action: action.into(),
            resource: action.into(),
            trace_id: "t-test".into(),
            ..Default::default()
        }
    }

    /// Serve one canned HTTP response on an ephemeral port, then close.
    async fn serve_once(status_line: &str, body: &str) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf).await;
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn disabled_client_auto_approves() {
        let client = OracleClient::disabled();
        let eval = client.evaluate(request("exec")).await;
        assert_eq!(eval.decision, PolicyDecision::Auto);
        assert_eq!(eval.trace_id, "t-test");
        assert!(eval.cheq_id.is_none());
    }

    #[tokio::test]
    async fn unreachable_service_denies() {
        // Port 1 is never listening; connection is refused immediately.
        let client = OracleClient::new("http://127.0.0.1:1");
        let eval = client.evaluate(request("exec")).await;
        assert_eq!(eval.decision, PolicyDecision::Deny);
        assert!(eval.reason.is_some());
    }

    #[tokio::test]
    async fn error_status_denies() {
        let base = serve_once("500 Internal Server Error", "overloaded").await;
        let client = OracleClient::new(base);
        let eval = client.evaluate(request("exec")).await;
        assert_eq!(eval.decision, PolicyDecision::Deny);
        assert!(eval.reason.unwrap().contains("500"));
    }

    #[tokio::test]
    async fn malformed_body_denies() {
        let base = serve_once("200 OK", "<html>not a decision</html>").await;
        let client = OracleClient::new(base);
        let eval = client.evaluate(request("exec")).await;
        assert_eq!(eval.decision, PolicyDecision::Deny);
        assert!(eval.reason.unwrap().contains("malformed"));
    }

    #[tokio::test]
    async fn approval_status_decodes_ticket() {
        let base = serve_once(
            "200 OK",
            r#"{"decision":"allow","reason":"signed off","trace_id":"t-9"}"#,
        )
        .await;
        let client = OracleClient::new(base);
        let response = client.approval_status("T-1").await.unwrap();
        assert!(response.decision.is_approved());
        assert_eq!(response.trace_id, "t-9");
    }

    #[tokio::test]
    async fn approval_status_surfaces_missing_ticket() {
        let base = serve_once("404 Not Found", "no such ticket").await;
        let client = OracleClient::new(base);
        let err = client.approval_status("T-404").await.unwrap_err();
        assert!(matches!(err, Error::Status { code: 404, .. }));
    }
}
