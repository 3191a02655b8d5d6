//! The execution gateway: orchestrates lookup, permission, sandbox, policy,
//! and bounded handler invocation.

use std::sync::Arc;
use std::time::Duration;

use audit::{AuditRecord, AuditStore};
use catalog::{effective_tier, sandbox, Tier, ToolDefinition, ToolRegistry};
use oracle::{AuthRequest, PolicyDecision, PolicyOracle};
use serde_json::Value;
use tokio::time::timeout;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::request::{DecisionTag, ExecutionRequest, ExecutionResult};

/// Orchestrates authorized tool execution.
///
/// The gateway shares the registry and holds no per-request mutable state:
/// any number of requests may run concurrently, and a hanging handler delays
/// only its own request. There is no retry policy anywhere in this pipeline;
/// every failure is terminal for that request.
pub struct Gateway<O: PolicyOracle> {
    registry: Arc<ToolRegistry>,
    oracle: O,
    audit: Option<Arc<AuditStore>>,
}

impl<O: PolicyOracle> Gateway<O> {
    /// Create a gateway over a shared registry and a policy oracle.
    pub fn new(registry: Arc<ToolRegistry>, oracle: O) -> Self {
        Self {
            registry,
            oracle,
            audit: None,
        }
    }

    /// Record every terminal outcome to the given audit store.
    pub fn with_audit(mut self, store: Arc<AuditStore>) -> Self {
        self.audit = Some(store);
        self
    }

    /// The shared registry.
    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Execute a request through the full authorization pipeline.
    ///
    /// Never returns an error: every failure mode becomes a structured
    /// [`ExecutionResult`] with `success = false` and a decision tag.
    pub async fn execute(&self, request: ExecutionRequest) -> ExecutionResult {
        let trace_id = request
            .trace_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let result = match self.run(&request, &trace_id).await {
            Ok((value, decision)) => ExecutionResult::ok(value, decision, &trace_id),
            Err(Error::PolicyReview { cheq_id }) => ExecutionResult::review(
                format!("pending manual approval (ticket {cheq_id})"),
                cheq_id,
                &trace_id,
            ),
            Err(e) => {
                let decision = match &e {
                    Error::NotFound(_)
                    | Error::PermissionDenied(_)
                    | Error::PathViolation(_)
                    | Error::PolicyDenied(_) => DecisionTag::Deny,
                    Error::PolicyReview { .. } => DecisionTag::Review,
                    Error::HandlerMissing(_)
                    | Error::HandlerFailed(_)
                    | Error::TimedOut { .. }
                    | Error::Catalog(_) => DecisionTag::Error,
                };
                ExecutionResult::failed(e.to_string(), decision, &trace_id)
            }
        };

        if result.success {
            tracing::info!(
                tool = %request.tool_name,
                trace_id = %result.trace_id,
                decision = %result.decision,
                "execution completed"
            );
        } else {
            tracing::warn!(
                tool = %request.tool_name,
                trace_id = %result.trace_id,
                decision = %result.decision,
                error = result.error.as_deref().unwrap_or(""),
                "execution failed"
            );
        }

        self.record(&request.tool_name, &result);
        result
    }

    /// Trusted bypass: local tier check and handler invocation only.
    ///
    /// Skips the sandbox, the policy oracle, and the audit trail; still
    /// honors `deny` tiers, handler absence, and the definition's timeout.
    pub async fn execute_direct(
        &self,
        name: &str,
        args: serde_json::Map<String, Value>,
    ) -> Result<Value> {
        let def = self
            .registry
            .get(name)
            .await
            .ok_or_else(|| Error::NotFound(name.to_string()))?;

        let mode = self.registry.mode().await;
        if effective_tier(mode, Some(&def)) == Tier::Deny {
            return Err(Error::PermissionDenied(name.to_string()));
        }

        self.invoke(&def, args, def.timeout_secs).await
    }

    async fn run(
        &self,
        request: &ExecutionRequest,
        trace_id: &str,
    ) -> Result<(Value, DecisionTag)> {
        // Lookup is by value at request time: catalog mutations between
        // requests are immediately visible.
        let def = self
            .registry
            .get(&request.tool_name)
            .await
            .ok_or_else(|| Error::NotFound(request.tool_name.clone()))?;

        let mode = self.registry.mode().await;
        let tier = effective_tier(mode, Some(&def));
        if tier == Tier::Deny {
            return Err(Error::PermissionDenied(request.tool_name.clone()));
        }

        // Sandbox rejection must short-circuit before the oracle is
        // consulted and before any handler runs.
        if def.has_sandbox_rules() {
            sandbox::check_paths(&def, &request.arguments)?;
        }

        let mut decision = DecisionTag::Auto;
        if tier == Tier::Manual || self.oracle.is_enabled() {
            let evaluation = self.oracle.evaluate(self.auth_request(request, trace_id)).await;
            match evaluation.decision {
                PolicyDecision::Deny => {
                    return Err(Error::PolicyDenied(
                        evaluation
                            .reason
                            .unwrap_or_else(|| "denied by policy".to_string()),
                    ));
                }
                PolicyDecision::Review => {
                    return Err(Error::PolicyReview {
                        cheq_id: evaluation.cheq_id.unwrap_or_default(),
                    });
                }
                PolicyDecision::Allow => decision = DecisionTag::Allow,
                PolicyDecision::Auto => decision = DecisionTag::Auto,
            }
        }

        let budget = request
            .timeout_override_secs
            .map_or(def.timeout_secs, |t| t.min(def.timeout_secs));
        let value = self.invoke(&def, request.arguments.clone(), budget).await?;
        Ok((value, decision))
    }

    /// Invoke the bound handler under a hard wall-clock budget.
    ///
    /// On expiry the handler future is dropped; subprocess handlers spawn
    /// with `kill_on_drop`, so the underlying process dies rather than
    /// running detached.
    async fn invoke(
        &self,
        def: &ToolDefinition,
        args: serde_json::Map<String, Value>,
        budget_secs: u64,
    ) -> Result<Value> {
        let handler = def
            .handler
            .clone()
            .ok_or_else(|| Error::HandlerMissing(def.name.clone()))?;

        match timeout(Duration::from_secs(budget_secs), handler.call(args)).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(message)) => Err(Error::HandlerFailed(message)),
            Err(_) => Err(Error::TimedOut { secs: budget_secs }),
        }
    }

    fn auth_request(&self, request: &ExecutionRequest, trace_id: &str) -> AuthRequest {
        let arg = |key: &str| {
            request
                .arguments
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        let command = arg("command");
        let resource = [command.clone(), arg("file_path"), arg("path"), arg("url")]
            .into_iter()
            .find(|s| !s.is_empty())
            .unwrap_or_else(|| request.tool_name.clone());

        AuthRequest {
            subject: request
                .user_id
                .clone()
                .unwrap_or_else(|| "anonymous".to_string()),
            action: request.tool_name.clone(),
            resource,
            command,
            working_dir: arg("workdir"),
            context: request.context.clone(),
            trace_id: trace_id.to_string(),
        }
    }

    fn record(&self, tool: &str, result: &ExecutionResult) {
        let Some(store) = &self.audit else {
            return;
        };

        let detail = result
            .error
            .clone()
            .or_else(|| result.cheq_id.clone());
        let mut record = AuditRecord::new(
            &result.trace_id,
            tool,
            result.decision.to_string(),
            result.success,
        );
        if let Some(detail) = detail {
            record = record.with_detail(detail);
        }

        if let Err(e) = store.record(&record) {
            tracing::warn!(tool = %tool, error = %e, "failed to write audit record");
        }
    }
}
