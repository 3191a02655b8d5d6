//! Tool definitions and handler bindings.

use std::collections::BTreeSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default wall-clock budget for a handler invocation, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Per-tool trust tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Never executable.
    Deny,
    /// Executable without remote adjudication.
    #[default]
    Auto,
    /// Requires the policy oracle's approval before execution.
    Manual,
    /// Experimental; treated like `Auto` locally but tagged for operators.
    Beta,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Tier::Deny => "deny",
            Tier::Auto => "auto",
            Tier::Manual => "manual",
            Tier::Beta => "beta",
        };
        write!(f, "{s}")
    }
}

/// Boxed future returned by a tool handler.
pub type HandlerFuture = Pin<Box<dyn Future<Output = std::result::Result<Value, String>> + Send>>;

/// A bound capability implementation.
///
/// Handlers receive the request's argument mapping and return a value or an
/// error string. Errors are ordinary return values: a handler must not panic
/// to signal failure, so the gateway can tell a failed invocation apart from
/// a timed-out one.
pub trait ToolHandler: Send + Sync {
    /// Invoke the handler with the validated argument mapping.
    fn call(&self, args: Map<String, Value>) -> HandlerFuture;
}

impl<F, Fut> ToolHandler for F
where
    F: Fn(Map<String, Value>) -> Fut + Send + Sync,
    Fut: Future<Output = std::result::Result<Value, String>> + Send + 'static,
{
    fn call(&self, args: Map<String, Value>) -> HandlerFuture {
        Box::pin(self(args))
    }
}

/// A named, schema-described capability the gateway can authorize and invoke.
///
/// A definition without a handler binding is inert: it can be registered and
/// listed, but execution fails with "no handler".
#[derive(Clone)]
pub struct ToolDefinition {
    /// Unique name within a catalog instance.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// JSON-Schema-like argument contract (type, properties, required).
    pub input_schema: Value,
    /// Trust tier; overridden by the registry's global mode unless `Auto`.
    pub tier: Tier,
    /// Grouping category for listings.
    pub category: String,
    /// Path prefixes this tool may touch. Empty imposes no restriction.
    pub allowed_paths: Vec<String>,
    /// Path prefixes this tool must never touch. Takes precedence over
    /// `allowed_paths`.
    pub blocked_paths: Vec<String>,
    /// Wall-clock budget for a single invocation, in seconds.
    pub timeout_secs: u64,
    /// Free-form labels.
    pub tags: BTreeSet<String>,
    /// Bound implementation, if any.
    pub handler: Option<Arc<dyn ToolHandler>>,
}

impl ToolDefinition {
    /// Create a definition with defaults: tier `auto`, category `general`,
    /// no sandbox rules, 30s timeout, no handler.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
            tier: Tier::default(),
            category: "general".to_string(),
            allowed_paths: Vec::new(),
            blocked_paths: Vec::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            tags: BTreeSet::new(),
            handler: None,
        }
    }

    /// Set the trust tier.
    pub fn with_tier(mut self, tier: Tier) -> Self {
        self.tier = tier;
        self
    }

    /// Set the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Bind a handler implementation.
    pub fn with_handler(mut self, handler: impl ToolHandler + 'static) -> Self {
        self.handler = Some(Arc::new(handler));
        self
    }

    /// Restrict the tool to the given path prefixes.
    pub fn with_allowed_paths(mut self, paths: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.allowed_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Forbid the given path prefixes, overriding any allow rule.
    pub fn with_blocked_paths(mut self, paths: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.blocked_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Set the invocation timeout in seconds.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Add a tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Whether this definition declares any sandbox rule.
    pub fn has_sandbox_rules(&self) -> bool {
        !self.allowed_paths.is_empty() || !self.blocked_paths.is_empty()
    }
}

impl std::fmt::Debug for ToolDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDefinition")
            .field("name", &self.name)
            .field("tier", &self.tier)
            .field("category", &self.category)
            .field("allowed_paths", &self.allowed_paths)
            .field("blocked_paths", &self.blocked_paths)
            .field("timeout_secs", &self.timeout_secs)
            .field("handler", &self.handler.as_ref().map(|_| "<bound>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builder_defaults() {
        let def = ToolDefinition::new("echo", "Echo input", json!({"type": "object"}));
        assert_eq!(def.tier, Tier::Auto);
        assert_eq!(def.category, "general");
        assert_eq!(def.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(def.handler.is_none());
        assert!(!def.has_sandbox_rules());
    }

    #[test]
    fn sandbox_rules_detected() {
        let def = ToolDefinition::new("read", "Read a file", json!({}))
            .with_allowed_paths(["/tmp"]);
        assert!(def.has_sandbox_rules());

        let def = ToolDefinition::new("delete", "Delete a path", json!({}))
            .with_blocked_paths(["/etc"]);
        assert!(def.has_sandbox_rules());
    }

    #[test]
    fn tier_serde_round_trip() {
        let json = serde_json::to_string(&Tier::Manual).unwrap();
        assert_eq!(json, "\"manual\"");
        let tier: Tier = serde_json::from_str("\"deny\"").unwrap();
        assert_eq!(tier, Tier::Deny);
    }

    #[tokio::test]
    async fn closure_handler_invocable() {
        let def = ToolDefinition::new("echo", "Echo input", json!({}))
            .with_handler(|args: Map<String, Value>| async move {
                Ok(args.get("text").cloned().unwrap_or(Value::Null))
            });

        let handler = def.handler.unwrap();
        let mut args = Map::new();
        args.insert("text".to_string(), json!("hi"));
        let out = handler.call(args).await.unwrap();
        assert_eq!(out, json!("hi"));
    }
}
