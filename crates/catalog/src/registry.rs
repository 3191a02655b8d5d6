//! The tool registry: shared catalog of capability definitions.

use std::collections::{BTreeSet, HashMap};

use tokio::sync::RwLock;

use crate::error::{Error, Result};
use crate::permission::{effective_tier, PermissionMode};
use crate::tool::{Tier, ToolDefinition};

/// Shared catalog of tool definitions plus the global permission mode.
///
/// Constructed explicitly at startup and shared (via `Arc`) with the
/// gateway. Registration is atomic per entry: a concurrent reader sees
/// either the previous definition or the new one, never a partial write.
pub struct ToolRegistry {
    tools: RwLock<HashMap<String, ToolDefinition>>,
    mode: RwLock<PermissionMode>,
}

impl ToolRegistry {
    /// Create an empty registry in `auto` mode.
    pub fn new() -> Self {
        Self {
            tools: RwLock::new(HashMap::new()),
            mode: RwLock::new(PermissionMode::default()),
        }
    }

    /// Register a definition, replacing any existing entry with the same
    /// name. Idempotent: registering the same definition twice yields one
    /// catalog entry.
    pub async fn register(&self, def: ToolDefinition) -> Result<()> {
        if def.name.is_empty() {
            return Err(Error::InvalidDefinition("name must not be empty".into()));
        }

        tracing::info!(tool = %def.name, tier = %def.tier, "registered tool");
        self.tools.write().await.insert(def.name.clone(), def);
        Ok(())
    }

    /// Remove a definition. Returns whether it was present.
    pub async fn unregister(&self, name: &str) -> bool {
        let removed = self.tools.write().await.remove(name).is_some();
        if removed {
            tracing::info!(tool = %name, "unregistered tool");
        }
        removed
    }

    /// Look up a definition by name, cloning it out.
    ///
    /// Lookups happen by value at request time, so catalog mutations between
    /// requests are immediately visible to every caller.
    pub async fn get(&self, name: &str) -> Option<ToolDefinition> {
        self.tools.read().await.get(name).cloned()
    }

    /// List tool names, optionally filtered by category.
    pub async fn list(&self, category: Option<&str>) -> Vec<String> {
        let tools = self.tools.read().await;
        let mut names: Vec<String> = tools
            .values()
            .filter(|t| category.is_none_or(|c| t.category == c))
            .map(|t| t.name.clone())
            .collect();
        names.sort();
        names
    }

    /// Distinct categories across all registered tools.
    pub async fn list_categories(&self) -> Vec<String> {
        let tools = self.tools.read().await;
        let set: BTreeSet<String> = tools.values().map(|t| t.category.clone()).collect();
        set.into_iter().collect()
    }

    /// Set the global permission mode.
    pub async fn set_mode(&self, mode: PermissionMode) {
        tracing::info!(%mode, "permission mode set");
        *self.mode.write().await = mode;
    }

    /// Current global permission mode.
    pub async fn mode(&self) -> PermissionMode {
        *self.mode.read().await
    }

    /// Effective tier for a tool under the current mode.
    ///
    /// Unknown names resolve to [`Tier::Deny`].
    pub async fn effective_tier(&self, name: &str) -> Tier {
        let mode = self.mode().await;
        let tools = self.tools.read().await;
        effective_tier(mode, tools.get(name))
    }

    /// Names of tools whose effective tier is not `Deny`.
    pub async fn allowed_tools(&self) -> Vec<String> {
        let mode = self.mode().await;
        let tools = self.tools.read().await;
        let mut names: Vec<String> = tools
            .values()
            .filter(|t| effective_tier(mode, Some(t)) != Tier::Deny)
            .map(|t| t.name.clone())
            .collect();
        names.sort();
        names
    }

    /// Names of tools whose effective tier equals `tier`.
    pub async fn tools_by_tier(&self, tier: Tier) -> Vec<String> {
        let mode = self.mode().await;
        let tools = self.tools.read().await;
        let mut names: Vec<String> = tools
            .values()
            .filter(|t| effective_tier(mode, Some(t)) == tier)
            .map(|t| t.name.clone())
            .collect();
        names.sort();
        names
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn def(name: &str) -> ToolDefinition {
        ToolDefinition::new(name, "test tool", json!({"type": "object"}))
    }

    #[tokio::test]
    async fn register_is_idempotent() {
        let registry = ToolRegistry::new();
        registry.register(def("echo")).await.unwrap();
        registry.register(def("echo")).await.unwrap();
        assert_eq!(registry.list(None).await, vec!["echo"]);
    }

    #[tokio::test]
    async fn register_rejects_empty_name() {
        let registry = ToolRegistry::new();
        assert!(registry.register(def("")).await.is_err());
    }

    #[tokio::test]
    async fn unregister_reports_presence() {
        let registry = ToolRegistry::new();
        registry.register(def("echo")).await.unwrap();
        assert!(registry.unregister("echo").await);
        assert!(!registry.unregister("echo").await);
        assert!(!registry.unregister("never-registered").await);
    }

    #[tokio::test]
    async fn mutations_visible_to_lookup() {
        let registry = ToolRegistry::new();
        assert!(registry.get("echo").await.is_none());
        registry.register(def("echo")).await.unwrap();
        assert!(registry.get("echo").await.is_some());
        registry.unregister("echo").await;
        assert!(registry.get("echo").await.is_none());
    }

    #[tokio::test]
    async fn list_filters_by_category() {
        let registry = ToolRegistry::new();
        registry
            .register(def("read").with_category("filesystem"))
            .await
            .unwrap();
        registry
            .register(def("exec").with_category("system"))
            .await
            .unwrap();

        assert_eq!(registry.list(Some("filesystem")).await, vec!["read"]);
        assert_eq!(registry.list(None).await, vec!["exec", "read"]);
        assert_eq!(
            registry.list_categories().await,
            vec!["filesystem", "system"]
        );
    }

    #[tokio::test]
    async fn effective_tier_honors_mode() {
        let registry = ToolRegistry::new();
        registry
            .register(def("echo").with_tier(Tier::Auto))
            .await
            .unwrap();

        assert_eq!(registry.effective_tier("echo").await, Tier::Auto);
        assert_eq!(registry.effective_tier("missing").await, Tier::Deny);

        registry.set_mode(PermissionMode::DenyAll).await;
        assert_eq!(registry.effective_tier("echo").await, Tier::Deny);

        registry.set_mode(PermissionMode::ManualAll).await;
        assert_eq!(registry.effective_tier("echo").await, Tier::Manual);
    }

    #[tokio::test]
    async fn allowed_tools_excludes_denied() {
        let registry = ToolRegistry::new();
        registry
            .register(def("echo").with_tier(Tier::Auto))
            .await
            .unwrap();
        registry
            .register(def("nuke").with_tier(Tier::Deny))
            .await
            .unwrap();

        assert_eq!(registry.allowed_tools().await, vec!["echo"]);
        assert_eq!(registry.tools_by_tier(Tier::Deny).await, vec!["nuke"]);

        registry.set_mode(PermissionMode::DenyAll).await;
        assert!(registry.allowed_tools().await.is_empty());
    }
}
