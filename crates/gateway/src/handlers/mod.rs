//! Builtin capability handlers: filesystem, shell, and network.
//!
//! Handlers are plain async functions taking the validated argument mapping
//! and returning a value or an error string; the gateway stays agnostic to
//! their internals beyond timeout enforcement.

mod fs;
mod net;
mod shell;

use catalog::{Result, Tier, ToolDefinition, ToolRegistry};
use serde_json::{json, Map, Value};

/// Fetch a required string argument.
fn str_arg<'a>(args: &'a Map<String, Value>, key: &str) -> std::result::Result<&'a str, String> {
    args.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| format!("missing required argument: {key}"))
}

/// Fetch an optional string argument.
fn opt_str_arg<'a>(args: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    args.get(key).and_then(Value::as_str)
}

/// Fetch an optional non-negative integer argument.
fn opt_u64_arg(args: &Map<String, Value>, key: &str) -> Option<u64> {
    args.get(key).and_then(Value::as_u64)
}

/// Register the builtin tool set into the given registry.
pub async fn register_builtins(registry: &ToolRegistry) -> Result<()> {
    // --- Filesystem ---

    registry
        .register(
            ToolDefinition::new(
                "read",
                "Read a file's contents",
                json!({
                    "type": "object",
                    "properties": {
                        "file_path": {"type": "string", "description": "Path to the file"},
                        "limit": {"type": "integer", "description": "Maximum lines to return"},
                        "offset": {"type": "integer", "description": "1-based starting line"},
                    },
                    "required": ["file_path"],
                }),
            )
            .with_category("filesystem")
            .with_allowed_paths(["/home", "/workspace", "/tmp"])
            .with_handler(fs::read_file),
        )
        .await?;

    registry
        .register(
            ToolDefinition::new(
                "write",
                "Write content to a file, creating parent directories",
                json!({
                    "type": "object",
                    "properties": {
                        "content": {"type": "string"},
                        "file_path": {"type": "string"},
                    },
                    "required": ["content", "file_path"],
                }),
            )
            .with_category("filesystem")
            .with_allowed_paths(["/home", "/workspace", "/tmp"])
            .with_handler(fs::write_file),
        )
        .await?;

    registry
        .register(
            ToolDefinition::new(
                "list_dir",
                "List directory contents",
                json!({
                    "type": "object",
                    "properties": {
                        "path": {"type": "string", "default": "."},
                    },
                }),
            )
            .with_category("filesystem")
            .with_handler(fs::list_dir),
        )
        .await?;

    registry
        .register(
            ToolDefinition::new(
                "mkdir",
                "Create a directory (and parents)",
                json!({
                    "type": "object",
                    "properties": {
                        "path": {"type": "string"},
                    },
                    "required": ["path"],
                }),
            )
            .with_category("filesystem")
            .with_handler(fs::make_dir),
        )
        .await?;

    registry
        .register(
            ToolDefinition::new(
                "delete",
                "Delete a file or directory",
                json!({
                    "type": "object",
                    "properties": {
                        "path": {"type": "string"},
                    },
                    "required": ["path"],
                }),
            )
            .with_category("filesystem")
            .with_tier(Tier::Manual)
            .with_blocked_paths(["/etc", "/usr", "/bin", "/sbin", "/boot", "/sys"])
            .with_handler(fs::delete_path),
        )
        .await?;

    registry
        .register(
            ToolDefinition::new(
                "exists",
                "Check whether a path exists",
                json!({
                    "type": "object",
                    "properties": {
                        "path": {"type": "string"},
                    },
                    "required": ["path"],
                }),
            )
            .with_category("filesystem")
            .with_handler(fs::path_exists),
        )
        .await?;

    registry
        .register(
            ToolDefinition::new(
                "copy",
                "Copy a file or directory",
                json!({
                    "type": "object",
                    "properties": {
                        "src": {"type": "string"},
                        "dst": {"type": "string"},
                    },
                    "required": ["src", "dst"],
                }),
            )
            .with_category("filesystem")
            .with_tier(Tier::Manual)
            .with_handler(fs::copy_path),
        )
        .await?;

    registry
        .register(
            ToolDefinition::new(
                "move",
                "Move a file or directory",
                json!({
                    "type": "object",
                    "properties": {
                        "src": {"type": "string"},
                        "dst": {"type": "string"},
                    },
                    "required": ["src", "dst"],
                }),
            )
            .with_category("filesystem")
            .with_tier(Tier::Manual)
            .with_handler(fs::move_path),
        )
        .await?;

    registry
        .register(
            ToolDefinition::new(
                "file_info",
                "Get file or directory metadata",
                json!({
                    "type": "object",
                    "properties": {
                        "path": {"type": "string"},
                    },
                    "required": ["path"],
                }),
            )
            .with_category("filesystem")
            .with_handler(fs::file_info),
        )
        .await?;

    // --- System ---

    registry
        .register(
            ToolDefinition::new(
                "exec",
                "Execute a shell command",
                json!({
                    "type": "object",
                    "properties": {
                        "command": {"type": "string", "description": "Command to run"},
                        "workdir": {"type": "string", "description": "Working directory"},
                    },
                    "required": ["command"],
                }),
            )
            .with_category("system")
            .with_tier(Tier::Manual)
            .with_timeout_secs(60)
            .with_handler(shell::exec_command),
        )
        .await?;

    // --- Network ---

    registry
        .register(
            ToolDefinition::new(
                "ping",
                "Ping a host",
                json!({
                    "type": "object",
                    "properties": {
                        "host": {"type": "string"},
                        "count": {"type": "integer", "default": 4},
                    },
                    "required": ["host"],
                }),
            )
            .with_category("network")
            .with_handler(shell::ping),
        )
        .await?;

    registry
        .register(
            ToolDefinition::new(
                "http_request",
                "Make an HTTP request",
                json!({
                    "type": "object",
                    "properties": {
                        "url": {"type": "string"},
                        "method": {"type": "string", "default": "GET"},
                        "body": {"type": "string"},
                    },
                    "required": ["url"],
                }),
            )
            .with_category("network")
            .with_handler(net::http_request),
        )
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn builtins_register_cleanly() {
        let registry = ToolRegistry::new();
        register_builtins(&registry).await.unwrap();

        let categories = registry.list_categories().await;
        assert_eq!(categories, vec!["filesystem", "network", "system"]);

        let delete = registry.get("delete").await.unwrap();
        assert_eq!(delete.tier, Tier::Manual);
        assert!(delete.blocked_paths.contains(&"/etc".to_string()));
        assert!(delete.handler.is_some());

        let exec = registry.get("exec").await.unwrap();
        assert_eq!(exec.timeout_secs, 60);
    }
}
