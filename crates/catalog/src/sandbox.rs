//! Path sandbox: allow/block prefix checks for path-bearing arguments.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::tool::ToolDefinition;

/// Argument keys treated as path-bearing.
const PATH_ARG_KEYS: &[&str] = &["file_path", "path", "directory", "src", "dst", "workdir"];

/// A sandbox rule rejected a path argument.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SandboxViolation {
    /// The path matched a blocked prefix. Block rules win even when an
    /// allow prefix also matches.
    #[error("path blocked: {path}")]
    Blocked { path: String },

    /// The tool declares an allow list and the path matched none of it.
    #[error("path not allowed: {path}")]
    NotAllowed { path: String },
}

/// Check every path-bearing argument against the definition's sandbox rules.
///
/// Block-list evaluation always precedes allow-list evaluation. An empty
/// allow list imposes no allow restriction; only the block list applies.
pub fn check_paths(def: &ToolDefinition, args: &Map<String, Value>) -> Result<(), SandboxViolation> {
    for key in PATH_ARG_KEYS {
        let Some(value) = args.get(*key).and_then(Value::as_str) else {
            continue;
        };
        let path = normalize(value);

        if def.blocked_paths.iter().any(|bp| path.starts_with(bp)) {
            return Err(SandboxViolation::Blocked {
                path: value.to_string(),
            });
        }
        if !def.allowed_paths.is_empty()
            && !def.allowed_paths.iter().any(|ap| path.starts_with(ap))
        {
            return Err(SandboxViolation::NotAllowed {
                path: value.to_string(),
            });
        }
    }
    Ok(())
}

/// Lexically normalize a path: collapse `.` and resolve `..` against
/// preceding components, so `/tmp/../etc/passwd` compares as `/etc/passwd`.
///
/// Symlinks are not resolved; the prefix comparison stays purely textual.
pub fn normalize(path: &str) -> String {
    let absolute = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for component in path.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                if parts.pop().is_none() && !absolute {
                    // Relative path escaping its base; keep the component so
                    // the prefix check sees the escape attempt.
                    parts.push("..");
                }
            }
            other => parts.push(other),
        }
    }

    if absolute {
        format!("/{}", parts.join("/"))
    } else if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::ToolDefinition;
    use serde_json::json;

    fn args(key: &str, path: &str) -> Map<String, Value> {
        let mut m = Map::new();
        m.insert(key.to_string(), json!(path));
        m
    }

    #[test]
    fn no_rules_passes_everything() {
        let def = ToolDefinition::new("t", "test", json!({}));
        assert!(check_paths(&def, &args("path", "/etc/passwd")).is_ok());
    }

    #[test]
    fn blocked_prefix_rejects() {
        let def = ToolDefinition::new("t", "test", json!({})).with_blocked_paths(["/etc"]);
        let err = check_paths(&def, &args("path", "/etc/passwd")).unwrap_err();
        assert_eq!(
            err,
            SandboxViolation::Blocked {
                path: "/etc/passwd".to_string()
            }
        );
    }

    #[test]
    fn block_wins_over_allow() {
        let def = ToolDefinition::new("t", "test", json!({}))
            .with_allowed_paths(["/etc"])
            .with_blocked_paths(["/etc"]);
        let err = check_paths(&def, &args("file_path", "/etc/hosts")).unwrap_err();
        assert!(matches!(err, SandboxViolation::Blocked { .. }));
    }

    #[test]
    fn allow_list_restricts_when_non_empty() {
        let def = ToolDefinition::new("t", "test", json!({})).with_allowed_paths(["/tmp", "/home"]);
        assert!(check_paths(&def, &args("path", "/tmp/scratch")).is_ok());
        assert!(check_paths(&def, &args("path", "/var/log/syslog")).is_err());
    }

    #[test]
    fn empty_allow_list_is_unrestricted() {
        let def = ToolDefinition::new("t", "test", json!({})).with_blocked_paths(["/sys"]);
        assert!(check_paths(&def, &args("directory", "/opt/data")).is_ok());
    }

    #[test]
    fn dotdot_cannot_escape_block() {
        let def = ToolDefinition::new("t", "test", json!({})).with_blocked_paths(["/etc"]);
        let err = check_paths(&def, &args("path", "/tmp/../etc/passwd")).unwrap_err();
        assert!(matches!(err, SandboxViolation::Blocked { .. }));
    }

    #[test]
    fn dotdot_cannot_fake_allow() {
        let def = ToolDefinition::new("t", "test", json!({})).with_allowed_paths(["/tmp"]);
        // Textually under /tmp but resolves outside it.
        assert!(check_paths(&def, &args("path", "/tmp/../root/.ssh")).is_err());
    }

    #[test]
    fn non_path_args_ignored() {
        let def = ToolDefinition::new("t", "test", json!({})).with_blocked_paths(["/etc"]);
        let mut m = Map::new();
        m.insert("text".to_string(), json!("/etc/passwd"));
        assert!(check_paths(&def, &m).is_ok());
    }

    #[test]
    fn normalize_cases() {
        assert_eq!(normalize("/tmp/../etc/passwd"), "/etc/passwd");
        assert_eq!(normalize("/tmp/./a//b"), "/tmp/a/b");
        assert_eq!(normalize("a/../../b"), "../b");
        assert_eq!(normalize("./"), ".");
        assert_eq!(normalize("/../etc"), "/etc");
    }
}
