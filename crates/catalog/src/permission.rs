//! Permission resolution: global mode against per-tool tier.

use serde::{Deserialize, Serialize};

use crate::tool::{Tier, ToolDefinition};

/// Process-wide permission override.
///
/// When not [`PermissionMode::Auto`], the mode dominates every tool's own
/// tier. This ordering is the single source of truth for whether a remote
/// policy check is attempted at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PermissionMode {
    /// Resolve from each tool's own tier.
    #[default]
    Auto,
    /// Deny every tool regardless of tier.
    DenyAll,
    /// Force every tool through manual (policy) approval.
    ManualAll,
}

impl std::str::FromStr for PermissionMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Self::Auto),
            "deny_all" => Ok(Self::DenyAll),
            "manual_all" => Ok(Self::ManualAll),
            other => Err(format!("invalid permission mode: {other}")),
        }
    }
}

impl std::fmt::Display for PermissionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Auto => "auto",
            Self::DenyAll => "deny_all",
            Self::ManualAll => "manual_all",
        };
        write!(f, "{s}")
    }
}

/// Resolve the effective tier for a (possibly unknown) definition.
///
/// Unknown tools resolve to `Deny`. A non-`Auto` mode dominates the tool's
/// own tier; in `Auto` mode the tool's tier stands.
pub fn effective_tier(mode: PermissionMode, def: Option<&ToolDefinition>) -> Tier {
    let Some(def) = def else {
        return Tier::Deny;
    };

    match mode {
        PermissionMode::DenyAll => Tier::Deny,
        PermissionMode::ManualAll => Tier::Manual,
        PermissionMode::Auto => def.tier,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn def(tier: Tier) -> ToolDefinition {
        ToolDefinition::new("t", "test tool", json!({})).with_tier(tier)
    }

    #[test]
    fn unknown_tool_is_denied_in_every_mode() {
        for mode in [
            PermissionMode::Auto,
            PermissionMode::DenyAll,
            PermissionMode::ManualAll,
        ] {
            assert_eq!(effective_tier(mode, None), Tier::Deny);
        }
    }

    #[test]
    fn deny_all_dominates_tier() {
        for tier in [Tier::Deny, Tier::Auto, Tier::Manual, Tier::Beta] {
            assert_eq!(
                effective_tier(PermissionMode::DenyAll, Some(&def(tier))),
                Tier::Deny
            );
        }
    }

    #[test]
    fn manual_all_dominates_tier() {
        for tier in [Tier::Deny, Tier::Auto, Tier::Manual, Tier::Beta] {
            assert_eq!(
                effective_tier(PermissionMode::ManualAll, Some(&def(tier))),
                Tier::Manual
            );
        }
    }

    #[test]
    fn auto_mode_defers_to_tool_tier() {
        for tier in [Tier::Deny, Tier::Auto, Tier::Manual, Tier::Beta] {
            assert_eq!(effective_tier(PermissionMode::Auto, Some(&def(tier))), tier);
        }
    }

    #[test]
    fn mode_from_str() {
        assert_eq!(
            "deny_all".parse::<PermissionMode>().unwrap(),
            PermissionMode::DenyAll
        );
        assert!("yolo".parse::<PermissionMode>().is_err());
    }
}
