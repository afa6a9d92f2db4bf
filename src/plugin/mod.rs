//! Plugin package data model.
//!
//! Packages themselves are external: how they are discovered and stored is
//! the registry's business. This module only carries the read-only shapes
//! the command core consumes.

mod registry;
mod resolver;

pub use registry::{MemoryRegistry, PluginRegistry};
pub use resolver::resolve_launcher_items;

use serde::{Deserialize, Serialize};

use crate::error::ArgumentError;

/// The fixed set of script kinds a launcher item can run under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LauncherType {
    Shell,
    Python,
    Ruby,
    Node,
}

impl LauncherType {
    pub const ALL: [LauncherType; 4] = [
        LauncherType::Shell,
        LauncherType::Python,
        LauncherType::Ruby,
        LauncherType::Node,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            LauncherType::Shell => "shell",
            LauncherType::Python => "python",
            LauncherType::Ruby => "ruby",
            LauncherType::Node => "node",
        }
    }

    /// Case-insensitive lookup, mirroring how `--script` values arrive.
    pub fn parse(value: &str) -> Result<Self, ArgumentError> {
        let lowered = value.to_ascii_lowercase();
        LauncherType::ALL
            .into_iter()
            .find(|t| t.name() == lowered)
            .ok_or_else(|| ArgumentError::InvalidValue {
                value: value.to_string(),
                argument: "script".to_string(),
            })
    }
}

/// One launchable unit owned by a plugin package. The item name is
/// case-insensitively unique within its plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LauncherItem {
    pub plugin: String,
    pub name: String,
    pub launcher_type: LauncherType,
    /// Empty means the item applies under every role.
    #[serde(default)]
    pub roles: Vec<String>,
}

impl LauncherItem {
    /// Identifier used in launch reporting: `plugin/item`.
    pub fn id(&self) -> String {
        format!("{}/{}", self.plugin, self.name)
    }

    /// Role filter: an item passes with an empty role set or any overlap
    /// with the requested roles. No requested roles means no filtering.
    pub fn matches_roles(&self, roles: &[String]) -> bool {
        roles.is_empty()
            || self.roles.is_empty()
            || self.roles.iter().any(|r| roles.contains(r))
    }
}

/// An installed plugin package, read-only from the command core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginPackage {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub has_launcher: bool,
    #[serde(default)]
    pub launcher_items: Vec<LauncherItem>,
}

impl PluginPackage {
    /// Case-insensitive item lookup within this package.
    pub fn launcher_item(&self, item_name: &str) -> Option<&LauncherItem> {
        self.launcher_items
            .iter()
            .find(|item| item.name.eq_ignore_ascii_case(item_name))
    }

    /// The plain-text block `list` prints per package.
    pub fn detail_description(&self) -> String {
        let mut lines = vec![match &self.version {
            Some(version) => format!("{} ({version})", self.name),
            None => self.name.clone(),
        }];
        if let Some(description) = &self.description {
            lines.push(format!("    {description}"));
        }
        for item in &self.launcher_items {
            lines.push(format!("    launcher: {} [{}]", item.name, item.launcher_type.name()));
        }
        lines.join("\n")
    }
}

/// Aggregate outcome of a launch invocation: every requested item lands in
/// exactly one of the two sets, input-order stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LaunchResult {
    pub success: Vec<String>,
    pub failed: Vec<String>,
}

impl LaunchResult {
    pub fn record(&mut self, id: String, ok: bool) {
        if ok {
            self.success.push(id);
        } else {
            self.failed.push(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn launcher_type_parse_is_case_insensitive() {
        assert_eq!(LauncherType::parse("Python"), Ok(LauncherType::Python));
        assert_eq!(LauncherType::parse("SHELL"), Ok(LauncherType::Shell));
        assert!(matches!(
            LauncherType::parse("perl"),
            Err(ArgumentError::InvalidValue { .. })
        ));
    }

    #[test]
    fn item_lookup_ignores_case() {
        let package = PluginPackage {
            name: "foo".into(),
            version: None,
            description: None,
            has_launcher: true,
            launcher_items: vec![LauncherItem {
                plugin: "foo".into(),
                name: "Setup".into(),
                launcher_type: LauncherType::Shell,
                roles: vec![],
            }],
        };
        assert!(package.launcher_item("setup").is_some());
        assert!(package.launcher_item("SETUP").is_some());
        assert!(package.launcher_item("other").is_none());
    }

    #[test]
    fn role_matching_rules() {
        let mut item = LauncherItem {
            plugin: "foo".into(),
            name: "a".into(),
            launcher_type: LauncherType::Shell,
            roles: vec!["qa".into()],
        };
        assert!(item.matches_roles(&["qa".into()]));
        assert!(!item.matches_roles(&["prod".into()]));
        assert!(item.matches_roles(&[]));
        item.roles.clear();
        assert!(item.matches_roles(&["prod".into()]));
    }
}
