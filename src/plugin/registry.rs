//! Plugin registry boundary.
//!
//! Discovery and storage live outside the command core; the core only
//! consumes this trait. `MemoryRegistry` is the in-process implementation
//! used for wiring and tests.

use std::collections::HashSet;

use crate::plugin::{LaunchResult, LauncherItem, LauncherType, PluginPackage};

/// Read access to installed packages plus the launch execution contract.
pub trait PluginRegistry: Send + Sync {
    /// Every installed package, in registry order.
    fn all_packages(&self) -> Vec<PluginPackage>;

    /// Exact-name lookup. Case-sensitive: plugin names are registry keys.
    fn package(&self, name: &str) -> Option<PluginPackage>;

    /// Names of the plugins active in the current working context.
    fn active_plugins(&self) -> Vec<String>;

    /// Launcher items of the given packages, filtered by role.
    fn launcher_items(&self, packages: &[PluginPackage], roles: &[String]) -> Vec<LauncherItem> {
        packages
            .iter()
            .flat_map(|p| p.launcher_items.iter())
            .filter(|item| item.matches_roles(roles))
            .cloned()
            .collect()
    }

    /// Attempt every item independently: one failure never suppresses the
    /// attempts on the rest, and every requested item lands in exactly one
    /// result set.
    fn install_launcher_items(
        &self,
        items: &[LauncherItem],
        script: Option<LauncherType>,
    ) -> LaunchResult;
}

/// In-memory registry. Launch attempts do not spawn anything; items listed
/// in `failing` report failure, everything else succeeds.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    packages: Vec<PluginPackage>,
    active: Vec<String>,
    failing: HashSet<String>,
}

impl MemoryRegistry {
    pub fn new(packages: Vec<PluginPackage>) -> Self {
        Self {
            packages,
            active: Vec::new(),
            failing: HashSet::new(),
        }
    }

    pub fn with_active(mut self, active: Vec<String>) -> Self {
        self.active = active;
        self
    }

    /// Mark item ids (`plugin/item`) whose launch attempts should fail.
    pub fn with_failing(mut self, failing: impl IntoIterator<Item = String>) -> Self {
        self.failing = failing.into_iter().collect();
        self
    }
}

impl PluginRegistry for MemoryRegistry {
    fn all_packages(&self) -> Vec<PluginPackage> {
        self.packages.clone()
    }

    fn package(&self, name: &str) -> Option<PluginPackage> {
        self.packages.iter().find(|p| p.name == name).cloned()
    }

    fn active_plugins(&self) -> Vec<String> {
        self.active.clone()
    }

    fn install_launcher_items(
        &self,
        items: &[LauncherItem],
        script: Option<LauncherType>,
    ) -> LaunchResult {
        let mut result = LaunchResult::default();
        for item in items {
            // A script override only launches items of that kind; mismatched
            // items still report, on the failed side.
            let type_ok = script.is_none_or(|s| s == item.launcher_type);
            let ok = type_ok && !self.failing.contains(&item.id());
            result.record(item.id(), ok);
        }
        result
    }
}
