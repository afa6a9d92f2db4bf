//! Shared test fixtures.

#![allow(dead_code, unused_imports)]

use std::collections::HashMap;

use mbx::dispatch::Invocation;
use mbx::plugin::{LauncherItem, LauncherType, MemoryRegistry, PluginPackage};
use mbx::ui::Ui;
use tempfile::TempDir;

/// A Ui logging into a temp dir; keep the TempDir alive for the test.
pub fn ui() -> (Ui, TempDir) {
    let dir = tempfile::tempdir().expect("temp dir");
    let ui = Ui::new(dir.path());
    (ui, dir)
}

pub fn invocation(args: &[&str]) -> Invocation {
    Invocation {
        arguments: args.iter().map(|s| s.to_string()).collect(),
        exe_name: "mbx".to_string(),
        env: HashMap::new(),
    }
}

pub fn with_env(mut invocation: Invocation, env: &[(&str, &str)]) -> Invocation {
    for (key, value) in env {
        invocation.env.insert(key.to_string(), value.to_string());
    }
    invocation
}

pub fn item(plugin: &str, name: &str, roles: &[&str]) -> LauncherItem {
    LauncherItem {
        plugin: plugin.to_string(),
        name: name.to_string(),
        launcher_type: LauncherType::Shell,
        roles: roles.iter().map(|r| r.to_string()).collect(),
    }
}

pub fn package(name: &str, items: Vec<LauncherItem>) -> PluginPackage {
    PluginPackage {
        name: name.to_string(),
        version: Some("1.0.0".to_string()),
        description: None,
        has_launcher: true,
        launcher_items: items,
    }
}

pub fn launcherless_package(name: &str) -> PluginPackage {
    PluginPackage {
        name: name.to_string(),
        version: None,
        description: None,
        has_launcher: false,
        launcher_items: Vec::new(),
    }
}

/// Registry with plugin `foo` (items `A` role qa, `B` role prod, both
/// active) and a launcher-less plugin `bare`.
pub fn standard_registry() -> MemoryRegistry {
    MemoryRegistry::new(vec![
        package("foo", vec![item("foo", "A", &["qa"]), item("foo", "B", &["prod"])]),
        launcherless_package("bare"),
    ])
    .with_active(vec!["foo".to_string()])
}
