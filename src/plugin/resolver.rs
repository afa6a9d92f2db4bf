//! Launcher item resolution.
//!
//! Turns user-supplied name tokens plus role filters into the concrete
//! ordered item list a launch invocation will attempt. Pure with respect to
//! registry state; duplicates and input order are preserved as given.

use crate::error::{ArgumentError, CmdError};
use crate::plugin::{LauncherItem, PluginRegistry};

/// Resolve `names` (each `plugin` or `plugin/item`) against the registry.
///
/// With no names, falls back to every registered plugin (`all`) or the
/// currently active set, filtered by `roles`.
pub fn resolve_launcher_items(
    registry: &dyn PluginRegistry,
    names: &[String],
    roles: &[String],
    all: bool,
) -> Result<Vec<LauncherItem>, CmdError> {
    let mut items = Vec::new();
    for name in names {
        let (plugin_name, item_name) = match name.split_once('/') {
            Some((plugin, item)) if !item.is_empty() => (plugin, Some(item)),
            Some((plugin, _)) => (plugin, None),
            None => (name.as_str(), None),
        };
        let Some(package) = registry.package(plugin_name) else {
            return Err(ArgumentError::InvalidValue {
                value: name.clone(),
                argument: "name".into(),
            }
            .into());
        };
        if !package.has_launcher {
            return Err(CmdError::user(format!(
                "[{}] No launcher in the plugin.",
                package.name
            )));
        }
        match item_name {
            None => items.extend(package.launcher_items.iter().cloned()),
            Some(item_name) => match package.launcher_item(item_name) {
                Some(item) => items.push(item.clone()),
                None => {
                    return Err(ArgumentError::InvalidValue {
                        value: name.clone(),
                        argument: "name".into(),
                    }
                    .into())
                }
            },
        }
    }

    if items.is_empty() {
        let packages = if all {
            registry.all_packages()
        } else {
            registry
                .active_plugins()
                .iter()
                .filter_map(|name| registry.package(name))
                .collect()
        };
        items = registry.launcher_items(&packages, roles);
    }
    Ok(items)
}
