//! The `plugin` command family.

mod launch;
mod list;

pub use launch::PluginLaunch;
pub use list::PluginList;
