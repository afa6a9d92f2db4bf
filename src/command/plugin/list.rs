//! `plugin list` — list all installed plugins.

use serde_json::{Map, Value};

use crate::args::ParsedArgs;
use crate::command::{BaseOptions, Command, CommandContext, CommandMeta};
use crate::error::CmdError;
use crate::plugin::PluginPackage;
use crate::ui::ApiFormat;

#[derive(Debug, Default)]
pub struct PluginList;

impl PluginList {
    pub fn meta() -> CommandMeta {
        let (options, flags) = BaseOptions::meta();
        CommandMeta {
            name: "list",
            description: "List all plugins",
            arguments: Vec::new(),
            options,
            flags,
        }
    }

    fn packages(ctx: &CommandContext<'_>) -> Vec<PluginPackage> {
        ctx.registry.all_packages()
    }

    fn output_plain(ctx: &CommandContext<'_>) {
        let mut packages = Self::packages(ctx);
        packages.sort_by(|a, b| a.name.cmp(&b.name));
        for package in &packages {
            ctx.ui.log_info(&package.detail_description());
            ctx.ui.log_info("");
        }
    }

    fn output_data(ctx: &CommandContext<'_>) -> Result<(), CmdError> {
        let mut data = Map::new();
        for package in Self::packages(ctx) {
            let record = serde_json::to_value(&package).map_err(|e| CmdError::Generic {
                domain: "serde".into(),
                code: 0,
                message: e.to_string(),
            })?;
            data.insert(package.name, record);
        }
        ctx.ui.log_api(&Value::Object(data));
        Ok(())
    }
}

impl Command for PluginList {
    fn setup(&mut self, args: &mut ParsedArgs, ctx: &CommandContext<'_>) -> Result<(), CmdError> {
        BaseOptions::shift(args, ctx.ui)?;
        Ok(())
    }

    fn run(&mut self, ctx: &CommandContext<'_>) -> Result<(), CmdError> {
        if ctx.ui.api_format() == ApiFormat::None {
            Self::output_plain(ctx);
            Ok(())
        } else {
            Self::output_data(ctx)
        }
    }
}
