//! `plugin launch` — resolve and run plugin launchers.

use serde_json::json;

use crate::args::ParsedArgs;
use crate::command::{
    ArgumentSpec, BaseOptions, Command, CommandContext, CommandMeta, FlagSpec, OptionSpec,
};
use crate::error::CmdError;
use crate::plugin::{resolve_launcher_items, LauncherItem, LauncherType};
use crate::ui::ApiFormat;

/// Environment variable supplying the default role filter.
const ROLES_ENV: &str = "MBOX_ROLES";

#[derive(Debug, Default)]
pub struct PluginLaunch {
    names: Vec<String>,
    roles: Vec<String>,
    all: bool,
    script: Option<LauncherType>,
    items: Vec<LauncherItem>,
}

impl PluginLaunch {
    pub fn meta() -> CommandMeta {
        let (mut options, mut flags) = BaseOptions::meta();
        options.insert(
            0,
            OptionSpec {
                name: "script",
                description: "Run the script name",
                values: LauncherType::ALL.iter().map(|t| t.name().to_string()).collect(),
            },
        );
        options.insert(
            1,
            OptionSpec {
                name: "role",
                description: "Set current role, defaults to environment variable `MBOX_ROLES`",
                values: Vec::new(),
            },
        );
        flags.insert(
            0,
            FlagSpec {
                name: "all",
                short: None,
                description: "All Plugins",
            },
        );
        CommandMeta {
            name: "launch",
            description: "Run a plugin launcher",
            arguments: vec![ArgumentSpec {
                name: "name",
                description: "Launcher names",
                plural: true,
            }],
            options,
            flags,
        }
    }
}

impl Command for PluginLaunch {
    fn setup(&mut self, args: &mut ParsedArgs, ctx: &CommandContext<'_>) -> Result<(), CmdError> {
        self.all = args.shift_flag("all", None);
        if let Some(script) = args.shift_option("script")? {
            self.script = Some(LauncherType::parse(&script)?);
        }
        if let Some(roles) = args.shift_options("role")? {
            self.roles = roles;
        } else if let Some(roles) = ctx.env.get(ROLES_ENV) {
            self.roles = roles
                .split(',')
                .filter(|r| !r.is_empty())
                .map(str::to_string)
                .collect();
        }
        BaseOptions::shift(args, ctx.ui)?;
        self.names = args.shift_arguments();
        Ok(())
    }

    fn validate(&mut self, ctx: &CommandContext<'_>) -> Result<(), CmdError> {
        self.items = resolve_launcher_items(ctx.registry, &self.names, &self.roles, self.all)?;
        Ok(())
    }

    fn run(&mut self, ctx: &CommandContext<'_>) -> Result<(), CmdError> {
        let result = ctx.registry.install_launcher_items(&self.items, self.script);
        if ctx.ui.api_format() != ApiFormat::None {
            ctx.ui.log_api(&json!({
                "success": result.success,
                "failed": result.failed,
            }));
        }
        ctx.ui
            .set_status_code(if result.failed.is_empty() { 0 } else { 1 });
        Ok(())
    }
}
