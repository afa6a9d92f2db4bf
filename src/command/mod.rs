//! Command model — the closed set of command kinds and their lifecycle.
//!
//! A command is a short-lived object: instantiated after group resolution,
//! driven through setup → validate → run, and discarded when the process
//! exits. Any error in setup or validate aborts the lifecycle before run
//! and propagates to the dispatcher unchanged.

pub mod group;
pub mod help;
mod plugin;

pub use plugin::{PluginLaunch, PluginList};

use std::collections::HashMap;

use tracing::debug;

use crate::args::ParsedArgs;
use crate::error::{ArgumentError, CmdError};
use crate::plugin::PluginRegistry;
use crate::ui::{ApiFormat, Ui};

/// Everything a command needs beyond its own consumed arguments.
pub struct CommandContext<'a> {
    pub ui: &'a Ui,
    pub registry: &'a dyn PluginRegistry,
    pub env: &'a HashMap<String, String>,
}

/// A positional argument declared by a command.
#[derive(Debug, Clone)]
pub struct ArgumentSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub plural: bool,
}

/// A named option declared by a command. `values` constrains the accepted
/// set when non-empty.
#[derive(Debug, Clone)]
pub struct OptionSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub values: Vec<String>,
}

/// A boolean flag declared by a command.
#[derive(Debug, Clone)]
pub struct FlagSpec {
    pub name: &'static str,
    pub short: Option<char>,
    pub description: &'static str,
}

/// Static metadata describing one command, used by help rendering.
#[derive(Debug, Clone)]
pub struct CommandMeta {
    pub name: &'static str,
    pub description: &'static str,
    pub arguments: Vec<ArgumentSpec>,
    pub options: Vec<OptionSpec>,
    pub flags: Vec<FlagSpec>,
}

/// Options every command understands, consumed at the tail of setup.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseOptions {
    pub help: bool,
    pub api: ApiFormat,
}

impl BaseOptions {
    /// Declarations shared by every command.
    pub fn meta() -> (Vec<OptionSpec>, Vec<FlagSpec>) {
        (
            vec![OptionSpec {
                name: "api",
                description: "Structured output format (none/json)",
                values: vec!["none".into(), "json".into()],
            }],
            vec![FlagSpec {
                name: "help",
                short: Some('h'),
                description: "Show help",
            }],
        )
    }

    /// Consume the base flags/options and mirror them into the Ui.
    pub fn shift(args: &mut ParsedArgs, ui: &Ui) -> Result<Self, CmdError> {
        let help = args.shift_flag("help", Some('h'));
        let api = match args.shift_option("api")? {
            Some(value) => {
                ApiFormat::parse(&value).ok_or(ArgumentError::InvalidValue {
                    value,
                    argument: "api".into(),
                })?
            }
            None => ApiFormat::None,
        };
        if help {
            ui.set_show_help(true);
        }
        if api != ApiFormat::None {
            ui.set_api_format(api);
        }
        Ok(Self { help, api })
    }
}

/// One command invocation. Setup must shift in declaration order — flags,
/// then single-value options, then multi-value options, then positionals —
/// since consumption is destructive on the shared cursor.
pub trait Command {
    fn setup(&mut self, args: &mut ParsedArgs, ctx: &CommandContext<'_>) -> Result<(), CmdError>;

    /// Semantic checks needing data beyond argument shape. Runs only after
    /// setup consumed all syntactic input.
    fn validate(&mut self, _ctx: &CommandContext<'_>) -> Result<(), CmdError> {
        Ok(())
    }

    fn run(&mut self, ctx: &CommandContext<'_>) -> Result<(), CmdError>;
}

/// The closed set of command kinds the tool dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// `plugin` without a subcommand; forwards to `plugin list`.
    Plugin,
    PluginList,
    PluginLaunch,
}

impl CommandKind {
    /// Forward target, resolved before instantiation. The original kind is
    /// never run when a forward is declared.
    pub fn forward(&self) -> Option<CommandKind> {
        match self {
            CommandKind::Plugin => Some(CommandKind::PluginList),
            _ => None,
        }
    }

    /// The kind that will actually be instantiated.
    pub fn resolved(&self) -> CommandKind {
        self.forward().unwrap_or(*self)
    }

    pub fn full_name(&self) -> &'static str {
        match self {
            CommandKind::Plugin => "plugin",
            CommandKind::PluginList => "plugin.list",
            CommandKind::PluginLaunch => "plugin.launch",
        }
    }

    pub fn meta(&self) -> CommandMeta {
        match self.resolved() {
            CommandKind::PluginList => PluginList::meta(),
            CommandKind::PluginLaunch => PluginLaunch::meta(),
            CommandKind::Plugin => PluginList::meta(),
        }
    }

    pub fn instantiate(&self) -> Box<dyn Command> {
        match self.resolved() {
            CommandKind::PluginList | CommandKind::Plugin => Box::<PluginList>::default(),
            CommandKind::PluginLaunch => Box::<PluginLaunch>::default(),
        }
    }
}

/// Drive one command instance through its whole lifecycle.
pub fn run_lifecycle(
    kind: CommandKind,
    args: &mut ParsedArgs,
    ctx: &CommandContext<'_>,
) -> Result<(), CmdError> {
    let kind = kind.resolved();
    let mut command = kind.instantiate();
    debug!(command = kind.full_name(), stage = "setup");
    command.setup(args, ctx)?;
    debug!(command = kind.full_name(), stage = "validate");
    command.validate(ctx)?;
    if ctx.ui.show_help() {
        // Help requests stop before run; the dispatcher renders the help.
        return Ok(());
    }
    debug!(command = kind.full_name(), stage = "run");
    command.run(ctx)
}
