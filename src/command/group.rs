//! Command group tree and resolution.
//!
//! A group maps the next positional path segment to either a terminal
//! command kind or a deeper group. Resolution consumes the segments it
//! matches; everything after the terminal node belongs to the command's
//! own setup.

use crate::args::ParsedArgs;
use crate::command::{BaseOptions, CommandKind};
use crate::error::{ArgumentError, CmdError};
use crate::ui::Ui;

/// One node of the subcommand tree.
#[derive(Debug, Clone)]
pub struct CommandGroup {
    pub name: &'static str,
    /// The group's own terminal command, run when no deeper segment
    /// matches (e.g. bare `mbx plugin`).
    pub command: Option<CommandKind>,
    pub subgroups: Vec<CommandGroup>,
}

impl CommandGroup {
    /// The whole tree of this tool.
    pub fn root() -> Self {
        CommandGroup {
            name: "mbx",
            command: None,
            subgroups: vec![CommandGroup {
                name: "plugin",
                command: Some(CommandKind::Plugin),
                subgroups: vec![
                    CommandGroup::leaf("list", CommandKind::PluginList),
                    CommandGroup::leaf("launch", CommandKind::PluginLaunch),
                ],
            }],
        }
    }

    fn leaf(name: &'static str, command: CommandKind) -> Self {
        CommandGroup {
            name,
            command: Some(command),
            subgroups: Vec::new(),
        }
    }

    fn subgroup(&self, name: &str) -> Option<&CommandGroup> {
        self.subgroups.iter().find(|g| g.name == name)
    }
}

/// Where resolution landed: the deepest matched group and the command kind
/// to instantiate, forwarding already applied.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub group: CommandGroup,
    pub command: CommandKind,
}

/// Walk the tree along the unconsumed positional arguments.
///
/// When the first segment matches nothing, a base command still consumes
/// the base-level options first so that shape errors on those surface
/// ahead of the unknown-command report; with well-formed base options the
/// error is always `InvalidCommand`.
pub fn resolve(
    root: &CommandGroup,
    args: &mut ParsedArgs,
    ui: &Ui,
) -> Result<Resolved, CmdError> {
    let mut group = root;
    let mut descended = false;
    while let Some(next) = args.peek_argument() {
        match group.subgroup(next) {
            Some(sub) => {
                let _ = args.shift_argument();
                group = sub;
                descended = true;
            }
            None if descended => break,
            None => {
                let token = next.to_string();
                BaseOptions::shift(args, ui)?;
                return Err(ArgumentError::InvalidCommand(Some(token)).into());
            }
        }
    }
    match group.command {
        Some(command) => Ok(Resolved {
            group: group.clone(),
            command: command.resolved(),
        }),
        // A matched group without a terminal command is reported silently:
        // the dispatcher prints help, nothing else.
        None => Err(ArgumentError::InvalidCommand(None).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ui() -> Ui {
        let dir = tempfile::tempdir().unwrap();
        let ui = Ui::new(dir.path());
        ui.logger().disable();
        ui
    }

    fn args(tokens: &[&str]) -> ParsedArgs {
        let argv: Vec<String> = tokens.iter().map(|s| s.to_string()).collect();
        ParsedArgs::new(&argv)
    }

    #[test]
    fn resolves_nested_leaf() {
        let mut argv = args(&["plugin", "launch", "foo"]);
        let resolved = resolve(&CommandGroup::root(), &mut argv, &ui()).unwrap();
        assert_eq!(resolved.command, CommandKind::PluginLaunch);
        assert_eq!(resolved.group.name, "launch");
        // The leading segments are consumed, the command's own args remain.
        assert_eq!(argv.shift_argument().as_deref(), Some("foo"));
    }

    #[test]
    fn bare_group_forwards_to_its_command() {
        let mut argv = args(&["plugin"]);
        let resolved = resolve(&CommandGroup::root(), &mut argv, &ui()).unwrap();
        assert_eq!(resolved.command, CommandKind::PluginList);
    }

    #[test]
    fn unknown_first_segment_is_invalid_command() {
        let mut argv = args(&["bogus"]);
        let err = resolve(&CommandGroup::root(), &mut argv, &ui()).unwrap_err();
        assert!(matches!(
            err,
            CmdError::Argument(ArgumentError::InvalidCommand(Some(t))) if t == "bogus"
        ));
    }

    #[test]
    fn base_option_shape_error_reported_before_unknown_command() {
        let mut argv = args(&["bogus", "--api"]);
        let err = resolve(&CommandGroup::root(), &mut argv, &ui()).unwrap_err();
        assert!(matches!(
            err,
            CmdError::Argument(ArgumentError::MissingValue(opt)) if opt == "api"
        ));
    }

    #[test]
    fn no_arguments_is_silent_invalid_command() {
        let mut argv = args(&[]);
        let err = resolve(&CommandGroup::root(), &mut argv, &ui()).unwrap_err();
        assert!(matches!(
            err,
            CmdError::Argument(ArgumentError::InvalidCommand(None))
        ));
    }

    #[test]
    fn extra_segment_after_leaf_stays_positional() {
        let mut argv = args(&["plugin", "list", "leftover"]);
        let resolved = resolve(&CommandGroup::root(), &mut argv, &ui()).unwrap();
        assert_eq!(resolved.command, CommandKind::PluginList);
        assert_eq!(argv.shift_argument().as_deref(), Some("leftover"));
    }
}
