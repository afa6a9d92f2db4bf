//! Dispatch orchestration.
//!
//! The single top-level driver: create the session, arm the signal
//! supervisor, consume the global options, resolve the command group, run
//! the command lifecycle, classify whatever came out of it, and leave
//! through exactly one finish + teardown, no matter which path got there.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Local;
use crossterm::terminal::disable_raw_mode;
use tracing::debug;

use crate::args::ParsedArgs;
use crate::command::group::{self, CommandGroup, Resolved};
use crate::command::{help, run_lifecycle, CommandContext, CommandKind};
use crate::error::{exit_code, CmdError, USER_ERROR_CODE};
use crate::plugin::PluginRegistry;
use crate::session::{session_title, Session};
use crate::ui::{ApiFormat, Pipe, Ui};

/// Exit code when a development-mode invocation lacks its root.
pub const DEV_ROOT_MISSING_CODE: i32 = 253;

/// Executable name that switches on development mode.
const DEV_EXECUTABLE: &str = "mdev";

const DEV_ROOT_ENV: &str = "MBOX2_DEVELOPMENT_ROOT";

/// Raw process inputs, captured once so tests can fabricate them.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// argv without the executable.
    pub arguments: Vec<String>,
    /// File name of argv[0].
    pub exe_name: String,
    pub env: HashMap<String, String>,
}

impl Invocation {
    pub fn from_process() -> Self {
        let mut argv = std::env::args();
        let exe_name = argv
            .next()
            .map(|exe| {
                Path::new(&exe)
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or(exe)
            })
            .unwrap_or_default();
        Self {
            arguments: argv.collect(),
            exe_name,
            env: std::env::vars().collect(),
        }
    }
}

/// How an invocation wants to leave the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    /// Go through the shared finish computation with this pending code.
    Finished(i32),
    /// Hard exit, skipping finish entirely (refusals that must not touch
    /// the log file).
    Immediate(i32),
}

/// The single convergence point for normal and signal termination.
pub struct Finisher {
    ui: Ui,
    finishing: AtomicBool,
}

impl Finisher {
    pub fn new(ui: Ui) -> Self {
        Self {
            ui,
            finishing: AtomicBool::new(false),
        }
    }

    pub fn ui(&self) -> &Ui {
        &self.ui
    }

    /// Shared finish step: summary replay, duration accounting, then the
    /// pure exit-code mapping.
    pub fn finish(&self, pending: i32, error: Option<&CmdError>) -> i32 {
        self.ui.flush_summaries();
        if let Some(elapsed) = self.ui.session_elapsed() {
            self.ui.set_duration(elapsed);
            // The separator is log-file bookkeeping, verbose file only.
            let bar = "==".repeat(20);
            self.ui
                .logger()
                .verbose(&format!("{bar} {:.3}s {bar}", elapsed.as_secs_f64()));
        }
        exit_code(pending, error, self.ui.show_help())
    }

    /// Teardown exactly once, then terminate. Safe to reach from both the
    /// dispatch path and the signal thread.
    pub fn exit_app(&self, code: i32) -> ! {
        if !self.finishing.swap(true, Ordering::SeqCst) {
            self.ui.logger().flush();
            let _ = std::fs::remove_dir_all(scratch_dir());
            self.ui.clear_session();
        }
        process::exit(code)
    }
}

/// Per-run scratch directory, removed at teardown.
pub fn scratch_dir() -> PathBuf {
    std::env::temp_dir()
        .join("mbx")
        .join(format!("tmp-{}", process::id()))
}

fn default_log_dir() -> PathBuf {
    std::env::temp_dir().join("mbx").join("logs")
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(home) = dirs::home_dir() {
        if path == "~" {
            return home;
        }
        if let Some(rest) = path.strip_prefix("~/") {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Process entry. Never returns: every path leaves through
/// [`Finisher::exit_app`].
pub fn run_commander(registry: &dyn PluginRegistry) -> ! {
    init_tracing();
    let invocation = Invocation::from_process();
    let ui = Ui::new(&default_log_dir());
    let finisher = Arc::new(Finisher::new(ui.clone()));

    let code = match dispatch(&invocation, &ui, registry, Some(Arc::clone(&finisher))) {
        Ok(Outcome::Immediate(code)) => {
            finisher.exit_app(code);
        }
        Ok(Outcome::Finished(code)) => finisher.finish(code, None),
        Err(error) => {
            let code = finisher.finish(ui.status_code(), Some(&error));
            // Point at the verbose log for unexpected failures; argument
            // and user errors explain themselves.
            if !matches!(error, CmdError::User(_) | CmdError::Argument(_)) {
                if let Some(path) = ui.logger().verbose_path() {
                    ui.log_info(&format!("The log was saved: `{}`", path.display()));
                }
            }
            code
        }
    };
    finisher.exit_app(code)
}

/// Testable dispatch entry: same pipeline, exit code returned instead of
/// taken. Signal handlers are not armed on this path.
pub fn execute(invocation: &Invocation, ui: &Ui, registry: &dyn PluginRegistry) -> i32 {
    let finisher = Finisher::new(ui.clone());
    match dispatch(invocation, ui, registry, None) {
        Ok(Outcome::Immediate(code)) => code,
        Ok(Outcome::Finished(code)) => finisher.finish(code, None),
        Err(error) => finisher.finish(ui.status_code(), Some(&error)),
    }
}

fn dispatch(
    invocation: &Invocation,
    ui: &Ui,
    registry: &dyn PluginRegistry,
    finisher: Option<Arc<Finisher>>,
) -> Result<Outcome, CmdError> {
    ui.set_session(Session::new(session_title(&invocation.arguments), true));

    if let Some(finisher) = finisher {
        crate::signal::install(finisher)?;
    }

    // Whatever happens below, the terminal comes back.
    let _stdin_guard = scopeguard::guard((), |_| {
        let _ = disable_raw_mode();
    });

    // Refused before any parsing; no log file may be written.
    if invocation.env.contains_key("SUDO_USER") {
        eprintln!("[ERROR] Please not use `sudo`!");
        return Ok(Outcome::Immediate(USER_ERROR_CODE));
    }

    let mut args = ParsedArgs::new(&invocation.arguments);

    if let Ok(Some(root)) = args.shift_option("root") {
        ui.set_root_path(expand_tilde(&root));
    }

    if invocation.exe_name == DEV_EXECUTABLE {
        let dev_root = args
            .shift_option("dev-root")
            .ok()
            .flatten()
            .or_else(|| invocation.env.get(DEV_ROOT_ENV).cloned());
        match dev_root {
            Some(path) => ui.set_dev_root(expand_tilde(&path)),
            None => {
                eprintln!(
                    "[ERROR] `mdev` require the `--dev-root` option or `{DEV_ROOT_ENV}` environment variable."
                );
                return Ok(Outcome::Immediate(DEV_ROOT_MISSING_CODE));
            }
        }
    }

    if args.shift_flag("no-logfile", None) {
        ui.logger().disable();
    } else if let Ok(Some(logfile)) = args.shift_option("logfile") {
        if !logfile.is_empty() {
            ui.logger().redirect(&expand_tilde(&logfile));
        }
    }

    ui.log_info_pipe(
        &format!(
            "[{}] {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            args.raw_description()
        ),
        Pipe::File,
    );

    ui.set_verbose(args.shift_flag("verbose", Some('v')));

    let root = CommandGroup::root();
    let mut resolved: Option<Resolved> = None;
    let context = CommandContext {
        ui,
        registry,
        env: &invocation.env,
    };

    let result = (|| -> Result<(), CmdError> {
        let hit = group::resolve(&root, &mut args, ui)?;
        let kind = hit.command;
        resolved = Some(hit);
        run_lifecycle(kind, &mut args, &context)
    })();

    let (help_group, help_kind): (&CommandGroup, Option<CommandKind>) = match &resolved {
        Some(hit) => (&hit.group, Some(hit.command)),
        None => (&root, None),
    };

    match result {
        Ok(()) => {
            if ui.show_help() {
                show_help(ui, help_group, help_kind);
            }
            let leftover = args.leftover();
            if !leftover.is_empty() {
                ui.log_verbose(&format!("Unhandled arguments: {}", leftover.join(" ")));
            }
            Ok(Outcome::Finished(ui.status_code()))
        }
        Err(CmdError::Argument(error)) => {
            if ui.show_help() && ui.api_format() != ApiFormat::None {
                ui.log_api(&help::render_api(help_group, help_kind));
                return Ok(Outcome::Finished(ui.status_code()));
            }
            let description = error.to_string();
            let silent = description.is_empty();
            if !silent {
                ui.log_info(&description);
                ui.log_info_pipe("", Pipe::Err);
            }
            ui.log_info_pipe(&help::render(help_group, help_kind), Pipe::Err);
            if silent {
                // Silent control error: classified, but nothing to report.
                Ok(Outcome::Finished(ui.status_code()))
            } else {
                Err(error.into())
            }
        }
        Err(error) => {
            let description = error.description();
            match &error {
                CmdError::Runtime(_) | CmdError::User(_) => {
                    if !description.is_empty() {
                        ui.log_error(&description);
                    }
                }
                CmdError::Generic { domain, code, .. } => {
                    ui.log_error(&format!("Error: {domain} (code: {code})\n\t{description}"));
                }
                CmdError::Signal { .. } => {
                    // The supervisor terminates on its own thread; a signal
                    // error surfacing here still reports like any other.
                    ui.log_error(&description);
                }
                CmdError::Argument(_) => unreachable!("handled above"),
            }
            debug!(?error, "dispatch failed");
            Err(error)
        }
    }
}

fn show_help(ui: &Ui, group: &CommandGroup, kind: Option<CommandKind>) {
    if ui.api_format() != ApiFormat::None {
        ui.log_api(&help::render_api(group, kind));
    } else {
        ui.log_info(&help::render(group, kind));
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
