//! Process-wide Ui context.
//!
//! Replaces the ambient singletons of a classic multi-command CLI (current
//! session, pending status code, output pipes) with one explicit context
//! constructed at process entry and threaded through every component. The
//! signal supervisor holds a clone, so interior state sits behind atomics
//! and parking_lot locks.

mod logger;

pub use logger::FileLogger;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::Value;

use crate::session::Session;

/// Structured output mode for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiFormat {
    #[default]
    None,
    Json,
}

impl ApiFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "none" => Some(ApiFormat::None),
            "json" => Some(ApiFormat::Json),
            _ => None,
        }
    }
}

/// Where a log line goes. The file pipe carries everything the console
/// pipes carry, plus verbose-only detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pipe {
    Out,
    Err,
    File,
}

struct UiState {
    session: Mutex<Option<Session>>,
    summaries: Mutex<Vec<String>>,
    indents: Mutex<Vec<String>>,
    duration: Mutex<Option<Duration>>,
    root_path: Mutex<Option<PathBuf>>,
    dev_root: Mutex<Option<PathBuf>>,
    api_format: Mutex<ApiFormat>,
    status_code: AtomicI32,
    show_help: AtomicBool,
    verbose: AtomicBool,
    logger: FileLogger,
}

/// Shared handle to the Ui context. Cheap to clone; the signal thread and
/// the dispatch path each hold one.
#[derive(Clone)]
pub struct Ui {
    state: Arc<UiState>,
}

impl Ui {
    pub fn new(log_dir: &Path) -> Self {
        Self {
            state: Arc::new(UiState {
                session: Mutex::new(None),
                summaries: Mutex::new(Vec::new()),
                indents: Mutex::new(Vec::new()),
                duration: Mutex::new(None),
                root_path: Mutex::new(None),
                dev_root: Mutex::new(None),
                api_format: Mutex::new(ApiFormat::None),
                status_code: AtomicI32::new(0),
                show_help: AtomicBool::new(false),
                verbose: AtomicBool::new(false),
                logger: FileLogger::new(log_dir),
            }),
        }
    }

    // --- session -----------------------------------------------------------

    pub fn set_session(&self, session: Session) {
        *self.state.session.lock() = Some(session);
    }

    pub fn clear_session(&self) {
        *self.state.session.lock() = None;
    }

    pub fn session_elapsed(&self) -> Option<Duration> {
        self.state.session.lock().as_ref().map(Session::elapsed)
    }

    pub fn has_session(&self) -> bool {
        self.state.session.lock().is_some()
    }

    pub fn set_duration(&self, duration: Duration) {
        *self.state.duration.lock() = Some(duration);
    }

    pub fn duration(&self) -> Option<Duration> {
        *self.state.duration.lock()
    }

    // --- pending exit state ------------------------------------------------

    pub fn status_code(&self) -> i32 {
        self.state.status_code.load(Ordering::SeqCst)
    }

    pub fn set_status_code(&self, code: i32) {
        self.state.status_code.store(code, Ordering::SeqCst);
    }

    pub fn show_help(&self) -> bool {
        self.state.show_help.load(Ordering::SeqCst)
    }

    pub fn set_show_help(&self, value: bool) {
        self.state.show_help.store(value, Ordering::SeqCst);
    }

    // --- global options ----------------------------------------------------

    pub fn api_format(&self) -> ApiFormat {
        *self.state.api_format.lock()
    }

    pub fn set_api_format(&self, format: ApiFormat) {
        *self.state.api_format.lock() = format;
    }

    pub fn verbose(&self) -> bool {
        self.state.verbose.load(Ordering::SeqCst)
    }

    pub fn set_verbose(&self, value: bool) {
        self.state.verbose.store(value, Ordering::SeqCst);
    }

    pub fn set_root_path(&self, path: PathBuf) {
        *self.state.root_path.lock() = Some(path);
    }

    pub fn root_path(&self) -> Option<PathBuf> {
        self.state.root_path.lock().clone()
    }

    pub fn set_dev_root(&self, path: PathBuf) {
        *self.state.dev_root.lock() = Some(path);
    }

    pub fn dev_root(&self) -> Option<PathBuf> {
        self.state.dev_root.lock().clone()
    }

    pub fn logger(&self) -> &FileLogger {
        &self.state.logger
    }

    // --- logging -----------------------------------------------------------

    fn indent(&self) -> String {
        self.state.indents.lock().concat()
    }

    pub fn push_indent(&self, indent: impl Into<String>) {
        self.state.indents.lock().push(indent.into());
    }

    pub fn pop_indent(&self) {
        self.state.indents.lock().pop();
    }

    /// Drop all buffered indentation. The signal path calls this so its
    /// summary lines start at column zero.
    pub fn clear_indents(&self) {
        self.state.indents.lock().clear();
    }

    pub fn log_info(&self, message: &str) {
        self.log_info_pipe(message, Pipe::Out);
    }

    pub fn log_info_pipe(&self, message: &str, pipe: Pipe) {
        let line = format!("{}{message}", self.indent());
        match pipe {
            Pipe::Out => {
                println!("{line}");
                self.state.logger.info(&line);
            }
            Pipe::Err => {
                eprintln!("{line}");
                self.state.logger.info(&line);
            }
            Pipe::File => self.state.logger.info(&line),
        }
    }

    pub fn log_error(&self, message: &str) {
        let line = format!("{}[ERROR] {message}", self.indent());
        eprintln!("{line}");
        self.state.logger.info(&line);
    }

    /// Verbose detail: console only with `--verbose`, always in the
    /// verbose file.
    pub fn log_verbose(&self, message: &str) {
        let line = format!("{}{message}", self.indent());
        if self.verbose() {
            eprintln!("{line}");
        }
        self.state.logger.verbose(&line);
    }

    /// Record a summary line and surface it immediately on stderr.
    pub fn log_summary(&self, message: &str) {
        eprintln!("{message}");
        self.state.logger.info(message);
        self.state.summaries.lock().push(message.to_string());
    }

    /// Replay recorded summaries into the file pipe at finish time.
    pub fn flush_summaries(&self) {
        let summaries: Vec<String> = self.state.summaries.lock().drain(..).collect();
        for line in &summaries {
            self.state.logger.verbose(&format!("[SUMMARY] {line}"));
        }
    }

    /// Structured output pipe. Only meaningful when an api format is
    /// active; the caller checks.
    pub fn log_api(&self, data: &Value) {
        let rendered = serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string());
        println!("{rendered}");
        self.state.logger.info(&rendered);
    }
}
