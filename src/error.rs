//! Error taxonomy and exit-code mapping.
//!
//! Every failure in the command core is classified into one of five kinds,
//! each with its own exit-code rule. Classification happens once, at the
//! dispatch layer; intermediate stages propagate errors unchanged.

use thiserror::Error;

/// Fixed exit code for a [`CmdError::User`] failure.
pub const USER_ERROR_CODE: i32 = 254;

/// Malformed or unrecognized CLI input. Always recoverable locally:
/// surfaced as usage help plus the description, never an abnormal crash.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    /// No command matched the next path segment. Carries the unrecognized
    /// token, or `None` when a group resolved but had no terminal command.
    #[error("{}", invalid_command_text(.0))]
    InvalidCommand(Option<String>),

    /// An option or argument value outside its accepted set.
    #[error("Invalid value `{value}` for `{argument}`")]
    InvalidValue { value: String, argument: String },

    /// A declared required argument was absent.
    #[error("Missing required argument `{0}`")]
    MissingArgument(String),

    /// An option was given without its value.
    #[error("Missing value for option `{0}`")]
    MissingValue(String),
}

fn invalid_command_text(token: &Option<String>) -> String {
    match token {
        Some(token) => format!("Not found command `{token}`"),
        None => String::new(),
    }
}

/// An internal operation failure carrying its own exit code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RuntimeError {
    pub message: String,
    pub code: i32,
}

impl RuntimeError {
    pub fn new(message: impl Into<String>, code: i32) -> Self {
        Self {
            message: message.into(),
            code,
        }
    }
}

/// The five-kind taxonomy every dispatch outcome is classified into.
#[derive(Debug, Error)]
pub enum CmdError {
    #[error(transparent)]
    Argument(#[from] ArgumentError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    /// Expected, user-actionable failure. Fixed exit code 254.
    #[error("{0}")]
    User(String),

    /// Synthesized from a trapped OS signal; code is the signal number.
    #[error("{message}")]
    Signal { signal: i32, message: String },

    /// Anything else the runtime environment throws (filesystem, etc.).
    /// The carried code drives the exit code; 0 when absent.
    #[error("{message}")]
    Generic {
        domain: String,
        code: i32,
        message: String,
    },
}

impl CmdError {
    pub fn user(message: impl Into<String>) -> Self {
        CmdError::User(message.into())
    }

    /// The human-readable description, empty for silent control errors.
    pub fn description(&self) -> String {
        self.to_string()
    }
}

impl From<std::io::Error> for CmdError {
    fn from(err: std::io::Error) -> Self {
        CmdError::Generic {
            domain: "io".into(),
            code: err.raw_os_error().unwrap_or(0),
            message: err.to_string(),
        }
    }
}

/// Map a finished run onto its process exit code.
///
/// Invoked from both the normal dispatch path and the signal path. Pure:
/// duration/log accounting is the caller's business.
///
/// Precedence: help suppresses the error entirely; a non-zero pending code
/// wins over any error; otherwise the error kind decides. A present error
/// with code 0 still yields 0 here — callers deciding success must check
/// error presence, not the code alone.
pub fn exit_code(pending: i32, error: Option<&CmdError>, help_requested: bool) -> i32 {
    let error = if help_requested { None } else { error };
    if pending != 0 {
        return pending;
    }
    match error {
        None => 0,
        Some(CmdError::Runtime(e)) => e.code,
        Some(CmdError::User(_)) => USER_ERROR_CODE,
        Some(CmdError::Signal { signal, .. }) => *signal,
        Some(CmdError::Generic { code, .. }) => *code,
        // Argument errors surface as help text, not a failure code of
        // their own.
        Some(CmdError::Argument(_)) => 0,
    }
}
