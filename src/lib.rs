//! mbx — command execution core of a multi-command plugin CLI.
//!
//! Raw process arguments come in; a resolved command runs through its
//! setup → validate → run lifecycle; every outcome, including trapped
//! signals, leaves through one deterministic exit-code computation.

pub mod args;
pub mod command;
pub mod dispatch;
pub mod error;
pub mod plugin;
pub mod session;
pub mod signal;
pub mod ui;
