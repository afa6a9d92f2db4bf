//! Signal supervision.
//!
//! Two interrupt classes are trapped for the lifetime of the process:
//! Crash (fatal signals) and Cancel (user interrupt). Either one restores
//! the terminal, drops buffered log context, reports a summary line, and
//! converges on the same finish/exit path the normal dispatch uses. This
//! is a parallel terminal path: it never re-enters dispatch.

use std::backtrace::Backtrace;
use std::ffi::CStr;
use std::sync::Arc;
use std::thread;

use crossterm::terminal::disable_raw_mode;
use signal_hook::consts::signal::{SIGABRT, SIGHUP, SIGINT, SIGQUIT, SIGTERM, SIGTTOU};
use signal_hook::iterator::Signals;
use tracing::debug;

use crate::dispatch::Finisher;
use crate::error::CmdError;

/// Signals treated as a crash of the run.
const CRASH_SIGNALS: [i32; 4] = [SIGHUP, SIGTERM, SIGQUIT, SIGABRT];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalClass {
    Crash,
    Cancel,
}

pub fn classify(signal: i32) -> SignalClass {
    if signal == SIGINT {
        SignalClass::Cancel
    } else {
        SignalClass::Crash
    }
}

/// Human-readable signal name, `strsignal` style.
pub fn signal_name(signal: i32) -> String {
    // strsignal returns a static, possibly locale-dependent string; a null
    // comes back only for out-of-range numbers.
    let ptr = unsafe { libc::strsignal(signal) };
    if ptr.is_null() {
        format!("Unknown signal: {signal}")
    } else {
        unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
    }
}

/// The summary line reported for a trapped signal.
pub fn summary_line(class: SignalClass, signal: i32) -> String {
    match class {
        SignalClass::Crash => format!("Receive Signal: {}", signal_name(signal)),
        SignalClass::Cancel => format!("[Cancel] {}", signal_name(signal)),
    }
}

/// Install the supervisor. SIGTTOU is explicitly ignored: a background
/// terminal write carries no actionable semantics for this tool.
pub fn install(finisher: Arc<Finisher>) -> std::io::Result<()> {
    unsafe {
        libc::signal(SIGTTOU, libc::SIG_IGN);
    }

    let mut signals = Signals::new(
        CRASH_SIGNALS
            .iter()
            .chain(std::iter::once(&SIGINT))
            .copied()
            .collect::<Vec<_>>(),
    )?;
    thread::Builder::new()
        .name("signal-supervisor".to_string())
        .spawn(move || {
            for signal in signals.forever() {
                handle(&finisher, signal);
            }
        })?;
    Ok(())
}

fn handle(finisher: &Finisher, signal: i32) -> ! {
    let class = classify(signal);
    debug!(signal, ?class, "trapped signal");

    // Terminal/input state comes back unconditionally, before any output.
    let _ = disable_raw_mode();
    let ui = finisher.ui();
    ui.clear_indents();

    if class == SignalClass::Crash {
        for line in Backtrace::force_capture().to_string().lines() {
            ui.log_info_pipe(line, crate::ui::Pipe::File);
        }
    }

    let message = summary_line(class, signal);
    ui.log_summary(&message);

    let error = CmdError::Signal { signal, message };
    let code = finisher.finish(signal, Some(&error));
    finisher.exit_app(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sigint_is_cancel_everything_else_crash() {
        assert_eq!(classify(SIGINT), SignalClass::Cancel);
        assert_eq!(classify(SIGTERM), SignalClass::Crash);
        assert_eq!(classify(SIGHUP), SignalClass::Crash);
    }

    #[test]
    fn summary_distinguishes_classes() {
        assert!(summary_line(SignalClass::Cancel, SIGINT).starts_with("[Cancel]"));
        assert!(summary_line(SignalClass::Crash, SIGTERM).starts_with("Receive Signal:"));
    }

    #[test]
    fn signal_name_handles_out_of_range() {
        assert!(signal_name(9999).contains("9999") || !signal_name(9999).is_empty());
    }
}
