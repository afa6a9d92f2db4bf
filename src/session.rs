//! Process-wide execution session.

use std::time::{Duration, Instant, SystemTime};

/// Tokens longer than this never contribute to the session title.
const TITLE_TOKEN_MAX: usize = 20;

/// One run of the tool. Created exactly once at process entry, torn down
/// at final exit; a single current session exists for the whole run.
#[derive(Debug, Clone)]
pub struct Session {
    pub title: Option<String>,
    pub is_main: bool,
    start: Instant,
    pub started_at: SystemTime,
}

impl Session {
    pub fn new(title: Option<String>, is_main: bool) -> Self {
        Self {
            title,
            is_main,
            start: Instant::now(),
            started_at: SystemTime::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Derive the session title from the leading non-flag arguments: stop at
/// the first token that looks like a flag or is implausibly long.
pub fn session_title(arguments: &[String]) -> Option<String> {
    let mut names = Vec::new();
    for arg in arguments {
        if arg.starts_with('-') || arg.len() > TITLE_TOKEN_MAX {
            break;
        }
        names.push(arg.as_str());
    }
    if names.is_empty() {
        None
    } else {
        Some(names.join(" "))
    }
}
