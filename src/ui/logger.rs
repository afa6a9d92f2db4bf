//! File log sink behind the Ui pipes.
//!
//! Two files per run: the info log and its `.verbose` twin. Both are opened
//! lazily on first write so refused invocations never touch the disk.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

struct LogFile {
    path: PathBuf,
    file: Option<File>,
}

impl LogFile {
    fn new(path: PathBuf) -> Self {
        Self { path, file: None }
    }

    fn write_line(&mut self, line: &str) {
        if self.file.is_none() {
            if let Some(parent) = self.path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            self.file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)
                .ok();
        }
        if let Some(file) = self.file.as_mut() {
            let _ = writeln!(file, "{line}");
        }
    }

    fn flush(&mut self) {
        if let Some(file) = self.file.as_mut() {
            let _ = file.flush();
        }
    }

    fn written(&self) -> bool {
        self.file.is_some()
    }
}

/// Synchronous file logger. A disabled logger (`--no-logfile`) drops every
/// file write on the floor.
pub struct FileLogger {
    enabled: Mutex<bool>,
    info: Mutex<LogFile>,
    verbose: Mutex<LogFile>,
}

impl FileLogger {
    pub fn new(log_dir: &Path) -> Self {
        let pid = std::process::id();
        let info = log_dir.join(format!("mbx-{pid}.log"));
        let verbose = log_dir.join(format!("mbx-{pid}.verbose.log"));
        Self {
            enabled: Mutex::new(true),
            info: Mutex::new(LogFile::new(info)),
            verbose: Mutex::new(LogFile::new(verbose)),
        }
    }

    pub fn disable(&self) {
        *self.enabled.lock() = false;
    }

    pub fn is_enabled(&self) -> bool {
        *self.enabled.lock()
    }

    /// Redirect both files. `path.log` keeps the info pipe; the verbose
    /// pipe goes to `path.verbose.log`.
    pub fn redirect(&self, path: &Path) {
        let stem = match path.file_stem() {
            Some(stem) if !stem.is_empty() => stem.to_os_string(),
            // Garbage like an empty value keeps the defaults.
            _ => return,
        };
        // A name like `.log` is all extension: the stem comes back as the
        // whole dot-leading name with no extension left, so there is
        // nothing to derive the twin from.
        if path.extension().is_none() && stem.to_string_lossy().starts_with('.') {
            return;
        }
        let ext = path
            .extension()
            .map(|e| e.to_os_string())
            .unwrap_or_else(|| "log".into());
        let mut verbose_name = stem;
        verbose_name.push(".verbose.");
        verbose_name.push(&ext);
        let verbose = path.with_file_name(verbose_name);
        *self.info.lock() = LogFile::new(path.to_path_buf());
        *self.verbose.lock() = LogFile::new(verbose);
    }

    /// Write to the info file (and the verbose twin, which carries
    /// everything).
    pub fn info(&self, line: &str) {
        if !self.is_enabled() {
            return;
        }
        self.info.lock().write_line(line);
        self.verbose.lock().write_line(line);
    }

    /// Write to the verbose file only.
    pub fn verbose(&self, line: &str) {
        if !self.is_enabled() {
            return;
        }
        self.verbose.lock().write_line(line);
    }

    /// The verbose log path, when at least one line landed there.
    pub fn verbose_path(&self) -> Option<PathBuf> {
        let verbose = self.verbose.lock();
        if self.is_enabled() && verbose.written() {
            Some(verbose.path.clone())
        } else {
            None
        }
    }

    pub fn flush(&self) {
        self.info.lock().flush();
        self.verbose.lock().flush();
    }
}
