//! End-to-end CLI surface checks through the dispatch pipeline.
//!
//! Output assertions read the info log file: every console line lands
//! there too, so the file is the observable record of a run.

mod common;

use common::{invocation, standard_registry, ui};
use mbx::dispatch::execute;
use mbx::plugin::MemoryRegistry;

fn read_log(path: &std::path::Path) -> String {
    std::fs::read_to_string(path).unwrap_or_default()
}

#[test]
fn list_with_no_plugins_plain_mode_emits_no_lines() {
    let (ui, dir) = ui();
    let log = dir.path().join("run.log");
    let registry = MemoryRegistry::default();
    let code = execute(
        &invocation(&["--logfile", log.to_str().unwrap(), "plugin", "list"]),
        &ui,
        &registry,
    );
    assert_eq!(code, 0);
    // Only the invocation banner may be in the info log; the duration
    // separator belongs to the verbose twin alone.
    let content = read_log(&log);
    assert_eq!(content.lines().count(), 1, "unexpected output: {content}");
    let verbose = read_log(&dir.path().join("run.verbose.log"));
    assert!(verbose.lines().any(|l| l.starts_with("====")));
    assert!(!content.contains("===="));
}

#[test]
fn list_with_no_plugins_api_mode_emits_empty_mapping() {
    let (ui, dir) = ui();
    let log = dir.path().join("run.log");
    let registry = MemoryRegistry::default();
    let code = execute(
        &invocation(&[
            "--logfile",
            log.to_str().unwrap(),
            "plugin",
            "list",
            "--api",
            "json",
        ]),
        &ui,
        &registry,
    );
    assert_eq!(code, 0);
    assert!(read_log(&log).contains("{}"));
}

#[test]
fn list_plain_mode_prints_sorted_packages() {
    let (ui, dir) = ui();
    let log = dir.path().join("run.log");
    let registry = standard_registry();
    let code = execute(
        &invocation(&["--logfile", log.to_str().unwrap(), "plugin", "list"]),
        &ui,
        &registry,
    );
    assert_eq!(code, 0);
    let content = read_log(&log);
    let bare = content.find("bare").expect("bare listed");
    let foo = content.find("foo (1.0.0)").expect("foo listed");
    assert!(bare < foo, "packages must be name-sorted");
}

#[test]
fn list_api_mode_keys_by_plugin_name() {
    let (ui, dir) = ui();
    let log = dir.path().join("run.log");
    let registry = standard_registry();
    execute(
        &invocation(&[
            "--logfile",
            log.to_str().unwrap(),
            "plugin",
            "list",
            "--api",
            "json",
        ]),
        &ui,
        &registry,
    );
    let content = read_log(&log);
    assert!(content.contains("\"foo\""));
    assert!(content.contains("\"has_launcher\""));
}

#[test]
fn launch_api_mode_reports_success_and_failed_sets() {
    let (ui, dir) = ui();
    let log = dir.path().join("run.log");
    let registry = standard_registry().with_failing(["foo/B".to_string()]);
    let code = execute(
        &invocation(&[
            "--logfile",
            log.to_str().unwrap(),
            "plugin",
            "launch",
            "foo",
            "--api",
            "json",
        ]),
        &ui,
        &registry,
    );
    assert_eq!(code, 1);
    let content = read_log(&log);
    assert!(content.contains("\"success\""));
    assert!(content.contains("\"failed\""));
    assert!(content.contains("foo/B"));
}

#[test]
fn no_logfile_flag_disables_the_file_pipe() {
    let (ui, _dir) = ui();
    let registry = MemoryRegistry::default();
    let code = execute(
        &invocation(&["--no-logfile", "plugin", "list"]),
        &ui,
        &registry,
    );
    assert_eq!(code, 0);
    assert_eq!(ui.logger().verbose_path(), None);
}

#[test]
fn root_option_sets_working_root() {
    let (ui, _dir) = ui();
    let registry = MemoryRegistry::default();
    execute(
        &invocation(&["--root", "/tmp/workroot", "plugin", "list"]),
        &ui,
        &registry,
    );
    assert_eq!(
        ui.root_path().as_deref(),
        Some(std::path::Path::new("/tmp/workroot"))
    );
}

#[test]
fn bare_tilde_root_expands_to_home_directory() {
    let (ui, _dir) = ui();
    ui.logger().disable();
    let registry = MemoryRegistry::default();
    execute(&invocation(&["--root", "~", "plugin", "list"]), &ui, &registry);
    assert_eq!(ui.root_path(), dirs::home_dir());
}

#[test]
fn tilde_prefix_root_expands_under_home_directory() {
    let (ui, _dir) = ui();
    ui.logger().disable();
    let registry = MemoryRegistry::default();
    execute(
        &invocation(&["--root", "~/work", "plugin", "list"]),
        &ui,
        &registry,
    );
    assert_eq!(ui.root_path(), dirs::home_dir().map(|h| h.join("work")));
}

#[test]
fn verbose_flag_is_consumed_globally() {
    let (ui, _dir) = ui();
    ui.logger().disable();
    let registry = MemoryRegistry::default();
    let code = execute(&invocation(&["-v", "plugin", "list"]), &ui, &registry);
    assert_eq!(code, 0);
    assert!(ui.verbose());
}

#[test]
fn help_for_known_command_exits_zero() {
    let (ui, _dir) = ui();
    ui.logger().disable();
    let registry = standard_registry();
    let code = execute(
        &invocation(&["plugin", "launch", "--help"]),
        &ui,
        &registry,
    );
    assert_eq!(code, 0);
    assert!(ui.show_help());
}

#[test]
fn session_title_reflects_leading_arguments() {
    let (ui, _dir) = ui();
    ui.logger().disable();
    let registry = MemoryRegistry::default();
    execute(&invocation(&["plugin", "list"]), &ui, &registry);
    // The session is still current until final process teardown.
    assert!(ui.has_session());
    assert!(ui.duration().is_some());
}
