//! Launcher item resolution contract.

mod common;

use common::{item, package, standard_registry};
use mbx::error::{ArgumentError, CmdError};
use mbx::plugin::{resolve_launcher_items, MemoryRegistry, PluginRegistry};

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[test]
fn compound_token_resolves_single_item_case_insensitively() {
    let registry = standard_registry();
    let items = resolve_launcher_items(&registry, &strings(&["foo/a"]), &[], false).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id(), "foo/A");
}

#[test]
fn bare_token_resolves_full_item_list_in_order() {
    let registry = standard_registry();
    let items = resolve_launcher_items(&registry, &strings(&["foo"]), &[], false).unwrap();
    let ids: Vec<String> = items.iter().map(|i| i.id()).collect();
    assert_eq!(ids, vec!["foo/A".to_string(), "foo/B".to_string()]);
}

#[test]
fn plugin_name_match_is_case_sensitive() {
    let registry = standard_registry();
    let err = resolve_launcher_items(&registry, &strings(&["FOO"]), &[], false).unwrap_err();
    assert!(matches!(
        err,
        CmdError::Argument(ArgumentError::InvalidValue { .. })
    ));
}

#[test]
fn unknown_item_is_always_invalid_value() {
    let registry = standard_registry();
    let err = resolve_launcher_items(&registry, &strings(&["foo/missing"]), &[], false).unwrap_err();
    assert!(matches!(
        err,
        CmdError::Argument(ArgumentError::InvalidValue { .. })
    ));
}

#[test]
fn launcherless_plugin_is_user_error_with_or_without_item() {
    let registry = standard_registry();
    for token in ["bare", "bare/x"] {
        let err = resolve_launcher_items(&registry, &strings(&[token]), &[], false).unwrap_err();
        assert!(matches!(err, CmdError::User(_)), "token {token}");
    }
}

#[test]
fn all_with_role_filter_selects_matching_items_only() {
    // `launch --all --role qa` on foo[A(qa), B(prod)] resolves to A alone.
    let registry = standard_registry();
    let items = resolve_launcher_items(&registry, &[], &strings(&["qa"]), true).unwrap();
    let ids: Vec<String> = items.iter().map(|i| i.id()).collect();
    assert_eq!(ids, vec!["foo/A".to_string()]);
}

#[test]
fn default_set_without_all_is_active_plugins() {
    let registry = MemoryRegistry::new(vec![
        package("foo", vec![item("foo", "A", &[])]),
        package("other", vec![item("other", "X", &[])]),
    ])
    .with_active(vec!["foo".to_string()]);
    let items = resolve_launcher_items(&registry, &[], &[], false).unwrap();
    let ids: Vec<String> = items.iter().map(|i| i.id()).collect();
    assert_eq!(ids, vec!["foo/A".to_string()]);
}

#[test]
fn launch_result_partitions_requested_set_exactly() {
    let items = vec![
        item("foo", "A", &[]),
        item("foo", "B", &[]),
        item("foo", "C", &[]),
    ];
    let registry = MemoryRegistry::new(vec![]).with_failing(["foo/B".to_string()]);
    let result = registry.install_launcher_items(&items, None);
    assert_eq!(result.success, vec!["foo/A".to_string(), "foo/C".to_string()]);
    assert_eq!(result.failed, vec!["foo/B".to_string()]);
    assert_eq!(result.success.len() + result.failed.len(), items.len());
}

#[test]
fn one_failure_never_suppresses_other_attempts() {
    let items = vec![item("foo", "A", &[]), item("foo", "B", &[])];
    let registry = MemoryRegistry::new(vec![]).with_failing(["foo/A".to_string()]);
    let result = registry.install_launcher_items(&items, None);
    assert_eq!(result.failed, vec!["foo/A".to_string()]);
    assert_eq!(result.success, vec!["foo/B".to_string()]);
}
