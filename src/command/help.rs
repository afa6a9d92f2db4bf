//! Help rendering from command metadata.

use serde_json::{json, Value};

use crate::command::group::CommandGroup;
use crate::command::{CommandKind, CommandMeta};

/// Plain usage text for the resolved (or failed-to-resolve) position in
/// the tree.
pub fn render(group: &CommandGroup, command: Option<CommandKind>) -> String {
    let mut lines = Vec::new();
    match command {
        Some(kind) => {
            let meta = kind.meta();
            lines.push(format!("Usage: {}", usage_line(&meta)));
            if !meta.description.is_empty() {
                lines.push(String::new());
                lines.push(format!("  {}", meta.description));
            }
            if !meta.arguments.is_empty() {
                lines.push(String::new());
                lines.push("Arguments:".to_string());
                for arg in &meta.arguments {
                    lines.push(format!("  {:<12} {}", arg.name, arg.description));
                }
            }
            if !meta.options.is_empty() {
                lines.push(String::new());
                lines.push("Options:".to_string());
                for opt in &meta.options {
                    let values = if opt.values.is_empty() {
                        String::new()
                    } else {
                        format!(" ({})", opt.values.join("|"))
                    };
                    lines.push(format!("  --{:<12} {}{values}", opt.name, opt.description));
                }
            }
            if !meta.flags.is_empty() {
                lines.push(String::new());
                lines.push("Flags:".to_string());
                for flag in &meta.flags {
                    let short = flag
                        .short
                        .map(|c| format!("-{c}, "))
                        .unwrap_or_default();
                    lines.push(format!(
                        "  {short}--{:<10} {}",
                        flag.name, flag.description
                    ));
                }
            }
        }
        None => {
            lines.push(format!("Usage: {} <command>", group.name));
        }
    }
    if !group.subgroups.is_empty() {
        lines.push(String::new());
        lines.push("Commands:".to_string());
        for sub in &group.subgroups {
            let description = sub
                .command
                .map(|c| c.meta().description)
                .unwrap_or_default();
            lines.push(format!("  {:<12} {}", sub.name, description));
        }
    }
    lines.join("\n")
}

/// Structured help payload, emitted instead of text when an api format is
/// active and help was requested.
pub fn render_api(group: &CommandGroup, command: Option<CommandKind>) -> Value {
    match command {
        Some(kind) => {
            let meta = kind.meta();
            json!({
                "name": kind.full_name(),
                "description": meta.description,
                "arguments": meta.arguments.iter().map(|a| json!({
                    "name": a.name,
                    "description": a.description,
                    "plural": a.plural,
                })).collect::<Vec<_>>(),
                "options": meta.options.iter().map(|o| json!({
                    "name": o.name,
                    "description": o.description,
                    "values": o.values,
                })).collect::<Vec<_>>(),
                "flags": meta.flags.iter().map(|f| json!({
                    "name": f.name,
                    "description": f.description,
                })).collect::<Vec<_>>(),
            })
        }
        None => json!({
            "name": group.name,
            "commands": group.subgroups.iter().map(|g| g.name).collect::<Vec<_>>(),
        }),
    }
}

fn usage_line(meta: &CommandMeta) -> String {
    let mut parts = vec!["mbx".to_string(), meta.name.to_string()];
    for arg in &meta.arguments {
        if arg.plural {
            parts.push(format!("[{}...]", arg.name));
        } else {
            parts.push(format!("<{}>", arg.name));
        }
    }
    parts.join(" ")
}
