//! Help-text assembly from tree metadata.
//!
//! Pure formatting over already-validated data: sections are built here and
//! styled/aligned by `cmdtree-render`.

use cmdtree_render::{Styler, two_column};

use crate::command::{Cli, CommandId, FlagDef, PositionalDef};
use crate::value::ValueKind;

/// Renders the full help text for a command.
pub(crate) fn render(cli: &Cli, id: CommandId, styler: &Styler) -> String {
    let node = cli.node(id);
    let mut out = String::new();

    out.push_str(&format!(
        "{} {}\n",
        styler.heading("Usage:"),
        usage_line(cli, id)
    ));
    if !node.description.is_empty() {
        out.push('\n');
        out.push_str(&node.description);
        out.push('\n');
    }
    if !node.aliases.is_empty() {
        out.push_str(&format!(
            "\n{} {}\n",
            styler.heading("Aliases:"),
            node.aliases.join(", ")
        ));
    }

    // children grouped by section label, labels in first-seen order
    let mut sections: Vec<(&str, Vec<CommandId>)> = Vec::new();
    for &child in &node.children {
        let label = cli.node(child).section.as_str();
        match sections.iter_mut().find(|(seen, _)| *seen == label) {
            Some((_, ids)) => ids.push(child),
            None => sections.push((label, vec![child])),
        }
    }
    for (label, ids) in &sections {
        let rows: Vec<(String, String)> = ids
            .iter()
            .map(|&child| {
                let child = cli.node(child);
                let mut term = child.name.clone();
                if let Some(shortcut) = child.shortcut {
                    term.push_str(&format!(", {shortcut}"));
                }
                for alias in &child.aliases {
                    term.push_str(&format!(", {alias}"));
                }
                (styler.term(&term), child.description.clone())
            })
            .collect();
        out.push_str(&format!("\n{}\n", styler.heading(&format!("{label}:"))));
        out.push_str(&two_column(&rows, 2, 2));
    }

    if !node.positionals.is_empty() {
        let rows: Vec<(String, String)> = node
            .positionals
            .iter()
            .map(|def| {
                (
                    styler.term(&positional_term(def)),
                    positional_description(def, styler),
                )
            })
            .collect();
        out.push_str(&format!("\n{}\n", styler.heading("Arguments:")));
        out.push_str(&two_column(&rows, 2, 2));
    }

    let own: Vec<&FlagDef> = node.flags.iter().filter(|flag| !flag.hidden).collect();
    if !own.is_empty() {
        out.push_str(&format!("\n{}\n", styler.heading("Options:")));
        out.push_str(&two_column(&flag_rows(&own, styler), 2, 2));
    }

    // ancestor flags visible here, minus anything shadowed closer
    let mut seen: Vec<&str> = own.iter().map(|flag| flag.name.as_str()).collect();
    let mut inherited: Vec<&FlagDef> = Vec::new();
    let mut current = node.parent;
    while let Some(ancestor) = current {
        let ancestor = cli.node(ancestor);
        for flag in ancestor.flags.iter().filter(|flag| !flag.hidden) {
            if seen.contains(&flag.name.as_str()) {
                continue;
            }
            seen.push(&flag.name);
            inherited.push(flag);
        }
        current = ancestor.parent;
    }
    if !inherited.is_empty() {
        out.push_str(&format!("\n{}\n", styler.heading("Global options:")));
        out.push_str(&two_column(&flag_rows(&inherited, styler), 2, 2));
    }

    out
}

fn usage_line(cli: &Cli, id: CommandId) -> String {
    let node = cli.node(id);
    let mut usage = cli.path(id);
    usage.push_str(" [OPTIONS]");
    for def in &node.positionals {
        usage.push(' ');
        usage.push_str(&positional_term(def));
    }
    if !node.children.is_empty() {
        usage.push_str(" <COMMAND>");
    }
    usage
}

fn positional_term(def: &PositionalDef) -> String {
    match (def.variadic, def.required) {
        (true, true) => format!("<{}>...", def.name),
        (true, false) => format!("[{}...]", def.name),
        (false, true) => format!("<{}>", def.name),
        (false, false) => format!("[{}]", def.name),
    }
}

fn positional_description(def: &PositionalDef, styler: &Styler) -> String {
    let mut out = def.description.clone();
    if let Some(default) = &def.default {
        out.push_str(&styler.dim(&format!(" [default: {default}]")));
    }
    out
}

fn flag_rows(flags: &[&FlagDef], styler: &Styler) -> Vec<(String, String)> {
    flags
        .iter()
        .map(|def| (styler.term(&flag_term(def)), flag_description(def, styler)))
        .collect()
}

fn flag_term(def: &FlagDef) -> String {
    let shortcut = match def.shortcut {
        Some(ch) => format!("-{ch}, "),
        None => "    ".to_string(),
    };
    let mut term = format!("{shortcut}--{}", def.name);
    if def.kind != ValueKind::Bool {
        term.push_str(&format!(" <{}>", def.kind.to_string().to_uppercase()));
    }
    term
}

fn flag_description(def: &FlagDef, styler: &Styler) -> String {
    let mut out = def.description.clone();
    if def.kind != ValueKind::Bool {
        out.push_str(&styler.dim(&format!(" [default: {}]", def.default)));
    }
    if let Some(var) = &def.env_var {
        out.push_str(&styler.dim(&format!(" [env: {var}]")));
    }
    out
}
