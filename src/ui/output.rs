//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Output is formatted consistently and respects the quiet flag.
//! Formatting functions return strings so they can be tested without
//! capturing stdout; the `print*` family does the writing.

use std::fmt::Display;

use crate::core::names::{NameForest, PathNode};
use crate::core::schema::{FieldKind, FieldSchema};

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - minimal output
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Print a message (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a warning message (respects quiet mode).
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("warning: {}", message);
    }
}

/// Print a success message (respects quiet mode).
pub fn success(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Render a name forest as an indented tree.
///
/// Nodes that are also complete names are marked with `*` when they have
/// children, so `/a` and `/a/b` both stay visible.
pub fn format_forest(forest: &NameForest) -> String {
    let mut lines = Vec::new();
    for root in forest.roots() {
        forest_lines(root, 0, &mut lines);
    }
    lines.join("\n")
}

fn forest_lines(node: &PathNode, depth: usize, lines: &mut Vec<String>) {
    let marker = if node.is_leaf && !node.children.is_empty() {
        " *"
    } else {
        ""
    };
    lines.push(format!("{}{}{}", "  ".repeat(depth), node.name, marker));
    for child in &node.children {
        forest_lines(child, depth + 1, lines);
    }
}

/// Render a resolved schema as `name: type` lines, nested fields indented.
pub fn format_schema(fields: &[FieldSchema]) -> String {
    let mut lines = Vec::new();
    schema_lines(fields, 0, &mut lines);
    lines.join("\n")
}

fn schema_lines(fields: &[FieldSchema], depth: usize, lines: &mut Vec<String>) {
    for field in fields {
        lines.push(format!(
            "{}{}: {}",
            "  ".repeat(depth),
            field.name,
            field.display_type()
        ));
        if let FieldKind::Composite { fields, .. } = &field.kind {
            schema_lines(fields, depth + 1, lines);
        }
    }
}

/// Render `(path, text)` pairs as aligned `path = text` lines.
pub fn format_entries(entries: &[(String, String)]) -> String {
    let width = entries.iter().map(|(p, _)| p.len()).max().unwrap_or(0);
    entries
        .iter()
        .map(|(path, text)| format!("{:<width$} = {}", path, text, width = width))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a list of items.
pub fn format_list<T: Display>(items: &[T], prefix: &str) -> String {
    items
        .iter()
        .map(|item| format!("{}{}", prefix, item))
        .collect::<Vec<_>>()
        .join("\n")
}
