//! cli::commands::forms
//!
//! The `template` and `render` commands.
//!
//! Both resolve a type into a schema and build a value tree from it.
//! `template` goes input to value: saved values and `--set` edits in,
//! composed value out. `render` goes the other way: a JSON message in,
//! displayed fields out.
//!
//! # Example
//!
//! ```bash
//! rosdesk template geometry_msgs/Point --set x=1 --set y=two --json
//! # {"x": 1, "y": "two"}
//!
//! rosdesk render geometry_msgs/Point --message point.json
//! # x = 1.00
//! # y = 2.00
//! # z = 0.00
//! ```

use std::fs;
use std::path::Path;

use super::{parse_type, Context};
use crate::catalog::DescriptorRole;
use crate::core::resolver::SchemaResolver;
use crate::core::schema::FieldSchema;
use crate::core::value::Value;
use crate::core::value_tree::{TextFactory, ValueTree};
use crate::ui::output;
use anyhow::{anyhow, Context as _, Result};

/// Build a form, apply edits and print it or the composed value.
pub fn template(
    ctx: &Context,
    type_name: &str,
    role: DescriptorRole,
    saved: Option<&Path>,
    appends: &[String],
    sets: &[String],
    json: bool,
) -> Result<()> {
    // Parse edits up front so typos fail before any network traffic.
    let edits = sets
        .iter()
        .map(|s| parse_assignment(s))
        .collect::<Result<Vec<_>>>()?;
    let saved = saved.map(read_json).transpose()?;

    let fields = resolve_fields(ctx, type_name, role)?;
    let mut tree = new_tree(ctx, &fields, saved.as_ref());

    for path in appends {
        let index = tree
            .append(path)
            .with_context(|| format!("Cannot append to '{}'", path))?;
        tracing::debug!(path = %path, index, "appended element");
    }
    for (path, text) in edits {
        tree.set_text(path, text)
            .with_context(|| format!("Cannot set '{}'", path))?;
    }

    if json {
        let value = tree.collect().context("Failed to compose value")?;
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::Value::from(value))?
        );
    } else {
        print_entries(ctx, &tree);
    }
    Ok(())
}

/// Display a JSON message through a type's form.
pub fn render(ctx: &Context, type_name: &str, role: DescriptorRole, message: &Path) -> Result<()> {
    let message = read_json(message)?;
    let fields = resolve_fields(ctx, type_name, role)?;

    let mut tree = new_tree(ctx, &fields, None);
    tree.refresh(&message);
    print_entries(ctx, &tree);
    Ok(())
}

fn resolve_fields(ctx: &Context, type_name: &str, role: DescriptorRole) -> Result<Vec<FieldSchema>> {
    let type_name = parse_type(type_name)?;
    let catalog = ctx.catalog()?;
    let resolver = SchemaResolver::new(catalog.as_ref(), ctx.config.resolver_options());

    let rt = tokio::runtime::Runtime::new()?;
    let resolved = rt
        .block_on(resolver.resolve_with(&type_name, role))
        .with_context(|| format!("Failed to resolve {} ({})", type_name, role))?;
    Ok(resolved.fields)
}

fn new_tree(ctx: &Context, fields: &[FieldSchema], saved: Option<&Value>) -> ValueTree<TextFactory> {
    ValueTree::build(fields, saved, TextFactory)
        .with_format(ctx.config.number_format())
        .with_strict(ctx.config.strict_input())
}

fn print_entries(ctx: &Context, tree: &ValueTree<TextFactory>) {
    print_entry_list(ctx, &tree.entries());
}

/// Print `(path, text)` pairs aligned, or a placeholder line when empty.
pub(super) fn print_entry_list(ctx: &Context, entries: &[(String, String)]) {
    if entries.is_empty() {
        output::print("(no fields)", ctx.verbosity);
    } else {
        println!("{}", output::format_entries(entries));
    }
}

fn read_json(path: &Path) -> Result<Value> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let json: serde_json::Value = serde_json::from_str(&contents)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;
    Ok(Value::from(json))
}

/// Split `path=text`. The text may itself contain `=`.
pub(super) fn parse_assignment(arg: &str) -> Result<(&str, &str)> {
    let (path, text) = arg
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected PATH=TEXT, got '{}'", arg))?;
    let path = path.trim();
    if path.is_empty() {
        return Err(anyhow!("Missing field path in '{}'", arg));
    }
    Ok((path, text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_splits_on_first_equals() {
        assert_eq!(parse_assignment("x=1").unwrap(), ("x", "1"));
        assert_eq!(
            parse_assignment("header.frame_id=a=b").unwrap(),
            ("header.frame_id", "a=b")
        );
        assert_eq!(parse_assignment("label=").unwrap(), ("label", ""));
    }

    #[test]
    fn assignment_needs_path_and_equals() {
        assert!(parse_assignment("x").is_err());
        assert!(parse_assignment("=1").is_err());
    }

    #[test]
    fn read_json_reports_bad_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{not json").unwrap();
        let err = read_json(&path).unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));

        fs::write(&path, r#"{"x": 1}"#).unwrap();
        assert_eq!(read_json(&path).unwrap().get("x"), Some(&Value::Number(1.0)));
    }
}
