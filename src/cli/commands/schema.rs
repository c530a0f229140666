//! schema command - Resolve a type and print its field schema

use super::{parse_type, Context};
use crate::catalog::DescriptorRole;
use crate::core::resolver::SchemaResolver;
use crate::ui::output;
use anyhow::{Context as _, Result};

/// Resolve `type_name` and print the result.
pub fn schema(ctx: &Context, type_name: &str, role: DescriptorRole, json: bool) -> Result<()> {
    let type_name = parse_type(type_name)?;
    let catalog = ctx.catalog()?;
    let resolver = SchemaResolver::new(catalog.as_ref(), ctx.config.resolver_options());

    let rt = tokio::runtime::Runtime::new()?;
    let resolved = rt
        .block_on(resolver.resolve_with(&type_name, role))
        .with_context(|| format!("Failed to resolve {} ({})", type_name, role))?;
    tracing::debug!(fetches = resolved.fetches, "schema resolved");

    if json {
        println!("{}", serde_json::to_string_pretty(&resolved.fields)?);
    } else if resolved.fields.is_empty() {
        output::print(format!("{} has no fields.", type_name), ctx.verbosity);
    } else {
        println!("{}", output::format_schema(&resolved.fields));
    }
    Ok(())
}
