//! names command - List catalog names as a hierarchy

use super::Context;
use crate::catalog::EntityKind;
use crate::core::names::to_forest;
use crate::ui::output;
use anyhow::{Context as _, Result};

/// List the names of one entity kind.
pub fn names(ctx: &Context, kind: EntityKind, flat: bool) -> Result<()> {
    let catalog = ctx.catalog()?;
    let rt = tokio::runtime::Runtime::new()?;
    let names = rt
        .block_on(catalog.list_names(kind))
        .with_context(|| format!("Failed to list {}", kind))?;

    if names.is_empty() {
        output::print(format!("No {} found.", kind), ctx.verbosity);
        return Ok(());
    }

    // Listings are data, so they print even in quiet mode.
    if flat {
        println!("{}", output::format_list(&names, ""));
    } else {
        println!("{}", output::format_forest(&to_forest(&names)));
    }
    Ok(())
}
