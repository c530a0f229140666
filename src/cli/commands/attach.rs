//! attach command - Attach a panel and print what it shows

use super::Context;
use crate::panel::PanelRegistry;
use crate::ui::output;
use anyhow::{Context as _, Result};

/// Create a panel of `kind` for `target`, attach it and print its fields.
pub fn attach(ctx: &Context, kind: &str, target: &str) -> Result<()> {
    let registry = PanelRegistry::with_defaults();
    let mut panel = registry.create(kind, target, &ctx.settings())?;
    let catalog = ctx.catalog()?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(panel.attach(catalog.as_ref()))
        .with_context(|| format!("Failed to attach {} panel to '{}'", kind, target))?;

    let entries = panel.entries()?;
    panel.teardown();

    if entries.is_empty() {
        output::print("(no fields)", ctx.verbosity);
    } else {
        println!("{}", output::format_entries(&entries));
    }
    Ok(())
}
