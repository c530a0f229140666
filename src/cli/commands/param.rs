//! param command - Read, write or delete a parameter

use super::Context;
use crate::panel::{Panel, ParamPanel};
use crate::ui::output;
use anyhow::{Context as _, Result};

/// Print a parameter's current value.
pub fn get(ctx: &Context, name: &str) -> Result<()> {
    let catalog = ctx.catalog()?;
    let mut panel = ParamPanel::new(name, ctx.settings());

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(panel.attach(catalog.as_ref()))
        .with_context(|| format!("Failed to read parameter '{}'", name))?;

    println!("{}", panel.text());
    Ok(())
}

/// Set a parameter from text.
pub fn set(ctx: &Context, name: &str, text: &str) -> Result<()> {
    let catalog = ctx.catalog()?;
    let mut panel = ParamPanel::new(name, ctx.settings());

    let rt = tokio::runtime::Runtime::new()?;
    let written = rt.block_on(async {
        // Reading first gives strict mode the current type to check against.
        panel.attach(catalog.as_ref()).await?;
        panel.set_text(text)?;
        panel.commit(catalog.as_ref()).await
    });
    let written = written.with_context(|| format!("Failed to set parameter '{}'", name))?;

    output::success(
        format!("Set {} = {}", name, written.to_plain_string()),
        ctx.verbosity,
    );
    Ok(())
}

/// Remove a parameter.
pub fn delete(ctx: &Context, name: &str) -> Result<()> {
    let catalog = ctx.catalog()?;
    let mut panel = ParamPanel::new(name, ctx.settings());

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(panel.delete(catalog.as_ref()))
        .with_context(|| format!("Failed to delete parameter '{}'", name))?;

    output::success(format!("Deleted {}", name), ctx.verbosity);
    Ok(())
}
