//! config command - Show or create the config file

use std::path::Path;

use super::Context;
use crate::core::config::Config;
use crate::ui::output;
use anyhow::{Context as _, Result};

/// Print the effective configuration as TOML.
pub fn show(ctx: &Context) -> Result<()> {
    match ctx.config.loaded_from() {
        Some(path) => output::print(format!("# Loaded from {}", path.display()), ctx.verbosity),
        None => output::print("# No config file found, using defaults", ctx.verbosity),
    }

    let effective = toml::to_string_pretty(&ctx.config.effective())
        .context("Failed to render configuration")?;
    print!("{}", effective);
    Ok(())
}

/// Write a config file with every setting at its default.
pub fn init(ctx: &Context, path: Option<&Path>, force: bool) -> Result<()> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => Config::default_config_path()?,
    };

    Config::write(&path, &Config::defaults_file(), force)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    output::success(format!("Wrote {}", path.display()), ctx.verbosity);
    Ok(())
}
