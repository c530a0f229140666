//! cli
//!
//! Command-line interface layer for rosdesk.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Load configuration and apply flag overrides
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap, builds a
//! [`commands::Context`] and dispatches. Catalog access, schema resolution
//! and form handling all live in the library modules.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use anyhow::{Context as _, Result};

use crate::core::config::Config;
use crate::ui::output::{self, Verbosity};

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run(cli: Cli) -> Result<()> {
    let verbosity = Verbosity::from_flags(cli.quiet, cli.debug);

    let loaded = Config::load(cli.config.as_deref()).context("Failed to load config")?;
    for warning in &loaded.warnings {
        output::warn(
            format!("{} ({})", warning.message, warning.path.display()),
            verbosity,
        );
    }

    let mut config = loaded.config;
    if let Some(endpoint) = &cli.endpoint {
        config
            .set_endpoint(endpoint)
            .context("Invalid --endpoint")?;
    }

    let ctx = commands::Context { config, verbosity };
    commands::dispatch(cli.command, &ctx)
}
