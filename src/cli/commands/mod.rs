//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Validates command-specific arguments
//! 2. Calls into the catalog, resolver or panels
//! 3. Formats and displays output
//!
//! # Async Commands
//!
//! Catalog access is async. Handlers stay synchronous and run their async
//! part on a tokio runtime they create themselves.

mod attach;
mod call;
mod completion;
mod config_cmd;
mod forms;
mod names;
mod panels;
mod param;
mod schema;

pub use attach::attach;
pub use call::call;
pub use completion::completion;
pub use config_cmd::{init as config_init, show as config_show};
pub use forms::{render, template};
pub use names::names;
pub use panels::panels;
pub use param::{delete as param_delete, get as param_get, set as param_set};
pub use schema::schema;

use anyhow::{Context as _, Result};

use crate::catalog::{self, Catalog};
use crate::cli::args::{Command, ConfigAction, ParamAction};
use crate::core::config::Config;
use crate::core::types::TypeName;
use crate::panel::PanelSettings;
use crate::ui::output::Verbosity;

/// Everything a command handler needs from the invocation.
#[derive(Debug, Clone)]
pub struct Context {
    /// Loaded configuration with flag overrides applied
    pub config: Config,
    /// Output verbosity
    pub verbosity: Verbosity,
}

impl Context {
    /// Connect to the configured catalog.
    pub fn catalog(&self) -> Result<Box<dyn Catalog>> {
        catalog::create_catalog(self.config.endpoint(), self.config.timeout())
            .with_context(|| format!("Failed to set up catalog at {}", self.config.endpoint()))
    }

    /// Panel settings from the loaded configuration.
    pub fn settings(&self) -> PanelSettings {
        PanelSettings::from_config(&self.config)
    }
}

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Names { kind, flat } => names::names(ctx, kind.into(), flat),
        Command::Schema {
            type_name,
            role,
            json,
        } => schema::schema(ctx, &type_name, role.into(), json),
        Command::Template {
            type_name,
            role,
            saved,
            sets,
            appends,
            json,
        } => forms::template(
            ctx,
            &type_name,
            role.into(),
            saved.as_deref(),
            &appends,
            &sets,
            json,
        ),
        Command::Render {
            type_name,
            role,
            message,
        } => forms::render(ctx, &type_name, role.into(), &message),
        Command::Call {
            service,
            sets,
            appends,
            json,
        } => call::call(ctx, &service, &appends, &sets, json),
        Command::Param { action } => match action {
            ParamAction::Get { name } => param::get(ctx, &name),
            ParamAction::Set { name, value } => param::set(ctx, &name, &value),
            ParamAction::Delete { name } => param::delete(ctx, &name),
        },
        Command::Attach { kind, target } => attach::attach(ctx, &kind, &target),
        Command::Panels => panels::panels(ctx),
        Command::Config { action } => match action {
            ConfigAction::Show => config_cmd::show(ctx),
            ConfigAction::Init { path, force } => config_cmd::init(ctx, path.as_deref(), force),
        },
        Command::Completion { shell } => completion::completion(shell),
    }
}

/// Parse a type name argument.
fn parse_type(name: &str) -> Result<TypeName> {
    TypeName::new(name).with_context(|| format!("Invalid type name '{}'", name))
}
