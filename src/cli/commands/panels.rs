//! panels command - List the available panel kinds

use super::Context;
use crate::panel::PanelRegistry;
use crate::ui::output;
use anyhow::Result;

/// Print every registered panel kind.
pub fn panels(ctx: &Context) -> Result<()> {
    let registry = PanelRegistry::with_defaults();
    for spec in registry.specs() {
        if ctx.verbosity == output::Verbosity::Quiet {
            println!("{}", spec.name);
        } else {
            println!("{:<10} {:<9} {}", spec.name, spec.entity.name(), spec.description);
        }
    }
    Ok(())
}
