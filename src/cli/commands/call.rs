//! call command - Compose a service request and show the reply

use super::forms::{parse_assignment, print_entry_list};
use super::Context;
use crate::panel::{Panel, ServicePanel};
use anyhow::{Context as _, Result};

/// Call `service` with a request built from `appends` then `sets`.
pub fn call(
    ctx: &Context,
    service: &str,
    appends: &[String],
    sets: &[String],
    json: bool,
) -> Result<()> {
    let edits = sets
        .iter()
        .map(|s| parse_assignment(s))
        .collect::<Result<Vec<_>>>()?;

    let catalog = ctx.catalog()?;
    let mut panel = ServicePanel::new(service, ctx.settings());

    let rt = tokio::runtime::Runtime::new()?;
    let reply = rt.block_on(async {
        panel
            .attach(catalog.as_ref())
            .await
            .with_context(|| format!("Failed to prepare request for '{}'", service))?;

        for path in appends {
            panel
                .append(path)
                .with_context(|| format!("Cannot append to '{}'", path))?;
        }
        for (path, text) in &edits {
            panel
                .set_text(path, text)
                .with_context(|| format!("Cannot set '{}'", path))?;
        }

        panel
            .call(catalog.as_ref())
            .await
            .with_context(|| format!("Failed to call '{}'", service))
    })?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::Value::from(reply))?
        );
    } else {
        print_entry_list(ctx, &panel.response_entries()?);
    }
    panel.teardown();
    Ok(())
}
