//! `protomod order` — module build order.

use std::io::Write;
use std::path::Path;

use clap::Args;
use protomod_core::order::{build_levels, topological_sort};
use serde::Serialize;

use super::{ManifestArg, Session, fail};
use crate::output::{OutputMode, render};

/// Arguments for `protomod order`.
#[derive(Args, Debug)]
pub struct OrderArgs {
    #[command(flatten)]
    pub input: ManifestArg,
}

#[derive(Debug, Serialize)]
struct OrderOutput {
    order: Vec<String>,
    levels: Vec<Vec<String>>,
}

/// Execute `protomod order`.
///
/// # Errors
///
/// Returns an error if loading fails or the modules form a cycle.
pub fn run_order(
    args: &OrderArgs,
    config: Option<&Path>,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let session = Session::load(&args.input.manifest, config, project_root, output)?;
    let partition = session.partition();

    let order = topological_sort(&partition).map_err(|err| fail(output, err.code(), err))?;
    let payload = OrderOutput {
        order,
        levels: build_levels(&partition).levels,
    };
    render(output, &payload, render_order_human)
}

fn render_order_human(payload: &OrderOutput, w: &mut dyn Write) -> std::io::Result<()> {
    for (idx, name) in payload.order.iter().enumerate() {
        writeln!(w, "{:>3}. {name}", idx + 1)?;
    }
    Ok(())
}
