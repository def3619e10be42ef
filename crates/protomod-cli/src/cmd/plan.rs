//! `protomod plan` — build plan for the generator.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use protomod_core::plan::BuildPlan;
use serde::Serialize;
use tracing::info;

use super::{ManifestArg, Session, fail};
use crate::output::{OutputMode, render};

/// Arguments for `protomod plan`.
#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub input: ManifestArg,

    /// Write the plan JSON to this file instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct PlanWritten {
    path: String,
    fingerprint: String,
    module_count: usize,
}

/// Execute `protomod plan`. Refuses to plan an invalid partition.
///
/// # Errors
///
/// Returns an error if loading fails, the partition is invalid or cyclic, or
/// the plan cannot be written.
pub fn run_plan(
    args: &PlanArgs,
    config: Option<&Path>,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let session = Session::load(&args.input.manifest, config, project_root, output)?;
    let partition = session.partition();
    let report = session.evaluator().validate(&partition, &session.graph);
    let plan = BuildPlan::new(partition, &report).map_err(|err| fail(output, err.code(), &err))?;

    let Some(path) = &args.output else {
        return render(output, &plan, render_plan_human);
    };

    let json = serde_json::to_string_pretty(&plan).context("failed to serialize build plan")?;
    fs::write(path, json + "\n")
        .with_context(|| format!("failed to write build plan {}", path.display()))?;
    info!(path = %path.display(), fingerprint = %plan.fingerprint, "build plan written");

    let written = PlanWritten {
        path: path.display().to_string(),
        fingerprint: plan.fingerprint.clone(),
        module_count: plan.build_order.len(),
    };
    render(output, &written, |w, out| {
        writeln!(
            out,
            "Wrote build plan for {} modules to {}",
            w.module_count, w.path
        )
    })
}

fn render_plan_human(plan: &BuildPlan, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "Build plan {}", plan.fingerprint)?;
    for name in &plan.build_order {
        let files = plan
            .partition
            .module(name)
            .map_or(0, protomod_core::Module::file_count);
        writeln!(w, "  {name} ({files} files)")?;
    }
    Ok(())
}
