//! `protomod partition` — group files into namespace modules.

use std::io::Write;
use std::path::Path;

use clap::{Args, ValueEnum};
use protomod_core::config::NamingPolicyKind;
use protomod_core::partition::Partition;
use serde::Serialize;

use super::{ManifestArg, Session};
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Naming policy override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NamingArg {
    /// Strip the first conventional prefix (`com.`, `org.`, ...), then hyphenate.
    Standard,
    /// Hyphenate the whole namespace.
    Full,
}

impl From<NamingArg> for NamingPolicyKind {
    fn from(arg: NamingArg) -> Self {
        match arg {
            NamingArg::Standard => Self::Standard,
            NamingArg::Full => Self::Full,
        }
    }
}

/// Arguments for `protomod partition`.
#[derive(Args, Debug)]
pub struct PartitionArgs {
    #[command(flatten)]
    pub input: ManifestArg,

    /// Naming policy; overrides `[naming] policy` from the config.
    #[arg(long, value_enum)]
    pub naming: Option<NamingArg>,
}

/// Report payload for `protomod partition`.
///
/// The flattened partition keeps the JSON loadable by `--partition` and
/// `--against`.
#[derive(Debug, Serialize)]
pub struct PartitionReport {
    #[serde(flatten)]
    pub partition: Partition,
    pub fingerprint: String,
    pub is_valid: bool,
    pub error_count: usize,
    pub warning_count: usize,
}

/// Execute `protomod partition`.
///
/// # Errors
///
/// Returns an error if the manifest cannot be loaded or output fails.
pub fn run_partition(
    args: &PartitionArgs,
    config: Option<&Path>,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let mut session = Session::load(&args.input.manifest, config, project_root, output)?;
    if let Some(naming) = args.naming {
        session.config.naming.policy = naming.into();
    }

    let partition = session.partition();
    let report = session.evaluator().validate(&partition, &session.graph);
    let payload = PartitionReport {
        fingerprint: partition.fingerprint(),
        is_valid: report.is_valid(),
        error_count: report.errors().len(),
        warning_count: report.warnings().len(),
        partition,
    };

    render_mode(output, &payload, render_partition_text, render_partition_pretty)
}

fn render_partition_text(report: &PartitionReport, w: &mut dyn Write) -> std::io::Result<()> {
    for module in report.partition.modules() {
        let deps: Vec<&str> = module.dependencies.iter().map(String::as_str).collect();
        writeln!(
            w,
            "{}  files={}  deps={}",
            module.name,
            module.file_count(),
            if deps.is_empty() { "-".to_string() } else { deps.join(",") }
        )?;
    }
    writeln!(
        w,
        "valid={} errors={} warnings={}",
        report.is_valid, report.error_count, report.warning_count
    )
}

fn render_partition_pretty(report: &PartitionReport, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(
        w,
        &format!(
            "Partition '{}' ({} modules)",
            report.partition.strategy,
            report.partition.len()
        ),
    )?;
    for module in report.partition.modules() {
        writeln!(w, "{}", module.name)?;
        if !module.dependencies.is_empty() {
            let deps: Vec<&str> = module.dependencies.iter().map(String::as_str).collect();
            writeln!(w, "  depends on: {}", deps.join(", "))?;
        }
        for file in &module.files {
            writeln!(w, "  - {file}")?;
        }
    }
    writeln!(w)?;
    pretty_kv(w, "fingerprint", &report.fingerprint)?;
    pretty_kv(
        w,
        "validation",
        if report.is_valid { "valid" } else { "INVALID" },
    )?;
    pretty_kv(w, "errors", report.error_count.to_string())?;
    pretty_kv(w, "warnings", report.warning_count.to_string())
}
