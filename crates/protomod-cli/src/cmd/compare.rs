//! `protomod compare` — computed partition vs. a partition file.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use protomod_core::evaluate::{Better, ComparisonReport};
use serde::Serialize;

use super::{ManifestArg, Session, read_partition_file};
use crate::output::{OutputMode, fmt_f64, pretty_section, render_mode};

/// Arguments for `protomod compare`.
#[derive(Args, Debug)]
pub struct CompareArgs {
    #[command(flatten)]
    pub input: ManifestArg,

    /// Partition (JSON) to compare the computed partition against.
    #[arg(long, value_name = "FILE")]
    pub against: PathBuf,

    /// Label for the loaded partition; defaults to its strategy, then the file stem.
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
struct CompareOutput {
    #[serde(flatten)]
    report: ComparisonReport,
    winner: Option<String>,
}

/// Execute `protomod compare`.
///
/// # Errors
///
/// Returns an error if loading fails or output fails.
pub fn run_compare(
    args: &CompareArgs,
    config: Option<&Path>,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let session = Session::load(&args.input.manifest, config, project_root, output)?;
    let computed = session.partition();
    let other = read_partition_file(&args.against, output)?;

    let right_name = right_label(args, &other.strategy, &computed.strategy);
    let report = session.evaluator().compare(
        &session.graph,
        &computed.strategy,
        &computed,
        &right_name,
        &other,
    );
    let payload = CompareOutput {
        winner: report.winner().map(str::to_string),
        report,
    };

    render_mode(output, &payload, render_compare_text, render_compare_pretty)
}

/// Label for the right-hand side; never equal to the computed side's label.
fn right_label(args: &CompareArgs, strategy: &str, left: &str) -> String {
    let stem = || {
        args.against
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("other")
            .to_string()
    };
    match &args.name {
        Some(name) => name.clone(),
        None if !strategy.is_empty() && strategy != left => strategy.to_string(),
        None => stem(),
    }
}

fn better_label<'a>(report: &'a ComparisonReport, better: Better) -> &'a str {
    match better {
        Better::Left => &report.left,
        Better::Right => &report.right,
        Better::Tie => "tie",
        Better::None => "-",
    }
}

fn render_compare_text(payload: &CompareOutput, w: &mut dyn Write) -> std::io::Result<()> {
    let report = &payload.report;
    for row in &report.rows {
        writeln!(
            w,
            "{}\t{}\t{}\t{}",
            row.metric,
            fmt_f64(row.left),
            fmt_f64(row.right),
            better_label(report, row.better)
        )?;
    }
    writeln!(w, "winner\t{}", payload.winner.as_deref().unwrap_or("draw"))
}

fn render_compare_pretty(payload: &CompareOutput, w: &mut dyn Write) -> std::io::Result<()> {
    let report = &payload.report;
    pretty_section(w, &format!("{} vs {}", report.left, report.right))?;
    writeln!(
        w,
        "{:<30} {:>12} {:>12}  better",
        "metric", report.left, report.right
    )?;
    for row in &report.rows {
        writeln!(
            w,
            "{:<30} {:>12} {:>12}  {}",
            row.metric,
            fmt_f64(row.left),
            fmt_f64(row.right),
            better_label(report, row.better)
        )?;
    }
    writeln!(w)?;
    let (left, right) = report.tally();
    match payload.winner.as_deref() {
        Some(winner) => writeln!(w, "Winner: {winner} ({left} vs {right} metrics)"),
        None => writeln!(w, "Draw ({left} vs {right} metrics)"),
    }
}
