//! `protomod validate` — check a partition against the dependency graph.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use protomod_core::error::ErrorCode;
use protomod_core::evaluate::ValidationReport;
use serde::Serialize;

use super::{ManifestArg, Session, fail, read_partition_file};
use crate::output::{OutputMode, render};

/// Arguments for `protomod validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub input: ManifestArg,

    /// Validate this partition (JSON) instead of the computed one.
    #[arg(long, value_name = "FILE")]
    pub partition: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct ValidateOutput {
    strategy: String,
    module_count: usize,
    #[serde(flatten)]
    report: ValidationReport,
}

/// Execute `protomod validate`. Fails when the partition has errors.
///
/// # Errors
///
/// Returns an error if loading fails or the partition is invalid.
pub fn run_validate(
    args: &ValidateArgs,
    config: Option<&Path>,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let session = Session::load(&args.input.manifest, config, project_root, output)?;
    let partition = match &args.partition {
        Some(path) => read_partition_file(path, output)?,
        None => session.partition(),
    };

    let report = session.evaluator().validate(&partition, &session.graph);
    let error_count = report.errors().len();
    let payload = ValidateOutput {
        strategy: partition.strategy.clone(),
        module_count: partition.len(),
        report,
    };
    render(output, &payload, render_validate_human)?;

    if error_count > 0 {
        return Err(fail(
            output,
            ErrorCode::InvalidPartition,
            format!("partition has {error_count} validation error(s)"),
        ));
    }
    Ok(())
}

fn render_validate_human(payload: &ValidateOutput, w: &mut dyn Write) -> std::io::Result<()> {
    let report = &payload.report;
    writeln!(
        w,
        "Partition '{}' ({} modules): {}",
        payload.strategy,
        payload.module_count,
        if report.is_valid() { "valid" } else { "INVALID" }
    )?;
    for error in report.errors() {
        writeln!(w, "  error: {error}")?;
    }
    for warning in report.warnings() {
        writeln!(w, "  warning: {warning}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use protomod_core::evaluate::{ValidationError, ValidationWarning};

    #[test]
    fn human_rendering_lists_errors_then_warnings() {
        let payload = ValidateOutput {
            strategy: "manual".to_string(),
            module_count: 2,
            report: ValidationReport::new(
                vec![ValidationError::UnassignedFile {
                    path: "a.proto".to_string(),
                }],
                vec![ValidationWarning::EmptyModule {
                    module: "spare".to_string(),
                }],
            ),
        };
        let mut buf = Vec::new();
        render_validate_human(&payload, &mut buf).expect("render");
        let text = String::from_utf8(buf).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Partition 'manual' (2 modules): INVALID");
        assert!(lines[1].contains("a.proto"));
        assert!(lines[2].starts_with("  warning:"));
    }

    #[test]
    fn json_payload_exposes_verdict() {
        let payload = ValidateOutput {
            strategy: "namespace".to_string(),
            module_count: 0,
            report: ValidationReport::new(Vec::new(), Vec::new()),
        };
        let json = serde_json::to_value(&payload).expect("serialize");
        assert_eq!(json["is_valid"], true);
        assert_eq!(json["strategy"], "namespace");
    }
}
