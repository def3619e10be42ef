//! `protomod evaluate` — quality metrics for the computed partition.

use std::io::Write;
use std::path::Path;

use clap::Args;
use protomod_core::evaluate::QualityMetrics;

use super::{ManifestArg, Session};
use crate::output::{OutputMode, fmt_f64, pretty_kv, pretty_section, render_mode};

/// Arguments for `protomod evaluate`.
#[derive(Args, Debug)]
pub struct EvaluateArgs {
    #[command(flatten)]
    pub input: ManifestArg,
}

/// Execute `protomod evaluate`.
///
/// # Errors
///
/// Returns an error if the manifest cannot be loaded or output fails.
pub fn run_evaluate(
    args: &EvaluateArgs,
    config: Option<&Path>,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let session = Session::load(&args.input.manifest, config, project_root, output)?;
    let partition = session.partition();
    let metrics = session.evaluator().evaluate(&partition, &session.graph);
    render_mode(output, &metrics, render_metrics_text, render_metrics_pretty)
}

fn render_metrics_text(m: &QualityMetrics, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "score={}", fmt_f64(m.quality_score))?;
    writeln!(
        w,
        "granularity modules={} files={} min={} max={} mean={} median={} std_dev={} gini={}",
        m.granularity.module_count,
        m.granularity.total_files,
        m.granularity.min_size,
        m.granularity.max_size,
        fmt_f64(m.granularity.mean_size),
        fmt_f64(m.granularity.median_size),
        fmt_f64(m.granularity.std_dev),
        fmt_f64(m.granularity.gini),
    )?;
    writeln!(
        w,
        "cohesion mean_namespaces={} max_namespaces={} hidden_edges={}",
        fmt_f64(m.cohesion.mean_namespaces_per_module),
        m.cohesion.max_namespaces_per_module,
        m.cohesion.hidden_cross_namespace_edges,
    )?;
    writeln!(
        w,
        "coupling total_deps={} avg_deps={} max_depth={} avg_fan_in={} max_fan_in={}",
        m.coupling.total_dependencies,
        fmt_f64(m.coupling.avg_dependencies),
        m.coupling.max_depth,
        fmt_f64(m.coupling.avg_fan_in),
        m.coupling.max_fan_in,
    )?;
    writeln!(
        w,
        "build roots={} leaves={} max_parallel={} levels={} critical_path={}",
        m.build.root_modules,
        m.build.leaf_modules,
        m.build.max_parallel,
        m.build.level_count,
        m.build.critical_path_length,
    )
}

fn render_metrics_pretty(m: &QualityMetrics, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, &format!("Quality score: {:.1} / 100", m.quality_score))?;
    pretty_kv(w, "granularity term", fmt_f64(m.components.granularity))?;
    pretty_kv(w, "cohesion term", fmt_f64(m.components.cohesion))?;
    pretty_kv(w, "coupling term", fmt_f64(m.components.coupling))?;
    pretty_kv(w, "build efficiency term", fmt_f64(m.components.build_efficiency))?;

    writeln!(w)?;
    pretty_section(w, "Granularity")?;
    pretty_kv(w, "modules", m.granularity.module_count.to_string())?;
    pretty_kv(w, "files", m.granularity.total_files.to_string())?;
    pretty_kv(
        w,
        "size min/max",
        format!("{} / {}", m.granularity.min_size, m.granularity.max_size),
    )?;
    pretty_kv(
        w,
        "size mean/median",
        format!(
            "{} / {}",
            fmt_f64(m.granularity.mean_size),
            fmt_f64(m.granularity.median_size)
        ),
    )?;
    pretty_kv(w, "size std dev", fmt_f64(m.granularity.std_dev))?;
    pretty_kv(w, "gini", fmt_f64(m.granularity.gini))?;

    writeln!(w)?;
    pretty_section(w, "Cohesion")?;
    pretty_kv(
        w,
        "namespaces per module",
        format!(
            "mean {} / max {}",
            fmt_f64(m.cohesion.mean_namespaces_per_module),
            m.cohesion.max_namespaces_per_module
        ),
    )?;
    pretty_kv(
        w,
        "hidden cross-namespace edges",
        m.cohesion.hidden_cross_namespace_edges.to_string(),
    )?;

    writeln!(w)?;
    pretty_section(w, "Coupling")?;
    pretty_kv(
        w,
        "dependencies",
        format!(
            "{} total / {} avg",
            m.coupling.total_dependencies,
            fmt_f64(m.coupling.avg_dependencies)
        ),
    )?;
    pretty_kv(w, "max depth", m.coupling.max_depth.to_string())?;
    pretty_kv(
        w,
        "fan-in",
        format!(
            "{} avg / {} max",
            fmt_f64(m.coupling.avg_fan_in),
            m.coupling.max_fan_in
        ),
    )?;

    writeln!(w)?;
    pretty_section(w, "Build efficiency")?;
    pretty_kv(w, "root modules", m.build.root_modules.to_string())?;
    pretty_kv(w, "leaf modules", m.build.leaf_modules.to_string())?;
    pretty_kv(w, "max parallel", m.build.max_parallel.to_string())?;
    pretty_kv(w, "critical path", m.build.critical_path_length.to_string())?;
    for (idx, level) in m.build.levels.iter().enumerate() {
        writeln!(w, "  level {idx}: {}", level.join(", "))?;
    }
    if !m.build.blocked_modules.is_empty() {
        writeln!(w, "  blocked by cycles: {}", m.build.blocked_modules.join(", "))?;
    }
    Ok(())
}
