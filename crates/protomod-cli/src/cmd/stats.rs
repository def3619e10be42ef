//! `protomod stats` — dependency graph overview.

use std::io::Write;
use std::path::Path;

use clap::Args;
use protomod_core::graph::{GraphStats, UnresolvedImport};
use serde::Serialize;

use super::{ManifestArg, Session};
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `protomod stats`.
#[derive(Args, Debug)]
pub struct StatsArgs {
    #[command(flatten)]
    pub input: ManifestArg,
}

/// Report payload for `protomod stats`.
#[derive(Debug, Serialize)]
pub struct StatsReport {
    pub stats: GraphStats,
    pub roots: Vec<String>,
    pub leaves: Vec<String>,
    pub cycles: Vec<Vec<String>>,
    pub unresolved_imports: Vec<UnresolvedImport>,
}

impl StatsReport {
    pub fn from_session(session: &Session) -> Self {
        let graph = &session.graph;
        Self {
            stats: graph.statistics(),
            roots: graph.find_roots().into_iter().map(str::to_string).collect(),
            leaves: graph.find_leaves().into_iter().map(str::to_string).collect(),
            cycles: graph.detect_cycles(),
            unresolved_imports: graph.unresolved_imports().to_vec(),
        }
    }
}

/// Execute `protomod stats`.
///
/// # Errors
///
/// Returns an error if the manifest cannot be loaded or output fails.
pub fn run_stats(
    args: &StatsArgs,
    config: Option<&Path>,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let session = Session::load(&args.input.manifest, config, project_root, output)?;
    let report = StatsReport::from_session(&session);
    render_mode(output, &report, render_stats_text, render_stats_pretty)
}

fn render_stats_text(report: &StatsReport, w: &mut dyn Write) -> std::io::Result<()> {
    let s = &report.stats;
    writeln!(
        w,
        "files={} namespaces={} messages={} enums={} edges={} roots={} leaves={} cycles={} cross_namespace_edges={} unresolved={}",
        s.file_count,
        s.namespace_count,
        s.message_count,
        s.enum_count,
        s.edge_count,
        s.root_count,
        s.leaf_count,
        s.cycle_count,
        s.cross_namespace_edge_count,
        s.unresolved_import_count,
    )?;
    for cycle in &report.cycles {
        writeln!(w, "cycle {}", cycle.join(" -> "))?;
    }
    for unresolved in &report.unresolved_imports {
        writeln!(w, "unresolved {} {}", unresolved.importer, unresolved.import)?;
    }
    Ok(())
}

fn render_stats_pretty(report: &StatsReport, w: &mut dyn Write) -> std::io::Result<()> {
    let s = &report.stats;
    pretty_section(w, "Dependency graph")?;
    pretty_kv(w, "files", s.file_count.to_string())?;
    pretty_kv(w, "namespaces", s.namespace_count.to_string())?;
    pretty_kv(w, "messages", s.message_count.to_string())?;
    pretty_kv(w, "enums", s.enum_count.to_string())?;
    pretty_kv(w, "import edges", s.edge_count.to_string())?;
    pretty_kv(w, "cross-namespace edges", s.cross_namespace_edge_count.to_string())?;
    pretty_kv(w, "roots", s.root_count.to_string())?;
    pretty_kv(w, "leaves", s.leaf_count.to_string())?;

    writeln!(w)?;
    if report.cycles.is_empty() {
        writeln!(w, "No import cycles found.")?;
    } else {
        pretty_section(w, &format!("Import cycles ({})", report.cycles.len()))?;
        for cycle in &report.cycles {
            writeln!(w, "  {}", cycle.join(" -> "))?;
        }
    }

    if !report.unresolved_imports.is_empty() {
        writeln!(w)?;
        pretty_section(
            w,
            &format!("Unresolved imports ({})", report.unresolved_imports.len()),
        )?;
        for unresolved in &report.unresolved_imports {
            writeln!(w, "  {} → {}", unresolved.importer, unresolved.import)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::testing;

    #[test]
    fn report_lists_roots_and_leaves() {
        let dir = tempfile::tempdir().expect("tempdir");
        let manifest = testing::write_manifest(&dir);
        let session =
            Session::load(&manifest, None, dir.path(), OutputMode::Json).expect("session");
        let report = StatsReport::from_session(&session);

        assert_eq!(report.stats.file_count, 3);
        assert_eq!(report.roots, vec!["common/ids.proto"]);
        assert_eq!(report.leaves, vec!["orders/order.proto", "users/user.proto"]);
        assert!(report.cycles.is_empty());
        assert!(report.unresolved_imports.is_empty());
    }

    #[test]
    fn text_rendering_is_one_summary_line() {
        let dir = tempfile::tempdir().expect("tempdir");
        let manifest = testing::write_manifest(&dir);
        let session =
            Session::load(&manifest, None, dir.path(), OutputMode::Json).expect("session");
        let mut buf = Vec::new();
        render_stats_text(&StatsReport::from_session(&session), &mut buf).expect("render");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.starts_with("files=3 namespaces=3 messages=6 enums=1 edges=2"));
        assert_eq!(text.lines().count(), 1);
    }
}
