//! Subcommand handlers and the loading steps they share.

pub mod compare;
pub mod completions;
pub mod evaluate;
pub mod order;
pub mod partition;
pub mod plan;
pub mod stats;
pub mod validate;

use std::fmt::Display;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use protomod_core::config::{ProjectConfig, load_config_file, load_project_config};
use protomod_core::error::ErrorCode;
use protomod_core::evaluate::PartitionEvaluator;
use protomod_core::graph::DependencyGraph;
use protomod_core::manifest::{load_manifest, load_partition};
use protomod_core::partition::{NamespacePartitioner, Partition, PartitionStrategy};
use tracing::debug;

use crate::output::{CliError, OutputMode, render_error};

/// Manifest argument shared by every analysis command.
#[derive(Args, Debug, Clone)]
pub struct ManifestArg {
    /// Schema manifest: a list of file records (JSON, or YAML by extension).
    pub manifest: PathBuf,
}

/// Config plus the graph built from a manifest.
#[derive(Debug)]
pub struct Session {
    pub config: ProjectConfig,
    pub graph: DependencyGraph,
}

impl Session {
    /// Load config and manifest and build the dependency graph.
    ///
    /// # Errors
    ///
    /// Returns an error (after rendering it) if the config or manifest cannot
    /// be loaded, or the manifest lists a path twice.
    pub fn load(
        manifest: &Path,
        config_path: Option<&Path>,
        project_root: &Path,
        output: OutputMode,
    ) -> Result<Self> {
        let config = match config_path {
            Some(path) => load_config_file(path),
            None => load_project_config(project_root),
        }
        .map_err(|err| fail(output, ErrorCode::ConfigParseError, format!("{err:#}")))?;

        let code = if manifest.is_file() {
            ErrorCode::ManifestParseError
        } else {
            ErrorCode::ManifestReadFailed
        };
        let records =
            load_manifest(manifest).map_err(|err| fail(output, code, format!("{err:#}")))?;

        let graph = DependencyGraph::build(records, &config.graph)
            .map_err(|err| fail(output, ErrorCode::DuplicatePath, err))?;
        debug!(files = graph.len(), "session loaded");

        Ok(Self { config, graph })
    }

    /// Partition the graph with the configured naming policy.
    pub fn partition(&self) -> Partition {
        NamespacePartitioner::from_config(&self.config.naming).group(&self.graph)
    }

    pub fn evaluator(&self) -> PartitionEvaluator {
        PartitionEvaluator::from_config(&self.config)
    }
}

/// Load a partition file, rendering a classified error on failure.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn read_partition_file(path: &Path, output: OutputMode) -> Result<Partition> {
    load_partition(path)
        .map_err(|err| fail(output, ErrorCode::PartitionParseError, format!("{err:#}")))
}

/// Render `message` as a classified error and turn it into an [`anyhow::Error`]
/// for the exit status.
pub fn fail(output: OutputMode, code: ErrorCode, message: impl Display) -> anyhow::Error {
    let message = message.to_string();
    if let Err(render_err) = render_error(output, &CliError::from_code(code, message.clone())) {
        debug!(error = %render_err, "failed to render error");
    }
    anyhow::anyhow!("{}: {message}", code.code())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_builds_graph_from_manifest() {
        let dir = tempfile::tempdir().expect("tempdir");
        let manifest = testing::write_manifest(&dir);
        let session =
            Session::load(&manifest, None, dir.path(), OutputMode::Json).expect("session");
        assert_eq!(session.graph.len(), 3);
        assert_eq!(session.partition().len(), 3);
    }

    #[test]
    fn missing_manifest_is_classified() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = Session::load(
            &dir.path().join("nope.json"),
            None,
            dir.path(),
            OutputMode::Json,
        )
        .expect_err("missing manifest");
        assert!(err.to_string().starts_with("E1002"));
    }

    #[test]
    fn duplicate_paths_are_classified() {
        let dir = tempfile::tempdir().expect("tempdir");
        let manifest = dir.path().join("dup.yaml");
        std::fs::write(&manifest, "- path: a.proto\n- path: a.proto\n").expect("write");
        let err = Session::load(&manifest, None, dir.path(), OutputMode::Json)
            .expect_err("duplicate path");
        assert!(err.to_string().starts_with("E2001"));
    }

    #[test]
    fn explicit_config_overrides_naming() {
        let dir = tempfile::tempdir().expect("tempdir");
        let manifest = testing::write_manifest(&dir);
        let config = dir.path().join("custom.toml");
        std::fs::write(&config, "[naming]\npolicy = \"full\"\n").expect("write");
        let session = Session::load(&manifest, Some(&config), dir.path(), OutputMode::Json)
            .expect("session");
        assert!(session.partition().module("com-acme-common").is_some());
    }
}
