//! Project configuration loaded from `protomod.toml`.
//!
//! Every field has a default, so a missing file, a missing section, or a
//! missing key all fall back to the built-in values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::evaluate::score::QualityWeights;
use crate::naming::{FullPreservingNaming, NamingPolicy, StandardNaming};

/// File name looked up in the project root.
pub const CONFIG_FILE_NAME: &str = "protomod.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub graph: GraphConfig,
    #[serde(default)]
    pub naming: NamingConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Path prefixes of foreign/builtin schemas (e.g. the protobuf
    /// well-known types). Records under these prefixes are left out of the
    /// graph and imports of them are dropped without a warning.
    #[serde(default = "default_builtin_prefixes")]
    pub builtin_prefixes: Vec<String>,
    /// Report imports that resolve to nothing and are not builtin as
    /// validation warnings.
    #[serde(default = "default_true")]
    pub warn_unresolved: bool,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            builtin_prefixes: default_builtin_prefixes(),
            warn_unresolved: default_true(),
        }
    }
}

impl GraphConfig {
    /// Return `true` if `path` lives under one of the builtin prefixes.
    #[must_use]
    pub fn is_builtin(&self, path: &str) -> bool {
        self.builtin_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }
}

/// Which reference naming policy to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingPolicyKind {
    #[default]
    Standard,
    Full,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamingConfig {
    #[serde(default)]
    pub policy: NamingPolicyKind,
    /// Ordered prefixes stripped by the standard policy; first match wins.
    #[serde(default = "default_strip_prefixes")]
    pub strip_prefixes: Vec<String>,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            policy: NamingPolicyKind::default(),
            strip_prefixes: default_strip_prefixes(),
        }
    }
}

impl NamingConfig {
    /// Build the configured naming policy.
    #[must_use]
    pub fn build_policy(&self) -> Box<dyn NamingPolicy + Send + Sync> {
        match self.policy {
            NamingPolicyKind::Standard => {
                Box::new(StandardNaming::with_prefixes(self.strip_prefixes.clone()))
            }
            NamingPolicyKind::Full => Box::new(FullPreservingNaming),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default)]
    pub weights: QualityWeights,
    /// Smallest mean module size (in files) considered ideal.
    #[serde(default = "default_sweet_spot_min")]
    pub sweet_spot_min: f64,
    /// Largest mean module size (in files) considered ideal.
    #[serde(default = "default_sweet_spot_max")]
    pub sweet_spot_max: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: QualityWeights::default(),
            sweet_spot_min: default_sweet_spot_min(),
            sweet_spot_max: default_sweet_spot_max(),
        }
    }
}

const fn default_true() -> bool {
    true
}

fn default_builtin_prefixes() -> Vec<String> {
    vec!["google/protobuf/".to_string()]
}

fn default_strip_prefixes() -> Vec<String> {
    ["com.", "org.", "net."]
        .into_iter()
        .map(str::to_string)
        .collect()
}

const fn default_sweet_spot_min() -> f64 {
    3.0
}

const fn default_sweet_spot_max() -> f64 {
    15.0
}

/// Load `protomod.toml` from `project_root`, or defaults if it is absent.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    let path = project_root.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }
    load_config_file(&path)
}

/// Load a config file from an explicit path.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid TOML for
/// [`ProjectConfig`].
pub fn load_config_file(path: &Path) -> Result<ProjectConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config: ProjectConfig = toml::from_str("").expect("empty config parses");
        assert_eq!(config, ProjectConfig::default());
        assert_eq!(config.graph.builtin_prefixes, vec!["google/protobuf/"]);
        assert!(config.graph.warn_unresolved);
        assert_eq!(config.naming.policy, NamingPolicyKind::Standard);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: ProjectConfig = toml::from_str(
            r#"
[naming]
policy = "full"

[scoring]
sweet_spot_max = 8.0

[scoring.weights]
cohesion = 0.5
"#,
        )
        .expect("partial config parses");

        assert_eq!(config.naming.policy, NamingPolicyKind::Full);
        assert_eq!(config.naming.strip_prefixes, default_strip_prefixes());
        assert!((config.scoring.sweet_spot_max - 8.0).abs() < f64::EPSILON);
        assert!((config.scoring.sweet_spot_min - 3.0).abs() < f64::EPSILON);
        assert!((config.scoring.weights.cohesion - 0.5).abs() < f64::EPSILON);
        assert!((config.scoring.weights.granularity - 0.35).abs() < f64::EPSILON);
    }

    #[test]
    fn builtin_prefix_matching() {
        let graph = GraphConfig::default();
        assert!(graph.is_builtin("google/protobuf/timestamp.proto"));
        assert!(!graph.is_builtin("acme/common/money.proto"));
    }

    #[test]
    fn missing_file_returns_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = load_project_config(dir.path()).expect("defaults");
        assert_eq!(config, ProjectConfig::default());
    }

    #[test]
    fn invalid_file_reports_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[graph\n").expect("write");
        let err = load_project_config(dir.path()).expect_err("bad toml must fail");
        assert!(format!("{err:#}").contains(CONFIG_FILE_NAME));
    }

    #[test]
    fn configured_policy_is_applied() {
        let naming = NamingConfig {
            policy: NamingPolicyKind::Full,
            ..NamingConfig::default()
        };
        let policy = naming.build_policy();
        assert_eq!(policy.module_name("com.acme.billing"), "com-acme-billing");

        let policy = NamingConfig::default().build_policy();
        assert_eq!(policy.module_name("com.acme.billing"), "acme-billing");
    }
}
