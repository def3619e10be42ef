//! Reading schema manifests and partition files from disk.
//!
//! A manifest is an ordered list of [`FileRecord`]s, as JSON or YAML
//! (`.yaml`/`.yml`). Partition files are JSON.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::model::FileRecord;
use crate::partition::Partition;

/// Serialization format of a manifest file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Json,
    Yaml,
}

impl ManifestFormat {
    /// Pick the format from the file extension; anything but YAML is JSON.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }
}

/// Parse manifest text in the given format.
///
/// # Errors
///
/// Returns an error if the text is not a list of file records.
pub fn parse_manifest(text: &str, format: ManifestFormat) -> Result<Vec<FileRecord>> {
    match format {
        ManifestFormat::Json => serde_json::from_str(text).context("invalid JSON manifest"),
        ManifestFormat::Yaml => serde_yaml::from_str(text).context("invalid YAML manifest"),
    }
}

/// Load the file records listed in `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_manifest(path: &Path) -> Result<Vec<FileRecord>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read manifest {}", path.display()))?;
    let records = parse_manifest(&text, ManifestFormat::from_path(path))
        .with_context(|| format!("failed to parse manifest {}", path.display()))?;
    debug!(path = %path.display(), records = records.len(), "loaded manifest");
    Ok(records)
}

/// Load a partition previously written as JSON.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_partition(path: &Path) -> Result<Partition> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read partition {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("failed to parse partition {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_follows_extension() {
        assert_eq!(ManifestFormat::from_path(Path::new("m.yaml")), ManifestFormat::Yaml);
        assert_eq!(ManifestFormat::from_path(Path::new("m.YML")), ManifestFormat::Yaml);
        assert_eq!(ManifestFormat::from_path(Path::new("m.json")), ManifestFormat::Json);
        assert_eq!(ManifestFormat::from_path(Path::new("manifest")), ManifestFormat::Json);
    }

    #[test]
    fn yaml_manifest_with_defaults() {
        let yaml = "- path: a.proto\n  namespace: acme.a\n  imports: [b.proto]\n- path: b.proto\n";
        let records = parse_manifest(yaml, ManifestFormat::Yaml).expect("yaml parses");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].imports, vec!["b.proto"]);
        assert_eq!(records[1].namespace, None);
        assert_eq!(records[1].message_count, 0);
    }

    #[test]
    fn json_manifest_requires_path() {
        let err = parse_manifest(r#"[{"namespace": "x"}]"#, ManifestFormat::Json)
            .expect_err("missing path");
        assert!(format!("{err:#}").contains("path"));
    }

    #[test]
    fn load_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let manifest = dir.path().join("schema.json");
        fs::write(&manifest, r#"[{"path": "a.proto", "namespace": "acme"}]"#).expect("write");
        let records = load_manifest(&manifest).expect("load");
        assert_eq!(records[0].namespace.as_deref(), Some("acme"));

        let missing = load_manifest(&dir.path().join("nope.json")).expect_err("missing");
        assert!(format!("{missing:#}").contains("failed to read manifest"));
    }

    #[test]
    fn load_partition_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("partition.json");
        fs::write(
            &file,
            r#"{"strategy": "manual", "modules": [{"name": "m", "files": ["a.proto"]}]}"#,
        )
        .expect("write");
        let partition = load_partition(&file).expect("load");
        assert_eq!(partition.module_names(), vec!["m"]);
    }
}
