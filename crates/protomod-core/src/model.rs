//! Schema file records as delivered by the schema provider.

use serde::{Deserialize, Serialize};

/// Parsed metadata for one schema file.
///
/// Produced once per load by whatever scans the `.proto` sources. The core
/// never re-reads the file; imports are kept verbatim and resolved later
/// against the set of known paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Path relative to the schema root. Unique key within a graph.
    pub path: String,
    /// Declared `package`, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Raw import references in declaration order.
    #[serde(default)]
    pub imports: Vec<String>,
    /// Number of top-level `message` definitions.
    #[serde(default)]
    pub message_count: usize,
    /// Number of top-level `enum` definitions.
    #[serde(default)]
    pub enum_count: usize,
}

impl FileRecord {
    /// Create a record with no imports and no type definitions.
    #[must_use]
    pub fn new(path: impl Into<String>, namespace: Option<&str>) -> Self {
        Self {
            path: path.into(),
            namespace: namespace.map(str::to_string),
            imports: Vec::new(),
            message_count: 0,
            enum_count: 0,
        }
    }

    /// Builder-style helper that replaces the import list.
    #[must_use]
    pub fn with_imports<I, S>(mut self, imports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.imports = imports.into_iter().map(Into::into).collect();
        self
    }

    /// Builder-style helper that sets the message and enum counts.
    #[must_use]
    pub const fn with_counts(mut self, message_count: usize, enum_count: usize) -> Self {
        self.message_count = message_count;
        self.enum_count = enum_count;
        self
    }
}
