//! Module partitions and the strategy seam that produces them.
//!
//! A [`Partition`] is the hand-off to build-file generation: named modules,
//! the files each owns, and the modules each depends on. Partitions are
//! values; re-partitioning builds a new one.

#![allow(clippy::module_name_repetitions)]

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::graph::{DependencyGraph, GraphNode};

pub mod namespace;

pub use namespace::NamespacePartitioner;

/// Produces a [`Partition`] from a dependency graph.
///
/// One strategy runs at a time; which one is the caller's choice.
pub trait PartitionStrategy {
    /// Identifier recorded in [`Partition::strategy`].
    fn name(&self) -> &str;

    /// Group the files of `graph` into modules.
    fn group(&self, graph: &DependencyGraph) -> Partition;
}

// ---------------------------------------------------------------------------
// Module
// ---------------------------------------------------------------------------

/// A named group of schema files plus the modules it depends on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub name: String,
    /// File paths owned by this module.
    #[serde(default)]
    pub files: Vec<String>,
    /// Names of other modules this module depends on.
    #[serde(default)]
    pub dependencies: BTreeSet<String>,
}

impl Module {
    #[must_use]
    pub fn new<F, D>(name: impl Into<String>, files: F, dependencies: D) -> Self
    where
        F: IntoIterator,
        F::Item: Into<String>,
        D: IntoIterator,
        D::Item: Into<String>,
    {
        Self {
            name: name.into(),
            files: files.into_iter().map(Into::into).collect(),
            dependencies: dependencies.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn depends_on(&self, module: &str) -> bool {
        self.dependencies.contains(module)
    }

    /// Top-level messages across this module's files that exist in `graph`.
    #[must_use]
    pub fn message_count(&self, graph: &DependencyGraph) -> usize {
        self.graph_nodes(graph).map(GraphNode::message_count).sum()
    }

    /// Top-level enums across this module's files that exist in `graph`.
    #[must_use]
    pub fn enum_count(&self, graph: &DependencyGraph) -> usize {
        self.graph_nodes(graph).map(GraphNode::enum_count).sum()
    }

    /// Distinct namespaces declared by this module's files, sorted.
    #[must_use]
    pub fn namespaces<'g>(&self, graph: &'g DependencyGraph) -> BTreeSet<&'g str> {
        self.files
            .iter()
            .filter_map(|path| graph.namespace_of(path))
            .collect()
    }

    fn graph_nodes<'g>(
        &'g self,
        graph: &'g DependencyGraph,
    ) -> impl Iterator<Item = &'g GraphNode> + 'g {
        self.files.iter().filter_map(move |path| graph.node(path))
    }
}

// ---------------------------------------------------------------------------
// Partition
// ---------------------------------------------------------------------------

/// Modules sorted by name, tagged with the strategy that produced them.
///
/// Construction does not check validity; see
/// [`crate::evaluate::PartitionEvaluator::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawPartition")]
pub struct Partition {
    pub strategy: String,
    modules: Vec<Module>,
}

#[derive(Deserialize)]
struct RawPartition {
    #[serde(default)]
    strategy: String,
    #[serde(default)]
    modules: Vec<Module>,
}

impl From<RawPartition> for Partition {
    fn from(raw: RawPartition) -> Self {
        Self::new(raw.strategy, raw.modules)
    }
}

impl Partition {
    /// Build a partition; modules are sorted by name.
    #[must_use]
    pub fn new(strategy: impl Into<String>, mut modules: Vec<Module>) -> Self {
        modules.sort_by(|a, b| a.name.cmp(&b.name));
        Self {
            strategy: strategy.into(),
            modules,
        }
    }

    #[must_use]
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    #[must_use]
    pub fn into_modules(self) -> Vec<Module> {
        self.modules
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    #[must_use]
    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules
            .binary_search_by(|module| module.name.as_str().cmp(name))
            .ok()
            .map(|idx| &self.modules[idx])
    }

    #[must_use]
    pub fn module_names(&self) -> Vec<&str> {
        self.modules.iter().map(|m| m.name.as_str()).collect()
    }

    /// Module names that occur more than once, sorted and deduplicated.
    #[must_use]
    pub fn duplicate_module_names(&self) -> Vec<&str> {
        let mut duplicates: Vec<&str> = self
            .modules
            .windows(2)
            .filter(|pair| pair[0].name == pair[1].name)
            .map(|pair| pair[0].name.as_str())
            .collect();
        duplicates.dedup();
        duplicates
    }

    /// Total file assignments (a file listed twice counts twice).
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.modules.iter().map(Module::file_count).sum()
    }

    /// Map from file path to owning module. When a file is listed by several
    /// modules the first by name wins.
    #[must_use]
    pub fn assignment(&self) -> HashMap<&str, &str> {
        let mut owners: HashMap<&str, &str> = HashMap::with_capacity(self.file_count());
        for module in &self.modules {
            for path in &module.files {
                owners.entry(path.as_str()).or_insert(module.name.as_str());
            }
        }
        owners
    }

    /// Module owning `path`, first by name if several list it.
    #[must_use]
    pub fn owner_of(&self, path: &str) -> Option<&str> {
        self.modules
            .iter()
            .find(|module| module.files.iter().any(|f| f == path))
            .map(|module| module.name.as_str())
    }

    /// BLAKE3 hash of the canonical partition content.
    ///
    /// Equal partitions hash equally; any change to the strategy, a module
    /// name, a file list (including order) or a dependency set changes it.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.strategy.as_bytes());
        hasher.update(b"\x00");
        for module in &self.modules {
            hasher.update(b"M");
            hasher.update(module.name.as_bytes());
            hasher.update(b"\x00");
            for file in &module.files {
                hasher.update(b"F");
                hasher.update(file.as_bytes());
                hasher.update(b"\x00");
            }
            for dep in &module.dependencies {
                hasher.update(b"D");
                hasher.update(dep.as_bytes());
                hasher.update(b"\x00");
            }
        }
        format!("blake3:{}", hasher.finalize().to_hex())
    }
}
