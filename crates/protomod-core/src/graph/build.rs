//! Dependency graph construction from schema file records.
//!
//! # Edge Direction
//!
//! An edge `A → B` means "A imports B": A cannot compile without B. Roots
//! are files that import nothing; leaves are files nothing imports.
//!
//! # Resolution
//!
//! An import resolves when it names a path present in the graph. Imports of
//! builtin schemas (see [`GraphConfig::builtin_prefixes`]) are dropped
//! silently. Every other unresolved import is dropped from the edge set but
//! remembered in [`DependencyGraph::unresolved_imports`] so a caller can
//! surface likely typos.

#![allow(clippy::module_name_repetitions)]

use std::collections::{BTreeSet, HashMap, HashSet};

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Bfs;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::config::GraphConfig;
use crate::model::FileRecord;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors raised while constructing a [`DependencyGraph`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// Two records share the same path.
    #[error("duplicate schema file path: {path}")]
    DuplicatePath { path: String },
}

// ---------------------------------------------------------------------------
// Node and edge payloads
// ---------------------------------------------------------------------------

/// A schema file inside the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    record: FileRecord,
}

impl GraphNode {
    #[must_use]
    pub fn path(&self) -> &str {
        &self.record.path
    }

    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.record.namespace.as_deref()
    }

    /// Raw imports exactly as declared, resolved or not.
    #[must_use]
    pub fn imports(&self) -> &[String] {
        &self.record.imports
    }

    #[must_use]
    pub const fn message_count(&self) -> usize {
        self.record.message_count
    }

    #[must_use]
    pub const fn enum_count(&self) -> usize {
        self.record.enum_count
    }

    #[must_use]
    pub const fn record(&self) -> &FileRecord {
        &self.record
    }
}

/// An import that matched neither a known file nor a builtin prefix.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct UnresolvedImport {
    /// File declaring the import.
    pub importer: String,
    /// The import reference as written.
    pub import: String,
}

// ---------------------------------------------------------------------------
// DependencyGraph
// ---------------------------------------------------------------------------

/// File-level import graph.
///
/// Built once and never mutated. Forward and reverse adjacency are
/// precomputed so [`dependencies_of`](Self::dependencies_of) and
/// [`dependents_of`](Self::dependents_of) are plain map lookups.
///
/// Nodes are inserted in lexicographic path order, so every iteration over
/// the graph is deterministic.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    /// Directed graph: nodes = schema files, edges = resolved imports.
    pub(crate) graph: DiGraph<GraphNode, ()>,
    /// Mapping from file path to petgraph `NodeIndex`.
    node_map: HashMap<String, NodeIndex>,
    /// Resolved imports per file, in declaration order, deduplicated.
    forward: HashMap<String, Vec<String>>,
    /// Importers per file, sorted by path.
    reverse: HashMap<String, Vec<String>>,
    unresolved: Vec<UnresolvedImport>,
}

impl DependencyGraph {
    /// Build a graph using the default [`GraphConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DuplicatePath`] if two records share a path.
    pub fn from_records(records: Vec<FileRecord>) -> Result<Self, GraphError> {
        Self::build(records, &GraphConfig::default())
    }

    /// Build a graph from schema provider output.
    ///
    /// Records under a builtin prefix are excluded before anything else, so
    /// repeated builtin paths are accepted and only counted in the debug log.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DuplicatePath`] if two non-builtin records share
    /// a path. The first duplicate in input order is reported.
    #[instrument(skip(records, config), fields(record_count = records.len()))]
    pub fn build(records: Vec<FileRecord>, config: &GraphConfig) -> Result<Self, GraphError> {
        let (builtins, mut records): (Vec<FileRecord>, Vec<FileRecord>) = records
            .into_iter()
            .partition(|record| config.is_builtin(&record.path));
        if !builtins.is_empty() {
            let distinct: HashSet<&str> = builtins.iter().map(|r| r.path.as_str()).collect();
            debug!(
                excluded = builtins.len(),
                collapsed_duplicates = builtins.len() - distinct.len(),
                "excluded builtin schema records"
            );
        }

        let mut seen: HashSet<&str> = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.path.as_str()) {
                warn!(path = %record.path, "duplicate schema file path");
                return Err(GraphError::DuplicatePath {
                    path: record.path.clone(),
                });
            }
        }

        records.sort_by(|a, b| a.path.cmp(&b.path));

        let mut graph = DiGraph::<GraphNode, ()>::with_capacity(records.len(), 0);
        let mut node_map: HashMap<String, NodeIndex> = HashMap::with_capacity(records.len());
        for record in records {
            let path = record.path.clone();
            let idx = graph.add_node(GraphNode { record });
            node_map.insert(path, idx);
        }

        let mut forward: HashMap<String, Vec<String>> = HashMap::with_capacity(node_map.len());
        let mut reverse: HashMap<String, Vec<String>> = node_map
            .keys()
            .map(|path| (path.clone(), Vec::new()))
            .collect();
        let mut unresolved = Vec::new();
        let mut edges: Vec<(NodeIndex, NodeIndex)> = Vec::new();

        // Node indices follow sorted path order, so reverse lists come out
        // sorted without a separate pass.
        for idx in graph.node_indices() {
            let node = &graph[idx];
            let mut resolved: Vec<String> = Vec::new();
            let mut seen_imports: HashSet<&str> = HashSet::new();

            for import in node.imports() {
                if !seen_imports.insert(import.as_str()) {
                    continue;
                }
                if let Some(&target) = node_map.get(import) {
                    resolved.push(import.clone());
                    edges.push((idx, target));
                    if let Some(importers) = reverse.get_mut(import) {
                        importers.push(node.path().to_string());
                    }
                } else if config.is_builtin(import) {
                    debug!(importer = node.path(), import = %import, "dropped builtin import");
                } else {
                    debug!(importer = node.path(), import = %import, "dropped unresolved import");
                    unresolved.push(UnresolvedImport {
                        importer: node.path().to_string(),
                        import: import.clone(),
                    });
                }
            }

            forward.insert(node.path().to_string(), resolved);
        }

        for (from, to) in edges {
            graph.add_edge(from, to, ());
        }
        unresolved.sort();

        debug!(
            files = graph.node_count(),
            edges = graph.edge_count(),
            unresolved = unresolved.len(),
            "dependency graph built"
        );

        Ok(Self {
            graph,
            node_map,
            forward,
            reverse,
            unresolved,
        })
    }

    /// Number of files in the graph.
    #[must_use]
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Number of resolved import edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.node_map.contains_key(path)
    }

    /// Look up a file by path.
    #[must_use]
    pub fn node(&self, path: &str) -> Option<&GraphNode> {
        self.node_map.get(path).map(|&idx| &self.graph[idx])
    }

    /// All files in lexicographic path order.
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> + '_ {
        self.graph.node_indices().map(move |idx| &self.graph[idx])
    }

    /// All paths in lexicographic order.
    #[must_use]
    pub fn paths(&self) -> Vec<&str> {
        self.nodes().map(GraphNode::path).collect()
    }

    /// Resolved imports of `path`, in declaration order.
    ///
    /// Empty for unknown paths.
    #[must_use]
    pub fn dependencies_of(&self, path: &str) -> &[String] {
        self.forward.get(path).map_or(&[], Vec::as_slice)
    }

    /// Files that import `path`, sorted.
    ///
    /// Empty for unknown paths.
    #[must_use]
    pub fn dependents_of(&self, path: &str) -> &[String] {
        self.reverse.get(path).map_or(&[], Vec::as_slice)
    }

    /// Every file reachable from `path` through imports, excluding `path`.
    ///
    /// Breadth-first with a visited set, so import cycles terminate and a
    /// file that reaches itself is still left out.
    #[must_use]
    pub fn transitive_dependencies_of(&self, path: &str) -> BTreeSet<String> {
        let Some(&start) = self.node_map.get(path) else {
            return BTreeSet::new();
        };

        let mut reachable = BTreeSet::new();
        let mut bfs = Bfs::new(&self.graph, start);
        while let Some(idx) = bfs.next(&self.graph) {
            if idx != start {
                reachable.insert(self.graph[idx].path().to_string());
            }
        }
        reachable
    }

    /// Files that import nothing (resolved), sorted.
    #[must_use]
    pub fn find_roots(&self) -> Vec<&str> {
        self.paths_with_no_edges(Direction::Outgoing)
    }

    /// Files that nothing imports, sorted.
    #[must_use]
    pub fn find_leaves(&self) -> Vec<&str> {
        self.paths_with_no_edges(Direction::Incoming)
    }

    /// Imports that matched neither a file nor a builtin prefix, sorted by
    /// `(importer, import)`.
    #[must_use]
    pub fn unresolved_imports(&self) -> &[UnresolvedImport] {
        &self.unresolved
    }

    fn paths_with_no_edges(&self, direction: Direction) -> Vec<&str> {
        self.graph
            .node_indices()
            .filter(|&idx| {
                self.graph
                    .neighbors_directed(idx, direction)
                    .next()
                    .is_none()
            })
            .map(|idx| self.graph[idx].path())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
