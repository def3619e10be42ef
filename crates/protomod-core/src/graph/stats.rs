//! Aggregate statistics for a [`DependencyGraph`].
//!
//! # Statistics Provided
//!
//! - **file_count** / **namespace_count**: files in the graph and distinct
//!   declared namespaces among them.
//! - **message_count** / **enum_count**: top-level type definitions summed
//!   over all files.
//! - **edge_count**: resolved import edges.
//! - **root_count**: files importing nothing; **leaf_count**: files nothing
//!   imports.
//! - **cycle_count**: back-edge cycles found by
//!   [`DependencyGraph::detect_cycles`].
//! - **cross_namespace_edge_count**: distinct namespace pairs joined by at
//!   least one import.
//! - **unresolved_import_count**: imports dropped because they matched no
//!   file and no builtin prefix.

use serde::Serialize;

use super::build::{DependencyGraph, GraphNode};

/// Summary statistics for a dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub file_count: usize,
    pub namespace_count: usize,
    pub message_count: usize,
    pub enum_count: usize,
    pub edge_count: usize,
    pub root_count: usize,
    pub leaf_count: usize,
    pub cycle_count: usize,
    pub cross_namespace_edge_count: usize,
    pub unresolved_import_count: usize,
}

impl GraphStats {
    /// Return `true` if the file graph contains at least one import cycle.
    #[must_use]
    pub const fn has_cycles(&self) -> bool {
        self.cycle_count > 0
    }
}

impl DependencyGraph {
    /// Compute aggregate counts over the whole graph.
    #[must_use]
    pub fn statistics(&self) -> GraphStats {
        GraphStats {
            file_count: self.len(),
            namespace_count: self.namespace_groups().len(),
            message_count: self.nodes().map(GraphNode::message_count).sum(),
            enum_count: self.nodes().map(GraphNode::enum_count).sum(),
            edge_count: self.edge_count(),
            root_count: self.find_roots().len(),
            leaf_count: self.find_leaves().len(),
            cycle_count: self.detect_cycles().len(),
            cross_namespace_edge_count: self.cross_namespace_edges().len(),
            unresolved_import_count: self.unresolved_imports().len(),
        }
    }
}
