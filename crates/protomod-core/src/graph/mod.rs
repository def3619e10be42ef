//! File-level dependency graph.
//!
//! # Overview
//!
//! Schema provider records are turned into a petgraph-backed directed graph
//! whose edges are resolved imports. The graph is immutable after
//! construction and feeds the partitioner and the evaluator.
//!
//! ## Pipeline
//!
//! ```text
//! Vec<FileRecord>
//!        ↓  build::DependencyGraph::build()
//! DependencyGraph (forward + reverse adjacency, unresolved imports)
//!        ├─ cycles:     detect_cycles()
//!        ├─ namespaces: namespace_groups(), cross_namespace_edges()
//!        └─ stats:      statistics()
//! ```
//!
//! ## Typical Usage
//!
//! ```rust
//! use protomod_core::graph::DependencyGraph;
//! use protomod_core::model::FileRecord;
//!
//! let graph = DependencyGraph::from_records(vec![
//!     FileRecord::new("a.proto", Some("acme.a")).with_imports(["b.proto"]),
//!     FileRecord::new("b.proto", Some("acme.b")),
//! ])?;
//!
//! assert_eq!(graph.dependencies_of("a.proto"), ["b.proto"]);
//! assert!(graph.detect_cycles().is_empty());
//! # Ok::<(), protomod_core::graph::GraphError>(())
//! ```

pub mod build;
pub mod cycles;
pub mod namespaces;
pub mod stats;

// Re-export primary types at module level for convenience.
pub use build::{DependencyGraph, GraphError, GraphNode, UnresolvedImport};
pub use cycles::find_cycles;
pub use stats::GraphStats;
