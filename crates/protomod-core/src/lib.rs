#![forbid(unsafe_code)]
//! protomod-core: Protocol Buffer schema modularization.
//!
//! Turns a flat set of schema file records into a module partition:
//!
//! ```text
//! Vec<FileRecord> → DependencyGraph → Partition → ValidationReport / QualityMetrics
//!                                         └──────→ build order → BuildPlan
//! ```
//!
//! # Conventions
//!
//! - **Errors**: construction and ordering failures are typed
//!   (`thiserror`); file loading uses `anyhow` with context. Validation and
//!   evaluation never fail, they return reports.
//! - **Logging**: `tracing` macros only; the binary installs the subscriber.
//! - **Determinism**: every collection exposed to callers is sorted.

pub mod config;
pub mod error;
pub mod evaluate;
pub mod graph;
pub mod manifest;
pub mod model;
pub mod naming;
pub mod order;
pub mod partition;
pub mod plan;

pub use config::ProjectConfig;
pub use evaluate::{ComparisonReport, PartitionEvaluator, QualityMetrics, ValidationReport};
pub use graph::{DependencyGraph, GraphError};
pub use model::FileRecord;
pub use naming::{FullPreservingNaming, NamingPolicy, StandardNaming};
pub use order::{BuildLevels, OrderError, build_levels, dependency_depths, topological_sort};
pub use partition::{Module, NamespacePartitioner, Partition, PartitionStrategy};
pub use plan::{BuildPlan, PlanError};
