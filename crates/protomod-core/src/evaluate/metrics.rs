//! Partition quality metrics along four independent axes.
//!
//! | Axis        | Built from |
//! |-------------|------------|
//! | granularity | per-module file counts |
//! | cohesion    | namespaces per module, same-module cross-namespace edges |
//! | coupling    | declared module dependencies, depth, fan-in |
//! | build       | wavefront build levels |

#![allow(clippy::module_name_repetitions)]

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::graph::DependencyGraph;
use crate::order::{build_levels, dependency_depths};
use crate::partition::Partition;

// ---------------------------------------------------------------------------
// Snapshot types
// ---------------------------------------------------------------------------

/// Module size distribution.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GranularityMetrics {
    pub module_count: usize,
    pub total_files: usize,
    pub min_size: usize,
    pub max_size: usize,
    pub mean_size: f64,
    pub median_size: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    /// 0 = perfectly balanced, approaching 1 = maximally unbalanced.
    pub gini: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CohesionMetrics {
    /// Averaged over modules holding at least one namespaced file.
    pub mean_namespaces_per_module: f64,
    pub max_namespaces_per_module: usize,
    /// File-level import edges inside one module whose endpoints declare
    /// different namespaces.
    pub hidden_cross_namespace_edges: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CouplingMetrics {
    pub total_dependencies: usize,
    pub avg_dependencies: f64,
    /// Longest dependency chain; 0 when no module depends on another.
    pub max_depth: usize,
    /// Number of modules depending on each module.
    pub fan_in: BTreeMap<String, usize>,
    pub avg_fan_in: f64,
    pub max_fan_in: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BuildEfficiencyMetrics {
    /// Modules with no dependencies.
    pub root_modules: usize,
    /// Modules no other module depends on.
    pub leaf_modules: usize,
    /// Widest build level.
    pub max_parallel: usize,
    pub level_count: usize,
    /// `max_depth + 1`, or 0 for an empty partition.
    pub critical_path_length: usize,
    pub levels: Vec<Vec<String>>,
    /// Modules that could not be levelled because of a cycle.
    pub blocked_modules: Vec<String>,
}

/// Immutable evaluation result for one partition.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QualityMetrics {
    pub granularity: GranularityMetrics,
    pub cohesion: CohesionMetrics,
    pub coupling: CouplingMetrics,
    pub build: BuildEfficiencyMetrics,
    pub components: super::score::ScoreComponents,
    /// Composite score in `[0, 100]`.
    pub quality_score: f64,
}

impl QualityMetrics {
    /// Inputs for [`super::score::score_components`].
    #[must_use]
    pub const fn score_inputs(&self) -> super::score::ScoreInputs {
        super::score::ScoreInputs {
            module_count: self.granularity.module_count,
            gini: self.granularity.gini,
            mean_module_size: self.granularity.mean_size,
            mean_namespaces_per_module: self.cohesion.mean_namespaces_per_module,
            avg_dependencies: self.coupling.avg_dependencies,
            max_depth: self.coupling.max_depth,
            max_parallel: self.build.max_parallel,
        }
    }
}

// ---------------------------------------------------------------------------
// Axis computations
// ---------------------------------------------------------------------------

#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn granularity(partition: &Partition) -> GranularityMetrics {
    let mut sizes: Vec<usize> = partition.modules().iter().map(|m| m.file_count()).collect();
    sizes.sort_unstable();

    let n = sizes.len();
    if n == 0 {
        return GranularityMetrics::default();
    }

    let total: usize = sizes.iter().sum();
    let mean = total as f64 / n as f64;
    let median = if n % 2 == 1 {
        sizes[n / 2] as f64
    } else {
        (sizes[n / 2 - 1] + sizes[n / 2]) as f64 / 2.0
    };
    let variance = sizes
        .iter()
        .map(|&size| {
            let delta = size as f64 - mean;
            delta * delta
        })
        .sum::<f64>()
        / n as f64;

    GranularityMetrics {
        module_count: n,
        total_files: total,
        min_size: sizes[0],
        max_size: sizes[n - 1],
        mean_size: mean,
        median_size: median,
        std_dev: variance.sqrt(),
        gini: gini_coefficient(&sizes),
    }
}

/// Gini coefficient of `sizes`, which must be sorted ascending.
///
/// `Σᵢ (2i − n − 1)·sizeᵢ / (n·Σ size)` with `i` counted from 1. Returns 0
/// for an empty slice or an all-zero distribution.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn gini_coefficient(sizes: &[usize]) -> f64 {
    let n = sizes.len();
    let total: usize = sizes.iter().sum();
    if n == 0 || total == 0 {
        return 0.0;
    }
    let n_f = n as f64;
    let weighted: f64 = sizes
        .iter()
        .enumerate()
        .map(|(idx, &size)| (2.0f64.mul_add((idx + 1) as f64, -n_f) - 1.0) * size as f64)
        .sum();
    weighted / (n_f * total as f64)
}

#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn cohesion(partition: &Partition, graph: &DependencyGraph) -> CohesionMetrics {
    let counts: Vec<usize> = partition
        .modules()
        .iter()
        .map(|module| module.namespaces(graph).len())
        .filter(|count| *count > 0)
        .collect();

    let mean = if counts.is_empty() {
        0.0
    } else {
        counts.iter().sum::<usize>() as f64 / counts.len() as f64
    };

    let mut hidden = 0;
    for module in partition.modules() {
        let members: HashSet<&str> = module.files.iter().map(String::as_str).collect();
        for file in &module.files {
            let Some(source_ns) = graph.namespace_of(file) else {
                continue;
            };
            hidden += graph
                .dependencies_of(file)
                .iter()
                .filter(|target| members.contains(target.as_str()))
                .filter_map(|target| graph.namespace_of(target))
                .filter(|target_ns| *target_ns != source_ns)
                .count();
        }
    }

    CohesionMetrics {
        mean_namespaces_per_module: mean,
        max_namespaces_per_module: counts.iter().copied().max().unwrap_or(0),
        hidden_cross_namespace_edges: hidden,
    }
}

#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn coupling(partition: &Partition) -> CouplingMetrics {
    let n = partition.len();
    if n == 0 {
        return CouplingMetrics::default();
    }

    let mut fan_in: BTreeMap<String, usize> = partition
        .modules()
        .iter()
        .map(|module| (module.name.clone(), 0))
        .collect();
    let mut total = 0;
    for module in partition.modules() {
        total += module.dependencies.len();
        for dep in &module.dependencies {
            if let Some(count) = fan_in.get_mut(dep) {
                *count += 1;
            }
        }
    }

    let max_depth = dependency_depths(partition).into_values().max().unwrap_or(0);
    let fan_in_total: usize = fan_in.values().sum();
    let max_fan_in = fan_in.values().copied().max().unwrap_or(0);

    CouplingMetrics {
        total_dependencies: total,
        avg_dependencies: total as f64 / n as f64,
        max_depth,
        avg_fan_in: fan_in_total as f64 / n as f64,
        max_fan_in,
        fan_in,
    }
}

#[must_use]
pub fn build_efficiency(partition: &Partition, max_depth: usize) -> BuildEfficiencyMetrics {
    if partition.is_empty() {
        return BuildEfficiencyMetrics::default();
    }

    let known: HashSet<&str> = partition.modules().iter().map(|m| m.name.as_str()).collect();
    let depended_on: HashSet<&str> = partition
        .modules()
        .iter()
        .flat_map(|module| module.dependencies.iter().map(String::as_str))
        .collect();

    let root_modules = partition
        .modules()
        .iter()
        .filter(|module| !module.dependencies.iter().any(|dep| known.contains(dep.as_str())))
        .count();
    let leaf_modules = partition
        .modules()
        .iter()
        .filter(|module| !depended_on.contains(module.name.as_str()))
        .count();

    let levels = build_levels(partition);
    BuildEfficiencyMetrics {
        root_modules,
        leaf_modules,
        max_parallel: levels.max_width(),
        level_count: levels.level_count(),
        critical_path_length: max_depth + 1,
        levels: levels.levels,
        blocked_modules: levels.blocked,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
