//! Build ordering over a partition's module-dependency graph.
//!
//! # Edge Direction
//!
//! "A depends on B" means B must be built before A. Dependencies naming a
//! module that is not in the partition are ignored here; validation reports
//! them.
//!
//! # Definitions
//!
//! | Term    | Definition |
//! |---------|------------|
//! | `depth` | 0 for a module with no dependencies, otherwise `1 + max(depth of each dependency)`. |
//! | `level` | Wavefront of modules whose dependencies are all in earlier levels. |
//!
//! All functions are deterministic: ties are broken by module name.

#![allow(clippy::module_name_repetitions)]

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use serde::Serialize;

use crate::error::ErrorCode;
use crate::partition::{Module, Partition};

/// Failure signal from [`topological_sort`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderError {
    /// Some modules are part of, or depend on, a dependency cycle.
    #[error("module dependency cycle; unordered modules: {}", unordered.join(", "))]
    Cycle { unordered: Vec<String> },
    /// Module names are not unique, so dependencies cannot be resolved.
    #[error("duplicate module names: {}", modules.join(", "))]
    DuplicateModule { modules: Vec<String> },
}

impl OrderError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Cycle { .. } => ErrorCode::ModuleCycle,
            Self::DuplicateModule { .. } => ErrorCode::InvalidPartition,
        }
    }
}

/// Modules grouped into sequential build levels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildLevels {
    /// Each level sorted by name; level `i` only depends on levels `< i`.
    pub levels: Vec<Vec<String>>,
    /// Modules that never became buildable because of a cycle, sorted.
    pub blocked: Vec<String>,
}

impl BuildLevels {
    /// Size of the widest level.
    #[must_use]
    pub fn max_width(&self) -> usize {
        self.levels.iter().map(Vec::len).max().unwrap_or(0)
    }

    #[must_use]
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }
}

/// Order module names so every module follows all of its dependencies.
///
/// Kahn's algorithm. Among modules that are ready at the same time the
/// lexicographically smallest goes first.
///
/// # Errors
///
/// Returns [`OrderError::Cycle`] instead of a partial order when the
/// module-dependency relation contains a cycle, and
/// [`OrderError::DuplicateModule`] when two modules share a name.
pub fn topological_sort(partition: &Partition) -> Result<Vec<String>, OrderError> {
    let duplicates = partition.duplicate_module_names();
    if !duplicates.is_empty() {
        return Err(OrderError::DuplicateModule {
            modules: duplicates.into_iter().map(str::to_string).collect(),
        });
    }

    let known = module_name_set(partition);

    let mut in_degree: HashMap<&str, usize> = HashMap::with_capacity(partition.len());
    let mut dependents: HashMap<&str, Vec<&str>> = HashMap::with_capacity(partition.len());
    for module in partition.modules() {
        let deps: Vec<&str> = known_dependencies(module, &known).collect();
        in_degree.insert(module.name.as_str(), deps.len());
        for dep in deps {
            dependents.entry(dep).or_default().push(module.name.as_str());
        }
    }

    let mut ready: BTreeSet<&str> = in_degree
        .iter()
        .filter(|(_, degree)| **degree == 0)
        .map(|(name, _)| *name)
        .collect();
    let mut order: Vec<String> = Vec::with_capacity(partition.len());

    while let Some(name) = ready.pop_first() {
        order.push(name.to_string());
        for &dependent in dependents.get(name).map_or(&[][..], Vec::as_slice) {
            if let Some(degree) = in_degree.get_mut(dependent) {
                *degree -= 1;
                if *degree == 0 {
                    ready.insert(dependent);
                }
            }
        }
    }

    if order.len() < partition.len() {
        let placed: HashSet<&str> = order.iter().map(String::as_str).collect();
        let unordered = partition
            .module_names()
            .into_iter()
            .filter(|name| !placed.contains(name))
            .map(str::to_string)
            .collect();
        return Err(OrderError::Cycle { unordered });
    }

    Ok(order)
}

/// Group modules into build levels by repeatedly taking every module whose
/// dependencies have all been taken.
#[must_use]
pub fn build_levels(partition: &Partition) -> BuildLevels {
    let known = module_name_set(partition);
    let mut processed: HashSet<&str> = HashSet::with_capacity(partition.len());
    let mut remaining: Vec<&Module> = partition.modules().iter().collect();
    let mut levels: Vec<Vec<String>> = Vec::new();

    loop {
        let (ready, rest): (Vec<&Module>, Vec<&Module>) = remaining
            .into_iter()
            .partition(|module| known_dependencies(module, &known).all(|dep| processed.contains(dep)));

        if ready.is_empty() {
            remaining = rest;
            break;
        }

        // Modules arrive in name order, so each level is already sorted.
        processed.extend(ready.iter().map(|module| module.name.as_str()));
        levels.push(ready.iter().map(|module| module.name.clone()).collect());
        remaining = rest;
    }

    BuildLevels {
        levels,
        blocked: remaining.iter().map(|module| module.name.clone()).collect(),
    }
}

/// Dependency depth of every module, memoized.
///
/// Resolved with an explicit stack so deep module chains cannot overflow the
/// call stack. On a cycle, the edge back into a module that is still being
/// resolved contributes nothing, so the computation always terminates.
#[must_use]
pub fn dependency_depths(partition: &Partition) -> BTreeMap<String, usize> {
    let known = module_name_set(partition);
    let by_name: HashMap<&str, &Module> = partition
        .modules()
        .iter()
        .map(|module| (module.name.as_str(), module))
        .collect();

    let mut depth: HashMap<&str, usize> = HashMap::with_capacity(partition.len());
    let mut in_progress: HashSet<&str> = HashSet::new();

    for module in partition.modules() {
        // (module, dependencies already pushed)
        let mut stack: Vec<(&str, bool)> = vec![(module.name.as_str(), false)];

        while let Some((name, expanded)) = stack.pop() {
            let Some(current) = by_name.get(name) else {
                continue;
            };

            if expanded {
                let value = known_dependencies(current, &known)
                    .filter_map(|dep| depth.get(dep).map(|d| d + 1))
                    .max()
                    .unwrap_or(0);
                depth.insert(name, value);
                in_progress.remove(name);
                continue;
            }

            if depth.contains_key(name) || !in_progress.insert(name) {
                continue;
            }

            stack.push((name, true));
            for dep in known_dependencies(current, &known) {
                if !depth.contains_key(dep) && !in_progress.contains(dep) {
                    stack.push((dep, false));
                }
            }
        }
    }

    depth
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

fn module_name_set(partition: &Partition) -> HashSet<&str> {
    partition
        .modules()
        .iter()
        .map(|module| module.name.as_str())
        .collect()
}

fn known_dependencies<'a>(
    module: &'a Module,
    known: &'a HashSet<&'a str>,
) -> impl Iterator<Item = &'a str> + 'a {
    module
        .dependencies
        .iter()
        .map(String::as_str)
        .filter(move |dep| known.contains(dep))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
