//! Partition correctness checks.
//!
//! Errors make a partition unusable for build-file generation; warnings are
//! observations a human may want to act on. Validation never fails: it
//! always returns a [`ValidationReport`].
//!
//! | Check                  | Severity |
//! |------------------------|----------|
//! | every file assigned    | error    |
//! | module names unique    | error    |
//! | no file assigned twice | error    |
//! | module graph acyclic   | error    |
//! | dependencies resolve   | error    |
//! | imports satisfied      | error    |
//! | empty module           | warning  |
//! | isolated module        | warning  |
//! | file not in graph      | warning  |
//! | unresolved import      | warning (optional) |

#![allow(clippy::module_name_repetitions)]

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;

use serde::Serialize;

use crate::graph::{DependencyGraph, find_cycles};
use crate::partition::Partition;

// ---------------------------------------------------------------------------
// Issues
// ---------------------------------------------------------------------------

/// A violation that makes the partition invalid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    /// A graph file belongs to no module.
    UnassignedFile { path: String },
    /// More than one module carries this name.
    DuplicateModuleName { module: String, count: usize },
    /// A file is listed by more than one module.
    DuplicateAssignment { path: String, modules: Vec<String> },
    /// The declared module dependencies form a cycle.
    ModuleCycle { modules: Vec<String> },
    /// A declared dependency names a module that does not exist.
    UnresolvedDependency { module: String, dependency: String },
    /// A file imports a file owned by a module its module does not depend on.
    UnsatisfiedImport {
        module: String,
        file: String,
        import: String,
        owner: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnassignedFile { path } => {
                write!(f, "file '{path}' is not assigned to any module")
            }
            Self::DuplicateModuleName { module, count } => {
                write!(f, "module name '{module}' is used by {count} modules")
            }
            Self::DuplicateAssignment { path, modules } => write!(
                f,
                "file '{path}' exists in multiple modules: {}",
                modules.join(", ")
            ),
            Self::ModuleCycle { modules } => {
                let mut chain = modules.clone();
                if let Some(first) = modules.first() {
                    chain.push(first.clone());
                }
                write!(f, "circular module dependency: {}", chain.join(" -> "))
            }
            Self::UnresolvedDependency { module, dependency } => write!(
                f,
                "module '{module}' depends on unknown module '{dependency}'"
            ),
            Self::UnsatisfiedImport {
                module,
                file,
                import,
                owner,
            } => write!(
                f,
                "module '{module}': '{file}' imports '{import}' from module '{owner}', \
                 which is not a declared dependency"
            ),
        }
    }
}

/// A non-fatal observation about the partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationWarning {
    /// A module owns no files.
    EmptyModule { module: String },
    /// A module has no dependencies and no dependents.
    IsolatedModule { module: String },
    /// A module lists a file the graph does not know.
    UnknownFile { module: String, path: String },
    /// An import matched no file and no builtin prefix.
    UnresolvedImport { file: String, import: String },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyModule { module } => write!(f, "module '{module}' has no files"),
            Self::IsolatedModule { module } => write!(
                f,
                "module '{module}' has no dependencies and no dependents"
            ),
            Self::UnknownFile { module, path } => write!(
                f,
                "module '{module}' lists '{path}', which is not in the schema graph"
            ),
            Self::UnresolvedImport { file, import } => {
                write!(f, "'{file}' imports unknown schema '{import}'")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Outcome of [`validate_partition`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    is_valid: bool,
    errors: Vec<ValidationError>,
    warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    #[must_use]
    pub fn new(errors: Vec<ValidationError>, warnings: Vec<ValidationWarning>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    /// `true` when no errors were found. Warnings do not count.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.is_valid
    }

    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    #[must_use]
    pub fn warnings(&self) -> &[ValidationWarning] {
        &self.warnings
    }
}

// ---------------------------------------------------------------------------
// Checks
// ---------------------------------------------------------------------------

/// Check `partition` against `graph`.
///
/// With `warn_unresolved`, every unresolved non-builtin import in the graph
/// is appended as a warning.
#[must_use]
pub fn validate_partition(
    partition: &Partition,
    graph: &DependencyGraph,
    warn_unresolved: bool,
) -> ValidationReport {
    let owners = owners_by_path(partition);
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    check_completeness(graph, &owners, &mut errors);
    check_module_names(partition, &mut errors);
    check_uniqueness(&owners, &mut errors);
    check_module_cycles(partition, &mut errors);
    check_dependency_names(partition, &mut errors);
    check_imports(partition, graph, &owners, &mut errors);

    check_empty_and_isolated(partition, &mut warnings);
    check_unknown_files(partition, graph, &mut warnings);
    if warn_unresolved {
        warnings.extend(graph.unresolved_imports().iter().map(|unresolved| {
            ValidationWarning::UnresolvedImport {
                file: unresolved.importer.clone(),
                import: unresolved.import.clone(),
            }
        }));
    }

    ValidationReport::new(errors, warnings)
}

/// Every module listing each path, in module-name order.
///
/// One entry per module, so two modules sharing a name both appear.
fn owners_by_path(partition: &Partition) -> BTreeMap<&str, Vec<&str>> {
    let mut owners: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for module in partition.modules() {
        let files: BTreeSet<&str> = module.files.iter().map(String::as_str).collect();
        for path in files {
            owners.entry(path).or_default().push(module.name.as_str());
        }
    }
    owners
}

fn check_module_names(partition: &Partition, errors: &mut Vec<ValidationError>) {
    for name in partition.duplicate_module_names() {
        errors.push(ValidationError::DuplicateModuleName {
            module: name.to_string(),
            count: partition
                .modules()
                .iter()
                .filter(|module| module.name == name)
                .count(),
        });
    }
}

fn check_completeness(
    graph: &DependencyGraph,
    owners: &BTreeMap<&str, Vec<&str>>,
    errors: &mut Vec<ValidationError>,
) {
    for path in graph.paths() {
        if !owners.contains_key(path) {
            errors.push(ValidationError::UnassignedFile {
                path: path.to_string(),
            });
        }
    }
}

fn check_uniqueness(owners: &BTreeMap<&str, Vec<&str>>, errors: &mut Vec<ValidationError>) {
    for (path, modules) in owners {
        if modules.len() > 1 {
            errors.push(ValidationError::DuplicateAssignment {
                path: (*path).to_string(),
                modules: modules.iter().map(|m| (*m).to_string()).collect(),
            });
        }
    }
}

fn check_module_cycles(partition: &Partition, errors: &mut Vec<ValidationError>) {
    // Same-named modules share a node, so their dependencies are merged.
    let mut adjacency: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for module in partition.modules() {
        let deps = adjacency.entry(module.name.as_str()).or_default();
        for dep in &module.dependencies {
            if !deps.contains(&dep.as_str()) {
                deps.push(dep.as_str());
            }
        }
    }

    errors.extend(
        find_cycles(&adjacency)
            .into_iter()
            .map(|modules| ValidationError::ModuleCycle { modules }),
    );
}

fn check_dependency_names(partition: &Partition, errors: &mut Vec<ValidationError>) {
    for module in partition.modules() {
        for dependency in &module.dependencies {
            if partition.module(dependency).is_none() {
                errors.push(ValidationError::UnresolvedDependency {
                    module: module.name.clone(),
                    dependency: dependency.clone(),
                });
            }
        }
    }
}

fn check_imports(
    partition: &Partition,
    graph: &DependencyGraph,
    owners: &BTreeMap<&str, Vec<&str>>,
    errors: &mut Vec<ValidationError>,
) {
    for module in partition.modules() {
        let mut reported: HashSet<(&str, &str)> = HashSet::new();
        for file in &module.files {
            for import in graph.dependencies_of(file) {
                // Unassigned targets are already reported by completeness.
                let Some(import_owners) = owners.get(import.as_str()) else {
                    continue;
                };
                let satisfied = import_owners
                    .iter()
                    .any(|owner| *owner == module.name || module.depends_on(owner));
                if satisfied || !reported.insert((file.as_str(), import.as_str())) {
                    continue;
                }
                errors.push(ValidationError::UnsatisfiedImport {
                    module: module.name.clone(),
                    file: file.clone(),
                    import: import.clone(),
                    owner: import_owners.first().map(|o| (*o).to_string()).unwrap_or_default(),
                });
            }
        }
    }
}

fn check_empty_and_isolated(partition: &Partition, warnings: &mut Vec<ValidationWarning>) {
    let depended_on: BTreeSet<&str> = partition
        .modules()
        .iter()
        .flat_map(|module| module.dependencies.iter().map(String::as_str))
        .collect();

    for module in partition.modules() {
        if module.files.is_empty() {
            warnings.push(ValidationWarning::EmptyModule {
                module: module.name.clone(),
            });
        }
    }
    for module in partition.modules() {
        if module.dependencies.is_empty() && !depended_on.contains(module.name.as_str()) {
            warnings.push(ValidationWarning::IsolatedModule {
                module: module.name.clone(),
            });
        }
    }
}

fn check_unknown_files(
    partition: &Partition,
    graph: &DependencyGraph,
    warnings: &mut Vec<ValidationWarning>,
) {
    let mut seen: HashSet<&str> = HashSet::new();
    for module in partition.modules() {
        for path in &module.files {
            if !graph.contains(path) && seen.insert(path.as_str()) {
                warnings.push(ValidationWarning::UnknownFile {
                    module: module.name.clone(),
                    path: path.clone(),
                });
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
