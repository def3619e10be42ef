//! Namespace-based partitioning.
//!
//! Every declared namespace becomes one module, named by a
//! [`NamingPolicy`]. A module depends on every other module that owns a file
//! one of its files imports. Files without a namespace are left unassigned;
//! validation reports them.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info, instrument};

use super::{Module, Partition, PartitionStrategy};
use crate::config::NamingConfig;
use crate::graph::DependencyGraph;
use crate::naming::{NamingPolicy, StandardNaming};

/// Strategy identifier recorded on partitions built by this strategy.
pub const STRATEGY_NAME: &str = "namespace";

/// Groups files by declared namespace.
pub struct NamespacePartitioner {
    policy: Box<dyn NamingPolicy + Send + Sync>,
}

impl Default for NamespacePartitioner {
    fn default() -> Self {
        Self::new(StandardNaming::default())
    }
}

impl std::fmt::Debug for NamespacePartitioner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamespacePartitioner").finish_non_exhaustive()
    }
}

impl NamespacePartitioner {
    #[must_use]
    pub fn new(policy: impl NamingPolicy + Send + Sync + 'static) -> Self {
        Self {
            policy: Box::new(policy),
        }
    }

    /// Partitioner using the policy selected in `[naming]`.
    #[must_use]
    pub fn from_config(config: &NamingConfig) -> Self {
        Self {
            policy: config.build_policy(),
        }
    }
}

impl PartitionStrategy for NamespacePartitioner {
    fn name(&self) -> &str {
        STRATEGY_NAME
    }

    #[instrument(skip_all, fields(files = graph.len()))]
    fn group(&self, graph: &DependencyGraph) -> Partition {
        // Two namespaces can map to the same module name; their files merge.
        let mut grouped: BTreeMap<String, (BTreeSet<String>, BTreeSet<String>)> = BTreeMap::new();

        for (namespace, nodes) in graph.namespace_groups() {
            let module_name = self.policy.module_name(namespace);
            let (files, dependencies) = grouped.entry(module_name.clone()).or_default();

            for node in nodes {
                files.insert(node.path().to_string());

                for dep in graph.dependencies_of(node.path()) {
                    let Some(dep_namespace) = graph.namespace_of(dep) else {
                        continue;
                    };
                    if dep_namespace == namespace {
                        continue;
                    }
                    let dep_module = self.policy.module_name(dep_namespace);
                    if dep_module != module_name {
                        dependencies.insert(dep_module);
                    }
                }
            }

            debug!(namespace, module = %module_name, "grouped namespace");
        }

        let modules: Vec<Module> = grouped
            .into_iter()
            .map(|(name, (files, dependencies))| Module {
                name,
                files: files.into_iter().collect(),
                dependencies,
            })
            .collect();

        let unassigned = graph
            .nodes()
            .filter(|node| node.namespace().is_none())
            .count();
        info!(
            modules = modules.len(),
            unassigned, "namespace partition built"
        );

        Partition::new(STRATEGY_NAME, modules)
    }
}
