//! Namespace-level views over the file graph.

use std::collections::{BTreeMap, BTreeSet};

use super::build::{DependencyGraph, GraphNode};

impl DependencyGraph {
    /// Namespace of the file at `path`, if the file exists and declares one.
    #[must_use]
    pub fn namespace_of(&self, path: &str) -> Option<&str> {
        self.node(path).and_then(GraphNode::namespace)
    }

    /// Files grouped by namespace. Files without a namespace are omitted.
    ///
    /// Keys are sorted; files within a group are in path order.
    #[must_use]
    pub fn namespace_groups(&self) -> BTreeMap<&str, Vec<&GraphNode>> {
        let mut groups: BTreeMap<&str, Vec<&GraphNode>> = BTreeMap::new();
        for node in self.nodes() {
            if let Some(namespace) = node.namespace() {
                groups.entry(namespace).or_default().push(node);
            }
        }
        groups
    }

    /// Distinct `(source, target)` namespace pairs induced by resolved
    /// imports whose endpoints declare different namespaces, sorted.
    ///
    /// Edges touching a file without a namespace are ignored.
    #[must_use]
    pub fn cross_namespace_edges(&self) -> Vec<(String, String)> {
        let mut pairs: BTreeSet<(&str, &str)> = BTreeSet::new();
        for node in self.nodes() {
            let Some(source) = node.namespace() else {
                continue;
            };
            for dep in self.dependencies_of(node.path()) {
                if let Some(target) = self.namespace_of(dep).filter(|target| *target != source) {
                    pairs.insert((source, target));
                }
            }
        }
        pairs
            .into_iter()
            .map(|(source, target)| (source.to_string(), target.to_string()))
            .collect()
    }
}
