//! Back-edge cycle detection for file and module graphs.
//!
//! Depth-first search with an explicit stack. Whenever an edge points at a
//! node that is still on the current DFS path, the slice of the path from
//! that node to the current one is recorded as a cycle. Traversal restarts
//! from every unvisited node in key order, so disconnected components are
//! covered and the output is deterministic.

#![allow(clippy::module_name_repetitions)]

use std::collections::{BTreeMap, HashMap, HashSet};

use super::build::DependencyGraph;

/// Find cycles in an adjacency map.
///
/// Neighbors that are not keys of `adjacency` are treated as nodes with no
/// outgoing edges. Each cycle is listed from the node the back-edge points at
/// to the node the back-edge leaves from, so `a → b → c → a` is reported as
/// `["a", "b", "c"]` and a self-loop on `a` as `["a"]`.
#[must_use]
pub fn find_cycles<'a>(adjacency: &BTreeMap<&'a str, Vec<&'a str>>) -> Vec<Vec<String>> {
    let mut visited: HashSet<&'a str> = HashSet::with_capacity(adjacency.len());
    let mut cycles: Vec<Vec<String>> = Vec::new();

    for &start in adjacency.keys() {
        if !visited.insert(start) {
            continue;
        }

        // Each frame is (node, index of the next neighbor to explore).
        let mut frames: Vec<(&'a str, usize)> = vec![(start, 0)];
        let mut path: Vec<&'a str> = vec![start];
        let mut on_path: HashMap<&'a str, usize> = HashMap::from([(start, 0)]);

        while let Some(frame) = frames.last_mut() {
            let (node, next_idx) = *frame;
            let next = adjacency
                .get(node)
                .and_then(|neighbors| neighbors.get(next_idx))
                .copied();

            if let Some(target) = next {
                frame.1 += 1;
                if let Some(&pos) = on_path.get(target) {
                    cycles.push(path[pos..].iter().map(|id| (*id).to_string()).collect());
                } else if visited.insert(target) {
                    on_path.insert(target, path.len());
                    path.push(target);
                    frames.push((target, 0));
                }
            } else {
                frames.pop();
                path.pop();
                on_path.remove(node);
            }
        }
    }

    cycles
}

impl DependencyGraph {
    /// Import cycles between files. Empty when the file graph is acyclic.
    #[must_use]
    pub fn detect_cycles(&self) -> Vec<Vec<String>> {
        let adjacency: BTreeMap<&str, Vec<&str>> = self
            .nodes()
            .map(|node| {
                let deps = self
                    .dependencies_of(node.path())
                    .iter()
                    .map(String::as_str)
                    .collect();
                (node.path(), deps)
            })
            .collect();
        find_cycles(&adjacency)
    }
}
