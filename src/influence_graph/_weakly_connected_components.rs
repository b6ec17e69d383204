use crate::influence_graph::InfluenceGraph;
use std::collections::{BTreeSet, HashSet};

impl InfluenceGraph {
    /// The list of all weakly connected components of this graph, discovered in
    /// ascending order of their smallest node index (so the result is
    /// deterministic for a fixed model).
    pub fn weakly_connected_components(&self) -> Vec<HashSet<usize>> {
        let mut remaining: BTreeSet<usize> = (0..self.node_count()).collect();
        let mut result = Vec::new();
        while let Some(pivot) = remaining.iter().next().copied() {
            let mut component = HashSet::from([pivot]);
            loop {
                let fwd = self.forward_reachable(component.clone());
                let bwd = self.backward_reachable(component.clone());
                if fwd.is_subset(&component) && bwd.is_subset(&component) {
                    break;
                }
                component.extend(fwd);
                component.extend(bwd);
            }
            for node in &component {
                remaining.remove(node);
            }
            result.push(component);
        }
        result
    }
}
