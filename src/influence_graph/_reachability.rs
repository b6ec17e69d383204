use crate::influence_graph::InfluenceGraph;
use crate::Sign;
use std::collections::HashSet;

impl InfluenceGraph {
    /// Return the set of nodes forward-reachable from the `initial` set
    /// (signs are ignored; the initial set is part of the result).
    pub fn forward_reachable(&self, initial: HashSet<usize>) -> HashSet<usize> {
        reachability(&self.successors, initial)
    }

    /// Return the set of nodes backward-reachable from the `initial` set.
    pub fn backward_reachable(&self, initial: HashSet<usize>) -> HashSet<usize> {
        reachability(&self.predecessors, initial)
    }
}

/// **(internal)** A shared utility method that implements either forward or
/// backward reachability depending on the supplied edge relation.
fn reachability(edges: &[Vec<(usize, Sign)>], initial: HashSet<usize>) -> HashSet<usize> {
    let mut result = initial;
    let mut frontier = result.clone();
    while !frontier.is_empty() {
        let mut new_frontier = HashSet::new();
        for x in frontier {
            for (step, _) in &edges[x] {
                if !result.contains(step) {
                    result.insert(*step);
                    new_frontier.insert(*step);
                }
            }
        }
        frontier = new_frontier;
    }
    result
}
