//! A dense representation of the signed influence digraph over the surviving
//! species of a model, used by the pruning stage.
//!
//! Species handles are sparse after reduction, so the graph compacts the live
//! species into consecutive node indices (ascending handle order, which keeps
//! every derived iteration deterministic).

use crate::{Influence, ReactionModel, Sign, SpeciesId};
use std::collections::HashMap;

/// **(internal)** Breadth-first reachability closures.
mod _reachability;

/// **(internal)** Decomposition into weakly connected components.
mod _weakly_connected_components;

/// A signed directed graph over the live species of a `ReactionModel`.
#[derive(Clone, Debug)]
pub struct InfluenceGraph {
    nodes: Vec<SpeciesId>,
    index: HashMap<SpeciesId, usize>,
    successors: Vec<Vec<(usize, Sign)>>,
    predecessors: Vec<Vec<(usize, Sign)>>,
}

impl InfluenceGraph {
    /// Build the graph of the given influences. Arcs whose endpoints are not
    /// live species of the model are skipped.
    pub fn build(model: &ReactionModel, influences: &[Influence]) -> InfluenceGraph {
        let nodes: Vec<SpeciesId> = model.species_ids().collect();
        let index: HashMap<SpeciesId, usize> = nodes
            .iter()
            .enumerate()
            .map(|(index, id)| (*id, index))
            .collect();
        let mut successors = vec![Vec::new(); nodes.len()];
        let mut predecessors = vec![Vec::new(); nodes.len()];
        for arc in influences {
            let source = match index.get(&arc.source) {
                Some(source) => *source,
                None => continue,
            };
            let target = match index.get(&arc.target) {
                Some(target) => *target,
                None => continue,
            };
            successors[source].push((target, arc.sign));
            predecessors[target].push((source, arc.sign));
        }
        InfluenceGraph {
            nodes,
            index,
            successors,
            predecessors,
        }
    }

    /// Number of nodes (live species) in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The species behind a node index.
    pub fn species_at(&self, node: usize) -> SpeciesId {
        self.nodes[node]
    }

    /// The node index of a species, if it is part of the graph.
    pub fn index_of(&self, species: SpeciesId) -> Option<usize> {
        self.index.get(&species).copied()
    }
}
