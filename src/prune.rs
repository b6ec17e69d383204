//! Topology-based pruning of the compiled model: a connected-component size
//! filter followed by optional upstream/downstream influence cones.
//!
//! Pruning runs after the rules are built, so a dropped species may still be
//! mentioned by a surviving formula; every such occurrence is replaced by the
//! constant `false` (an upstream that is no longer modelled cannot activate)
//! and cleaned up by the later simplification stage.

use crate::influence_graph::InfluenceGraph;
use crate::{abstraction, DeletePolicy, ReactionModel, SpeciesId};
use std::collections::HashSet;

/// Apply the component filter and the influence cones to the model.
///
/// `component_threshold` follows the CLI convention: `S > 0` drops every weakly
/// connected component with fewer than `S` species, `S < 0` keeps only the `|S|`
/// largest components (ties broken by the lexicographically smallest source
/// species id), `S = 0` disables the filter. `upstream`/`downstream` are sets of
/// biological names; species without a directed influence path to (respectively
/// from) one of them are dropped. Unknown names produce warnings.
pub fn prune(
    model: &mut ReactionModel,
    component_threshold: i32,
    upstream: &[String],
    downstream: &[String],
    warnings: &mut Vec<String>,
) {
    if component_threshold != 0 {
        filter_components(model, component_threshold);
    }
    if !upstream.is_empty() || !downstream.is_empty() {
        restrict_to_cones(model, upstream, downstream, warnings);
    }
}

/// **(internal)** The connected-component size filter.
fn filter_components(model: &mut ReactionModel, threshold: i32) {
    let influences = abstraction::influences(model);
    let graph = InfluenceGraph::build(model, &influences);
    let components = graph.weakly_connected_components();

    let doomed: Vec<HashSet<usize>> = if threshold > 0 {
        components
            .into_iter()
            .filter(|component| component.len() < threshold as usize)
            .collect()
    } else {
        // Keep the |threshold| largest components. Sort by descending size,
        // breaking ties by the smallest source id occurring in the component.
        let keep = threshold.unsigned_abs() as usize;
        let mut ranked: Vec<(usize, String, HashSet<usize>)> = components
            .into_iter()
            .map(|component| {
                let min_id = component
                    .iter()
                    .map(|node| graph.species_at(*node))
                    .filter_map(|species| model.get_species(species))
                    .map(|species| species.id.clone())
                    .min()
                    .unwrap_or_default();
                (component.len(), min_id, component)
            })
            .collect();
        ranked.sort_by(|(size_a, id_a, _), (size_b, id_b, _)| {
            size_b.cmp(size_a).then_with(|| id_a.cmp(id_b))
        });
        ranked
            .into_iter()
            .skip(keep)
            .map(|(_, _, component)| component)
            .collect()
    };

    let mut dropped: Vec<SpeciesId> = doomed
        .iter()
        .flat_map(|component| component.iter().map(|node| graph.species_at(*node)))
        .collect();
    dropped.sort();
    tracing::debug!(
        "component filter ({}) drops {} species",
        threshold,
        dropped.len()
    );
    delete_species_set(model, &dropped);
}

/// **(internal)** Keep only the union of the requested influence cones.
fn restrict_to_cones(
    model: &mut ReactionModel,
    upstream: &[String],
    downstream: &[String],
    warnings: &mut Vec<String>,
) {
    let influences = abstraction::influences(model);
    let graph = InfluenceGraph::build(model, &influences);

    let mut keep: HashSet<usize> = HashSet::new();
    // Species with a path *to* an upstream target are backward-reachable from it.
    for name in upstream {
        match seed_nodes(model, &graph, name) {
            Some(seeds) => keep.extend(graph.backward_reachable(seeds)),
            None => warnings.push(format!("{} was not found, maybe it is ambiguous…", name)),
        }
    }
    for name in downstream {
        match seed_nodes(model, &graph, name) {
            Some(seeds) => keep.extend(graph.forward_reachable(seeds)),
            None => warnings.push(format!("{} was not found, maybe it is ambiguous…", name)),
        }
    }

    let mut dropped: Vec<SpeciesId> = (0..graph.node_count())
        .filter(|node| !keep.contains(node))
        .map(|node| graph.species_at(node))
        .collect();
    dropped.sort();
    tracing::debug!("influence cones drop {} species", dropped.len());
    delete_species_set(model, &dropped);
}

/// **(internal)** All nodes whose species carries the given biological name.
fn seed_nodes(model: &ReactionModel, graph: &InfluenceGraph, name: &str) -> Option<HashSet<usize>> {
    let seeds: HashSet<usize> = model
        .species_by_name(name)
        .into_iter()
        .filter_map(|species| graph.index_of(species))
        .collect();
    if seeds.is_empty() {
        None
    } else {
        Some(seeds)
    }
}

/// **(internal)** Delete the given species, drop reactions that no longer produce
/// anything, and replace every reference to a dropped species inside a surviving
/// formula by `false`.
fn delete_species_set(model: &mut ReactionModel, dropped: &[SpeciesId]) {
    if dropped.is_empty() {
        return;
    }
    for &species in dropped {
        model.delete_species(species, DeletePolicy::DetachReferences);
    }
    let empty: Vec<_> = model
        .reactions_iter()
        .filter(|(_, reaction)| reaction.products.is_empty())
        .map(|(id, _)| id)
        .collect();
    for reaction in empty {
        model.delete_reaction(reaction);
    }

    let dropped_set: HashSet<SpeciesId> = dropped.iter().copied().collect();
    let survivors: Vec<SpeciesId> = model.species_ids().collect();
    for species in survivors {
        if let Some(species) = model.get_species_mut(species) {
            if let Some(function) = species.function.take() {
                species.function = Some(function.replace_with_const(&dropped_set, false));
            }
        }
    }
}
