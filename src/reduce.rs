//! The graph-rewriting pass that collapses redundant species before abstraction.
//!
//! Four rules run once each, in a fixed order, over a snapshot of the reactions
//! taken at pass start; reactions created during rewriting are not re-examined.
//! This makes the pass deterministic, confluent and terminating in `O(|R|)` per
//! rule. The model is re-normalised after every rule so that later rules (and
//! later pipeline stages) always see a consistent graph, which also makes the
//! whole pass idempotent on its own output.

use crate::{
    DeletePolicy, ModifierKind, Reaction, ReactionId, ReactionModel, ReactionType, SpeciesId,
    SpeciesType,
};

/// Run the full reduction: receptor-association collapse, complex-formation
/// merge, same-name passthrough deletion, transport merge, and finally the
/// folding of phenotype-producing reactions into modifiers.
pub fn reduce(model: &mut ReactionModel) -> Result<(), String> {
    let snapshot: Vec<ReactionId> = model.reaction_ids().collect();
    collapse_receptor_associations(model, &snapshot)?;
    model.normalize()?;
    merge_complex_formations(model, &snapshot)?;
    model.normalize()?;
    delete_same_name_passthroughs(model, &snapshot)?;
    model.normalize()?;
    merge_transport_duplicates(model, &snapshot)?;
    model.normalize()?;
    merge_phenotype_inputs(model)?;
    model.normalize()
}

/// R1: in a heterodimer association `a + b -> p` without modifiers, where exactly
/// one of `a, b` is a receptor and both occur nowhere else in the model, the
/// receptor is deleted (its annotations go to `p`) and the reaction keeps only
/// the non-receptor reactant.
fn collapse_receptor_associations(
    model: &mut ReactionModel,
    snapshot: &[ReactionId],
) -> Result<(), String> {
    for &r in snapshot {
        let reaction = match model.get_reaction(r) {
            Some(reaction) => reaction,
            None => continue,
        };
        if reaction.reaction_type != ReactionType::HeterodimerAssociation {
            continue;
        }
        if reaction.reactants.len() != 2
            || reaction.products.len() != 1
            || !reaction.modifiers.is_empty()
        {
            continue;
        }
        let (a, b) = (reaction.reactants[0], reaction.reactants[1]);
        let p = reaction.products[0];
        let receptor = match (is_receptor(model, a), is_receptor(model, b)) {
            (true, false) => a,
            (false, true) => b,
            _ => continue,
        };
        let partner = if receptor == a { b } else { a };
        if !only_reactant_in(model, receptor, r, false) {
            continue;
        }
        if !only_reactant_in(model, partner, r, false) {
            continue;
        }
        tracing::debug!(
            "deleting receptor {} that dimerizes to form {}",
            species_label(model, receptor),
            species_label(model, p)
        );
        model.transfer_annotations(receptor, p)?;
        model.delete_species(receptor, DeletePolicy::DetachReferences);
    }
    Ok(())
}

/// R2: in a heterodimer association `a + b -> p` without modifiers, where neither
/// reactant is a receptor and neither occurs anywhere else as reactant or
/// modifier, both reactants are merged into the complex `p`. Reactions that
/// produced `a` or `b` now produce `p`; the association itself keeps producing
/// `p` unconditionally.
fn merge_complex_formations(
    model: &mut ReactionModel,
    snapshot: &[ReactionId],
) -> Result<(), String> {
    for &r in snapshot {
        let reaction = match model.get_reaction(r) {
            Some(reaction) => reaction,
            None => continue,
        };
        if reaction.reaction_type != ReactionType::HeterodimerAssociation {
            continue;
        }
        if reaction.reactants.len() != 2
            || reaction.products.len() != 1
            || !reaction.modifiers.is_empty()
        {
            continue;
        }
        let (a, b) = (reaction.reactants[0], reaction.reactants[1]);
        let p = model.resolve(reaction.products[0]);
        if !model.is_live(a) || !model.is_live(b) || !model.is_live(p) {
            continue;
        }
        if is_receptor(model, a) || is_receptor(model, b) {
            continue;
        }
        if !only_reactant_in(model, a, r, true) || !only_reactant_in(model, b, r, true) {
            continue;
        }
        tracing::debug!(
            "merging {} and {} into complex {}",
            species_label(model, a),
            species_label(model, b),
            species_label(model, p)
        );
        model.transfer_annotations(a, p)?;
        model.transfer_annotations(b, p)?;
        if let Some(reaction) = model.get_reaction_mut(r) {
            reaction.reactants.clear();
        }
        model.merge_into(a, p)?;
        model.merge_into(b, p)?;
    }
    Ok(())
}

/// R3: a reaction `a -> p` where `a` occurs nowhere else in the model and has the
/// same name as `p` is a passthrough; both the reaction and `a` are deleted.
fn delete_same_name_passthroughs(
    model: &mut ReactionModel,
    snapshot: &[ReactionId],
) -> Result<(), String> {
    for &r in snapshot {
        let reaction = match model.get_reaction(r) {
            Some(reaction) => reaction,
            None => continue,
        };
        if reaction.reactants.len() != 1 || reaction.products.len() != 1 {
            continue;
        }
        let a = reaction.reactants[0];
        let p = model.resolve(reaction.products[0]);
        if a == p || !model.is_live(a) || !model.is_live(p) {
            continue;
        }
        if !same_name(model, a, p) {
            continue;
        }
        if !only_reactant_in(model, a, r, false) {
            continue;
        }
        tracing::debug!(
            "deleting passthrough {} for {}",
            species_label(model, a),
            species_label(model, p)
        );
        model.transfer_annotations(a, p)?;
        model.delete_reaction(r);
        model.delete_species(a, DeletePolicy::DetachReferences);
    }
    Ok(())
}

/// R4: a transport `a -> p` between two same-named species, where `a` is consumed
/// only here (but may be produced elsewhere), merges `a` into `p`: producers of
/// `a` are rewired to produce `p` and the transport disappears.
fn merge_transport_duplicates(
    model: &mut ReactionModel,
    snapshot: &[ReactionId],
) -> Result<(), String> {
    for &r in snapshot {
        let reaction = match model.get_reaction(r) {
            Some(reaction) => reaction,
            None => continue,
        };
        if reaction.reaction_type != ReactionType::Transport {
            continue;
        }
        if reaction.reactants.len() != 1 || reaction.products.len() != 1 {
            continue;
        }
        let a = reaction.reactants[0];
        let p = model.resolve(reaction.products[0]);
        if a == p || !model.is_live(a) || !model.is_live(p) {
            continue;
        }
        if !same_name(model, a, p) {
            continue;
        }
        if !only_reactant_in(model, a, r, true) {
            continue;
        }
        tracing::debug!(
            "merging {} into {} across transport",
            species_label(model, a),
            species_label(model, p)
        );
        model.transfer_annotations(a, p)?;
        model.delete_reaction(r);
        model.merge_into(a, p)?;
    }
    Ok(())
}

/// Fold the reactions producing a phenotype into a single reaction: each producing
/// reaction with exactly one reactant (and one product) becomes a modifier of the
/// phenotype, an inhibitor when the reaction type is negative, a catalyst
/// otherwise. Reactions with a different shape are left alone.
fn merge_phenotype_inputs(model: &mut ReactionModel) -> Result<(), String> {
    let phenotypes: Vec<SpeciesId> = model
        .species_iter()
        .filter(|(_, species)| species.species_type == SpeciesType::Phenotype)
        .map(|(id, _)| id)
        .collect();
    for y in phenotypes {
        let mut collected: Vec<(SpeciesId, ModifierKind)> = Vec::new();
        let mut converted: Vec<ReactionId> = Vec::new();
        for (r, reaction) in model.reactions_iter() {
            if reaction.products != vec![y] || reaction.reactants.len() != 1 {
                continue;
            }
            let kind = if reaction.reaction_type.is_negative_influence() {
                ModifierKind::Inhibitor
            } else {
                ModifierKind::Catalyst
            };
            collected.push((reaction.reactants[0], kind));
            collected.extend(reaction.modifiers.iter().copied());
            converted.push(r);
        }
        if collected.is_empty() {
            continue;
        }
        tracing::debug!(
            "folding {} reactions into the inputs of phenotype {}",
            converted.len(),
            species_label(model, y)
        );
        for r in converted {
            model.delete_reaction(r);
        }
        let source_id = match model.get_species(y) {
            Some(species) => species.id.clone(),
            None => continue,
        };
        let mut merged = Reaction::new(
            &format!("{}_inputs", source_id),
            ReactionType::StateTransition,
        );
        merged.products.push(y);
        merged.modifiers = collected;
        model.add_reaction(merged)?;
    }
    Ok(())
}

/// **(internal)** True if the species occurs in the model only as a reactant of
/// `r`. With `allow_products_elsewhere` it may additionally be the product of
/// other reactions (but never a reactant or modifier).
fn only_reactant_in(
    model: &ReactionModel,
    species: SpeciesId,
    r: ReactionId,
    allow_products_elsewhere: bool,
) -> bool {
    for (q, reaction) in model.reactions_iter() {
        if q == r {
            if !reaction.reactants.contains(&species) {
                return false;
            }
            continue;
        }
        if reaction.reactants.contains(&species) {
            return false;
        }
        if reaction.modifiers.iter().any(|(m, _)| *m == species) {
            return false;
        }
        if !allow_products_elsewhere && reaction.products.contains(&species) {
            return false;
        }
    }
    true
}

fn is_receptor(model: &ReactionModel, species: SpeciesId) -> bool {
    model
        .get_species(species)
        .map_or(false, |s| s.species_type == SpeciesType::Receptor)
}

fn same_name(model: &ReactionModel, left: SpeciesId, right: SpeciesId) -> bool {
    match (model.get_species(left), model.get_species(right)) {
        (Some(left), Some(right)) => left.name == right.name,
        _ => false,
    }
}

fn species_label(model: &ReactionModel, species: SpeciesId) -> String {
    model
        .get_species(species)
        .map(|s| s.id.clone())
        .unwrap_or_else(|| species.to_string())
}

#[cfg(test)]
mod tests {
    use super::reduce;
    use crate::{
        MiriamQualifier, ModifierKind, Reaction, ReactionModel, ReactionType, Species,
        SpeciesType,
    };

    fn species(model: &mut ReactionModel, id: &str, name: &str, kind: SpeciesType) {
        let mut s = Species::new(id, name);
        s.species_type = kind;
        model.add_species(s).unwrap();
    }

    #[test]
    fn receptor_collapse() {
        // L + Recv -> LR; the receptor disappears, the ligand stays a reactant.
        let mut model = ReactionModel::new();
        species(&mut model, "sa1", "L", SpeciesType::Protein);
        species(&mut model, "sa2", "Recv", SpeciesType::Receptor);
        species(&mut model, "sa3", "LR", SpeciesType::Complex);
        let l = model.find_species("sa1").unwrap();
        let recv = model.find_species("sa2").unwrap();
        let lr = model.find_species("sa3").unwrap();
        model
            .get_species_mut(recv)
            .unwrap()
            .annotations
            .insert(MiriamQualifier::Is, "urn:recv");
        let mut reaction = Reaction::new("re1", ReactionType::HeterodimerAssociation);
        reaction.reactants = vec![l, recv];
        reaction.products = vec![lr];
        let r = model.add_reaction(reaction).unwrap();

        reduce(&mut model).unwrap();

        assert!(model.is_live(l));
        assert!(!model.is_live(recv));
        assert!(model.is_live(lr));
        assert_eq!(vec![l], model.get_reaction(r).unwrap().reactants);
        assert_eq!(
            vec!["urn:recv"],
            model
                .get_species(lr)
                .unwrap()
                .annotations
                .uris(MiriamQualifier::Is)
                .to_vec()
        );
    }

    #[test]
    fn complex_formation_merges_both_reactants() {
        // A + B -> C; A and B occur nowhere else, so they merge into C and the
        // association keeps producing C from nothing.
        let mut model = ReactionModel::new();
        species(&mut model, "sa1", "A", SpeciesType::Protein);
        species(&mut model, "sa2", "B", SpeciesType::Protein);
        species(&mut model, "sa3", "C", SpeciesType::Complex);
        let a = model.find_species("sa1").unwrap();
        let b = model.find_species("sa2").unwrap();
        let c = model.find_species("sa3").unwrap();
        model
            .get_species_mut(a)
            .unwrap()
            .annotations
            .insert(MiriamQualifier::Is, "urn:a");
        model
            .get_species_mut(b)
            .unwrap()
            .annotations
            .insert(MiriamQualifier::Is, "urn:b");
        let mut reaction = Reaction::new("re1", ReactionType::HeterodimerAssociation);
        reaction.reactants = vec![a, b];
        reaction.products = vec![c];
        let r = model.add_reaction(reaction).unwrap();

        reduce(&mut model).unwrap();

        assert!(!model.is_live(a));
        assert!(!model.is_live(b));
        assert!(model.is_live(c));
        assert_eq!(1, model.num_species());
        assert!(model.get_reaction(r).unwrap().reactants.is_empty());
        assert_eq!(vec![c], model.get_reaction(r).unwrap().products);
        // Lookups through the merged source ids resolve to the complex.
        assert_eq!(Some(c), model.find_species("sa1"));
        assert_eq!(
            vec!["urn:a", "urn:b"],
            model
                .get_species(c)
                .unwrap()
                .annotations
                .uris(MiriamQualifier::Is)
                .to_vec()
        );
    }

    #[test]
    fn complex_formation_rewires_other_producers() {
        // D -> A, then A + B -> C: the producer of A must produce C afterwards.
        let mut model = ReactionModel::new();
        species(&mut model, "sa1", "A", SpeciesType::Protein);
        species(&mut model, "sa2", "B", SpeciesType::Protein);
        species(&mut model, "sa3", "C", SpeciesType::Complex);
        species(&mut model, "sa4", "D", SpeciesType::Protein);
        let a = model.find_species("sa1").unwrap();
        let b = model.find_species("sa2").unwrap();
        let c = model.find_species("sa3").unwrap();
        let d = model.find_species("sa4").unwrap();
        let mut producer = Reaction::new("re1", ReactionType::StateTransition);
        producer.reactants = vec![d];
        producer.products = vec![a];
        let producer = model.add_reaction(producer).unwrap();
        let mut association = Reaction::new("re2", ReactionType::HeterodimerAssociation);
        association.reactants = vec![a, b];
        association.products = vec![c];
        model.add_reaction(association).unwrap();

        reduce(&mut model).unwrap();

        assert_eq!(vec![c], model.get_reaction(producer).unwrap().products);
        assert!(model.check_integrity().is_ok());
    }

    #[test]
    fn same_name_passthrough_is_deleted() {
        let mut model = ReactionModel::new();
        species(&mut model, "sa1", "X", SpeciesType::Protein);
        species(&mut model, "sa2", "X", SpeciesType::Protein);
        let a = model.find_species("sa1").unwrap();
        let p = model.find_species("sa2").unwrap();
        let mut reaction = Reaction::new("re1", ReactionType::StateTransition);
        reaction.reactants = vec![a];
        reaction.products = vec![p];
        let r = model.add_reaction(reaction).unwrap();

        reduce(&mut model).unwrap();

        assert!(!model.is_live(a));
        assert!(model.is_live(p));
        assert!(model.get_reaction(r).is_none());
    }

    #[test]
    fn passthrough_requires_equal_names() {
        let mut model = ReactionModel::new();
        species(&mut model, "sa1", "X", SpeciesType::Protein);
        species(&mut model, "sa2", "Y", SpeciesType::Protein);
        let a = model.find_species("sa1").unwrap();
        let p = model.find_species("sa2").unwrap();
        let mut reaction = Reaction::new("re1", ReactionType::StateTransition);
        reaction.reactants = vec![a];
        reaction.products = vec![p];
        model.add_reaction(reaction).unwrap();

        reduce(&mut model).unwrap();
        assert_eq!(2, model.num_species());
        assert_eq!(1, model.num_reactions());
    }

    #[test]
    fn transport_merge_rewires_producers() {
        // E -> X(cytosol), X(cytosol) -(transport)-> X(nucleus):
        // the cytosolic copy disappears and E produces the nuclear one.
        let mut model = ReactionModel::new();
        species(&mut model, "sa1", "X", SpeciesType::Protein);
        species(&mut model, "sa2", "X", SpeciesType::Protein);
        species(&mut model, "sa3", "E", SpeciesType::Protein);
        let x_cyt = model.find_species("sa1").unwrap();
        let x_nuc = model.find_species("sa2").unwrap();
        let e = model.find_species("sa3").unwrap();
        let mut producer = Reaction::new("re1", ReactionType::StateTransition);
        producer.reactants = vec![e];
        producer.products = vec![x_cyt];
        let producer = model.add_reaction(producer).unwrap();
        let mut transport = Reaction::new("re2", ReactionType::Transport);
        transport.reactants = vec![x_cyt];
        transport.products = vec![x_nuc];
        let transport = model.add_reaction(transport).unwrap();

        reduce(&mut model).unwrap();

        assert!(!model.is_live(x_cyt));
        assert!(model.get_reaction(transport).is_none());
        assert_eq!(vec![x_nuc], model.get_reaction(producer).unwrap().products);
    }

    #[test]
    fn phenotype_inputs_fold_into_modifiers() {
        let mut model = ReactionModel::new();
        species(&mut model, "sa1", "Apoptosis", SpeciesType::Phenotype);
        species(&mut model, "sa2", "Casp3", SpeciesType::Protein);
        species(&mut model, "sa3", "Bcl2", SpeciesType::Protein);
        let pheno = model.find_species("sa1").unwrap();
        let casp = model.find_species("sa2").unwrap();
        let bcl = model.find_species("sa3").unwrap();
        let mut activation = Reaction::new("re1", ReactionType::PositiveInfluence);
        activation.reactants = vec![casp];
        activation.products = vec![pheno];
        model.add_reaction(activation).unwrap();
        let mut inhibition = Reaction::new("re2", ReactionType::NegativeInfluence);
        inhibition.reactants = vec![bcl];
        inhibition.products = vec![pheno];
        model.add_reaction(inhibition).unwrap();

        reduce(&mut model).unwrap();

        let producing: Vec<_> = model
            .reactions_iter()
            .filter(|(_, reaction)| reaction.products.contains(&pheno))
            .collect();
        assert_eq!(1, producing.len());
        let (_, merged) = producing[0];
        assert!(merged.reactants.is_empty());
        assert_eq!(
            vec![(casp, ModifierKind::Catalyst), (bcl, ModifierKind::Inhibitor)],
            merged.modifiers
        );
    }

    #[test]
    fn reduction_is_idempotent() {
        let mut model = ReactionModel::new();
        species(&mut model, "sa1", "A", SpeciesType::Protein);
        species(&mut model, "sa2", "B", SpeciesType::Protein);
        species(&mut model, "sa3", "C", SpeciesType::Complex);
        let a = model.find_species("sa1").unwrap();
        let b = model.find_species("sa2").unwrap();
        let c = model.find_species("sa3").unwrap();
        let mut reaction = Reaction::new("re1", ReactionType::HeterodimerAssociation);
        reaction.reactants = vec![a, b];
        reaction.products = vec![c];
        model.add_reaction(reaction).unwrap();

        reduce(&mut model).unwrap();
        let after_first: Vec<_> = model.species_ids().collect();
        let reactions_first: Vec<_> = model
            .reactions_iter()
            .map(|(_, reaction)| reaction.clone())
            .collect();
        reduce(&mut model).unwrap();
        assert_eq!(after_first, model.species_ids().collect::<Vec<_>>());
        assert_eq!(
            reactions_first,
            model
                .reactions_iter()
                .map(|(_, reaction)| reaction.clone())
                .collect::<Vec<_>>()
        );
    }
}
