use crate::{
    AnnotationBag, DeletePolicy, LayoutBox, Reaction, ReactionId, ReactionModel, ReactionType,
    Species, SpeciesId, SpeciesType,
};
use std::collections::HashMap;

impl Species {
    /// Create a species with the given source id and biological name; every other
    /// attribute starts from its default and can be filled in field by field.
    pub fn new(id: &str, name: &str) -> Species {
        Species {
            id: id.to_string(),
            name: name.to_string(),
            compartment: "default_compartment".to_string(),
            species_type: SpeciesType::Protein,
            modifications: Vec::new(),
            layout: LayoutBox::default(),
            annotations: AnnotationBag::new(),
            function: None,
            fixed_value: None,
            sid: None,
        }
    }
}

impl Reaction {
    /// Create an empty reaction of the given type.
    pub fn new(id: &str, reaction_type: ReactionType) -> Reaction {
        Reaction {
            id: id.to_string(),
            reaction_type,
            reactants: Vec::new(),
            products: Vec::new(),
            modifiers: Vec::new(),
        }
    }
}

/// Methods for building and querying the hypergraph.
impl ReactionModel {
    /// Create a new empty model.
    pub fn new() -> ReactionModel {
        ReactionModel::default()
    }

    /// Add a species to the model. Returns `Err` if the source id is already taken.
    pub fn add_species(&mut self, species: Species) -> Result<SpeciesId, String> {
        if self.species_index.contains_key(&species.id) {
            return Err(format!("Duplicate species id `{}`.", species.id));
        }
        let id = SpeciesId(self.species.len());
        self.species_index.insert(species.id.clone(), id);
        self.species.push(Some(species));
        Ok(id)
    }

    /// Add a reaction to the model. Every referenced handle is resolved through
    /// the forwarding map and must point to a live species; the role lists are
    /// deduplicated and made pairwise disjoint (reactant wins over product,
    /// product over modifier).
    pub fn add_reaction(&mut self, mut reaction: Reaction) -> Result<ReactionId, String> {
        for list in [&mut reaction.reactants, &mut reaction.products] {
            for id in list.iter_mut() {
                *id = chase(&self.forwarded, *id);
            }
        }
        for (id, _) in reaction.modifiers.iter_mut() {
            *id = chase(&self.forwarded, *id);
        }
        for id in reaction
            .reactants
            .iter()
            .chain(reaction.products.iter())
            .chain(reaction.modifiers.iter().map(|(id, _)| id))
        {
            if !self.is_live(*id) {
                return Err(format!(
                    "Reaction `{}` references unknown species {}.",
                    reaction.id, id
                ));
            }
        }
        enforce_role_priority(&mut reaction);
        let id = ReactionId(self.reactions.len());
        self.reactions.push(Some(reaction));
        Ok(id)
    }

    /// True if the handle points to a species that has not been deleted or merged.
    pub fn is_live(&self, id: SpeciesId) -> bool {
        self.species.get(id.0).map_or(false, |slot| slot.is_some())
    }

    /// Chase the union-find-style forwarding map: the handle of the species that
    /// `id` was (transitively) merged into, or `id` itself.
    pub fn resolve(&self, id: SpeciesId) -> SpeciesId {
        chase(&self.forwarded, id)
    }

    pub fn get_species(&self, id: SpeciesId) -> Option<&Species> {
        self.species.get(id.0).and_then(|slot| slot.as_ref())
    }

    pub fn get_species_mut(&mut self, id: SpeciesId) -> Option<&mut Species> {
        self.species.get_mut(id.0).and_then(|slot| slot.as_mut())
    }

    pub fn get_reaction(&self, id: ReactionId) -> Option<&Reaction> {
        self.reactions.get(id.0).and_then(|slot| slot.as_ref())
    }

    pub fn get_reaction_mut(&mut self, id: ReactionId) -> Option<&mut Reaction> {
        self.reactions.get_mut(id.0).and_then(|slot| slot.as_mut())
    }

    /// Look up a species by its source id, chasing merge redirections: a source id
    /// that was merged away resolves to the species it was merged into.
    pub fn find_species(&self, source_id: &str) -> Option<SpeciesId> {
        let id = chase(&self.forwarded, *self.species_index.get(source_id)?);
        if self.is_live(id) {
            Some(id)
        } else {
            None
        }
    }

    /// All live species whose current name equals `name`, in ascending handle order.
    pub fn species_by_name(&self, name: &str) -> Vec<SpeciesId> {
        self.species_iter()
            .filter(|(_, species)| species.name == name)
            .map(|(id, _)| id)
            .collect()
    }

    /// Iterate over live species handles in ascending order.
    pub fn species_ids(&self) -> impl Iterator<Item = SpeciesId> + '_ {
        self.species
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(index, _)| SpeciesId(index))
    }

    /// Iterate over live species together with their handles, in ascending order.
    pub fn species_iter(&self) -> impl Iterator<Item = (SpeciesId, &Species)> {
        self.species
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|species| (SpeciesId(index), species)))
    }

    /// Iterate over live reaction handles in ascending order.
    pub fn reaction_ids(&self) -> impl Iterator<Item = ReactionId> + '_ {
        self.reactions
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(index, _)| ReactionId(index))
    }

    /// Iterate over live reactions together with their handles, in ascending order.
    pub fn reactions_iter(&self) -> impl Iterator<Item = (ReactionId, &Reaction)> {
        self.reactions
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|reaction| (ReactionId(index), reaction)))
    }

    /// Number of live species.
    pub fn num_species(&self) -> usize {
        self.species.iter().filter(|slot| slot.is_some()).count()
    }

    /// Number of live reactions.
    pub fn num_reactions(&self) -> usize {
        self.reactions.iter().filter(|slot| slot.is_some()).count()
    }

    /// Delete a species. The policy decides what happens to the reactions that
    /// reference it: they are either deleted as well, or the reference is removed.
    /// No forwarding is recorded; use `merge_into` for merges.
    pub fn delete_species(&mut self, id: SpeciesId, policy: DeletePolicy) {
        match policy {
            DeletePolicy::DropReactions => {
                for slot in self.reactions.iter_mut() {
                    let references = match slot {
                        Some(reaction) => {
                            reaction.reactants.contains(&id)
                                || reaction.products.contains(&id)
                                || reaction.modifiers.iter().any(|(m, _)| *m == id)
                        }
                        None => false,
                    };
                    if references {
                        *slot = None;
                    }
                }
            }
            DeletePolicy::DetachReferences => {
                for slot in self.reactions.iter_mut() {
                    if let Some(reaction) = slot {
                        reaction.reactants.retain(|r| *r != id);
                        reaction.products.retain(|p| *p != id);
                        reaction.modifiers.retain(|(m, _)| *m != id);
                    }
                }
            }
        }
        if let Some(slot) = self.species.get_mut(id.0) {
            *slot = None;
        }
    }

    /// Delete a reaction, leaving its species untouched.
    pub fn delete_reaction(&mut self, id: ReactionId) {
        if let Some(slot) = self.reactions.get_mut(id.0) {
            *slot = None;
        }
    }

    /// Move all annotations of `from` into `into` (the bag union of §`AnnotationBag`).
    /// The transfer fails if `into` has been merged away or either side is unknown;
    /// callers must chase forwardings first.
    pub fn transfer_annotations(&mut self, from: SpeciesId, into: SpeciesId) -> Result<(), String> {
        if self.forwarded.contains_key(&into) {
            return Err(format!(
                "Cannot transfer annotations into {}: it was merged away.",
                into
            ));
        }
        let bag = match self.get_species(from) {
            Some(species) => species.annotations.clone(),
            None => return Err(format!("Cannot transfer annotations from dead {}.", from)),
        };
        match self.get_species_mut(into) {
            Some(species) => {
                species.annotations.merge_from(&bag);
                Ok(())
            }
            None => Err(format!("Cannot transfer annotations into dead {}.", into)),
        }
    }

    /// Mark `from` as merged into `into`: the slot of `from` is cleared and a
    /// redirection is recorded so that later references resolve to `into`.
    /// Reaction references are rewired lazily by `normalize`.
    pub fn merge_into(&mut self, from: SpeciesId, into: SpeciesId) -> Result<(), String> {
        if from == into {
            return Err(format!("Cannot merge {} into itself.", from));
        }
        if self.forwarded.contains_key(&into) || !self.is_live(into) {
            return Err(format!("Cannot merge into dead species {}.", into));
        }
        if !self.is_live(from) {
            return Err(format!("Cannot merge dead species {}.", from));
        }
        self.forwarded.insert(from, into);
        self.species[from.0] = None;
        Ok(())
    }

    /// Rewrite every reaction reference through the forwarding map, deduplicate,
    /// and re-establish pairwise disjointness of the role lists. A reference to a
    /// species that is dead and was never forwarded is a dangling reference and
    /// reported as an error.
    pub fn normalize(&mut self) -> Result<(), String> {
        let ReactionModel {
            species,
            reactions,
            forwarded,
            ..
        } = self;
        for slot in reactions.iter_mut() {
            let reaction = match slot {
                Some(reaction) => reaction,
                None => continue,
            };
            for list in [&mut reaction.reactants, &mut reaction.products] {
                for id in list.iter_mut() {
                    *id = chase(forwarded, *id);
                    if species.get(id.0).map_or(true, |slot| slot.is_none()) {
                        return Err(format!(
                            "Reaction `{}` references deleted species {}.",
                            reaction.id, id
                        ));
                    }
                }
            }
            for (id, _) in reaction.modifiers.iter_mut() {
                *id = chase(forwarded, *id);
                if species.get(id.0).map_or(true, |slot| slot.is_none()) {
                    return Err(format!(
                        "Reaction `{}` references deleted species {}.",
                        reaction.id, id
                    ));
                }
            }
            enforce_role_priority(reaction);
        }
        Ok(())
    }

    /// Validate the referential invariants without mutating anything: every
    /// reaction reference must be live and the role lists pairwise disjoint,
    /// and every formula may only mention live species.
    pub fn check_integrity(&self) -> Result<(), String> {
        for (_, reaction) in self.reactions_iter() {
            for id in reaction
                .reactants
                .iter()
                .chain(reaction.products.iter())
                .chain(reaction.modifiers.iter().map(|(id, _)| id))
            {
                if !self.is_live(*id) {
                    return Err(format!(
                        "Reaction `{}` references deleted species {}.",
                        reaction.id, id
                    ));
                }
            }
            for product in &reaction.products {
                if reaction.reactants.contains(product) {
                    return Err(format!(
                        "Reaction `{}` lists {} as both reactant and product.",
                        reaction.id, product
                    ));
                }
            }
            for (modifier, _) in &reaction.modifiers {
                if reaction.reactants.contains(modifier) || reaction.products.contains(modifier) {
                    return Err(format!(
                        "Reaction `{}` lists {} as modifier and reactant/product.",
                        reaction.id, modifier
                    ));
                }
            }
        }
        for (id, species) in self.species_iter() {
            if let Some(function) = &species.function {
                for used in function.collect_species() {
                    if !self.is_live(used) {
                        return Err(format!(
                            "Formula of species `{}` ({}) mentions deleted species {}.",
                            species.id, id, used
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

/// **(internal)** Chase the forwarding map until a handle that was never merged.
fn chase(forwarded: &HashMap<SpeciesId, SpeciesId>, mut id: SpeciesId) -> SpeciesId {
    while let Some(next) = forwarded.get(&id) {
        id = *next;
    }
    id
}

/// **(internal)** Deduplicate the role lists of a reaction and make them pairwise
/// disjoint. When one species ends up in several roles the reactant role wins,
/// then product, then modifier.
fn enforce_role_priority(reaction: &mut Reaction) {
    let Reaction {
        reactants,
        products,
        modifiers,
        ..
    } = reaction;
    dedup_in_place(reactants);
    products.retain(|p| !reactants.contains(p));
    dedup_in_place(products);
    modifiers.retain(|(m, _)| !reactants.contains(m) && !products.contains(m));
    let mut seen: Vec<(SpeciesId, crate::ModifierKind)> = Vec::new();
    modifiers.retain(|entry| {
        if seen.contains(entry) {
            false
        } else {
            seen.push(*entry);
            true
        }
    });
}

/// **(internal)** Remove duplicate handles, keeping the first occurrence.
fn dedup_in_place(list: &mut Vec<SpeciesId>) {
    let mut seen = Vec::new();
    list.retain(|id| {
        if seen.contains(id) {
            false
        } else {
            seen.push(*id);
            true
        }
    });
}

#[cfg(test)]
mod tests {
    use crate::{
        DeletePolicy, MiriamQualifier, Reaction, ReactionModel, ReactionType, Species,
    };

    fn two_species_model() -> ReactionModel {
        let mut model = ReactionModel::new();
        model.add_species(Species::new("sa1", "A")).unwrap();
        model.add_species(Species::new("sa2", "B")).unwrap();
        model
    }

    #[test]
    fn duplicate_source_ids_are_rejected() {
        let mut model = two_species_model();
        assert!(model.add_species(Species::new("sa1", "A2")).is_err());
    }

    #[test]
    fn add_reaction_validates_references() {
        let mut model = two_species_model();
        let a = model.find_species("sa1").unwrap();
        let b = model.find_species("sa2").unwrap();
        let mut reaction = Reaction::new("re1", ReactionType::StateTransition);
        reaction.reactants.push(a);
        reaction.products.push(b);
        assert!(model.add_reaction(reaction).is_ok());

        let mut model = two_species_model();
        let a = model.find_species("sa1").unwrap();
        model.delete_species(a, DeletePolicy::DetachReferences);
        let mut reaction = Reaction::new("re2", ReactionType::StateTransition);
        reaction.reactants.push(a);
        assert!(model.add_reaction(reaction).is_err());
    }

    #[test]
    fn role_priority_keeps_reactant() {
        let mut model = two_species_model();
        let a = model.find_species("sa1").unwrap();
        let b = model.find_species("sa2").unwrap();
        let mut reaction = Reaction::new("re1", ReactionType::StateTransition);
        reaction.reactants.push(a);
        reaction.products.push(a);
        reaction.products.push(b);
        reaction.modifiers.push((b, crate::ModifierKind::Catalyst));
        let id = model.add_reaction(reaction).unwrap();
        let stored = model.get_reaction(id).unwrap();
        assert_eq!(vec![a], stored.reactants);
        assert_eq!(vec![b], stored.products);
        assert!(stored.modifiers.is_empty());
    }

    #[test]
    fn merge_forwards_lookups_and_normalize_rewires() {
        let mut model = two_species_model();
        let a = model.find_species("sa1").unwrap();
        let b = model.find_species("sa2").unwrap();
        let c = model.add_species(Species::new("sa3", "C")).unwrap();
        let mut reaction = Reaction::new("re1", ReactionType::StateTransition);
        reaction.reactants.push(c);
        reaction.products.push(a);
        let r = model.add_reaction(reaction).unwrap();

        model.merge_into(a, b).unwrap();
        assert_eq!(Some(b), model.find_species("sa1"));
        assert!(!model.is_live(a));

        model.normalize().unwrap();
        assert_eq!(vec![b], model.get_reaction(r).unwrap().products);
        assert!(model.check_integrity().is_ok());
    }

    #[test]
    fn merge_into_merged_target_fails() {
        let mut model = two_species_model();
        let a = model.find_species("sa1").unwrap();
        let b = model.find_species("sa2").unwrap();
        let c = model.add_species(Species::new("sa3", "C")).unwrap();
        model.merge_into(a, b).unwrap();
        assert!(model.merge_into(c, a).is_err());
        assert!(model.transfer_annotations(c, a).is_err());
    }

    #[test]
    fn annotation_transfer_merges_bags() {
        let mut model = two_species_model();
        let a = model.find_species("sa1").unwrap();
        let b = model.find_species("sa2").unwrap();
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
        model.transfer_annotations(a, b).unwrap();
        assert_eq!(
            vec!["urn:b", "urn:a"],
            model
                .get_species(b)
                .unwrap()
                .annotations
                .uris(MiriamQualifier::Is)
                .to_vec()
        );
    }

    #[test]
    fn delete_policies() {
        let mut model = two_species_model();
        let a = model.find_species("sa1").unwrap();
        let b = model.find_species("sa2").unwrap();
        let mut reaction = Reaction::new("re1", ReactionType::StateTransition);
        reaction.reactants.push(a);
        reaction.products.push(b);
        let r = model.add_reaction(reaction).unwrap();

        let mut dropped = model.clone();
        dropped.delete_species(a, DeletePolicy::DropReactions);
        assert_eq!(0, dropped.num_reactions());

        model.delete_species(a, DeletePolicy::DetachReferences);
        assert_eq!(1, model.num_reactions());
        assert!(model.get_reaction(r).unwrap().reactants.is_empty());
        assert!(model.check_integrity().is_ok());
    }
}
