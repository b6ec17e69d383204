//! The structural abstraction from process description to activity flow: every
//! surviving reaction contributes one signed arc per (input, product) pair.
//!
//! Reactants and positive modifiers influence every product positively, negative
//! modifiers negatively. Mutual inhibition between co-reactants is deliberately
//! not generated. Arcs are deduplicated per (source, target, sign) and emitted
//! in ascending reaction order, so the result is deterministic.

use crate::{Influence, ReactionModel, Sign};
use std::collections::HashSet;

/// Derive the signed influence arcs of the given model.
pub fn influences(model: &ReactionModel) -> Vec<Influence> {
    let mut seen: HashSet<Influence> = HashSet::new();
    let mut result: Vec<Influence> = Vec::new();
    for (_, reaction) in model.reactions_iter() {
        for &target in &reaction.products {
            for &source in &reaction.reactants {
                let arc = Influence {
                    source,
                    target,
                    sign: Sign::Positive,
                };
                if seen.insert(arc) {
                    result.push(arc);
                }
            }
            for &(source, kind) in &reaction.modifiers {
                let arc = Influence {
                    source,
                    target,
                    sign: kind.sign(),
                };
                if seen.insert(arc) {
                    result.push(arc);
                }
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::influences;
    use crate::{
        ModifierKind, Reaction, ReactionModel, ReactionType, Sign, Species,
    };

    #[test]
    fn reactants_and_modifiers_become_signed_arcs() {
        let mut model = ReactionModel::new();
        let s = model.add_species(Species::new("sa1", "S")).unwrap();
        let e = model.add_species(Species::new("sa2", "E")).unwrap();
        let i = model.add_species(Species::new("sa3", "I")).unwrap();
        let p = model.add_species(Species::new("sa4", "P")).unwrap();
        let mut reaction = Reaction::new("re1", ReactionType::StateTransition);
        reaction.reactants = vec![s];
        reaction.products = vec![p];
        reaction.modifiers = vec![(e, ModifierKind::Catalyst), (i, ModifierKind::Inhibitor)];
        model.add_reaction(reaction).unwrap();

        let arcs = influences(&model);
        assert_eq!(3, arcs.len());
        assert_eq!((s, p, Sign::Positive), (arcs[0].source, arcs[0].target, arcs[0].sign));
        assert_eq!((e, p, Sign::Positive), (arcs[1].source, arcs[1].target, arcs[1].sign));
        assert_eq!((i, p, Sign::Negative), (arcs[2].source, arcs[2].target, arcs[2].sign));
    }

    #[test]
    fn duplicate_arcs_are_emitted_once() {
        let mut model = ReactionModel::new();
        let a = model.add_species(Species::new("sa1", "A")).unwrap();
        let p = model.add_species(Species::new("sa2", "P")).unwrap();
        for n in 0..2 {
            let mut reaction = Reaction::new(&format!("re{}", n), ReactionType::StateTransition);
            reaction.reactants = vec![a];
            reaction.products = vec![p];
            model.add_reaction(reaction).unwrap();
        }
        assert_eq!(1, influences(&model).len());
    }

    #[test]
    fn empty_product_reactions_are_inert() {
        let mut model = ReactionModel::new();
        let a = model.add_species(Species::new("sa1", "A")).unwrap();
        let mut reaction = Reaction::new("re1", ReactionType::StateTransition);
        reaction.reactants = vec![a];
        model.add_reaction(reaction).unwrap();
        assert!(influences(&model).is_empty());
    }
}
