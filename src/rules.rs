//! Synthesis of the Boolean update rule of every species from the reactions that
//! produce it.
//!
//! One reaction contributes one clause: any one positive modifier suffices
//! (catalysts are alternative activators), all reactants are required
//! co-substrates, and no negative modifier may be present. The rule of a species
//! is the disjunction of the clauses of its producing reactions, in ascending
//! reaction order. A species no reaction produces gets no rule at all and acts
//! as a free input of the resulting model.

use crate::{Expr, Reaction, ReactionModel, SpeciesId};

/// Attach a Boolean update rule to every produced species of the model.
/// Existing rules are recomputed from scratch.
pub fn build_rules(model: &mut ReactionModel) {
    let mut formulas: Vec<(SpeciesId, Option<Expr>)> = Vec::new();
    for (y, _) in model.species_iter() {
        let mut clauses: Vec<Expr> = Vec::new();
        for (_, reaction) in model.reactions_iter() {
            if reaction.products.contains(&y) {
                clauses.push(reaction_clause(reaction));
            }
        }
        let formula = if clauses.is_empty() {
            None
        } else {
            Some(Expr::mk_or(clauses))
        };
        formulas.push((y, formula));
    }
    for (y, formula) in formulas {
        if let Some(species) = model.get_species_mut(y) {
            species.function = formula;
        }
    }
}

/// Run the Boolean simplifier over every synthesized rule.
pub fn simplify_rules(model: &mut ReactionModel) {
    let ids: Vec<SpeciesId> = model.species_ids().collect();
    for y in ids {
        if let Some(species) = model.get_species_mut(y) {
            if let Some(formula) = species.function.take() {
                species.function = Some(formula.simplify());
            }
        }
    }
}

/// **(internal)** The clause contributed by a single producing reaction.
fn reaction_clause(reaction: &Reaction) -> Expr {
    let mut parts: Vec<Expr> = Vec::new();
    let positive: Vec<Expr> = reaction
        .modifiers
        .iter()
        .filter(|(_, kind)| kind.is_positive())
        .map(|(id, _)| Expr::mk_var(*id))
        .collect();
    if !positive.is_empty() {
        parts.push(Expr::mk_or(positive));
    }
    for &reactant in &reaction.reactants {
        parts.push(Expr::mk_var(reactant));
    }
    for (id, kind) in &reaction.modifiers {
        if kind.is_negative() {
            parts.push(Expr::mk_not(Expr::mk_var(*id)));
        }
    }
    Expr::mk_and(parts)
}

#[cfg(test)]
mod tests {
    use super::{build_rules, simplify_rules};
    use crate::{
        Expr, ModifierKind, Reaction, ReactionModel, ReactionType, Species, SpeciesId,
    };
    use std::collections::HashMap;

    fn catalysis_model() -> (ReactionModel, SpeciesId, SpeciesId, SpeciesId, SpeciesId) {
        let mut model = ReactionModel::new();
        let e = model.add_species(Species::new("sa1", "E")).unwrap();
        let s = model.add_species(Species::new("sa2", "S")).unwrap();
        let i = model.add_species(Species::new("sa3", "I")).unwrap();
        let p = model.add_species(Species::new("sa4", "P")).unwrap();
        let mut reaction = Reaction::new("re1", ReactionType::StateTransition);
        reaction.reactants = vec![s];
        reaction.products = vec![p];
        reaction.modifiers = vec![(e, ModifierKind::Catalyst), (i, ModifierKind::Inhibitor)];
        model.add_reaction(reaction).unwrap();
        (model, e, s, i, p)
    }

    #[test]
    fn catalysis_clause_semantics() {
        let (mut model, e, s, i, p) = catalysis_model();
        build_rules(&mut model);
        simplify_rules(&mut model);
        let formula = model.get_species(p).unwrap().function.clone().unwrap();

        // P is produced exactly when E and S hold and I does not.
        for e_v in [false, true] {
            for s_v in [false, true] {
                for i_v in [false, true] {
                    let values = HashMap::from([(e, e_v), (s, s_v), (i, i_v)]);
                    assert_eq!(Some(e_v && s_v && !i_v), formula.evaluate(&values));
                }
            }
        }
        // The inputs themselves are free.
        assert!(model.get_species(e).unwrap().function.is_none());
        assert!(model.get_species(s).unwrap().function.is_none());
    }

    #[test]
    fn multiple_reactions_disjoin() {
        let mut model = ReactionModel::new();
        let e1 = model.add_species(Species::new("sa1", "E1")).unwrap();
        let e2 = model.add_species(Species::new("sa2", "E2")).unwrap();
        let s = model.add_species(Species::new("sa3", "S")).unwrap();
        let p = model.add_species(Species::new("sa4", "P")).unwrap();
        for (n, e) in [(1, e1), (2, e2)] {
            let mut reaction = Reaction::new(&format!("re{}", n), ReactionType::StateTransition);
            reaction.reactants = vec![s];
            reaction.products = vec![p];
            reaction.modifiers = vec![(e, ModifierKind::Catalyst)];
            model.add_reaction(reaction).unwrap();
        }
        build_rules(&mut model);
        simplify_rules(&mut model);
        let formula = model.get_species(p).unwrap().function.clone().unwrap();
        let expected = Expr::mk_or(vec![
            Expr::mk_and(vec![Expr::mk_var(e1), Expr::mk_var(s)]),
            Expr::mk_and(vec![Expr::mk_var(e2), Expr::mk_var(s)]),
        ]);
        assert_eq!(expected, formula);
    }

    #[test]
    fn several_catalysts_are_alternatives() {
        let mut model = ReactionModel::new();
        let e1 = model.add_species(Species::new("sa1", "E1")).unwrap();
        let e2 = model.add_species(Species::new("sa2", "E2")).unwrap();
        let p = model.add_species(Species::new("sa3", "P")).unwrap();
        let mut reaction = Reaction::new("re1", ReactionType::StateTransition);
        reaction.products = vec![p];
        reaction.modifiers = vec![
            (e1, ModifierKind::Catalyst),
            (e2, ModifierKind::PhysicalStimulation),
        ];
        model.add_reaction(reaction).unwrap();
        build_rules(&mut model);
        simplify_rules(&mut model);
        let formula = model.get_species(p).unwrap().function.clone().unwrap();
        assert_eq!(
            Expr::mk_or(vec![Expr::mk_var(e1), Expr::mk_var(e2)]),
            formula
        );
    }

    #[test]
    fn reaction_without_inputs_produces_constantly() {
        let mut model = ReactionModel::new();
        let p = model.add_species(Species::new("sa1", "P")).unwrap();
        let mut reaction = Reaction::new("re1", ReactionType::StateTransition);
        reaction.products = vec![p];
        model.add_reaction(reaction).unwrap();
        build_rules(&mut model);
        simplify_rules(&mut model);
        assert_eq!(
            Some(Expr::mk_true()),
            model.get_species(p).unwrap().function
        );
    }
}
