use crate::Expr::*;
use crate::{Expr, ReactionModel, SpeciesId};
use std::collections::{HashMap, HashSet};

/// Constructor utility methods. These mainly avoid unnecessary boxing at call sites.
impl Expr {
    /// Create a `true` formula.
    pub fn mk_true() -> Expr {
        Expr::Const(true)
    }

    /// Create a `false` formula.
    pub fn mk_false() -> Expr {
        Expr::Const(false)
    }

    /// Create an `x` formula where `x` is a model species.
    pub fn mk_var(id: SpeciesId) -> Expr {
        Expr::Var(id)
    }

    /// Create a `!phi` formula, where `phi` is an inner `Expr`.
    pub fn mk_not(inner: Expr) -> Expr {
        Expr::Not(Box::new(inner))
    }

    /// Create a conjunction of the given formulas. An empty conjunction is `true`.
    pub fn mk_and(items: Vec<Expr>) -> Expr {
        Expr::And(items)
    }

    /// Create a disjunction of the given formulas. An empty disjunction is `false`.
    pub fn mk_or(items: Vec<Expr>) -> Expr {
        Expr::Or(items)
    }

    /// If `Const`, return the value, otherwise return `None`.
    pub fn as_const(&self) -> Option<bool> {
        match self {
            Expr::Const(value) => Some(*value),
            _ => None,
        }
    }

    /// If `Var`, return the species handle, otherwise return `None`.
    pub fn as_var(&self) -> Option<SpeciesId> {
        match self {
            Expr::Var(id) => Some(*id),
            _ => None,
        }
    }
}

/// Other utility methods.
impl Expr {
    /// Return a sorted vector of all species that are actually used as inputs
    /// in this formula.
    pub fn collect_species(&self) -> Vec<SpeciesId> {
        fn r_species(expr: &Expr, out: &mut HashSet<SpeciesId>) {
            match expr {
                Const(_) => (),
                Var(id) => {
                    out.insert(*id);
                }
                Not(inner) => r_species(inner, out),
                And(items) | Or(items) => {
                    for item in items {
                        r_species(item, out);
                    }
                }
            }
        }
        let mut out = HashSet::new();
        r_species(self, &mut out);
        let mut result: Vec<SpeciesId> = out.into_iter().collect();
        result.sort();
        result
    }

    /// Returns true if this formula uses the given species.
    pub fn contains_species(&self, species: SpeciesId) -> bool {
        match self {
            Const(_) => false,
            Var(id) => *id == species,
            Not(inner) => inner.contains_species(species),
            And(items) | Or(items) => items.iter().any(|item| item.contains_species(species)),
        }
    }

    /// Evaluate this formula using the given species valuation. Returns `None`
    /// if a referenced species is missing from the valuation and the result is
    /// not already decided by the remaining operands.
    pub fn evaluate(&self, values: &HashMap<SpeciesId, bool>) -> Option<bool> {
        match self {
            Const(value) => Some(*value),
            Var(id) => values.get(id).cloned(),
            Not(inner) => inner.evaluate(values).map(|value| !value),
            And(items) => {
                let mut result = Some(true);
                for item in items {
                    match item.evaluate(values) {
                        Some(false) => return Some(false),
                        Some(true) => (),
                        None => result = None,
                    }
                }
                result
            }
            Or(items) => {
                let mut result = Some(false);
                for item in items {
                    match item.evaluate(values) {
                        Some(true) => return Some(true),
                        Some(false) => (),
                        None => result = None,
                    }
                }
                result
            }
        }
    }

    /// Create a copy of this formula in which every occurrence of a species from
    /// `dropped` is replaced by the constant `value`. Used when pruning removes
    /// species that surviving formulas still mention.
    pub fn replace_with_const(&self, dropped: &HashSet<SpeciesId>, value: bool) -> Expr {
        match self {
            Const(_) => self.clone(),
            Var(id) => {
                if dropped.contains(id) {
                    Expr::Const(value)
                } else {
                    self.clone()
                }
            }
            Not(inner) => Expr::mk_not(inner.replace_with_const(dropped, value)),
            And(items) => Expr::And(
                items
                    .iter()
                    .map(|item| item.replace_with_const(dropped, value))
                    .collect(),
            ),
            Or(items) => Expr::Or(
                items
                    .iter()
                    .map(|item| item.replace_with_const(dropped, value))
                    .collect(),
            ),
        }
    }

    /// Convert this formula to a string, taking public names from the provided model.
    pub fn to_text(&self, context: &ReactionModel) -> String {
        fn name_of(context: &ReactionModel, id: SpeciesId) -> String {
            match context.get_species(id) {
                Some(species) => species.name.clone(),
                None => format!("?{}", id),
            }
        }
        match self {
            Const(value) => value.to_string(),
            Var(id) => name_of(context, *id),
            Not(inner) => format!("!{}", inner.to_text(context)),
            And(items) => {
                let parts: Vec<String> = items.iter().map(|item| item.to_text(context)).collect();
                format!("({})", parts.join(" & "))
            }
            Or(items) => {
                let parts: Vec<String> = items.iter().map(|item| item.to_text(context)).collect();
                format!("({})", parts.join(" | "))
            }
        }
    }
}
