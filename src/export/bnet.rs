//! The BoolNet `.bnet` sidecar.
//!
//! `.bnet` has no constants, so a constant rule is encoded through the target
//! itself (`(x | !x)` for true, `(x & !x)` for false), and a free input is
//! written as its own factor, the usual BoolNet convention for inputs.

use crate::export::sid_of;
use crate::{Expr, ReactionModel, SpeciesId};
use std::io::{Error, Write};

/// Write the model in `.bnet` format.
pub fn write_bnet(out: &mut dyn Write, model: &ReactionModel) -> Result<(), Error> {
    writeln!(out, "targets, factors")?;
    for (id, species) in model.species_iter() {
        let target = sid_of(model, id);
        let factors = match &species.function {
            Some(function) => bnet_string(model, id, function),
            None => target.clone(),
        };
        writeln!(out, "{}, {}", target, factors)?;
    }
    Ok(())
}

/// **(internal)** Render one rule in `.bnet` syntax.
fn bnet_string(model: &ReactionModel, target: SpeciesId, function: &Expr) -> String {
    match function {
        Expr::Var(id) => sid_of(model, *id),
        Expr::Const(value) => {
            let name = sid_of(model, target);
            if *value {
                format!("({} | !{})", name, name)
            } else {
                format!("({} & !{})", name, name)
            }
        }
        Expr::Not(inner) => format!("!{}", bnet_string(model, target, inner)),
        Expr::And(items) => {
            let parts: Vec<String> = items
                .iter()
                .map(|item| bnet_string(model, target, item))
                .collect();
            format!("({})", parts.join(" & "))
        }
        Expr::Or(items) => {
            let parts: Vec<String> = items
                .iter()
                .map(|item| bnet_string(model, target, item))
                .collect();
            format!("({})", parts.join(" | "))
        }
    }
}
