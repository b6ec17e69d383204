use crate::celldesigner::{descendants, find_descendant, CELLDESIGNER, SBML};
use crate::{ModifierKind, Reaction, ReactionModel, ReactionType, SpeciesId};
use roxmltree::Node;
use std::collections::HashMap;

/// Read every reaction of the map into the model.
///
/// Reactant/product/modifier aliases are de-complexified first: an alias drawn
/// inside a complex stands for the complex itself. References to aliases the
/// species pass skipped (degraded species, subcomponents) are silently dropped;
/// a reaction may legally end up with an empty product set and is then inert.
pub(super) fn read_reactions(
    model_node: Node,
    model: &mut ReactionModel,
    warnings: &mut Vec<String>,
) {
    // Alias drawn inside a complex -> the complex alias.
    let nested: HashMap<&str, &str> = descendants(model_node, (CELLDESIGNER, "speciesAlias"))
        .into_iter()
        .filter_map(|alias| {
            let id = alias.attribute("id")?;
            let complex = alias.attribute("complexSpeciesAlias")?;
            Some((id, complex))
        })
        .collect();
    let decomplexify =
        |alias: &str| -> String { nested.get(alias).copied().unwrap_or(alias).to_string() };

    for reaction_node in descendants(model_node, (SBML, "reaction")) {
        let reaction_id = match reaction_node.attribute("id") {
            Some(id) => id,
            None => continue,
        };
        let extension = match find_descendant(reaction_node, (CELLDESIGNER, "reactionType")) {
            Some(node) => node,
            None => {
                warnings.push(format!(
                    "Reaction `{}` has no CellDesigner extension; skipped.",
                    reaction_id
                ));
                continue;
            }
        };
        let reaction_type = extension
            .text()
            .map(ReactionType::from_celldesigner)
            .unwrap_or(ReactionType::Unknown);

        let mut reaction = Reaction::new(reaction_id, reaction_type);
        for node in descendants(reaction_node, (CELLDESIGNER, "baseReactant"))
            .into_iter()
            .chain(descendants(reaction_node, (CELLDESIGNER, "reactantLink")))
        {
            if let Some(species) = resolve_alias(model, node, &decomplexify) {
                reaction.reactants.push(species);
            }
        }
        for node in descendants(reaction_node, (CELLDESIGNER, "baseProduct"))
            .into_iter()
            .chain(descendants(reaction_node, (CELLDESIGNER, "productLink")))
        {
            if let Some(species) = resolve_alias(model, node, &decomplexify) {
                reaction.products.push(species);
            }
        }
        if let Some(list) = find_descendant(reaction_node, (CELLDESIGNER, "listOfModification")) {
            for modification in descendants(list, (CELLDESIGNER, "modification")) {
                let kind = match modification.attribute("type") {
                    Some(kind) => kind,
                    None => continue,
                };
                let kind = match ModifierKind::from_celldesigner(kind) {
                    Some(kind) => kind,
                    None => {
                        warnings.push(format!(
                            "Reaction `{}` has a modifier of unsupported kind `{}`; skipped.",
                            reaction_id, kind
                        ));
                        continue;
                    }
                };
                let aliases = modification.attribute("aliases").unwrap_or("");
                for alias in aliases.split(',').filter(|alias| !alias.is_empty()) {
                    if let Some(species) = model.find_species(&decomplexify(alias.trim())) {
                        reaction.modifiers.push((species, kind));
                    }
                }
            }
        }

        if let Err(problem) = model.add_reaction(reaction) {
            warnings.push(problem);
        }
    }
}

/// **(internal)** Resolve the `alias` attribute of a reactant/product element to
/// a live model species, looking through complexes.
fn resolve_alias(
    model: &ReactionModel,
    node: Node,
    decomplexify: &dyn Fn(&str) -> String,
) -> Option<SpeciesId> {
    let alias = node.attribute("alias")?;
    model.find_species(&decomplexify(alias))
}
