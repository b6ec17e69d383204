use crate::celldesigner::{descendants, find_descendant, CELLDESIGNER, SBML};
use crate::celldesigner::_read_annotations::read_rdf_bag;
use crate::{LayoutBox, Modification, ReactionModel, Species, SpeciesType};
use roxmltree::Node;
use std::collections::{HashMap, HashSet};

/// Read every species alias of the map into the model.
///
/// CellDesigner draws one alias per occurrence of a species; aliases nested
/// inside a complex, aliases without bounds, and degraded species are skipped.
/// The reader keys the model by alias id, exactly the granularity the reduction
/// pass operates on.
pub(super) fn read_species(model_node: Node, model: &mut ReactionModel, warnings: &mut Vec<String>) {
    let compartments = compartment_names(model_node);
    let receptors = receptor_proteins(model_node);
    let sbml_species: HashMap<&str, Node> = descendants(model_node, (SBML, "species"))
        .into_iter()
        .filter_map(|node| node.attribute("id").map(|id| (id, node)))
        .collect();

    let aliases = descendants(model_node, (CELLDESIGNER, "speciesAlias"))
        .into_iter()
        .chain(descendants(model_node, (CELLDESIGNER, "complexSpeciesAlias")));
    for alias in aliases {
        if alias.attribute("complexSpeciesAlias").is_some() {
            // Part of a complex glyph; only the complex itself becomes a species.
            continue;
        }
        let alias_id = match alias.attribute("id") {
            Some(id) => id,
            None => continue,
        };
        let bounds = match find_descendant(alias, (CELLDESIGNER, "bounds")) {
            Some(bounds) => bounds,
            None => continue,
        };
        let ref_species = match alias.attribute("species") {
            Some(species) => species,
            None => {
                warnings.push(format!("Alias `{}` has no species reference.", alias_id));
                continue;
            }
        };
        let sbml = match sbml_species.get(ref_species) {
            Some(node) => *node,
            None => {
                warnings.push(format!(
                    "Alias `{}` references unknown species `{}`.",
                    alias_id, ref_species
                ));
                continue;
            }
        };

        let class = find_descendant(sbml, (CELLDESIGNER, "class"))
            .and_then(|node| node.text())
            .unwrap_or("PROTEIN");
        let mut species_type = SpeciesType::from_celldesigner(class);
        if species_type == SpeciesType::Degraded {
            continue;
        }
        if species_type == SpeciesType::Protein {
            let reference = find_descendant(sbml, (CELLDESIGNER, "proteinReference"))
                .and_then(|node| node.text());
            if reference.map_or(false, |id| receptors.contains(id)) {
                species_type = SpeciesType::Receptor;
            }
        }

        let mut modifications = read_modifications(sbml);
        let structural = find_descendant(sbml, (CELLDESIGNER, "structuralState"))
            .and_then(|node| node.attribute("structuralState"));
        if structural == Some("active") {
            modifications.push(Modification::Active);
        }

        let raw_name = sbml.attribute("name").unwrap_or(ref_species);
        let mut name = clean_name(raw_name);
        if name.is_empty() {
            name = ref_species.to_string();
        }

        let compartment = alias
            .attribute("compartmentAlias")
            .and_then(|id| compartments.get(id).cloned())
            .unwrap_or_else(|| "default_compartment".to_string());

        let mut species = Species::new(alias_id, &name);
        species.compartment = compartment;
        species.species_type = species_type;
        species.modifications = modifications;
        species.layout = read_bounds(alias, bounds);
        species.annotations = read_rdf_bag(sbml);
        if let Err(problem) = model.add_species(species) {
            warnings.push(problem);
        }
    }

    lift_subcomponent_annotations(model_node, model);
}

/// **(internal)** Map compartment alias ids to the names of the SBML compartments
/// they draw.
fn compartment_names(model_node: Node) -> HashMap<String, String> {
    let sbml_compartments: HashMap<&str, &str> = descendants(model_node, (SBML, "compartment"))
        .into_iter()
        .filter_map(|node| {
            let id = node.attribute("id")?;
            Some((id, node.attribute("name").unwrap_or(id)))
        })
        .collect();
    descendants(model_node, (CELLDESIGNER, "compartmentAlias"))
        .into_iter()
        .filter_map(|alias| {
            let alias_id = alias.attribute("id")?;
            let compartment = alias.attribute("compartment")?;
            let name = sbml_compartments.get(compartment).copied().unwrap_or(compartment);
            Some((alias_id.to_string(), name.to_string()))
        })
        .collect()
}

/// **(internal)** Ids of the reference proteins declared with type `RECEPTOR`.
fn receptor_proteins(model_node: Node) -> HashSet<String> {
    descendants(model_node, (CELLDESIGNER, "protein"))
        .into_iter()
        .filter(|node| node.attribute("type") == Some("RECEPTOR"))
        .filter_map(|node| node.attribute("id").map(str::to_string))
        .collect()
}

/// **(internal)** Modification states listed on the SBML species annotation.
fn read_modifications(sbml: Node) -> Vec<Modification> {
    match find_descendant(sbml, (CELLDESIGNER, "listOfModifications")) {
        Some(list) => descendants(list, (CELLDESIGNER, "modification"))
            .into_iter()
            .filter_map(|node| node.attribute("state"))
            .map(Modification::from_state)
            .collect(),
        None => Vec::new(),
    }
}

/// **(internal)** The glyph geometry (and optional fill colour) of an alias.
fn read_bounds(alias: Node, bounds: Node) -> LayoutBox {
    let number = |attribute: &str| {
        bounds
            .attribute(attribute)
            .and_then(|value| value.parse::<f64>().ok())
            .unwrap_or(0.0)
    };
    let color = find_descendant(alias, (CELLDESIGNER, "paint"))
        .and_then(|node| node.attribute("color"))
        .map(str::to_string);
    LayoutBox {
        x: number("x"),
        y: number("y"),
        width: number("w"),
        height: number("h"),
        color,
    }
}

/// **(internal)** CellDesigner species names carry markup tokens; strip the
/// subscript markers and restore the encoded symbols.
fn clean_name(raw: &str) -> String {
    let parts: Vec<&str> = raw
        .split('_')
        .filter(|token| !matches!(*token, "sub" | "endsub"))
        .map(|token| match token {
            "&" | "|" | "!" | "underscore" => "",
            other => other,
        })
        .collect();
    let mut name = parts.join("_");
    while name.contains("__") {
        name = name.replace("__", "_");
    }
    name.replace("_minus_", "-")
        .replace("_plus_", "+")
        .replace("_super", "^")
        .replace("_slash_", "/")
        .trim_matches('_')
        .to_string()
}

/// **(internal)** Species that only exist as subcomponents of a complex still
/// carry annotations; lift them onto the complex alias they are drawn in.
fn lift_subcomponent_annotations(model_node: Node, model: &mut ReactionModel) {
    // Alias of an included species -> enclosing complex alias.
    let mut enclosing: HashMap<&str, &str> = HashMap::new();
    for alias in descendants(model_node, (CELLDESIGNER, "speciesAlias")) {
        if let (Some(species), Some(complex)) = (
            alias.attribute("species"),
            alias.attribute("complexSpeciesAlias"),
        ) {
            enclosing.insert(species, complex);
        }
    }
    let included = match find_descendant(model_node, (CELLDESIGNER, "listOfIncludedSpecies")) {
        Some(list) => list,
        None => return,
    };
    for species in descendants(included, (CELLDESIGNER, "species")) {
        let bag = read_rdf_bag(species);
        if bag.is_empty() {
            continue;
        }
        let complex_alias = species
            .attribute("id")
            .and_then(|id| enclosing.get(id))
            .and_then(|alias| model.find_species(alias));
        if let Some(complex) = complex_alias {
            if let Some(target) = model.get_species_mut(complex) {
                target.annotations.merge_from(&bag);
            }
        }
    }
}
