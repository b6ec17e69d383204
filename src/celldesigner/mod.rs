//! The CellDesigner reader: parses an SBML Level 2 Version 4 file with the
//! CellDesigner extension into the entry `ReactionModel`.
//!
//! The reader contains no biological semantics beyond surfacing the CellDesigner
//! vocabulary verbatim; it is not a complete CellDesigner implementation, but it
//! should be good enough for the maps produced by recent CellDesigner versions.
//! Structural problems (wrong root element, missing model) are hard errors,
//! anything local degrades to a warning and the element is skipped.

use crate::ReactionModel;
use roxmltree::{Document, ExpandedName, Node};

pub(crate) const SBML: &str = "http://www.sbml.org/sbml/level2/version4";
pub(crate) const CELLDESIGNER: &str = "http://www.sbml.org/2001/ns/celldesigner";
pub(crate) const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub(crate) const BQBIOL: &str = "http://biomodels.net/biology-qualifiers/";
pub(crate) const BQMODEL: &str = "http://biomodels.net/model-qualifiers/";

mod _read_annotations;
mod _read_reactions;
mod _read_species;

/// Try to read a `ReactionModel` from a CellDesigner file.
///
/// Warnings produced for skipped or odd elements are appended to `warnings`.
pub fn read_celldesigner(
    model_file: &str,
    warnings: &mut Vec<String>,
) -> Result<ReactionModel, String> {
    let document =
        Document::parse(model_file).map_err(|e| format!("XML error: {:?}", e))?;
    let root = document.root();

    let root_elements = root.children().filter(|it| it.is_element());
    if root_elements.clone().count() != 1 {
        return Err("Expected exactly one top-level <sbml> tag.".into());
    }
    let sbml = match root_elements.clone().next() {
        Some(sbml) => sbml,
        None => return Err("Document is empty.".into()),
    };
    if sbml.tag_name().name() != "sbml" {
        return Err("Root element is not <sbml>.".into());
    }
    if sbml.tag_name().namespace() != Some(SBML) {
        return Err("Currently limited to SBML Level 2 Version 4.".into());
    }

    let model_node = read_unique_child(sbml, (SBML, "model"))?;

    let mut model = ReactionModel::new();
    model.map_size = read_map_size(model_node);
    _read_species::read_species(model_node, &mut model, warnings);
    _read_reactions::read_reactions(model_node, &mut model, warnings);
    Ok(model)
}

/// **(internal)** The drawing size of the map, from the CellDesigner
/// `modelDisplay` element.
fn read_map_size(model_node: Node) -> Option<(f64, f64)> {
    let display = find_descendant(model_node, (CELLDESIGNER, "modelDisplay"))?;
    let width = display.attribute("sizeX")?.parse::<f64>().ok()?;
    let height = display.attribute("sizeY")?.parse::<f64>().ok()?;
    Some((width, height))
}

/// **(internal)** Find the given tag in a parent `Node`. Returns an error if the
/// tag does not exist or is present in multiple instances.
pub(crate) fn read_unique_child<'a, 'input: 'a>(
    parent: Node<'a, 'input>,
    name: (&'static str, &'static str),
) -> Result<Node<'a, 'input>, String> {
    let name = ExpandedName::from(name);
    let mut tags = parent.children().filter(|node| node.tag_name() == name);
    let fst = tags.next();
    match fst {
        Some(fst) => {
            if tags.next().is_none() {
                Ok(fst)
            } else {
                Err(format!(
                    "Multiple {} found in {}.",
                    name.name(),
                    parent.tag_name().name()
                ))
            }
        }
        None => Err(format!(
            "Could not find tag {} in {}.",
            name.name(),
            parent.tag_name().name()
        )),
    }
}

/// **(internal)** All descendant `Nodes` with the given name.
pub(crate) fn descendants<'a, 'input: 'a>(
    parent: Node<'a, 'input>,
    name: (&'static str, &'static str),
) -> Vec<Node<'a, 'input>> {
    let name = ExpandedName::from(name);
    parent
        .descendants()
        .filter(|node| node.tag_name() == name)
        .collect()
}

/// **(internal)** The first descendant `Node` with the given name, if any.
pub(crate) fn find_descendant<'a, 'input: 'a>(
    parent: Node<'a, 'input>,
    name: (&'static str, &'static str),
) -> Option<Node<'a, 'input>> {
    let name = ExpandedName::from(name);
    parent.descendants().find(|node| node.tag_name() == name)
}
