use crate::celldesigner::{find_descendant, BQBIOL, BQMODEL, RDF};
use crate::{AnnotationBag, MiriamQualifier};
use roxmltree::{ExpandedName, Node};

/// Collect the MIRIAM annotations below a node into a bag.
///
/// The expected shape is the usual `rdf:RDF / rdf:Description / bqbiol:* |
/// bqmodel:* / rdf:Bag / rdf:li[@rdf:resource]` tree; anything else below the
/// RDF element is ignored.
pub(super) fn read_rdf_bag(node: Node) -> AnnotationBag {
    let mut bag = AnnotationBag::new();
    let rdf = match find_descendant(node, (RDF, "RDF")) {
        Some(rdf) => rdf,
        None => return bag,
    };
    let description_tag = ExpandedName::from((RDF, "Description"));
    let li_tag = ExpandedName::from((RDF, "li"));
    for description in rdf.children().filter(|n| n.tag_name() == description_tag) {
        for child in description.children().filter(|n| n.is_element()) {
            let namespace = child.tag_name().namespace();
            let qualifier = if namespace == Some(BQBIOL) {
                MiriamQualifier::from_biology(child.tag_name().name())
            } else if namespace == Some(BQMODEL) {
                MiriamQualifier::from_model(child.tag_name().name())
            } else {
                continue;
            };
            for li in child.descendants().filter(|n| n.tag_name() == li_tag) {
                if let Some(uri) = li.attribute((RDF, "resource")) {
                    bag.insert(qualifier, uri);
                }
            }
        }
    }
    bag
}
