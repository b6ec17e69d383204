//! The SBML-qual writer. It dumps the compiled model into valid SBML Level 3
//! XML with the qual and layout packages: one qualitative species per model
//! species (carrying its MIRIAM annotations and glyph geometry) and one
//! transition per synthesized rule.

use crate::export::{sid_of, xml_escape};
use crate::naming::sanitize_sid;
use crate::{Expr, Influence, ReactionModel, Sign, SpeciesId};
use std::collections::HashMap;
use std::io::{Error, Write};

const SBML_CORE: &str = "http://www.sbml.org/sbml/level3/version1/core";
const SBML_QUAL: &str = "http://www.sbml.org/sbml/level3/version1/qual/version1";
const SBML_LAYOUT: &str = "http://www.sbml.org/sbml/level3/version1/layout/version1";
const MATHML: &str = "http://www.w3.org/1998/Math/MathML";
const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
const BQBIOL: &str = "http://biomodels.net/biology-qualifiers/";
const BQMODEL: &str = "http://biomodels.net/model-qualifiers/";

/// Write the model as an SBML-qual document.
pub fn write_qual(
    out: &mut dyn Write,
    model: &ReactionModel,
    influences: &[Influence],
) -> Result<(), Error> {
    write!(out, "<?xml version='1.0' encoding='UTF-8' standalone='no'?>")?;
    write!(
        out,
        "<sbml xmlns=\"{}\" level=\"3\" version=\"1\" layout:required=\"false\" qual:required=\"true\" xmlns:layout=\"{}\" xmlns:qual=\"{}\" xmlns:rdf=\"{}\" xmlns:bqbiol=\"{}\" xmlns:bqmodel=\"{}\">",
        SBML_CORE, SBML_LAYOUT, SBML_QUAL, RDF, BQBIOL, BQMODEL
    )?;
    write!(out, "<model id=\"model_id\">")?;

    let compartment_ids = write_compartments(out, model)?;
    write_layout(out, model)?;
    write_species(out, model, &compartment_ids)?;
    write_transitions(out, model, influences)?;

    write!(out, "</model>")?;
    write!(out, "</sbml>")?;
    Ok(())
}

/// **(internal)** One constant compartment per distinct compartment name, in the
/// order of first occurrence along ascending species handles.
fn write_compartments(
    out: &mut dyn Write,
    model: &ReactionModel,
) -> Result<HashMap<String, String>, Error> {
    let mut ids: HashMap<String, String> = HashMap::new();
    let mut ordered: Vec<(String, String)> = Vec::new();
    for (_, species) in model.species_iter() {
        if ids.contains_key(&species.compartment) {
            continue;
        }
        let mut candidate = format!("comp_{}", sanitize_sid(&species.compartment));
        let mut tag = 0;
        while ordered.iter().any(|(_, taken)| *taken == candidate) {
            tag += 1;
            candidate = format!("comp_{}_{}", sanitize_sid(&species.compartment), tag);
        }
        ids.insert(species.compartment.clone(), candidate.clone());
        ordered.push((species.compartment.clone(), candidate));
    }
    write!(out, "<listOfCompartments>")?;
    for (name, id) in &ordered {
        write!(
            out,
            "<compartment constant=\"true\" id=\"{}\" name=\"{}\"/>",
            id,
            xml_escape(name)
        )?;
    }
    write!(out, "</listOfCompartments>")?;
    Ok(ids)
}

/// **(internal)** Copy the glyph geometry of every species into a layout.
fn write_layout(out: &mut dyn Write, model: &ReactionModel) -> Result<(), Error> {
    write!(out, "<layout:listOfLayouts>")?;
    write!(out, "<layout:layout layout:id=\"__layout__\">")?;
    if let Some((width, height)) = model.map_size {
        write!(
            out,
            "<layout:dimensions layout:width=\"{}\" layout:height=\"{}\"/>",
            width, height
        )?;
    }
    write!(out, "<layout:listOfSpeciesGlyphs>")?;
    for (id, species) in model.species_iter() {
        let sid = sid_of(model, id);
        write!(
            out,
            "<layout:speciesGlyph layout:id=\"_ly_{}\" layout:species=\"{}\">",
            sid, sid
        )?;
        write!(out, "<layout:boundingBox>")?;
        write!(
            out,
            "<layout:position layout:x=\"{}\" layout:y=\"{}\"/>",
            species.layout.x, species.layout.y
        )?;
        write!(
            out,
            "<layout:dimensions layout:width=\"{}\" layout:height=\"{}\"/>",
            species.layout.width, species.layout.height
        )?;
        write!(out, "</layout:boundingBox>")?;
        write!(out, "</layout:speciesGlyph>")?;
    }
    write!(out, "</layout:listOfSpeciesGlyphs>")?;
    write!(out, "</layout:layout>")?;
    write!(out, "</layout:listOfLayouts>")?;
    Ok(())
}

/// **(internal)** The qualitative species list. Species without a rule are
/// exported as constant inputs.
fn write_species(
    out: &mut dyn Write,
    model: &ReactionModel,
    compartment_ids: &HashMap<String, String>,
) -> Result<(), Error> {
    write!(out, "<qual:listOfQualitativeSpecies>")?;
    for (id, species) in model.species_iter() {
        let sid = sid_of(model, id);
        let compartment = compartment_ids
            .get(&species.compartment)
            .cloned()
            .unwrap_or_else(|| "comp_default_compartment".to_string());
        let constant = if species.function.is_some() { "false" } else { "true" };
        write!(
            out,
            "<qual:qualitativeSpecies qual:maxLevel=\"1\" qual:compartment=\"{}\" qual:constant=\"{}\" qual:name=\"{}\" qual:id=\"{}\"",
            compartment,
            constant,
            xml_escape(&species.name),
            sid
        )?;
        if species.annotations.is_empty() {
            write!(out, "/>")?;
        } else {
            write!(out, ">")?;
            write_annotation(out, &sid, species)?;
            write!(out, "</qual:qualitativeSpecies>")?;
        }
    }
    write!(out, "</qual:listOfQualitativeSpecies>")?;
    Ok(())
}

/// **(internal)** The MIRIAM bag of a species as an RDF annotation element.
fn write_annotation(
    out: &mut dyn Write,
    sid: &str,
    species: &crate::Species,
) -> Result<(), Error> {
    write!(out, "<annotation><rdf:RDF>")?;
    write!(out, "<rdf:Description rdf:about=\"#{}\">", sid)?;
    for (qualifier, uris) in species.annotations.iter() {
        write!(out, "<{}><rdf:Bag>", qualifier.as_tag())?;
        for uri in uris {
            write!(out, "<rdf:li rdf:resource=\"{}\"/>", xml_escape(uri))?;
        }
        write!(out, "</rdf:Bag></{}>", qualifier.as_tag())?;
    }
    write!(out, "</rdf:Description>")?;
    write!(out, "</rdf:RDF></annotation>")?;
    Ok(())
}

/// **(internal)** One transition per species with a rule: the inputs are the
/// influence arcs into the species, the single function term carries the rule.
fn write_transitions(
    out: &mut dyn Write,
    model: &ReactionModel,
    influences: &[Influence],
) -> Result<(), Error> {
    write!(out, "<qual:listOfTransitions>")?;
    for (id, species) in model.species_iter() {
        let function = match &species.function {
            Some(function) => function,
            None => continue,
        };
        let sid = sid_of(model, id);
        write!(out, "<qual:transition qual:id=\"tr_{}\">", sid)?;

        write!(out, "<qual:listOfInputs>")?;
        let mut seen: Vec<(SpeciesId, Sign)> = Vec::new();
        for arc in influences.iter().filter(|arc| arc.target == id) {
            if seen.contains(&(arc.source, arc.sign)) {
                continue;
            }
            let sign = match arc.sign {
                Sign::Positive => "positive",
                Sign::Negative => "negative",
            };
            write!(
                out,
                "<qual:input qual:qualitativeSpecies=\"{}\" qual:transitionEffect=\"none\" qual:sign=\"{}\" qual:id=\"tr_{}_in_{}\"/>",
                sid_of(model, arc.source),
                sign,
                sid,
                seen.len()
            )?;
            seen.push((arc.source, arc.sign));
        }
        write!(out, "</qual:listOfInputs>")?;

        write!(out, "<qual:listOfOutputs>")?;
        write!(
            out,
            "<qual:output qual:qualitativeSpecies=\"{}\" qual:transitionEffect=\"assignmentLevel\" qual:id=\"tr_{}_out\"/>",
            sid, sid
        )?;
        write!(out, "</qual:listOfOutputs>")?;

        write!(out, "<qual:listOfFunctionTerms>")?;
        write!(out, "<qual:defaultTerm qual:resultLevel=\"0\"></qual:defaultTerm>")?;
        write!(out, "<qual:functionTerm qual:resultLevel=\"1\">")?;
        write!(out, "<math xmlns=\"{}\">", MATHML)?;
        write_math(out, model, function)?;
        write!(out, "</math>")?;
        write!(out, "</qual:functionTerm>")?;
        write!(out, "</qual:listOfFunctionTerms>")?;
        write!(out, "</qual:transition>")?;
    }
    write!(out, "</qual:listOfTransitions>")?;
    Ok(())
}

/// **(internal)** A rule as MathML. Variables become equality tests against
/// level 1, so the formula stays valid for multi-valued tools.
fn write_math(out: &mut dyn Write, model: &ReactionModel, function: &Expr) -> Result<(), Error> {
    match function {
        Expr::Const(true) => write!(out, "<true/>")?,
        Expr::Const(false) => write!(out, "<false/>")?,
        Expr::Var(id) => {
            write!(
                out,
                "<apply><eq/><ci>{}</ci><cn type=\"integer\">1</cn></apply>",
                sid_of(model, *id)
            )?;
        }
        Expr::Not(inner) => {
            write!(out, "<apply><not/>")?;
            write_math(out, model, inner)?;
            write!(out, "</apply>")?;
        }
        Expr::And(items) => {
            if items.is_empty() {
                write!(out, "<true/>")?;
            } else {
                write!(out, "<apply><and/>")?;
                for item in items {
                    write_math(out, model, item)?;
                }
                write!(out, "</apply>")?;
            }
        }
        Expr::Or(items) => {
            if items.is_empty() {
                write!(out, "<false/>")?;
            } else {
                write!(out, "<apply><or/>")?;
                for item in items {
                    write_math(out, model, item)?;
                }
                write!(out, "</apply>")?;
            }
        }
    }
    Ok(())
}
