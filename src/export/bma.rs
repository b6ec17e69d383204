//! The BMA JSON writer.
//!
//! BMA models variables over `0..granularity` with `min`/`max` target functions;
//! at granularity 1 the Boolean rules translate directly (`and` is `min`, `or`
//! is `max`, negation is `1 - x`). At coarser granularities the formula is left
//! empty and BMA infers a default from the relationships. Variables of the four
//! most populous compartments get the standard BMA colours unless colouring is
//! disabled.

use crate::{Expr, Influence, ReactionModel, Sign, SpeciesId};
use serde::Serialize;
use std::collections::HashMap;
use std::io::{Error, Write};

/// Parameters of the BMA export, fed from the CLI.
#[derive(Clone, Copy, Debug)]
pub struct BmaOptions {
    /// Range of every variable (`-g`); must be at least 1.
    pub granularity: u32,
    /// Value given to free inputs (`-i`); defaults to the granularity.
    pub input_level: Option<u32>,
    /// Colour variables by compartment (disabled by `-C`).
    pub colour_by_compartment: bool,
}

impl Default for BmaOptions {
    fn default() -> BmaOptions {
        BmaOptions {
            granularity: 1,
            input_level: None,
            colour_by_compartment: true,
        }
    }
}

#[derive(Serialize)]
struct BmaUniverse {
    #[serde(rename = "Model")]
    model: BmaModel,
    #[serde(rename = "Layout")]
    layout: BmaLayout,
    ltl: BmaLtl,
}

#[derive(Serialize)]
struct BmaModel {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Variables")]
    variables: Vec<BmaVariable>,
    #[serde(rename = "Relationships")]
    relationships: Vec<BmaRelationship>,
}

#[derive(Serialize)]
struct BmaVariable {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Id")]
    id: u32,
    #[serde(rename = "RangeFrom")]
    range_from: u32,
    #[serde(rename = "RangeTo")]
    range_to: u32,
    #[serde(rename = "Formula")]
    formula: String,
}

#[derive(Serialize)]
struct BmaRelationship {
    #[serde(rename = "ToVariable")]
    to_variable: u32,
    #[serde(rename = "Type")]
    kind: String,
    #[serde(rename = "FromVariable")]
    from_variable: u32,
    #[serde(rename = "Id")]
    id: u32,
}

#[derive(Serialize)]
struct BmaLayout {
    #[serde(rename = "Variables")]
    variables: Vec<BmaLayoutVariable>,
    #[serde(rename = "Containers")]
    containers: Vec<()>,
    #[serde(rename = "Description")]
    description: String,
}

#[derive(Serialize)]
struct BmaLayoutVariable {
    #[serde(rename = "Id")]
    id: u32,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Type")]
    kind: String,
    #[serde(rename = "ContainerId")]
    container_id: u32,
    #[serde(rename = "PositionX")]
    position_x: f64,
    #[serde(rename = "PositionY")]
    position_y: f64,
    #[serde(rename = "CellY")]
    cell_y: u32,
    #[serde(rename = "CellX")]
    cell_x: u32,
    #[serde(rename = "Angle")]
    angle: u32,
    #[serde(rename = "Description")]
    description: String,
    #[serde(rename = "Fill", skip_serializing_if = "Option::is_none")]
    fill: Option<String>,
}

#[derive(Serialize)]
struct BmaLtl {
    states: Vec<()>,
    operations: Vec<()>,
}

/// Write the model as BMA JSON.
pub fn write_bma(
    out: &mut dyn Write,
    model: &ReactionModel,
    influences: &[Influence],
    options: &BmaOptions,
) -> Result<(), Error> {
    let granularity = options.granularity.max(1);
    let species: Vec<SpeciesId> = model.species_ids().collect();
    let id_map: HashMap<SpeciesId, u32> = species
        .iter()
        .enumerate()
        .map(|(index, id)| (*id, index as u32 + 1))
        .collect();
    let colours = compartment_colours(model, options);

    let variables: Vec<BmaVariable> = species
        .iter()
        .map(|id| {
            let data = model.get_species(*id).expect("live species handle");
            let formula = match &data.function {
                Some(function) if granularity == 1 => bma_formula(function, &id_map, granularity),
                Some(_) => String::new(),
                None => options.input_level.unwrap_or(granularity).to_string(),
            };
            BmaVariable {
                name: clean_name(&data.name),
                id: id_map[id],
                range_from: 0,
                range_to: granularity,
                formula,
            }
        })
        .collect();

    let mut counter = species.len() as u32;
    let relationships: Vec<BmaRelationship> = influences
        .iter()
        .filter(|arc| id_map.contains_key(&arc.source) && id_map.contains_key(&arc.target))
        .map(|arc| {
            counter += 1;
            BmaRelationship {
                to_variable: id_map[&arc.target],
                kind: match arc.sign {
                    Sign::Positive => "Activator".to_string(),
                    Sign::Negative => "Inhibitor".to_string(),
                },
                from_variable: id_map[&arc.source],
                id: counter,
            }
        })
        .collect();

    let layout_variables: Vec<BmaLayoutVariable> = species
        .iter()
        .map(|id| {
            let data = model.get_species(*id).expect("live species handle");
            BmaLayoutVariable {
                id: id_map[id],
                name: clean_name(&data.name),
                kind: "Constant".to_string(),
                container_id: 0,
                position_x: data.layout.x,
                position_y: data.layout.y,
                cell_y: 0,
                cell_x: 0,
                angle: 0,
                description: String::new(),
                fill: colours.get(&data.compartment).cloned(),
            }
        })
        .collect();

    let universe = BmaUniverse {
        model: BmaModel {
            name: "cd2qual-BMA".to_string(),
            variables,
            relationships,
        },
        layout: BmaLayout {
            variables: layout_variables,
            containers: Vec::new(),
            description: String::new(),
        },
        ltl: BmaLtl {
            states: Vec::new(),
            operations: Vec::new(),
        },
    };
    serde_json::to_writer_pretty(out, &universe)?;
    Ok(())
}

/// **(internal)** The four most populous compartments get the BMA colours, the
/// rest stay with the default fill.
fn compartment_colours(model: &ReactionModel, options: &BmaOptions) -> HashMap<String, String> {
    if !options.colour_by_compartment {
        return HashMap::new();
    }
    let mut population: HashMap<&str, usize> = HashMap::new();
    for (_, species) in model.species_iter() {
        *population.entry(species.compartment.as_str()).or_default() += 1;
    }
    let mut ranked: Vec<(&str, usize)> = population.into_iter().collect();
    ranked.sort_by(|(name_a, count_a), (name_b, count_b)| {
        count_b.cmp(count_a).then_with(|| name_a.cmp(name_b))
    });
    let palette = ["BMA_Green", "BMA_Orange", "BMA_Purple", "BMA_Mint"];
    ranked
        .into_iter()
        .zip(palette)
        .map(|((name, _), colour)| (name.to_string(), colour.to_string()))
        .collect()
}

/// **(internal)** BMA names may not contain separators or brackets.
fn clean_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            ' ' | ',' | '-' => '_',
            other => other,
        })
        .filter(|c| !matches!(c, '(' | ')' | '+' | ':' | '/' | '\\'))
        .collect()
}

/// **(internal)** Translate a Boolean rule into BMA's min/max arithmetic.
fn bma_formula(function: &Expr, id_map: &HashMap<SpeciesId, u32>, granularity: u32) -> String {
    match function {
        Expr::Const(true) => granularity.to_string(),
        Expr::Const(false) => "0".to_string(),
        Expr::Var(id) => match id_map.get(id) {
            Some(vid) => format!("var({})", vid),
            None => "0".to_string(),
        },
        Expr::Not(inner) => format!("(1 - {})", bma_formula(inner, id_map, granularity)),
        Expr::And(items) => fold_formula(items, "min", granularity.to_string(), id_map, granularity),
        Expr::Or(items) => fold_formula(items, "max", "0".to_string(), id_map, granularity),
    }
}

/// **(internal)** Fold an n-ary connective into nested binary min/max calls.
fn fold_formula(
    items: &[Expr],
    op: &str,
    unit: String,
    id_map: &HashMap<SpeciesId, u32>,
    granularity: u32,
) -> String {
    let mut parts = items.iter().map(|item| bma_formula(item, id_map, granularity));
    let first = match parts.next() {
        Some(first) => first,
        None => return unit,
    };
    parts.fold(first, |acc, next| format!("({}({},{}))", op, acc, next))
}
