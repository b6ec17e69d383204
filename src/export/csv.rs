//! The CSV sidecar: one `id,name,formula,alias` row per species, where `alias`
//! is the source id of the glyph the species came from.

use crate::export::sid_of;
use crate::ReactionModel;
use std::io::{Error, Write};

/// Write the species table in CSV format.
pub fn write_csv(out: &mut dyn Write, model: &ReactionModel) -> Result<(), Error> {
    writeln!(out, "id,name,formula,alias")?;
    for (id, species) in model.species_iter() {
        let formula = species
            .function
            .as_ref()
            .map(|function| function.to_text(model))
            .unwrap_or_default();
        writeln!(
            out,
            "{},{},{},{}",
            csv_field(&sid_of(model, id)),
            csv_field(&species.name),
            csv_field(&formula),
            csv_field(&species.id)
        )?;
    }
    Ok(())
}

/// **(internal)** Quote a field if it contains a separator, quote or newline.
fn csv_field(raw: &str) -> String {
    if raw.contains(',') || raw.contains('"') || raw.contains('\n') {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}
