//! Fixed-value overrides: pinning selected species to a Boolean constant.
//!
//! The override file is a two-column CSV (`name,value` with `value` in `{0,1}`)
//! and models knock-outs, knock-ins and fixed inputs. Names are matched against
//! the public names assigned by the naming stage; a row that matches nothing is
//! reported as a warning and skipped.

use crate::{Expr, ReactionModel};

/// Parse the contents of a fixed-values file. Empty lines and `#` comments are
/// skipped; any other line must be `name,value` with a 0/1 value.
pub fn parse_fixed_values(text: &str) -> Result<Vec<(String, bool)>, String> {
    let mut rows = Vec::new();
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let segments: Vec<&str> = trimmed.split(',').collect();
        if segments.len() != 2 {
            return Err(format!("Unexpected line: `{}`", line));
        }
        let name = segments[0].trim().to_string();
        let value = match segments[1].trim() {
            "0" => false,
            "1" => true,
            other => {
                return Err(format!(
                    "Fixed value for `{}` must be 0 or 1, got `{}`.",
                    name, other
                ))
            }
        };
        rows.push((name, value));
    }
    Ok(rows)
}

/// Pin every listed species to its constant: the formula is replaced and the
/// `fixed_value` marker recorded. Species without a formula (free inputs) are
/// pinned as well.
pub fn apply_fixed_values(
    model: &mut ReactionModel,
    rows: &[(String, bool)],
    warnings: &mut Vec<String>,
) {
    for (name, value) in rows {
        let matches = model.species_by_name(name);
        if matches.is_empty() {
            warnings.push(format!(
                "Fixed value for `{}` does not match any species; row skipped.",
                name
            ));
            continue;
        }
        for id in matches {
            if let Some(species) = model.get_species_mut(id) {
                species.fixed_value = Some(*value);
                species.function = Some(Expr::Const(*value));
            }
        }
    }
}
