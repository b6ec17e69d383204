//! Deterministic, collision-free naming of the exported qualitative species.
//!
//! Species sharing a biological name are disambiguated by appending suffixes
//! derived from their type, a distinctive modification, and their compartment —
//! in that order, only as far as needed. Groups that stay ambiguous get numeric
//! suffixes assigned by ascending source id. Export ids are sanitized into valid
//! SBML SIds and uniquified the same way.

use crate::{ReactionModel, Species, SpeciesId, SID_REGEX};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Maximum number of suffix refinements (type, modification, compartment).
const SUFFIX_LEVELS: usize = 3;

/// Rewrite every species name into a unique public name and assign a unique,
/// SId-safe export id. With `names_as_ids` the export id is derived from the
/// public name instead of the source id.
pub fn assign_names(model: &mut ReactionModel, names_as_ids: bool) {
    assign_public_names(model);
    assign_export_ids(model, names_as_ids);
}

/// Turn an arbitrary string into a valid SBML SId: every character outside
/// `[A-Za-z0-9_]` becomes `_`, and a leading digit (or an empty string) gets a
/// `_` prefix.
pub fn sanitize_sid(raw: &str) -> String {
    let mut out: String = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    let starts_with_digit = matches!(out.chars().next(), Some(c) if c.is_ascii_digit());
    if out.is_empty() || starts_with_digit {
        out.insert(0, '_');
    }
    debug_assert!(SID_REGEX.is_match(&out));
    out
}

/// **(internal)** The public-name disambiguation pass.
fn assign_public_names(model: &mut ReactionModel) {
    let ids: Vec<SpeciesId> = model.species_ids().collect();
    let mut level: HashMap<SpeciesId, usize> = ids.iter().map(|id| (*id, 0)).collect();

    // Refine ambiguous groups step by step; every round re-groups, so a suffix is
    // applied only where it is actually needed to disambiguate.
    for _ in 0..SUFFIX_LEVELS {
        let groups = group_by(model, &ids, &level);
        let mut changed = false;
        for members in groups.values() {
            if members.len() < 2 {
                continue;
            }
            for member in members {
                let current = level.get_mut(member).expect("species seen before");
                if *current < SUFFIX_LEVELS {
                    *current += 1;
                    changed = true;
                }
            }
        }
        if !changed {
            break;
        }
    }

    let mut names: HashMap<SpeciesId, String> = ids
        .iter()
        .map(|id| (*id, candidate_name(species_of(model, *id), level[id])))
        .collect();

    // Suffixes exhausted: number the remaining clashes by ascending source id,
    // the first occupant keeps the plain name.
    let mut taken: HashSet<String> = names.values().cloned().collect();
    let final_groups = group_by(model, &ids, &level);
    for (name, members) in final_groups {
        if members.len() < 2 {
            continue;
        }
        let mut members = members;
        members.sort_by(|a, b| species_of(model, *a).id.cmp(&species_of(model, *b).id));
        for member in members.iter().skip(1) {
            let mut tag = 0;
            let numbered = loop {
                tag += 1;
                let attempt = format!("{}_{}", name, tag);
                if !taken.contains(&attempt) {
                    break attempt;
                }
            };
            taken.insert(numbered.clone());
            names.insert(*member, numbered);
        }
    }

    for id in ids {
        let name = names.remove(&id).expect("species named above");
        if let Some(species) = model.get_species_mut(id) {
            species.name = name;
        }
    }
}

/// **(internal)** Group species by their candidate name at the current levels.
fn group_by(
    model: &ReactionModel,
    ids: &[SpeciesId],
    level: &HashMap<SpeciesId, usize>,
) -> BTreeMap<String, Vec<SpeciesId>> {
    let mut groups: BTreeMap<String, Vec<SpeciesId>> = BTreeMap::new();
    for id in ids {
        let name = candidate_name(species_of(model, *id), level[id]);
        groups.entry(name).or_default().push(*id);
    }
    groups
}

/// **(internal)** The name of a species with the first `level` suffixes applied.
/// A level whose suffix does not exist (proteins have no type suffix, species may
/// have no modifications) contributes nothing but still counts as consumed.
fn candidate_name(species: &Species, level: usize) -> String {
    let modification = species.modifications.iter().min().map(|m| m.as_str());
    let suffixes = [
        species.species_type.name_suffix(),
        modification,
        Some(species.compartment.as_str()),
    ];
    let mut name = species.name.clone();
    for suffix in suffixes.iter().take(level).flatten() {
        if !suffix.is_empty() {
            name.push('_');
            name.push_str(suffix);
        }
    }
    name
}

/// **(internal)** Fetch a species that is known to be live.
fn species_of(model: &ReactionModel, id: SpeciesId) -> &Species {
    model.get_species(id).expect("live species handle")
}

/// **(internal)** The export-id pass: sanitize, then uniquify per colliding group
/// by ascending source id.
fn assign_export_ids(model: &mut ReactionModel, names_as_ids: bool) {
    let ids: Vec<SpeciesId> = model.species_ids().collect();
    let mut groups: BTreeMap<String, Vec<SpeciesId>> = BTreeMap::new();
    for id in &ids {
        let species = species_of(model, *id);
        let base = if names_as_ids {
            sanitize_sid(&species.name)
        } else {
            sanitize_sid(&species.id)
        };
        groups.entry(base).or_default().push(*id);
    }

    let mut sids: HashMap<SpeciesId, String> = HashMap::new();
    let mut taken: HashSet<String> = groups.keys().cloned().collect();
    for (base, members) in groups {
        let mut members = members;
        members.sort_by(|a, b| species_of(model, *a).id.cmp(&species_of(model, *b).id));
        for (position, member) in members.iter().enumerate() {
            if position == 0 {
                sids.insert(*member, base.clone());
                continue;
            }
            let mut tag = 0;
            let numbered = loop {
                tag += 1;
                let attempt = format!("{}_{}", base, tag);
                if !taken.contains(&attempt) {
                    break attempt;
                }
            };
            taken.insert(numbered.clone());
            sids.insert(*member, numbered);
        }
    }

    for id in ids {
        let sid = sids.remove(&id).expect("species assigned above");
        if let Some(species) = model.get_species_mut(id) {
            species.sid = Some(sid);
        }
    }
}
