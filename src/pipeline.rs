//! The end-to-end compilation pipeline: reduction, abstraction, rule synthesis,
//! pruning, naming, fixed overrides and simplification, in that order.
//!
//! The pipeline is a pure function of the parsed model and its `Options`; the
//! only side channel is logging. Warnings are accumulated and handed back to the
//! caller together with the final model and its influence arcs.

use crate::{abstraction, fixed, naming, prune, reduce, rules};
use crate::{Influence, ReactionModel};
use thiserror::Error;

/// Everything that can abort a conversion.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// The input file could not be understood at all.
    #[error("malformed input: {0}")]
    MalformedInput(String),
    /// A stage left a reference to a deleted species behind. This is a bug in
    /// the pipeline, not in the input.
    #[error("dangling reference: {0}")]
    DanglingReference(String),
    /// An emitter failed to write its output.
    #[error("write error: {0}")]
    Writer(#[from] std::io::Error),
}

/// User-facing parameters of the compilation (see the CLI for their flags).
#[derive(Clone, Debug, Default)]
pub struct Options {
    /// Connected-component threshold (`-r`): positive drops small components,
    /// negative keeps the largest ones, zero disables the filter.
    pub component_threshold: i32,
    /// Keep only species upstream of these names (`-u`).
    pub upstream: Vec<String>,
    /// Keep only species downstream of these names (`-d`).
    pub downstream: Vec<String>,
    /// Derive export ids from names instead of source ids (`-n`).
    pub names_as_ids: bool,
    /// Parsed rows of the fixed-values file (`-f`).
    pub fixed_values: Vec<(String, bool)>,
}

/// The result of a successful conversion.
#[derive(Clone, Debug)]
pub struct Conversion {
    pub model: ReactionModel,
    /// The signed influence arcs between the surviving species.
    pub influences: Vec<Influence>,
    /// Non-fatal problems encountered along the way.
    pub warnings: Vec<String>,
}

/// Run the whole pipeline on a freshly parsed model.
pub fn compile(mut model: ReactionModel, options: &Options) -> Result<Conversion, ConversionError> {
    let mut warnings = Vec::new();

    reduce::reduce(&mut model).map_err(ConversionError::DanglingReference)?;
    rules::build_rules(&mut model);
    prune::prune(
        &mut model,
        options.component_threshold,
        &options.upstream,
        &options.downstream,
        &mut warnings,
    );
    naming::assign_names(&mut model, options.names_as_ids);
    fixed::apply_fixed_values(&mut model, &options.fixed_values, &mut warnings);
    rules::simplify_rules(&mut model);

    model
        .check_integrity()
        .map_err(ConversionError::DanglingReference)?;
    if model.num_species() == 0 {
        warnings.push("No species remain after processing; the output model is empty.".to_string());
    }

    let influences = abstraction::influences(&model);
    Ok(Conversion {
        model,
        influences,
        warnings,
    })
}
