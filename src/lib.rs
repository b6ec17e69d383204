//! A library for compiling CellDesigner / SBGN-PD reaction maps into executable Boolean
//! models. As of now, the library supports:
//!  - An in-memory reaction hypergraph with typed species, reactions, modifiers,
//!    MIRIAM annotations and layout.
//!  - A confluent graph-rewriting pass that collapses redundant species
//!    (receptor dimerisation, complex formation, same-name passthroughs, transports).
//!  - Abstraction of the surviving reactions into a signed influence graph and
//!    synthesis of one Boolean update rule per species.
//!  - Topology-based pruning (connected-component threshold, upstream/downstream
//!    influence cones) with deterministic tie-breaking.
//!  - Export to SBML-qual, SIF, CSV, BoolNet `.bnet` and BMA JSON.
//!
//! The pipeline is a pure function of (model, parameters); see the [pipeline] module.

#[macro_use]
extern crate lazy_static;

use indexmap::IndexMap;
use regex::Regex;
use std::collections::HashMap;

pub mod abstraction;
pub mod celldesigner;
pub mod export;
pub mod fixed;
pub mod influence_graph;
pub mod naming;
pub mod pipeline;
pub mod prune;
pub mod reduce;
pub mod rules;

/// **(internal)** Implements the MIRIAM annotation bag.
mod _impl_annotation_bag;
/// **(internal)** Constructors and utility methods for `Expr`.
mod _impl_expr;
/// **(internal)** Boolean-identity simplification of `Expr`.
mod _impl_expr_simplify;
/// **(internal)** Utility methods for `ReactionId`.
mod _impl_reaction_id;
/// **(internal)** The reaction hypergraph store.
mod _impl_reaction_model;
/// **(internal)** Utility methods for `SpeciesId`.
mod _impl_species_id;
/// **(internal)** Closed CellDesigner vocabularies and their string forms.
mod _impl_vocabulary;

/// **(internal)** A regex string of a valid SBML SId.
const SID_REGEX_STR: &str = r"^[a-zA-Z_][a-zA-Z0-9_]*$";

lazy_static! {
    /// A regular expression that matches identifiers which are safe to use as
    /// SBML SIds (and consequently as `.bnet` or SIF identifiers).
    pub static ref SID_REGEX: Regex = Regex::new(SID_REGEX_STR).unwrap();
}

/// A type-safe index of a `Species` inside a `ReactionModel`.
///
/// Species are always addressed through these handles; the handle stays valid for
/// the lifetime of the model, although the species it points to may be deleted or
/// merged away by the reduction pass.
///
/// **Warning:** Do not mix handles between different models!
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct SpeciesId(usize);

/// A type-safe index of a `Reaction` inside a `ReactionModel`.
///
/// **Warning:** Do not mix handles between different models!
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ReactionId(usize);

/// The CellDesigner class of a species. `Receptor` is surfaced as its own type
/// (CellDesigner models it as a protein whose reference protein has type
/// `RECEPTOR`) because the reduction pass treats receptors specially.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SpeciesType {
    Protein,
    Receptor,
    Gene,
    Rna,
    AntisenseRna,
    Phenotype,
    Ion,
    SimpleMolecule,
    Drug,
    Complex,
    Degraded,
    Unknown,
}

/// A residue modification state (or structural activity) attached to a species.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Modification {
    Phosphorylated,
    Acetylated,
    Ubiquitinated,
    Methylated,
    Hydroxylated,
    Glycosylated,
    Myristoylated,
    Palmytoylated,
    Prenylated,
    Protonated,
    Sulfated,
    Active,
    Empty,
    DontCare,
    Unknown,
}

/// The role a modifier species plays in a reaction.
///
/// Every kind has a fixed polarity: see `ModifierKind::sign`. Positive modifiers
/// act as any-one-suffices activators during rule synthesis, negative modifiers
/// as mandatory absences.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ModifierKind {
    Catalyst,
    TranscriptionalActivator,
    PhysicalStimulation,
    UnknownPositive,
    Modulator,
    Trigger,
    Inhibitor,
    UnknownNegative,
    TranscriptionalInhibitor,
}

/// The CellDesigner reaction type of a hyperedge.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ReactionType {
    StateTransition,
    KnownTransitionOmitted,
    UnknownTransition,
    Transport,
    Truncation,
    Transcription,
    Translation,
    HeterodimerAssociation,
    Dissociation,
    PositiveInfluence,
    NegativeInfluence,
    UnknownPositiveInfluence,
    UnknownNegativeInfluence,
    ReducedPhysicalStimulation,
    ReducedModulation,
    ReducedInhibition,
    ReducedTrigger,
    Unknown,
}

/// A sign enum that describes the polarity of influences.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Sign {
    Positive,
    Negative,
}

/// A MIRIAM controlled-vocabulary qualifier (the `bqbiol`/`bqmodel` namespaces).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MiriamQualifier {
    Is,
    HasPart,
    IsPartOf,
    IsVersionOf,
    HasVersion,
    IsHomologTo,
    IsDescribedBy,
    IsEncodedBy,
    Encodes,
    OccursIn,
    HasProperty,
    IsPropertyOf,
    HasTaxon,
    ModelIs,
    ModelIsDerivedFrom,
    ModelIsDescribedBy,
    Unknown,
}

/// An annotation bag: a mapping from MIRIAM qualifiers to insertion-ordered,
/// deduplicated lists of URIs. Merging two bags unions the URI lists per
/// qualifier, preserving first-seen order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AnnotationBag {
    entries: IndexMap<MiriamQualifier, Vec<String>>,
}

/// Position and size of a species glyph, copied verbatim from the source map.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayoutBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: Option<String>,
}

/// A biochemical entity of the map.
///
/// `name` starts out as the biological name from the source file and is rewritten
/// into a unique public name by the naming stage, which also fills in `sid`
/// (the SBML SId used on export). `function` is attached by the rule builder;
/// species that no surviving reaction produces keep `None` and act as free inputs.
#[derive(Clone, Debug)]
pub struct Species {
    pub id: String,
    pub name: String,
    pub compartment: String,
    pub species_type: SpeciesType,
    pub modifications: Vec<Modification>,
    pub layout: LayoutBox,
    pub annotations: AnnotationBag,
    pub function: Option<Expr>,
    pub fixed_value: Option<bool>,
    pub sid: Option<String>,
}

/// A reaction hyperedge: ordered reactants, products, and modifiers with their
/// kinds. The three collections are pairwise disjoint sets of species handles.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Reaction {
    pub id: String,
    pub reaction_type: ReactionType,
    pub reactants: Vec<SpeciesId>,
    pub products: Vec<SpeciesId>,
    pub modifiers: Vec<(SpeciesId, ModifierKind)>,
}

/// A signed arc of the influence graph, produced by the abstraction stage.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Influence {
    pub source: SpeciesId,
    pub target: SpeciesId,
    pub sign: Sign,
}

/// A Boolean update formula over species of a `ReactionModel`.
///
/// `And`/`Or` are n-ary; an empty conjunction is `true` and an empty disjunction
/// is `false`. The tree is plain owned data, no cycles are possible.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Expr {
    /// A true/false constant.
    Const(bool),
    /// References a model species.
    Var(SpeciesId),
    /// Negation.
    Not(Box<Expr>),
    /// N-ary conjunction.
    And(Vec<Expr>),
    /// N-ary disjunction.
    Or(Vec<Expr>),
}

/// What to do with the reactions incident to a species when it is deleted.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DeletePolicy {
    /// Delete every reaction that references the species in any role.
    DropReactions,
    /// Keep the reactions, removing the species from their reference lists.
    DetachReferences,
}

/// The reaction hypergraph: the single mutable state threaded through the
/// compilation pipeline.
///
/// Species and reactions live in two slot vectors indexed by `SpeciesId` /
/// `ReactionId`; a deleted entity leaves an empty slot so handles never shift.
/// Species merged away by the reduction pass leave a redirection in a
/// union-find-style forwarding map, so stale handles can be chased through
/// `ReactionModel::resolve` and rewired lazily by `ReactionModel::normalize`.
#[derive(Clone, Debug, Default)]
pub struct ReactionModel {
    species: Vec<Option<Species>>,
    reactions: Vec<Option<Reaction>>,
    species_index: HashMap<String, SpeciesId>,
    forwarded: HashMap<SpeciesId, SpeciesId>,
    /// Width and height of the source map, if the file declared them.
    pub map_size: Option<(f64, f64)>,
}
