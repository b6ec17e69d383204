use crate::{MiriamQualifier, Modification, ModifierKind, ReactionType, Sign, SpeciesType};

impl SpeciesType {
    /// Parse a CellDesigner `celldesigner:class` value. Values outside the closed
    /// vocabulary map to `Unknown`.
    pub fn from_celldesigner(class: &str) -> SpeciesType {
        match class {
            "PROTEIN" => SpeciesType::Protein,
            "RECEPTOR" => SpeciesType::Receptor,
            "GENE" => SpeciesType::Gene,
            "RNA" => SpeciesType::Rna,
            "ANTISENSE_RNA" => SpeciesType::AntisenseRna,
            "PHENOTYPE" => SpeciesType::Phenotype,
            "ION" => SpeciesType::Ion,
            "SIMPLE_MOLECULE" => SpeciesType::SimpleMolecule,
            "DRUG" => SpeciesType::Drug,
            "COMPLEX" => SpeciesType::Complex,
            "DEGRADED" => SpeciesType::Degraded,
            _ => SpeciesType::Unknown,
        }
    }

    /// The suffix the naming stage may append to disambiguate species that share
    /// a biological name. Proteins are the default kind and contribute nothing.
    pub fn name_suffix(self) -> Option<&'static str> {
        match self {
            SpeciesType::Protein => None,
            SpeciesType::Receptor => Some("receptor"),
            SpeciesType::Gene => Some("gene"),
            SpeciesType::Rna => Some("rna"),
            SpeciesType::AntisenseRna => Some("antisense_rna"),
            SpeciesType::Phenotype => Some("phenotype"),
            SpeciesType::Ion => Some("ion"),
            SpeciesType::SimpleMolecule => Some("simple_molecule"),
            SpeciesType::Drug => Some("drug"),
            SpeciesType::Complex => Some("complex"),
            SpeciesType::Degraded => Some("degraded"),
            SpeciesType::Unknown => None,
        }
    }
}

impl Modification {
    /// Parse a CellDesigner modification `state` attribute (or a structural state).
    pub fn from_state(state: &str) -> Modification {
        match state {
            "phosphorylated" => Modification::Phosphorylated,
            "acetylated" => Modification::Acetylated,
            "ubiquitinated" => Modification::Ubiquitinated,
            "methylated" => Modification::Methylated,
            "hydroxylated" => Modification::Hydroxylated,
            "glycosylated" => Modification::Glycosylated,
            "myristoylated" => Modification::Myristoylated,
            "palmytoylated" => Modification::Palmytoylated,
            "prenylated" => Modification::Prenylated,
            "protonated" => Modification::Protonated,
            "sulfated" => Modification::Sulfated,
            "active" => Modification::Active,
            "empty" => Modification::Empty,
            "don't care" => Modification::DontCare,
            _ => Modification::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Modification::Phosphorylated => "phosphorylated",
            Modification::Acetylated => "acetylated",
            Modification::Ubiquitinated => "ubiquitinated",
            Modification::Methylated => "methylated",
            Modification::Hydroxylated => "hydroxylated",
            Modification::Glycosylated => "glycosylated",
            Modification::Myristoylated => "myristoylated",
            Modification::Palmytoylated => "palmytoylated",
            Modification::Prenylated => "prenylated",
            Modification::Protonated => "protonated",
            Modification::Sulfated => "sulfated",
            Modification::Active => "active",
            Modification::Empty => "empty",
            Modification::DontCare => "dont_care",
            Modification::Unknown => "unknown",
        }
    }
}

impl ModifierKind {
    /// Parse a CellDesigner reaction-modification `type` attribute. Boolean logic
    /// gates and unrecognised kinds return `None` (the reader warns and skips).
    pub fn from_celldesigner(kind: &str) -> Option<ModifierKind> {
        match kind {
            "CATALYSIS" | "UNKNOWN_CATALYSIS" => Some(ModifierKind::Catalyst),
            "TRANSCRIPTIONAL_ACTIVATION" | "TRANSLATIONAL_ACTIVATION" => {
                Some(ModifierKind::TranscriptionalActivator)
            }
            "PHYSICAL_STIMULATION" => Some(ModifierKind::PhysicalStimulation),
            "MODULATION" => Some(ModifierKind::Modulator),
            "TRIGGER" => Some(ModifierKind::Trigger),
            "INHIBITION" => Some(ModifierKind::Inhibitor),
            "UNKNOWN_INHIBITION" => Some(ModifierKind::UnknownNegative),
            "TRANSCRIPTIONAL_INHIBITION" | "TRANSLATIONAL_INHIBITION" => {
                Some(ModifierKind::TranscriptionalInhibitor)
            }
            _ => None,
        }
    }

    /// The polarity this kind contributes to the influence graph and to rules.
    pub fn sign(self) -> Sign {
        match self {
            ModifierKind::Catalyst
            | ModifierKind::TranscriptionalActivator
            | ModifierKind::PhysicalStimulation
            | ModifierKind::UnknownPositive
            | ModifierKind::Modulator
            | ModifierKind::Trigger => Sign::Positive,
            ModifierKind::Inhibitor
            | ModifierKind::UnknownNegative
            | ModifierKind::TranscriptionalInhibitor => Sign::Negative,
        }
    }

    pub fn is_positive(self) -> bool {
        self.sign() == Sign::Positive
    }

    pub fn is_negative(self) -> bool {
        self.sign() == Sign::Negative
    }
}

impl ReactionType {
    /// Parse a CellDesigner `reactionType` value. Unrecognised values map to
    /// `Unknown` so that exotic dialect extensions degrade gracefully.
    pub fn from_celldesigner(value: &str) -> ReactionType {
        match value {
            "STATE_TRANSITION" => ReactionType::StateTransition,
            "KNOWN_TRANSITION_OMITTED" => ReactionType::KnownTransitionOmitted,
            "UNKNOWN_TRANSITION" => ReactionType::UnknownTransition,
            "TRANSPORT" => ReactionType::Transport,
            "TRUNCATION" => ReactionType::Truncation,
            "TRANSCRIPTION" => ReactionType::Transcription,
            "TRANSLATION" => ReactionType::Translation,
            "HETERODIMER_ASSOCIATION" => ReactionType::HeterodimerAssociation,
            "DISSOCIATION" => ReactionType::Dissociation,
            "POSITIVE_INFLUENCE" | "TRUE_POSITIVE_INFLUENCE" => ReactionType::PositiveInfluence,
            "NEGATIVE_INFLUENCE" | "TRUE_NEGATIVE_INFLUENCE" => ReactionType::NegativeInfluence,
            "UNKNOWN_POSITIVE_INFLUENCE" => ReactionType::UnknownPositiveInfluence,
            "UNKNOWN_NEGATIVE_INFLUENCE" => ReactionType::UnknownNegativeInfluence,
            "REDUCED_PHYSICAL_STIMULATION" => ReactionType::ReducedPhysicalStimulation,
            "REDUCED_MODULATION" => ReactionType::ReducedModulation,
            "REDUCED_INHIBITION" => ReactionType::ReducedInhibition,
            "REDUCED_TRIGGER" => ReactionType::ReducedTrigger,
            _ => ReactionType::Unknown,
        }
    }

    /// True for reaction types that carry a negative meaning. Used when reactions
    /// targetting a phenotype are folded into modifiers.
    pub fn is_negative_influence(self) -> bool {
        matches!(
            self,
            ReactionType::NegativeInfluence
                | ReactionType::UnknownNegativeInfluence
                | ReactionType::ReducedInhibition
        )
    }
}

impl MiriamQualifier {
    /// Parse a tag name from the `bqbiol` namespace.
    pub fn from_biology(tag: &str) -> MiriamQualifier {
        match tag {
            "is" => MiriamQualifier::Is,
            "hasPart" => MiriamQualifier::HasPart,
            "isPartOf" => MiriamQualifier::IsPartOf,
            "isVersionOf" => MiriamQualifier::IsVersionOf,
            "hasVersion" => MiriamQualifier::HasVersion,
            "isHomologTo" => MiriamQualifier::IsHomologTo,
            "isDescribedBy" => MiriamQualifier::IsDescribedBy,
            "isEncodedBy" => MiriamQualifier::IsEncodedBy,
            "encodes" => MiriamQualifier::Encodes,
            "occursIn" => MiriamQualifier::OccursIn,
            "hasProperty" => MiriamQualifier::HasProperty,
            "isPropertyOf" => MiriamQualifier::IsPropertyOf,
            "hasTaxon" => MiriamQualifier::HasTaxon,
            _ => MiriamQualifier::Unknown,
        }
    }

    /// Parse a tag name from the `bqmodel` namespace.
    pub fn from_model(tag: &str) -> MiriamQualifier {
        match tag {
            "is" => MiriamQualifier::ModelIs,
            "isDerivedFrom" => MiriamQualifier::ModelIsDerivedFrom,
            "isDescribedBy" => MiriamQualifier::ModelIsDescribedBy,
            _ => MiriamQualifier::Unknown,
        }
    }

    /// The qualified tag written on export, e.g. `bqbiol:is`.
    pub fn as_tag(self) -> &'static str {
        match self {
            MiriamQualifier::Is => "bqbiol:is",
            MiriamQualifier::HasPart => "bqbiol:hasPart",
            MiriamQualifier::IsPartOf => "bqbiol:isPartOf",
            MiriamQualifier::IsVersionOf => "bqbiol:isVersionOf",
            MiriamQualifier::HasVersion => "bqbiol:hasVersion",
            MiriamQualifier::IsHomologTo => "bqbiol:isHomologTo",
            MiriamQualifier::IsDescribedBy => "bqbiol:isDescribedBy",
            MiriamQualifier::IsEncodedBy => "bqbiol:isEncodedBy",
            MiriamQualifier::Encodes => "bqbiol:encodes",
            MiriamQualifier::OccursIn => "bqbiol:occursIn",
            MiriamQualifier::HasProperty => "bqbiol:hasProperty",
            MiriamQualifier::IsPropertyOf => "bqbiol:isPropertyOf",
            MiriamQualifier::HasTaxon => "bqbiol:hasTaxon",
            MiriamQualifier::ModelIs => "bqmodel:is",
            MiriamQualifier::ModelIsDerivedFrom => "bqmodel:isDerivedFrom",
            MiriamQualifier::ModelIsDescribedBy => "bqmodel:isDescribedBy",
            MiriamQualifier::Unknown => "bqbiol:unknown",
        }
    }
}
