//! End-to-end tests: a small CellDesigner document through the reader, the full
//! pipeline and the writers.

use cd2qual::celldesigner::read_celldesigner;
use cd2qual::export::{bnet, csv, qual, sif};
use cd2qual::pipeline::{compile, Conversion, Options};
use cd2qual::{Expr, ModifierKind, Reaction, ReactionModel, ReactionType, Species, SpeciesType};

const CATALYSIS_MAP: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<sbml xmlns="http://www.sbml.org/sbml/level2/version4"
      xmlns:celldesigner="http://www.sbml.org/2001/ns/celldesigner"
      xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
      xmlns:bqbiol="http://biomodels.net/biology-qualifiers/"
      level="2" version="4">
<model id="m1">
<annotation>
<celldesigner:extension>
<celldesigner:modelDisplay sizeX="600" sizeY="400"/>
<celldesigner:listOfCompartmentAliases>
<celldesigner:compartmentAlias id="ca1" compartment="c1"/>
</celldesigner:listOfCompartmentAliases>
<celldesigner:listOfSpeciesAliases>
<celldesigner:speciesAlias id="sa1" species="s1" compartmentAlias="ca1">
<celldesigner:bounds x="10" y="20" w="80" h="25"/>
</celldesigner:speciesAlias>
<celldesigner:speciesAlias id="sa2" species="s2" compartmentAlias="ca1">
<celldesigner:bounds x="110" y="20" w="80" h="25"/>
</celldesigner:speciesAlias>
<celldesigner:speciesAlias id="sa3" species="s3" compartmentAlias="ca1">
<celldesigner:bounds x="210" y="20" w="80" h="25"/>
</celldesigner:speciesAlias>
</celldesigner:listOfSpeciesAliases>
</celldesigner:extension>
</annotation>
<listOfCompartments>
<compartment id="c1" name="cytosol"/>
</listOfCompartments>
<listOfSpecies>
<species id="s1" name="S">
<annotation>
<rdf:RDF><rdf:Description rdf:about="#s1">
<bqbiol:is><rdf:Bag><rdf:li rdf:resource="urn:miriam:uniprot:P01234"/></rdf:Bag></bqbiol:is>
</rdf:Description></rdf:RDF>
</annotation>
</species>
<species id="s2" name="E"/>
<species id="s3" name="P"/>
</listOfSpecies>
<listOfReactions>
<reaction id="re1">
<annotation>
<celldesigner:extension>
<celldesigner:reactionType>STATE_TRANSITION</celldesigner:reactionType>
<celldesigner:baseReactants>
<celldesigner:baseReactant species="s1" alias="sa1"/>
</celldesigner:baseReactants>
<celldesigner:baseProducts>
<celldesigner:baseProduct species="s3" alias="sa3"/>
</celldesigner:baseProducts>
<celldesigner:listOfModification>
<celldesigner:modification type="CATALYSIS" modifiers="s2" aliases="sa2"/>
</celldesigner:listOfModification>
</celldesigner:extension>
</annotation>
</reaction>
</listOfReactions>
</model>
</sbml>"##;

fn convert(options: &Options) -> Conversion {
    let mut warnings = Vec::new();
    let model = read_celldesigner(CATALYSIS_MAP, &mut warnings).unwrap();
    assert!(warnings.is_empty(), "unexpected warnings: {:?}", warnings);
    compile(model, options).unwrap()
}

#[test]
fn celldesigner_catalysis_round_trip() {
    let conversion = convert(&Options::default());
    let model = &conversion.model;
    assert_eq!(3, model.num_species());
    assert_eq!(Some((600.0, 400.0)), model.map_size);

    let s = model.find_species("sa1").unwrap();
    let e = model.find_species("sa2").unwrap();
    let p = model.find_species("sa3").unwrap();

    let species = model.get_species(s).unwrap();
    assert_eq!("S", species.name);
    assert_eq!("cytosol", species.compartment);
    assert_eq!(1, species.annotations.len());
    assert_eq!(10.0, species.layout.x);

    // P.formula = E AND S; S and E are free inputs.
    let formula = model.get_species(p).unwrap().function.clone().unwrap();
    assert_eq!(
        Expr::mk_and(vec![Expr::mk_var(e), Expr::mk_var(s)]),
        formula
    );
    assert!(model.get_species(s).unwrap().function.is_none());

    // Influences: S -> P and E -> P, both positive.
    assert_eq!(2, conversion.influences.len());
}

#[test]
fn writers_agree_on_the_same_model() {
    let conversion = convert(&Options::default());

    let mut buffer: Vec<u8> = Vec::new();
    qual::write_qual(&mut buffer, &conversion.model, &conversion.influences).unwrap();
    let sbml = String::from_utf8(buffer).unwrap();
    assert!(sbml.contains("qual:name=\"P\""));
    assert!(sbml.contains("<compartment constant=\"true\" id=\"comp_cytosol\" name=\"cytosol\"/>"));
    assert!(sbml.contains("rdf:resource=\"urn:miriam:uniprot:P01234\""));

    let mut buffer: Vec<u8> = Vec::new();
    csv::write_csv(&mut buffer, &conversion.model).unwrap();
    let csv_text = String::from_utf8(buffer).unwrap();
    assert!(csv_text.contains("sa3,P,(E & S),sa3"));

    let mut buffer: Vec<u8> = Vec::new();
    bnet::write_bnet(&mut buffer, &conversion.model).unwrap();
    let bnet_text = String::from_utf8(buffer).unwrap();
    assert!(bnet_text.contains("sa3, (sa2 & sa1)"));

    let mut buffer: Vec<u8> = Vec::new();
    sif::write_sif(&mut buffer, &conversion.model, &conversion.influences).unwrap();
    let sif_text = String::from_utf8(buffer).unwrap();
    assert!(sif_text.contains("sa1 + sa3"));
    assert!(sif_text.contains("sa2 + sa3"));
}

#[test]
fn conversion_is_byte_identical_across_runs() {
    let first = convert(&Options::default());
    let second = convert(&Options::default());
    let mut left: Vec<u8> = Vec::new();
    qual::write_qual(&mut left, &first.model, &first.influences).unwrap();
    let mut right: Vec<u8> = Vec::new();
    qual::write_qual(&mut right, &second.model, &second.influences).unwrap();
    assert_eq!(left, right);
}

#[test]
fn names_as_ids_swaps_export_ids() {
    let mut options = Options::default();
    options.names_as_ids = true;
    let conversion = convert(&options);
    let p = conversion.model.find_species("sa3").unwrap();
    assert_eq!(
        Some("P".to_string()),
        conversion.model.get_species(p).unwrap().sid
    );
}

#[test]
fn fixed_overrides_pin_inputs() {
    let mut options = Options::default();
    options.fixed_values = vec![("E".to_string(), true), ("missing".to_string(), false)];
    let conversion = convert(&options);
    assert_eq!(1, conversion.warnings.len());
    let e = conversion.model.find_species("sa2").unwrap();
    assert_eq!(
        Some(Expr::mk_true()),
        conversion.model.get_species(e).unwrap().function
    );
}

/// The minimal heterodimer scenario: A + B -> C collapses into a single
/// constantly-produced complex carrying the merged annotations.
#[test]
fn minimal_heterodimer_scenario() {
    let mut model = ReactionModel::new();
    model.add_species(Species::new("sa1", "A")).unwrap();
    model.add_species(Species::new("sa2", "B")).unwrap();
    let mut complex = Species::new("sa3", "C");
    complex.species_type = SpeciesType::Complex;
    model.add_species(complex).unwrap();
    let mut reaction = Reaction::new("re1", ReactionType::HeterodimerAssociation);
    reaction.reactants = vec![
        model.find_species("sa1").unwrap(),
        model.find_species("sa2").unwrap(),
    ];
    reaction.products = vec![model.find_species("sa3").unwrap()];
    model.add_reaction(reaction).unwrap();

    let conversion = compile(model, &Options::default()).unwrap();
    assert_eq!(1, conversion.model.num_species());
    let c = conversion.model.find_species("sa3").unwrap();
    assert_eq!(
        Some(Expr::mk_true()),
        conversion.model.get_species(c).unwrap().function
    );
}

/// Upstream-cone scenario: a chain A -> B -> C -> D plus an isolated X -> Y;
/// restricting upstream of D keeps exactly the chain.
#[test]
fn upstream_cone_scenario() {
    let mut model = ReactionModel::new();
    for (id, name) in [
        ("sa1", "A"),
        ("sa2", "B"),
        ("sa3", "C"),
        ("sa4", "D"),
        ("sa5", "X"),
        ("sa6", "Y"),
    ] {
        model.add_species(Species::new(id, name)).unwrap();
    }
    for (n, (from, to)) in [("sa1", "sa2"), ("sa2", "sa3"), ("sa3", "sa4"), ("sa5", "sa6")]
        .iter()
        .enumerate()
    {
        let mut reaction = Reaction::new(&format!("re{}", n), ReactionType::StateTransition);
        reaction.reactants = vec![model.find_species(from).unwrap()];
        reaction.products = vec![model.find_species(to).unwrap()];
        model.add_reaction(reaction).unwrap();
    }

    let mut options = Options::default();
    options.upstream = vec!["D".to_string()];
    let conversion = compile(model, &options).unwrap();
    assert_eq!(4, conversion.model.num_species());
    assert!(conversion.model.find_species("sa4").is_some());
    assert!(conversion.model.find_species("sa5").is_none());
}

/// Catalysis with an added inhibitor: P = E AND S AND NOT I.
#[test]
fn catalysis_with_inhibitor_scenario() {
    let mut model = ReactionModel::new();
    let e = model.add_species(Species::new("sa1", "E")).unwrap();
    let s = model.add_species(Species::new("sa2", "S")).unwrap();
    let i = model.add_species(Species::new("sa3", "I")).unwrap();
    let p = model.add_species(Species::new("sa4", "P")).unwrap();
    let mut reaction = Reaction::new("re1", ReactionType::StateTransition);
    reaction.reactants = vec![s];
    reaction.products = vec![p];
    reaction.modifiers = vec![(e, ModifierKind::Catalyst), (i, ModifierKind::Inhibitor)];
    model.add_reaction(reaction).unwrap();

    let conversion = compile(model, &Options::default()).unwrap();
    let formula = conversion
        .model
        .get_species(p)
        .unwrap()
        .function
        .clone()
        .unwrap();
    assert_eq!(
        Expr::mk_and(vec![
            Expr::mk_var(e),
            Expr::mk_var(s),
            Expr::mk_not(Expr::mk_var(i)),
        ]),
        formula
    );
}
