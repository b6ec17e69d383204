//! Command-line entry point: convert a CellDesigner map into an SBML-qual (or
//! BMA JSON) Boolean model, with optional CSV/BNet and SIF sidecars.

use cd2qual::celldesigner::read_celldesigner;
use cd2qual::export::bma::{self, BmaOptions};
use cd2qual::export::{bnet, csv, qual, sif};
use cd2qual::fixed::parse_fixed_values;
use cd2qual::pipeline::{compile, Conversion, ConversionError, Options};
use clap::Parser;
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "cd2qual",
    version,
    about = "Convert CellDesigner models to SBML-qual with a rather strict semantics."
)]
struct Cli {
    /// CellDesigner file.
    infile: PathBuf,

    /// SBML-qual/BMA json file (defaults to the input name with an .sbml extension).
    outfile: Option<PathBuf>,

    /// Display a lot of debug information.
    #[arg(short = 'D', long)]
    debug: bool,

    /// Store the species information in a separate CSV (and .bnet) file.
    #[arg(short, long)]
    csv: bool,

    /// Store the influence information in a separate SIF file.
    #[arg(short, long)]
    sif: bool,

    /// Delete connected components if their size is smaller than S.
    /// A negative S keeps only the biggest component(s).
    #[arg(short, long, value_name = "S", default_value_t = 0, allow_negative_numbers = true)]
    remove: i32,

    /// A CSV file with input values or knock-ins/knock-outs, one name,value row per line.
    #[arg(short, long, value_name = "PATH")]
    fixed: Option<PathBuf>,

    /// Use the names as IDs in the SBML file.
    #[arg(short, long)]
    names: bool,

    /// Only species upstream of this/these species will be kept.
    #[arg(short, long, num_args = 0..)]
    upstream: Vec<String>,

    /// Only species downstream of this/these species will be kept.
    #[arg(short, long, num_args = 0..)]
    downstream: Vec<String>,

    /// Output to BMA json format.
    #[arg(short, long)]
    bma: bool,

    /// When exporting to BMA, use this granularity.
    #[arg(short, long, default_value_t = 1)]
    granularity: u32,

    /// When exporting to BMA, nodes with no input should be set to this value.
    #[arg(short, long)]
    input: Option<u32>,

    /// When exporting to BMA, colour all variables pink (defaults to colour by compartment).
    #[arg(short = 'C', long = "colourConstant")]
    colour_constant: bool,
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.debug {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(error) = run(cli) {
        tracing::error!("{}", error);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), ConversionError> {
    tracing::debug!("parsing {}…", cli.infile.display());
    let text = fs::read_to_string(&cli.infile).map_err(|error| {
        ConversionError::MalformedInput(format!("cannot read {}: {}", cli.infile.display(), error))
    })?;
    let mut warnings = Vec::new();
    let model = read_celldesigner(&text, &mut warnings).map_err(ConversionError::MalformedInput)?;

    let fixed_values = match &cli.fixed {
        Some(path) => {
            let rows = fs::read_to_string(path).map_err(|error| {
                ConversionError::MalformedInput(format!(
                    "cannot read {}: {}",
                    path.display(),
                    error
                ))
            })?;
            parse_fixed_values(&rows).map_err(ConversionError::MalformedInput)?
        }
        None => Vec::new(),
    };

    let options = Options {
        component_threshold: cli.remove,
        upstream: cli.upstream.clone(),
        downstream: cli.downstream.clone(),
        names_as_ids: cli.names,
        fixed_values,
    };
    let mut conversion = compile(model, &options)?;
    warnings.append(&mut conversion.warnings);
    for warning in &warnings {
        tracing::warn!("{}", warning);
    }

    let outfile = cli
        .outfile
        .clone()
        .unwrap_or_else(|| cli.infile.with_extension("sbml"));
    write_main_output(&cli, &conversion, &outfile)?;
    write_sidecars(&cli, &conversion, &outfile)?;
    Ok(())
}

fn write_main_output(
    cli: &Cli,
    conversion: &Conversion,
    outfile: &Path,
) -> Result<(), ConversionError> {
    let mut out = BufWriter::new(fs::File::create(outfile)?);
    if cli.bma {
        let options = BmaOptions {
            granularity: cli.granularity,
            input_level: cli.input,
            colour_by_compartment: !cli.colour_constant,
        };
        bma::write_bma(&mut out, &conversion.model, &conversion.influences, &options)?;
    } else {
        qual::write_qual(&mut out, &conversion.model, &conversion.influences)?;
    }
    Ok(())
}

fn write_sidecars(
    cli: &Cli,
    conversion: &Conversion,
    outfile: &Path,
) -> Result<(), ConversionError> {
    if cli.csv {
        let mut out = BufWriter::new(fs::File::create(outfile.with_extension("csv"))?);
        csv::write_csv(&mut out, &conversion.model)?;
        let mut out = BufWriter::new(fs::File::create(outfile.with_extension("bnet"))?);
        bnet::write_bnet(&mut out, &conversion.model)?;
    }
    if cli.sif {
        let mut out = BufWriter::new(fs::File::create(outfile.with_extension("sif"))?);
        sif::write_sif(&mut out, &conversion.model, &conversion.influences)?;
    }
    Ok(())
}
