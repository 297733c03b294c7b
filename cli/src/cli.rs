use clap::{Parser, Subcommand, ValueEnum, ValueHint};
use geodata_rdf::mapping::TripleOrder;
use geodata_rdf::{OutputStyle, DEFAULT_BASE_IRI, DEFAULT_ENDPOINT, DEFAULT_LAYER};
use std::path::PathBuf;

#[derive(Parser)]
#[command(about, version, name = "geodata-rdf")]
/// Converts agricultural parcel geodata into RDF Turtle
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
    /// Log debug information
    ///
    /// RUST_LOG is honoured if it is set.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,
    /// Only log warnings and errors and hide the progress bar
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Convert the parcels of a GeoPackage layer into a Turtle file
    Convert {
        /// GeoPackage to read
        #[arg(short, long, default_value = "data/data.gpkg", value_hint = ValueHint::FilePath)]
        input: PathBuf,
        /// Name of the parcel layer
        #[arg(short, long, default_value = DEFAULT_LAYER)]
        layer: String,
        /// Turtle file to write
        ///
        /// Missing parent directories are created.
        #[arg(short, long, default_value = "rdf/geodata.ttl", value_hint = ValueHint::FilePath)]
        output: PathBuf,
        /// SPARQL endpoint that is queried for the cantons
        #[arg(long, default_value = DEFAULT_ENDPOINT, value_hint = ValueHint::Url)]
        endpoint: String,
        /// Read the cantons from a CSV file with a `code` and a `canton` column instead of
        /// querying the endpoint
        #[arg(long, conflicts_with = "endpoint", value_hint = ValueHint::FilePath)]
        cantons_file: Option<PathBuf>,
        /// Base IRI of the generated vocabulary
        #[arg(long, default_value = DEFAULT_BASE_IRI, value_hint = ValueHint::Url)]
        base_iri: String,
        /// Layout of the Turtle file
        #[arg(long, value_enum, default_value_t = StyleArg::Statements)]
        style: StyleArg,
        /// Order of the generated triples
        #[arg(long, value_enum, default_value_t = OrderArg::Column)]
        order: OrderArg,
        /// Drop mowing dates that are not valid xsd:date values instead of passing them through
        #[arg(long)]
        strict_dates: bool,
    },
    /// Query the canton mapping and print it as CSV
    ///
    /// The output can be passed to `convert --cantons-file`.
    Cantons {
        /// SPARQL endpoint that is queried for the cantons
        #[arg(long, default_value = DEFAULT_ENDPOINT, value_hint = ValueHint::Url)]
        endpoint: String,
        /// File to write to
        ///
        /// If no file is given, stdout is written.
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
pub enum StyleArg {
    /// One statement per line with full IRIs
    Statements,
    /// Prefixed Turtle
    Pretty,
}

impl From<StyleArg> for OutputStyle {
    fn from(value: StyleArg) -> Self {
        match value {
            StyleArg::Statements => OutputStyle::Statements,
            StyleArg::Pretty => OutputStyle::Pretty,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
pub enum OrderArg {
    /// All values of a column before the next column
    Column,
    /// All values of a record before the next record
    Record,
}

impl From<OrderArg> for TripleOrder {
    fn from(value: OrderArg) -> Self {
        match value {
            OrderArg::Column => TripleOrder::ByColumn,
            OrderArg::Record => TripleOrder::ByRecord,
        }
    }
}
