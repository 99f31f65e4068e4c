use std::path::PathBuf;
use std::str::FromStr;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "isovec",
    about = "Isotopic and elemental composition of substances, molecules and mixtures",
    version,
    propagate_version = true
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the substances of a definition file
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Render the composition tree of a substance
    #[command(visible_alias = "t")]
    Tree(TreeArgs),

    /// Print the isotope vector of a substance
    #[command(visible_alias = "i")]
    Isotopes(IsotopesArgs),

    /// Print the element vector of a substance
    #[command(visible_alias = "e")]
    Elements(VectorArgs),

    /// Write a Serpent material card for a substance
    #[command(visible_alias = "c")]
    Card(CardArgs),

    /// Show reference data of an isotope or a natural element
    #[command(visible_alias = "n")]
    Nuclide(NuclideArgs),
}

/// Definition file and the substance picked from it.
#[derive(Args)]
pub struct SourceOptions {
    /// Substance definition file (TOML)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Substance to use (the last one defined if omitted)
    #[arg(short, long, value_name = "NAME")]
    pub substance: Option<String>,
}

#[derive(Args)]
pub struct OutputOptions {
    /// Output file (stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Substance definition file (TOML)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Args)]
pub struct TreeArgs {
    #[command(flatten)]
    pub source: SourceOptions,

    #[command(flatten)]
    pub output: OutputOptions,

    /// Group by element instead of following the definitions
    #[arg(long)]
    pub composition: bool,

    /// Quantities to show, comma separated
    #[arg(
        long,
        value_name = "QUANTITIES",
        value_delimiter = ',',
        default_value = "atomic"
    )]
    pub show: Vec<ShownQuantity>,

    /// Show each fraction relative to the root instead of the parent
    #[arg(long)]
    pub scale: bool,

    /// Keep isotopes at their own depth instead of aligning them
    #[arg(long)]
    pub no_align: bool,

    /// Characters used to draw the tree
    #[arg(long, value_name = "SET", default_value = "box")]
    pub charset: Charset,
}

#[derive(Args)]
pub struct VectorArgs {
    #[command(flatten)]
    pub source: SourceOptions,

    #[command(flatten)]
    pub output: OutputOptions,

    /// Fraction type of the vector
    #[arg(long, value_name = "TYPE", default_value = "atomic")]
    pub fraction: FractionKind,

    /// Scale of the printed fractions
    #[arg(long, value_name = "UNIT", default_value = "percent")]
    pub unit: Unit,
}

#[derive(Args)]
pub struct IsotopesArgs {
    #[command(flatten)]
    pub vector: VectorArgs,

    #[command(flatten)]
    pub natural: NaturalOptions,
}

#[derive(Args)]
pub struct NaturalOptions {
    /// Replace natural elements by one surrogate isotope each; optionally
    /// only the comma separated elements given by name or symbol
    #[arg(
        long,
        value_name = "ELEMENTS",
        num_args = 0..,
        value_delimiter = ','
    )]
    pub natural: Option<Vec<String>>,
}

#[derive(Args)]
pub struct CardArgs {
    #[command(flatten)]
    pub source: SourceOptions,

    #[command(flatten)]
    pub output: OutputOptions,

    /// Material name on the card (substance name if omitted)
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// Card density: positive for 1/(b cm), negative for g/cm^3
    /// (the negated substance density if omitted)
    #[arg(long, value_name = "RHO", allow_hyphen_values = true)]
    pub density: Option<f64>,

    /// Plot colour
    #[arg(long, value_name = "R,G,B")]
    pub rgb: Option<Rgb>,

    /// Cross section library suffix
    #[arg(long, value_name = "ID", default_value = "03c")]
    pub library: String,

    /// Fraction type of the card
    #[arg(long, value_name = "TYPE", default_value = "atomic")]
    pub fraction: FractionKind,

    #[command(flatten)]
    pub natural: NaturalOptions,
}

#[derive(Args)]
pub struct NuclideArgs {
    /// Isotope such as U-235 or Tc-99m, or an element symbol such as Fe
    #[arg(value_name = "NAME")]
    pub name: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ShownQuantity {
    /// Atomic fractions
    #[value(alias = "at")]
    Atomic,
    /// Weight fractions
    #[value(alias = "wt")]
    Weight,
    /// Volume fractions
    #[value(alias = "vol")]
    Volume,
    /// Molar masses
    #[value(name = "molar-mass", alias = "mass")]
    MolarMass,
    /// Densities
    #[value(alias = "rho")]
    Density,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum Charset {
    /// Unicode box drawing characters
    #[default]
    #[value(alias = "box-drawings-light")]
    Box,
    /// Plain ASCII
    #[value(alias = "basic")]
    Ascii,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum FractionKind {
    #[default]
    #[value(alias = "at")]
    Atomic,
    #[value(alias = "wt")]
    Weight,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum Unit {
    /// Plain fractions summing to 1
    Fraction,
    #[default]
    Percent,
    Permille,
    Ppm,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl FromStr for Rgb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let [r, g, b] = parts.as_slice() else {
            return Err(format!("expected three comma separated values, got '{s}'"));
        };
        let channel = |v: &str| {
            v.parse::<u8>()
                .map_err(|_| format!("invalid colour channel '{v}' (use 0-255)"))
        };
        Ok(Self(channel(*r)?, channel(*g)?, channel(*b)?))
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}
