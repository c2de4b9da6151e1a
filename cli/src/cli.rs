use clap::{Args as ClapArgs, Parser, Subcommand, ValueHint};
use laderr::shacl::Inference;
use std::path::PathBuf;

#[derive(Parser)]
#[command(about, version, name = "laderr", arg_required_else_help = true)]
/// LaDeRR command line toolkit
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate a LaDeRR specification against its shapes and save its graph
    ///
    /// Exits with a non-zero status if the specification doesn't conform.
    Validate {
        /// The LaDeRR specification to validate
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        #[command(flatten)]
        settings: Settings,
        /// Fail on warnings and infos too
        ///
        /// By default only violations make a specification non-conforming.
        #[arg(long)]
        strict: bool,
        /// RDFS and OWL-RL entailment applied before validation
        #[arg(long, value_parser = clap::value_parser!(Inference))]
        inference: Option<Inference>,
        /// RDF file holding the LaDeRR schema
        ///
        /// By default the bundled schema is used.
        #[arg(long, value_hint = ValueHint::FilePath)]
        schema: Option<PathBuf>,
        /// Directory of SHACL shape files in Turtle
        ///
        /// By default the bundled shapes are used.
        #[arg(long, value_hint = ValueHint::DirPath)]
        shapes: Option<PathBuf>,
    },
    /// Map a LaDeRR specification to RDF without validating it
    Build {
        /// The LaDeRR specification to map
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        #[command(flatten)]
        settings: Settings,
    },
}

#[derive(ClapArgs)]
pub struct Settings {
    /// TOML configuration file
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    /// File the graph is written to
    ///
    /// `validate` writes to `results/result.ttl` by default, `build` to stdout.
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,
    /// The format of the written graph
    ///
    /// It can be a name like "turtle", an extension like "nt" or a MIME type like
    /// "application/n-triples".
    ///
    /// By default the format is guessed from the output file extension.
    #[arg(short, long)]
    pub format: Option<String>,
}
