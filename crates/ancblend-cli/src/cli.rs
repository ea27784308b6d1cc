use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "ancblend - reconcile ancestral protein reconstructions computed under structure-partitioned substitution models.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Mix per-class ancestral reconstructions into one reconciled ancestor per node.
    Reconcile(ReconcileArgs),
    /// Write one branch-length-rescaled tree per structural class.
    RescaleTrees(RescaleArgs),
    /// Merge two independently reconstructed ancestors, minimizing their distance.
    Harmonize(HarmonizeArgs),
}

/// Arguments for the `reconcile` subcommand.
#[derive(Args, Debug)]
pub struct ReconcileArgs {
    /// Path to a TOML configuration file; command-line flags override its values.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Alignment file carrying the #=GR SS_cons / SA_cons annotations.
    #[arg(short, long, value_name = "PATH")]
    pub alignment: Option<PathBuf>,

    /// Fit log with per-class rates, class fractions, and the global scalars.
    #[arg(short, long, value_name = "PATH")]
    pub log: Option<PathBuf>,

    /// Directory containing the per-class reconstruction directories.
    #[arg(long, value_name = "PATH")]
    pub class_root: Option<PathBuf>,

    /// Prefix of the per-class reconstruction directories.
    #[arg(long, value_name = "PREFIX")]
    pub class_prefix: Option<String>,

    /// Destination directory for the reconciled per-node tables.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Arguments for the `rescale-trees` subcommand.
#[derive(Args, Debug)]
pub struct RescaleArgs {
    /// Fit log with per-class rate scalers.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub log: PathBuf,

    /// Tree file whose branch lengths will be rescaled.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub tree: PathBuf,

    /// Destination directory for the per-class trees.
    #[arg(short, long, default_value = ".", value_name = "PATH")]
    pub output: PathBuf,
}

/// Arguments for the `harmonize` subcommand.
#[derive(Args, Debug)]
pub struct HarmonizeArgs {
    /// The favored ancestor's probability table.
    #[arg(value_name = "ANC1")]
    pub first: PathBuf,

    /// The ancestor to pull toward the favored one.
    #[arg(value_name = "ANC2")]
    pub second: PathBuf,

    /// Posterior probability above which an alternate state can substitute
    /// for a site's maximum-likelihood residue.
    #[arg(long, default_value_t = ancblend::engine::tasks::harmonize::DEFAULT_POSTERIOR_CUTOFF, value_name = "FLOAT")]
    pub cutoff: f64,
}
