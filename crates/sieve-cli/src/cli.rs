use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Tony Kan, Ted Yu, William A. Goddard III, Victor Wai Tak Kam",
    version,
    about = "SIEVE++ CLI - A command-line interface for SIEVE++, a structure-based virtual-screening pipeline that docks ligand libraries into scored receptor pockets and ranks them by binding efficiency.",
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

    /// Set the number of concurrent docking engine invocations,
    /// overriding the config file.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub jobs: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full screening pipeline for the proteins in a workspace.
    Run(RunArgs),
    /// Re-score existing docking logs without re-running the engine.
    Score(ScoreArgs),
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug)]
pub struct RunArgs {
    // --- Core Arguments ---
    /// Path to the campaign workspace directory.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub workspace: PathBuf,

    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Screen only the named protein instead of every receptor in the
    /// workspace. Can be used multiple times.
    #[arg(short, long = "protein", value_name = "NAME")]
    pub proteins: Vec<String>,

    // --- Pocket Overrides ---
    /// Override the pocket score threshold from the config file.
    #[arg(short = 't', long, value_name = "FLOAT")]
    pub score_threshold: Option<f64>,

    /// Override the reference atom name used for pocket centroids.
    #[arg(long, value_name = "NAME")]
    pub reference_atom: Option<String>,

    // --- Docking Overrides ---
    /// Override the docking engine binary from the config file.
    #[arg(short, long, value_name = "PATH")]
    pub engine: Option<PathBuf>,

    /// Override the cubic search-box edge length, in angstroms.
    #[arg(long, value_name = "FLOAT")]
    pub box_edge: Option<f64>,

    /// Override the exhaustiveness passed to the docking engine.
    #[arg(long, value_name = "INT")]
    pub exhaustiveness: Option<u32>,

    /// Override the per-job wall-clock timeout, in seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    // --- Output Overrides ---
    /// Override the molecular descriptor table joined into the
    /// efficiency scores.
    #[arg(short, long, value_name = "PATH")]
    pub descriptors: Option<PathBuf>,

    /// Override the number of rows in the ranked table.
    #[arg(short = 'n', long, value_name = "INT")]
    pub top_n: Option<usize>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S docking.num-modes=20
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `score` subcommand.
#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// Path to the campaign workspace directory.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub workspace: PathBuf,

    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Re-score only the named protein. Can be used multiple times.
    #[arg(short, long = "protein", value_name = "NAME")]
    pub proteins: Vec<String>,

    /// Override the molecular descriptor table joined into the
    /// efficiency scores.
    #[arg(short, long, value_name = "PATH")]
    pub descriptors: Option<PathBuf>,

    /// Override the number of rows in the ranked table.
    #[arg(short = 'n', long, value_name = "INT")]
    pub top_n: Option<usize>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S ranking.top-n=50
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}
