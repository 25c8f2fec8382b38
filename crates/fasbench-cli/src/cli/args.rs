use std::path::PathBuf;

use clap::{Parser, Subcommand};
use fasbench_core::ReportFormat;

#[derive(Parser, Debug)]
#[command(
    name = "fasbench",
    version,
    about = "Regression benchmarks for an external ordering solver",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Option<Command>,

    #[command(flatten)]
    pub run: RunArgs,

    /// Only log warnings and errors (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the solver over the corpus (the default when no subcommand is given)
    Run(RunArgs),
    /// Inspect stored baselines
    Baseline(BaselineArgs),
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Test-case inputs; defaults to every input file in the corpus directory
    pub inputs: Vec<PathBuf>,

    /// YAML config file (solver, testcases_dir, runs, timeout_secs, ...)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Solver executable
    #[arg(long, env = "FASBENCH_SOLVER")]
    pub solver: Option<PathBuf>,

    /// Directory scanned for inputs when none are given
    #[arg(long)]
    pub testcases_dir: Option<PathBuf>,

    /// Solver runs per test case
    #[arg(long, short = 'n', env = "FASBENCH_RUNS")]
    pub runs: Option<usize>,

    /// Kill a solver run after this many seconds
    #[arg(long, env = "FASBENCH_TIMEOUT_SECS")]
    pub timeout_secs: Option<f64>,

    /// Stop at the first failing test case
    #[arg(long)]
    pub fail_fast: bool,

    /// Exit non-zero when any test case scores below its baseline
    #[arg(long)]
    pub fail_on_regression: bool,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(f: OutputFormat) -> Self {
        match f {
            OutputFormat::Text => ReportFormat::Text,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}

#[derive(Parser, Debug)]
pub struct BaselineArgs {
    #[command(subcommand)]
    pub cmd: BaselineSub,
}

#[derive(Subcommand, Debug)]
pub enum BaselineSub {
    /// Print the stored baseline for each input
    Show(BaselineShowArgs),
}

#[derive(Parser, Debug)]
pub struct BaselineShowArgs {
    /// Test-case inputs whose side-car baselines to read
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Extension of the side-car baseline files
    #[arg(long, default_value = fasbench_core::config::DEFAULT_BASELINE_EXTENSION)]
    pub baseline_extension: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}
