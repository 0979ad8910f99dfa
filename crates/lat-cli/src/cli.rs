use clap::{Args, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

use crate::common::TimeUnit;

#[derive(Parser, Debug)]
#[command(author, version, about = "Unit-level lifetime analysis for heterogeneous SoCs", long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the Monte-Carlo lifetime simulation
    Sim(SimArgs),
    /// Parse and validate a system description without simulating
    Validate(ValidateArgs),
}

#[derive(Args, Debug)]
pub struct SimArgs {
    /// Path to the system description XML
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub system: PathBuf,

    /// Monte-Carlo iterations
    #[arg(long, default_value_t = 1000)]
    pub iterations: usize,

    /// Comma-separated subset of mechanisms (nbti,em,hci,tddb); all four
    /// when omitted
    #[arg(long)]
    pub mechanisms: Option<String>,

    /// Trace file delimiter (single ASCII character)
    #[arg(long, default_value_t = ',')]
    pub delimiter: char,

    /// Unit used to display times in the summary table
    #[arg(long, value_enum, default_value_t = TimeUnit::Years)]
    pub time_unit: TimeUnit,

    /// RNG seed for reproducible runs (drawn from entropy when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Worker threads for Monte-Carlo iterations (0 = auto, 1 = sequential)
    #[arg(long, default_value_t = 1)]
    pub threads: usize,

    /// Mechanism parameter file (key<TAB>value pairs, # comments)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub params: Option<PathBuf>,

    /// Write the summary statistics as CSV (times in seconds)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub summary_csv: Option<PathBuf>,

    /// Write the per-unit aging rate table as CSV
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub unit_rates: Option<PathBuf>,

    /// Write the per-mechanism aging rate table as CSV
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub mechanism_rates: Option<PathBuf>,

    /// Dump every component's raw TTF samples as CSV (seconds)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub ttf_dump: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the system description XML
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub system: PathBuf,

    /// Trace file delimiter (single ASCII character)
    #[arg(long, default_value_t = ',')]
    pub delimiter: char,
}

/// Translate a delimiter argument into the single byte the CSV reader
/// expects.
pub fn delimiter_byte(delimiter: char) -> anyhow::Result<u8> {
    if delimiter.is_ascii() {
        Ok(delimiter as u8)
    } else {
        anyhow::bail!("delimiter must be a single ASCII character, got '{delimiter}'")
    }
}
