use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

use divsack::util::{LinearizationMode, SelectionStrategy};

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// JSON list of items
    #[arg(short, long, value_name = "FILE")]
    pub items_file: PathBuf,
    /// JSON parameters
    #[arg(short, long, value_name = "FILE")]
    pub params_file: PathBuf,
    #[arg(short, long, value_name = "FILE")]
    pub config_file: Option<PathBuf>,
    /// Overrides the strategy of the config
    #[arg(short, long, value_enum)]
    pub strategy: Option<CliStrategy>,
    /// Overrides the linearization of the config
    #[arg(long, value_enum)]
    pub linearization: Option<CliLinearization>,
    /// Writes the items, parameters, selection and config as JSON
    #[arg(long, value_name = "FILE")]
    pub solution_file: Option<PathBuf>,
    #[arg(
        short,
        long,
        value_name = "[off, error, warn, info, debug, trace]",
        default_value = "warn"
    )]
    pub log_level: LevelFilter,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CliStrategy {
    Greedy,
    GreedyWithPostCheck,
    Exact,
}

impl From<CliStrategy> for SelectionStrategy {
    fn from(s: CliStrategy) -> Self {
        match s {
            CliStrategy::Greedy => SelectionStrategy::Greedy,
            CliStrategy::GreedyWithPostCheck => SelectionStrategy::GreedyWithPostCheck,
            CliStrategy::Exact => SelectionStrategy::ExactOptimization,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CliLinearization {
    ForceMax,
    MaxEquality,
    MaxAll,
}

impl From<CliLinearization> for LinearizationMode {
    fn from(l: CliLinearization) -> Self {
        match l {
            CliLinearization::ForceMax => LinearizationMode::ForceMax,
            CliLinearization::MaxEquality => LinearizationMode::MaxEquality,
            CliLinearization::MaxAll => LinearizationMode::MaxAll,
        }
    }
}
