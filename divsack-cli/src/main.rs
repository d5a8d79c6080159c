use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use log::{info, warn};

use divsack::io::ext_repr::{ExtItem, ExtParameters};
use divsack::io::{export, import_instance, import_parameters};
use divsack::select::select;
use divsack::util::SelectionStrategy;
use divsack_cli::config::DivsackConfig;
use divsack_cli::io;
use divsack_cli::io::cli::Cli;
use divsack_cli::io::output::{SelectOutput, format_report};

fn main() -> Result<()> {
    let args = Cli::parse();
    io::init_logger(args.log_level)?;

    let mut config: DivsackConfig = match &args.config_file {
        None => {
            warn!("[MAIN] No config file provided, use --config-file to provide a custom config");
            DivsackConfig::default()
        }
        Some(config_file) => io::read_json(config_file).context("incorrect config file format")?,
    };
    if let Some(strategy) = args.strategy {
        config.selection.strategy = strategy.into();
    }
    if let Some(linearization) = args.linearization {
        config.selection.linearization = linearization.into();
    }
    info!("[MAIN] Successfully parsed DivsackConfig: {config:?}");

    let ext_items: Vec<ExtItem> = io::read_json(&args.items_file)?;
    let ext_params: ExtParameters = io::read_json(&args.params_file)?;
    let instance = import_instance(&ext_items);
    let params = import_parameters(&ext_params)?;

    let solver = match config.selection.strategy {
        SelectionStrategy::ExactOptimization => config.solver_backend.create(),
        _ => None,
    };
    if config.selection.strategy == SelectionStrategy::ExactOptimization && solver.is_none() {
        println!("Solver unavailable");
    }

    let selection = select(&instance, &params, &config.selection, solver.as_deref())?;
    let ext_selection = export(&selection, &params);
    print!("{}", format_report(&ext_selection, &ext_params)?);

    if let Some(solution_file) = &args.solution_file {
        let output = SelectOutput {
            items: ext_items,
            parameters: ext_params,
            solution: ext_selection,
            config,
        };
        io::write_json(&output, solution_file)?;
    }

    Ok(())
}
