//! sdiospi - SDIO-over-SPI transaction decoder
//!
//! Replays logic-analyzer captures of an SDIO device driven in SPI mode and
//! prints one line per chip-select window: card control accesses, register
//! reads and writes, address window setup, bulk transfers and interrupt
//! status handling.
//!
//! All decoding lives in `sdiospi-core`; this binary only loads the
//! classification policy, reads capture files and formats output.

mod capture;
mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use sdiospi_core::ClassificationPolicy;
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Set log level based on verbosity
    match cli.verbose {
        0 => {} // default (info)
        1 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    }

    let policy = load_policy(cli.policy.as_deref())?;

    match cli.command {
        Commands::Decode { capture, summary } => {
            commands::decode::run_decode(&capture, policy, cli.level, summary)
        }
        Commands::Field { argument } => commands::run_field(argument),
        Commands::Irq { value } => commands::run_irq(value),
        Commands::Policy => commands::run_policy(&policy),
    }
}

/// Load the classification policy from `path`, or use the built-in one
fn load_policy(path: Option<&Path>) -> Result<ClassificationPolicy, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let policy = ClassificationPolicy::from_toml_file(path)?;
            log::info!("Loaded classification policy from {:?}", path);
            Ok(policy)
        }
        None => {
            log::debug!("Using built-in classification policy");
            Ok(ClassificationPolicy::default())
        }
    }
}
