//! kvfs CLI Binary
//!
//! Command-line interface for the key-value backed virtual filesystem.

use clap::Parser;
use kvfs::config::ConfigLoader;
use kvfs::logging::{init_logging, LoggingConfig};
use kvfs::tooling::cli::{Cli, CliContext};
use std::process;

fn main() {
    let cli = Cli::parse();

    let mut logging = ConfigLoader::load_optional(cli.config.as_deref())
        .map(|c| c.logging)
        .unwrap_or_else(|_| LoggingConfig::default());
    if let Some(level) = &cli.log_level {
        logging.level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        logging.format = format.clone();
    }
    if let Err(e) = init_logging(Some(&logging)) {
        eprintln!("Error initializing logging: {}", e);
    }

    let mut context = match CliContext::new(cli.config.clone(), cli.store.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error opening filesystem: {}", e);
            process::exit(1);
        }
    };

    match context.execute(&cli.command) {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
