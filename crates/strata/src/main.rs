//! Extract files from overlapping game archives.

use std::process::ExitCode;

use clap::Parser;

mod cli;
mod config;
mod logging;
mod run;

fn main() -> ExitCode {
    let args = cli::Args::parse();
    logging::init(args.verbose);

    let config = match config::Config::try_from(args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run::run(&config) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
