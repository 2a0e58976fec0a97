//! Binary crate for the `darksky` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - Logging, progress output and exit codes

use std::process::ExitCode;

use clap::Parser;

mod cli;
mod error;
mod logging;

#[tokio::main]
async fn main() -> ExitCode {
    let cmd = match cli::Cli::try_parse() {
        Ok(cmd) => cmd,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(error::EX_USAGE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    logging::init(cmd.verbose);

    match cmd.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::debug!("{err:?}");
            eprintln!("darksky: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}
