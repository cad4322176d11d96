use psfetch_core::logging;

mod cli;

use crate::cli::CliCommand;

fn main() {
    // Log file first; stderr if the state dir is unusable.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    match CliCommand::run_from_args() {
        Ok(status) => std::process::exit(status.exit_code()),
        Err(err) => {
            eprintln!("psfetch error: {:#}", err);
            std::process::exit(1);
        }
    }
}
