// src/bin/opstat.rs
use clap::error::ErrorKind;
use clap::Parser;
use colored::Colorize;
use opstat_core::cli::{self, Cli};
use opstat_core::exit::OpstatExit;

fn main() -> OpstatExit {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => OpstatExit::Success,
                _ => OpstatExit::InvalidInput,
            };
        }
    };

    match cli::handle_stats(&cli) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            OpstatExit::for_error(&e)
        }
    }
}
