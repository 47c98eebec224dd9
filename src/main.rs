mod cli;
mod config;
mod download;
mod error;
mod gate;
mod job;
mod logging;
mod reading;
mod remote;
mod transcode;

use std::process::ExitCode;

use clap::Parser;
use cli::{command, Cli, Commands};

#[tokio::main]
async fn main() -> ExitCode {
    logging::init_logging();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Fetch(args) => match command::fetch(args).await {
            Ok(true) => ExitCode::SUCCESS,
            Ok(false) => ExitCode::FAILURE,
            Err(e) => {
                eprintln!("Error: {:#}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Transcode { input, output } => match command::transcode(input, output) {
            Ok(filename) => {
                println!("File saved to `{}`", filename);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {:#}", e);
                ExitCode::FAILURE
            }
        },
    }
}
