use std::sync::Arc;

use anyhow::Result;
use chrono::{Datelike, Local};
use clap::{error::ErrorKind, CommandFactory};

use crate::{
    cli::{Cli, FetchArgs},
    job::run_years,
    remote::FtpConnector,
};

/// Runs every requested year. Returns whether all of them succeeded.
pub async fn fetch(args: &FetchArgs) -> Result<bool> {
    let current_year = u16::try_from(Local::now().year()).unwrap_or(u16::MAX);
    let years = match args.years(current_year) {
        Ok(years) => years,
        Err(message) => Cli::command().error(ErrorKind::InvalidValue, message).exit(),
    };

    let config = args.config();
    if let Err(e) = config.validate() {
        Cli::command().error(ErrorKind::InvalidValue, e).exit();
    }

    println!(
        "Starting retrieving data for interval: ({}, {})",
        years.start(),
        years.end()
    );

    let connector = Arc::new(FtpConnector::from_config(&config));
    let results = run_years(connector, Arc::new(config), years).await;

    let mut all_ok = true;
    for (year, result) in results {
        match result {
            Ok(report) => match report.transcoded_file {
                Some(path) => println!("{}: {} files, report saved to `{}`", year, report.files, path.display()),
                None => println!(
                    "{}: {} files merged into `{}`",
                    year,
                    report.files,
                    report.merged_file.display()
                ),
            },
            Err(e) => {
                all_ok = false;
                println!("{}: failed: {}", year, e);
            }
        }
    }

    Ok(all_ok)
}
