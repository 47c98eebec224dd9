//! Command line interface.

pub mod command;

use std::{ops::RangeInclusive, path::PathBuf, time::Duration};

use clap::{Args, Parser, Subcommand};
use indicatif::ProgressBar;

use crate::config::{
    Config, CONNECT_TIMEOUT_SECS, DATA_DIR, MAX_NUM_JOBS, NUM_RETRIES, READ_TIMEOUT_SECS, REMOTE_BASE_DIR,
    SERVER,
};

/// First year published in the archive.
pub const FIRST_YEAR: u16 = 1901;

#[derive(Parser)]
#[command(version, about = "NOAA dataset generator tool.", long_about = None)]
/// Contains the commands
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download, merge and transcode one year or a range of years
    Fetch(FetchArgs),
    /// Transcode an already merged raw file
    Transcode {
        /// Merged raw dataset
        input: PathBuf,
        /// Report file to write
        output: PathBuf,
    },
}

#[derive(Args, Debug, Clone)]
pub struct FetchArgs {
    /// Get dataset for a single year
    #[arg(short, long)]
    pub year: Option<u16>,
    /// Initial year of the dataset
    #[arg(short, long, default_value_t = FIRST_YEAR)]
    pub from_year: u16,
    /// Last year of the dataset [default: current year]
    #[arg(short, long)]
    pub to_year: Option<u16>,
    /// Skip building the ish report
    #[arg(long)]
    pub no_ish: bool,
    /// Years processed concurrently
    #[arg(short, long, default_value_t = MAX_NUM_JOBS)]
    pub jobs: usize,
    /// Download passes before a year is abandoned
    #[arg(long, default_value_t = NUM_RETRIES)]
    pub retries: usize,
    /// Local data directory
    #[arg(long, default_value = DATA_DIR)]
    pub data_dir: PathBuf,
    /// Archive server as host:port
    #[arg(long, default_value = SERVER)]
    pub server: String,
    /// Remote directory holding one directory per year
    #[arg(long, default_value = REMOTE_BASE_DIR)]
    pub remote_base: String,
    /// Seconds to wait for the server to accept a connection
    #[arg(long, default_value_t = CONNECT_TIMEOUT_SECS)]
    pub connect_timeout: u64,
    /// Seconds to wait on a stalled read
    #[arg(long, default_value_t = READ_TIMEOUT_SECS)]
    pub read_timeout: u64,
}

impl FetchArgs {
    /// Requested years. A single `--year` wins over the range flags.
    pub fn years(&self, current_year: u16) -> Result<RangeInclusive<u16>, String> {
        let (from, to) = match self.year {
            Some(year) => (year, year),
            None => (self.from_year, self.to_year.unwrap_or(current_year)),
        };

        if from == 0 {
            return Err("year must be positive".to_string());
        }
        if from > to {
            return Err(format!("initial year {} is after last year {}", from, to));
        }

        Ok(from..=to)
    }

    pub fn config(&self) -> Config {
        Config {
            server: self.server.clone(),
            remote_base: self.remote_base.clone(),
            data_dir: self.data_dir.clone(),
            jobs: self.jobs,
            retries: self.retries,
            connect_timeout: Duration::from_secs(self.connect_timeout),
            read_timeout: Duration::from_secs(self.read_timeout),
            transcode: !self.no_ish,
            ..Config::default()
        }
    }
}

/// Creates a spinner.
pub fn create_spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner().with_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));

    bar
}
