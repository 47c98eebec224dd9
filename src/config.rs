//! Run configuration and the per-year local directory layout.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{anyhow, Result};

pub const SERVER: &str = "ftp.ncdc.noaa.gov:21";
pub const USER: &str = "anonymous";
pub const PASSWORD: &str = "";
pub const REMOTE_BASE_DIR: &str = "/pub/data/noaa/";
pub const DATA_DIR: &str = "./data";
pub const MAX_NUM_JOBS: usize = 4;
pub const NUM_RETRIES: usize = 3;

pub const CONNECT_TIMEOUT_SECS: u64 = 30;
pub const READ_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone)]
pub struct Config {
    /// `host:port` of the archive server.
    pub server: String,
    pub user: String,
    pub password: String,
    /// Remote directory holding one sub-directory per year.
    pub remote_base: String,
    /// Local root under which raw, decompressed and output files are kept.
    pub data_dir: PathBuf,
    pub jobs: usize,
    pub retries: usize,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub transcode: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: SERVER.to_string(),
            user: USER.to_string(),
            password: PASSWORD.to_string(),
            remote_base: REMOTE_BASE_DIR.to_string(),
            data_dir: PathBuf::from(DATA_DIR),
            jobs: MAX_NUM_JOBS,
            retries: NUM_RETRIES,
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
            read_timeout: Duration::from_secs(READ_TIMEOUT_SECS),
            transcode: true,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.jobs == 0 {
            return Err(anyhow!("at least one concurrent job is required"));
        }
        if self.retries == 0 {
            return Err(anyhow!("the retry limit must be at least 1"));
        }
        Ok(())
    }

    /// Remote directory for one year, always with a trailing slash.
    pub fn remote_dir(&self, year: u16) -> String {
        let base = self.remote_base.trim_end_matches('/');
        format!("{}/{}/", base, year)
    }

    pub fn year_dirs(&self, year: u16) -> YearDirs {
        YearDirs::new(&self.data_dir, year)
    }
}

/// Local working directories of one year.
#[derive(Debug, Clone, PartialEq)]
pub struct YearDirs {
    pub raw: PathBuf,
    pub decompressed: PathBuf,
    pub merged: PathBuf,
    pub transcoded: PathBuf,
    year: u16,
}

impl YearDirs {
    pub fn new(data_dir: &Path, year: u16) -> Self {
        let year_dir = data_dir.join("raw").join(year.to_string());

        YearDirs {
            raw: year_dir.join("raw"),
            decompressed: year_dir.join("decompress"),
            merged: data_dir.join("output"),
            transcoded: data_dir.join("output-ish"),
            year,
        }
    }

    pub fn all(&self) -> [&Path; 4] {
        [
            self.raw.as_path(),
            self.decompressed.as_path(),
            self.merged.as_path(),
            self.transcoded.as_path(),
        ]
    }

    /// The merged raw dataset, named after the year.
    pub fn merged_file(&self) -> PathBuf {
        self.merged.join(self.year.to_string())
    }

    pub fn transcoded_file(&self) -> PathBuf {
        self.transcoded.join(format!("{}_ish", self.year))
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn should_lay_out_year_directories() {
        let dirs = YearDirs::new(Path::new("/data"), 1901);

        assert_eq!(dirs.raw, PathBuf::from("/data/raw/1901/raw"));
        assert_eq!(dirs.decompressed, PathBuf::from("/data/raw/1901/decompress"));
        assert_eq!(dirs.merged_file(), PathBuf::from("/data/output/1901"));
        assert_eq!(dirs.transcoded_file(), PathBuf::from("/data/output-ish/1901_ish"));
    }

    #[test]
    fn should_build_remote_dir_with_single_slashes() {
        let mut config = Config::default();
        assert_eq!(config.remote_dir(1950), "/pub/data/noaa/1950/");

        config.remote_base = "/pub/data/noaa".to_string();
        assert_eq!(config.remote_dir(1950), "/pub/data/noaa/1950/");
    }

    #[test]
    fn should_reject_zero_jobs_or_retries() {
        let config = Config { jobs: 0, ..Config::default() };
        assert!(config.validate().is_err());

        let config = Config { retries: 0, ..Config::default() };
        assert!(config.validate().is_err());

        assert!(Config::default().validate().is_ok());
    }
}
