//! Per-year acquisition and conversion pipeline.
//!
//! A job holds a job-pool permit for its whole life. Each network pass
//! (connect, list, diff, download) runs under the connection gate, which is
//! released before the next pass and before the local phases so that other
//! years can use the session while this one decompresses and transcodes.

use std::{fs, ops::RangeInclusive, path::PathBuf, sync::Arc};

use futures::future::join_all;
use tracing::{debug, error, info, info_span, warn, Instrument, Span};

use crate::{
    config::{Config, YearDirs},
    download::{self, Resolution},
    error::JobError,
    gate::Gates,
    remote::{Connector, RemoteEntry, Session},
    transcode,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Idle,
    Connecting,
    Listing,
    Diffing,
    Downloading,
    Decompressing,
    Merging,
    Transcoding,
    Done,
    Failed,
}

/// What one network pass concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    Complete,
    Incomplete,
}

/// Summary of a successful year.
#[derive(Debug, Clone, PartialEq)]
pub struct YearReport {
    pub year: u16,
    pub files: usize,
    pub merged_file: PathBuf,
    pub transcoded_file: Option<PathBuf>,
    pub records: Option<u64>,
    pub passes: usize,
    pub retrievals: usize,
}

/// State owned by one year job.
#[derive(Debug)]
pub struct YearTask {
    pub year: u16,
    pub dirs: YearDirs,
    pub state: JobState,
    pub attempts: usize,
    pub remote_index: Vec<RemoteEntry>,
    pub pending_index: Vec<RemoteEntry>,
    pub acquired_index: Vec<RemoteEntry>,
    pub failed_index: Vec<String>,
    pub merged_file: Option<PathBuf>,
    remote_dir: String,
    retry_limit: usize,
    retrievals: usize,
    passes: usize,
}

impl YearTask {
    pub fn new(year: u16, config: &Config) -> Self {
        YearTask {
            year,
            dirs: config.year_dirs(year),
            state: JobState::Idle,
            attempts: 0,
            remote_index: Vec::new(),
            pending_index: Vec::new(),
            acquired_index: Vec::new(),
            failed_index: Vec::new(),
            merged_file: None,
            remote_dir: config.remote_dir(year),
            retry_limit: config.retries,
            retrievals: 0,
            passes: 0,
        }
    }

    fn transition(&mut self, state: JobState) {
        debug!("{:?} -> {:?}", self.state, state);
        self.state = state;
    }

    fn fail(&mut self, err: JobError) -> JobError {
        self.transition(JobState::Failed);
        err
    }

    pub fn create_dirs(&self) -> Result<(), JobError> {
        for dir in self.dirs.all() {
            if !dir.exists() {
                fs::create_dir_all(dir).map_err(|source| JobError::Directory {
                    path: dir.to_path_buf(),
                    source,
                })?;
                debug!("Creating new directory {}", dir.display());
            }
        }

        Ok(())
    }

    /// One gated pass: connect, list, diff, and download if anything is
    /// pending. The session is closed before returning.
    fn network_pass<C: Connector>(&mut self, connector: &C) -> Result<Pass, JobError> {
        self.transition(JobState::Connecting);
        let mut session = match connector.connect() {
            Ok(session) => session,
            Err(e) => return Err(self.fail(JobError::Connect(e))),
        };
        self.passes += 1;

        let outcome = self.list_and_download(&mut session);

        if let Err(e) = session.quit() {
            debug!("Closing session failed: {}", e);
        }

        outcome.map_err(|e| self.fail(e))
    }

    fn list_and_download<S: Session>(&mut self, session: &mut S) -> Result<Pass, JobError> {
        self.transition(JobState::Listing);
        let listing = session.list(&self.remote_dir).map_err(|source| JobError::Listing {
            dir: self.remote_dir.clone(),
            source,
        })?;
        self.remote_index = listing.into_iter().filter(RemoteEntry::is_file).collect();

        self.transition(JobState::Diffing);
        let resolution = download::resolve_pending(&self.remote_index, &self.dirs.raw)?;
        self.record(&resolution);

        if resolution.is_complete() {
            info!("All {} files have been downloaded", self.remote_index.len());
            return Ok(Pass::Complete);
        }

        if self.attempts >= self.retry_limit {
            return Err(JobError::RetriesExhausted {
                passes: self.attempts,
                missing: self.pending_index.len(),
            });
        }
        if self.attempts > 0 {
            warn!(
                "Not all files have been downloaded, retrying missing. Attempt number: {}",
                self.attempts
            );
        }

        self.transition(JobState::Downloading);
        info!(
            "Ready for downloading {} files, {} bytes",
            self.pending_index.len(),
            resolution.pending_bytes()
        );
        let report = download::download_entries(session, &self.remote_index, &self.dirs.raw);
        self.retrievals += report.calls;
        if !report.failed.is_empty() {
            warn!("{} files failed this pass", report.failed.len());
        }
        self.failed_index = report.failed;
        self.attempts += 1;

        Ok(Pass::Incomplete)
    }

    fn record(&mut self, resolution: &Resolution) {
        self.pending_index = resolution.pending.clone();
        for entry in &resolution.satisfied {
            if !self.acquired_index.iter().any(|e| e.name == entry.name) {
                self.acquired_index.push(entry.clone());
            }
        }
    }

    /// Decompress, merge and optionally transcode. Local work only.
    fn finish(&mut self, transcode: bool) -> Result<YearReport, JobError> {
        self.local_phases(transcode).map_err(|e| self.fail(e))
    }

    fn local_phases(&mut self, transcode: bool) -> Result<YearReport, JobError> {
        self.transition(JobState::Decompressing);
        info!("Decompressing files");
        // Listing order, so reruns merge identically.
        let acquired: Vec<RemoteEntry> = self
            .remote_index
            .iter()
            .filter(|e| self.acquired_index.iter().any(|a| a.name == e.name))
            .cloned()
            .collect();
        let files = download::decompress(&acquired, &self.dirs.raw, &self.dirs.decompressed)?;

        self.transition(JobState::Merging);
        info!("Merging decompressed files");
        let merged_file = self.dirs.merged_file();
        download::merge(&files, &merged_file)?;
        self.merged_file = Some(merged_file.clone());

        let (transcoded_file, records) = if transcode {
            self.transition(JobState::Transcoding);
            info!("Building ish output");
            let output = self.dirs.transcoded_file();
            let records = transcode::transcode_file(&merged_file, &output).map_err(|source| {
                JobError::Transcode {
                    path: merged_file.clone(),
                    source,
                }
            })?;
            (Some(output), Some(records))
        } else {
            (None, None)
        };

        self.transition(JobState::Done);

        Ok(YearReport {
            year: self.year,
            files: acquired.len(),
            merged_file,
            transcoded_file,
            records,
            passes: self.passes,
            retrievals: self.retrievals,
        })
    }
}

/// Runs one year end to end. Errors are logged with the year and returned.
pub async fn run_year<C: Connector>(
    connector: Arc<C>,
    gates: Gates,
    config: Arc<Config>,
    year: u16,
) -> Result<YearReport, JobError> {
    let span = info_span!("year", year);

    async move {
        let result = drive(connector, gates, config, year).await;
        match &result {
            Ok(report) => info!("Finished with {} files", report.files),
            Err(e) => error!(state = ?JobState::Failed, "{}", e),
        }
        result
    }
    .instrument(span)
    .await
}

async fn drive<C: Connector>(
    connector: Arc<C>,
    gates: Gates,
    config: Arc<Config>,
    year: u16,
) -> Result<YearReport, JobError> {
    let _job = gates.job_permit().await?;

    let mut task = YearTask::new(year, &config);
    task.create_dirs().map_err(|e| task.fail(e))?;

    loop {
        let permit = gates.connection_permit().await?;
        let connector = Arc::clone(&connector);
        let span = Span::current();

        let (returned, pass) = tokio::task::spawn_blocking(move || {
            let _enter = span.enter();
            let _permit = permit;
            let pass = task.network_pass(&*connector);
            (task, pass)
        })
        .await?;
        task = returned;

        if pass? == Pass::Complete {
            break;
        }
    }

    let transcode = config.transcode;
    let span = Span::current();
    tokio::task::spawn_blocking(move || {
        let _enter = span.enter();
        task.finish(transcode)
    })
    .await?
}

/// Runs every year of `years` concurrently, bounded by the configured job
/// pool and the single connection gate. Results come back in year order.
pub async fn run_years<C: Connector>(
    connector: Arc<C>,
    config: Arc<Config>,
    years: RangeInclusive<u16>,
) -> Vec<(u16, Result<YearReport, JobError>)> {
    let gates = Gates::new(config.jobs);

    let handles: Vec<_> = years
        .clone()
        .map(|year| {
            tokio::spawn(run_year(
                Arc::clone(&connector),
                gates.clone(),
                Arc::clone(&config),
                year,
            ))
        })
        .collect();

    years
        .zip(join_all(handles).await)
        .map(|(year, joined)| (year, joined.map_err(JobError::from).and_then(|r| r)))
        .collect()
}

// -- Tests -------------------------------------------------------------------
