//! Resolves, downloads, decompresses and merges the files of one year.

use std::{
    fs::{self, File},
    io::{self, copy, BufWriter, Write},
    path::{Path, PathBuf},
};

use flate2::read::MultiGzDecoder;
use tracing::{debug, warn};

use crate::{
    error::{JobError, RemoteError},
    remote::{RemoteEntry, Session},
};

const COMPRESSED_SUFFIX: &str = ".gz";

/// Remote inventory split into what is already on disk and what is not.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Resolution {
    pub satisfied: Vec<RemoteEntry>,
    pub pending: Vec<RemoteEntry>,
}

impl Resolution {
    pub fn is_complete(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn pending_bytes(&self) -> u64 {
        self.pending.iter().map(|e| e.size).sum()
    }
}

/// Outcome of one download pass.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PassReport {
    pub downloaded: Vec<String>,
    pub failed: Vec<String>,
    pub calls: usize,
}

/// An entry is satisfied iff a local file of the same name exists with
/// exactly the remote byte size. Everything else is pending.
pub fn resolve_pending(remote: &[RemoteEntry], raw_dir: &Path) -> Result<Resolution, JobError> {
    let mut resolution = Resolution::default();

    for entry in remote.iter().filter(|e| e.is_file()) {
        let path = raw_dir.join(&entry.name);
        let satisfied = match fs::metadata(&path) {
            Ok(meta) => meta.is_file() && meta.len() == entry.size,
            Err(e) if e.kind() == io::ErrorKind::NotFound => false,
            Err(source) => return Err(JobError::LocalState { path, source }),
        };

        if satisfied {
            resolution.satisfied.push(entry.clone());
        } else {
            resolution.pending.push(entry.clone());
        }
    }

    Ok(resolution)
}

/// Retrieves every entry over `session`, overwriting local copies.
///
/// Failures are per file: the entry is recorded as failed, its local file
/// is removed and the pass moves on.
pub fn download_entries<S: Session>(session: &mut S, entries: &[RemoteEntry], raw_dir: &Path) -> PassReport {
    let mut report = PassReport::default();

    for entry in entries.iter().filter(|e| e.is_file()) {
        let path = raw_dir.join(&entry.name);
        report.calls += 1;

        match download_entry(session, &entry.name, &path) {
            Ok(bytes) => {
                debug!("Downloaded {} ({} bytes)", entry.name, bytes);
                report.downloaded.push(entry.name.clone());
            }
            Err(e) => {
                if e.is_timeout() {
                    warn!("Timed out downloading file {}: {}", entry.name, e);
                } else {
                    warn!("Error downloading file {}: {}", entry.name, e);
                }
                if let Err(e) = fs::remove_file(&path) {
                    if e.kind() != io::ErrorKind::NotFound {
                        warn!("Cannot remove partial file {}: {}", path.display(), e);
                    }
                }
                report.failed.push(entry.name.clone());
            }
        }
    }

    report
}

fn download_entry<S: Session>(session: &mut S, name: &str, path: &Path) -> Result<u64, RemoteError> {
    let mut file = BufWriter::new(File::create(path)?);
    let bytes = session.retrieve(name, &mut file)?;
    file.flush()?;

    Ok(bytes)
}

/// Local name of a decompressed file.
pub fn decompressed_name(name: &str) -> &str {
    name.strip_suffix(COMPRESSED_SUFFIX).unwrap_or(name)
}

/// Inflates each file of `entries` from `raw_dir` into `out_dir`, returning
/// the decompressed paths in the same order.
pub fn decompress(entries: &[RemoteEntry], raw_dir: &Path, out_dir: &Path) -> Result<Vec<PathBuf>, JobError> {
    let mut decompressed = Vec::with_capacity(entries.len());

    for entry in entries {
        let source = raw_dir.join(&entry.name);
        let target = out_dir.join(decompressed_name(&entry.name));

        inflate(&source, &target).map_err(|source_err| JobError::Decompress {
            path: source.clone(),
            source: source_err,
        })?;
        decompressed.push(target);
    }

    Ok(decompressed)
}

fn inflate(source: &Path, target: &Path) -> io::Result<u64> {
    let mut decoder = MultiGzDecoder::new(File::open(source)?);
    let mut writer = BufWriter::new(File::create(target)?);
    let bytes = copy(&mut decoder, &mut writer)?;
    writer.flush()?;

    Ok(bytes)
}

/// Concatenates `files`, in order, into `target`.
pub fn merge(files: &[PathBuf], target: &Path) -> Result<u64, JobError> {
    let merge_err = |source| JobError::Merge {
        path: target.to_path_buf(),
        source,
    };

    let mut writer = BufWriter::new(File::create(target).map_err(merge_err)?);
    let mut total = 0;
    for file in files {
        let mut reader = File::open(file).map_err(merge_err)?;
        total += copy(&mut reader, &mut writer).map_err(merge_err)?;
    }
    writer.flush().map_err(merge_err)?;

    Ok(total)
}

// -- Tests -------------------------------------------------------------------
