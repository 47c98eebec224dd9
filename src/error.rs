//! Error types for remote sessions and year jobs.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Failure reported by a remote archive session.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("timed out: {0}")]
    Timeout(String),
    #[error("rejected by server: {0}")]
    Rejected(String),
    #[error("protocol error: {0}")]
    Protocol(String),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl RemoteError {
    pub fn is_timeout(&self) -> bool {
        match self {
            RemoteError::Timeout(_) => true,
            RemoteError::Io(e) => is_timeout_kind(e.kind()),
            _ => false,
        }
    }
}

/// Read timeouts surface as `WouldBlock` on unix sockets and `TimedOut` elsewhere.
pub fn is_timeout_kind(kind: io::ErrorKind) -> bool {
    matches!(kind, io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock)
}

/// Fatal failure of a single year job.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("cannot connect to archive server: {0}")]
    Connect(#[source] RemoteError),

    #[error("error while getting remote list directory {dir}: {source}")]
    Listing {
        dir: String,
        #[source]
        source: RemoteError,
    },

    #[error("error while comparing local file {}: {source}", path.display())]
    LocalState {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("aborting after {passes} attempts, {missing} files missing")]
    RetriesExhausted { passes: usize, missing: usize },

    #[error("error creating directory {}: {source}", path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot decompress {}: {source}", path.display())]
    Decompress {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot merge into {}: {source}", path.display())]
    Merge {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot transcode {}: {source}", path.display())]
    Transcode {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("permit pool closed")]
    GateClosed(#[from] tokio::sync::AcquireError),

    #[error("worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
