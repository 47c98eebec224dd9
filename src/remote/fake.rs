//! In-memory archive server for exercising year jobs without a network.

use std::{
    collections::HashMap,
    io::Write,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};

use flate2::{write::GzEncoder, Compression};

use super::{Connector, EntryKind, RemoteEntry, Session};
use crate::error::RemoteError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Behaviour {
    Serve,
    Reject,
    /// Writes half the bytes, then times out.
    Timeout,
}

#[derive(Debug, Clone)]
struct FakeFile {
    name: String,
    bytes: Vec<u8>,
    behaviour: Behaviour,
}

#[derive(Debug, Default)]
pub struct Stats {
    pub connects: AtomicUsize,
    pub retrievals: AtomicUsize,
    pub open: AtomicUsize,
    pub peak_open: AtomicUsize,
}

#[derive(Debug, Clone, Default)]
pub struct FakeConnector {
    dirs: Arc<HashMap<String, Vec<FakeFile>>>,
    refuse: bool,
    latency: Duration,
    pub stats: Arc<Stats>,
}

impl FakeConnector {
    pub fn new() -> Self {
        FakeConnector::default()
    }

    pub fn with_file(self, dir: &str, name: &str, bytes: Vec<u8>) -> Self {
        self.with_behaviour(dir, name, bytes, Behaviour::Serve)
    }

    pub fn with_behaviour(mut self, dir: &str, name: &str, bytes: Vec<u8>, behaviour: Behaviour) -> Self {
        let mut dirs = (*self.dirs).clone();
        dirs.entry(dir.to_string()).or_default().push(FakeFile {
            name: name.to_string(),
            bytes,
            behaviour,
        });
        self.dirs = Arc::new(dirs);
        self
    }

    pub fn refusing(mut self) -> Self {
        self.refuse = true;
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn connects(&self) -> usize {
        self.stats.connects.load(Ordering::SeqCst)
    }

    pub fn retrievals(&self) -> usize {
        self.stats.retrievals.load(Ordering::SeqCst)
    }

    pub fn peak_open(&self) -> usize {
        self.stats.peak_open.load(Ordering::SeqCst)
    }
}

impl Connector for FakeConnector {
    type Session = FakeSession;

    fn connect(&self) -> Result<FakeSession, RemoteError> {
        self.stats.connects.fetch_add(1, Ordering::SeqCst);
        if self.refuse {
            return Err(RemoteError::Rejected("530 Login incorrect.".to_string()));
        }

        let open = self.stats.open.fetch_add(1, Ordering::SeqCst) + 1;
        self.stats.peak_open.fetch_max(open, Ordering::SeqCst);

        Ok(FakeSession {
            dirs: Arc::clone(&self.dirs),
            cwd: None,
            latency: self.latency,
            stats: Arc::clone(&self.stats),
        })
    }
}

pub struct FakeSession {
    dirs: Arc<HashMap<String, Vec<FakeFile>>>,
    cwd: Option<String>,
    latency: Duration,
    stats: Arc<Stats>,
}

impl FakeSession {
    fn files(&self) -> &[FakeFile] {
        self.cwd
            .as_ref()
            .and_then(|dir| self.dirs.get(dir))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl Session for FakeSession {
    fn list(&mut self, dir: &str) -> Result<Vec<RemoteEntry>, RemoteError> {
        thread::sleep(self.latency);
        if !self.dirs.contains_key(dir) {
            return Err(RemoteError::Rejected(format!("550 {}: No such directory", dir)));
        }
        self.cwd = Some(dir.to_string());

        let mut entries = vec![RemoteEntry {
            name: dir.to_string(),
            size: 0,
            kind: EntryKind::Other,
            modified: None,
        }];
        entries.extend(
            self.files()
                .iter()
                .map(|f| RemoteEntry::file(&f.name, f.bytes.len() as u64)),
        );

        Ok(entries)
    }

    fn retrieve(&mut self, name: &str, sink: &mut dyn Write) -> Result<u64, RemoteError> {
        self.stats.retrievals.fetch_add(1, Ordering::SeqCst);
        let file = self
            .files()
            .iter()
            .find(|f| f.name == name)
            .cloned()
            .ok_or_else(|| RemoteError::Rejected(format!("550 {}: No such file", name)))?;

        match file.behaviour {
            Behaviour::Serve => {
                sink.write_all(&file.bytes)?;
                Ok(file.bytes.len() as u64)
            }
            Behaviour::Reject => Err(RemoteError::Rejected(format!("550 {}: Permission denied", name))),
            Behaviour::Timeout => {
                sink.write_all(&file.bytes[..file.bytes.len() / 2])?;
                Err(RemoteError::Timeout(format!("reading {}", name)))
            }
        }
    }

    fn quit(&mut self) -> Result<(), RemoteError> {
        Ok(())
    }
}

impl Drop for FakeSession {
    fn drop(&mut self) {
        self.stats.open.fetch_sub(1, Ordering::SeqCst);
    }
}

pub fn gzip(text: &str) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text.as_bytes()).unwrap();
    encoder.finish().unwrap()
}
