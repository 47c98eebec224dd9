//! Remote archive inventory and the session seam used by year jobs.

pub mod ftp;

#[cfg(test)]
pub mod fake;

use std::io::Write;

use chrono::NaiveDateTime;

use crate::error::RemoteError;

pub use ftp::FtpConnector;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Other,
}

/// One object reported by a directory listing.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteEntry {
    pub name: String,
    pub size: u64,
    pub kind: EntryKind,
    pub modified: Option<NaiveDateTime>,
}

impl RemoteEntry {
    #[cfg(test)]
    pub fn file(name: &str, size: u64) -> Self {
        RemoteEntry {
            name: name.to_string(),
            size,
            kind: EntryKind::File,
            modified: None,
        }
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

/// Opens sessions against the archive server.
pub trait Connector: Send + Sync + 'static {
    type Session: Session;

    /// Connects and logs in. Failure here is fatal for the calling job.
    fn connect(&self) -> Result<Self::Session, RemoteError>;
}

/// A live, logged-in session. Listing and retrievals share it.
pub trait Session {
    /// Lists the entries of a remote directory.
    fn list(&mut self, dir: &str) -> Result<Vec<RemoteEntry>, RemoteError>;

    /// Streams one file of the current directory into `sink`, returning the
    /// number of bytes written.
    fn retrieve(&mut self, name: &str, sink: &mut dyn Write) -> Result<u64, RemoteError>;

    fn quit(&mut self) -> Result<(), RemoteError>;
}

/// Parses one MLSD line, e.g. `type=file;size=1024;modify=20150101120000; name.gz`.
pub fn parse_mlsd_line(line: &str) -> Option<RemoteEntry> {
    let (facts, name) = line.trim_end_matches(['\r', '\n']).split_once(' ')?;
    if name.is_empty() {
        return None;
    }

    let mut kind = EntryKind::Other;
    let mut size = 0;
    let mut modified = None;

    for fact in facts.split(';').filter(|f| !f.is_empty()) {
        let Some((key, value)) = fact.split_once('=') else {
            continue;
        };
        match key.to_ascii_lowercase().as_str() {
            "type" if value.eq_ignore_ascii_case("file") => kind = EntryKind::File,
            "size" => size = value.parse().unwrap_or(0),
            "modify" => {
                let whole_seconds = value.split('.').next().unwrap_or(value);
                modified = NaiveDateTime::parse_from_str(whole_seconds, "%Y%m%d%H%M%S").ok();
            }
            _ => {}
        }
    }

    Some(RemoteEntry {
        name: name.to_string(),
        size,
        kind,
        modified,
    })
}

#[cfg(test)]
mod tests {

    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn should_parse_file_line() {
        let entry =
            parse_mlsd_line("type=file;size=24580;modify=20160315093000.123; 010010-99999-1901.gz")
                .unwrap();

        assert_eq!(entry.name, "010010-99999-1901.gz");
        assert_eq!(entry.size, 24580);
        assert!(entry.is_file());
        assert_eq!(
            entry.modified,
            NaiveDate::from_ymd_opt(2016, 3, 15)
                .unwrap()
                .and_hms_opt(9, 30, 0)
        );
    }

    #[test]
    fn should_treat_directories_as_other() {
        let cdir = parse_mlsd_line("type=cdir;modify=20160315093000; /pub/data/noaa/1901").unwrap();
        let pdir = parse_mlsd_line("Type=pdir; ..").unwrap();

        assert_eq!(cdir.kind, EntryKind::Other);
        assert_eq!(pdir.kind, EntryKind::Other);
    }

    #[test]
    fn should_reject_lines_without_name() {
        assert_eq!(parse_mlsd_line("type=file;size=10;"), None);
        assert_eq!(parse_mlsd_line(""), None);
    }

    #[test]
    fn should_default_missing_size_to_zero() {
        let entry = parse_mlsd_line("type=file; empty.gz").unwrap();
        assert_eq!(entry.size, 0);
        assert_eq!(entry.modified, None);
    }
}
