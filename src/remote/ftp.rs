//! Anonymous FTP sessions against the archive server.

use std::{
    io::{self, Write},
    net::ToSocketAddrs,
    time::Duration,
};

use suppaftp::{types::FileType, FtpError, FtpStream};
use tracing::debug;

use super::{parse_mlsd_line, Connector, RemoteEntry, Session};
use crate::{
    config::Config,
    error::{is_timeout_kind, RemoteError},
};

#[derive(Debug, Clone)]
pub struct FtpConnector {
    server: String,
    user: String,
    password: String,
    connect_timeout: Duration,
    read_timeout: Duration,
}

impl FtpConnector {
    pub fn from_config(config: &Config) -> Self {
        FtpConnector {
            server: config.server.clone(),
            user: config.user.clone(),
            password: config.password.clone(),
            connect_timeout: config.connect_timeout,
            read_timeout: config.read_timeout,
        }
    }
}

impl Connector for FtpConnector {
    type Session = FtpSession;

    fn connect(&self) -> Result<FtpSession, RemoteError> {
        let addr = self
            .server
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| RemoteError::Protocol(format!("cannot resolve {}", self.server)))?;

        debug!("Connecting to FTP server {}", self.server);
        // Active mode; the server must open the data connection within the connect timeout.
        let mut stream = FtpStream::connect_timeout(addr, self.connect_timeout)?.active_mode(self.connect_timeout);
        stream.get_ref().set_read_timeout(Some(self.read_timeout))?;

        stream.login(self.user.as_str(), self.password.as_str())?;
        stream.transfer_type(FileType::Binary)?;
        debug!("Login to FTP successful");

        Ok(FtpSession {
            stream,
            read_timeout: self.read_timeout,
        })
    }
}

pub struct FtpSession {
    stream: FtpStream,
    read_timeout: Duration,
}

impl Session for FtpSession {
    fn list(&mut self, dir: &str) -> Result<Vec<RemoteEntry>, RemoteError> {
        self.stream.cwd(dir)?;
        let lines = self.stream.mlsd(None)?;

        let entries = lines
            .iter()
            .filter_map(|line| {
                let entry = parse_mlsd_line(line);
                if entry.is_none() {
                    debug!("Skipping unparsable listing line {:?}", line);
                }
                entry
            })
            .collect();

        Ok(entries)
    }

    /// The data connection gets its own read timeout, so a stalled transfer
    /// fails instead of blocking the session.
    fn retrieve(&mut self, name: &str, sink: &mut dyn Write) -> Result<u64, RemoteError> {
        let mut data = self.stream.retr_as_stream(name)?;
        data.get_ref().set_nonblocking(false)?;
        data.get_ref().set_read_timeout(Some(self.read_timeout))?;

        let written = io::copy(&mut data, sink)?;
        self.stream.finalize_retr_stream(data)?;

        Ok(written)
    }

    fn quit(&mut self) -> Result<(), RemoteError> {
        self.stream.quit()?;
        debug!("Disconnected from FTP");

        Ok(())
    }
}

impl From<FtpError> for RemoteError {
    fn from(err: FtpError) -> Self {
        let message = err.to_string();

        match err {
            FtpError::ConnectionError(e) if is_timeout_kind(e.kind()) => RemoteError::Timeout(message),
            FtpError::ConnectionError(e) => RemoteError::Io(e),
            FtpError::UnexpectedResponse(_) => RemoteError::Rejected(message),
            _ => RemoteError::Protocol(message),
        }
    }
}
