//! Unix-domain stream transport
//!
//! Same lifecycle and write semantics as the TCP transport, pointed at a
//! socket path instead of an IPv4 endpoint.

use super::stream::StreamLink;
use super::Transport;
use crate::error::{Result, TransportError};
use crate::socket::{SocketProvider, SystemProvider};
use socket2::{Domain, SockAddr};
use std::io::IoSlice;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnixTransportOptions {
    socket_path: Option<PathBuf>,
}

impl UnixTransportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored path; `None` clears it
    pub fn set_socket_path(&mut self, socket_path: Option<&Path>) {
        self.socket_path = socket_path.map(Path::to_path_buf);
    }

    pub fn socket_path(&self) -> Option<&Path> {
        self.socket_path.as_deref()
    }
}

pub struct UnixTransport<P: SocketProvider = SystemProvider> {
    path: PathBuf,
    addr: SockAddr,
    link: StreamLink<P>,
}

impl UnixTransport<SystemProvider> {
    pub fn new(options: Option<&UnixTransportOptions>) -> Result<Self> {
        Self::with_provider(options, SystemProvider)
    }
}

impl<P: SocketProvider> UnixTransport<P> {
    pub fn with_provider(options: Option<&UnixTransportOptions>, provider: P) -> Result<Self> {
        let options = options.ok_or(TransportError::MissingOptions)?;
        let path = options
            .socket_path()
            .ok_or(TransportError::MissingAddress)?;
        let addr = SockAddr::unix(path).map_err(|e| TransportError::ConfigValidation {
            field: "socket_path",
            reason: e.to_string(),
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            addr,
            link: StreamLink::new(provider),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<P: SocketProvider> Transport for UnixTransport<P> {
    fn open(&mut self) -> Result<()> {
        let peer = self.peer();
        self.link.open(Domain::UNIX, &self.addr, &peer)
    }

    fn close(&mut self) -> Result<()> {
        self.link.close()
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<()> {
        self.link.read(buf)
    }

    fn write(&mut self, segments: &[IoSlice<'_>]) -> Result<()> {
        self.link.write(segments)
    }

    fn destroy(self: Box<Self>) -> Result<()> {
        let peer = self.peer();
        self.link.release(&peer);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.link.is_connected()
    }

    fn peer(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use std::os::unix::net::UnixListener;

    #[test]
    fn test_new_requires_path() {
        let err = UnixTransport::new(Some(&UnixTransportOptions::new()))
            .err()
            .unwrap();
        assert!(matches!(err, TransportError::MissingAddress));
    }

    #[test]
    fn test_overlong_path_rejected() {
        let mut options = UnixTransportOptions::new();
        let long = "x".repeat(4096);
        options.set_socket_path(Some(Path::new(&long)));
        assert!(UnixTransport::new(Some(&options)).is_err());
    }

    #[test]
    fn test_write_over_unix_socket() {
        let path = std::env::temp_dir().join(format!("tcp-writer-{}.sock", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let listener = UnixListener::bind(&path).unwrap();

        let mut options = UnixTransportOptions::new();
        options.set_socket_path(Some(&path));
        let mut transport = UnixTransport::new(Some(&options)).unwrap();
        transport.open().unwrap();

        let (mut peer, _) = listener.accept().unwrap();
        transport
            .write(&[IoSlice::new(b"uni"), IoSlice::new(b"x")])
            .unwrap();
        transport.close().unwrap();

        let mut got = Vec::new();
        peer.read_to_end(&mut got).unwrap();
        assert_eq!(got, b"unix");
        let _ = std::fs::remove_file(&path);
    }
}
