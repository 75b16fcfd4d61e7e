//! Connection lifecycle shared by stream transports
//!
//! `StreamLink` owns the provider and the connection state. The connected
//! flag and the OS handle are one value: a handle exists iff connected.

use super::vectored::write_all_vectored;
use crate::error::{Result, TransportError};
use crate::socket::{SocketProvider, StreamSocket};
use socket2::{Domain, SockAddr};
use std::io::IoSlice;
use tracing::{debug, warn};

/// Connection state of a stream transport
#[derive(Debug)]
pub enum Connection<S> {
    Disconnected,
    Connected(S),
}

/// Socket lifecycle for one destination
pub struct StreamLink<P: SocketProvider> {
    provider: P,
    connection: Connection<P::Socket>,
}

impl<P: SocketProvider> StreamLink<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            connection: Connection::Disconnected,
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.connection, Connection::Connected(_))
    }

    /// Connect to `addr` unless already connected
    ///
    /// Every failure leaves the link disconnected with no handle held.
    /// `peer` is only used for errors and logs.
    pub fn open(&mut self, domain: Domain, addr: &SockAddr, peer: &str) -> Result<()> {
        if self.is_connected() {
            return Ok(());
        }

        let socket = self
            .provider
            .stream_socket(domain)
            .map_err(|source| TransportError::SocketAlloc { source })?;

        if let Err(source) = socket.set_nosigpipe() {
            let _ = socket.close();
            return Err(TransportError::SocketOption {
                option: "SO_NOSIGPIPE",
                source,
            });
        }

        if let Err(source) = socket.connect(addr) {
            let _ = socket.close();
            debug!(peer, error = %source, "connect failed");
            return Err(TransportError::Connect {
                target: peer.to_string(),
                source,
            });
        }

        debug!(peer, "connected");
        self.connection = Connection::Connected(socket);
        Ok(())
    }

    /// Close the handle
    ///
    /// The link is disconnected afterwards even when the OS close reports an
    /// error.
    pub fn close(&mut self) -> Result<()> {
        match std::mem::replace(&mut self.connection, Connection::Disconnected) {
            Connection::Connected(socket) => {
                debug!("closing connection");
                socket
                    .close()
                    .map_err(|source| TransportError::Close { source })
            }
            Connection::Disconnected => Err(TransportError::NotConnected { op: "close" }),
        }
    }

    /// Exact-fill read; a failure keeps the connection as is
    pub fn read(&mut self, buf: &mut [u8]) -> Result<()> {
        match &mut self.connection {
            Connection::Connected(socket) => socket
                .read_exact(buf)
                .map_err(|source| TransportError::Read { source }),
            Connection::Disconnected => Err(TransportError::NotConnected { op: "read" }),
        }
    }

    /// All-or-nothing vectored write; a failure keeps the connection as is
    pub fn write(&mut self, segments: &[IoSlice<'_>]) -> Result<()> {
        match &self.connection {
            Connection::Connected(socket) => write_all_vectored(socket, segments)
                .map_err(|source| TransportError::Write { source }),
            Connection::Disconnected => Err(TransportError::NotConnected { op: "write" }),
        }
    }

    /// Tear down the link without the close transition
    ///
    /// A still-open handle is released along with the link.
    pub fn release(self, peer: &str) {
        if self.is_connected() {
            warn!(peer, "destroyed while connected, call close() first");
        }
    }
}
