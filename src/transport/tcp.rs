//! IPv4 TCP transport
//!
//! Built from `TcpTransportOptions` holding `"<ipv4>:<port>"`. The address is
//! parsed at construction; the socket is only created on `open()`.
//!
//! # Example
//!
//! ```ignore
//! let mut options = TcpTransportOptions::new();
//! options.set_socket_addr(Some("127.0.0.1:6000"));
//! let mut transport = TcpTransport::new(Some(&options))?;
//!
//! transport.open()?;
//! transport.write(&[IoSlice::new(b"ab"), IoSlice::new(b"cde")])?;
//! transport.close()?;
//! ```

use super::address::Endpoint;
use super::stream::StreamLink;
use super::Transport;
use crate::error::{Result, TransportError};
use crate::socket::{SocketProvider, SystemProvider};
use socket2::{Domain, SockAddr};
use std::io::{self, IoSlice};
use tracing::debug;

/// Connection target for a TCP transport, set before the transport exists
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TcpTransportOptions {
    socket_addr: Option<String>,
}

impl TcpTransportOptions {
    /// Options with no address set
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored address; `None` clears it
    ///
    /// Not validated here, see [`TcpTransport::new`].
    pub fn set_socket_addr(&mut self, socket_addr: Option<&str>) {
        self.socket_addr = socket_addr.map(str::to_owned);
    }

    pub fn socket_addr(&self) -> Option<&str> {
        self.socket_addr.as_deref()
    }
}

/// TCP transport bound to one endpoint for its whole life
pub struct TcpTransport<P: SocketProvider = SystemProvider> {
    endpoint: Endpoint,
    link: StreamLink<P>,
}

impl TcpTransport<SystemProvider> {
    /// Build a transport using real OS sockets
    ///
    /// # Errors
    ///
    /// - `MissingOptions` - `options` is `None`
    /// - `MissingAddress` - no address was set
    /// - `MissingPortSeparator`, `HostTooLong` - see [`Endpoint::parse`]
    pub fn new(options: Option<&TcpTransportOptions>) -> Result<Self> {
        Self::with_provider(options, SystemProvider)
    }
}

impl<P: SocketProvider> TcpTransport<P> {
    /// Build a transport on top of a custom socket provider
    pub fn with_provider(options: Option<&TcpTransportOptions>, provider: P) -> Result<Self> {
        let options = options.ok_or(TransportError::MissingOptions)?;
        let address = options
            .socket_addr()
            .ok_or(TransportError::MissingAddress)?;
        let endpoint = Endpoint::parse(address)?;
        debug!(%endpoint, "tcp transport created");

        Ok(Self {
            endpoint,
            link: StreamLink::new(provider),
        })
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }
}

impl<P: SocketProvider> Transport for TcpTransport<P> {
    fn open(&mut self) -> Result<()> {
        if self.link.is_connected() {
            return Ok(());
        }

        // A host that never parsed can't be connected to; no socket needed
        let Some(addr) = self.endpoint.socket_addr() else {
            return Err(TransportError::Connect {
                target: self.endpoint.to_string(),
                source: io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "host is not a dotted-decimal IPv4 address",
                ),
            });
        };

        self.link.open(
            Domain::IPV4,
            &SockAddr::from(addr),
            &self.endpoint.to_string(),
        )
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
        let peer = self.endpoint.to_string();
        self.link.release(&peer);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.link.is_connected()
    }

    fn peer(&self) -> String {
        self.endpoint.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::socket::mock::MockProvider;

    fn options(addr: &str) -> TcpTransportOptions {
        let mut options = TcpTransportOptions::new();
        options.set_socket_addr(Some(addr));
        options
    }

    #[test]
    fn test_options_start_empty() {
        assert_eq!(TcpTransportOptions::new().socket_addr(), None);
    }

    #[test]
    fn test_options_replace_and_clear() {
        let mut options = options("10.0.0.1:1");
        options.set_socket_addr(Some("10.0.0.2:2"));
        assert_eq!(options.socket_addr(), Some("10.0.0.2:2"));
        options.set_socket_addr(None);
        assert_eq!(options.socket_addr(), None);
    }

    #[test]
    fn test_new_requires_options() {
        let err = TcpTransport::new(None).err().unwrap();
        assert!(matches!(err, TransportError::MissingOptions));
    }

    #[test]
    fn test_new_requires_address() {
        let err = TcpTransport::new(Some(&TcpTransportOptions::new()))
            .err()
            .unwrap();
        assert!(matches!(err, TransportError::MissingAddress));
    }

    #[test]
    fn test_new_parses_endpoint() {
        let transport = TcpTransport::new(Some(&options("127.0.0.1:5353"))).unwrap();
        assert_eq!(transport.endpoint().port(), 5353);
        assert!(!transport.is_connected());
        assert_eq!(transport.peer(), "127.0.0.1:5353");
    }

    #[test]
    fn test_unparsed_host_fails_at_open_without_socket() {
        let provider = MockProvider::default();
        let mut transport =
            TcpTransport::with_provider(Some(&options("bogus:80")), provider.clone()).unwrap();
        let err = transport.open().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Connectivity);
        assert!(!transport.is_connected());
        assert_eq!(provider.ledger().allocated, 0);
    }

    #[test]
    fn test_lifecycle_through_trait_object() {
        let provider = MockProvider::default();
        let transport =
            TcpTransport::with_provider(Some(&options("127.0.0.1:9")), provider.clone()).unwrap();
        let mut transport: Box<dyn Transport> = Box::new(transport);

        transport.open().unwrap();
        transport
            .write(&[IoSlice::new(b"ab"), IoSlice::new(b""), IoSlice::new(b"cde")])
            .unwrap();
        transport.close().unwrap();
        assert_eq!(
            transport.write(&[IoSlice::new(b"x")]).unwrap_err().kind(),
            ErrorKind::State
        );
        transport.destroy().unwrap();

        let ledger = provider.ledger();
        assert_eq!(ledger.received, b"abcde");
        assert_eq!(ledger.live, 0);
    }
}
