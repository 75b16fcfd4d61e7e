//! Stream-socket transport backend for a generic writer
//!
//! - `transport`: the `Transport` trait, TCP and Unix-domain implementations
//! - `writer`: the `Writer` handle that drives a transport's lifecycle
//! - `socket`: the OS socket seam (`socket2`-backed, mockable)
//! - `config` / `logging`: ambient setup used by the `tcp-writer` binary

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod socket;
pub mod transport;
pub mod writer;

pub use error::{ErrorKind, Result, TransportError};
pub use transport::{Endpoint, TcpTransport, TcpTransportOptions, Transport};
pub use writer::{build_transport, Writer, WriterOptions};

#[cfg(unix)]
pub use transport::{UnixTransport, UnixTransportOptions};
#[cfg(unix)]
pub use writer::build_unix_transport;
