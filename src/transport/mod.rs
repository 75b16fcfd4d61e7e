//! Transport abstraction for byte-level I/O
//!
//! A transport owns one connection and exposes the five lifecycle calls a
//! [`Writer`](crate::writer::Writer) drives:
//! - `open` / `close`: connection state machine
//! - `read` / `write`: exact-fill read, all-or-nothing vectored write
//! - `destroy`: consume the transport
//!
//! A transport does NOT handle:
//! - Framing or buffering (that's the writer's caller's job)
//! - Reconnection (a failed read/write leaves it connected; close it first)
//! - Serializing concurrent callers (that's the writer's job)
//!
//! # Adding a new transport
//!
//! 1. Create `transport/my_transport.rs`
//! 2. Implement the `Transport` trait, usually on top of `StreamLink`
//! 3. Add `pub mod my_transport;` here

pub mod address;
pub mod stream;
pub mod tcp;
#[cfg(unix)]
pub mod unix;
pub mod vectored;

pub use address::Endpoint;
pub use tcp::{TcpTransport, TcpTransportOptions};
#[cfg(unix)]
pub use unix::{UnixTransport, UnixTransportOptions};

use crate::error::Result;
use std::io::IoSlice;

/// Lifecycle calls of a pluggable transport
///
/// # Lifecycle
///
/// 1. Construct the transport (no I/O happens)
/// 2. `open()` connects; calling it again while connected is a no-op
/// 3. `write()` / `read()` while connected
/// 4. `close()` disconnects; closing twice is an error
/// 5. `destroy()` exactly once, enforced by taking `Box<Self>`
pub trait Transport: Send {
    /// Connect unless already connected
    fn open(&mut self) -> Result<()>;

    /// Disconnect; fails if not connected
    fn close(&mut self) -> Result<()>;

    /// Fill `buf` completely or fail
    fn read(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Deliver every byte of `segments`, in order, or fail
    fn write(&mut self, segments: &[IoSlice<'_>]) -> Result<()>;

    /// Release the transport
    fn destroy(self: Box<Self>) -> Result<()>;

    fn is_connected(&self) -> bool;

    /// Human-readable peer, for logs
    fn peer(&self) -> String;
}
