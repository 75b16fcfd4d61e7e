//! OS socket layer
//!
//! Transports never touch the OS directly. They go through two small traits:
//! - **SocketProvider**: allocates a fresh stream socket for a domain
//! - **StreamSocket**: the handful of calls a connected transport needs
//!
//! `SystemProvider` is the real implementation on top of `socket2`.
//! Tests plug in counting mocks to observe every OS call.

use socket2::{Domain, SockAddr, Socket, Type};
use std::ffi::c_int;
use std::io::{self, IoSlice, Read};
use tracing::debug;

/// Per-call send flags: suppress SIGPIPE where the platform has a flag for it
#[cfg(any(
    target_os = "linux",
    target_os = "android",
    target_os = "freebsd",
    target_os = "dragonfly",
    target_os = "netbsd",
    target_os = "openbsd"
))]
const SEND_FLAGS: c_int = libc::MSG_NOSIGNAL;

#[cfg(not(any(
    target_os = "linux",
    target_os = "android",
    target_os = "freebsd",
    target_os = "dragonfly",
    target_os = "netbsd",
    target_os = "openbsd"
)))]
const SEND_FLAGS: c_int = 0;

/// A stream socket handle owned by exactly one transport
pub trait StreamSocket: Send {
    /// Ask the socket not to raise SIGPIPE on a broken connection
    ///
    /// Platforms without a socket-level option return `Ok(())`.
    fn set_nosigpipe(&self) -> io::Result<()>;

    /// Blocking connect to `addr`
    fn connect(&self, addr: &SockAddr) -> io::Result<()>;

    /// One scatter-gather send; may accept fewer bytes than offered
    fn send_vectored(&self, bufs: &[IoSlice<'_>]) -> io::Result<usize>;

    /// Fill `buf` completely or fail
    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()>;

    /// Release the OS handle, reporting any error from the close call
    fn close(self) -> io::Result<()>
    where
        Self: Sized;
}

/// Allocates stream sockets
pub trait SocketProvider: Send {
    type Socket: StreamSocket;

    /// Allocate an unconnected stream socket in `domain`
    fn stream_socket(&self, domain: Domain) -> io::Result<Self::Socket>;
}

/// `socket2`-backed provider used outside of tests
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProvider;

impl SocketProvider for SystemProvider {
    type Socket = SystemSocket;

    fn stream_socket(&self, domain: Domain) -> io::Result<SystemSocket> {
        // socket2 requests close-on-exec atomically where the OS allows it
        let socket = Socket::new(domain, Type::STREAM, None)?;

        // Nothing useful can be done if this fails, keep going
        #[cfg(unix)]
        {
            if let Err(e) = socket.set_cloexec(true) {
                debug!(error = %e, "close-on-exec not applied");
            }
        }

        Ok(SystemSocket(socket))
    }
}

/// Stream socket owned by a transport
#[derive(Debug)]
pub struct SystemSocket(Socket);

impl StreamSocket for SystemSocket {
    fn set_nosigpipe(&self) -> io::Result<()> {
        #[cfg(any(
            target_os = "ios",
            target_os = "macos",
            target_os = "tvos",
            target_os = "watchos"
        ))]
        {
            self.0.set_nosigpipe(true)
        }
        #[cfg(not(any(
            target_os = "ios",
            target_os = "macos",
            target_os = "tvos",
            target_os = "watchos"
        )))]
        {
            Ok(())
        }
    }

    fn connect(&self, addr: &SockAddr) -> io::Result<()> {
        self.0.connect(addr)
    }

    fn send_vectored(&self, bufs: &[IoSlice<'_>]) -> io::Result<usize> {
        self.0.send_vectored_with_flags(bufs, SEND_FLAGS)
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        Read::read_exact(&mut self.0, buf)
    }

    fn close(self) -> io::Result<()> {
        #[cfg(unix)]
        {
            use std::os::fd::IntoRawFd;

            let fd = self.0.into_raw_fd();
            // SAFETY: `into_raw_fd` released ownership, so this is the only close of `fd`.
            if unsafe { libc::close(fd) } != 0 {
                return Err(io::Error::last_os_error());
            }
            Ok(())
        }
        #[cfg(not(unix))]
        {
            drop(self.0);
            Ok(())
        }
    }
}

// =============================================================================
// Test doubles
// =============================================================================
