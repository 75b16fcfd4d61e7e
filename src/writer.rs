//! Generic writer handle
//!
//! A `Writer` owns one boxed [`Transport`] plus the caller's opaque
//! [`WriterOptions`]. It serializes calls into the transport and guarantees
//! `destroy` runs exactly once, on [`Writer::destroy`] or on drop.

use crate::error::{Result, TransportError};
use crate::transport::{TcpTransport, TcpTransportOptions, Transport};
use bytes::Bytes;
use parking_lot::Mutex;
use std::io::IoSlice;
use tracing::{debug, warn};

#[cfg(unix)]
use crate::transport::{UnixTransport, UnixTransportOptions};

/// Writer-level options, carried through untouched by the transport
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriterOptions {
    content_types: Vec<Bytes>,
}

impl WriterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_content_type(&mut self, content_type: impl Into<Bytes>) {
        self.content_types.push(content_type.into());
    }

    pub fn content_types(&self) -> &[Bytes] {
        &self.content_types
    }
}

/// Handle callers use in place of a concrete transport
pub struct Writer {
    // `None` only after destroy
    transport: Mutex<Option<Box<dyn Transport>>>,
    options: WriterOptions,
}

impl Writer {
    pub fn new(transport: Box<dyn Transport>, options: WriterOptions) -> Self {
        Self {
            transport: Mutex::new(Some(transport)),
            options,
        }
    }

    pub fn options(&self) -> &WriterOptions {
        &self.options
    }

    pub fn open(&self) -> Result<()> {
        self.with_transport("open", |t| t.open())
    }

    pub fn close(&self) -> Result<()> {
        self.with_transport("close", |t| t.close())
    }

    pub fn read(&self, buf: &mut [u8]) -> Result<()> {
        self.with_transport("read", |t| t.read(buf))
    }

    pub fn write(&self, segments: &[IoSlice<'_>]) -> Result<()> {
        self.with_transport("write", |t| t.write(segments))
    }

    /// Write `frames` as one vectored write
    pub fn write_frames(&self, frames: &[Bytes]) -> Result<()> {
        let segments: Vec<IoSlice<'_>> = frames.iter().map(|f| IoSlice::new(f)).collect();
        self.write(&segments)
    }

    pub fn is_connected(&self) -> bool {
        self.transport
            .lock()
            .as_ref()
            .is_some_and(|t| t.is_connected())
    }

    pub fn peer(&self) -> Option<String> {
        self.transport.lock().as_ref().map(|t| t.peer())
    }

    /// Destroy the transport
    pub fn destroy(self) -> Result<()> {
        self.destroy_transport()
    }

    fn destroy_transport(&self) -> Result<()> {
        match self.transport.lock().take() {
            Some(transport) => {
                debug!(peer = %transport.peer(), "destroying transport");
                transport.destroy()
            }
            None => Ok(()),
        }
    }

    fn with_transport<T>(
        &self,
        op: &'static str,
        f: impl FnOnce(&mut (dyn Transport + 'static)) -> Result<T>,
    ) -> Result<T> {
        let mut guard = self.transport.lock();
        match guard.as_deref_mut() {
            Some(transport) => f(transport),
            None => Err(TransportError::NotConnected { op }),
        }
    }
}

impl Drop for Writer {
    fn drop(&mut self) {
        if let Err(e) = self.destroy_transport() {
            warn!(error = %e, "transport destroy failed");
        }
    }
}

/// Build a writer over an IPv4 TCP transport
///
/// `writer_options` is passed through unmodified.
///
/// # Errors
///
/// Any configuration error from [`TcpTransport::new`]; no writer is built.
pub fn build_transport(
    options: Option<&TcpTransportOptions>,
    writer_options: WriterOptions,
) -> Result<Writer> {
    let transport = TcpTransport::new(options)?;
    Ok(Writer::new(Box::new(transport), writer_options))
}

/// Build a writer over a Unix-domain stream transport
#[cfg(unix)]
pub fn build_unix_transport(
    options: Option<&UnixTransportOptions>,
    writer_options: WriterOptions,
) -> Result<Writer> {
    let transport = UnixTransport::new(options)?;
    Ok(Writer::new(Box::new(transport), writer_options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::socket::mock::MockProvider;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Counts destroy calls
    struct Probe {
        destroyed: Arc<AtomicUsize>,
    }

    impl Transport for Probe {
        fn open(&mut self) -> Result<()> {
            Ok(())
        }
        fn close(&mut self) -> Result<()> {
            Ok(())
        }
        fn read(&mut self, _buf: &mut [u8]) -> Result<()> {
            Ok(())
        }
        fn write(&mut self, _segments: &[IoSlice<'_>]) -> Result<()> {
            Ok(())
        }
        fn destroy(self: Box<Self>) -> Result<()> {
            self.destroyed.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
        fn is_connected(&self) -> bool {
            false
        }
        fn peer(&self) -> String {
            "probe".into()
        }
    }

    #[test]
    fn test_destroy_runs_once() {
        let destroyed = Arc::new(AtomicUsize::new(0));
        let writer = Writer::new(
            Box::new(Probe {
                destroyed: destroyed.clone(),
            }),
            WriterOptions::new(),
        );
        writer.destroy().unwrap();
        assert_eq!(destroyed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_destroys() {
        let destroyed = Arc::new(AtomicUsize::new(0));
        drop(Writer::new(
            Box::new(Probe {
                destroyed: destroyed.clone(),
            }),
            WriterOptions::new(),
        ));
        assert_eq!(destroyed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_options_pass_through() {
        let mut options = WriterOptions::new();
        options.add_content_type("protobuf:dnstap.Dnstap");
        let mut tcp = TcpTransportOptions::new();
        tcp.set_socket_addr(Some("127.0.0.1:6000"));
        let writer = build_transport(Some(&tcp), options.clone()).unwrap();
        assert_eq!(writer.options(), &options);
        assert_eq!(writer.peer().as_deref(), Some("127.0.0.1:6000"));
    }

    #[test]
    fn test_build_fails_without_colon() {
        let mut tcp = TcpTransportOptions::new();
        tcp.set_socket_addr(Some("127.0.0.1"));
        let err = build_transport(Some(&tcp), WriterOptions::new()).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(build_transport(None, WriterOptions::new()).is_err());
    }

    #[test]
    fn test_write_frames_over_mock() {
        let provider = MockProvider::default();
        let mut tcp = TcpTransportOptions::new();
        tcp.set_socket_addr(Some("127.0.0.1:9"));
        let transport = TcpTransport::with_provider(Some(&tcp), provider.clone()).unwrap();
        let writer = Writer::new(Box::new(transport), WriterOptions::new());

        writer.open().unwrap();
        assert!(writer.is_connected());
        writer
            .write_frames(&[Bytes::from_static(b"fr"), Bytes::from_static(b"ame")])
            .unwrap();
        writer.close().unwrap();
        writer.destroy().unwrap();

        assert_eq!(provider.ledger().received, b"frame");
    }
}
