//! Centralized error types for the transport
//!
//! All transport errors are represented by the `TransportError` enum.
//! Use `Result<T>` as shorthand for `std::result::Result<T, TransportError>`.

use std::fmt;
use std::path::PathBuf;

/// Failure category of a [`TransportError`]
///
/// Callers branch on the kind, not on individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad or missing configuration, surfaces at construction
    Configuration,
    /// The OS refused to hand out a socket
    ResourceExhaustion,
    /// Could not reach the peer
    Connectivity,
    /// Send/receive failed on an established connection
    ProtocolIo,
    /// Operation not valid in the current connection state
    State,
}

/// All transport errors
#[derive(Debug)]
pub enum TransportError {
    // === Configuration ===
    /// No options were supplied to the constructor
    MissingOptions,
    /// Options exist but no address was set
    MissingAddress,
    /// Address has no `:` between host and port
    MissingPortSeparator { address: String },
    /// Host part longer than a dotted-decimal IPv4 address can be
    HostTooLong { host: String, max: usize },
    /// Invalid config value
    ConfigValidation { field: &'static str, reason: String },
    /// Config file could not be parsed
    ConfigParse { path: PathBuf, message: String },
    /// File system operation failed
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // === Open ===
    /// Socket allocation failed
    SocketAlloc { source: std::io::Error },
    /// A required socket option could not be applied
    SocketOption {
        option: &'static str,
        source: std::io::Error,
    },
    /// connect() failed
    Connect {
        target: String,
        source: std::io::Error,
    },

    // === Established connection ===
    /// Vectored send failed
    Write { source: std::io::Error },
    /// Exact read failed
    Read { source: std::io::Error },
    /// Closing the OS handle reported an error
    Close { source: std::io::Error },

    // === State ===
    /// Operation requires a connected transport
    NotConnected { op: &'static str },
}

impl TransportError {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingOptions
            | Self::MissingAddress
            | Self::MissingPortSeparator { .. }
            | Self::HostTooLong { .. }
            | Self::ConfigValidation { .. }
            | Self::ConfigParse { .. }
            | Self::Io { .. } => ErrorKind::Configuration,
            Self::SocketAlloc { .. } => ErrorKind::ResourceExhaustion,
            Self::SocketOption { .. } | Self::Connect { .. } => ErrorKind::Connectivity,
            Self::Write { .. } | Self::Read { .. } | Self::Close { .. } => ErrorKind::ProtocolIo,
            Self::NotConnected { .. } => ErrorKind::State,
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. }
            | Self::SocketAlloc { source }
            | Self::SocketOption { source, .. }
            | Self::Connect { source, .. }
            | Self::Write { source }
            | Self::Read { source }
            | Self::Close { source } => Some(source),
            _ => None,
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingOptions => write!(f, "No transport options supplied"),
            Self::MissingAddress => write!(f, "No socket address configured"),
            Self::MissingPortSeparator { address } => {
                write!(f, "Missing ':' port separator in address: {}", address)
            }
            Self::HostTooLong { host, max } => {
                write!(f, "Host '{}' exceeds {} characters", host, max)
            }
            Self::ConfigValidation { field, reason } => {
                write!(f, "Invalid {}: {}", field, reason)
            }
            Self::ConfigParse { path, message } => {
                write!(f, "Cannot parse config {}: {}", path.display(), message)
            }
            Self::Io { path, .. } => write!(f, "IO error: {}", path.display()),
            Self::SocketAlloc { .. } => write!(f, "Cannot allocate socket"),
            Self::SocketOption { option, .. } => write!(f, "Cannot set socket option {}", option),
            Self::Connect { target, source } => {
                write!(f, "Cannot connect to {}: {}", target, source)
            }
            Self::Write { source } => write!(f, "Write failed: {}", source),
            Self::Read { source } => write!(f, "Read failed: {}", source),
            Self::Close { source } => write!(f, "Close failed: {}", source),
            Self::NotConnected { op } => write!(f, "Cannot {}: transport not connected", op),
        }
    }
}

/// Alias for Result with TransportError
pub type Result<T> = std::result::Result<T, TransportError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::io;

    #[test]
    fn test_kind_taxonomy() {
        assert_eq!(TransportError::MissingAddress.kind(), ErrorKind::Configuration);
        assert_eq!(
            TransportError::SocketAlloc {
                source: io::Error::from(io::ErrorKind::OutOfMemory)
            }
            .kind(),
            ErrorKind::ResourceExhaustion
        );
        assert_eq!(
            TransportError::Write {
                source: io::Error::from(io::ErrorKind::BrokenPipe)
            }
            .kind(),
            ErrorKind::ProtocolIo
        );
        assert_eq!(
            TransportError::NotConnected { op: "close" }.kind(),
            ErrorKind::State
        );
    }

    #[test]
    fn test_source_chain() {
        let err = TransportError::Connect {
            target: "127.0.0.1:1".into(),
            source: io::Error::from(io::ErrorKind::ConnectionRefused),
        };
        assert!(err.source().is_some());
        assert!(TransportError::MissingOptions.source().is_none());
    }

    #[test]
    fn test_display_mentions_operation() {
        let msg = TransportError::NotConnected { op: "write" }.to_string();
        assert!(msg.contains("write"));
    }
}
