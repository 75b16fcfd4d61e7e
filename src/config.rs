//! Configuration management
//!
//! Optional TOML file, `tcp-writer.toml` in the working directory by default.
//! Command-line flags override file values.
//!
//! ```toml
//! [transport]
//! kind = "tcp"
//! address = "127.0.0.1:6000"
//!
//! [writer]
//! content_types = ["protobuf:dnstap.Dnstap"]
//!
//! [logging]
//! verbose = false
//! ```

use crate::constants::DEFAULT_CONFIG_FILE;
use crate::error::{Result, TransportError};
use crate::transport::TcpTransportOptions;
use crate::writer::{self, Writer, WriterOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

// =============================================================================
// Application Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub transport: TransportConfig,
    pub writer: WriterConfig,
    pub logging: LoggingConfig,
}

// =============================================================================
// Transport Configuration
// =============================================================================

/// Which transport the writer drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// IPv4 TCP, needs `address`
    #[default]
    Tcp,
    /// Unix-domain stream socket, needs `path` (unix only)
    Unix,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    pub kind: TransportKind,
    /// `"<ipv4>:<port>"`
    pub address: Option<String>,
    pub path: Option<PathBuf>,
}

// =============================================================================
// Writer / Logging Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    pub content_types: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub verbose: bool,
}

impl Config {
    /// Read and parse a config file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| TransportError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&text, path)
    }

    /// Load `path` if given, else the default file if present, else defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::load(default)
                } else {
                    debug!("no config file, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    fn parse(text: &str, path: &Path) -> Result<Self> {
        toml::from_str(text).map_err(|e| TransportError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Check that the selected transport has its target set
    ///
    /// Address syntax itself is checked when the transport is built.
    pub fn validate(&self) -> Result<()> {
        match self.transport.kind {
            TransportKind::Tcp if self.transport.address.is_none() => {
                Err(TransportError::ConfigValidation {
                    field: "transport.address",
                    reason: "required for tcp transport".to_string(),
                })
            }
            TransportKind::Unix if self.transport.path.is_none() => {
                Err(TransportError::ConfigValidation {
                    field: "transport.path",
                    reason: "required for unix transport".to_string(),
                })
            }
            #[cfg(not(unix))]
            TransportKind::Unix => Err(TransportError::ConfigValidation {
                field: "transport.kind",
                reason: "unix transport not supported on this platform".to_string(),
            }),
            _ => Ok(()),
        }
    }

    pub fn writer_options(&self) -> WriterOptions {
        let mut options = WriterOptions::new();
        for content_type in &self.writer.content_types {
            options.add_content_type(content_type.clone());
        }
        options
    }

    /// Build the writer described by this config
    pub fn build_writer(&self) -> Result<Writer> {
        self.validate()?;
        match self.transport.kind {
            TransportKind::Tcp => {
                let mut options = TcpTransportOptions::new();
                options.set_socket_addr(self.transport.address.as_deref());
                writer::build_transport(Some(&options), self.writer_options())
            }
            #[cfg(unix)]
            TransportKind::Unix => {
                let mut options = crate::transport::UnixTransportOptions::new();
                options.set_socket_path(self.transport.path.as_deref());
                writer::build_unix_transport(Some(&options), self.writer_options())
            }
            #[cfg(not(unix))]
            TransportKind::Unix => Err(TransportError::ConfigValidation {
                field: "transport.kind",
                reason: "unix transport not supported on this platform".to_string(),
            }),
        }
    }
}
