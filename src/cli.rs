//! Command-line interface definition using clap
//!
//! Provides structured argument parsing with automatic help generation.

use clap::Parser;
use std::path::PathBuf;
use tcp_writer::config::{Config, TransportKind};

// =============================================================================
// CLI Definition
// =============================================================================

/// Send stdin lines over a TCP (or Unix-domain) stream, one vectored write per line
#[derive(Parser, Debug, Default)]
#[command(name = "tcp-writer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose debug output
    #[arg(short, long)]
    pub verbose: bool,

    /// Config file (default: ./tcp-writer.toml if present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Destination as <ipv4>:<port> (overrides config)
    #[arg(long, value_name = "ADDR", conflicts_with = "unix")]
    pub addr: Option<String>,

    /// Unix-domain socket path (overrides config)
    #[arg(long, value_name = "PATH")]
    pub unix: Option<PathBuf>,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded config
    pub fn apply(&self, config: &mut Config) {
        if let Some(addr) = &self.addr {
            config.transport.kind = TransportKind::Tcp;
            config.transport.address = Some(addr.clone());
        }
        if let Some(path) = &self.unix {
            config.transport.kind = TransportKind::Unix;
            config.transport.path = Some(path.clone());
        }
        if self.verbose {
            config.logging.verbose = true;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_defaults() {
        let cli = Cli::parse_from(["tcp-writer"]);
        assert!(!cli.verbose);
        assert!(!cli.json);
        assert!(cli.addr.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_parse_verbose() {
        let cli = Cli::parse_from(["tcp-writer", "-v"]);
        assert!(cli.verbose);

        let cli = Cli::parse_from(["tcp-writer", "--verbose"]);
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_addr_overrides_config() {
        let cli = Cli::parse_from(["tcp-writer", "--addr", "127.0.0.1:6000"]);
        let mut config = Config::default();
        config.transport.address = Some("10.0.0.1:1".into());
        cli.apply(&mut config);
        assert_eq!(config.transport.address.as_deref(), Some("127.0.0.1:6000"));
        assert_eq!(config.transport.kind, TransportKind::Tcp);
    }

    #[test]
    fn test_cli_unix_switches_kind() {
        let cli = Cli::parse_from(["tcp-writer", "--unix", "/tmp/w.sock"]);
        let mut config = Config::default();
        cli.apply(&mut config);
        assert_eq!(config.transport.kind, TransportKind::Unix);
    }

    #[test]
    fn test_cli_addr_and_unix_conflict() {
        let result =
            Cli::try_parse_from(["tcp-writer", "--addr", "127.0.0.1:1", "--unix", "/tmp/w.sock"]);
        assert!(result.is_err());
    }
}
