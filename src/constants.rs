//! Application-wide constants
//!
//! Centralized constants to avoid duplication and ensure consistency.

// =============================================================================
// Addressing
// =============================================================================

/// Longest host accepted in a TCP address, `"ddd.ddd.ddd.ddd"`
pub const MAX_IPV4_HOST_LEN: usize = 15;

/// Separator between host and port in a TCP address
pub const PORT_SEPARATOR: char = ':';

// =============================================================================
// I/O
// =============================================================================

/// Segments offered to a single scatter-gather send (Linux `IOV_MAX`)
pub const MAX_IOV_SEGMENTS: usize = 1024;

// =============================================================================
// Files
// =============================================================================

/// Config file looked up in the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "tcp-writer.toml";
