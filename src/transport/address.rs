//! `"<ipv4>:<port>"` address parsing
//!
//! Parsing happens once, when a transport is built. The result is an
//! immutable [`Endpoint`]; nothing here touches the network.

use crate::constants::{MAX_IPV4_HOST_LEN, PORT_SEPARATOR};
use crate::error::{Result, TransportError};
use std::fmt;
use std::net::{Ipv4Addr, SocketAddrV4};
use tracing::warn;

/// Remote side of a TCP transport
///
/// A host that is not dotted-decimal still yields an endpoint; it simply has
/// no resolved address and every connect attempt fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    host: String,
    port: u16,
    ip: Option<Ipv4Addr>,
}

impl Endpoint {
    /// Parse `"<host>:<port>"`
    ///
    /// # Errors
    ///
    /// - `MissingPortSeparator` - no `:` in `address`
    /// - `HostTooLong` - host longer than `"ddd.ddd.ddd.ddd"`
    ///
    /// The port is read leniently: leading decimal digits are used, anything
    /// else yields 0, and values past 65535 wrap. This logs a warning but is
    /// never an error.
    pub fn parse(address: &str) -> Result<Self> {
        let (host, port_text) =
            address
                .split_once(PORT_SEPARATOR)
                .ok_or_else(|| TransportError::MissingPortSeparator {
                    address: address.to_string(),
                })?;

        // Reject rather than truncate: a cut host can still look valid
        if host.len() > MAX_IPV4_HOST_LEN {
            return Err(TransportError::HostTooLong {
                host: host.to_string(),
                max: MAX_IPV4_HOST_LEN,
            });
        }

        let (port, exact) = parse_port_lenient(port_text);
        if !exact {
            warn!(port_text, port, "port is not a plain decimal in 0..=65535");
        }

        Ok(Self {
            host: host.to_string(),
            port,
            ip: host.parse().ok(),
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Parsed IPv4 address, `None` if the host was not dotted-decimal
    pub fn ip(&self) -> Option<Ipv4Addr> {
        self.ip
    }

    pub fn socket_addr(&self) -> Option<SocketAddrV4> {
        self.ip.map(|ip| SocketAddrV4::new(ip, self.port))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Leading decimal digits, modulo 65536
///
/// Second value is false when anything was ignored, wrapped, or missing.
fn parse_port_lenient(text: &str) -> (u16, bool) {
    let digits = text.bytes().take_while(u8::is_ascii_digit);

    let mut port: u16 = 0;
    let mut count = 0;
    let mut overflowed = false;
    for d in digits {
        let d = u16::from(d - b'0');
        match port.checked_mul(10).and_then(|p| p.checked_add(d)) {
            Some(p) => port = p,
            None => {
                overflowed = true;
                port = port.wrapping_mul(10).wrapping_add(d);
            }
        }
        count += 1;
    }

    let exact = count > 0 && count == text.len() && !overflowed;
    (port, exact)
}
