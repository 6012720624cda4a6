//! Bounds-checked wire format views for `ICMPv4` dissection.
//!
//! The following packets are supported:
//! - `ICMPv4` (including the RFC 8335 extended echo header)
//! - `IPv4`
//! - `UDP` and `TCP` (ports only)
//! - `ICMP` multi-part extensions (RFC 4884, RFC 4950, RFC 5837, RFC 8335)
//!
//! # Truncation
//!
//! Every view is constructed over a [`Buffer`](buffer::Buffer) holding only the captured bytes of
//! a packet. Fixed size headers are validated when a view is created and every variable part is
//! read through a fallible accessor, so a truncated or hostile packet surfaces as an
//! [`Error`](error::Error) rather than a panic.
//!
//! # Endianness
//!
//! The wire representation is network byte order (big-endian) and all accessor methods return
//! data in host byte order.
//!
//! # Example
//!
//! The following example parses an `ICMPv4` echo request:
//!
//! ```rust
//! # fn main() -> anyhow::Result<()> {
//! use icmplens_packet::buffer::Buffer;
//! use icmplens_packet::icmpv4::{Echo, IcmpMessage, IcmpPacket};
//!
//! let buf = hex_literal::hex!("08 00 f7 fd 00 01 00 01");
//! let packet = IcmpPacket::new_view(Buffer::new(&buf))?;
//! let message = IcmpMessage::try_from(&packet)?;
//! assert_eq!(
//!     IcmpMessage::EchoRequest(Echo {
//!         identifier: 1,
//!         sequence: 1
//!     }),
//!     message
//! );
//! # Ok(())
//! # }
//! ```
#![forbid(unsafe_code)]

/// Bounds-checked access to captured bytes.
pub mod buffer;

/// Packet errors.
pub mod error;

/// Functions for calculating network checksums.
pub mod checksum;

/// `ICMPv4` packets.
pub mod icmpv4;

/// `ICMP` extensions.
pub mod icmp_extension;

/// `IPv4` packets.
pub mod ipv4;

/// `UDP` packets.
pub mod udp;

/// `TCP` packets.
pub mod tcp;

/// The IP packet next layer protocol.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum IpProtocol {
    Icmp,
    IcmpV6,
    Udp,
    Tcp,
    Other(u8),
}

impl IpProtocol {
    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            Self::Icmp => 1,
            Self::IcmpV6 => 58,
            Self::Udp => 17,
            Self::Tcp => 6,
            Self::Other(id) => id,
        }
    }
}

impl From<u8> for IpProtocol {
    fn from(id: u8) -> Self {
        match id {
            1 => Self::Icmp,
            58 => Self::IcmpV6,
            17 => Self::Udp,
            6 => Self::Tcp,
            p => Self::Other(p),
        }
    }
}

/// Format a payload as a hexadecimal string.
#[must_use]
pub fn fmt_payload(bytes: &[u8]) -> String {
    use itertools::Itertools as _;
    format!("{:02x}", bytes.iter().format(" "))
}
