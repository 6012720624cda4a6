//! icmplens - an `ICMPv4` dissector.
//!
//! This crate turns captured `ICMPv4` messages into the one line summaries, checksum diagnostics
//! and multi-part extension listings printed by the standalone `icmplens` application.
//!
//! Packets may be truncated at any byte and may carry hostile length fields. A field which lies
//! beyond the captured bytes stops printing for that message and is reported as
//! [`Outcome::Truncated`], everything printed up to that point is kept.
//!
//! # Example
//!
//! The following example dissects an `ICMPv4` echo request:
//!
//! ```rust
//! # fn main() -> anyhow::Result<()> {
//! use icmplens_core::{DissectConfig, Dissector, Ipv4Decoder, NumericNames, Outcome};
//!
//! let packet = hex_literal::hex!("08 00 f7 fd 00 01 00 01");
//! let dissector = Dissector::new(DissectConfig::default(), &NumericNames, &Ipv4Decoder);
//! let mut out = Vec::new();
//! let outcome = dissector.dissect_icmp(&mut out, &packet, packet.len(), false)?;
//! assert_eq!(Outcome::Complete, outcome);
//! assert_eq!("ICMP echo request, id 1, seq 1, length 8", String::from_utf8(out)?);
//! # Ok(())
//! # }
//! ```
//!
//! # See Also
//!
//! - [`Dissector::dissect_icmp`] - Dissect an `ICMPv4` message.
//! - [`Dissector::dissect_ip`] - Dissect an `IPv4` datagram carrying `ICMPv4`.
//! - [`print_object`] - Print a single RFC 4884 extension object.
//! - [`print_extended_echo`] - Print the RFC 8335 extended echo details.
#![forbid(unsafe_code)]

mod config;
mod error;
mod extended_echo;
mod extension;
mod icmp;
mod ip;
mod names;
mod nested;
mod text;

pub use config::{defaults, DissectConfig};
pub use error::{Error, Outcome, Result};
pub use extended_echo::print_extended_echo;
pub use extension::{print_object, ObjectStatus};
pub use icmp::Dissector;
pub use ip::{IpDecoder, Ipv4Decoder};
pub use names::{NameResolver, NumericNames, ServiceNames};
