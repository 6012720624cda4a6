use crate::config::DissectConfig;
use crate::error::{into_outcome, Outcome, Result};
use crate::extended_echo::print_extended_echo;
use crate::extension::print_extensions;
use crate::ip::IpDecoder;
use crate::names::NameResolver;
use crate::nested::print_nested;
use crate::text::{fmt_lifetime, fmt_timestamp};
use icmplens_packet::buffer::Buffer;
use icmplens_packet::checksum;
use icmplens_packet::icmp_extension::ICMP_EXTENSION_OFFSET;
use icmplens_packet::icmpv4::{
    DestinationUnreachable, IcmpMessage, IcmpPacket, IcmpRedirectCode, IcmpTimeExceededCode,
    IcmpType, ParameterProblem, RouterAdvertisement, Unreachable,
};
use icmplens_packet::IpProtocol;
use std::fmt::{Debug, Formatter};
use std::io::{self, Write};
use tracing::instrument;

/// An `ICMPv4` dissector.
///
/// Prints a one line summary of each message followed, when verbose, by the checksum
/// diagnostic, the quoted datagram of error messages, the RFC 4884 extension objects and the
/// RFC 8335 extended echo details.
///
/// Addresses and ports are named by the [`NameResolver`] and quoted datagrams are decoded by the
/// [`IpDecoder`].
pub struct Dissector<'a> {
    config: DissectConfig,
    names: &'a dyn NameResolver,
    ip: &'a dyn IpDecoder,
}

impl<'a> Dissector<'a> {
    #[must_use]
    pub fn new(config: DissectConfig, names: &'a dyn NameResolver, ip: &'a dyn IpDecoder) -> Self {
        Self { config, names, ip }
    }

    #[must_use]
    pub const fn config(&self) -> &DissectConfig {
        &self.config
    }

    #[must_use]
    pub fn names(&self) -> &'a dyn NameResolver {
        self.names
    }

    #[must_use]
    pub fn ip_decoder(&self) -> &'a dyn IpDecoder {
        self.ip
    }

    /// Dissect an `ICMPv4` message.
    ///
    /// `packet` holds the captured bytes of the message and `length` is its declared length,
    /// which may exceed the captured bytes. The checksum is not verified if `fragmented` is set.
    ///
    /// Returns [`Outcome::Truncated`] if printing stopped at a field which was not captured.
    #[instrument(skip(self, out, packet), level = "trace")]
    pub fn dissect_icmp(
        &self,
        out: &mut dyn Write,
        packet: &[u8],
        length: usize,
        fragmented: bool,
    ) -> io::Result<Outcome> {
        into_outcome(self.print_icmp(out, Buffer::new(packet), length, fragmented, 0))
    }

    /// Dissect an IP datagram with the configured [`IpDecoder`].
    #[instrument(skip(self, out, packet), level = "trace")]
    pub fn dissect_ip(
        &self,
        out: &mut dyn Write,
        packet: &[u8],
        length: usize,
    ) -> io::Result<Outcome> {
        into_outcome(self.ip.decode(self, out, Buffer::new(packet), length, 0))
    }

    /// Print an `ICMPv4` message.
    ///
    /// This is the entry point for [`IpDecoder`] implementations which carry `ICMP`, `depth` is
    /// the nesting depth given to [`IpDecoder::decode`].
    pub fn print_icmp(
        &self,
        out: &mut dyn Write,
        buf: Buffer<'_>,
        length: usize,
        fragmented: bool,
        depth: usize,
    ) -> Result<()> {
        let packet = IcmpPacket::new_view(buf)?;
        let message = IcmpMessage::try_from(&packet)?;
        write!(out, "ICMP ")?;
        self.write_summary(out, &message)?;
        write!(out, ", length {length}")?;
        if !self.config.is_verbose() {
            return Ok(());
        }
        if !fragmented {
            if let Ok(covered) = buf.slice(0, length) {
                let sum = checksum::internet_checksum(covered);
                if sum != 0 {
                    let stored = packet.get_checksum()?;
                    write!(
                        out,
                        " (wrong icmp cksum {stored:x} (->{:x})!)",
                        checksum::expected_checksum(stored, sum)
                    )?;
                }
            }
        }
        let icmp_type = packet.get_icmp_type();
        if icmp_type.is_error() {
            print_nested(self, out, packet.payload(), depth)?;
        }
        if length > ICMP_EXTENSION_OFFSET && icmp_type.is_multipart() {
            print_extensions(self, out, buf, length)?;
        }
        if icmp_type.is_extended_echo() {
            print_extended_echo(
                self.names,
                out,
                icmp_type == IcmpType::ExtendedEchoRequest,
                packet.get_icmp_code(),
                packet.get_extended_echo_info()?,
                packet.payload(),
            )?;
        }
        Ok(())
    }

    fn write_summary(&self, out: &mut dyn Write, message: &IcmpMessage) -> io::Result<()> {
        let names = self.names;
        match message {
            IcmpMessage::EchoReply(echo) => write!(
                out,
                "echo reply, id {}, seq {}",
                echo.identifier, echo.sequence
            ),
            IcmpMessage::EchoRequest(echo) => write!(
                out,
                "echo request, id {}, seq {}",
                echo.identifier, echo.sequence
            ),
            IcmpMessage::DestinationUnreachable(unreachable) => {
                self.write_unreachable(out, unreachable)
            }
            IcmpMessage::SourceQuench => write!(out, "source quench"),
            IcmpMessage::Redirect(redirect) => {
                let dst = names.ipv4(redirect.destination);
                let gateway = names.ipv4(redirect.gateway);
                match redirect.code {
                    IcmpRedirectCode::Net => write!(out, "redirect {dst} to net {gateway}"),
                    IcmpRedirectCode::Host => write!(out, "redirect {dst} to host {gateway}"),
                    IcmpRedirectCode::TosNet => write!(out, "redirect-tos {dst} to net {gateway}"),
                    IcmpRedirectCode::TosHost => {
                        write!(out, "redirect-tos {dst} to host {gateway}")
                    }
                    IcmpRedirectCode::Unknown(code) => {
                        write!(out, "redirect-#{code} {dst} to {gateway}")
                    }
                }
            }
            IcmpMessage::RouterAdvertisement(advert) => self.write_router_advert(out, advert),
            IcmpMessage::RouterSolicitation => write!(out, "router solicitation"),
            IcmpMessage::TimeExceeded(exceeded) => match exceeded.code {
                IcmpTimeExceededCode::TtlExpired => write!(out, "time exceeded in-transit"),
                IcmpTimeExceededCode::FragmentReassembly => {
                    write!(out, "ip reassembly time exceeded")
                }
                IcmpTimeExceededCode::Unknown(code) => write!(out, "time exceeded-#{code}"),
            },
            IcmpMessage::ParameterProblem(ParameterProblem::Pointer(octet)) => {
                write!(out, "parameter problem - octet {octet}")
            }
            IcmpMessage::ParameterProblem(ParameterProblem::Code(code)) => {
                write!(out, "parameter problem - code {code}")
            }
            IcmpMessage::TimestampRequest(echo) => write!(
                out,
                "time stamp query id {} seq {}",
                echo.identifier, echo.sequence
            ),
            IcmpMessage::TimestampReply(reply) => write!(
                out,
                "time stamp reply id {} seq {}: org {}, recv {}, xmit {}",
                reply.identifier,
                reply.sequence,
                fmt_timestamp(reply.originate),
                fmt_timestamp(reply.receive),
                fmt_timestamp(reply.transmit)
            ),
            IcmpMessage::InformationRequest => write!(out, "information request"),
            IcmpMessage::InformationReply => write!(out, "information reply"),
            IcmpMessage::AddressMaskRequest => write!(out, "address mask request"),
            IcmpMessage::AddressMaskReply(mask) => write!(out, "address mask is 0x{mask:08x}"),
            IcmpMessage::ExtendedEchoRequest(echo) => write!(
                out,
                "extended echo request, id {}, seq {}",
                echo.identifier, echo.sequence
            ),
            IcmpMessage::ExtendedEchoReply(echo) => write!(
                out,
                "extended echo reply, id {}, seq {}",
                echo.identifier, echo.sequence
            ),
            IcmpMessage::Other(icmp_type) => write!(out, "type-#{icmp_type}"),
        }
    }

    fn write_unreachable(
        &self,
        out: &mut dyn Write,
        unreachable: &DestinationUnreachable,
    ) -> io::Result<()> {
        let dst = self.names.ipv4(unreachable.destination);
        match unreachable.reason {
            Unreachable::Net => write!(out, "net {dst} unreachable"),
            Unreachable::Host => write!(out, "host {dst} unreachable"),
            Unreachable::Protocol(protocol) => {
                write!(out, "{dst} protocol {protocol} unreachable")
            }
            Unreachable::Port { protocol, port } => match protocol {
                IpProtocol::Tcp => write!(
                    out,
                    "{dst} tcp port {} unreachable",
                    self.names.tcp_port(port)
                ),
                IpProtocol::Udp => write!(
                    out,
                    "{dst} udp port {} unreachable",
                    self.names.udp_port(port)
                ),
                _ => write!(
                    out,
                    "{dst} protocol {} port {port} unreachable",
                    protocol.id()
                ),
            },
            Unreachable::NeedFragment { mtu: 0 } => {
                write!(out, "{dst} unreachable - need to frag")
            }
            Unreachable::NeedFragment { mtu } => {
                write!(out, "{dst} unreachable - need to frag (mtu {mtu})")
            }
            Unreachable::SourceRouteFailed => {
                write!(out, "{dst} unreachable - source route failed")
            }
            Unreachable::NetUnknown => write!(out, "net {dst} unreachable - unknown"),
            Unreachable::HostUnknown => write!(out, "host {dst} unreachable - unknown"),
            Unreachable::SourceHostIsolated => {
                write!(out, "{dst} unreachable - source host isolated")
            }
            Unreachable::NetProhibited => {
                write!(out, "net {dst} unreachable - admin prohibited")
            }
            Unreachable::HostProhibited => {
                write!(out, "host {dst} unreachable - admin prohibited")
            }
            Unreachable::TosNet => write!(out, "net {dst} unreachable - tos prohibited"),
            Unreachable::TosHost => write!(out, "host {dst} unreachable - tos prohibited"),
            Unreachable::FilterProhibited => {
                write!(out, "host {dst} unreachable - admin prohibited filter")
            }
            Unreachable::HostPrecedence => {
                write!(out, "host {dst} unreachable - host precedence violation")
            }
            Unreachable::PrecedenceCutoff => {
                write!(out, "host {dst} unreachable - precedence cutoff")
            }
            Unreachable::Unknown(code) => write!(out, "{dst} unreachable - #{code}"),
        }
    }

    fn write_router_advert(
        &self,
        out: &mut dyn Write,
        advert: &RouterAdvertisement,
    ) -> io::Result<()> {
        write!(
            out,
            "router advertisement lifetime {} {}:",
            fmt_lifetime(advert.lifetime),
            advert.num_addrs
        )?;
        if advert.entry_size != 2 {
            return write!(out, " [size {}]", advert.entry_size);
        }
        for entry in &advert.entries {
            write!(
                out,
                " {{{} {}}}",
                self.names.ipv4(entry.address),
                entry.preference
            )?;
        }
        Ok(())
    }
}

impl Debug for Dissector<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dissector")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Ipv4Decoder, NumericNames, ServiceNames};
    use hex_literal::hex;
    use test_case::test_case;

    fn summary(buf: &[u8]) -> (String, Outcome) {
        let dissector = Dissector::new(DissectConfig::default(), &ServiceNames, &Ipv4Decoder);
        let mut out = Vec::new();
        let outcome = dissector
            .dissect_icmp(&mut out, buf, buf.len(), false)
            .unwrap();
        (String::from_utf8(out).unwrap(), outcome)
    }

    #[test_case(&hex!("00 00 00 00 12 34 00 07"), "ICMP echo reply, id 4660, seq 7, length 8")]
    #[test_case(&hex!("08 00 00 00 00 01 00 02"), "ICMP echo request, id 1, seq 2, length 8")]
    #[test_case(&hex!("04 00 00 00 00 00 00 00"), "ICMP source quench, length 8")]
    #[test_case(&hex!("0a 00 00 00 00 00 00 00"), "ICMP router solicitation, length 8")]
    #[test_case(&hex!("0d 00 00 00 00 05 00 06"), "ICMP time stamp query id 5 seq 6, length 8")]
    #[test_case(&hex!("0f 00 00 00 00 00 00 00"), "ICMP information request, length 8")]
    #[test_case(&hex!("10 00 00 00 00 00 00 00"), "ICMP information reply, length 8")]
    #[test_case(&hex!("11 00 00 00 00 00 00 00"), "ICMP address mask request, length 8")]
    #[test_case(&hex!("12 00 00 00 00 00 00 00 ff ff ff 00"), "ICMP address mask is 0xffffff00, length 12")]
    #[test_case(&hex!("0c 00 00 00 14 00 00 00"), "ICMP parameter problem - octet 20, length 8")]
    #[test_case(&hex!("0c 02 00 00 00 00 00 00"), "ICMP parameter problem - code 2, length 8")]
    #[test_case(&hex!("2a 00 00 00 00 09 03 01"), "ICMP extended echo request, id 9, seq 3, length 8")]
    #[test_case(&hex!("2b 00 00 00 00 09 03 00"), "ICMP extended echo reply, id 9, seq 3, length 8")]
    #[test_case(&hex!("63 00"), "ICMP type-#99, length 2")]
    fn test_summary(buf: &[u8], expected: &str) {
        assert_eq!((String::from(expected), Outcome::Complete), summary(buf));
    }

    #[test]
    fn test_timestamp_reply() {
        let buf = hex!(
            "
            0e 00 00 00 00 01 00 02 00 00 00 00 00 38 ce fc
            05 26 5c 00
            "
        );
        assert_eq!(
            (
                String::from(
                    "ICMP time stamp reply id 1 seq 2: org 00:00:00.000, recv 01:02:03.004, \
                     xmit 24:00:00.000, length 20"
                ),
                Outcome::Complete
            ),
            summary(&buf)
        );
    }

    #[test]
    fn test_router_advert() {
        let buf = hex!(
            "
            09 00 00 00 02 02 07 08 0a 00 00 01 00 00 00 05
            0a 00 00 02 00 00 00 0a
            "
        );
        assert_eq!(
            (
                String::from(
                    "ICMP router advertisement lifetime 30:00 2: {10.0.0.1 5} {10.0.0.2 10}, \
                     length 24"
                ),
                Outcome::Complete
            ),
            summary(&buf)
        );
    }

    #[test]
    fn test_router_advert_unsupported_entry_size() {
        let buf = hex!("09 00 00 00 01 03 00 1e");
        assert_eq!(
            (
                String::from("ICMP router advertisement lifetime 30 1: [size 3], length 8"),
                Outcome::Complete
            ),
            summary(&buf)
        );
    }

    #[test]
    fn test_router_advert_truncated_entries() {
        let buf = hex!("09 00 00 00 02 02 07 08 0a 00 00 01 00 00 00 05");
        assert_eq!((String::new(), Outcome::Truncated), summary(&buf));
    }

    #[test]
    fn test_summary_truncated() {
        assert_eq!((String::new(), Outcome::Truncated), summary(&hex!("08 00 00 00 00 01")));
        assert_eq!((String::new(), Outcome::Truncated), summary(&hex!("08")));
        assert_eq!((String::new(), Outcome::Truncated), summary(&[]));
    }

    #[test_case(0, "net 10.0.0.2 unreachable")]
    #[test_case(1, "host 10.0.0.2 unreachable")]
    #[test_case(2, "10.0.0.2 protocol 17 unreachable")]
    #[test_case(3, "10.0.0.2 udp port domain unreachable")]
    #[test_case(4, "10.0.0.2 unreachable - need to frag (mtu 1400)")]
    #[test_case(5, "10.0.0.2 unreachable - source route failed")]
    #[test_case(6, "net 10.0.0.2 unreachable - unknown")]
    #[test_case(7, "host 10.0.0.2 unreachable - unknown")]
    #[test_case(8, "10.0.0.2 unreachable - source host isolated")]
    #[test_case(9, "net 10.0.0.2 unreachable - admin prohibited")]
    #[test_case(10, "host 10.0.0.2 unreachable - admin prohibited")]
    #[test_case(11, "net 10.0.0.2 unreachable - tos prohibited")]
    #[test_case(12, "host 10.0.0.2 unreachable - tos prohibited")]
    #[test_case(13, "host 10.0.0.2 unreachable - admin prohibited filter")]
    #[test_case(14, "host 10.0.0.2 unreachable - host precedence violation")]
    #[test_case(15, "host 10.0.0.2 unreachable - precedence cutoff")]
    #[test_case(16, "10.0.0.2 unreachable - #16")]
    fn test_unreachable(code: u8, expected: &str) {
        let mut buf = hex!(
            "
            03 00 00 00 00 00 05 78 45 00 00 1c 00 00 00 00
            40 11 00 00 0a 00 00 01 0a 00 00 02 c3 50 00 35
            00 08 00 00
            "
        );
        buf[1] = code;
        assert_eq!(
            (format!("ICMP {expected}, length 36"), Outcome::Complete),
            summary(&buf)
        );
    }

    #[test]
    fn test_unreachable_need_frag_without_mtu() {
        let buf = hex!(
            "
            03 04 00 00 00 00 00 00 45 00 00 1c 00 00 00 00
            40 11 00 00 0a 00 00 01 0a 00 00 02
            "
        );
        assert_eq!(
            (
                String::from("ICMP 10.0.0.2 unreachable - need to frag, length 28"),
                Outcome::Complete
            ),
            summary(&buf)
        );
    }

    #[test_case(6, "10.0.0.2 tcp port https unreachable")]
    #[test_case(47, "10.0.0.2 protocol 47 port 443 unreachable")]
    fn test_port_unreachable(protocol: u8, expected: &str) {
        let mut buf = hex!(
            "
            03 03 00 00 00 00 00 00 45 00 00 1c 00 00 00 00
            40 06 00 00 0a 00 00 01 0a 00 00 02 c3 50 01 bb
            "
        );
        buf[17] = protocol;
        assert_eq!(
            (format!("ICMP {expected}, length 32"), Outcome::Complete),
            summary(&buf)
        );
    }

    #[test_case(0, "redirect 10.0.0.2 to net 192.168.0.1")]
    #[test_case(1, "redirect 10.0.0.2 to host 192.168.0.1")]
    #[test_case(2, "redirect-tos 10.0.0.2 to net 192.168.0.1")]
    #[test_case(3, "redirect-tos 10.0.0.2 to host 192.168.0.1")]
    #[test_case(4, "redirect-#4 10.0.0.2 to 192.168.0.1")]
    fn test_redirect(code: u8, expected: &str) {
        let mut buf = hex!(
            "
            05 00 00 00 c0 a8 00 01 45 00 00 1c 00 00 00 00
            40 11 00 00 0a 00 00 01 0a 00 00 02
            "
        );
        buf[1] = code;
        assert_eq!(
            (format!("ICMP {expected}, length 28"), Outcome::Complete),
            summary(&buf)
        );
    }

    #[test_case(0, "time exceeded in-transit")]
    #[test_case(1, "ip reassembly time exceeded")]
    #[test_case(7, "time exceeded-#7")]
    fn test_time_exceeded(code: u8, expected: &str) {
        let mut buf = hex!(
            "
            0b 00 00 00 00 00 00 00 45 00 00 1c 00 00 00 00
            01 11 00 00 0a 00 00 01 0a 00 00 02
            "
        );
        buf[1] = code;
        assert_eq!(
            (format!("ICMP {expected}, length 28"), Outcome::Complete),
            summary(&buf)
        );
    }

    #[test]
    fn test_wrong_checksum() {
        let dissector = Dissector::new(
            DissectConfig {
                verbose: 1,
                ..DissectConfig::default()
            },
            &NumericNames,
            &Ipv4Decoder,
        );
        let buf = hex!("08 00 12 34 00 01 00 01");
        let mut out = Vec::new();
        dissector.dissect_icmp(&mut out, &buf, 8, false).unwrap();
        assert_eq!(
            "ICMP echo request, id 1, seq 1, length 8 (wrong icmp cksum 1234 (->f7fd)!)",
            String::from_utf8(out).unwrap()
        );
        let mut out = Vec::new();
        dissector.dissect_icmp(&mut out, &buf, 8, true).unwrap();
        assert_eq!(
            "ICMP echo request, id 1, seq 1, length 8",
            String::from_utf8(out).unwrap()
        );
    }

    #[test]
    fn test_checksum_not_verified_when_not_captured() {
        let dissector = Dissector::new(
            DissectConfig {
                verbose: 1,
                ..DissectConfig::default()
            },
            &NumericNames,
            &Ipv4Decoder,
        );
        let buf = hex!("08 00 12 34 00 01 00 01");
        let mut out = Vec::new();
        let outcome = dissector.dissect_icmp(&mut out, &buf, 64, false).unwrap();
        assert_eq!(
            "ICMP echo request, id 1, seq 1, length 64",
            String::from_utf8(out).unwrap()
        );
        assert_eq!(Outcome::Complete, outcome);
    }
}
