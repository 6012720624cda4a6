use crate::error::Result;
use crate::Dissector;
use icmplens_packet::buffer::Buffer;
use icmplens_packet::checksum;
use icmplens_packet::ipv4::{Ipv4Packet, DONT_FRAGMENT, MORE_FRAGMENTS, RESERVED_FLAG};
use icmplens_packet::tcp::TcpPacket;
use icmplens_packet::udp::UdpPacket;
use icmplens_packet::IpProtocol;
use itertools::Itertools;
use std::io::Write;
use tracing::instrument;

/// Decode an IP datagram.
///
/// This is used both for top level datagrams and for the datagram quoted inside an `ICMP` error,
/// in which case `buf` has been narrowed to the quoted datagram.
pub trait IpDecoder: Send + Sync {
    /// Print a summary of the datagram in `buf`, whose declared length is `length`.
    ///
    /// `depth` is the number of `ICMP` error messages enclosing the datagram and must be passed
    /// on to [`Dissector::print_icmp`].
    fn decode(
        &self,
        dissector: &Dissector<'_>,
        out: &mut dyn Write,
        buf: Buffer<'_>,
        length: usize,
        depth: usize,
    ) -> Result<()>;
}

/// An `IPv4` decoder which hands `ICMP` payloads back to the dissector.
#[derive(Debug, Default, Clone, Copy)]
pub struct Ipv4Decoder;

impl IpDecoder for Ipv4Decoder {
    #[instrument(skip(self, dissector, out, buf), level = "trace")]
    fn decode(
        &self,
        dissector: &Dissector<'_>,
        out: &mut dyn Write,
        buf: Buffer<'_>,
        length: usize,
        depth: usize,
    ) -> Result<()> {
        let ip = Ipv4Packet::new_view(buf)?;
        write!(out, "IP ")?;
        if ip.get_version() != 4 {
            write!(out, "version {} (invalid)", ip.get_version())?;
            return Ok(());
        }
        if ip.header_length_bytes() < Ipv4Packet::minimum_packet_size() {
            write!(out, "bad-hlen {}", ip.header_length_bytes())?;
            return Ok(());
        }
        let mut total_length = usize::from(ip.get_total_length());
        if length < total_length {
            write!(
                out,
                "truncated-ip - {} bytes missing! ",
                total_length - length
            )?;
            total_length = length;
        }
        if dissector.config().is_verbose() {
            write_verbose_header(out, &ip)?;
        }
        let names = dissector.names();
        let src = names.ipv4(ip.get_source());
        let dst = names.ipv4(ip.get_destination());
        let payload = ip.payload();
        let payload_length = total_length.saturating_sub(ip.header_length_bytes());
        let protocol = ip.get_protocol();
        if ip.fragment_offset_bytes() != 0 {
            write!(out, "{src} > {dst}: ip-proto-{} {payload_length}", protocol.id())?;
            return Ok(());
        }
        match protocol {
            IpProtocol::Icmp => {
                write!(out, "{src} > {dst}: ")?;
                dissector.print_icmp(out, payload, payload_length, ip.is_fragment(), depth)
            }
            IpProtocol::Udp => {
                let udp = UdpPacket::new_view(payload)?;
                let sport = names.udp_port(udp.get_source_port());
                let dport = names.udp_port(udp.get_destination_port());
                let udp_length = udp.get_length()?;
                write!(
                    out,
                    "{src}.{sport} > {dst}.{dport}: UDP, length {}",
                    udp_length.saturating_sub(8)
                )?;
                Ok(())
            }
            IpProtocol::Tcp => {
                let tcp = TcpPacket::new_view(payload)?;
                let sport = names.tcp_port(tcp.get_source_port());
                let dport = names.tcp_port(tcp.get_destination_port());
                write!(out, "{src}.{sport} > {dst}.{dport}: tcp {payload_length}")?;
                Ok(())
            }
            IpProtocol::IcmpV6 | IpProtocol::Other(_) => {
                write!(out, "{src} > {dst}: ip-proto-{} {payload_length}", protocol.id())?;
                Ok(())
            }
        }
    }
}

fn write_verbose_header(out: &mut dyn Write, ip: &Ipv4Packet<'_>) -> Result<()> {
    let protocol = ip.get_protocol();
    write!(
        out,
        "(tos 0x{:x}, ttl {}, id {}, offset {}, flags [{}], proto {} ({}), length {}",
        ip.get_tos(),
        ip.get_ttl(),
        ip.get_identification(),
        ip.fragment_offset_bytes(),
        fmt_flags(ip.get_flags_and_fragment_offset()),
        protocol_name(protocol),
        protocol.id(),
        ip.get_total_length()
    )?;
    let header_length = ip.header_length_bytes();
    if header_length >= Ipv4Packet::minimum_packet_size() {
        if let Ok(header) = ip.packet().slice(0, header_length) {
            if !checksum::is_valid(header) {
                write!(
                    out,
                    ", bad cksum {:x} (->{:x})!",
                    ip.get_checksum(),
                    checksum::ipv4_header_checksum(header)
                )?;
            }
        }
    }
    write!(out, ")\n    ")?;
    Ok(())
}

fn fmt_flags(flags: u16) -> String {
    let names = [
        (MORE_FRAGMENTS, "+"),
        (DONT_FRAGMENT, "DF"),
        (RESERVED_FLAG, "rsvd"),
    ]
    .iter()
    .filter(|(bit, _)| flags & bit != 0)
    .map(|(_, name)| name)
    .join(", ");
    if names.is_empty() {
        String::from("none")
    } else {
        names
    }
}

const fn protocol_name(protocol: IpProtocol) -> &'static str {
    match protocol {
        IpProtocol::Icmp => "ICMP",
        IpProtocol::Tcp => "TCP",
        IpProtocol::Udp => "UDP",
        IpProtocol::IcmpV6 => "ICMPv6",
        IpProtocol::Other(_) => "unknown",
    }
}
