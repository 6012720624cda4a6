use crate::buffer::Buffer;
use crate::error::{Error, Result};
use crate::ipv4::Ipv4Packet;
use crate::tcp::TcpPacket;
use crate::udp::UdpPacket;
use crate::IpProtocol;
use std::fmt::{Debug, Formatter};
use std::net::Ipv4Addr;

/// The type of `ICMP` packet.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum IcmpType {
    EchoReply,
    DestinationUnreachable,
    SourceQuench,
    Redirect,
    EchoRequest,
    RouterAdvertisement,
    RouterSolicitation,
    TimeExceeded,
    ParameterProblem,
    TimestampRequest,
    TimestampReply,
    InformationRequest,
    InformationReply,
    AddressMaskRequest,
    AddressMaskReply,
    ExtendedEchoRequest,
    ExtendedEchoReply,
    Other(u8),
}

impl IcmpType {
    #[must_use]
    pub const fn id(&self) -> u8 {
        match self {
            Self::EchoReply => 0,
            Self::DestinationUnreachable => 3,
            Self::SourceQuench => 4,
            Self::Redirect => 5,
            Self::EchoRequest => 8,
            Self::RouterAdvertisement => 9,
            Self::RouterSolicitation => 10,
            Self::TimeExceeded => 11,
            Self::ParameterProblem => 12,
            Self::TimestampRequest => 13,
            Self::TimestampReply => 14,
            Self::InformationRequest => 15,
            Self::InformationReply => 16,
            Self::AddressMaskRequest => 17,
            Self::AddressMaskReply => 18,
            Self::ExtendedEchoRequest => 42,
            Self::ExtendedEchoReply => 43,
            Self::Other(id) => *id,
        }
    }

    /// Does this type carry the leading bytes of the datagram which caused it?
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(
            self,
            Self::DestinationUnreachable
                | Self::SourceQuench
                | Self::Redirect
                | Self::TimeExceeded
                | Self::ParameterProblem
        )
    }

    /// May this type carry an RFC 4884 extension structure?
    #[must_use]
    pub const fn is_multipart(&self) -> bool {
        matches!(
            self,
            Self::DestinationUnreachable | Self::TimeExceeded | Self::ParameterProblem
        )
    }

    #[must_use]
    pub const fn is_extended_echo(&self) -> bool {
        matches!(self, Self::ExtendedEchoRequest | Self::ExtendedEchoReply)
    }
}

impl From<u8> for IcmpType {
    fn from(val: u8) -> Self {
        match val {
            0 => Self::EchoReply,
            3 => Self::DestinationUnreachable,
            4 => Self::SourceQuench,
            5 => Self::Redirect,
            8 => Self::EchoRequest,
            9 => Self::RouterAdvertisement,
            10 => Self::RouterSolicitation,
            11 => Self::TimeExceeded,
            12 => Self::ParameterProblem,
            13 => Self::TimestampRequest,
            14 => Self::TimestampReply,
            15 => Self::InformationRequest,
            16 => Self::InformationReply,
            17 => Self::AddressMaskRequest,
            18 => Self::AddressMaskReply,
            42 => Self::ExtendedEchoRequest,
            43 => Self::ExtendedEchoReply,
            id => Self::Other(id),
        }
    }
}

/// The code of `ICMP` packet.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct IcmpCode(pub u8);

impl From<u8> for IcmpCode {
    fn from(val: u8) -> Self {
        Self(val)
    }
}

/// The code for `TimeExceeded` `ICMP` packet type.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum IcmpTimeExceededCode {
    /// TTL expired in transit.
    TtlExpired,
    /// Fragment reassembly time exceeded.
    FragmentReassembly,
    /// An unknown code.
    Unknown(u8),
}

impl From<IcmpCode> for IcmpTimeExceededCode {
    fn from(val: IcmpCode) -> Self {
        match val {
            IcmpCode(0) => Self::TtlExpired,
            IcmpCode(1) => Self::FragmentReassembly,
            IcmpCode(id) => Self::Unknown(id),
        }
    }
}

/// The code for `Redirect` `ICMP` packet type.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum IcmpRedirectCode {
    Net,
    Host,
    TosNet,
    TosHost,
    Unknown(u8),
}

impl From<IcmpCode> for IcmpRedirectCode {
    fn from(val: IcmpCode) -> Self {
        match val {
            IcmpCode(0) => Self::Net,
            IcmpCode(1) => Self::Host,
            IcmpCode(2) => Self::TosNet,
            IcmpCode(3) => Self::TosHost,
            IcmpCode(id) => Self::Unknown(id),
        }
    }
}

const TYPE_OFFSET: usize = 0;
const CODE_OFFSET: usize = 1;
const CHECKSUM_OFFSET: usize = 2;
const IDENTIFIER_OFFSET: usize = 4;
const SEQUENCE_OFFSET: usize = 6;
const POINTER_OFFSET: usize = 4;
const GATEWAY_OFFSET: usize = 4;
const NEXT_HOP_MTU_OFFSET: usize = 6;
const NUM_ADDRS_OFFSET: usize = 4;
const ADDR_ENTRY_SIZE_OFFSET: usize = 5;
const LIFETIME_OFFSET: usize = 6;
const EXTENDED_SEQUENCE_OFFSET: usize = 6;
const EXTENDED_INFO_OFFSET: usize = 7;
const DATA_OFFSET: usize = ICMP_HEADER_SIZE;
const ORIGINATE_OFFSET: usize = 8;
const RECEIVE_OFFSET: usize = 12;
const TRANSMIT_OFFSET: usize = 16;
const MASK_OFFSET: usize = 8;

/// The size of the fixed `ICMP` header which precedes the message data.
pub const ICMP_HEADER_SIZE: usize = 8;

/// Read only view of an `ICMPv4` packet.
///
/// Only the type and code must be captured to create the view, every other field is read on
/// demand.
pub struct IcmpPacket<'a> {
    header: [u8; 2],
    buf: Buffer<'a>,
}

impl<'a> IcmpPacket<'a> {
    pub fn new_view(buf: Buffer<'a>) -> Result<Self> {
        match buf.get_bytes(TYPE_OFFSET) {
            Ok(header) => Ok(Self { header, buf }),
            Err(_) => Err(Error::InsufficientPacketBuffer(
                String::from("IcmpPacket"),
                Self::minimum_packet_size(),
                buf.captured_len(),
            )),
        }
    }

    #[must_use]
    pub const fn minimum_packet_size() -> usize {
        2
    }

    #[must_use]
    pub fn get_icmp_type(&self) -> IcmpType {
        IcmpType::from(self.header[TYPE_OFFSET])
    }

    #[must_use]
    pub fn get_icmp_code(&self) -> IcmpCode {
        IcmpCode::from(self.header[CODE_OFFSET])
    }

    pub fn get_checksum(&self) -> Result<u16> {
        self.buf.read_u16(CHECKSUM_OFFSET)
    }

    pub fn get_identifier(&self) -> Result<u16> {
        self.buf.read_u16(IDENTIFIER_OFFSET)
    }

    pub fn get_sequence(&self) -> Result<u16> {
        self.buf.read_u16(SEQUENCE_OFFSET)
    }

    /// The RFC 8335 information byte of an extended echo message.
    pub fn get_extended_echo_info(&self) -> Result<u8> {
        self.buf.read(EXTENDED_INFO_OFFSET)
    }

    /// The captured bytes of the whole packet.
    #[must_use]
    pub const fn packet(&self) -> Buffer<'a> {
        self.buf
    }

    /// The captured bytes following the 8 byte header.
    #[must_use]
    pub fn payload(&self) -> Buffer<'a> {
        self.buf.offset(DATA_OFFSET)
    }

    /// The header of the datagram quoted by an error message.
    pub fn nested_ipv4(&self) -> Result<Ipv4Packet<'a>> {
        Ipv4Packet::new_view(self.payload())
    }
}

impl Debug for IcmpPacket<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IcmpPacket")
            .field("icmp_type", &self.get_icmp_type())
            .field("icmp_code", &self.get_icmp_code())
            .field("checksum", &self.get_checksum().ok())
            .field("captured", &self.buf.captured_len())
            .finish()
    }
}

/// The identifier and sequence of an echo or timestamp request.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Echo {
    pub identifier: u16,
    pub sequence: u16,
}

/// The reason a datagram could not be delivered.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Unreachable {
    Net,
    Host,
    Protocol(u8),
    Port { protocol: IpProtocol, port: u16 },
    NeedFragment { mtu: u16 },
    SourceRouteFailed,
    NetUnknown,
    HostUnknown,
    SourceHostIsolated,
    NetProhibited,
    HostProhibited,
    TosNet,
    TosHost,
    FilterProhibited,
    HostPrecedence,
    PrecedenceCutoff,
    Unknown(u8),
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct DestinationUnreachable {
    /// The destination of the quoted datagram.
    pub destination: Ipv4Addr,
    pub reason: Unreachable,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Redirect {
    pub code: IcmpRedirectCode,
    pub destination: Ipv4Addr,
    pub gateway: Ipv4Addr,
}

/// A router address and its preference level (RFC 1256).
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct RouterEntry {
    pub address: Ipv4Addr,
    pub preference: u32,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RouterAdvertisement {
    pub lifetime: u16,
    pub num_addrs: u8,
    /// The size of each entry in 32 bit words.
    pub entry_size: u8,
    /// The entries, only read when `entry_size` is 2.
    pub entries: Vec<RouterEntry>,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct TimeExceeded {
    pub code: IcmpTimeExceededCode,
    pub destination: Ipv4Addr,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ParameterProblem {
    /// The octet of the quoted datagram where the problem was found.
    Pointer(u8),
    Code(u8),
}

/// Timestamps are milliseconds since midnight UTC.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct TimestampReply {
    pub identifier: u16,
    pub sequence: u16,
    pub originate: u32,
    pub receive: u32,
    pub transmit: u32,
}

/// The identifier and sequence of an RFC 8335 extended echo message.
///
/// The information byte is not part of the summary and is read separately with
/// [`IcmpPacket::get_extended_echo_info`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ExtendedEcho {
    pub identifier: u16,
    pub sequence: u8,
}

/// The type specific fields of an `ICMPv4` message.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum IcmpMessage {
    EchoReply(Echo),
    EchoRequest(Echo),
    DestinationUnreachable(DestinationUnreachable),
    SourceQuench,
    Redirect(Redirect),
    RouterAdvertisement(RouterAdvertisement),
    RouterSolicitation,
    TimeExceeded(TimeExceeded),
    ParameterProblem(ParameterProblem),
    TimestampRequest(Echo),
    TimestampReply(TimestampReply),
    InformationRequest,
    InformationReply,
    AddressMaskRequest,
    AddressMaskReply(u32),
    ExtendedEchoRequest(ExtendedEcho),
    ExtendedEchoReply(ExtendedEcho),
    Other(u8),
}

impl TryFrom<&IcmpPacket<'_>> for IcmpMessage {
    type Error = Error;

    fn try_from(packet: &IcmpPacket<'_>) -> Result<Self> {
        let buf = packet.packet();
        let code = packet.get_icmp_code();
        Ok(match packet.get_icmp_type() {
            IcmpType::EchoReply => Self::EchoReply(echo(packet)?),
            IcmpType::EchoRequest => Self::EchoRequest(echo(packet)?),
            IcmpType::DestinationUnreachable => {
                Self::DestinationUnreachable(destination_unreachable(packet, code)?)
            }
            IcmpType::SourceQuench => Self::SourceQuench,
            IcmpType::Redirect => Self::Redirect(Redirect {
                code: IcmpRedirectCode::from(code),
                destination: packet.nested_ipv4()?.get_destination(),
                gateway: Ipv4Addr::from(buf.read_u32(GATEWAY_OFFSET)?),
            }),
            IcmpType::RouterAdvertisement => Self::RouterAdvertisement(router_advertisement(buf)?),
            IcmpType::RouterSolicitation => Self::RouterSolicitation,
            IcmpType::TimeExceeded => Self::TimeExceeded(TimeExceeded {
                code: IcmpTimeExceededCode::from(code),
                destination: packet.nested_ipv4()?.get_destination(),
            }),
            IcmpType::ParameterProblem => Self::ParameterProblem(match code {
                IcmpCode(0) => ParameterProblem::Pointer(buf.read(POINTER_OFFSET)?),
                IcmpCode(code) => ParameterProblem::Code(code),
            }),
            IcmpType::TimestampRequest => Self::TimestampRequest(echo(packet)?),
            IcmpType::TimestampReply => Self::TimestampReply(TimestampReply {
                identifier: packet.get_identifier()?,
                sequence: packet.get_sequence()?,
                originate: buf.read_u32(ORIGINATE_OFFSET)?,
                receive: buf.read_u32(RECEIVE_OFFSET)?,
                transmit: buf.read_u32(TRANSMIT_OFFSET)?,
            }),
            IcmpType::InformationRequest => Self::InformationRequest,
            IcmpType::InformationReply => Self::InformationReply,
            IcmpType::AddressMaskRequest => Self::AddressMaskRequest,
            IcmpType::AddressMaskReply => Self::AddressMaskReply(buf.read_u32(MASK_OFFSET)?),
            IcmpType::ExtendedEchoRequest => Self::ExtendedEchoRequest(extended_echo(packet)?),
            IcmpType::ExtendedEchoReply => Self::ExtendedEchoReply(extended_echo(packet)?),
            IcmpType::Other(id) => Self::Other(id),
        })
    }
}

fn echo(packet: &IcmpPacket<'_>) -> Result<Echo> {
    Ok(Echo {
        identifier: packet.get_identifier()?,
        sequence: packet.get_sequence()?,
    })
}

fn extended_echo(packet: &IcmpPacket<'_>) -> Result<ExtendedEcho> {
    Ok(ExtendedEcho {
        identifier: packet.get_identifier()?,
        sequence: packet.packet().read(EXTENDED_SEQUENCE_OFFSET)?,
    })
}

fn destination_unreachable(
    packet: &IcmpPacket<'_>,
    code: IcmpCode,
) -> Result<DestinationUnreachable> {
    let ip = packet.nested_ipv4()?;
    let reason = match code.0 {
        0 => Unreachable::Net,
        1 => Unreachable::Host,
        2 => Unreachable::Protocol(ip.get_protocol().id()),
        3 => {
            let protocol = ip.get_protocol();
            let port = match protocol {
                IpProtocol::Tcp => TcpPacket::new_view(ip.payload())?.get_destination_port(),
                IpProtocol::Udp => UdpPacket::new_view(ip.payload())?.get_destination_port(),
                _ => ip.payload().read_u16(2)?,
            };
            Unreachable::Port { protocol, port }
        }
        4 => Unreachable::NeedFragment {
            mtu: packet.packet().read_u16(NEXT_HOP_MTU_OFFSET)?,
        },
        5 => Unreachable::SourceRouteFailed,
        6 => Unreachable::NetUnknown,
        7 => Unreachable::HostUnknown,
        8 => Unreachable::SourceHostIsolated,
        9 => Unreachable::NetProhibited,
        10 => Unreachable::HostProhibited,
        11 => Unreachable::TosNet,
        12 => Unreachable::TosHost,
        13 => Unreachable::FilterProhibited,
        14 => Unreachable::HostPrecedence,
        15 => Unreachable::PrecedenceCutoff,
        id => Unreachable::Unknown(id),
    };
    Ok(DestinationUnreachable {
        destination: ip.get_destination(),
        reason,
    })
}

fn router_advertisement(buf: Buffer<'_>) -> Result<RouterAdvertisement> {
    const ENTRY_WORDS: u8 = 2;
    let lifetime = buf.read_u16(LIFETIME_OFFSET)?;
    let num_addrs = buf.read(NUM_ADDRS_OFFSET)?;
    let entry_size = buf.read(ADDR_ENTRY_SIZE_OFFSET)?;
    let entries = if entry_size == ENTRY_WORDS {
        (0..usize::from(num_addrs))
            .map(|i| {
                let offset = DATA_OFFSET + i * 8;
                Ok(RouterEntry {
                    address: Ipv4Addr::from(buf.read_u32(offset)?),
                    preference: buf.read_u32(offset + 4)?,
                })
            })
            .collect::<Result<Vec<_>>>()?
    } else {
        vec![]
    };
    Ok(RouterAdvertisement {
        lifetime,
        num_addrs,
        entry_size,
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;
    use test_case::test_case;

    fn parse(buf: &[u8]) -> Result<IcmpMessage> {
        let packet = IcmpPacket::new_view(Buffer::new(buf))?;
        IcmpMessage::try_from(&packet)
    }

    fn unreachable(code: u8, protocol: u8, transport: &[u8]) -> Vec<u8> {
        let mut buf = hex!(
            "
            03 00 00 00 00 00 05 dc 45 00 00 3c 00 00 00 00
            40 00 00 00 0a 00 00 01 08 08 08 08
            "
        )
        .to_vec();
        buf[1] = code;
        buf[17] = protocol;
        buf.extend_from_slice(transport);
        buf
    }

    #[test_case(0, IcmpType::EchoReply)]
    #[test_case(3, IcmpType::DestinationUnreachable)]
    #[test_case(4, IcmpType::SourceQuench)]
    #[test_case(5, IcmpType::Redirect)]
    #[test_case(8, IcmpType::EchoRequest)]
    #[test_case(9, IcmpType::RouterAdvertisement)]
    #[test_case(10, IcmpType::RouterSolicitation)]
    #[test_case(11, IcmpType::TimeExceeded)]
    #[test_case(12, IcmpType::ParameterProblem)]
    #[test_case(13, IcmpType::TimestampRequest)]
    #[test_case(14, IcmpType::TimestampReply)]
    #[test_case(15, IcmpType::InformationRequest)]
    #[test_case(16, IcmpType::InformationReply)]
    #[test_case(17, IcmpType::AddressMaskRequest)]
    #[test_case(18, IcmpType::AddressMaskReply)]
    #[test_case(42, IcmpType::ExtendedEchoRequest)]
    #[test_case(43, IcmpType::ExtendedEchoReply)]
    #[test_case(99, IcmpType::Other(99))]
    fn test_icmp_type(id: u8, expected: IcmpType) {
        assert_eq!(expected, IcmpType::from(id));
        assert_eq!(id, expected.id());
    }

    #[test]
    fn test_type_classes() {
        for id in 0..=u8::MAX {
            let icmp_type = IcmpType::from(id);
            assert_eq!(matches!(id, 3 | 4 | 5 | 11 | 12), icmp_type.is_error());
            assert_eq!(matches!(id, 3 | 11 | 12), icmp_type.is_multipart());
            assert_eq!(matches!(id, 42 | 43), icmp_type.is_extended_echo());
        }
    }

    #[test]
    fn test_view() {
        let buf = hex!("08 00 f7 fd 00 01 00 01");
        let packet = IcmpPacket::new_view(Buffer::new(&buf)).unwrap();
        assert_eq!(IcmpType::EchoRequest, packet.get_icmp_type());
        assert_eq!(IcmpCode(0), packet.get_icmp_code());
        assert_eq!(Ok(0xf7fd), packet.get_checksum());
        assert_eq!(Ok(1), packet.get_identifier());
        assert_eq!(Ok(1), packet.get_sequence());
        assert_eq!(0, packet.payload().captured_len());
    }

    #[test]
    fn test_new_view_insufficient_buffer() {
        let err = IcmpPacket::new_view(Buffer::new(&[0x08])).unwrap_err();
        assert_eq!(
            Error::InsufficientPacketBuffer(String::from("IcmpPacket"), 2, 1),
            err
        );
    }

    #[test]
    fn test_echo_reply() {
        let message = parse(&hex!("00 00 00 00 12 34 00 07")).unwrap();
        assert_eq!(
            IcmpMessage::EchoReply(Echo {
                identifier: 0x1234,
                sequence: 7
            }),
            message
        );
    }

    #[test]
    fn test_echo_truncated() {
        let err = parse(&hex!("08 00 f7 fd 00 01 00")).unwrap_err();
        assert_eq!(
            Error::Truncated {
                offset: 6,
                length: 2,
                captured: 7
            },
            err
        );
    }

    #[test]
    fn test_unreachable_udp_port() {
        let buf = unreachable(3, 17, &hex!("c3 50 00 35"));
        assert_eq!(
            IcmpMessage::DestinationUnreachable(DestinationUnreachable {
                destination: Ipv4Addr::new(8, 8, 8, 8),
                reason: Unreachable::Port {
                    protocol: IpProtocol::Udp,
                    port: 53
                }
            }),
            parse(&buf).unwrap()
        );
    }

    #[test]
    fn test_unreachable_other_protocol_port() {
        let buf = unreachable(3, 47, &hex!("00 00 08 00"));
        assert_eq!(
            IcmpMessage::DestinationUnreachable(DestinationUnreachable {
                destination: Ipv4Addr::new(8, 8, 8, 8),
                reason: Unreachable::Port {
                    protocol: IpProtocol::Other(47),
                    port: 0x0800
                }
            }),
            parse(&buf).unwrap()
        );
    }

    #[test]
    fn test_unreachable_port_needs_transport() {
        let buf = unreachable(3, 6, &hex!("c3 50"));
        assert!(parse(&buf).is_err());
    }

    #[test_case(0, Unreachable::Net)]
    #[test_case(1, Unreachable::Host)]
    #[test_case(2, Unreachable::Protocol(17))]
    #[test_case(4, Unreachable::NeedFragment { mtu: 1500 })]
    #[test_case(13, Unreachable::FilterProhibited)]
    #[test_case(15, Unreachable::PrecedenceCutoff)]
    #[test_case(16, Unreachable::Unknown(16))]
    fn test_unreachable_codes(code: u8, reason: Unreachable) {
        let buf = unreachable(code, 17, &[]);
        assert_eq!(
            IcmpMessage::DestinationUnreachable(DestinationUnreachable {
                destination: Ipv4Addr::new(8, 8, 8, 8),
                reason
            }),
            parse(&buf).unwrap()
        );
    }

    #[test]
    fn test_unreachable_needs_destination() {
        let buf = unreachable(1, 17, &[]);
        assert!(parse(&buf[..27]).is_err());
    }

    #[test]
    fn test_redirect() {
        let mut buf = unreachable(1, 17, &[]);
        buf[0] = 5;
        buf[4..8].copy_from_slice(&[10, 0, 0, 254]);
        assert_eq!(
            IcmpMessage::Redirect(Redirect {
                code: IcmpRedirectCode::Host,
                destination: Ipv4Addr::new(8, 8, 8, 8),
                gateway: Ipv4Addr::new(10, 0, 0, 254)
            }),
            parse(&buf).unwrap()
        );
    }

    #[test]
    fn test_time_exceeded() {
        let mut buf = unreachable(1, 17, &[]);
        buf[0] = 11;
        assert_eq!(
            IcmpMessage::TimeExceeded(TimeExceeded {
                code: IcmpTimeExceededCode::FragmentReassembly,
                destination: Ipv4Addr::new(8, 8, 8, 8)
            }),
            parse(&buf).unwrap()
        );
    }

    #[test_case(&hex!("0c 00 00 00 14 00 00 00"), ParameterProblem::Pointer(20))]
    #[test_case(&hex!("0c 02 00 00"), ParameterProblem::Code(2))]
    fn test_parameter_problem(buf: &[u8], expected: ParameterProblem) {
        assert_eq!(IcmpMessage::ParameterProblem(expected), parse(buf).unwrap());
    }

    #[test]
    fn test_router_advertisement() {
        let buf = hex!(
            "
            09 00 00 00 02 02 07 08 c0 a8 01 01 00 00 00 0a
            c0 a8 01 02 ff ff ff ff
            "
        );
        assert_eq!(
            IcmpMessage::RouterAdvertisement(RouterAdvertisement {
                lifetime: 1800,
                num_addrs: 2,
                entry_size: 2,
                entries: vec![
                    RouterEntry {
                        address: Ipv4Addr::new(192, 168, 1, 1),
                        preference: 10
                    },
                    RouterEntry {
                        address: Ipv4Addr::new(192, 168, 1, 2),
                        preference: 0xffff_ffff
                    }
                ]
            }),
            parse(&buf).unwrap()
        );
    }

    #[test]
    fn test_router_advertisement_unsupported_entry_size() {
        let buf = hex!("09 00 00 00 05 03 00 1e");
        assert_eq!(
            IcmpMessage::RouterAdvertisement(RouterAdvertisement {
                lifetime: 30,
                num_addrs: 5,
                entry_size: 3,
                entries: vec![]
            }),
            parse(&buf).unwrap()
        );
    }

    #[test]
    fn test_timestamp_reply() {
        let buf = hex!(
            "
            0e 00 00 00 00 0a 00 02 00 00 00 01 00 36 ee 80
            05 26 5c 00
            "
        );
        assert_eq!(
            IcmpMessage::TimestampReply(TimestampReply {
                identifier: 10,
                sequence: 2,
                originate: 1,
                receive: 3_600_000,
                transmit: 86_400_000
            }),
            parse(&buf).unwrap()
        );
    }

    #[test]
    fn test_extended_echo() {
        let buf = hex!("2a 00 00 00 00 05 09");
        assert_eq!(
            IcmpMessage::ExtendedEchoRequest(ExtendedEcho {
                identifier: 5,
                sequence: 9
            }),
            parse(&buf).unwrap()
        );
        let packet = IcmpPacket::new_view(Buffer::new(&buf)).unwrap();
        assert!(packet.get_extended_echo_info().is_err());
    }

    #[test_case(&hex!("04 00"), IcmpMessage::SourceQuench)]
    #[test_case(&hex!("0a 00"), IcmpMessage::RouterSolicitation)]
    #[test_case(&hex!("0f 00"), IcmpMessage::InformationRequest)]
    #[test_case(&hex!("10 00"), IcmpMessage::InformationReply)]
    #[test_case(&hex!("11 00"), IcmpMessage::AddressMaskRequest)]
    #[test_case(&hex!("12 00 00 00 00 00 00 00 ff ff ff 00"), IcmpMessage::AddressMaskReply(0xffff_ff00))]
    #[test_case(&hex!("c8 07"), IcmpMessage::Other(200))]
    fn test_other_messages(buf: &[u8], expected: IcmpMessage) {
        assert_eq!(expected, parse(buf).unwrap());
    }
}
