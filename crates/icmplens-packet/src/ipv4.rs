use crate::buffer::Buffer;
use crate::error::{Error, Result};
use crate::IpProtocol;
use std::fmt::{Debug, Formatter};
use std::net::Ipv4Addr;

const HEADER_SIZE: usize = 20;
const VERSION_OFFSET: usize = 0;
const IHL_OFFSET: usize = 0;
const TOS_OFFSET: usize = 1;
const TOTAL_LENGTH_OFFSET: usize = 2;
const IDENTIFICATION_OFFSET: usize = 4;
const FLAGS_AND_FRAGMENT_OFFSET_OFFSET: usize = 6;
const TIME_TO_LIVE_OFFSET: usize = 8;
const PROTOCOL_OFFSET: usize = 9;
const CHECKSUM_OFFSET: usize = 10;
const SOURCE_OFFSET: usize = 12;
const DESTINATION_OFFSET: usize = 16;

/// The `IPv4` `Don't fragment` flag.
pub const DONT_FRAGMENT: u16 = 0x4000;

/// The `IPv4` `More fragments` flag.
pub const MORE_FRAGMENTS: u16 = 0x2000;

/// The `IPv4` reserved flag.
pub const RESERVED_FLAG: u16 = 0x8000;

/// The mask of the `IPv4` fragment offset.
pub const FRAGMENT_OFFSET_MASK: u16 = 0x1fff;

/// Read only view of an `IPv4` packet.
///
/// The fixed 20 byte header must be captured to create the view, the options and payload may be
/// truncated.
pub struct Ipv4Packet<'a> {
    header: [u8; HEADER_SIZE],
    buf: Buffer<'a>,
}

impl<'a> Ipv4Packet<'a> {
    pub fn new_view(buf: Buffer<'a>) -> Result<Self> {
        match buf.get_bytes(0) {
            Ok(header) => Ok(Self { header, buf }),
            Err(_) => Err(Error::InsufficientPacketBuffer(
                String::from("Ipv4Packet"),
                Self::minimum_packet_size(),
                buf.captured_len(),
            )),
        }
    }

    #[must_use]
    pub const fn minimum_packet_size() -> usize {
        HEADER_SIZE
    }

    #[must_use]
    pub const fn get_version(&self) -> u8 {
        (self.header[VERSION_OFFSET] & 0xf0) >> 4
    }

    /// The header length in 32 bit words.
    #[must_use]
    pub const fn get_header_length(&self) -> u8 {
        self.header[IHL_OFFSET] & 0xf
    }

    /// The header length in bytes.
    ///
    /// This is taken from the wire as is and may be smaller than the minimum header size for a
    /// malformed packet.
    #[must_use]
    pub const fn header_length_bytes(&self) -> usize {
        self.get_header_length() as usize * 4
    }

    #[must_use]
    pub const fn get_tos(&self) -> u8 {
        self.header[TOS_OFFSET]
    }

    #[must_use]
    pub const fn get_total_length(&self) -> u16 {
        u16::from_be_bytes([
            self.header[TOTAL_LENGTH_OFFSET],
            self.header[TOTAL_LENGTH_OFFSET + 1],
        ])
    }

    #[must_use]
    pub const fn get_identification(&self) -> u16 {
        u16::from_be_bytes([
            self.header[IDENTIFICATION_OFFSET],
            self.header[IDENTIFICATION_OFFSET + 1],
        ])
    }

    #[must_use]
    pub const fn get_flags_and_fragment_offset(&self) -> u16 {
        u16::from_be_bytes([
            self.header[FLAGS_AND_FRAGMENT_OFFSET_OFFSET],
            self.header[FLAGS_AND_FRAGMENT_OFFSET_OFFSET + 1],
        ])
    }

    /// The fragment offset in bytes.
    #[must_use]
    pub const fn fragment_offset_bytes(&self) -> u32 {
        (self.get_flags_and_fragment_offset() & FRAGMENT_OFFSET_MASK) as u32 * 8
    }

    /// Is this packet one fragment of a larger datagram?
    #[must_use]
    pub const fn is_fragment(&self) -> bool {
        self.get_flags_and_fragment_offset() & (MORE_FRAGMENTS | FRAGMENT_OFFSET_MASK) != 0
    }

    #[must_use]
    pub const fn get_ttl(&self) -> u8 {
        self.header[TIME_TO_LIVE_OFFSET]
    }

    #[must_use]
    pub fn get_protocol(&self) -> IpProtocol {
        IpProtocol::from(self.header[PROTOCOL_OFFSET])
    }

    #[must_use]
    pub const fn get_checksum(&self) -> u16 {
        u16::from_be_bytes([
            self.header[CHECKSUM_OFFSET],
            self.header[CHECKSUM_OFFSET + 1],
        ])
    }

    #[must_use]
    pub const fn get_source(&self) -> Ipv4Addr {
        Ipv4Addr::new(
            self.header[SOURCE_OFFSET],
            self.header[SOURCE_OFFSET + 1],
            self.header[SOURCE_OFFSET + 2],
            self.header[SOURCE_OFFSET + 3],
        )
    }

    #[must_use]
    pub const fn get_destination(&self) -> Ipv4Addr {
        Ipv4Addr::new(
            self.header[DESTINATION_OFFSET],
            self.header[DESTINATION_OFFSET + 1],
            self.header[DESTINATION_OFFSET + 2],
            self.header[DESTINATION_OFFSET + 3],
        )
    }

    /// The captured bytes of the whole packet.
    #[must_use]
    pub const fn packet(&self) -> Buffer<'a> {
        self.buf
    }

    /// The captured bytes following the header (including any options).
    #[must_use]
    pub fn payload(&self) -> Buffer<'a> {
        self.buf.offset(self.header_length_bytes())
    }
}

impl Debug for Ipv4Packet<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ipv4Packet")
            .field("version", &self.get_version())
            .field("header_length", &self.get_header_length())
            .field("tos", &self.get_tos())
            .field("total_length", &self.get_total_length())
            .field("identification", &self.get_identification())
            .field(
                "flags_and_fragment_offset",
                &self.get_flags_and_fragment_offset(),
            )
            .field("ttl", &self.get_ttl())
            .field("protocol", &self.get_protocol())
            .field("checksum", &self.get_checksum())
            .field("source", &self.get_source())
            .field("destination", &self.get_destination())
            .finish()
    }
}
