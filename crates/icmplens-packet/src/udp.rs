use crate::buffer::Buffer;
use crate::error::{Error, Result};
use std::fmt::{Debug, Formatter};

const SOURCE_PORT_OFFSET: usize = 0;
const DESTINATION_PORT_OFFSET: usize = 2;
const LENGTH_OFFSET: usize = 4;
const CHECKSUM_OFFSET: usize = 6;

/// Read only view of a `UDP` packet.
///
/// Only the ports must be captured to create the view, the remaining header fields are read on
/// demand as they are frequently cut short in the datagram quoted by an `ICMP` error.
pub struct UdpPacket<'a> {
    ports: [u8; 4],
    buf: Buffer<'a>,
}

impl<'a> UdpPacket<'a> {
    pub fn new_view(buf: Buffer<'a>) -> Result<Self> {
        match buf.get_bytes(SOURCE_PORT_OFFSET) {
            Ok(ports) => Ok(Self { ports, buf }),
            Err(_) => Err(Error::InsufficientPacketBuffer(
                String::from("UdpPacket"),
                Self::minimum_packet_size(),
                buf.captured_len(),
            )),
        }
    }

    #[must_use]
    pub const fn minimum_packet_size() -> usize {
        4
    }

    #[must_use]
    pub const fn get_source_port(&self) -> u16 {
        u16::from_be_bytes([self.ports[0], self.ports[1]])
    }

    #[must_use]
    pub const fn get_destination_port(&self) -> u16 {
        u16::from_be_bytes([
            self.ports[DESTINATION_PORT_OFFSET],
            self.ports[DESTINATION_PORT_OFFSET + 1],
        ])
    }

    pub fn get_length(&self) -> Result<u16> {
        self.buf.read_u16(LENGTH_OFFSET)
    }

    pub fn get_checksum(&self) -> Result<u16> {
        self.buf.read_u16(CHECKSUM_OFFSET)
    }
}

impl Debug for UdpPacket<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UdpPacket")
            .field("source_port", &self.get_source_port())
            .field("destination_port", &self.get_destination_port())
            .field("length", &self.get_length().ok())
            .field("checksum", &self.get_checksum().ok())
            .finish()
    }
}
