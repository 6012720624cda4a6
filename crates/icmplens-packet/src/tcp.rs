use crate::buffer::Buffer;
use crate::error::{Error, Result};
use std::fmt::{Debug, Formatter};

const DESTINATION_PORT_OFFSET: usize = 2;
const SEQUENCE_OFFSET: usize = 4;

/// Read only view of a `TCP` packet.
///
/// Only the ports must be captured to create the view.
pub struct TcpPacket<'a> {
    ports: [u8; 4],
    buf: Buffer<'a>,
}

impl<'a> TcpPacket<'a> {
    pub fn new_view(buf: Buffer<'a>) -> Result<Self> {
        match buf.get_bytes(0) {
            Ok(ports) => Ok(Self { ports, buf }),
            Err(_) => Err(Error::InsufficientPacketBuffer(
                String::from("TcpPacket"),
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

    pub fn get_sequence(&self) -> Result<u32> {
        self.buf.read_u32(SEQUENCE_OFFSET)
    }
}

impl Debug for TcpPacket<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TcpPacket")
            .field("source_port", &self.get_source_port())
            .field("destination_port", &self.get_destination_port())
            .field("sequence", &self.get_sequence().ok())
            .finish()
    }
}
