/// The only supported extension structure version.
pub const ICMP_EXTENSION_VERSION: u8 = 2;

/// The offset of the extension structure from the start of an `ICMP` message.
///
/// This is the 8 byte `ICMP` header followed by the 128 byte original datagram field.
pub const ICMP_EXTENSION_OFFSET: usize = 136;

pub mod extension_structure {
    use crate::buffer::Buffer;
    use crate::error::{Error, Result};
    use crate::icmp_extension::extension_header::ExtensionHeaderPacket;
    use crate::icmp_extension::extension_object::ExtensionObjectPacket;

    /// Represents an ICMP `ExtensionsPacket` pseudo object.
    ///
    /// The declared length covers the extension header and every object and may exceed the
    /// captured bytes.
    pub struct ExtensionsPacket<'a> {
        buf: Buffer<'a>,
        length: usize,
    }

    impl<'a> ExtensionsPacket<'a> {
        pub fn new_view(buf: Buffer<'a>, length: usize) -> Result<Self> {
            if buf.captured_len() >= Self::minimum_packet_size() {
                Ok(Self { buf, length })
            } else {
                Err(Error::InsufficientPacketBuffer(
                    String::from("ExtensionsPacket"),
                    Self::minimum_packet_size(),
                    buf.captured_len(),
                ))
            }
        }

        #[must_use]
        pub const fn minimum_packet_size() -> usize {
            4
        }

        #[must_use]
        pub const fn header(&self) -> ExtensionHeaderPacket<'a> {
            ExtensionHeaderPacket::new_view(self.buf)
        }

        /// The declared length of the header and all objects.
        #[must_use]
        pub const fn length(&self) -> usize {
            self.length
        }

        /// The covered bytes, if all of them were captured.
        #[must_use]
        pub fn covered(&self) -> Option<&'a [u8]> {
            self.buf.slice(0, self.length).ok()
        }

        /// An iterator of Extension Objects contained within this `ExtensionsPacket`.
        #[must_use]
        pub fn objects(&self) -> ExtensionObjectIter<'a> {
            ExtensionObjectIter::new(
                self.buf,
                self.length
                    .saturating_sub(ExtensionHeaderPacket::minimum_packet_size()),
            )
        }
    }

    /// Walk the objects of an extension structure.
    ///
    /// Objects are consumed from a running budget of declared bytes. Iteration ends once the
    /// budget no longer exceeds an object header, after an object whose declared length does not
    /// fit the budget, after a malformed object, or after a truncated object header.
    pub struct ExtensionObjectIter<'a> {
        buf: Buffer<'a>,
        offset: usize,
        remaining: usize,
        done: bool,
    }

    impl<'a> ExtensionObjectIter<'a> {
        #[must_use]
        pub const fn new(buf: Buffer<'a>, remaining: usize) -> Self {
            Self {
                buf,
                offset: ExtensionHeaderPacket::minimum_packet_size(),
                remaining,
                done: false,
            }
        }
    }

    impl<'a> Iterator for ExtensionObjectIter<'a> {
        type Item = Result<ExtensionObjectPacket<'a>>;

        fn next(&mut self) -> Option<Self::Item> {
            if self.done || self.remaining <= ExtensionObjectPacket::minimum_packet_size() {
                return None;
            }
            match ExtensionObjectPacket::new_view(self.buf.offset(self.offset)) {
                Ok(object) => {
                    let length = usize::from(object.get_length());
                    if object.is_malformed() || self.remaining < length {
                        self.done = true;
                    } else {
                        self.remaining -= length;
                        self.offset += length;
                    }
                    Some(Ok(object))
                }
                Err(err) => {
                    self.done = true;
                    Some(Err(err))
                }
            }
        }
    }

}

pub mod extension_header {
    use crate::buffer::Buffer;
    use crate::error::Result;

    const VERSION_OFFSET: usize = 0;
    const CHECKSUM_OFFSET: usize = 2;

    /// Represents an ICMP `ExtensionHeaderPacket`.
    ///
    /// The fields are read on demand.
    #[derive(Debug, Clone, Copy)]
    pub struct ExtensionHeaderPacket<'a> {
        buf: Buffer<'a>,
    }

    impl<'a> ExtensionHeaderPacket<'a> {
        #[must_use]
        pub const fn new_view(buf: Buffer<'a>) -> Self {
            Self { buf }
        }

        #[must_use]
        pub const fn minimum_packet_size() -> usize {
            4
        }

        pub fn get_version(&self) -> Result<u8> {
            Ok((self.buf.read(VERSION_OFFSET)? & 0xf0) >> 4)
        }

        pub fn get_checksum(&self) -> Result<u16> {
            self.buf.read_u16(CHECKSUM_OFFSET)
        }
    }

}

pub mod extension_object {
    use crate::buffer::Buffer;
    use crate::error::{Error, Result};
    use std::fmt::{Debug, Formatter};

    const LENGTH_OFFSET: usize = 0;
    const CLASS_NUM_OFFSET: usize = 2;
    const CLASS_SUBTYPE_OFFSET: usize = 3;

    /// The ICMP Extension Object Class Num.
    #[derive(Debug, Clone, Copy, Eq, PartialEq)]
    pub enum ClassNum {
        MultiProtocolLabelSwitchingLabelStack,
        InterfaceInformationObject,
        InterfaceIdentificationObject,
        Other(u8),
    }

    impl ClassNum {
        #[must_use]
        pub const fn id(&self) -> u8 {
            match self {
                Self::MultiProtocolLabelSwitchingLabelStack => 1,
                Self::InterfaceInformationObject => 2,
                Self::InterfaceIdentificationObject => 3,
                Self::Other(id) => *id,
            }
        }
    }

    impl From<u8> for ClassNum {
        fn from(val: u8) -> Self {
            match val {
                1 => Self::MultiProtocolLabelSwitchingLabelStack,
                2 => Self::InterfaceInformationObject,
                3 => Self::InterfaceIdentificationObject,
                id => Self::Other(id),
            }
        }
    }

    /// The ICMP Extension Object Class Sub-type.
    #[derive(Debug, Clone, Copy, Eq, PartialEq)]
    pub struct ClassSubType(pub u8);

    impl From<u8> for ClassSubType {
        fn from(val: u8) -> Self {
            Self(val)
        }
    }

    /// Represents an ICMP `ExtensionObjectPacket`.
    ///
    /// The 4 byte object header must be captured to create the view.
    pub struct ExtensionObjectPacket<'a> {
        header: [u8; 4],
        buf: Buffer<'a>,
    }

    impl<'a> ExtensionObjectPacket<'a> {
        pub fn new_view(buf: Buffer<'a>) -> Result<Self> {
            match buf.get_bytes(0) {
                Ok(header) => Ok(Self { header, buf }),
                Err(_) => Err(Error::InsufficientPacketBuffer(
                    String::from("ExtensionObjectPacket"),
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
        pub const fn get_length(&self) -> u16 {
            u16::from_be_bytes([self.header[LENGTH_OFFSET], self.header[LENGTH_OFFSET + 1]])
        }

        #[must_use]
        pub fn get_class_num(&self) -> ClassNum {
            ClassNum::from(self.header[CLASS_NUM_OFFSET])
        }

        #[must_use]
        pub fn get_class_subtype(&self) -> ClassSubType {
            ClassSubType::from(self.header[CLASS_SUBTYPE_OFFSET])
        }

        /// Does the header describe an object which cannot be walked past?
        ///
        /// This is the case for class 0 and for a declared length shorter than the header.
        #[must_use]
        pub fn is_malformed(&self) -> bool {
            self.get_class_num().id() == 0
                || usize::from(self.get_length()) < Self::minimum_packet_size()
        }

        /// The object payload, bounded by both the declared length and the captured bytes.
        #[must_use]
        pub fn body(&self) -> ObjectBody<'a> {
            ObjectBody::new(
                self.buf.offset(Self::minimum_packet_size()),
                usize::from(self.get_length()).saturating_sub(Self::minimum_packet_size()),
            )
        }
    }

    impl Debug for ExtensionObjectPacket<'_> {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("ExtensionObjectPacket")
                .field("length", &self.get_length())
                .field("class_num", &self.get_class_num())
                .field("class_subtype", &self.get_class_subtype())
                .field("header", &crate::fmt_payload(&self.header))
                .finish()
        }
    }

    /// A cursor over the payload of an extension object.
    ///
    /// Every read is checked twice: a read beyond the captured bytes is a truncation error while a
    /// read beyond the declared length of the object yields `None`, ending the object early.
    #[derive(Debug, Clone, Copy)]
    pub struct ObjectBody<'a> {
        buf: Buffer<'a>,
        offset: usize,
        remaining: usize,
    }

    impl<'a> ObjectBody<'a> {
        #[must_use]
        pub const fn new(buf: Buffer<'a>, remaining: usize) -> Self {
            Self {
                buf,
                offset: 0,
                remaining,
            }
        }

        /// The declared bytes not yet consumed.
        #[must_use]
        pub const fn remaining(&self) -> usize {
            self.remaining
        }

        /// Check that `length` bytes are captured and declared without consuming them.
        pub fn ensure(&self, length: usize) -> Result<bool> {
            self.buf.slice(self.offset, length)?;
            Ok(self.remaining >= length)
        }

        /// Consume `length` bytes.
        pub fn take(&mut self, length: usize) -> Result<Option<Buffer<'a>>> {
            if self.ensure(length)? {
                let bytes = self.buf.slice(self.offset, length)?;
                self.offset += length;
                self.remaining -= length;
                Ok(Some(Buffer::new(bytes)))
            } else {
                Ok(None)
            }
        }

        /// Consume a big-endian `u32`.
        pub fn take_u32(&mut self) -> Result<Option<u32>> {
            self.take(4)?.map(|word| word.read_u32(0)).transpose()
        }

        /// Get N captured bytes at the cursor, ignoring the declared length.
        pub fn peek_bytes<const N: usize>(&self) -> Result<[u8; N]> {
            self.buf.get_bytes(self.offset)
        }

        /// The captured part of the declared bytes not yet consumed.
        #[must_use]
        pub fn rest(&self) -> &'a [u8] {
            self.buf.available(self.offset, self.remaining)
        }
    }

}

pub mod mpls_label_stack_member {
    use crate::buffer::Buffer;
    use crate::error::Result;
    use std::fmt::{Debug, Formatter};

    /// Represents an ICMP `MplsLabelStackMemberPacket` (RFC 4950).
    pub struct MplsLabelStackMemberPacket {
        entry: u32,
    }

    impl MplsLabelStackMemberPacket {
        pub fn new_view(buf: Buffer<'_>) -> Result<Self> {
            Ok(Self {
                entry: buf.read_u32(0)?,
            })
        }

        #[must_use]
        pub const fn minimum_packet_size() -> usize {
            4
        }

        #[must_use]
        pub const fn get_label(&self) -> u32 {
            self.entry >> 12
        }

        /// The traffic class (formerly `exp`) bits.
        #[must_use]
        pub const fn get_traffic_class(&self) -> u8 {
            ((self.entry >> 9) & 0x7) as u8
        }

        #[must_use]
        pub const fn is_bottom_of_stack(&self) -> bool {
            (self.entry >> 8) & 0x1 == 1
        }

        #[must_use]
        pub const fn get_ttl(&self) -> u8 {
            (self.entry & 0xff) as u8
        }
    }

    impl Debug for MplsLabelStackMemberPacket {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("MplsLabelStackMember")
                .field("label", &self.get_label())
                .field("traffic_class", &self.get_traffic_class())
                .field("bos", &self.is_bottom_of_stack())
                .field("ttl", &self.get_ttl())
                .finish()
        }
    }

}

pub mod interface_information {
    use crate::icmp_extension::extension_object::ClassSubType;
    use bitflags::bitflags;

    bitflags! {
        /// The sub-objects present in an Interface Information Object (RFC 5837).
        ///
        /// These are the low bits of the object class sub-type.
        #[derive(Debug, Clone, Copy, Eq, PartialEq)]
        pub struct InterfaceInformationFlags: u8 {
            const IF_INDEX = 0x08;
            const IP_ADDR = 0x04;
            const NAME = 0x02;
            const MTU = 0x01;
        }
    }

    /// The role of the interface described by an Interface Information Object.
    #[derive(Debug, Clone, Copy, Eq, PartialEq)]
    pub enum InterfaceRole {
        Incoming,
        SubIpComponentOfIncoming,
        Outgoing,
        NextHop,
    }

    impl From<ClassSubType> for InterfaceRole {
        fn from(ctype: ClassSubType) -> Self {
            match (ctype.0 & 0xc0) >> 6 {
                0 => Self::Incoming,
                1 => Self::SubIpComponentOfIncoming,
                2 => Self::Outgoing,
                _ => Self::NextHop,
            }
        }
    }

    impl From<ClassSubType> for InterfaceInformationFlags {
        fn from(ctype: ClassSubType) -> Self {
            Self::from_bits_truncate(ctype.0)
        }
    }

    /// The maximum length of the interface name sub-object, length byte included.
    pub const MAX_INTERFACE_NAME_LENGTH: u8 = 64;

    /// The size of the `AFI` and reserved fields of the IP address sub-object.
    pub const IP_ADDR_SUB_OBJECT_HEADER_SIZE: usize = 4;

}

pub mod interface_identification {
    use crate::icmp_extension::extension_object::ClassSubType;

    /// How an Interface Identification Object (RFC 8335) identifies the probed interface.
    #[derive(Debug, Clone, Copy, Eq, PartialEq)]
    pub enum InterfaceIdentificationType {
        Name,
        Index,
        Address,
        Other(u8),
    }

    impl From<ClassSubType> for InterfaceIdentificationType {
        fn from(ctype: ClassSubType) -> Self {
            match ctype.0 {
                1 => Self::Name,
                2 => Self::Index,
                3 => Self::Address,
                id => Self::Other(id),
            }
        }
    }

    /// The size of the `AFI`, address length and reserved fields of the address sub-object.
    pub const ADDRESS_SUB_OBJECT_HEADER_SIZE: usize = 4;

}

/// An IANA address family identifier.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum AddressFamily {
    Ipv4,
    Ipv6,
    Other(u16),
}

impl AddressFamily {
    /// The length of an address of this family in bytes.
    #[must_use]
    pub const fn address_length(self) -> Option<usize> {
        match self {
            Self::Ipv4 => Some(4),
            Self::Ipv6 => Some(16),
            Self::Other(_) => None,
        }
    }
}

impl From<u16> for AddressFamily {
    fn from(afi: u16) -> Self {
        match afi {
            1 => Self::Ipv4,
            2 => Self::Ipv6,
            afi => Self::Other(afi),
        }
    }
}

/// The closed set of extension object kinds, selected by class number.
#[derive(Debug, Clone, Copy)]
pub enum ExtensionObject<'a> {
    Mpls(extension_object::ClassSubType, extension_object::ObjectBody<'a>),
    InterfaceInformation(extension_object::ClassSubType, extension_object::ObjectBody<'a>),
    InterfaceIdentification(extension_object::ClassSubType, extension_object::ObjectBody<'a>),
    Unknown(extension_object::ClassSubType, extension_object::ObjectBody<'a>),
}

impl<'a> From<&extension_object::ExtensionObjectPacket<'a>> for ExtensionObject<'a> {
    fn from(object: &extension_object::ExtensionObjectPacket<'a>) -> Self {
        use extension_object::ClassNum;
        let ctype = object.get_class_subtype();
        let body = object.body();
        match object.get_class_num() {
            ClassNum::MultiProtocolLabelSwitchingLabelStack => Self::Mpls(ctype, body),
            ClassNum::InterfaceInformationObject => Self::InterfaceInformation(ctype, body),
            ClassNum::InterfaceIdentificationObject => Self::InterfaceIdentification(ctype, body),
            ClassNum::Other(_) => Self::Unknown(ctype, body),
        }
    }
}
