use crate::error::Result;
use crate::names::NameResolver;
use crate::text::{hex_dump, write_printable, OBJECT_INDENT};
use crate::Dissector;
use icmplens_packet::buffer::Buffer;
use icmplens_packet::checksum;
use icmplens_packet::icmp_extension::extension_object::{
    ClassNum, ClassSubType, ExtensionObjectPacket, ObjectBody,
};
use icmplens_packet::icmp_extension::extension_structure::ExtensionsPacket;
use icmplens_packet::icmp_extension::interface_identification::{
    InterfaceIdentificationType, ADDRESS_SUB_OBJECT_HEADER_SIZE,
};
use icmplens_packet::icmp_extension::interface_information::{
    InterfaceInformationFlags, InterfaceRole, IP_ADDR_SUB_OBJECT_HEADER_SIZE,
    MAX_INTERFACE_NAME_LENGTH,
};
use icmplens_packet::icmp_extension::mpls_label_stack_member::MplsLabelStackMemberPacket;
use icmplens_packet::icmp_extension::{
    AddressFamily, ExtensionObject, ICMP_EXTENSION_OFFSET, ICMP_EXTENSION_VERSION,
};
use std::io::Write;
use std::net::{Ipv4Addr, Ipv6Addr};
use tracing::instrument;

/// The captured bytes needed before the extension structure is examined.
///
/// This is the 8 byte `ICMP` header, the 128 byte original datagram field, the 4 byte extension
/// header and the first object byte.
const MULTIPART_MIN_CAPTURED: usize = ICMP_EXTENSION_OFFSET + 5;

/// The offset of the RFC 4884 length field.
const ICMP_LENGTH_OFFSET: usize = 5;

/// How an extension object ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ObjectStatus {
    /// The object was printed, or ended early at its declared length.
    Complete,
    /// The object cannot be walked past and no further objects may be read.
    Malformed,
}

/// Print the RFC 4884 extension structure of an `ICMP` message.
///
/// `icmp` holds the whole message and `length` is its declared length.
#[instrument(skip(dissector, out, icmp), level = "trace")]
pub(crate) fn print_extensions(
    dissector: &Dissector<'_>,
    out: &mut dyn Write,
    icmp: Buffer<'_>,
    length: usize,
) -> Result<()> {
    icmp.slice(0, MULTIPART_MIN_CAPTURED)?;
    let extensions = ExtensionsPacket::new_view(
        icmp.offset(ICMP_EXTENSION_OFFSET),
        length.saturating_sub(ICMP_EXTENSION_OFFSET),
    )?;
    if dissector.config().extension_checksum_probe && icmp.read(ICMP_LENGTH_OFFSET)? == 0 {
        if let Some(covered) = extensions.covered() {
            if !checksum::is_valid(covered) {
                tracing::debug!("no extension structure present");
                return Ok(());
            }
        }
    }
    let header = extensions.header();
    let version = header.get_version()?;
    write!(out, "\n\tICMP Multi-Part extension v{version}")?;
    if version != ICMP_EXTENSION_VERSION {
        write!(out, " packet not supported")?;
        return Ok(());
    }
    if let Some(covered) = extensions.covered() {
        write!(
            out,
            ", checksum 0x{:04x} ({}correct), length {}",
            header.get_checksum()?,
            if checksum::is_valid(covered) { "" } else { "in" },
            extensions.length()
        )?;
    }
    for object in extensions.objects() {
        if print_object(dissector.names(), out, &object?)? == ObjectStatus::Malformed {
            break;
        }
    }
    Ok(())
}

/// Print a single extension object.
pub fn print_object(
    names: &dyn NameResolver,
    out: &mut dyn Write,
    object: &ExtensionObjectPacket<'_>,
) -> Result<ObjectStatus> {
    let class_num = object.get_class_num();
    write!(
        out,
        "\n\t  {} ({}), Class-Type: {}, length {}",
        class_name(class_num),
        class_num.id(),
        object.get_class_subtype().0,
        object.get_length()
    )?;
    if object.is_malformed() {
        tracing::debug!(?object, "malformed extension object");
        return Ok(ObjectStatus::Malformed);
    }
    match ExtensionObject::from(object) {
        ExtensionObject::Mpls(ClassSubType(1), body) => print_mpls(out, body),
        ExtensionObject::InterfaceInformation(ctype, body) => {
            print_interface_information(names, out, ctype, body)
        }
        ExtensionObject::InterfaceIdentification(ctype, body) => {
            print_interface_identification(names, out, ctype, body)
        }
        ExtensionObject::Mpls(_, body) | ExtensionObject::Unknown(_, body) => {
            hex_dump(out, body.rest(), OBJECT_INDENT)?;
            Ok(ObjectStatus::Complete)
        }
    }
}

const fn class_name(class_num: ClassNum) -> &'static str {
    match class_num {
        ClassNum::MultiProtocolLabelSwitchingLabelStack => "MPLS Stack Entry Object",
        ClassNum::InterfaceInformationObject => "Interface Information Object",
        ClassNum::InterfaceIdentificationObject => "Interface Identification Object",
        ClassNum::Other(_) => "unknown",
    }
}

const fn role_name(role: InterfaceRole) -> &'static str {
    match role {
        InterfaceRole::Incoming => "Incoming IP Interface",
        InterfaceRole::SubIpComponentOfIncoming => "Sub-IP Component of Incoming IP Interface",
        InterfaceRole::Outgoing => "Outgoing IP Interface",
        InterfaceRole::NextHop => "IP Next hop",
    }
}

fn print_mpls(out: &mut dyn Write, mut body: ObjectBody<'_>) -> Result<ObjectStatus> {
    let Some(entry) = body.take(MplsLabelStackMemberPacket::minimum_packet_size())? else {
        return Ok(ObjectStatus::Complete);
    };
    let member = MplsLabelStackMemberPacket::new_view(entry)?;
    write!(
        out,
        "\n\t    label {}, tc {}",
        member.get_label(),
        member.get_traffic_class()
    )?;
    if member.is_bottom_of_stack() {
        write!(out, ", [S]")?;
    }
    write!(out, ", ttl {}", member.get_ttl())?;
    Ok(ObjectStatus::Complete)
}

/// Print an Interface Information Object (RFC 5837).
///
/// The sub-objects selected by the class sub-type follow each other in a fixed order: interface
/// index, IP address, interface name and MTU.
fn print_interface_information(
    names: &dyn NameResolver,
    out: &mut dyn Write,
    ctype: ClassSubType,
    mut body: ObjectBody<'_>,
) -> Result<ObjectStatus> {
    let flags = InterfaceInformationFlags::from(ctype);
    write!(
        out,
        "\n\t    Interface Role: {}",
        role_name(InterfaceRole::from(ctype))
    )?;
    if flags.contains(InterfaceInformationFlags::IF_INDEX) {
        let Some(index) = body.take_u32()? else {
            return Ok(ObjectStatus::Complete);
        };
        write!(out, "\n\t    Interface Index: {index}")?;
    }
    if flags.contains(InterfaceInformationFlags::IP_ADDR) {
        write!(out, "\n\t    IP Address sub-object: ")?;
        let Some(header) = body.take(IP_ADDR_SUB_OBJECT_HEADER_SIZE)? else {
            return Ok(ObjectStatus::Complete);
        };
        match AddressFamily::from(header.read_u16(0)?) {
            AddressFamily::Ipv4 => {
                let Some(addr) = body.take(4)? else {
                    return Ok(ObjectStatus::Complete);
                };
                write!(out, "{}", names.ipv4(Ipv4Addr::from(addr.get_bytes::<4>(0)?)))?;
            }
            AddressFamily::Ipv6 => {
                let Some(addr) = body.take(16)? else {
                    return Ok(ObjectStatus::Complete);
                };
                write!(out, "{}", names.ipv6(Ipv6Addr::from(addr.get_bytes::<16>(0)?)))?;
            }
            AddressFamily::Other(_) => {
                write!(out, "Unknown Address Family Identifier")?;
                return Ok(ObjectStatus::Malformed);
            }
        }
    }
    if flags.contains(InterfaceInformationFlags::NAME) {
        if !body.ensure(1)? {
            return Ok(ObjectStatus::Complete);
        }
        let [length] = body.peek_bytes::<1>()?;
        write!(out, "\n\t    Interface Name")?;
        if length == 0 {
            write!(out, " [length {length}] (invalid)")?;
            return Ok(ObjectStatus::Complete);
        }
        let Some(name) = body.take(usize::from(length))? else {
            return Ok(ObjectStatus::Complete);
        };
        if length % 4 != 0 {
            write!(out, " [length {length} != N x 4] (invalid)")?;
            return Ok(ObjectStatus::Complete);
        }
        if length > MAX_INTERFACE_NAME_LENGTH {
            write!(out, " [length {length} > {MAX_INTERFACE_NAME_LENGTH}] (invalid)")?;
            return Ok(ObjectStatus::Complete);
        }
        write!(out, ", length {length}: ")?;
        write_printable(out, name.available(1, usize::from(length) - 1))?;
    }
    if flags.contains(InterfaceInformationFlags::MTU) {
        let Some(mtu) = body.take_u32()? else {
            return Ok(ObjectStatus::Complete);
        };
        write!(out, "\n\t    MTU: {mtu}")?;
    }
    Ok(ObjectStatus::Complete)
}

/// Print an Interface Identification Object (RFC 8335).
fn print_interface_identification(
    names: &dyn NameResolver,
    out: &mut dyn Write,
    ctype: ClassSubType,
    mut body: ObjectBody<'_>,
) -> Result<ObjectStatus> {
    match InterfaceIdentificationType::from(ctype) {
        InterfaceIdentificationType::Name => {
            write!(out, "\n\t    Interface Name, length {}: ", body.remaining())?;
            if !write_printable(out, body.rest())? {
                body.ensure(body.remaining())?;
            }
        }
        InterfaceIdentificationType::Index => {
            let Some(index) = body.take_u32()? else {
                return Ok(ObjectStatus::Complete);
            };
            write!(out, "\n\t    Interface Index: {index}")?;
        }
        InterfaceIdentificationType::Address => {
            write!(out, "\n\t    IP Address sub-object: ")?;
            let Some(header) = body.take(ADDRESS_SUB_OBJECT_HEADER_SIZE)? else {
                return Ok(ObjectStatus::Complete);
            };
            let afi = AddressFamily::from(header.read_u16(0)?);
            let addr_len = header.read(2)?;
            if !body.ensure(usize::from(addr_len))? {
                return Ok(ObjectStatus::Complete);
            }
            let Some(expected_len) = afi.address_length() else {
                write!(out, "Unknown Address Family Identifier")?;
                return Ok(ObjectStatus::Malformed);
            };
            if usize::from(addr_len) != expected_len {
                write!(out, "[length {addr_len} != {expected_len}] ")?;
            }
            if afi == AddressFamily::Ipv4 {
                let addr = Ipv4Addr::from(body.peek_bytes::<4>()?);
                write!(out, "{}", names.ipv4(addr))?;
            } else {
                let addr = Ipv6Addr::from(body.peek_bytes::<16>()?);
                write!(out, "{}", names.ipv6(addr))?;
            }
        }
        InterfaceIdentificationType::Other(_) => hex_dump(out, body.rest(), OBJECT_INDENT)?,
    }
    Ok(ObjectStatus::Complete)
}
