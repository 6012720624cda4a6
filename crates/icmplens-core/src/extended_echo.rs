//! RFC 8335 extended echo (`PROBE`) decoding.
//!
//! This is shared between `ICMPv4` (types 42 and 43) and `ICMPv6` (types 160 and 161).
use crate::error::Result;
use crate::extension::print_object;
use crate::names::NameResolver;
use icmplens_packet::buffer::Buffer;
use icmplens_packet::checksum;
use icmplens_packet::icmp_extension::extension_header::ExtensionHeaderPacket;
use icmplens_packet::icmp_extension::extension_object::ExtensionObjectPacket;
use icmplens_packet::icmp_extension::ICMP_EXTENSION_VERSION;
use icmplens_packet::icmpv4::IcmpCode;
use std::io::Write;
use tracing::instrument;

const OBJECT_LENGTH_OFFSET: usize = 4;

/// The information byte `L` bit of a request.
const LOCAL_FLAG: u8 = 0x01;

/// Print the extended echo details which follow the summary line.
///
/// `data` holds the message bytes following the 8 byte `ICMP` header and `info` is the last byte
/// of that header.
#[instrument(skip(names, out, data), level = "trace")]
pub fn print_extended_echo(
    names: &dyn NameResolver,
    out: &mut dyn Write,
    is_request: bool,
    code: IcmpCode,
    info: u8,
    data: Buffer<'_>,
) -> Result<()> {
    if is_request {
        print_request(names, out, info, data)
    } else {
        print_reply(out, code, info)
    }
}

fn print_request(
    names: &dyn NameResolver,
    out: &mut dyn Write,
    info: u8,
    data: Buffer<'_>,
) -> Result<()> {
    let interface = if info & LOCAL_FLAG == 0 {
        "Remote"
    } else {
        "Local"
    };
    write!(out, "\n\t{interface} Interface")?;
    let header = ExtensionHeaderPacket::new_view(data);
    if header.get_version()? != ICMP_EXTENSION_VERSION {
        write!(out, " (invalid)")?;
        return Ok(());
    }
    let sum = header.get_checksum()?;
    let length = usize::from(data.read_u16(OBJECT_LENGTH_OFFSET)?)
        + ExtensionHeaderPacket::minimum_packet_size();
    if let Ok(covered) = data.slice(0, length) {
        write!(
            out,
            ", checksum 0x{sum:04x} ({}correct), length {length}",
            if checksum::is_valid(covered) { "" } else { "in" }
        )?;
    }
    let object = ExtensionObjectPacket::new_view(
        data.offset(ExtensionHeaderPacket::minimum_packet_size()),
    )?;
    print_object(names, out, &object)?;
    Ok(())
}

fn print_reply(out: &mut dyn Write, code: IcmpCode, info: u8) -> Result<()> {
    let state = (info & 0xe0) >> 5;
    write!(
        out,
        "\n\tCode {} ({}), State {state} ({}), active {} ipv4 {} ipv6 {}",
        code.0,
        code_name(code),
        state_name(state),
        (info >> 2) & 1,
        (info >> 1) & 1,
        info & 1
    )?;
    Ok(())
}

const fn code_name(code: IcmpCode) -> &'static str {
    match code.0 {
        0 => "No error",
        1 => "Malformed Query",
        2 => "No Such Interface",
        3 => "No Such Table Entry",
        4 => "Multiple Interfaces Satisfy Query",
        _ => "Unknown",
    }
}

const fn state_name(state: u8) -> &'static str {
    match state {
        0 => "Reserved",
        1 => "Incomplete",
        2 => "Reachable",
        3 => "Stale",
        4 => "Delay",
        5 => "Probe",
        6 => "Failed",
        _ => "Unknown",
    }
}
