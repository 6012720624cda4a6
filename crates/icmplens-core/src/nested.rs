use crate::error::{Error, Result};
use crate::Dissector;
use icmplens_packet::buffer::Buffer;
use std::io::Write;
use tracing::instrument;

/// The offset of the total length field of the quoted `IPv4` header.
const IP_TOTAL_LENGTH_OFFSET: usize = 2;

/// The maximum number of `ICMP` errors quoted inside one another which are decoded.
pub(crate) const MAX_NESTING_DEPTH: usize = 4;

/// Printed where a quoted datagram ends before the field being decoded.
const TRUNCATED_MARKER: &str = " [|ip]";

/// Print the datagram quoted by an `ICMP` error message.
///
/// The quoted datagram is decoded on its own line and is limited to its declared total length.
/// A truncated quoted datagram is marked and ends the nested output without failing the outer
/// message. Quoted datagrams nested deeper than [`MAX_NESTING_DEPTH`] are not decoded.
#[instrument(skip_all, level = "trace")]
pub(crate) fn print_nested(
    dissector: &Dissector<'_>,
    out: &mut dyn Write,
    payload: Buffer<'_>,
    depth: usize,
) -> Result<()> {
    write!(out, "\n\t")?;
    let length = usize::from(payload.read_u16(IP_TOTAL_LENGTH_OFFSET)?);
    if depth >= MAX_NESTING_DEPTH {
        tracing::debug!(depth, "quoted datagram nested too deep");
        write!(out, "[nested too deep]")?;
        return Ok(());
    }
    match dissector
        .ip_decoder()
        .decode(dissector, out, payload.truncate(length), length, depth + 1)
    {
        Err(Error::Truncated(err)) => {
            tracing::debug!(%err, "quoted datagram truncated");
            write!(out, "{TRUNCATED_MARKER}")?;
            Ok(())
        }
        result => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DissectConfig, Ipv4Decoder, NumericNames};
    use hex_literal::hex;

    const QUOTED: [u8; 28] = hex!(
        "
        45 00 00 1c 00 01 00 00 40 11 60 c0 0a 00 00 01
        08 08 08 08 c3 50 00 35 00 08 00 00
        "
    );

    fn nested(buf: &[u8]) -> (String, bool) {
        nested_at(buf, 0)
    }

    fn nested_at(buf: &[u8], depth: usize) -> (String, bool) {
        let dissector = Dissector::new(DissectConfig::default(), &NumericNames, &Ipv4Decoder);
        let mut out = Vec::new();
        let result = print_nested(&dissector, &mut out, Buffer::new(buf), depth);
        (String::from_utf8(out).unwrap(), result.is_ok())
    }

    #[test]
    fn test_nested() {
        let (text, ok) = nested(&QUOTED);
        assert_eq!("\n\tIP 10.0.0.1.50000 > 8.8.8.8.53: UDP, length 0", text);
        assert!(ok);
    }

    #[test]
    fn test_nested_limited_to_total_length() {
        let mut buf = QUOTED.to_vec();
        buf.extend_from_slice(&[0xff; 12]);
        let (text, ok) = nested(&buf);
        assert_eq!("\n\tIP 10.0.0.1.50000 > 8.8.8.8.53: UDP, length 0", text);
        assert!(ok);
    }

    #[test]
    fn test_nested_truncated_is_absorbed() {
        let (text, ok) = nested(&QUOTED[..25]);
        assert_eq!("\n\tIP  [|ip]", text);
        assert!(ok);
    }

    #[test]
    fn test_nested_depth_limit() {
        let (text, ok) = nested_at(&QUOTED, MAX_NESTING_DEPTH - 1);
        assert_eq!("\n\tIP 10.0.0.1.50000 > 8.8.8.8.53: UDP, length 0", text);
        assert!(ok);
        let (text, ok) = nested_at(&QUOTED, MAX_NESTING_DEPTH);
        assert_eq!("\n\t[nested too deep]", text);
        assert!(ok);
    }

    #[test]
    fn test_nested_length_not_captured() {
        let (text, ok) = nested(&QUOTED[..3]);
        assert_eq!("\n\t", text);
        assert!(!ok);
    }
}
