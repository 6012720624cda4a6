use std::io::{self, Write};

/// The indent of lines nested within an extension object.
pub const OBJECT_INDENT: &str = "\n\t    ";

/// Dump bytes as hex, 16 bytes per line, each line prefixed by `indent` and the line offset.
pub fn hex_dump(out: &mut dyn Write, bytes: &[u8], indent: &str) -> io::Result<()> {
    for (line, chunk) in bytes.chunks(16).enumerate() {
        write!(out, "{indent}0x{:04x}: ", line * 16)?;
        for word in chunk.chunks(2) {
            match word {
                [hi, lo] => write!(out, " {hi:02x}{lo:02x}")?,
                [b] => write!(out, " {b:02x}")?,
                _ => {}
            }
        }
    }
    Ok(())
}

/// Write bytes as printable text, stopping at the first NUL.
///
/// Bytes with the high bit set are written as `M-` followed by the 7 bit character and control
/// characters are written as `^` followed by the character with bit 6 flipped.
///
/// Returns `true` if a NUL was found.
pub fn write_printable(out: &mut dyn Write, bytes: &[u8]) -> io::Result<bool> {
    for &byte in bytes {
        if byte == 0 {
            return Ok(true);
        }
        let mut c = byte;
        if !c.is_ascii() {
            c &= 0x7f;
            out.write_all(b"M-")?;
        }
        if !(0x20..=0x7e).contains(&c) {
            c ^= 0x40;
            out.write_all(b"^")?;
        }
        out.write_all(&[c])?;
    }
    Ok(false)
}

/// Format milliseconds since midnight UTC as `HH:MM:SS.mmm`.
///
/// The hours are not wrapped at 24.
#[must_use]
pub fn fmt_timestamp(millis: u32) -> String {
    let msec = millis % 1000;
    let secs = millis / 1000;
    format!(
        "{:02}:{:02}:{:02}.{msec:03}",
        secs / 3600,
        (secs / 60) % 60,
        secs % 60
    )
}

/// Format a lifetime in seconds as `S`, `M:SS` or `H:MM:SS`.
#[must_use]
pub fn fmt_lifetime(secs: u16) -> String {
    if secs < 60 {
        format!("{secs}")
    } else if secs < 3600 {
        format!("{}:{:02}", secs / 60, secs % 60)
    } else {
        format!("{}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn dump(bytes: &[u8]) -> String {
        let mut out = Vec::new();
        hex_dump(&mut out, bytes, OBJECT_INDENT).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn printable(bytes: &[u8]) -> (String, bool) {
        let mut out = Vec::new();
        let nul = write_printable(&mut out, bytes).unwrap();
        (String::from_utf8(out).unwrap(), nul)
    }

    #[test]
    fn test_hex_dump() {
        assert_eq!("\n\t    0x0000:  0102 03", dump(&[0x01, 0x02, 0x03]));
        assert_eq!("", dump(&[]));
    }

    #[test]
    fn test_hex_dump_multiple_lines() {
        let bytes = (0..18).collect::<Vec<u8>>();
        assert_eq!(
            "\n\t    0x0000:  0001 0203 0405 0607 0809 0a0b 0c0d 0e0f\n\t    0x0010:  1011",
            dump(&bytes)
        );
    }

    #[test_case(b"eth0", "eth0", false)]
    #[test_case(b"lo\0\0", "lo", true)]
    #[test_case(b"a\x01b", "a^Ab", false)]
    #[test_case(b"\xe1", "M-a", false)]
    #[test_case(b"\x81", "M-^A", false)]
    #[test_case(b"\x7f", "^?", false)]
    fn test_printable(bytes: &[u8], expected: &str, nul: bool) {
        assert_eq!((String::from(expected), nul), printable(bytes));
    }

    #[test_case(0, "00:00:00.000")]
    #[test_case(1, "00:00:00.001")]
    #[test_case(3_723_004, "01:02:03.004")]
    #[test_case(86_400_000, "24:00:00.000")]
    fn test_timestamp(millis: u32, expected: &str) {
        assert_eq!(expected, fmt_timestamp(millis));
    }

    #[test_case(0, "0")]
    #[test_case(59, "59")]
    #[test_case(60, "1:00")]
    #[test_case(1800, "30:00")]
    #[test_case(3600, "1:00:00")]
    #[test_case(65535, "18:12:15")]
    fn test_lifetime(secs: u16, expected: &str) {
        assert_eq!(expected, fmt_lifetime(secs));
    }
}
