use anyhow::{anyhow, bail};

/// Parse one line of hex encoded packet input.
///
/// Whitespace and `0x` prefixes are ignored and `#` starts a comment which runs to the end of the
/// line. Returns `None` if the line holds no packet.
pub fn parse_line(line: &str) -> anyhow::Result<Option<Vec<u8>>> {
    let data = line.split('#').next().unwrap_or_default();
    let digits = data
        .split_whitespace()
        .map(|word| {
            word.strip_prefix("0x")
                .or_else(|| word.strip_prefix("0X"))
                .unwrap_or(word)
        })
        .collect::<String>();
    if digits.is_empty() {
        return Ok(None);
    }
    let nibbles = digits
        .chars()
        .map(|c| {
            c.to_digit(16)
                .map(|digit| digit as u8)
                .ok_or_else(|| anyhow!("invalid hex digit '{c}'"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    if nibbles.len() % 2 != 0 {
        bail!("odd number of hex digits ({})", nibbles.len());
    }
    Ok(Some(
        nibbles
            .chunks_exact(2)
            .map(|pair| (pair[0] << 4) | pair[1])
            .collect(),
    ))
}
