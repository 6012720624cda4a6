//! Internet checksum (RFC 1071) implementations.
//!
//! This code is derived from [`libpnet`] which is available under the Apache 2.0 license.
//!
//! [`libpnet`]: https://github.com/libpnet/libpnet

/// Calculate the Internet checksum over all of `data`.
///
/// When `data` includes a correctly filled checksum field the result is zero.
#[must_use]
pub fn internet_checksum(data: &[u8]) -> u16 {
    finalize_checksum(sum_be_words(data, None))
}

/// Calculate the checksum for an `IPv4` header, ignoring the checksum field.
#[must_use]
pub fn ipv4_header_checksum(data: &[u8]) -> u16 {
    finalize_checksum(sum_be_words(data, Some(5)))
}

/// Does `data`, checksum field included, sum to zero?
#[must_use]
pub fn is_valid(data: &[u8]) -> bool {
    internet_checksum(data) == 0
}

/// The checksum value the sender should have used.
///
/// `stored` is the value found in the checksum field and `computed` is the result of
/// [`internet_checksum`] over the whole covered range, checksum field included.
#[must_use]
pub const fn expected_checksum(stored: u16, computed: u16) -> u16 {
    let mut sum = stored as u32 + computed as u32;
    sum = (sum & 0xffff) + (sum >> 16);
    sum = (sum & 0xffff) + (sum >> 16);
    sum as u16
}

fn sum_be_words(data: &[u8], ignore_word: Option<usize>) -> u32 {
    let mut chunks = data.chunks_exact(2);
    let mut sum = chunks
        .by_ref()
        .enumerate()
        .filter(|(i, _)| Some(*i) != ignore_word)
        .map(|(_, word)| u32::from(u16::from_be_bytes([word[0], word[1]])))
        .fold(0_u32, |acc, word| fold_carry(acc + word));
    if let [last] = chunks.remainder() {
        sum = fold_carry(sum + (u32::from(*last) << 8));
    }
    sum
}

const fn fold_carry(sum: u32) -> u32 {
    (sum & 0xffff) + (sum >> 16)
}

const fn finalize_checksum(mut sum: u32) -> u16 {
    while sum >> 16 != 0 {
        sum = (sum >> 16) + (sum & 0xffff);
    }
    !sum as u16
}
