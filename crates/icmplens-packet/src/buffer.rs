use crate::error::{Error, Result};

/// An immutable view over the captured bytes of a packet.
///
/// The length of the underlying slice is the captured length. Every read is checked against it
/// and fails with [`Error::Truncated`] rather than panicking, so a decoder can stop at the first
/// missing field with `?`.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Buffer<'a> {
    bytes: &'a [u8],
}

impl<'a> Buffer<'a> {
    #[must_use]
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    /// The number of captured bytes.
    #[must_use]
    pub const fn captured_len(&self) -> usize {
        self.bytes.len()
    }

    /// Is the range `[offset, offset + length)` fully captured?
    #[must_use]
    pub fn contains(&self, offset: usize, length: usize) -> bool {
        offset
            .checked_add(length)
            .is_some_and(|end| end <= self.bytes.len())
    }

    /// Get the byte at a given offset.
    pub fn read(&self, offset: usize) -> Result<u8> {
        self.bytes
            .get(offset)
            .copied()
            .ok_or_else(|| self.truncated(offset, 1))
    }

    /// Get N bytes from the packet at a given byte offset.
    pub fn get_bytes<const N: usize>(&self, offset: usize) -> Result<[u8; N]> {
        let slice = self.slice(offset, N)?;
        let mut bytes = [0_u8; N];
        bytes.copy_from_slice(slice);
        Ok(bytes)
    }

    /// Get a big-endian `u16` at a given offset.
    pub fn read_u16(&self, offset: usize) -> Result<u16> {
        self.get_bytes(offset).map(u16::from_be_bytes)
    }

    /// Get a big-endian `u32` at a given offset.
    pub fn read_u32(&self, offset: usize) -> Result<u32> {
        self.get_bytes(offset).map(u32::from_be_bytes)
    }

    /// Get `length` bytes starting at `offset`.
    pub fn slice(&self, offset: usize, length: usize) -> Result<&'a [u8]> {
        if self.contains(offset, length) {
            Ok(&self.bytes[offset..offset + length])
        } else {
            Err(self.truncated(offset, length))
        }
    }

    /// The captured bytes from `offset` onwards, or as many of `length` as were captured.
    #[must_use]
    pub fn available(&self, offset: usize, length: usize) -> &'a [u8] {
        let start = offset.min(self.bytes.len());
        let end = offset.saturating_add(length).min(self.bytes.len());
        &self.bytes[start..end]
    }

    /// A view of the captured bytes starting `offset` bytes in.
    ///
    /// The view is empty if `offset` lies beyond the captured bytes.
    #[must_use]
    pub fn offset(&self, offset: usize) -> Self {
        Self::new(&self.bytes[offset.min(self.bytes.len())..])
    }

    /// A view whose captured boundary is narrowed to at most `length` bytes.
    #[must_use]
    pub fn truncate(&self, length: usize) -> Self {
        Self::new(&self.bytes[..length.min(self.bytes.len())])
    }

    fn truncated(&self, offset: usize, length: usize) -> Error {
        Error::Truncated {
            offset,
            length,
            captured: self.bytes.len(),
        }
    }
}
