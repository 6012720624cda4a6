use thiserror::Error;

/// A packet error result.
pub type Result<T> = std::result::Result<T, Error>;

/// A packet error.
#[derive(Error, Debug, Eq, PartialEq)]
pub enum Error {
    /// Attempting to view a packet with an insufficient number of captured bytes.
    #[error("insufficient buffer for {0} packet, minimum={1}, provided={2}")]
    InsufficientPacketBuffer(String, usize, usize),
    /// Attempting to read a field which lies beyond the captured bytes.
    #[error("truncated read of {length} bytes at offset {offset}, captured={captured}")]
    Truncated {
        offset: usize,
        length: usize,
        captured: usize,
    },
}
