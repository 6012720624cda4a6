use std::io;
use thiserror::Error;

/// A dissector error result.
pub type Result<T> = std::result::Result<T, Error>;

/// A dissector error.
#[derive(Error, Debug)]
pub enum Error {
    /// A field lies beyond the captured bytes.
    #[error("truncated packet: {0}")]
    Truncated(#[from] icmplens_packet::error::Error),
    /// The output sink failed.
    #[error("output error: {0}")]
    Output(#[from] io::Error),
}

/// How far the decode of a single message got.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Outcome {
    /// Every applicable section was printed.
    Complete,
    /// Printing stopped at a field beyond the captured bytes.
    Truncated,
}

/// Separate a truncation from an output failure.
///
/// Truncation ends the decode of one message only, so it becomes an [`Outcome`] while an output
/// failure is returned to the caller.
pub(crate) fn into_outcome(result: Result<()>) -> io::Result<Outcome> {
    match result {
        Ok(()) => Ok(Outcome::Complete),
        Err(Error::Truncated(err)) => {
            tracing::debug!(%err, "message truncated");
            Ok(Outcome::Truncated)
        }
        Err(Error::Output(err)) => Err(err),
    }
}
