//! Crate-level error type.

use crate::entur::{EnturError, ParseError};

/// Failure to produce a departure board.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Upstream unavailable: network failure, bad status or timeout.
    #[error("upstream unavailable: {0}")]
    Upstream(#[from] EnturError),

    /// Upstream answered with data we could not parse.
    #[error("malformed upstream data: {0}")]
    Malformed(#[from] ParseError),
}
