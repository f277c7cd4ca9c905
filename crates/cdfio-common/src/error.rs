//! Error types for cdfio-common.

use thiserror::Error;

/// Common error type for cdfio operations.
#[derive(Debug, Error)]
pub enum Error {
    /// End of buffer reached while reading.
    #[error("unexpected end of buffer: needed {needed} bytes but only {available} available")]
    UnexpectedEof { needed: usize, available: usize },

    /// Integer width other than 4 or 8 bytes requested.
    #[error("unsupported integer width: {0} bytes")]
    UnsupportedWidth(usize),
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
