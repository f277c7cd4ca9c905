//! Error types for CDF parsing.

use thiserror::Error;

use crate::types::RecordType;

/// Errors that can occur when reading a CDF file.
///
/// Any of these aborts the whole parse; no partial result is produced.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] cdfio_common::Error),

    /// The magic pair at offset 0 does not identify a CDF file.
    #[error("not a CDF file: magic {first:#010x} {second:#010x}")]
    NotCdf { first: u32, second: u32 },

    /// A read would run past the end of the file.
    #[error("read of {len} bytes at offset {offset} runs past end of file ({file_len} bytes)")]
    Truncated { offset: u64, len: usize, file_len: u64 },

    /// A record header carries a different tag than the record being loaded.
    #[error("expected {expected:?} record at offset {offset}, found {actual:?}")]
    RecordTypeMismatch {
        offset: u64,
        expected: RecordType,
        actual: RecordType,
    },

    /// Record type tag not defined by the format.
    #[error("unknown record type {tag} at offset {offset}")]
    UnknownRecordType { offset: u64, tag: i32 },

    /// CDF data type tag not defined by the format.
    #[error("unknown CDF data type {0}")]
    UnknownDataType(u32),

    /// Encoding tag not defined by the format.
    #[error("unknown CDF encoding {0}")]
    UnknownEncoding(u32),

    /// A chain ended (next offset 0) before its declared count was reached.
    #[error("{kind} chain ends after {index} of {count} declared records")]
    BrokenChain {
        kind: &'static str,
        index: u32,
        count: u32,
    },

    /// Value payload length is not a whole number of elements.
    #[error("value payload of {len} bytes is not a multiple of element size {element_size}")]
    ValueSize { len: usize, element_size: usize },

    /// Decompression error.
    #[error("decompression error: {0}")]
    Decompression(String),

    /// Decompressed size mismatch.
    #[error("decompressed size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
}

/// Result type for CDF operations.
pub type Result<T> = std::result::Result<T, Error>;
