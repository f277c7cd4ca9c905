//! Decompression of compressed CDF payloads.
//!
//! Descriptor records are never compressed; these codecs only apply to
//! payload blocks whose uncompressed size is recorded next to them.

use std::io::{Read, Write};

use flate2::read::{DeflateDecoder, GzDecoder};
use flate2::write::{DeflateEncoder, GzEncoder};
use flate2::Compression;

use crate::{Error, Result};

/// A codec that inflates a block to a known size.
pub trait Decompress {
    /// Inflate `data`, which must expand to exactly `expected_len` bytes.
    fn decompress(&self, data: &[u8], expected_len: usize) -> Result<Vec<u8>>;
}

/// gzip-wrapped DEFLATE (CDF compression type 5).
#[derive(Debug, Clone, Copy, Default)]
pub struct Gzip;

/// Raw DEFLATE stream without a container.
#[derive(Debug, Clone, Copy, Default)]
pub struct Deflate;

fn inflate(mut decoder: impl Read, expected_len: usize) -> Result<Vec<u8>> {
    let mut output = Vec::with_capacity(expected_len);
    decoder
        .read_to_end(&mut output)
        .map_err(|e| Error::Decompression(e.to_string()))?;

    if output.len() != expected_len {
        return Err(Error::SizeMismatch {
            expected: expected_len,
            actual: output.len(),
        });
    }
    Ok(output)
}

impl Decompress for Gzip {
    fn decompress(&self, data: &[u8], expected_len: usize) -> Result<Vec<u8>> {
        inflate(GzDecoder::new(data), expected_len)
    }
}

impl Decompress for Deflate {
    fn decompress(&self, data: &[u8], expected_len: usize) -> Result<Vec<u8>> {
        inflate(DeflateDecoder::new(data), expected_len)
    }
}

/// gzip-compress `data` at the default level.
pub fn gzip(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// DEFLATE-compress `data` at the default level.
pub fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}
