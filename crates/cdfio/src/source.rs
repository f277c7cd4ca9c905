//! Positioned reads over a CDF byte stream.
//!
//! Every read takes an explicit file offset; the stream position left behind
//! by one read is never relied upon by the next.

use std::io::{Read, Seek, SeekFrom};

use cdfio_common::Endian;

use crate::layout::{FieldBuf, Span};
use crate::{Error, Result};

/// One contiguous byte range of the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataChunk {
    /// Absolute file offset.
    pub position: u64,
    /// Length in bytes.
    pub size: usize,
}

impl DataChunk {
    pub fn new(position: u64, size: usize) -> Self {
        Self { position, size }
    }
}

/// An exclusively owned, seekable CDF stream of known length.
#[derive(Debug)]
pub struct CdfSource<R> {
    inner: R,
    len: u64,
}

impl<R: Read + Seek> CdfSource<R> {
    /// Wrap a stream, measuring its total length.
    pub fn new(mut inner: R) -> Result<Self> {
        let len = inner.seek(SeekFrom::End(0))?;
        Ok(Self { inner, len })
    }

    /// Total length of the stream in bytes.
    #[inline]
    pub fn len(&self) -> u64 {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Give back the wrapped stream.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Check that `len` bytes starting at `offset` lie inside the stream.
    pub fn check_range(&self, offset: u64, len: usize) -> Result<()> {
        let fits = offset
            .checked_add(len as u64)
            .is_some_and(|end| end <= self.len);
        if !fits {
            return Err(Error::Truncated {
                offset,
                len,
                file_len: self.len,
            });
        }
        Ok(())
    }

    /// Fill `buf` with the bytes starting at `offset`.
    ///
    /// Fails with [`Error::Truncated`] instead of performing a short read.
    pub fn read_into(&mut self, offset: u64, buf: &mut [u8]) -> Result<()> {
        self.check_range(offset, buf.len())?;
        self.inner.seek(SeekFrom::Start(offset))?;
        self.inner.read_exact(buf)?;
        Ok(())
    }

    /// Read `len` bytes starting at `offset`.
    pub fn read_at(&mut self, offset: u64, len: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.read_into(offset, &mut buf)?;
        Ok(buf)
    }

    /// Read the fields of the record at `record_offset` covered by `span`, in one read.
    pub fn read_span(&mut self, record_offset: u64, span: Span, order: Endian) -> Result<FieldBuf> {
        let start = record_offset
            .checked_add(span.start as u64)
            .ok_or(Error::Truncated {
                offset: record_offset,
                len: span.end,
                file_len: self.len,
            })?;
        let bytes = self.read_at(start, span.len())?;
        Ok(FieldBuf::new(bytes, span.start, order))
    }

    /// Concatenate scattered byte ranges into one buffer.
    ///
    /// Ranges are read in list order, one seek each, without sorting or
    /// merging; the output follows the list, not file position. Every range
    /// and the combined size are checked against the stream length before
    /// the output buffer is allocated.
    pub fn read_chunks(&mut self, chunks: &[DataChunk]) -> Result<Vec<u8>> {
        let mut total = 0usize;
        for chunk in chunks {
            self.check_range(chunk.position, chunk.size)?;
            total = total
                .checked_add(chunk.size)
                .filter(|&total| total as u64 <= self.len)
                .ok_or(Error::Truncated {
                    offset: chunk.position,
                    len: chunk.size,
                    file_len: self.len,
                })?;
        }
        let mut buffer = vec![0u8; total];
        let mut pos = 0;
        for chunk in chunks {
            tracing::trace!(position = chunk.position, size = chunk.size, "reading chunk");
            self.read_into(chunk.position, &mut buffer[pos..pos + chunk.size])?;
            pos += chunk.size;
        }
        Ok(buffer)
    }
}
