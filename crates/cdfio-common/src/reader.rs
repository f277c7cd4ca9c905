//! Binary reader for zero-copy parsing of byte slices.
//!
//! This module provides [`BinaryReader`], a cursor-like type that reads
//! binary data from a byte slice without copying. Multi-byte values are
//! decoded in the reader's [`Endian`] order, which defaults to little-endian.

use zerocopy::FromBytes;

use crate::{Endian, Error, Result};

/// A binary reader that provides zero-copy reading from a byte slice.
///
/// # Example
///
/// ```
/// use cdfio_common::{BinaryReader, Endian};
///
/// let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
/// let mut reader = BinaryReader::new(&data);
/// assert_eq!(reader.read_u32().unwrap(), 0x04030201);
///
/// let mut reader = BinaryReader::with_order(&data, Endian::Big);
/// assert_eq!(reader.read_u32().unwrap(), 0x01020304);
/// ```
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    position: usize,
    order: Endian,
}

impl<'a> BinaryReader<'a> {
    /// Create a new little-endian reader from a byte slice.
    #[inline]
    pub const fn new(data: &'a [u8]) -> Self {
        Self::with_order(data, Endian::Little)
    }

    /// Create a new reader decoding values in the given byte order.
    #[inline]
    pub const fn with_order(data: &'a [u8], order: Endian) -> Self {
        Self {
            data,
            position: 0,
            order,
        }
    }

    /// Create a new reader starting at a specific position.
    #[inline]
    pub const fn new_at(data: &'a [u8], position: usize, order: Endian) -> Self {
        Self {
            data,
            position,
            order,
        }
    }

    /// Get the byte order used for multi-byte values.
    #[inline]
    pub const fn order(&self) -> Endian {
        self.order
    }

    /// Get the current position in the buffer.
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Get the total length of the underlying buffer.
    #[inline]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Get the number of bytes remaining to read.
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Check if there are no more bytes to read.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Peek at bytes without advancing the position.
    #[inline]
    pub fn peek_bytes(&self, count: usize) -> Result<&'a [u8]> {
        if self.remaining() < count {
            return Err(Error::UnexpectedEof {
                needed: count,
                available: self.remaining(),
            });
        }
        Ok(&self.data[self.position..self.position + count])
    }

    /// Read bytes and advance the position.
    #[inline]
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        let bytes = self.peek_bytes(count)?;
        self.position += count;
        Ok(bytes)
    }

    /// Read a single byte.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        self.read_bytes(1).map(|b| b[0])
    }

    /// Read a signed byte.
    #[inline]
    pub fn read_i8(&mut self) -> Result<i8> {
        self.read_u8().map(|b| b as i8)
    }

    /// Read a u16.
    #[inline]
    pub fn read_u16(&mut self) -> Result<u16> {
        let order = self.order;
        self.read_bytes(2).map(|b| order.read_u16(b))
    }

    /// Read an i16.
    #[inline]
    pub fn read_i16(&mut self) -> Result<i16> {
        let order = self.order;
        self.read_bytes(2).map(|b| order.read_i16(b))
    }

    /// Read a u32.
    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        let order = self.order;
        self.read_bytes(4).map(|b| order.read_u32(b))
    }

    /// Read an i32.
    #[inline]
    pub fn read_i32(&mut self) -> Result<i32> {
        let order = self.order;
        self.read_bytes(4).map(|b| order.read_i32(b))
    }

    /// Read a u64.
    #[inline]
    pub fn read_u64(&mut self) -> Result<u64> {
        let order = self.order;
        self.read_bytes(8).map(|b| order.read_u64(b))
    }

    /// Read an i64.
    #[inline]
    pub fn read_i64(&mut self) -> Result<i64> {
        let order = self.order;
        self.read_bytes(8).map(|b| order.read_i64(b))
    }

    /// Read an f32.
    #[inline]
    pub fn read_f32(&mut self) -> Result<f32> {
        let order = self.order;
        self.read_bytes(4).map(|b| order.read_f32(b))
    }

    /// Read an f64.
    #[inline]
    pub fn read_f64(&mut self) -> Result<f64> {
        let order = self.order;
        self.read_bytes(8).map(|b| order.read_f64(b))
    }

    /// Read an unsigned integer stored on `width` bytes (4 or 8), widened to u64.
    pub fn read_uint(&mut self, width: usize) -> Result<u64> {
        match width {
            4 => self.read_u32().map(u64::from),
            8 => self.read_u64(),
            other => Err(Error::UnsupportedWidth(other)),
        }
    }

    /// Read a string from a fixed-size buffer, stopping at the first null.
    ///
    /// The whole buffer is consumed. When no terminator is present the
    /// string spans the full width. Invalid UTF-8 is replaced rather than
    /// rejected.
    pub fn read_string_in_buffer(&mut self, buffer_size: usize) -> Result<String> {
        let bytes = self.read_bytes(buffer_size)?;
        let end = memchr::memchr(0, bytes).unwrap_or(buffer_size);
        Ok(String::from_utf8_lossy(&bytes[..end]).into_owned())
    }

    /// Read a struct using zerocopy.
    ///
    /// The struct must implement `FromBytes` from the zerocopy crate. Its
    /// fields carry their own byte order, the reader's order is not applied.
    #[inline]
    pub fn read_struct<T: FromBytes>(&mut self) -> Result<T> {
        let size = std::mem::size_of::<T>();
        let bytes = self.read_bytes(size)?;
        T::read_from_bytes(bytes).map_err(|_| Error::UnexpectedEof {
            needed: size,
            available: bytes.len(),
        })
    }
}
