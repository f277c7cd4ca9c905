//! Field layouts of descriptor records.
//!
//! A record is declared as an ordered run of [`Field`]s. Each field starts
//! where the previous one ends, so a record definition only names widths and
//! the offset table falls out of the declaration. Two widths depend on the
//! file [`Generation`]: file offsets (4 bytes in v2.x, 8 in v3.x) and some
//! fixed-width names (64 or 256 bytes). Every record kind therefore has one
//! `const fn new(Generation)` producing its table, evaluated at compile time
//! for both generations.

use cdfio_common::{BinaryReader, Endian};

use crate::Result;

/// On-disk layout generation, decided once per file from the magic number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Generation {
    /// Format 2.x: 32-bit offsets, short names.
    V2,
    /// Format 3.x: 64-bit offsets, long names.
    V3,
}

impl Generation {
    /// Width of a file-offset field.
    pub const fn offset_width(self) -> usize {
        match self {
            Self::V2 => 4,
            Self::V3 => 8,
        }
    }

    /// Pick the width of a string field that differs between generations.
    pub const fn string_width(self, v2: usize, v3: usize) -> usize {
        match self {
            Self::V2 => v2,
            Self::V3 => v3,
        }
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::V2 => write!(f, "v2.x"),
            Self::V3 => write!(f, "v3.x"),
        }
    }
}

/// How the bytes of a field are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Unsigned integer (4 bytes).
    UInt,
    /// Byte offset into the file (4 or 8 bytes).
    Offset,
    /// 32-bit tag (record type, encoding, data type).
    Tag,
    /// Fixed-width, null-terminated string.
    Str,
    /// Reserved word, always zero, never decoded.
    Reserved,
}

/// A typed value at a fixed byte offset inside a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Offset from the start of the record.
    pub offset: usize,
    /// Width in bytes.
    pub len: usize,
    /// Interpretation of the bytes.
    pub kind: FieldKind,
}

impl Field {
    /// A field at the very start of a record.
    pub const fn first(len: usize, kind: FieldKind) -> Self {
        Self {
            offset: 0,
            len,
            kind,
        }
    }

    /// Offset of the first byte after this field.
    pub const fn end(&self) -> usize {
        self.offset + self.len
    }

    /// The field that follows this one.
    pub const fn then(self, len: usize, kind: FieldKind) -> Self {
        Self {
            offset: self.end(),
            len,
            kind,
        }
    }

    /// A 4-byte unsigned integer after this field.
    pub const fn then_uint(self) -> Self {
        self.then(4, FieldKind::UInt)
    }

    /// A 4-byte record type tag after this field.
    pub const fn then_tag(self) -> Self {
        self.then(4, FieldKind::Tag)
    }

    /// A 4-byte reserved word after this field.
    pub const fn then_reserved(self) -> Self {
        self.then(4, FieldKind::Reserved)
    }

    /// A file offset after this field, as wide as `generation` stores them.
    pub const fn then_offset(self, generation: Generation) -> Self {
        self.then(generation.offset_width(), FieldKind::Offset)
    }

    /// A fixed-width, null-padded string of `len` bytes after this field.
    pub const fn then_str(self, len: usize) -> Self {
        self.then(len, FieldKind::Str)
    }
}

/// A contiguous byte range of a record, relative to its start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    /// The smallest range covering every field in `fields`.
    pub const fn covering(fields: &[Field]) -> Self {
        let mut start = usize::MAX;
        let mut end = 0;
        let mut i = 0;
        while i < fields.len() {
            if fields[i].offset < start {
                start = fields[i].offset;
            }
            if fields[i].end() > end {
                end = fields[i].end();
            }
            i += 1;
        }
        if start > end {
            start = end;
        }
        Self { start, end }
    }

    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Record bytes loaded in one read, addressed by field.
///
/// `base` is the record-relative offset of `bytes[0]`, so a field at record
/// offset `o` lives at `bytes[o - base..]`.
#[derive(Debug, Clone)]
pub struct FieldBuf {
    bytes: Vec<u8>,
    base: usize,
    order: Endian,
}

impl FieldBuf {
    pub fn new(bytes: Vec<u8>, base: usize, order: Endian) -> Self {
        Self { bytes, base, order }
    }

    /// Same bytes, decoded with another byte order from now on.
    pub fn with_order(self, order: Endian) -> Self {
        Self { order, ..self }
    }

    fn reader(&self, field: Field, order: Endian) -> Result<BinaryReader<'_>> {
        let position = field
            .offset
            .checked_sub(self.base)
            .filter(|start| start + field.len <= self.bytes.len())
            .ok_or(cdfio_common::Error::UnexpectedEof {
                needed: field.end(),
                available: self.base + self.bytes.len(),
            })?;
        Ok(BinaryReader::new_at(&self.bytes, position, order))
    }

    /// Decode an unsigned field of any width (UInt or Offset).
    pub fn uint(&self, field: Field) -> Result<u64> {
        self.uint_in(field, self.order)
    }

    /// Decode an unsigned field with an explicit byte order.
    pub fn uint_in(&self, field: Field, order: Endian) -> Result<u64> {
        debug_assert!(matches!(field.kind, FieldKind::UInt | FieldKind::Offset));
        Ok(self.reader(field, order)?.read_uint(field.len)?)
    }

    /// Decode a 4-byte unsigned field.
    pub fn u32(&self, field: Field) -> Result<u32> {
        debug_assert_eq!(field.len, 4);
        Ok(self.reader(field, self.order)?.read_u32()?)
    }

    /// Decode a 32-bit tag with an explicit byte order.
    pub fn tag_in(&self, field: Field, order: Endian) -> Result<i32> {
        debug_assert_eq!(field.kind, FieldKind::Tag);
        Ok(self.reader(field, order)?.read_i32()?)
    }

    /// Decode a 32-bit tag.
    pub fn tag(&self, field: Field) -> Result<i32> {
        self.tag_in(field, self.order)
    }

    /// Decode a fixed-width string, trimmed at its first null byte.
    pub fn string(&self, field: Field) -> Result<String> {
        debug_assert_eq!(field.kind, FieldKind::Str);
        Ok(self.reader(field, self.order)?.read_string_in_buffer(field.len)?)
    }
}
