//! The size + type prefix shared by every descriptor record.

use cdfio_common::Endian;

use crate::layout::{Field, FieldBuf, FieldKind, Generation};
use crate::types::RecordType;
use crate::{Error, Result};

/// Field layout of a record header: 8 bytes in v2.x, 12 in v3.x.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderLayout {
    pub record_size: Field,
    pub record_type: Field,
}

impl HeaderLayout {
    pub const fn new(generation: Generation) -> Self {
        let record_size = Field::first(generation.offset_width(), FieldKind::Offset);
        let record_type = record_size.then_tag();
        Self {
            record_size,
            record_type,
        }
    }

    /// Width of the header in bytes.
    pub const fn len(&self) -> usize {
        self.record_type.end()
    }

    /// Last header field; record-specific fields follow it.
    pub const fn last(&self) -> Field {
        self.record_type
    }
}

/// A decoded record header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    pub record_size: u64,
    pub record_type: RecordType,
}

impl RecordHeader {
    /// Decode the header from `buf` and check its tag.
    ///
    /// `offset` is the record's file offset, used for error reporting.
    pub fn decode(
        buf: &FieldBuf,
        layout: &HeaderLayout,
        order: Endian,
        expected: RecordType,
        offset: u64,
    ) -> Result<Self> {
        let tag = buf.tag_in(layout.record_type, order)?;
        let record_type =
            RecordType::from_i32(tag).ok_or(Error::UnknownRecordType { offset, tag })?;
        if record_type != expected {
            return Err(Error::RecordTypeMismatch {
                offset,
                expected,
                actual: record_type,
            });
        }
        Ok(Self {
            record_size: buf.uint_in(layout.record_size, order)?,
            record_type,
        })
    }
}
