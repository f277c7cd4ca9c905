//! Descriptor record readers.
//!
//! Each record kind declares its field table once per [`Generation`] and is
//! loaded with a single read covering its header and every decoded field,
//! then decoded field by field from that buffer.

mod adr;
mod aedr;
mod cdr;
mod gdr;
mod header;

use std::io::{Read, Seek};

use cdfio_common::Endian;

use crate::layout::{FieldBuf, Generation, Span};
use crate::source::CdfSource;
use crate::types::RecordType;
use crate::Result;

pub use adr::{Adr, AdrLayout, AttributeScope};
pub use aedr::{Aedr, AedrLayout, AedrLink, EntryChain};
pub use cdr::{Cdr, CdrLayout};
pub use gdr::{Gdr, GdrLayout};
pub use header::{HeaderLayout, RecordHeader};

/// Decoding settings fixed for a whole file once its CDR is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordContext {
    /// Layout generation from the magic number.
    pub generation: Generation,
    /// Byte order of descriptor-record fields.
    pub order: Endian,
}

impl RecordContext {
    pub fn new(generation: Generation, order: Endian) -> Self {
        Self { generation, order }
    }
}

/// Read `span` of the record at `offset` and validate its header.
fn load_record<R: Read + Seek>(
    source: &mut CdfSource<R>,
    offset: u64,
    span: Span,
    header: &HeaderLayout,
    expected: RecordType,
    order: Endian,
) -> Result<(RecordHeader, FieldBuf)> {
    let buf = source.read_span(offset, span, order)?;
    let header = RecordHeader::decode(&buf, header, order, expected, offset)?;
    Ok((header, buf))
}
