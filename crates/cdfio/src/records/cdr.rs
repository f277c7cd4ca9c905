//! CDF descriptor record: file-level metadata at offset 8.

use std::io::{Read, Seek};

use cdfio_common::Endian;

use crate::layout::{Field, Generation, Span};
use crate::options::DescriptorOrder;
use crate::records::{load_record, HeaderLayout};
use crate::source::CdfSource;
use crate::types::{Encoding, RecordType};
use crate::{Error, Result};

/// Byte order of the CDR header and `Encoding` word, read before the
/// declared encoding is known.
const BOOTSTRAP_ORDER: Endian = Endian::Big;

static V2_LAYOUT: CdrLayout = CdrLayout::new(Generation::V2);
static V3_LAYOUT: CdrLayout = CdrLayout::new(Generation::V3);

/// Field table of the CDR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CdrLayout {
    pub header: HeaderLayout,
    pub gdr_offset: Field,
    pub version: Field,
    pub release: Field,
    pub encoding: Field,
    pub flags: Field,
    pub rfu_a: Field,
    pub rfu_b: Field,
    pub increment: Field,
    pub identifier: Field,
    pub rfu_e: Field,
    pub copyright: Field,
    pub span: Span,
}

impl CdrLayout {
    /// Width of the copyright notice (formats from 2.6 on).
    pub const COPYRIGHT_LEN: usize = 256;

    pub const fn new(generation: Generation) -> Self {
        let header = HeaderLayout::new(generation);
        let gdr_offset = header.last().then_offset(generation);
        let version = gdr_offset.then_uint();
        let release = version.then_uint();
        let encoding = release.then_tag();
        let flags = encoding.then_uint();
        let rfu_a = flags.then_reserved();
        let rfu_b = rfu_a.then_reserved();
        let increment = rfu_b.then_uint();
        let identifier = increment.then_uint();
        let rfu_e = identifier.then_reserved();
        let copyright = rfu_e.then_str(Self::COPYRIGHT_LEN);
        let span = Span::covering(&[
            header.record_size,
            header.record_type,
            gdr_offset,
            version,
            release,
            encoding,
            flags,
            increment,
            identifier,
            copyright,
        ]);
        Self {
            header,
            gdr_offset,
            version,
            release,
            encoding,
            flags,
            rfu_a,
            rfu_b,
            increment,
            identifier,
            rfu_e,
            copyright,
            span,
        }
    }

    pub fn for_generation(generation: Generation) -> &'static Self {
        match generation {
            Generation::V2 => &V2_LAYOUT,
            Generation::V3 => &V3_LAYOUT,
        }
    }
}

/// A loaded CDF descriptor record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cdr {
    pub record_size: u64,
    pub gdr_offset: u64,
    pub version: u32,
    pub release: u32,
    pub encoding: Encoding,
    pub flags: u32,
    pub increment: u32,
    pub identifier: u32,
    pub copyright: String,
}

impl Cdr {
    /// Fixed file offset of the CDR, right after the magic pair.
    pub const OFFSET: u64 = 8;

    /// `Flags` bit: variable values are stored row-major.
    pub const ROW_MAJOR: u32 = 0x1;

    /// `Flags` bit: all data lives in the one `.cdf` file.
    pub const SINGLE_FILE: u32 = 0x2;

    /// Load the CDR.
    ///
    /// The header and `Encoding` are decoded in network order; the remaining
    /// fields in the order `policy` picks for the declared encoding.
    pub fn load<R: Read + Seek>(
        source: &mut CdfSource<R>,
        generation: Generation,
        policy: DescriptorOrder,
    ) -> Result<Self> {
        let layout = CdrLayout::for_generation(generation);
        let (header, buf) = load_record(
            source,
            Self::OFFSET,
            layout.span,
            &layout.header,
            RecordType::Cdr,
            BOOTSTRAP_ORDER,
        )?;

        let tag = buf.tag_in(layout.encoding, BOOTSTRAP_ORDER)? as u32;
        let encoding = Encoding::from_u32(tag).ok_or(Error::UnknownEncoding(tag))?;
        let buf = buf.with_order(policy.resolve(encoding));

        let cdr = Self {
            record_size: header.record_size,
            gdr_offset: buf.uint(layout.gdr_offset)?,
            version: buf.u32(layout.version)?,
            release: buf.u32(layout.release)?,
            encoding,
            flags: buf.u32(layout.flags)?,
            increment: buf.u32(layout.increment)?,
            identifier: buf.u32(layout.identifier)?,
            copyright: buf.string(layout.copyright)?,
        };
        tracing::debug!(
            gdr_offset = cdr.gdr_offset,
            version = cdr.version,
            release = cdr.release,
            encoding = ?cdr.encoding,
            "loaded CDR"
        );
        Ok(cdr)
    }

    pub fn is_row_major(&self) -> bool {
        self.flags & Self::ROW_MAJOR != 0
    }

    /// Whether the CDF is a single file (as opposed to multi-file).
    pub fn is_single_file(&self) -> bool {
        self.flags & Self::SINGLE_FILE != 0
    }
}
