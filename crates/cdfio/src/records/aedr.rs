//! Attribute entry descriptor record: one per attribute entry.

use std::io::{Read, Seek};

use crate::layout::{Field, Generation, Span};
use crate::records::{load_record, HeaderLayout, RecordContext};
use crate::source::CdfSource;
use crate::types::{DataType, RecordType};
use crate::{Error, Result};

static V2_LAYOUT: AedrLayout = AedrLayout::new(Generation::V2);
static V3_LAYOUT: AedrLayout = AedrLayout::new(Generation::V3);

/// Field table of the AEDR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AedrLayout {
    pub header: HeaderLayout,
    pub aedr_next: Field,
    pub attr_num: Field,
    pub data_type: Field,
    pub num: Field,
    pub num_elements: Field,
    pub num_strings: Field,
    pub rfu_b: Field,
    pub rfu_c: Field,
    pub rfu_d: Field,
    pub rfu_e: Field,
    /// Offset from the record start where the value payload begins.
    pub values: usize,
    pub span: Span,
    /// Fields read to continue a chain: `AEDRnext` through `NumElements`.
    pub link_span: Span,
}

impl AedrLayout {
    pub const fn new(generation: Generation) -> Self {
        let header = HeaderLayout::new(generation);
        let aedr_next = header.last().then_offset(generation);
        let attr_num = aedr_next.then_uint();
        let data_type = attr_num.then_tag();
        let num = data_type.then_uint();
        let num_elements = num.then_uint();
        let num_strings = num_elements.then_uint();
        let rfu_b = num_strings.then_reserved();
        let rfu_c = rfu_b.then_reserved();
        let rfu_d = rfu_c.then_reserved();
        let rfu_e = rfu_d.then_reserved();
        let span = Span::covering(&[
            header.record_size,
            header.record_type,
            aedr_next,
            attr_num,
            data_type,
            num,
            num_elements,
            num_strings,
        ]);
        Self {
            header,
            aedr_next,
            attr_num,
            data_type,
            num,
            num_elements,
            num_strings,
            rfu_b,
            rfu_c,
            rfu_d,
            rfu_e,
            values: rfu_e.end(),
            span,
            link_span: Span::covering(&[aedr_next, num_elements]),
        }
    }

    pub fn for_generation(generation: Generation) -> &'static Self {
        match generation {
            Generation::V2 => &V2_LAYOUT,
            Generation::V3 => &V3_LAYOUT,
        }
    }
}

/// Which entry chain of an ADR a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryChain {
    /// Global / rVariable entries (`AgrEDRhead`).
    Global,
    /// zVariable entries (`AzEDRhead`).
    Variable,
}

impl EntryChain {
    /// Record tag expected for entries of this chain.
    pub fn record_type(&self) -> RecordType {
        match self {
            Self::Global => RecordType::AgrEdr,
            Self::Variable => RecordType::AzEdr,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Global => "AgrEDR",
            Self::Variable => "AzEDR",
        }
    }
}

/// A loaded attribute entry descriptor record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aedr {
    pub record_size: u64,
    pub record_type: RecordType,
    /// Offset of the next AEDR in the chain.
    pub aedr_next: u64,
    /// Number of the owning attribute.
    pub attr_num: u32,
    pub data_type: DataType,
    /// Entry number (variable number for variable entries).
    pub num: u32,
    pub num_elements: u32,
    pub num_strings: u32,
}

impl Aedr {
    /// Load the AEDR found at `offset` in the given chain.
    pub fn load<R: Read + Seek>(
        source: &mut CdfSource<R>,
        offset: u64,
        chain: EntryChain,
        ctx: RecordContext,
    ) -> Result<Self> {
        let layout = AedrLayout::for_generation(ctx.generation);
        let (header, buf) = load_record(
            source,
            offset,
            layout.span,
            &layout.header,
            chain.record_type(),
            ctx.order,
        )?;

        let data_type = buf.tag(layout.data_type)? as u32;
        let aedr = Self {
            record_size: header.record_size,
            record_type: header.record_type,
            aedr_next: buf.uint(layout.aedr_next)?,
            attr_num: buf.u32(layout.attr_num)?,
            data_type: DataType::from_u32(data_type).ok_or(Error::UnknownDataType(data_type))?,
            num: buf.u32(layout.num)?,
            num_elements: buf.u32(layout.num_elements)?,
            num_strings: buf.u32(layout.num_strings)?,
        };
        tracing::debug!(
            offset,
            chain = chain.as_str(),
            data_type = %aedr.data_type,
            num_elements = aedr.num_elements,
            next = aedr.aedr_next,
            "loaded AEDR"
        );
        Ok(aedr)
    }
}

/// The two fields needed to keep walking an entry chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AedrLink {
    pub aedr_next: u64,
    pub num_elements: u32,
}

impl AedrLink {
    /// Read `AEDRnext` and `NumElements` of the AEDR at `offset`, without
    /// loading or validating the rest of the record.
    pub fn load<R: Read + Seek>(
        source: &mut CdfSource<R>,
        offset: u64,
        ctx: RecordContext,
    ) -> Result<Self> {
        let layout = AedrLayout::for_generation(ctx.generation);
        let buf = source.read_span(offset, layout.link_span, ctx.order)?;
        Ok(Self {
            aedr_next: buf.uint(layout.aedr_next)?,
            num_elements: buf.u32(layout.num_elements)?,
        })
    }
}
