//! Attribute descriptor record: one per attribute, chained through `ADRnext`.

use std::io::{Read, Seek};

use crate::layout::{Field, Generation, Span};
use crate::records::{load_record, HeaderLayout, RecordContext};
use crate::source::CdfSource;
use crate::types::RecordType;
use crate::Result;

static V2_LAYOUT: AdrLayout = AdrLayout::new(Generation::V2);
static V3_LAYOUT: AdrLayout = AdrLayout::new(Generation::V3);

/// Field table of the ADR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdrLayout {
    pub header: HeaderLayout,
    pub adr_next: Field,
    pub agr_edr_head: Field,
    pub scope: Field,
    pub num: Field,
    pub ngr_entries: Field,
    pub max_gr_entry: Field,
    pub rfu_a: Field,
    pub az_edr_head: Field,
    pub nz_entries: Field,
    pub max_z_entry: Field,
    pub rfu_e: Field,
    pub name: Field,
    pub span: Span,
}

impl AdrLayout {
    /// Attribute name width in v2.x files.
    pub const V2_NAME_LEN: usize = 64;
    /// Attribute name width in v3.x files.
    pub const V3_NAME_LEN: usize = 256;

    pub const fn new(generation: Generation) -> Self {
        let header = HeaderLayout::new(generation);
        let adr_next = header.last().then_offset(generation);
        let agr_edr_head = adr_next.then_offset(generation);
        let scope = agr_edr_head.then_uint();
        let num = scope.then_uint();
        let ngr_entries = num.then_uint();
        let max_gr_entry = ngr_entries.then_uint();
        let rfu_a = max_gr_entry.then_reserved();
        let az_edr_head = rfu_a.then_offset(generation);
        let nz_entries = az_edr_head.then_uint();
        let max_z_entry = nz_entries.then_uint();
        let rfu_e = max_z_entry.then_reserved();
        let name =
            rfu_e.then_str(generation.string_width(Self::V2_NAME_LEN, Self::V3_NAME_LEN));
        let span = Span::covering(&[
            header.record_size,
            header.record_type,
            adr_next,
            agr_edr_head,
            scope,
            num,
            ngr_entries,
            max_gr_entry,
            az_edr_head,
            nz_entries,
            max_z_entry,
            name,
        ]);
        Self {
            header,
            adr_next,
            agr_edr_head,
            scope,
            num,
            ngr_entries,
            max_gr_entry,
            rfu_a,
            az_edr_head,
            nz_entries,
            max_z_entry,
            rfu_e,
            name,
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

/// Declared scope of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum AttributeScope {
    /// Applies to the whole file.
    Global,
    /// Applies to individual variables.
    Variable,
    /// Global, assumed by the library rather than declared.
    GlobalAssumed,
    /// Variable, assumed by the library rather than declared.
    VariableAssumed,
    /// Scope value not defined by the format.
    Unknown(u32),
}

impl AttributeScope {
    pub fn from_u32(value: u32) -> Self {
        match value {
            1 => Self::Global,
            2 => Self::Variable,
            3 => Self::GlobalAssumed,
            4 => Self::VariableAssumed,
            other => Self::Unknown(other),
        }
    }

    /// Whether the scope is global, declared or assumed.
    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global | Self::GlobalAssumed)
    }
}

/// A loaded attribute descriptor record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adr {
    pub record_size: u64,
    /// Offset of the next ADR in the chain.
    pub adr_next: u64,
    /// Head of the global/rEntry chain, 0 if empty.
    pub agr_edr_head: u64,
    pub scope: AttributeScope,
    /// Attribute number.
    pub num: u32,
    pub ngr_entries: u32,
    pub max_gr_entry: u32,
    /// Head of the zEntry chain, 0 if empty.
    pub az_edr_head: u64,
    pub nz_entries: u32,
    pub max_z_entry: u32,
    pub name: String,
}

impl Adr {
    /// Load the ADR found at `offset`.
    pub fn load<R: Read + Seek>(
        source: &mut CdfSource<R>,
        offset: u64,
        ctx: RecordContext,
    ) -> Result<Self> {
        let layout = AdrLayout::for_generation(ctx.generation);
        let (header, buf) = load_record(
            source,
            offset,
            layout.span,
            &layout.header,
            RecordType::Adr,
            ctx.order,
        )?;

        let adr = Self {
            record_size: header.record_size,
            adr_next: buf.uint(layout.adr_next)?,
            agr_edr_head: buf.uint(layout.agr_edr_head)?,
            scope: AttributeScope::from_u32(buf.u32(layout.scope)?),
            num: buf.u32(layout.num)?,
            ngr_entries: buf.u32(layout.ngr_entries)?,
            max_gr_entry: buf.u32(layout.max_gr_entry)?,
            az_edr_head: buf.uint(layout.az_edr_head)?,
            nz_entries: buf.u32(layout.nz_entries)?,
            max_z_entry: buf.u32(layout.max_z_entry)?,
            name: buf.string(layout.name)?,
        };
        tracing::debug!(
            offset,
            name = %adr.name,
            next = adr.adr_next,
            ngr_entries = adr.ngr_entries,
            nz_entries = adr.nz_entries,
            "loaded ADR"
        );
        Ok(adr)
    }
}
