//! Global descriptor record: chain heads and global counts.

use std::io::{Read, Seek};

use crate::layout::{Field, Generation, Span};
use crate::records::{load_record, HeaderLayout, RecordContext};
use crate::source::CdfSource;
use crate::types::RecordType;
use crate::Result;

static V2_LAYOUT: GdrLayout = GdrLayout::new(Generation::V2);
static V3_LAYOUT: GdrLayout = GdrLayout::new(Generation::V3);

/// Field table of the GDR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GdrLayout {
    pub header: HeaderLayout,
    pub rvdr_head: Field,
    pub zvdr_head: Field,
    pub adr_head: Field,
    pub eof: Field,
    pub nr_vars: Field,
    pub num_attr: Field,
    pub r_max_rec: Field,
    pub r_num_dims: Field,
    pub nz_vars: Field,
    pub uir_head: Field,
    pub rfu_c: Field,
    pub leap_second_last_updated: Field,
    pub rfu_e: Field,
    pub span: Span,
}

impl GdrLayout {
    pub const fn new(generation: Generation) -> Self {
        let header = HeaderLayout::new(generation);
        let rvdr_head = header.last().then_offset(generation);
        let zvdr_head = rvdr_head.then_offset(generation);
        let adr_head = zvdr_head.then_offset(generation);
        let eof = adr_head.then_offset(generation);
        let nr_vars = eof.then_uint();
        let num_attr = nr_vars.then_uint();
        let r_max_rec = num_attr.then_uint();
        let r_num_dims = r_max_rec.then_uint();
        let nz_vars = r_num_dims.then_uint();
        let uir_head = nz_vars.then_offset(generation);
        let rfu_c = uir_head.then_reserved();
        let leap_second_last_updated = rfu_c.then_uint();
        let rfu_e = leap_second_last_updated.then_reserved();
        let span = Span::covering(&[
            header.record_size,
            header.record_type,
            rvdr_head,
            zvdr_head,
            adr_head,
            eof,
            nr_vars,
            num_attr,
            r_max_rec,
            r_num_dims,
            nz_vars,
            uir_head,
            leap_second_last_updated,
        ]);
        Self {
            header,
            rvdr_head,
            zvdr_head,
            adr_head,
            eof,
            nr_vars,
            num_attr,
            r_max_rec,
            r_num_dims,
            nz_vars,
            uir_head,
            rfu_c,
            leap_second_last_updated,
            rfu_e,
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

/// A loaded global descriptor record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gdr {
    pub record_size: u64,
    /// Head of the rVariable descriptor chain.
    pub rvdr_head: u64,
    /// Head of the zVariable descriptor chain.
    pub zvdr_head: u64,
    /// Head of the attribute descriptor chain.
    pub adr_head: u64,
    /// End of file offset.
    pub eof: u64,
    pub nr_vars: u32,
    pub num_attr: u32,
    pub r_max_rec: u32,
    pub r_num_dims: u32,
    pub nz_vars: u32,
    pub uir_head: u64,
    /// Date of the last leap second table entry, as YYYYMMDD.
    pub leap_second_last_updated: u32,
}

impl Gdr {
    /// Load the GDR found at `offset` (from `Cdr::gdr_offset`).
    pub fn load<R: Read + Seek>(
        source: &mut CdfSource<R>,
        offset: u64,
        ctx: RecordContext,
    ) -> Result<Self> {
        let layout = GdrLayout::for_generation(ctx.generation);
        let (header, buf) = load_record(
            source,
            offset,
            layout.span,
            &layout.header,
            RecordType::Gdr,
            ctx.order,
        )?;

        let gdr = Self {
            record_size: header.record_size,
            rvdr_head: buf.uint(layout.rvdr_head)?,
            zvdr_head: buf.uint(layout.zvdr_head)?,
            adr_head: buf.uint(layout.adr_head)?,
            eof: buf.uint(layout.eof)?,
            nr_vars: buf.u32(layout.nr_vars)?,
            num_attr: buf.u32(layout.num_attr)?,
            r_max_rec: buf.u32(layout.r_max_rec)?,
            r_num_dims: buf.u32(layout.r_num_dims)?,
            nz_vars: buf.u32(layout.nz_vars)?,
            uir_head: buf.uint(layout.uir_head)?,
            leap_second_last_updated: buf.u32(layout.leap_second_last_updated)?,
        };
        tracing::debug!(
            offset,
            adr_head = gdr.adr_head,
            num_attr = gdr.num_attr,
            nr_vars = gdr.nr_vars,
            nz_vars = gdr.nz_vars,
            "loaded GDR"
        );
        Ok(gdr)
    }
}

#[cfg(test)]
mod tests {
    use cdfio_common::Endian;

    use super::*;
    use crate::testing::Fixture;
    use crate::types::Encoding;
    use crate::Error;

    #[test]
    fn test_v3_offsets() {
        let layout = GdrLayout::for_generation(Generation::V3);
        assert_eq!(layout.adr_head.offset, 28);
        assert_eq!(layout.nr_vars.offset, 44);
        assert_eq!(layout.num_attr.offset, 48);
        assert_eq!(layout.uir_head.offset, 64);
        assert_eq!(layout.leap_second_last_updated.offset, 76);
        assert_eq!(layout.span.end, 80);
    }

    #[test]
    fn test_v2_offsets() {
        let layout = GdrLayout::for_generation(Generation::V2);
        assert_eq!(layout.adr_head.offset, 16);
        assert_eq!(layout.num_attr.offset, 28);
        assert_eq!(layout.uir_head.offset, 44);
        assert_eq!(layout.span.end, 56);
    }

    #[test]
    fn test_load_at_offset() {
        let mut fixture = Fixture::new(Generation::V3, Encoding::Network, Endian::Big);
        fixture.cdr("");
        let gdr = fixture.gdr(0xABCD, 7);
        let mut source = fixture.source();

        let loaded = Gdr::load(&mut source, gdr, RecordContext::new(Generation::V3, Endian::Big))
            .unwrap();
        assert_eq!(loaded.adr_head, 0xABCD);
        assert_eq!(loaded.num_attr, 7);
        assert_eq!(loaded.leap_second_last_updated, 20170101);
    }

    #[test]
    fn test_load_past_end() {
        let mut fixture = Fixture::new(Generation::V2, Encoding::Network, Endian::Big);
        fixture.cdr("");
        let mut source = fixture.source();
        let ctx = RecordContext::new(Generation::V2, Endian::Big);

        assert!(matches!(
            Gdr::load(&mut source, 10_000, ctx),
            Err(Error::Truncated { offset: 10_000, .. })
        ));
    }
}
