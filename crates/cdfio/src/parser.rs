//! Top-level parse: magic pair, CDR, GDR, then the attribute chains.

use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

use tracing::{debug, warn};

use crate::attribute::{Attribute, AttributeAssembler, Attributes};
use crate::layout::Generation;
use crate::magic::MagicPair;
use crate::options::ParseOptions;
use crate::records::{Cdr, Gdr, RecordContext};
use crate::source::CdfSource;
use crate::types::Encoding;
use crate::{Error, Result};

/// File-level metadata gathered from the magic pair, CDR and GDR.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CdfInfo {
    pub magic: MagicPair,
    pub generation: Generation,
    /// Payloads are compressed (second magic word `0xCCCC0001`).
    pub compressed: bool,
    pub version: u32,
    pub release: u32,
    pub increment: u32,
    pub encoding: Encoding,
    pub flags: u32,
    pub copyright: String,
    pub nr_vars: u32,
    pub nz_vars: u32,
    pub num_attr: u32,
    pub r_num_dims: u32,
    pub r_max_rec: u32,
    pub rvdr_head: u64,
    pub zvdr_head: u64,
    pub adr_head: u64,
    pub uir_head: u64,
    pub eof: u64,
    /// YYYYMMDD of the last leap second known to the writer.
    pub leap_second_last_updated: u32,
}

impl CdfInfo {
    fn new(magic: MagicPair, cdr: Cdr, gdr: &Gdr) -> Self {
        Self {
            magic,
            generation: magic.generation(),
            compressed: magic.is_compressed(),
            version: cdr.version,
            release: cdr.release,
            increment: cdr.increment,
            encoding: cdr.encoding,
            flags: cdr.flags,
            copyright: cdr.copyright,
            nr_vars: gdr.nr_vars,
            nz_vars: gdr.nz_vars,
            num_attr: gdr.num_attr,
            r_num_dims: gdr.r_num_dims,
            r_max_rec: gdr.r_max_rec,
            rvdr_head: gdr.rvdr_head,
            zvdr_head: gdr.zvdr_head,
            adr_head: gdr.adr_head,
            uir_head: gdr.uir_head,
            eof: gdr.eof,
            leap_second_last_updated: gdr.leap_second_last_updated,
        }
    }

    /// `"3.9.0"` style version string.
    pub fn version_string(&self) -> String {
        format!("{}.{}.{}", self.version, self.release, self.increment)
    }

    pub fn is_row_major(&self) -> bool {
        self.flags & Cdr::ROW_MAJOR != 0
    }

    pub fn is_single_file(&self) -> bool {
        self.flags & Cdr::SINGLE_FILE != 0
    }
}

/// A parsed CDF file.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Cdf {
    info: CdfInfo,
    attributes: Attributes,
}

/// Everything needed before the attribute walk starts.
struct Descriptors {
    info: CdfInfo,
    gdr: Gdr,
    assembler: AttributeAssembler,
}

fn read_descriptors<R: Read + Seek>(
    source: &mut CdfSource<R>,
    options: &ParseOptions,
) -> Result<Descriptors> {
    let magic = MagicPair::read(source)?;
    if !magic.is_cdf() {
        return Err(Error::NotCdf {
            first: magic.first,
            second: magic.second,
        });
    }
    let generation = magic.generation();
    debug!(
        first = magic.first,
        %generation,
        compressed = magic.is_compressed(),
        "magic checked"
    );

    let cdr = Cdr::load(source, generation, options.descriptor_order)?;
    let ctx = RecordContext::new(generation, options.descriptor_order.resolve(cdr.encoding));
    let gdr = Gdr::load(source, cdr.gdr_offset, ctx)?;

    let assembler = AttributeAssembler {
        ctx,
        value_order: options.value_order.resolve(cdr.encoding),
        strict: options.strict_chains,
    };
    Ok(Descriptors {
        info: CdfInfo::new(magic, cdr, &gdr),
        gdr,
        assembler,
    })
}

impl Cdf {
    /// Parse a CDF from a seekable stream with default options.
    pub fn parse<R: Read + Seek>(reader: R) -> Result<Self> {
        Self::parse_with(reader, ParseOptions::default())
    }

    /// Parse a CDF from a seekable stream.
    ///
    /// Any failure aborts the whole parse; no partial attribute map is returned.
    pub fn parse_with<R: Read + Seek>(reader: R, options: ParseOptions) -> Result<Self> {
        let mut source = CdfSource::new(reader)?;
        let Descriptors {
            info,
            gdr,
            assembler,
        } = read_descriptors(&mut source, &options)?;

        let attributes = assembler.load_all(&mut source, &gdr)?;
        debug!(count = attributes.len(), "attributes loaded");
        Ok(Self { info, attributes })
    }

    /// Parse a CDF held in memory.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::parse(Cursor::new(data))
    }

    /// Open and parse the CDF at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, ParseOptions::default())
    }

    pub fn open_with<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let file = File::open(path)?;
        Self::parse_with(BufReader::new(file), options)
    }

    pub fn info(&self) -> &CdfInfo {
        &self.info
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    pub fn into_attributes(self) -> Attributes {
        self.attributes
    }

    /// Whether variable payloads need the decompression codecs in [`crate::compress`].
    pub fn is_compressed(&self) -> bool {
        self.info.compressed
    }
}

/// Parse an in-memory CDF, assembling attributes on the rayon pool.
///
/// The ADR chain is walked first; each attribute's entry chain then reads
/// through its own cursor over `data`.
#[cfg(feature = "parallel")]
pub fn parse_bytes_parallel(data: &[u8], options: ParseOptions) -> Result<Cdf> {
    let mut source = CdfSource::new(Cursor::new(data))?;
    let Descriptors {
        info,
        gdr,
        assembler,
    } = read_descriptors(&mut source, &options)?;

    let attributes = assembler.load_all_parallel(&mut source, data, &gdr)?;
    debug!(count = attributes.len(), "attributes loaded in parallel");
    Ok(Cdf { info, attributes })
}

/// Load the CDF at `path`, or `None` when it is missing or does not parse.
///
/// The failure reason is logged at `warn` level.
pub fn load<P: AsRef<Path>>(path: P) -> Option<Cdf> {
    let path = path.as_ref();
    if !path.exists() {
        warn!(path = %path.display(), "CDF file not found");
        return None;
    }
    match Cdf::open(path) {
        Ok(cdf) => Some(cdf),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to load CDF");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use cdfio_common::Endian;

    use super::*;
    use crate::options::{DescriptorOrder, ValueOrder};
    use crate::records::AttributeScope;
    use crate::testing::{TestAttr, TestEntry, Fixture};
    use crate::types::RecordType;
    use crate::values::Values;

    fn int4_file(encoding: Encoding, order: Endian) -> Fixture {
        let mut fixture = Fixture::new(Generation::V3, encoding, order);
        fixture.cdr("Common Data Format (CDF)");
        fixture.attributes(&[TestAttr::variable("FIELDNAM").with_variable(TestEntry::int4(&[1, 2, 3]))]);
        fixture
    }

    #[test]
    fn test_rejects_non_cdf_magic() {
        for (first, second) in [
            (0xCDF3_0001, 0x1234_5678),
            (0xCDF2_6002, 0x0000_0000),
            (0xCAF3_0001, MagicPair::UNCOMPRESSED),
            (0x0000_0000, MagicPair::COMPRESSED),
        ] {
            for generation in [Generation::V2, Generation::V3] {
                let mut fixture = Fixture::with_magic(
                    first,
                    second,
                    generation,
                    Encoding::Network,
                    Endian::Big,
                );
                fixture.cdr("");
                fixture.attributes(&[]);
                assert!(matches!(
                    Cdf::from_bytes(fixture.bytes()),
                    Err(Error::NotCdf { .. })
                ));
            }
        }
    }

    #[test]
    fn test_rejects_short_input() {
        assert!(matches!(
            Cdf::from_bytes(&[0xCD, 0xF3]),
            Err(Error::Truncated { offset: 0, len: 8, .. })
        ));
        assert!(Cdf::from_bytes(&[]).is_err());
    }

    #[test]
    fn test_minimal_v3_has_no_attributes() {
        let mut fixture = Fixture::new(Generation::V3, Encoding::IbmPc, Endian::Little);
        fixture.cdr("Common Data Format (CDF)");
        fixture.attributes(&[]);

        let cdf = Cdf::from_bytes(fixture.bytes()).unwrap();
        assert!(cdf.attributes().is_empty());

        let info = cdf.info();
        assert_eq!(info.generation, Generation::V3);
        assert_eq!(info.num_attr, 0);
        assert_eq!(info.version_string(), "3.9.0");
        assert_eq!(info.copyright, "Common Data Format (CDF)");
        assert_eq!(info.leap_second_last_updated, 20170101);
        assert!(info.is_single_file());
        assert!(!info.is_row_major());
        assert!(!cdf.is_compressed());
    }

    #[test]
    fn test_values_little_endian_despite_declared_encoding() {
        let fixture = int4_file(Encoding::Network, Endian::Big);

        let cdf = Cdf::from_bytes(fixture.bytes()).unwrap();
        let attribute = cdf.attribute("FIELDNAM").unwrap();
        assert_eq!(attribute.name, "FIELDNAM");
        assert_eq!(attribute.scope, AttributeScope::Variable);
        assert_eq!(attribute.values, Some(Values::Int32(vec![1, 2, 3])));
    }

    #[test]
    fn test_declared_value_order() {
        let fixture = int4_file(Encoding::Network, Endian::Big);
        let options = ParseOptions::default().with_value_order(ValueOrder::Declared);

        // Little-endian payload bytes reinterpreted as the declared big-endian order.
        let cdf = Cdf::parse_with(Cursor::new(fixture.bytes()), options).unwrap();
        assert_eq!(
            cdf.attribute("FIELDNAM").unwrap().values,
            Some(Values::Int32(vec![1 << 24, 2 << 24, 3 << 24]))
        );
    }

    #[test]
    fn test_network_descriptor_order() {
        // IBM PC file whose descriptors were written big-endian.
        let fixture = int4_file(Encoding::IbmPc, Endian::Big);
        let options = ParseOptions::default().with_descriptor_order(DescriptorOrder::Network);

        let cdf = Cdf::parse_with(Cursor::new(fixture.bytes()), options).unwrap();
        assert_eq!(cdf.info().encoding, Encoding::IbmPc);
        assert_eq!(
            cdf.attribute("FIELDNAM").unwrap().values,
            Some(Values::Int32(vec![1, 2, 3]))
        );
    }

    #[test]
    fn test_v2_file() {
        let mut fixture = Fixture::new(Generation::V2, Encoding::IbmPc, Endian::Little);
        fixture.cdr("");
        fixture.attributes(&[
            TestAttr::global("Project").with_global(TestEntry::chars("ISTP>Solar-Terrestrial Physics")),
            TestAttr::variable("CATDESC"),
        ]);

        let cdf = Cdf::from_bytes(fixture.bytes()).unwrap();
        assert_eq!(cdf.info().generation, Generation::V2);
        assert_eq!(cdf.attributes().len(), 2);
        assert_eq!(
            cdf.attribute("Project").and_then(|a| a.values.as_ref()).and_then(Values::as_str),
            Some("ISTP>Solar-Terrestrial Physics")
        );
        assert_eq!(cdf.attribute("CATDESC").unwrap().values, None);
    }

    #[test]
    fn test_parse_is_idempotent() {
        let fixture = int4_file(Encoding::IbmPc, Endian::Little);
        let first = Cdf::from_bytes(fixture.bytes()).unwrap();
        let second = Cdf::from_bytes(fixture.bytes()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_generation_follows_magic_only() {
        let mut empty = Fixture::new(Generation::V3, Encoding::IbmPc, Endian::Little);
        empty.cdr("");
        empty.attributes(&[]);
        let full = int4_file(Encoding::IbmPc, Endian::Little);

        let a = Cdf::from_bytes(empty.bytes()).unwrap();
        let b = Cdf::from_bytes(full.bytes()).unwrap();
        assert_eq!(a.info().magic, b.info().magic);
        assert_eq!(a.info().generation, b.info().generation);
    }

    #[test]
    fn test_compressed_flag_does_not_gate_attributes() {
        let mut fixture = Fixture::with_magic(
            0xCDF3_0001,
            MagicPair::COMPRESSED,
            Generation::V3,
            Encoding::IbmPc,
            Endian::Little,
        );
        fixture.cdr("");
        fixture.attributes(&[TestAttr::global("TITLE").with_global(TestEntry::chars("x"))]);

        let cdf = Cdf::from_bytes(fixture.bytes()).unwrap();
        assert!(cdf.is_compressed());
        assert_eq!(cdf.attributes().len(), 1);
    }

    #[test]
    fn test_gdr_offset_pointing_at_cdr() {
        let mut fixture = Fixture::new(Generation::V3, Encoding::Network, Endian::Big);
        let cdr = fixture.cdr("");
        fixture.attributes(&[]);
        fixture.link(cdr + 12, Cdr::OFFSET);

        assert!(matches!(
            Cdf::from_bytes(fixture.bytes()),
            Err(Error::RecordTypeMismatch {
                offset: 8,
                expected: RecordType::Gdr,
                actual: RecordType::Cdr,
            })
        ));
    }

    #[test]
    fn test_load_from_path() {
        let fixture = int4_file(Encoding::IbmPc, Endian::Little);
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(fixture.bytes()).unwrap();
        file.flush().unwrap();

        let cdf = load(file.path()).unwrap();
        assert_eq!(cdf.attributes().len(), 1);
        assert_eq!(Cdf::open(file.path()).unwrap(), cdf);
    }

    #[test]
    fn test_load_failures_are_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(dir.path().join("missing.cdf")).is_none());

        let path = dir.path().join("text.cdf");
        std::fs::write(&path, b"this is not a CDF file").unwrap();
        assert!(load(&path).is_none());
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_parse_matches() {
        let mut fixture = Fixture::new(Generation::V3, Encoding::IbmPc, Endian::Little);
        fixture.cdr("");
        fixture.attributes(&[
            TestAttr::global("a").with_global(TestEntry::int4(&[7])),
            TestAttr::variable("b").with_variable(TestEntry::chars("units")),
        ]);

        let sequential = Cdf::from_bytes(fixture.bytes()).unwrap();
        let parallel = parse_bytes_parallel(fixture.bytes(), ParseOptions::default()).unwrap();
        assert_eq!(sequential, parallel);
    }
}
