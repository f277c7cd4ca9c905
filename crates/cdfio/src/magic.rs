//! The magic pair at the start of every CDF file.

use std::io::{Read, Seek};

use cdfio_common::BinaryReader;
use zerocopy::byteorder::{BigEndian, U32};
use zerocopy::{FromBytes, Immutable, KnownLayout};

use crate::layout::Generation;
use crate::source::CdfSource;
use crate::Result;

/// On-disk form of the magic pair (always big-endian).
#[derive(Debug, Clone, Copy, FromBytes, Immutable, KnownLayout)]
#[repr(C)]
struct RawMagic {
    first: U32<BigEndian>,
    second: U32<BigEndian>,
}

/// The two magic words found at file offset 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MagicPair {
    pub first: u32,
    pub second: u32,
}

impl MagicPair {
    /// Size of the magic pair in bytes.
    pub const LEN: usize = 8;

    /// Mask selecting the CDF signature bits of the first word.
    pub const SIGNATURE_MASK: u32 = 0xFFF0_0000;

    /// Expected signature bits of the first word.
    pub const SIGNATURE: u32 = 0xCDF0_0000;

    /// Second word of a file whose contents are compressed.
    pub const COMPRESSED: u32 = 0xCCCC_0001;

    /// Second word of an uncompressed file.
    pub const UNCOMPRESSED: u32 = 0x0000_FFFF;

    pub fn new(first: u32, second: u32) -> Self {
        Self { first, second }
    }

    /// Decode the pair from the first 8 bytes of `data`.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let raw: RawMagic = BinaryReader::new(data).read_struct()?;
        Ok(Self::new(raw.first.get(), raw.second.get()))
    }

    /// Read the pair from the start of a stream.
    pub fn read<R: Read + Seek>(source: &mut CdfSource<R>) -> Result<Self> {
        let bytes = source.read_at(0, Self::LEN)?;
        Self::from_bytes(&bytes)
    }

    /// Whether the pair identifies a CDF file.
    pub fn is_cdf(&self) -> bool {
        self.first & Self::SIGNATURE_MASK == Self::SIGNATURE
            && (self.second == Self::COMPRESSED || self.second == Self::UNCOMPRESSED)
    }

    /// Whether the file payload is compressed.
    pub fn is_compressed(&self) -> bool {
        self.second == Self::COMPRESSED
    }

    /// Layout generation encoded in the version bits of the first word.
    pub fn generation(&self) -> Generation {
        if (self.first >> 12) & 0xFF >= 0x30 {
            Generation::V3
        } else {
            Generation::V2
        }
    }
}
