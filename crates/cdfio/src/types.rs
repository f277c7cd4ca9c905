//! Tag enumerations stored in CDF descriptor records.

use cdfio_common::Endian;

/// Descriptor record kinds.
///
/// The values are the tags written in the `RecordType` word of every record header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum RecordType {
    /// CDF descriptor record.
    Cdr = 1,
    /// Global descriptor record.
    Gdr = 2,
    /// rVariable descriptor record.
    RVdr = 3,
    /// Attribute descriptor record.
    Adr = 4,
    /// Attribute entry descriptor record (global / rEntry).
    AgrEdr = 5,
    /// Variable index record.
    Vxr = 6,
    /// Variable values record.
    Vvr = 7,
    /// zVariable descriptor record.
    ZVdr = 8,
    /// Attribute entry descriptor record (zEntry).
    AzEdr = 9,
    /// Compressed CDF record.
    Ccr = 10,
    /// Compression parameters record.
    Cpr = 11,
    /// Sparseness parameters record.
    Spr = 12,
    /// Compressed variable values record.
    Cvvr = 13,
    /// Unused internal record.
    Uir = -1,
}

impl RecordType {
    /// Parse from the raw tag.
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            1 => Some(Self::Cdr),
            2 => Some(Self::Gdr),
            3 => Some(Self::RVdr),
            4 => Some(Self::Adr),
            5 => Some(Self::AgrEdr),
            6 => Some(Self::Vxr),
            7 => Some(Self::Vvr),
            8 => Some(Self::ZVdr),
            9 => Some(Self::AzEdr),
            10 => Some(Self::Ccr),
            11 => Some(Self::Cpr),
            12 => Some(Self::Spr),
            13 => Some(Self::Cvvr),
            -1 => Some(Self::Uir),
            _ => None,
        }
    }
}

/// Platform encoding declared in the CDR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u32)]
pub enum Encoding {
    Network = 1,
    Sun = 2,
    Vax = 3,
    DecStation = 4,
    Sgi = 5,
    IbmPc = 6,
    IbmRs = 7,
    Host = 8,
    Ppc = 9,
    Hp = 11,
    NeXT = 12,
    AlphaOsf1 = 13,
    AlphaVmsD = 14,
    AlphaVmsG = 15,
    AlphaVmsI = 16,
    ArmLittle = 17,
    ArmBig = 18,
}

impl Encoding {
    /// Parse from the raw tag.
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            1 => Some(Self::Network),
            2 => Some(Self::Sun),
            3 => Some(Self::Vax),
            4 => Some(Self::DecStation),
            5 => Some(Self::Sgi),
            6 => Some(Self::IbmPc),
            7 => Some(Self::IbmRs),
            8 => Some(Self::Host),
            9 => Some(Self::Ppc),
            11 => Some(Self::Hp),
            12 => Some(Self::NeXT),
            13 => Some(Self::AlphaOsf1),
            14 => Some(Self::AlphaVmsD),
            15 => Some(Self::AlphaVmsG),
            16 => Some(Self::AlphaVmsI),
            17 => Some(Self::ArmLittle),
            18 => Some(Self::ArmBig),
            _ => None,
        }
    }

    /// Whether data written with this encoding is big-endian.
    pub fn is_big_endian(&self) -> bool {
        matches!(
            self,
            Self::Network
                | Self::Sun
                | Self::NeXT
                | Self::Ppc
                | Self::Sgi
                | Self::IbmRs
                | Self::ArmBig
        )
    }

    /// Byte order of numeric data written with this encoding.
    pub fn byte_order(&self) -> Endian {
        if self.is_big_endian() {
            Endian::Big
        } else {
            Endian::Little
        }
    }
}

/// CDF value types.
///
/// The values are the `DataType` tags stored in attribute entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u32)]
pub enum DataType {
    /// 1-byte signed integer.
    Int1 = 1,
    /// 2-byte signed integer.
    Int2 = 2,
    /// 4-byte signed integer.
    Int4 = 4,
    /// 8-byte signed integer.
    Int8 = 8,
    /// 1-byte unsigned integer.
    UInt1 = 11,
    /// 2-byte unsigned integer.
    UInt2 = 12,
    /// 4-byte unsigned integer.
    UInt4 = 14,
    /// 4-byte float.
    Real4 = 21,
    /// 8-byte float.
    Real8 = 22,
    /// Milliseconds since 0000-01-01, as an 8-byte float.
    Epoch = 31,
    /// Picosecond-resolution epoch, as a pair of 8-byte floats.
    Epoch16 = 32,
    /// Nanoseconds since J2000 (TT), as an 8-byte signed integer.
    TimeTt2000 = 33,
    /// 1-byte signed integer.
    Byte = 41,
    /// 4-byte float.
    Float = 44,
    /// 8-byte float.
    Double = 45,
    /// Signed character.
    Char = 51,
    /// Unsigned character.
    UChar = 52,
}

impl DataType {
    /// Parse from the raw tag.
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            1 => Some(Self::Int1),
            2 => Some(Self::Int2),
            4 => Some(Self::Int4),
            8 => Some(Self::Int8),
            11 => Some(Self::UInt1),
            12 => Some(Self::UInt2),
            14 => Some(Self::UInt4),
            21 => Some(Self::Real4),
            22 => Some(Self::Real8),
            31 => Some(Self::Epoch),
            32 => Some(Self::Epoch16),
            33 => Some(Self::TimeTt2000),
            41 => Some(Self::Byte),
            44 => Some(Self::Float),
            45 => Some(Self::Double),
            51 => Some(Self::Char),
            52 => Some(Self::UChar),
            _ => None,
        }
    }

    /// Size in bytes of one element of this type.
    pub fn size(&self) -> usize {
        match self {
            Self::Int1 | Self::UInt1 | Self::Byte | Self::Char | Self::UChar => 1,
            Self::Int2 | Self::UInt2 => 2,
            Self::Int4 | Self::UInt4 | Self::Real4 | Self::Float => 4,
            Self::Int8 | Self::Real8 | Self::Epoch | Self::TimeTt2000 | Self::Double => 8,
            Self::Epoch16 => 16,
        }
    }

    /// Get the CDF name for this data type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Int1 => "CDF_INT1",
            Self::Int2 => "CDF_INT2",
            Self::Int4 => "CDF_INT4",
            Self::Int8 => "CDF_INT8",
            Self::UInt1 => "CDF_UINT1",
            Self::UInt2 => "CDF_UINT2",
            Self::UInt4 => "CDF_UINT4",
            Self::Real4 => "CDF_REAL4",
            Self::Real8 => "CDF_REAL8",
            Self::Epoch => "CDF_EPOCH",
            Self::Epoch16 => "CDF_EPOCH16",
            Self::TimeTt2000 => "CDF_TIME_TT2000",
            Self::Byte => "CDF_BYTE",
            Self::Float => "CDF_FLOAT",
            Self::Double => "CDF_DOUBLE",
            Self::Char => "CDF_CHAR",
            Self::UChar => "CDF_UCHAR",
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
