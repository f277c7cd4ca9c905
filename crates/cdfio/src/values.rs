//! Typed attribute values.

use cdfio_common::{BinaryReader, Endian};

use crate::types::DataType;
use crate::{Error, Result};

/// A decoded array of attribute values.
///
/// One variant per CDF type family. Character types decode to a single
/// string holding every element.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", content = "values"))]
pub enum Values {
    Int8(Vec<i8>),
    Int16(Vec<i16>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    UInt8(Vec<u8>),
    UInt16(Vec<u16>),
    UInt32(Vec<u32>),
    Float(Vec<f32>),
    Double(Vec<f64>),
    /// Milliseconds since 0000-01-01T00:00:00.
    Epoch(Vec<f64>),
    /// (seconds, picoseconds) since 0000-01-01T00:00:00.
    Epoch16(Vec<[f64; 2]>),
    /// Nanoseconds since J2000, TT scale.
    TimeTt2000(Vec<i64>),
    Char(String),
    UChar(String),
}

impl Values {
    /// Number of elements.
    pub fn len(&self) -> usize {
        match self {
            Self::Int8(v) => v.len(),
            Self::Int16(v) => v.len(),
            Self::Int32(v) => v.len(),
            Self::Int64(v) | Self::TimeTt2000(v) => v.len(),
            Self::UInt8(v) => v.len(),
            Self::UInt16(v) => v.len(),
            Self::UInt32(v) => v.len(),
            Self::Float(v) => v.len(),
            Self::Double(v) | Self::Epoch(v) => v.len(),
            Self::Epoch16(v) => v.len(),
            Self::Char(s) | Self::UChar(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The text of a character-typed value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Char(s) | Self::UChar(s) => Some(s),
            _ => None,
        }
    }
}

fn collect<T>(
    bytes: &[u8],
    element_size: usize,
    order: Endian,
    mut read: impl FnMut(&mut BinaryReader<'_>) -> cdfio_common::Result<T>,
) -> Result<Vec<T>> {
    let mut reader = BinaryReader::with_order(bytes, order);
    let mut out = Vec::with_capacity(bytes.len() / element_size);
    while !reader.is_empty() {
        out.push(read(&mut reader)?);
    }
    Ok(out)
}

fn text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Decode a raw payload of `data_type` elements stored in `order`.
///
/// The payload length must be a whole number of elements.
pub fn decode_values(bytes: &[u8], data_type: DataType, order: Endian) -> Result<Values> {
    let element_size = data_type.size();
    if bytes.len() % element_size != 0 {
        return Err(Error::ValueSize {
            len: bytes.len(),
            element_size,
        });
    }

    let values = match data_type {
        DataType::Int1 | DataType::Byte => {
            Values::Int8(collect(bytes, 1, order, |r| r.read_i8())?)
        }
        DataType::UInt1 => Values::UInt8(bytes.to_vec()),
        DataType::Int2 => Values::Int16(collect(bytes, 2, order, |r| r.read_i16())?),
        DataType::UInt2 => Values::UInt16(collect(bytes, 2, order, |r| r.read_u16())?),
        DataType::Int4 => Values::Int32(collect(bytes, 4, order, |r| r.read_i32())?),
        DataType::UInt4 => Values::UInt32(collect(bytes, 4, order, |r| r.read_u32())?),
        DataType::Int8 => Values::Int64(collect(bytes, 8, order, |r| r.read_i64())?),
        DataType::Real4 | DataType::Float => {
            Values::Float(collect(bytes, 4, order, |r| r.read_f32())?)
        }
        DataType::Real8 | DataType::Double => {
            Values::Double(collect(bytes, 8, order, |r| r.read_f64())?)
        }
        DataType::Epoch => Values::Epoch(collect(bytes, 8, order, |r| r.read_f64())?),
        DataType::Epoch16 => Values::Epoch16(collect(bytes, 16, order, |r| {
            Ok([r.read_f64()?, r.read_f64()?])
        })?),
        DataType::TimeTt2000 => Values::TimeTt2000(collect(bytes, 8, order, |r| r.read_i64())?),
        DataType::Char => Values::Char(text(bytes)),
        DataType::UChar => Values::UChar(text(bytes)),
    };
    Ok(values)
}
