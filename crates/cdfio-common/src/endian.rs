//! Runtime byte order selection.
//!
//! CDF files record the byte order of their numeric data in the descriptor
//! records, so the order is a value decided per file rather than a type
//! parameter fixed at compile time.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

macro_rules! read_fn {
    ($name:ident, $ty:ty) => {
        #[doc = concat!("Decode a `", stringify!($ty), "` from the start of `bytes`.")]
        ///
        /// # Panics
        ///
        /// Panics if `bytes` is shorter than the value.
        #[inline]
        pub fn $name(self, bytes: &[u8]) -> $ty {
            match self {
                Self::Little => LittleEndian::$name(bytes),
                Self::Big => BigEndian::$name(bytes),
            }
        }
    };
}

/// Byte order of multi-byte values in a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Endian {
    /// Least significant byte first (x86, ARM little, VAX...).
    #[default]
    Little,
    /// Most significant byte first (network order).
    Big,
}

impl Endian {
    read_fn!(read_u16, u16);
    read_fn!(read_i16, i16);
    read_fn!(read_u32, u32);
    read_fn!(read_i32, i32);
    read_fn!(read_u64, u64);
    read_fn!(read_i64, i64);
    read_fn!(read_f32, f32);
    read_fn!(read_f64, f64);
}
