//! Reader for NASA Common Data Format (CDF) files.
//!
//! A CDF file is a chain of descriptor records reached through file
//! offsets. This crate decodes the magic pair, the CDF descriptor record
//! (CDR), the global descriptor record (GDR) and every attribute with its
//! entry chains:
//!
//! - v2.x files (4-byte offsets, 64-byte names) and v3.x files (8-byte
//!   offsets, 256-byte names) from one set of field tables
//! - byte order picked per file from the CDR `Encoding` word
//! - typed attribute values for every CDF data type
//! - gzip/DEFLATE codecs for compressed payloads
//! - parallel attribute assembly with rayon (with `parallel` feature)
//!
//! Variable data is not decoded.
//!
//! # Example
//!
//! ```no_run
//! use cdfio::Cdf;
//!
//! let cdf = Cdf::open("ace_mag.cdf")?;
//! println!("{} ({})", cdf.info().generation, cdf.info().version_string());
//!
//! for (name, attribute) in cdf.attributes() {
//!     println!("{}: {:?}", name, attribute.values);
//! }
//! # Ok::<(), cdfio::Error>(())
//! ```

mod attribute;
pub mod compress;
mod error;
pub mod layout;
mod magic;
mod options;
mod parser;
pub mod records;
mod source;
mod types;
mod values;

#[cfg(test)]
mod testing;

pub use attribute::{Attribute, Attributes};
pub use error::{Error, Result};
pub use layout::Generation;
pub use magic::MagicPair;
pub use options::{DescriptorOrder, ParseOptions, ValueOrder};
pub use parser::{load, Cdf, CdfInfo};
pub use records::AttributeScope;
pub use source::{CdfSource, DataChunk};
pub use types::{DataType, Encoding, RecordType};
pub use values::{decode_values, Values};

#[cfg(feature = "parallel")]
pub use parser::parse_bytes_parallel;

/// Byte order selector shared with `cdfio-common`.
pub use cdfio_common::Endian;
