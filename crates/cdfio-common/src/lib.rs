//! Common utilities for cdfio.
//!
//! This crate provides the binary plumbing shared by the cdfio crates:
//!
//! - [`BinaryReader`] - Zero-copy, byte-order aware reading from byte slices
//! - [`Endian`] - A byte order chosen at runtime (CDF files declare theirs)

mod endian;
mod error;
mod reader;

pub use endian::Endian;
pub use error::{Error, Result};
pub use reader::BinaryReader;
