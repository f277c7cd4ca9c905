//! Parse configuration.

use cdfio_common::Endian;

use crate::types::Encoding;

/// Byte order used for descriptor-record numeric fields.
///
/// The CDR header and its `Encoding` word are always read in network order,
/// since the declared encoding is not known before they are decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DescriptorOrder {
    /// Follow the encoding declared in the CDR.
    #[default]
    Declared,
    /// Always big-endian.
    Network,
}

impl DescriptorOrder {
    /// Byte order for a file declaring `encoding`.
    pub fn resolve(self, encoding: Encoding) -> Endian {
        match self {
            Self::Declared => encoding.byte_order(),
            Self::Network => Endian::Big,
        }
    }
}

/// Byte order used for attribute value payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueOrder {
    /// Always little-endian, whatever the CDR declares.
    #[default]
    LittleEndian,
    /// Follow the encoding declared in the CDR.
    Declared,
}

impl ValueOrder {
    /// Byte order for a file declaring `encoding`.
    pub fn resolve(self, encoding: Encoding) -> Endian {
        match self {
            Self::LittleEndian => Endian::Little,
            Self::Declared => encoding.byte_order(),
        }
    }
}

/// Options controlling how a CDF file is decoded.
///
/// # Example
///
/// ```
/// use cdfio::{DescriptorOrder, ParseOptions};
///
/// let options = ParseOptions::default()
///     .with_descriptor_order(DescriptorOrder::Network)
///     .with_strict_chains(true);
/// assert!(options.strict_chains);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseOptions {
    /// Byte order of descriptor-record fields.
    pub descriptor_order: DescriptorOrder,
    /// Byte order of attribute values.
    pub value_order: ValueOrder,
    /// Fail when a record chain links to offset 0 before its declared count
    /// is reached, instead of loading a record at offset 0.
    pub strict_chains: bool,
}

impl ParseOptions {
    pub fn with_descriptor_order(mut self, order: DescriptorOrder) -> Self {
        self.descriptor_order = order;
        self
    }

    pub fn with_value_order(mut self, order: ValueOrder) -> Self {
        self.value_order = order;
        self
    }

    pub fn with_strict_chains(mut self, strict: bool) -> Self {
        self.strict_chains = strict;
        self
    }
}
