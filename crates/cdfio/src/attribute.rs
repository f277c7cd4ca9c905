//! Attribute assembly: walking ADR and AEDR chains into typed values.
//!
//! Chains are walked a fixed number of times, taken from the declared
//! counts (`GDR.NumAttr`, `ADR.NgrEntries` / `ADR.NzEntries`), not until a
//! null `next` pointer shows up.

use std::collections::HashMap;
use std::io::{Read, Seek};

use cdfio_common::Endian;

use crate::records::{
    Adr, Aedr, AedrLayout, AedrLink, AttributeScope, EntryChain, Gdr, RecordContext,
};
use crate::source::{CdfSource, DataChunk};
use crate::values::{decode_values, Values};
use crate::{Error, Result};

/// A named attribute and its values.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Attribute {
    /// Name, trimmed at its null terminator.
    pub name: String,
    /// Attribute number from the ADR.
    pub number: u32,
    pub scope: AttributeScope,
    /// Concatenated entry values, `None` when the attribute has no entries.
    pub values: Option<Values>,
}

/// Name-keyed attribute map.
pub type Attributes = HashMap<String, Attribute>;

/// Walks attribute chains of one file.
#[derive(Debug, Clone, Copy)]
pub(crate) struct AttributeAssembler {
    pub ctx: RecordContext,
    /// Byte order of value payloads.
    pub value_order: Endian,
    /// Reject `next == 0` before a chain's declared count is exhausted.
    pub strict: bool,
}

impl AttributeAssembler {
    /// Load exactly `gdr.num_attr` ADRs, following `ADRnext` from `gdr.adr_head`.
    pub fn adr_chain<R: Read + Seek>(
        &self,
        source: &mut CdfSource<R>,
        gdr: &Gdr,
    ) -> Result<Vec<Adr>> {
        let mut adrs = Vec::new();
        let mut next = gdr.adr_head;
        for index in 0..gdr.num_attr {
            if self.strict && next == 0 {
                return Err(Error::BrokenChain {
                    kind: "ADR",
                    index,
                    count: gdr.num_attr,
                });
            }
            let adr = Adr::load(source, next, self.ctx)?;
            next = adr.adr_next;
            adrs.push(adr);
        }
        Ok(adrs)
    }

    /// Build the attribute described by `adr`.
    ///
    /// The variable entry chain wins over the global one when both are present.
    pub fn assemble<R: Read + Seek>(
        &self,
        source: &mut CdfSource<R>,
        adr: Adr,
    ) -> Result<Attribute> {
        let values = if adr.az_edr_head != 0 {
            Some(self.entry_values(source, adr.az_edr_head, adr.nz_entries, EntryChain::Variable)?)
        } else if adr.agr_edr_head != 0 {
            Some(self.entry_values(source, adr.agr_edr_head, adr.ngr_entries, EntryChain::Global)?)
        } else {
            None
        };
        Ok(Attribute {
            name: adr.name,
            number: adr.num,
            scope: adr.scope,
            values,
        })
    }

    /// Collect the payload ranges of an entry chain and decode them as one array.
    ///
    /// The head AEDR is loaded in full and fixes the data type; the remaining
    /// `count - 1` entries are followed through their link fields only.
    pub fn entry_values<R: Read + Seek>(
        &self,
        source: &mut CdfSource<R>,
        head: u64,
        count: u32,
        chain: EntryChain,
    ) -> Result<Values> {
        let values_offset = AedrLayout::for_generation(self.ctx.generation).values as u64;
        let aedr = Aedr::load(source, head, chain, self.ctx)?;
        let element_size = aedr.data_type.size();

        // Empty payloads are skipped, so every chunk holds at least one byte
        // and the list cannot outgrow the stream.
        let mut chunks = Vec::new();
        let mut total = 0usize;
        let mut push = |source: &CdfSource<R>, record: u64, num_elements: u32| -> Result<()> {
            let chunk = payload_chunk(source, record, values_offset, num_elements, element_size)?;
            total = total
                .checked_add(chunk.size)
                .filter(|&total| total as u64 <= source.len())
                .ok_or(Error::Truncated {
                    offset: chunk.position,
                    len: chunk.size,
                    file_len: source.len(),
                })?;
            if chunk.size > 0 {
                chunks.push(chunk);
            }
            Ok(())
        };
        push(&*source, head, aedr.num_elements)?;

        let mut current = aedr.aedr_next;
        for index in 1..count {
            if self.strict && current == 0 {
                return Err(Error::BrokenChain {
                    kind: chain.as_str(),
                    index,
                    count,
                });
            }
            let link = AedrLink::load(source, current, self.ctx)?;
            push(&*source, current, link.num_elements)?;
            current = link.aedr_next;
        }

        let raw = source.read_chunks(&chunks)?;
        decode_values(&raw, aedr.data_type, self.value_order)
    }

    /// Load every attribute of the file, one after the other on `source`.
    pub fn load_all<R: Read + Seek>(
        &self,
        source: &mut CdfSource<R>,
        gdr: &Gdr,
    ) -> Result<Attributes> {
        let adrs = self.adr_chain(source, gdr)?;
        let mut attributes = Attributes::with_capacity(adrs.len());
        for adr in adrs {
            let attribute = self.assemble(source, adr)?;
            attributes.insert(attribute.name.clone(), attribute);
        }
        Ok(attributes)
    }

    /// Load every attribute, assembling entry chains concurrently.
    ///
    /// The ADR chain is walked on `source`; each attribute then gets its own
    /// cursor over `data`.
    #[cfg(feature = "parallel")]
    pub fn load_all_parallel(
        &self,
        source: &mut CdfSource<std::io::Cursor<&[u8]>>,
        data: &[u8],
        gdr: &Gdr,
    ) -> Result<Attributes> {
        use rayon::prelude::*;

        let adrs = self.adr_chain(source, gdr)?;
        let assembled = adrs
            .into_par_iter()
            .map(|adr| {
                let mut cursor = CdfSource::new(std::io::Cursor::new(data))?;
                self.assemble(&mut cursor, adr)
            })
            .collect::<Result<Vec<_>>>()?;

        let mut attributes = Attributes::with_capacity(assembled.len());
        for attribute in assembled {
            attributes.insert(attribute.name.clone(), attribute);
        }
        Ok(attributes)
    }
}

/// The payload range of the AEDR at `record`, checked against the stream.
fn payload_chunk<R: Read + Seek>(
    source: &CdfSource<R>,
    record: u64,
    values_offset: u64,
    num_elements: u32,
    element_size: usize,
) -> Result<DataChunk> {
    let position = record.checked_add(values_offset);
    let size = (num_elements as usize).checked_mul(element_size);
    let (Some(position), Some(size)) = (position, size) else {
        return Err(Error::Truncated {
            offset: record,
            len: usize::MAX,
            file_len: source.len(),
        });
    };
    source.check_range(position, size)?;
    Ok(DataChunk::new(position, size))
}
