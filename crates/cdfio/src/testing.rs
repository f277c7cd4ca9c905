//! Synthetic CDF files for unit tests.
//!
//! Records are appended in call order; chain pointers are patched in
//! afterwards, so tests can lay out chains in any file order.

use std::io::Cursor;

use byteorder::{BigEndian, LittleEndian, WriteBytesExt};
use cdfio_common::Endian;

use crate::layout::Generation;
use crate::records::{AdrLayout, AedrLayout, CdrLayout, EntryChain, GdrLayout};
use crate::source::CdfSource;
use crate::types::{DataType, Encoding, RecordType};

/// One attribute entry to write.
#[derive(Debug, Clone)]
pub struct TestEntry {
    pub data_type: DataType,
    pub payload: Vec<u8>,
    pub num_elements: u32,
    /// Written instead of `data_type` when set.
    pub raw_data_type: Option<u32>,
}

impl TestEntry {
    pub fn new(data_type: DataType, payload: &[u8], num_elements: u32) -> Self {
        Self {
            data_type,
            payload: payload.to_vec(),
            num_elements,
            raw_data_type: None,
        }
    }

    /// CDF_INT4 values, little-endian payload.
    pub fn int4(values: &[i32]) -> Self {
        let payload: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        Self::new(DataType::Int4, &payload, values.len() as u32)
    }

    /// CDF_CHAR text.
    pub fn chars(text: &str) -> Self {
        Self::new(DataType::Char, text.as_bytes(), text.len() as u32)
    }
}

/// One attribute to write, with its entry chains.
#[derive(Debug, Clone)]
pub struct TestAttr {
    pub name: String,
    pub scope: u32,
    pub global: Vec<TestEntry>,
    pub variable: Vec<TestEntry>,
}

impl TestAttr {
    pub fn global(name: &str) -> Self {
        Self {
            name: name.to_string(),
            scope: 1,
            global: Vec::new(),
            variable: Vec::new(),
        }
    }

    pub fn variable(name: &str) -> Self {
        Self {
            scope: 2,
            ..Self::global(name)
        }
    }

    pub fn with_global(mut self, entry: TestEntry) -> Self {
        self.global.push(entry);
        self
    }

    pub fn with_variable(mut self, entry: TestEntry) -> Self {
        self.variable.push(entry);
        self
    }
}

/// A CDF file under construction.
#[derive(Debug, Clone)]
pub struct Fixture {
    pub generation: Generation,
    pub encoding: Encoding,
    /// Byte order of descriptor fields (except the CDR bootstrap fields).
    pub order: Endian,
    bytes: Vec<u8>,
}

impl Fixture {
    /// Start a file with the standard uncompressed magic for `generation`.
    pub fn new(generation: Generation, encoding: Encoding, order: Endian) -> Self {
        let first = match generation {
            Generation::V2 => 0xCDF2_6002,
            Generation::V3 => 0xCDF3_0001,
        };
        Self::with_magic(first, 0x0000_FFFF, generation, encoding, order)
    }

    /// Start a file with an arbitrary magic pair.
    pub fn with_magic(
        first: u32,
        second: u32,
        generation: Generation,
        encoding: Encoding,
        order: Endian,
    ) -> Self {
        let mut fixture = Self {
            generation,
            encoding,
            order,
            bytes: Vec::new(),
        };
        fixture.put_u32_in(first, Endian::Big);
        fixture.put_u32_in(second, Endian::Big);
        fixture
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// A fresh stream over the current bytes.
    pub fn source(&self) -> CdfSource<Cursor<Vec<u8>>> {
        CdfSource::new(Cursor::new(self.bytes.clone())).expect("in-memory stream")
    }

    fn end(&self) -> u64 {
        self.bytes.len() as u64
    }

    fn put_u32_in(&mut self, value: u32, order: Endian) {
        match order {
            Endian::Big => self.bytes.write_u32::<BigEndian>(value),
            Endian::Little => self.bytes.write_u32::<LittleEndian>(value),
        }
        .expect("write to Vec");
    }

    fn put_u32(&mut self, value: u32) {
        self.put_u32_in(value, self.order);
    }

    fn put_offset_in(&mut self, value: u64, order: Endian) {
        match (self.generation, order) {
            (Generation::V2, _) => self.put_u32_in(value as u32, order),
            (Generation::V3, Endian::Big) => {
                self.bytes.write_u64::<BigEndian>(value).expect("write to Vec")
            }
            (Generation::V3, Endian::Little) => {
                self.bytes.write_u64::<LittleEndian>(value).expect("write to Vec")
            }
        }
    }

    fn put_offset(&mut self, value: u64) {
        self.put_offset_in(value, self.order);
    }

    fn put_str(&mut self, text: &str, width: usize) {
        let mut field = text.as_bytes().to_vec();
        field.resize(width, 0);
        self.bytes.extend_from_slice(&field);
    }

    fn put_header(&mut self, record_type: RecordType, order: Endian) {
        self.put_offset_in(0, order);
        self.put_u32_in(record_type as i32 as u32, order);
    }

    /// Overwrite the offset-width field at absolute position `at`.
    fn patch_offset_in(&mut self, at: u64, value: u64, order: Endian) {
        let mut field = Self {
            generation: self.generation,
            encoding: self.encoding,
            order,
            bytes: Vec::new(),
        };
        field.put_offset_in(value, order);
        let at = at as usize;
        self.bytes[at..at + field.bytes.len()].copy_from_slice(&field.bytes);
    }

    /// Set the record-size word of the record starting at `start` to its length so far.
    fn close_record(&mut self, start: u64, order: Endian) {
        let size = self.end() - start;
        self.patch_offset_in(start, size, order);
    }

    /// Overwrite the offset field at absolute position `at`.
    pub fn link(&mut self, at: u64, value: u64) {
        self.patch_offset_in(at, value, self.order);
    }

    pub fn link_adr(&mut self, from: u64, to: u64) {
        let field = AdrLayout::for_generation(self.generation).adr_next;
        self.link(from + field.offset as u64, to);
    }

    pub fn link_aedr(&mut self, from: u64, to: u64) {
        let field = AedrLayout::for_generation(self.generation).aedr_next;
        self.link(from + field.offset as u64, to);
    }

    /// Append a CDR (version 3 or 2, release 9, single-file) with a zero GDR offset.
    pub fn cdr(&mut self, copyright: &str) -> u64 {
        let start = self.end();
        self.put_header(RecordType::Cdr, Endian::Big);
        self.put_offset(0);
        self.put_u32(match self.generation {
            Generation::V2 => 2,
            Generation::V3 => 3,
        });
        self.put_u32(9);
        self.put_u32_in(self.encoding as u32, Endian::Big);
        self.put_u32(0x2);
        self.put_u32(0);
        self.put_u32(0);
        self.put_u32(0);
        self.put_u32(0);
        self.put_u32(0);
        self.put_str(copyright, CdrLayout::COPYRIGHT_LEN);
        self.close_record(start, Endian::Big);
        start
    }

    /// Append a GDR with no variables.
    pub fn gdr(&mut self, adr_head: u64, num_attr: u32) -> u64 {
        let start = self.end();
        self.put_header(RecordType::Gdr, self.order);
        self.put_offset(0);
        self.put_offset(0);
        self.put_offset(adr_head);
        self.put_offset(0);
        self.put_u32(0);
        self.put_u32(num_attr);
        self.put_u32(0);
        self.put_u32(0);
        self.put_u32(0);
        self.put_offset(0);
        self.put_u32(0);
        self.put_u32(20170101);
        self.put_u32(0);
        self.close_record(start, self.order);
        start
    }

    /// Append an unlinked ADR; entry counts come from `attr`, heads are 0.
    pub fn adr(&mut self, attr: &TestAttr, num: u32) -> u64 {
        let start = self.end();
        let name_len = AdrLayout::for_generation(self.generation).name.len;
        self.put_header(RecordType::Adr, self.order);
        self.put_offset(0);
        self.put_offset(0);
        self.put_u32(attr.scope);
        self.put_u32(num);
        self.put_u32(attr.global.len() as u32);
        self.put_u32((attr.global.len() as u32).saturating_sub(1));
        self.put_u32(0);
        self.put_offset(0);
        self.put_u32(attr.variable.len() as u32);
        self.put_u32((attr.variable.len() as u32).saturating_sub(1));
        self.put_u32(0);
        self.put_str(&attr.name, name_len);
        self.close_record(start, self.order);
        start
    }

    /// Append an unlinked AEDR followed by its payload.
    pub fn aedr(&mut self, chain: EntryChain, entry: &TestEntry, attr_num: u32) -> u64 {
        let start = self.end();
        self.put_header(chain.record_type(), self.order);
        self.put_offset(0);
        self.put_u32(attr_num);
        self.put_u32(entry.raw_data_type.unwrap_or(entry.data_type as u32));
        self.put_u32(0);
        self.put_u32(entry.num_elements);
        self.put_u32(u32::from(matches!(entry.data_type, DataType::Char | DataType::UChar)));
        for _ in 0..4 {
            self.put_u32(0);
        }
        self.bytes.extend_from_slice(&entry.payload);
        self.close_record(start, self.order);
        start
    }

    fn entry_chain(&mut self, chain: EntryChain, entries: &[TestEntry], attr_num: u32) -> u64 {
        let mut head = 0;
        let mut previous = None;
        for entry in entries {
            let offset = self.aedr(chain, entry, attr_num);
            match previous {
                None => head = offset,
                Some(previous) => self.link_aedr(previous, offset),
            }
            previous = Some(offset);
        }
        head
    }

    /// Append a GDR, then every attribute with its entries, all linked.
    ///
    /// The CDR (at offset 8) is pointed at the new GDR, whose offset is returned.
    pub fn attributes(&mut self, attrs: &[TestAttr]) -> u64 {
        let gdr = self.gdr(0, attrs.len() as u32);
        let cdr_layout = CdrLayout::for_generation(self.generation);
        self.link(8 + cdr_layout.gdr_offset.offset as u64, gdr);

        let gdr_layout = GdrLayout::for_generation(self.generation);
        let adr_layout = AdrLayout::for_generation(self.generation);
        let mut previous = None;
        for (num, attr) in attrs.iter().enumerate() {
            let num = num as u32;
            let adr = self.adr(attr, num);
            match previous {
                None => self.link(gdr + gdr_layout.adr_head.offset as u64, adr),
                Some(previous) => self.link_adr(previous, adr),
            }
            previous = Some(adr);

            let global = self.entry_chain(EntryChain::Global, &attr.global, num);
            self.link(adr + adr_layout.agr_edr_head.offset as u64, global);
            let variable = self.entry_chain(EntryChain::Variable, &attr.variable, num);
            self.link(adr + adr_layout.az_edr_head.offset as u64, variable);
        }
        gdr
    }
}
