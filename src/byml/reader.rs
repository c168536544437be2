//! BYML binary parsing.
use std::io::Cursor;

use binrw::BinRead;
use log::trace;

use crate::{read_u24, Endian, Error, Result};

use super::{tag, Byml, Hash};

const MAX_DEPTH: usize = 128;

pub(crate) fn from_binary(data: &[u8]) -> Result<Byml> {
    if data.len() < 16 {
        return Err(Error::invalid("truncated header"));
    }
    let endian = if &data[0..2] == b"BY" {
        Endian::Big
    } else if &data[0..2] == b"YB" {
        Endian::Little
    } else {
        return Err(Error::invalid(format!("bad magic: {:02X?}", &data[0..2])));
    };
    let mut cursor = Cursor::new(data);
    cursor.set_position(2);
    let version = u16::read_options(&mut cursor, endian, ())?;
    if !(1..=4).contains(&version) {
        return Err(Error::invalid(format!("unsupported version: {version}")));
    }
    let hash_key_table_offset = u32::read_options(&mut cursor, endian, ())?;
    let string_table_offset = u32::read_options(&mut cursor, endian, ())?;
    let root_offset = u32::read_options(&mut cursor, endian, ())?;
    trace!("BYML v{version}, root node at {root_offset:#x}");

    let mut reader = Reader {
        cursor,
        endian,
        hash_keys: Vec::new(),
        strings: Vec::new(),
    };
    reader.hash_keys = reader.read_string_table(hash_key_table_offset)?;
    reader.strings = reader.read_string_table(string_table_offset)?;

    if root_offset == 0 {
        return Ok(Byml::Null);
    }
    reader.check_offset(root_offset as u64, 1)?;
    reader.cursor.set_position(root_offset as u64);
    let root_type = u8::read_options(&mut reader.cursor, endian, ())?;
    if root_type != tag::ARRAY && root_type != tag::HASH {
        return Err(Error::invalid(format!(
            "root node must be an array or a hash, found type {root_type:#04X}"
        )));
    }
    reader.read_container(root_type, 0)
}

struct Reader<'a> {
    cursor: Cursor<&'a [u8]>,
    endian: Endian,
    hash_keys: Vec<String>,
    strings: Vec<String>,
}

impl Reader<'_> {
    fn len(&self) -> u64 {
        self.cursor.get_ref().len() as u64
    }

    fn check_offset(&self, offset: u64, size: u64) -> Result<()> {
        if offset + size > self.len() {
            return Err(Error::invalid(format!("offset {offset:#x} out of bounds")));
        }
        Ok(())
    }

    fn read_string_table(&mut self, offset: u32) -> Result<Vec<String>> {
        if offset == 0 {
            return Ok(Vec::new());
        }
        if offset % 4 != 0 {
            return Err(Error::invalid("string table offset is not aligned"));
        }
        let offset = offset as u64;
        self.check_offset(offset, 4)?;
        self.cursor.set_position(offset);
        let node_type = u8::read_options(&mut self.cursor, self.endian, ())?;
        if node_type != tag::STRING_TABLE {
            return Err(Error::invalid(format!(
                "expected string table, found type {node_type:#04X}"
            )));
        }
        let count = read_u24(&mut self.cursor, self.endian)? as u64;
        self.check_offset(self.cursor.position(), (count + 1) * 4)?;
        let mut offsets = Vec::with_capacity(count as usize + 1);
        for _ in 0..=count {
            offsets.push(u32::read_options(&mut self.cursor, self.endian, ())?);
        }
        let data = *self.cursor.get_ref();
        let mut entries = Vec::with_capacity(count as usize);
        for pair in offsets.windows(2) {
            let start = offset + pair[0] as u64;
            let end = offset + pair[1] as u64;
            if start >= end || end > self.len() {
                return Err(Error::invalid("string table entry out of bounds"));
            }
            // Entries are null-terminated; the terminator sits right
            // before the next entry's offset.
            let bytes = &data[start as usize..end as usize - 1];
            let entry = std::str::from_utf8(bytes)
                .map_err(|_| Error::invalid("string table entry is not valid UTF-8"))?;
            entries.push(entry.to_string());
        }
        Ok(entries)
    }

    /// Reads a container body. The cursor must point just past the type
    /// tag.
    fn read_container(&mut self, node_type: u8, depth: usize) -> Result<Byml> {
        if depth >= MAX_DEPTH {
            return Err(Error::invalid("maximum recursion depth exceeded"));
        }
        let count = read_u24(&mut self.cursor, self.endian)? as usize;
        match node_type {
            tag::ARRAY => {
                let types_len = count as u64;
                let padded = crate::write::round_up(self.cursor.position() + types_len, 4)
                    - self.cursor.position();
                self.check_offset(self.cursor.position(), padded + count as u64 * 4)?;
                let mut types = vec![0u8; count];
                std::io::Read::read_exact(&mut self.cursor, &mut types)
                    .map_err(binrw::Error::from)?;
                self.cursor
                    .set_position(crate::write::round_up(self.cursor.position(), 4));
                let mut values = Vec::with_capacity(count);
                for _ in 0..count {
                    values.push(u32::read_options(&mut self.cursor, self.endian, ())?);
                }
                let mut items = Vec::with_capacity(count);
                for (child_type, value) in types.into_iter().zip(values) {
                    items.push(self.read_node(child_type, value, depth)?);
                }
                Ok(Byml::Array(items))
            }
            tag::HASH => {
                self.check_offset(self.cursor.position(), count as u64 * 8)?;
                let mut entries = Vec::with_capacity(count);
                for _ in 0..count {
                    let key_index = read_u24(&mut self.cursor, self.endian)?;
                    let child_type = u8::read_options(&mut self.cursor, self.endian, ())?;
                    let value = u32::read_options(&mut self.cursor, self.endian, ())?;
                    entries.push((key_index, child_type, value));
                }
                let mut hash = Hash::with_capacity(count);
                for (key_index, child_type, value) in entries {
                    let key = self
                        .hash_keys
                        .get(key_index as usize)
                        .ok_or_else(|| Error::invalid("hash key index out of range"))?
                        .clone();
                    let child = self.read_node(child_type, value, depth)?;
                    if hash.insert(key, child).is_some() {
                        return Err(Error::invalid("duplicate hash key"));
                    }
                }
                Ok(Byml::Hash(hash))
            }
            _ => Err(Error::invalid(format!(
                "expected a container, found type {node_type:#04X}"
            ))),
        }
    }

    /// Decodes one value slot. Containers and 64-bit values store an
    /// offset, everything else is inline.
    fn read_node(&mut self, node_type: u8, value: u32, depth: usize) -> Result<Byml> {
        Ok(match node_type {
            tag::STRING => Byml::String(
                self.strings
                    .get(value as usize)
                    .ok_or_else(|| Error::invalid("string index out of range"))?
                    .clone(),
            ),
            tag::ARRAY | tag::HASH => {
                self.check_offset(value as u64, 4)?;
                let saved_pos = self.cursor.position();
                self.cursor.set_position(value as u64);
                let child_type = u8::read_options(&mut self.cursor, self.endian, ())?;
                if child_type != node_type {
                    return Err(Error::invalid("container type does not match its slot"));
                }
                let container = self.read_container(child_type, depth + 1)?;
                self.cursor.set_position(saved_pos);
                container
            }
            tag::BOOL => Byml::Bool(value != 0),
            tag::INT => Byml::Int(value as i32),
            tag::FLOAT => Byml::Float(f32::from_bits(value)),
            tag::UINT => Byml::UInt(value),
            tag::INT64 => Byml::Int64(self.read_u64_at(value)? as i64),
            tag::UINT64 => Byml::UInt64(self.read_u64_at(value)?),
            tag::DOUBLE => Byml::Double(f64::from_bits(self.read_u64_at(value)?)),
            tag::NULL => Byml::Null,
            _ => {
                return Err(Error::invalid(format!(
                    "unknown node type {node_type:#04X}"
                )))
            }
        })
    }

    fn read_u64_at(&mut self, offset: u32) -> Result<u64> {
        self.check_offset(offset as u64, 8)?;
        let saved_pos = self.cursor.position();
        self.cursor.set_position(offset as u64);
        let value = u64::read_options(&mut self.cursor, self.endian, ())?;
        self.cursor.set_position(saved_pos);
        Ok(value)
    }
}
