//! BYML binary serialization.
//!
//! Layout: header, hash key table, string value table, then containers
//! depth-first in slot order, then the pooled 64-bit values. Both tables
//! are sorted and deduplicated so output is deterministic.
use std::collections::{BTreeSet, HashMap};
use std::io::{Cursor, Seek, Write};

use binrw::BinWrite;
use indexmap::IndexMap;

use crate::write::{pad_to, write_u24, Patch32};
use crate::{Endian, Error, Result};

use super::{tag, Byml};

pub(crate) fn to_binary(byml: &Byml, endian: Endian, version: u16) -> Result<Vec<u8>> {
    if !(1..=4).contains(&version) {
        return Err(Error::invalid(format!("unsupported version: {version}")));
    }
    if !matches!(byml, Byml::Null | Byml::Array(_) | Byml::Hash(_)) {
        return Err(Error::TypeMismatch {
            expected: "null, an array or a hash",
            actual: byml.type_name(),
        });
    }

    let mut keys = BTreeSet::new();
    let mut strings = BTreeSet::new();
    collect_strings(byml, &mut keys, &mut strings);

    let mut writer = Cursor::new(Vec::new());
    match endian {
        Endian::Big => writer.write_all(b"BY").map_err(binrw::Error::from)?,
        Endian::Little => writer.write_all(b"YB").map_err(binrw::Error::from)?,
    }
    version.write_options(&mut writer, endian, ())?;
    let key_table_patch = Patch32::new(&mut writer, endian)?;
    let string_table_patch = Patch32::new(&mut writer, endian)?;
    let root_patch = Patch32::new(&mut writer, endian)?;

    if !keys.is_empty() {
        let pos = writer.stream_position()?;
        key_table_patch.set(&mut writer, endian, pos as u32)?;
        write_string_table(&mut writer, endian, &keys)?;
    }
    if !strings.is_empty() {
        let pos = writer.stream_position()?;
        string_table_patch.set(&mut writer, endian, pos as u32)?;
        write_string_table(&mut writer, endian, &strings)?;
    }

    if !matches!(byml, Byml::Null) {
        let pos = writer.stream_position()?;
        root_patch.set(&mut writer, endian, pos as u32)?;
        let mut ctx = Context {
            endian,
            keys: keys.iter().enumerate().map(|(i, k)| (*k, i as u32)).collect(),
            strings: strings
                .iter()
                .enumerate()
                .map(|(i, s)| (*s, i as u32))
                .collect(),
            long_values: IndexMap::new(),
        };
        write_container(&mut writer, &mut ctx, byml)?;
        // 64-bit values are pooled at the end and deduplicated by bit
        // pattern.
        for (bits, patches) in ctx.long_values {
            pad_to(&mut writer, 4, 0)?;
            let pos = writer.stream_position()? as u32;
            bits.write_options(&mut writer, endian, ())?;
            for patch in patches {
                patch.set(&mut writer, endian, pos)?;
            }
        }
    }
    Ok(writer.into_inner())
}

struct Context<'a> {
    endian: Endian,
    keys: HashMap<&'a str, u32>,
    strings: HashMap<&'a str, u32>,
    long_values: IndexMap<u64, Vec<Patch32>>,
}

fn collect_strings<'a>(
    node: &'a Byml,
    keys: &mut BTreeSet<&'a str>,
    strings: &mut BTreeSet<&'a str>,
) {
    match node {
        Byml::String(value) => {
            strings.insert(value.as_str());
        }
        Byml::Array(items) => {
            for item in items {
                collect_strings(item, keys, strings);
            }
        }
        Byml::Hash(hash) => {
            for (key, value) in hash {
                keys.insert(key.as_str());
                collect_strings(value, keys, strings);
            }
        }
        _ => {}
    }
}

fn write_string_table<W: Write + Seek>(
    writer: &mut W,
    endian: Endian,
    entries: &BTreeSet<&str>,
) -> Result<()> {
    tag::STRING_TABLE.write_options(writer, endian, ())?;
    write_u24(writer, endian, entries.len() as u32)?;
    // count + 1 offsets relative to the table start; the last one marks
    // the end of the table.
    let mut offset = 4 + (entries.len() as u32 + 1) * 4;
    for entry in entries {
        offset.write_options(writer, endian, ())?;
        offset += entry.len() as u32 + 1;
    }
    offset.write_options(writer, endian, ())?;
    for entry in entries {
        writer.write_all(entry.as_bytes()).map_err(binrw::Error::from)?;
        writer.write_all(&[0]).map_err(binrw::Error::from)?;
    }
    pad_to(writer, 4, 0)?;
    Ok(())
}

/// Writes a container node at the current (4-aligned) position, then its
/// non-inline children right after it in slot order.
fn write_container<W: Write + Seek>(
    writer: &mut W,
    ctx: &mut Context,
    node: &Byml,
) -> Result<()> {
    let mut deferred = Vec::new();
    match node {
        Byml::Array(items) => {
            tag::ARRAY.write_options(writer, ctx.endian, ())?;
            write_u24(writer, ctx.endian, items.len() as u32)?;
            for item in items {
                item.type_tag().write_options(writer, ctx.endian, ())?;
            }
            pad_to(writer, 4, 0)?;
            for item in items {
                write_value_slot(writer, ctx, item, &mut deferred)?;
            }
        }
        Byml::Hash(hash) => {
            tag::HASH.write_options(writer, ctx.endian, ())?;
            write_u24(writer, ctx.endian, hash.len() as u32)?;
            let mut entries: Vec<(&str, &Byml)> =
                hash.iter().map(|(k, v)| (k.as_str(), v)).collect();
            entries.sort_by_key(|(key, _)| ctx.keys[key]);
            for (key, value) in entries {
                write_u24(writer, ctx.endian, ctx.keys[key])?;
                value.type_tag().write_options(writer, ctx.endian, ())?;
                write_value_slot(writer, ctx, value, &mut deferred)?;
            }
        }
        other => {
            return Err(Error::TypeMismatch {
                expected: "a container",
                actual: other.type_name(),
            })
        }
    }
    for (patch, child) in deferred {
        let pos = writer.stream_position()?;
        patch.set(writer, ctx.endian, pos as u32)?;
        write_container(writer, ctx, child)?;
    }
    Ok(())
}

fn write_value_slot<'a, W: Write + Seek>(
    writer: &mut W,
    ctx: &mut Context,
    node: &'a Byml,
    deferred: &mut Vec<(Patch32, &'a Byml)>,
) -> Result<()> {
    match node {
        Byml::Null => 0u32.write_options(writer, ctx.endian, ())?,
        Byml::Bool(value) => u32::from(*value).write_options(writer, ctx.endian, ())?,
        Byml::Int(value) => (*value as u32).write_options(writer, ctx.endian, ())?,
        Byml::UInt(value) => value.write_options(writer, ctx.endian, ())?,
        Byml::Float(value) => value.to_bits().write_options(writer, ctx.endian, ())?,
        Byml::String(value) => {
            ctx.strings[value.as_str()].write_options(writer, ctx.endian, ())?
        }
        Byml::Int64(value) => {
            let patch = Patch32::new(writer, ctx.endian)?;
            ctx.long_values.entry(*value as u64).or_default().push(patch);
        }
        Byml::UInt64(value) => {
            let patch = Patch32::new(writer, ctx.endian)?;
            ctx.long_values.entry(*value).or_default().push(patch);
        }
        Byml::Double(value) => {
            let patch = Patch32::new(writer, ctx.endian)?;
            ctx.long_values.entry(value.to_bits()).or_default().push(patch);
        }
        Byml::Array(_) | Byml::Hash(_) => {
            let patch = Patch32::new(writer, ctx.endian)?;
            deferred.push((patch, node));
        }
    }
    Ok(())
}
