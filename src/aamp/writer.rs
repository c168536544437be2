//! AAMP binary serialization.
//!
//! Two-pass layout: list entries first (breadth-first, each parent's
//! children contiguous), then object entries, then parameter entries,
//! then the data section, then the deduplicated string section. Entry
//! offsets are patched backwards as each region is placed.
use std::io::{Cursor, Seek, Write};

use binrw::BinWrite;
use indexmap::IndexMap;

use crate::write::{pad_to, Patch16, Patch32};
use crate::{Endian, Error, Result};

use super::{Curve, Name, Parameter, ParameterIO, ParameterList, ParameterObject};

const HEADER_SIZE: u64 = 0x30;
const ENDIAN: Endian = Endian::Little;

struct ListRecord<'a> {
    entry_pos: u64,
    lists_patch: Patch16,
    objects_patch: Patch16,
    list: &'a ParameterList,
}

struct ObjectRecord<'a> {
    entry_pos: u64,
    params_patch: Patch16,
    object: &'a ParameterObject,
}

struct ParamRecord<'a> {
    entry_pos: u64,
    data_patch: Patch32,
    param: &'a Parameter,
}

pub(crate) fn to_binary(pio: &ParameterIO) -> Result<Vec<u8>> {
    let mut writer = Cursor::new(Vec::new());
    writer.write_all(b"AAMP")?;
    2u32.write_options(&mut writer, ENDIAN, ())?;
    // little endian | UTF-8
    3u32.write_options(&mut writer, ENDIAN, ())?;
    let file_size_patch = Patch32::new(&mut writer, ENDIAN)?;
    pio.version.write_options(&mut writer, ENDIAN, ())?;
    let pio_offset_patch = Patch32::new(&mut writer, ENDIAN)?;
    let (num_lists, num_objects, num_params) = count(&pio.param_root);
    num_lists.write_options(&mut writer, ENDIAN, ())?;
    num_objects.write_options(&mut writer, ENDIAN, ())?;
    num_params.write_options(&mut writer, ENDIAN, ())?;
    let data_size_patch = Patch32::new(&mut writer, ENDIAN)?;
    let string_size_patch = Patch32::new(&mut writer, ENDIAN)?;
    0u32.write_options(&mut writer, ENDIAN, ())?;

    writer.write_all(pio.io_type.as_bytes())?;
    writer.write_all(&[0])?;
    pad_to(&mut writer, 4, 0)?;

    // List table. Breadth-first so every parent's children form one
    // contiguous run addressable by a single offset.
    let root_pos = writer.stream_position()?;
    pio_offset_patch.set(&mut writer, ENDIAN, (root_pos - HEADER_SIZE) as u32)?;
    let mut lists = vec![write_list_entry(
        &mut writer,
        ParameterIO::root_key(),
        &pio.param_root,
    )?];
    let mut index = 0;
    while index < lists.len() {
        let parent_pos = lists[index].entry_pos;
        let parent = lists[index].list;
        if !parent.lists.is_empty() {
            let block_pos = writer.stream_position()?;
            lists[index]
                .lists_patch
                .set(&mut writer, ENDIAN, rel16(parent_pos, block_pos)?)?;
            for (name, child) in &parent.lists {
                let record = write_list_entry(&mut writer, *name, child)?;
                lists.push(record);
            }
        }
        index += 1;
    }

    // Object table.
    let mut objects = Vec::new();
    for record in &lists {
        if record.list.objects.is_empty() {
            continue;
        }
        let block_pos = writer.stream_position()?;
        record
            .objects_patch
            .set(&mut writer, ENDIAN, rel16(record.entry_pos, block_pos)?)?;
        for (name, object) in &record.list.objects {
            let entry_pos = writer.stream_position()?;
            name.0.write_options(&mut writer, ENDIAN, ())?;
            let params_patch = Patch16::new(&mut writer, ENDIAN)?;
            (object.params.len() as u16).write_options(&mut writer, ENDIAN, ())?;
            objects.push(ObjectRecord {
                entry_pos,
                params_patch,
                object,
            });
        }
    }

    // Parameter table.
    let mut params = Vec::new();
    for record in &objects {
        if record.object.params.is_empty() {
            continue;
        }
        let block_pos = writer.stream_position()?;
        record
            .params_patch
            .set(&mut writer, ENDIAN, rel16(record.entry_pos, block_pos)?)?;
        for (name, param) in &record.object.params {
            let entry_pos = writer.stream_position()?;
            name.0.write_options(&mut writer, ENDIAN, ())?;
            let data_patch = Patch32::new(&mut writer, ENDIAN)?;
            params.push(ParamRecord {
                entry_pos,
                data_patch,
                param,
            });
        }
    }

    // Data section: everything except strings, in parameter order.
    let data_start = writer.stream_position()?;
    for record in &params {
        if record.param.is_string() {
            continue;
        }
        pad_to(&mut writer, 4, 0)?;
        let value_pos = write_parameter_data(&mut writer, record.param)?;
        let field = rel24(record.entry_pos, value_pos)? | u32::from(record.param.type_tag()) << 24;
        record.data_patch.set(&mut writer, ENDIAN, field)?;
    }

    // String section, deduplicated by content.
    let string_start = writer.stream_position()?;
    data_size_patch.set(&mut writer, ENDIAN, (string_start - data_start) as u32)?;
    let mut cache: IndexMap<&str, u64> = IndexMap::new();
    for record in &params {
        let Ok(text) = record.param.as_str() else {
            continue;
        };
        let value_pos = match cache.get(text) {
            Some(&pos) => pos,
            None => {
                pad_to(&mut writer, 4, 0)?;
                let pos = writer.stream_position()?;
                writer.write_all(text.as_bytes())?;
                writer.write_all(&[0])?;
                cache.insert(text, pos);
                pos
            }
        };
        let field = rel24(record.entry_pos, value_pos)? | u32::from(record.param.type_tag()) << 24;
        record.data_patch.set(&mut writer, ENDIAN, field)?;
    }
    pad_to(&mut writer, 4, 0)?;

    let end = writer.stream_position()?;
    string_size_patch.set(&mut writer, ENDIAN, (end - string_start) as u32)?;
    file_size_patch.set(&mut writer, ENDIAN, end as u32)?;
    Ok(writer.into_inner())
}

fn write_list_entry<'a, W: Write + Seek>(
    writer: &mut W,
    name: Name,
    list: &'a ParameterList,
) -> Result<ListRecord<'a>> {
    let entry_pos = writer.stream_position()?;
    name.0.write_options(writer, ENDIAN, ())?;
    let lists_patch = Patch16::new(writer, ENDIAN)?;
    (list.lists.len() as u16).write_options(writer, ENDIAN, ())?;
    let objects_patch = Patch16::new(writer, ENDIAN)?;
    (list.objects.len() as u16).write_options(writer, ENDIAN, ())?;
    Ok(ListRecord {
        entry_pos,
        lists_patch,
        objects_patch,
        list,
    })
}

/// Writes one parameter's bytes and returns the position its entry
/// should point at (past the length prefix for buffers).
fn write_parameter_data<W: Write + Seek>(writer: &mut W, param: &Parameter) -> Result<u64> {
    let pos = writer.stream_position()?;
    match param {
        Parameter::Bool(value) => {
            u32::from(*value).write_options(writer, ENDIAN, ())?;
        }
        Parameter::Float(value) => {
            value.write_options(writer, ENDIAN, ())?;
        }
        Parameter::Int(value) => {
            value.write_options(writer, ENDIAN, ())?;
        }
        Parameter::U32(value) => {
            value.write_options(writer, ENDIAN, ())?;
        }
        Parameter::Vec2(value) => {
            [value.x, value.y].write_options(writer, ENDIAN, ())?;
        }
        Parameter::Vec3(value) => {
            [value.x, value.y, value.z].write_options(writer, ENDIAN, ())?;
        }
        Parameter::Vec4(value) => {
            [value.x, value.y, value.z, value.t].write_options(writer, ENDIAN, ())?;
        }
        Parameter::Color(value) => {
            [value.r, value.g, value.b, value.a].write_options(writer, ENDIAN, ())?;
        }
        Parameter::Quat(value) => {
            [value.a, value.b, value.c, value.d].write_options(writer, ENDIAN, ())?;
        }
        Parameter::Curve1(curves) => write_curves(writer, &curves[..])?,
        Parameter::Curve2(curves) => write_curves(writer, &curves[..])?,
        Parameter::Curve3(curves) => write_curves(writer, &curves[..])?,
        Parameter::Curve4(curves) => write_curves(writer, &curves[..])?,
        Parameter::BufferInt(values) => {
            (values.len() as u32).write_options(writer, ENDIAN, ())?;
            let pos = writer.stream_position()?;
            values.write_options(writer, ENDIAN, ())?;
            return Ok(pos);
        }
        Parameter::BufferF32(values) => {
            (values.len() as u32).write_options(writer, ENDIAN, ())?;
            let pos = writer.stream_position()?;
            values.write_options(writer, ENDIAN, ())?;
            return Ok(pos);
        }
        Parameter::BufferU32(values) => {
            (values.len() as u32).write_options(writer, ENDIAN, ())?;
            let pos = writer.stream_position()?;
            values.write_options(writer, ENDIAN, ())?;
            return Ok(pos);
        }
        Parameter::BufferBinary(values) => {
            (values.len() as u32).write_options(writer, ENDIAN, ())?;
            let pos = writer.stream_position()?;
            writer.write_all(values)?;
            return Ok(pos);
        }
        Parameter::String32(_)
        | Parameter::String64(_)
        | Parameter::String256(_)
        | Parameter::StringRef(_) => unreachable!("strings are written to the string section"),
    }
    Ok(pos)
}

fn write_curves<W: Write + Seek>(writer: &mut W, curves: &[Curve]) -> Result<()> {
    for curve in curves {
        curve.a.write_options(writer, ENDIAN, ())?;
        curve.b.write_options(writer, ENDIAN, ())?;
        curve.floats.write_options(writer, ENDIAN, ())?;
    }
    Ok(())
}

fn count(list: &ParameterList) -> (u32, u32, u32) {
    let mut lists = 1;
    let mut objects = list.objects.len() as u32;
    let mut params = list
        .objects
        .values()
        .map(|object| object.params.len() as u32)
        .sum::<u32>();
    for child in list.lists.values() {
        let (l, o, p) = count(child);
        lists += l;
        objects += o;
        params += p;
    }
    (lists, objects, params)
}

fn rel16(from: u64, to: u64) -> Result<u16> {
    u16::try_from((to - from) / 4)
        .map_err(|_| Error::invalid("relative offset does not fit in a list or object entry"))
}

fn rel24(from: u64, to: u64) -> Result<u32> {
    let value = (to - from) / 4;
    if value > 0x00FF_FFFF {
        return Err(Error::invalid(
            "relative offset does not fit in a parameter entry",
        ));
    }
    Ok(value as u32)
}
