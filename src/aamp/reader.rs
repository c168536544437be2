//! AAMP binary parsing.
//!
//! Archives are always little-endian. Table entries address their
//! children with offsets relative to the entry itself, divided by 4.
use std::io::Cursor;

use binrw::BinRead;
use log::trace;

use crate::{Endian, Error, Result};

use super::{
    Color4f, Curve, FixedSafeString, Name, Parameter, ParameterIO, ParameterList, ParameterObject,
    Quatf, Vector2f, Vector3f, Vector4f,
};

const HEADER_SIZE: u64 = 0x30;
const MAX_DEPTH: usize = 128;
const ENDIAN: Endian = Endian::Little;

pub(crate) fn from_binary(data: &[u8]) -> Result<ParameterIO> {
    if data.len() < HEADER_SIZE as usize {
        return Err(Error::invalid("truncated header"));
    }
    if &data[0..4] != b"AAMP" {
        return Err(Error::invalid(format!("bad magic: {:02X?}", &data[0..4])));
    }
    let mut cursor = Cursor::new(data);
    cursor.set_position(4);
    let version = u32::read_options(&mut cursor, ENDIAN, ())?;
    if version != 2 {
        return Err(Error::invalid(format!("unsupported version: {version}")));
    }
    let flags = u32::read_options(&mut cursor, ENDIAN, ())?;
    if flags & 1 == 0 {
        return Err(Error::invalid(
            "big-endian parameter archives are not supported",
        ));
    }
    let file_size = u32::read_options(&mut cursor, ENDIAN, ())? as u64;
    if file_size < HEADER_SIZE || file_size > data.len() as u64 {
        return Err(Error::invalid("file size out of bounds"));
    }
    let pio_version = u32::read_options(&mut cursor, ENDIAN, ())?;
    let pio_offset = u32::read_options(&mut cursor, ENDIAN, ())?;
    // The count and section size fields are redundant with the tables
    // themselves and are recomputed on write.

    let mut reader = Reader {
        cursor,
        limit: file_size,
    };
    let io_type = reader.read_string_at(HEADER_SIZE)?;
    let (root_name, param_root) = reader.read_list(HEADER_SIZE + pio_offset as u64, 0)?;
    if root_name != ParameterIO::root_key() {
        trace!("root list has an unexpected name hash: {:#010x}", root_name.0);
    }
    Ok(ParameterIO {
        version: pio_version,
        io_type,
        param_root,
    })
}

struct Reader<'a> {
    cursor: Cursor<&'a [u8]>,
    limit: u64,
}

impl Reader<'_> {
    fn check(&self, offset: u64, size: u64) -> Result<()> {
        if offset + size > self.limit {
            return Err(Error::invalid(format!("offset {offset:#x} out of bounds")));
        }
        Ok(())
    }

    fn read_u16_at(&mut self, offset: u64) -> Result<u16> {
        self.check(offset, 2)?;
        self.cursor.set_position(offset);
        Ok(u16::read_options(&mut self.cursor, ENDIAN, ())?)
    }

    fn read_u32_at(&mut self, offset: u64) -> Result<u32> {
        self.check(offset, 4)?;
        self.cursor.set_position(offset);
        Ok(u32::read_options(&mut self.cursor, ENDIAN, ())?)
    }

    fn read_f32_at(&mut self, offset: u64) -> Result<f32> {
        Ok(f32::from_bits(self.read_u32_at(offset)?))
    }

    /// Reads a null-terminated UTF-8 string.
    fn read_string_at(&mut self, offset: u64) -> Result<String> {
        self.check(offset, 1)?;
        let data = &self.cursor.get_ref()[offset as usize..self.limit as usize];
        let len = data
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| Error::invalid("unterminated string"))?;
        let text = std::str::from_utf8(&data[..len])
            .map_err(|_| Error::invalid("string is not valid UTF-8"))?;
        Ok(text.to_string())
    }

    fn read_fixed_string_at<const N: usize>(&mut self, offset: u64) -> Result<FixedSafeString<N>> {
        let text = self.read_string_at(offset)?;
        FixedSafeString::new(&text)
            .map_err(|_| Error::invalid(format!("string is longer than {} bytes", N - 1)))
    }

    fn read_list(&mut self, offset: u64, depth: usize) -> Result<(Name, ParameterList)> {
        if depth >= MAX_DEPTH {
            return Err(Error::invalid("maximum recursion depth exceeded"));
        }
        self.check(offset, 12)?;
        let name = self.read_u32_at(offset)?;
        let lists_rel = self.read_u16_at(offset + 4)? as u64;
        let num_lists = self.read_u16_at(offset + 6)? as usize;
        let objects_rel = self.read_u16_at(offset + 8)? as u64;
        let num_objects = self.read_u16_at(offset + 10)? as usize;
        trace!("list {name:#010x}: {num_lists} lists, {num_objects} objects");

        let mut list = ParameterList::default();
        let lists_base = offset + lists_rel * 4;
        for i in 0..num_lists {
            let (child_name, child) = self.read_list(lists_base + i as u64 * 12, depth + 1)?;
            if list.lists.insert(child_name, child).is_some() {
                return Err(Error::invalid(format!(
                    "duplicate list name hash: {:#010x}",
                    child_name.0
                )));
            }
        }
        let objects_base = offset + objects_rel * 4;
        for i in 0..num_objects {
            let (child_name, child) = self.read_object(objects_base + i as u64 * 8)?;
            if list.objects.insert(child_name, child).is_some() {
                return Err(Error::invalid(format!(
                    "duplicate object name hash: {:#010x}",
                    child_name.0
                )));
            }
        }
        Ok((Name(name), list))
    }

    fn read_object(&mut self, offset: u64) -> Result<(Name, ParameterObject)> {
        self.check(offset, 8)?;
        let name = self.read_u32_at(offset)?;
        let params_rel = self.read_u16_at(offset + 4)? as u64;
        let num_params = self.read_u16_at(offset + 6)? as usize;

        let mut object = ParameterObject::default();
        let params_base = offset + params_rel * 4;
        for i in 0..num_params {
            let (child_name, child) = self.read_parameter(params_base + i as u64 * 8)?;
            if object.params.insert(child_name, child).is_some() {
                return Err(Error::invalid(format!(
                    "duplicate parameter name hash: {:#010x}",
                    child_name.0
                )));
            }
        }
        Ok((Name(name), object))
    }

    fn read_parameter(&mut self, offset: u64) -> Result<(Name, Parameter)> {
        self.check(offset, 8)?;
        let name = self.read_u32_at(offset)?;
        let field = self.read_u32_at(offset + 4)?;
        let data_rel = (field & 0x00FF_FFFF) as u64;
        let type_tag = (field >> 24) as u8;
        let pos = offset + data_rel * 4;

        let value = match type_tag {
            0 => Parameter::Bool(self.read_u32_at(pos)? != 0),
            1 => Parameter::Float(self.read_f32_at(pos)?),
            2 => Parameter::Int(self.read_u32_at(pos)? as i32),
            3 => Parameter::Vec2(Vector2f {
                x: self.read_f32_at(pos)?,
                y: self.read_f32_at(pos + 4)?,
            }),
            4 => Parameter::Vec3(Vector3f {
                x: self.read_f32_at(pos)?,
                y: self.read_f32_at(pos + 4)?,
                z: self.read_f32_at(pos + 8)?,
            }),
            5 => Parameter::Vec4(Vector4f {
                x: self.read_f32_at(pos)?,
                y: self.read_f32_at(pos + 4)?,
                z: self.read_f32_at(pos + 8)?,
                t: self.read_f32_at(pos + 12)?,
            }),
            6 => Parameter::Color(Color4f {
                r: self.read_f32_at(pos)?,
                g: self.read_f32_at(pos + 4)?,
                b: self.read_f32_at(pos + 8)?,
                a: self.read_f32_at(pos + 12)?,
            }),
            7 => Parameter::String32(self.read_fixed_string_at(pos)?),
            8 => Parameter::String64(self.read_fixed_string_at(pos)?),
            9 => Parameter::Curve1(Box::new([self.read_curve(pos)?])),
            10 => Parameter::Curve2(Box::new([
                self.read_curve(pos)?,
                self.read_curve(pos + 128)?,
            ])),
            11 => Parameter::Curve3(Box::new([
                self.read_curve(pos)?,
                self.read_curve(pos + 128)?,
                self.read_curve(pos + 256)?,
            ])),
            12 => Parameter::Curve4(Box::new([
                self.read_curve(pos)?,
                self.read_curve(pos + 128)?,
                self.read_curve(pos + 256)?,
                self.read_curve(pos + 384)?,
            ])),
            13 => {
                let len = self.read_buffer_len(pos)?;
                self.check(pos, len * 4)?;
                let mut values = Vec::with_capacity(len as usize);
                for i in 0..len {
                    values.push(self.read_u32_at(pos + i * 4)? as i32);
                }
                Parameter::BufferInt(values)
            }
            14 => {
                let len = self.read_buffer_len(pos)?;
                self.check(pos, len * 4)?;
                let mut values = Vec::with_capacity(len as usize);
                for i in 0..len {
                    values.push(self.read_f32_at(pos + i * 4)?);
                }
                Parameter::BufferF32(values)
            }
            15 => Parameter::String256(self.read_fixed_string_at(pos)?),
            16 => Parameter::Quat(Quatf {
                a: self.read_f32_at(pos)?,
                b: self.read_f32_at(pos + 4)?,
                c: self.read_f32_at(pos + 8)?,
                d: self.read_f32_at(pos + 12)?,
            }),
            17 => Parameter::U32(self.read_u32_at(pos)?),
            18 => {
                let len = self.read_buffer_len(pos)?;
                self.check(pos, len * 4)?;
                let mut values = Vec::with_capacity(len as usize);
                for i in 0..len {
                    values.push(self.read_u32_at(pos + i * 4)?);
                }
                Parameter::BufferU32(values)
            }
            19 => {
                let len = self.read_buffer_len(pos)?;
                self.check(pos, len)?;
                let data = self.cursor.get_ref();
                Parameter::BufferBinary(data[pos as usize..(pos + len) as usize].to_vec())
            }
            other => {
                return Err(Error::invalid(format!("unknown parameter type {other}")));
            }
        };
        Ok((Name(name), value))
    }

    fn read_curve(&mut self, pos: u64) -> Result<Curve> {
        self.check(pos, 128)?;
        let mut curve = Curve {
            a: self.read_u32_at(pos)?,
            b: self.read_u32_at(pos + 4)?,
            ..Curve::default()
        };
        for i in 0..curve.floats.len() {
            curve.floats[i] = self.read_f32_at(pos + 8 + i as u64 * 4)?;
        }
        Ok(curve)
    }

    /// Buffers store their length right before the pointed-to data.
    fn read_buffer_len(&mut self, pos: u64) -> Result<u64> {
        if pos < 4 {
            return Err(Error::invalid("buffer offset out of bounds"));
        }
        Ok(self.read_u32_at(pos - 4)? as u64)
    }
}
