//! Two-pass write helpers shared by the binary emitters.
//!
//! Both formats interleave fixed-size entries with offsets to data that is
//! only placed later in the file. Emitters write a zeroed placeholder,
//! remember its position, and patch it once the pointed-to data has been
//! written, keeping a single forward-moving write head.
use std::io::{Seek, SeekFrom, Write};

use binrw::{BinResult, BinWrite, Endian};

pub(crate) const fn round_up(x: u64, n: u64) -> u64 {
    ((x + n - 1) / n) * n
}

/// Pads the writer with `byte` up to the next multiple of `align`.
pub(crate) fn pad_to<W: Write + Seek>(writer: &mut W, align: u64, byte: u8) -> BinResult<()> {
    let pos = writer.stream_position()?;
    let padding = round_up(pos, align) - pos;
    writer.write_all(&vec![byte; padding as usize])?;
    Ok(())
}

pub(crate) fn write_u24<W: Write + Seek>(
    writer: &mut W,
    endian: Endian,
    value: u32,
) -> BinResult<()> {
    let bytes = value.to_le_bytes();
    match endian {
        Endian::Little => writer.write_all(&bytes[..3])?,
        Endian::Big => writer.write_all(&[bytes[2], bytes[1], bytes[0]])?,
    }
    Ok(())
}

/// A placeholder u32 written as zero and patched once the target is placed.
pub(crate) struct Patch32 {
    position: u64,
}

impl Patch32 {
    pub fn new<W: Write + Seek>(writer: &mut W, endian: Endian) -> BinResult<Self> {
        let position = writer.stream_position()?;
        0u32.write_options(writer, endian, ())?;
        Ok(Self { position })
    }

    /// Writes `value` at the recorded position, preserving the write head.
    pub fn set<W: Write + Seek>(&self, writer: &mut W, endian: Endian, value: u32) -> BinResult<()> {
        let saved_pos = writer.stream_position()?;
        writer.seek(SeekFrom::Start(self.position))?;
        value.write_options(writer, endian, ())?;
        writer.seek(SeekFrom::Start(saved_pos))?;
        Ok(())
    }
}

/// A placeholder u16 for the entry-relative offsets in parameter archives.
pub(crate) struct Patch16 {
    position: u64,
}

impl Patch16 {
    pub fn new<W: Write + Seek>(writer: &mut W, endian: Endian) -> BinResult<Self> {
        let position = writer.stream_position()?;
        0u16.write_options(writer, endian, ())?;
        Ok(Self { position })
    }

    pub fn set<W: Write + Seek>(&self, writer: &mut W, endian: Endian, value: u16) -> BinResult<()> {
        let saved_pos = writer.stream_position()?;
        writer.seek(SeekFrom::Start(self.position))?;
        value.write_options(writer, endian, ())?;
        writer.seek(SeekFrom::Start(saved_pos))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn patch_preserves_write_head() {
        let mut writer = Cursor::new(Vec::new());
        let patch = Patch32::new(&mut writer, Endian::Big).unwrap();
        0xFFu8.write_options(&mut writer, Endian::Big, ()).unwrap();
        patch.set(&mut writer, Endian::Big, 0x01020304).unwrap();
        assert_eq!(writer.stream_position().unwrap(), 5);
        assert_eq!(writer.into_inner(), [1, 2, 3, 4, 0xFF]);
    }

    #[test]
    fn u24_both_endians() {
        let mut writer = Cursor::new(Vec::new());
        write_u24(&mut writer, Endian::Big, 0x010203).unwrap();
        write_u24(&mut writer, Endian::Little, 0x010203).unwrap();
        assert_eq!(writer.into_inner(), [1, 2, 3, 3, 2, 1]);
    }

    #[test]
    fn padding() {
        let mut writer = Cursor::new(vec![0xAA; 6]);
        writer.seek(SeekFrom::End(0)).unwrap();
        pad_to(&mut writer, 4, 0).unwrap();
        assert_eq!(writer.into_inner().len(), 8);
    }
}
