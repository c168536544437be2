//! A library for reading and writing Nintendo's BYML and AAMP formats.
//!
//! # Formats
//! [`byml::Byml`] documents are generic trees of primitives, arrays, and
//! string-keyed maps stored in `.byml`, `.bgdata`, `.mubin`, and similar
//! files. [`aamp::ParameterIO`] documents are rigidly typed parameter
//! archives stored in `.baiprog`, `.bphysics`, `.bxml`, and the other
//! `b*` parameter files.
//!
//! *Breath of the Wild* is the most tested game, but the containers are
//! shared across titles on both Wii U (big endian) and Switch (little
//! endian).
//!
//! Both formats round-trip: parsing a file and serializing it again with
//! the same settings produces identical bytes, and each format also
//! converts to and from a tagged YAML representation.
use std::io::{Read, Seek};

use binrw::BinResult;

pub mod aamp;
pub mod byml;
mod error;
mod write;
mod yaml;

pub use binrw::Endian;
pub use error::{Error, Result};

pub(crate) fn read_u24<R: Read + Seek>(reader: &mut R, endian: Endian) -> BinResult<u32> {
    let mut bytes = [0u8; 3];
    reader.read_exact(&mut bytes)?;
    Ok(match endian {
        Endian::Little => {
            u32::from(bytes[0]) | u32::from(bytes[1]) << 8 | u32::from(bytes[2]) << 16
        }
        Endian::Big => u32::from(bytes[2]) | u32::from(bytes[1]) << 8 | u32::from(bytes[0]) << 16,
    })
}

macro_rules! file_read_impl {
    ($($type_name:path),*) => {
        $(
            impl $type_name {
                /// Reads the document from a file on disk.
                pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
                    Self::from_binary(&std::fs::read(path)?)
                }
            }
        )*
    };
}

file_read_impl!(byml::Byml, aamp::ParameterIO);

#[doc(hidden)]
#[macro_export]
macro_rules! assert_hex_eq {
    ($a:expr, $b:expr) => {
        pretty_assertions::assert_str_eq!(hex::encode($a), hex::encode($b))
    };
}
