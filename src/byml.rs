//! Generic tree documents in `.byml`, `.bgdata`, `.mubin`, and similar
//! files.
//!
//! A document is a tree of [Byml] nodes: primitives, arrays, and
//! string-keyed hashes. The binary container stores both endiannesses
//! (`BY` magic on Wii U, `YB` on Switch) and versions 1 through 4; the
//! text form is tagged YAML.
//!
//! ```
//! use botw_lib::byml::Byml;
//! use botw_lib::Endian;
//!
//! let mut hash = botw_lib::byml::Hash::default();
//! hash.insert("IsHard".to_string(), Byml::Bool(true));
//! let doc = Byml::Hash(hash);
//! let binary = doc.to_binary(Endian::Little, 2).unwrap();
//! assert_eq!(Byml::from_binary(&binary).unwrap(), doc);
//! ```
use indexmap::IndexMap;

use crate::{Endian, Error, Result};

mod reader;
mod text;
mod writer;

/// A string-keyed map node. Iteration follows insertion order.
pub type Hash = IndexMap<String, Byml>;

// 1-byte node tags used by the binary format.
pub(crate) mod tag {
    pub const STRING: u8 = 0xA0;
    pub const ARRAY: u8 = 0xC0;
    pub const HASH: u8 = 0xC1;
    pub const STRING_TABLE: u8 = 0xC2;
    pub const BOOL: u8 = 0xD0;
    pub const INT: u8 = 0xD1;
    pub const FLOAT: u8 = 0xD2;
    pub const UINT: u8 = 0xD3;
    pub const INT64: u8 = 0xD4;
    pub const UINT64: u8 = 0xD5;
    pub const DOUBLE: u8 = 0xD6;
    pub const NULL: u8 = 0xFF;
}

/// A BYML document node.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Byml {
    #[default]
    Null,
    String(String),
    Array(Vec<Byml>),
    Hash(Hash),
    Bool(bool),
    Int(i32),
    Float(f32),
    UInt(u32),
    Int64(i64),
    UInt64(u64),
    Double(f64),
}

impl Byml {
    /// Loads a document from binary data.
    pub fn from_binary(data: &[u8]) -> Result<Byml> {
        reader::from_binary(data)
    }

    /// Serializes the document with the given endianness and version
    /// (1 through 4). The root must be Null, an Array, or a Hash.
    pub fn to_binary(&self, endian: Endian, version: u16) -> Result<Vec<u8>> {
        writer::to_binary(self, endian, version)
    }

    /// Loads a document from YAML text.
    pub fn from_text(text: &str) -> Result<Byml> {
        text::from_text(text)
    }

    /// Serializes the document to YAML. The root must be Null, an Array,
    /// or a Hash.
    pub fn to_text(&self) -> Result<String> {
        text::to_text(self)
    }

    pub(crate) fn type_name(&self) -> &'static str {
        match self {
            Byml::Null => "null",
            Byml::String(_) => "a string",
            Byml::Array(_) => "an array",
            Byml::Hash(_) => "a hash",
            Byml::Bool(_) => "a bool",
            Byml::Int(_) => "an int",
            Byml::Float(_) => "a float",
            Byml::UInt(_) => "a uint",
            Byml::Int64(_) => "an int64",
            Byml::UInt64(_) => "a uint64",
            Byml::Double(_) => "a double",
        }
    }

    pub(crate) fn type_tag(&self) -> u8 {
        match self {
            Byml::Null => tag::NULL,
            Byml::String(_) => tag::STRING,
            Byml::Array(_) => tag::ARRAY,
            Byml::Hash(_) => tag::HASH,
            Byml::Bool(_) => tag::BOOL,
            Byml::Int(_) => tag::INT,
            Byml::Float(_) => tag::FLOAT,
            Byml::UInt(_) => tag::UINT,
            Byml::Int64(_) => tag::INT64,
            Byml::UInt64(_) => tag::UINT64,
            Byml::Double(_) => tag::DOUBLE,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Byml::Array(_) | Byml::Hash(_))
    }

    pub fn as_hash(&self) -> Result<&Hash> {
        match self {
            Byml::Hash(hash) => Ok(hash),
            other => Err(other.mismatch("a hash")),
        }
    }

    pub fn as_hash_mut(&mut self) -> Result<&mut Hash> {
        match self {
            Byml::Hash(hash) => Ok(hash),
            other => Err(other.mismatch("a hash")),
        }
    }

    pub fn as_array(&self) -> Result<&[Byml]> {
        match self {
            Byml::Array(array) => Ok(array),
            other => Err(other.mismatch("an array")),
        }
    }

    pub fn as_array_mut(&mut self) -> Result<&mut Vec<Byml>> {
        match self {
            Byml::Array(array) => Ok(array),
            other => Err(other.mismatch("an array")),
        }
    }

    pub fn as_string(&self) -> Result<&str> {
        match self {
            Byml::String(string) => Ok(string),
            other => Err(other.mismatch("a string")),
        }
    }

    pub fn as_bool(&self) -> Result<bool> {
        match self {
            Byml::Bool(value) => Ok(*value),
            other => Err(other.mismatch("a bool")),
        }
    }

    // The numeric getters mirror the conversions Nintendo's own library
    // performs: a wider stored integer converts when it fits.

    pub fn as_int(&self) -> Result<i32> {
        match self {
            Byml::Int(value) => Ok(*value),
            Byml::UInt(value) => i32::try_from(*value).map_err(|_| Error::OutOfRange("i32")),
            Byml::Int64(value) => i32::try_from(*value).map_err(|_| Error::OutOfRange("i32")),
            Byml::UInt64(value) => i32::try_from(*value).map_err(|_| Error::OutOfRange("i32")),
            other => Err(other.mismatch("an int")),
        }
    }

    pub fn as_uint(&self) -> Result<u32> {
        match self {
            Byml::UInt(value) => Ok(*value),
            Byml::Int(value) => u32::try_from(*value).map_err(|_| Error::OutOfRange("u32")),
            Byml::Int64(value) => u32::try_from(*value).map_err(|_| Error::OutOfRange("u32")),
            Byml::UInt64(value) => u32::try_from(*value).map_err(|_| Error::OutOfRange("u32")),
            other => Err(other.mismatch("a uint")),
        }
    }

    pub fn as_int64(&self) -> Result<i64> {
        match self {
            Byml::Int64(value) => Ok(*value),
            Byml::Int(value) => Ok(i64::from(*value)),
            Byml::UInt(value) => Ok(i64::from(*value)),
            Byml::UInt64(value) => i64::try_from(*value).map_err(|_| Error::OutOfRange("i64")),
            other => Err(other.mismatch("an int64")),
        }
    }

    pub fn as_uint64(&self) -> Result<u64> {
        match self {
            Byml::UInt64(value) => Ok(*value),
            Byml::UInt(value) => Ok(u64::from(*value)),
            Byml::Int(value) => u64::try_from(*value).map_err(|_| Error::OutOfRange("u64")),
            Byml::Int64(value) => u64::try_from(*value).map_err(|_| Error::OutOfRange("u64")),
            other => Err(other.mismatch("a uint64")),
        }
    }

    pub fn as_float(&self) -> Result<f32> {
        match self {
            Byml::Float(value) => Ok(*value),
            other => Err(other.mismatch("a float")),
        }
    }

    pub fn as_double(&self) -> Result<f64> {
        match self {
            Byml::Double(value) => Ok(*value),
            Byml::Float(value) => Ok(f64::from(*value)),
            other => Err(other.mismatch("a double")),
        }
    }

    fn mismatch(&self, expected: &'static str) -> Error {
        Error::TypeMismatch {
            expected,
            actual: self.type_name(),
        }
    }
}

impl From<bool> for Byml {
    fn from(value: bool) -> Self {
        Byml::Bool(value)
    }
}

impl From<i32> for Byml {
    fn from(value: i32) -> Self {
        Byml::Int(value)
    }
}

impl From<u32> for Byml {
    fn from(value: u32) -> Self {
        Byml::UInt(value)
    }
}

impl From<i64> for Byml {
    fn from(value: i64) -> Self {
        Byml::Int64(value)
    }
}

impl From<u64> for Byml {
    fn from(value: u64) -> Self {
        Byml::UInt64(value)
    }
}

impl From<f32> for Byml {
    fn from(value: f32) -> Self {
        Byml::Float(value)
    }
}

impl From<f64> for Byml {
    fn from(value: f64) -> Self {
        Byml::Double(value)
    }
}

impl From<&str> for Byml {
    fn from(value: &str) -> Self {
        Byml::String(value.to_string())
    }
}

impl From<String> for Byml {
    fn from(value: String) -> Self {
        Byml::String(value)
    }
}

impl From<Vec<Byml>> for Byml {
    fn from(value: Vec<Byml>) -> Self {
        Byml::Array(value)
    }
}

impl From<Hash> for Byml {
    fn from(value: Hash) -> Self {
        Byml::Hash(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converting_getters() {
        assert_eq!(Byml::Int(-3).as_int().unwrap(), -3);
        assert_eq!(Byml::UInt64(12).as_int().unwrap(), 12);
        assert!(matches!(
            Byml::UInt(u32::MAX).as_int(),
            Err(Error::OutOfRange("i32"))
        ));
        assert!(matches!(
            Byml::Int(-1).as_uint64(),
            Err(Error::OutOfRange("u64"))
        ));
        assert_eq!(Byml::Float(1.5).as_double().unwrap(), 1.5);
        assert!(matches!(
            Byml::Bool(true).as_int(),
            Err(Error::TypeMismatch { .. })
        ));
    }
}
