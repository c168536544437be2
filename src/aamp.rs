//! Parameter archives in `.baiprog`, `.bphysics`, `.bxml`, and the other
//! binary `b*` configuration files.
//!
//! A [ParameterIO] is a three-level tree: lists contain lists and
//! objects, objects contain [Parameter] values. Every key is the CRC32
//! hash of its original name ([Name]); the names themselves are not
//! stored in the binary format, so the text codec recovers them through
//! [names::NameTable].
//!
//! ```
//! use botw_lib::aamp::{Parameter, ParameterIO, Vector3f};
//!
//! let mut pio = ParameterIO::new("xlink");
//! let object = pio.param_root.objects.entry("TestObj".into()).or_default();
//! object.insert(
//!     "Position",
//!     Parameter::Vec3(Vector3f { x: 1.0, y: 2.0, z: 3.0 }),
//! );
//! let binary = pio.to_binary().unwrap();
//! assert_eq!(ParameterIO::from_binary(&binary).unwrap(), pio);
//! ```
use indexmap::IndexMap;

use crate::{Error, Result};

pub mod names;
mod reader;
mod text;
mod writer;

/// The CRC32 hash of a parameter, object, or list name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(pub u32);

impl From<&str> for Name {
    fn from(name: &str) -> Self {
        Self(crc32fast::hash(name.as_bytes()))
    }
}

impl From<u32> for Name {
    fn from(hash: u32) -> Self {
        Self(hash)
    }
}

/// A string bounded by `N` bytes including its null terminator. The
/// binary format encodes the bound structurally, so these are distinct
/// types from arbitrary strings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FixedSafeString<const N: usize>(String);

impl<const N: usize> FixedSafeString<N> {
    /// Maximum length in bytes, excluding the null terminator.
    pub const MAX_LEN: usize = N - 1;

    pub fn new(value: &str) -> Result<Self> {
        if value.len() > Self::MAX_LEN {
            return Err(Error::OutOfRange("fixed-size string"));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<const N: usize> std::ops::Deref for FixedSafeString<N> {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl<const N: usize> std::fmt::Display for FixedSafeString<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2f {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3f {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector4f {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub t: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Quatf {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color4f {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// One animation curve: two header values and 30 floats.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    pub a: u32,
    pub b: u32,
    pub floats: [f32; 30],
}

impl Default for Curve {
    fn default() -> Self {
        Self {
            a: 0,
            b: 0,
            floats: [0.0; 30],
        }
    }
}

/// A parameter value. The variant determines the 1-byte type tag shared
/// by the binary and text formats.
#[derive(Debug, Clone, PartialEq)]
pub enum Parameter {
    Bool(bool),
    Float(f32),
    Int(i32),
    Vec2(Vector2f),
    Vec3(Vector3f),
    Vec4(Vector4f),
    Color(Color4f),
    String32(FixedSafeString<32>),
    String64(FixedSafeString<64>),
    Curve1(Box<[Curve; 1]>),
    Curve2(Box<[Curve; 2]>),
    Curve3(Box<[Curve; 3]>),
    Curve4(Box<[Curve; 4]>),
    BufferInt(Vec<i32>),
    BufferF32(Vec<f32>),
    String256(FixedSafeString<256>),
    Quat(Quatf),
    U32(u32),
    BufferU32(Vec<u32>),
    BufferBinary(Vec<u8>),
    StringRef(String),
}

impl Parameter {
    /// The 1-byte type tag used by the binary format.
    pub fn type_tag(&self) -> u8 {
        match self {
            Parameter::Bool(_) => 0,
            Parameter::Float(_) => 1,
            Parameter::Int(_) => 2,
            Parameter::Vec2(_) => 3,
            Parameter::Vec3(_) => 4,
            Parameter::Vec4(_) => 5,
            Parameter::Color(_) => 6,
            Parameter::String32(_) => 7,
            Parameter::String64(_) => 8,
            Parameter::Curve1(_) => 9,
            Parameter::Curve2(_) => 10,
            Parameter::Curve3(_) => 11,
            Parameter::Curve4(_) => 12,
            Parameter::BufferInt(_) => 13,
            Parameter::BufferF32(_) => 14,
            Parameter::String256(_) => 15,
            Parameter::Quat(_) => 16,
            Parameter::U32(_) => 17,
            Parameter::BufferU32(_) => 18,
            Parameter::BufferBinary(_) => 19,
            Parameter::StringRef(_) => 20,
        }
    }

    pub(crate) fn type_name(&self) -> &'static str {
        match self {
            Parameter::Bool(_) => "a bool",
            Parameter::Float(_) => "a float",
            Parameter::Int(_) => "an int",
            Parameter::Vec2(_) => "a vec2",
            Parameter::Vec3(_) => "a vec3",
            Parameter::Vec4(_) => "a vec4",
            Parameter::Color(_) => "a color",
            Parameter::String32(_) => "a str32",
            Parameter::String64(_) => "a str64",
            Parameter::Curve1(_) => "a curve",
            Parameter::Curve2(_) => "curves",
            Parameter::Curve3(_) => "curves",
            Parameter::Curve4(_) => "curves",
            Parameter::BufferInt(_) => "an int buffer",
            Parameter::BufferF32(_) => "a float buffer",
            Parameter::String256(_) => "a str256",
            Parameter::Quat(_) => "a quat",
            Parameter::U32(_) => "a u32",
            Parameter::BufferU32(_) => "a u32 buffer",
            Parameter::BufferBinary(_) => "a binary buffer",
            Parameter::StringRef(_) => "a string",
        }
    }

    /// Returns `true` for the four string variants.
    pub fn is_string(&self) -> bool {
        matches!(
            self,
            Parameter::String32(_)
                | Parameter::String64(_)
                | Parameter::String256(_)
                | Parameter::StringRef(_)
        )
    }

    pub fn as_bool(&self) -> Result<bool> {
        match self {
            Parameter::Bool(value) => Ok(*value),
            other => Err(other.mismatch("a bool")),
        }
    }

    pub fn as_int(&self) -> Result<i32> {
        match self {
            Parameter::Int(value) => Ok(*value),
            other => Err(other.mismatch("an int")),
        }
    }

    pub fn as_u32(&self) -> Result<u32> {
        match self {
            Parameter::U32(value) => Ok(*value),
            other => Err(other.mismatch("a u32")),
        }
    }

    pub fn as_float(&self) -> Result<f32> {
        match self {
            Parameter::Float(value) => Ok(*value),
            other => Err(other.mismatch("a float")),
        }
    }

    /// Borrows the contents of any of the string variants.
    pub fn as_str(&self) -> Result<&str> {
        match self {
            Parameter::String32(value) => Ok(value),
            Parameter::String64(value) => Ok(value),
            Parameter::String256(value) => Ok(value),
            Parameter::StringRef(value) => Ok(value),
            other => Err(other.mismatch("a string")),
        }
    }

    pub fn as_vec2(&self) -> Result<&Vector2f> {
        match self {
            Parameter::Vec2(value) => Ok(value),
            other => Err(other.mismatch("a vec2")),
        }
    }

    pub fn as_vec3(&self) -> Result<&Vector3f> {
        match self {
            Parameter::Vec3(value) => Ok(value),
            other => Err(other.mismatch("a vec3")),
        }
    }

    pub fn as_vec4(&self) -> Result<&Vector4f> {
        match self {
            Parameter::Vec4(value) => Ok(value),
            other => Err(other.mismatch("a vec4")),
        }
    }

    pub fn as_color(&self) -> Result<&Color4f> {
        match self {
            Parameter::Color(value) => Ok(value),
            other => Err(other.mismatch("a color")),
        }
    }

    pub fn as_quat(&self) -> Result<&Quatf> {
        match self {
            Parameter::Quat(value) => Ok(value),
            other => Err(other.mismatch("a quat")),
        }
    }

    /// Borrows the curves of any of the curve variants.
    pub fn as_curves(&self) -> Result<&[Curve]> {
        match self {
            Parameter::Curve1(curves) => Ok(&curves[..]),
            Parameter::Curve2(curves) => Ok(&curves[..]),
            Parameter::Curve3(curves) => Ok(&curves[..]),
            Parameter::Curve4(curves) => Ok(&curves[..]),
            other => Err(other.mismatch("curves")),
        }
    }

    fn mismatch(&self, expected: &'static str) -> Error {
        Error::TypeMismatch {
            expected,
            actual: self.type_name(),
        }
    }
}

/// An ordered map of parameters keyed by name hash.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParameterObject {
    pub params: IndexMap<Name, Parameter>,
}

impl ParameterObject {
    pub fn get(&self, name: impl Into<Name>) -> Option<&Parameter> {
        self.params.get(&name.into())
    }

    pub fn insert(&mut self, name: impl Into<Name>, value: Parameter) {
        self.params.insert(name.into(), value);
    }
}

/// A node holding child objects and child lists, both keyed by name hash.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParameterList {
    pub objects: IndexMap<Name, ParameterObject>,
    pub lists: IndexMap<Name, ParameterList>,
}

impl ParameterList {
    pub fn object(&self, name: impl Into<Name>) -> Option<&ParameterObject> {
        self.objects.get(&name.into())
    }

    pub fn list(&self, name: impl Into<Name>) -> Option<&ParameterList> {
        self.lists.get(&name.into())
    }
}

/// A parameter archive document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParameterIO {
    /// Data version, stored in the archive header.
    pub version: u32,
    /// Data type identifier, e.g. `xml` or `xlink`.
    pub io_type: String,
    /// The root list, keyed `param_root` in the text form.
    pub param_root: ParameterList,
}

impl ParameterIO {
    /// The well-known hash of the root list's name.
    pub fn root_key() -> Name {
        Name::from("param_root")
    }

    pub fn new(io_type: &str) -> Self {
        Self {
            version: 0,
            io_type: io_type.to_string(),
            param_root: ParameterList::default(),
        }
    }

    /// Loads a document from binary data.
    pub fn from_binary(data: &[u8]) -> Result<ParameterIO> {
        reader::from_binary(data)
    }

    /// Serializes the document to the v2 binary format.
    pub fn to_binary(&self) -> Result<Vec<u8>> {
        writer::to_binary(self)
    }

    /// Loads a document from YAML text.
    pub fn from_text(text: &str) -> Result<ParameterIO> {
        text::from_text(text)
    }

    /// Serializes the document to YAML, recovering names through the
    /// process-wide default [names::NameTable].
    pub fn to_text(&self) -> Result<String> {
        let table = names::get_default_name_table();
        let mut table = table.lock().unwrap_or_else(|poison| poison.into_inner());
        Ok(text::to_text(self, &mut table))
    }

    /// Serializes the document to YAML with a caller-supplied name table.
    pub fn to_text_with_table(&self, table: &mut names::NameTable) -> Result<String> {
        Ok(text::to_text(self, table))
    }
}
