//! AAMP text (YAML) conversion.
//!
//! The text form renders hashes back to names wherever a
//! [NameTable] lookup or guess succeeds, and falls back to the integer
//! hash otherwise. Values carry custom tags (`!vec3`, `!curve`,
//! `!buffer_u32`, ...) because plain YAML cannot express the parameter
//! types.
use crate::yaml::emit::{emit_document, fmt_f32, string_scalar};
use crate::yaml::parse::{parse_document, parse_scalar};
use crate::yaml::{Node, Scalar, ScalarNode, Style, TagBasedType, Value};
use crate::{Error, Result};

use super::names::NameTable;
use super::{
    Color4f, Curve, FixedSafeString, Name, Parameter, ParameterIO, ParameterList, ParameterObject,
    Quatf, Vector2f, Vector3f, Vector4f,
};

// Scalars per curve in the text form: a, b, then 30 floats.
const CURVE_SCALARS: usize = 32;

pub(crate) fn to_text(pio: &ParameterIO, table: &mut NameTable) -> String {
    // A string value elsewhere in the document is often the original
    // name of a hashed key, so register them all before emitting.
    let mut extra = NameTable::new(false);
    build_extra_name_table(&pio.param_root, &mut extra);

    let entries = vec![
        (
            ScalarNode::plain("version"),
            Node::scalar(ScalarNode::plain(pio.version.to_string())),
        ),
        (
            ScalarNode::plain("type"),
            Node::scalar(string_scalar(&pio.io_type)),
        ),
        (
            ScalarNode::plain("param_root"),
            build_list(
                &pio.param_root,
                ParameterIO::root_key(),
                &mut extra,
                table,
            ),
        ),
    ];
    emit_document(&Node::map(Style::Block, entries).with_tag("!io"))
}

fn build_extra_name_table(list: &ParameterList, extra: &mut NameTable) {
    for object in list.objects.values() {
        for param in object.params.values() {
            if let Ok(text) = param.as_str() {
                extra.add_name_reference(text);
            }
        }
    }
    for child in list.lists.values() {
        build_extra_name_table(child, extra);
    }
}

fn emit_name(
    hash: Name,
    index: usize,
    parent: Name,
    extra: &mut NameTable,
    table: &mut NameTable,
) -> ScalarNode {
    if let Some(found) = extra.get_name(hash.0, index, parent.0) {
        return string_scalar(found);
    }
    if let Some(found) = table.get_name(hash.0, index, parent.0) {
        return string_scalar(found);
    }
    ScalarNode::plain(hash.0.to_string())
}

fn build_list(
    list: &ParameterList,
    name: Name,
    extra: &mut NameTable,
    table: &mut NameTable,
) -> Node {
    let objects = list
        .objects
        .iter()
        .enumerate()
        .map(|(i, (key, object))| {
            (
                emit_name(*key, i, name, extra, table),
                build_object(object, *key, extra, table),
            )
        })
        .collect();
    let lists = list
        .lists
        .iter()
        .enumerate()
        .map(|(i, (key, child))| {
            (
                emit_name(*key, i, name, extra, table),
                build_list(child, *key, extra, table),
            )
        })
        .collect();
    Node::map(
        Style::Block,
        vec![
            (ScalarNode::plain("objects"), Node::map(Style::Block, objects)),
            (ScalarNode::plain("lists"), Node::map(Style::Block, lists)),
        ],
    )
    .with_tag("!list")
}

fn build_object(
    object: &ParameterObject,
    name: Name,
    extra: &mut NameTable,
    table: &mut NameTable,
) -> Node {
    let entries = object
        .params
        .iter()
        .enumerate()
        .map(|(i, (key, param))| {
            (
                emit_name(*key, i, name, extra, table),
                build_parameter(param),
            )
        })
        .collect();
    Node::map(Style::Block, entries).with_tag("!obj")
}

fn build_parameter(param: &Parameter) -> Node {
    match param {
        Parameter::Bool(value) => {
            Node::scalar(ScalarNode::plain(if *value { "true" } else { "false" }))
        }
        Parameter::Float(value) => Node::scalar(ScalarNode::plain(fmt_f32(*value))),
        Parameter::Int(value) => Node::scalar(ScalarNode::plain(value.to_string())),
        Parameter::U32(value) => {
            Node::scalar(ScalarNode::plain(value.to_string())).with_tag("!u")
        }
        Parameter::Vec2(value) => flow_floats(&[value.x, value.y], "!vec2"),
        Parameter::Vec3(value) => flow_floats(&[value.x, value.y, value.z], "!vec3"),
        Parameter::Vec4(value) => flow_floats(&[value.x, value.y, value.z, value.t], "!vec4"),
        Parameter::Color(value) => {
            flow_floats(&[value.r, value.g, value.b, value.a], "!color")
        }
        Parameter::Quat(value) => flow_floats(&[value.a, value.b, value.c, value.d], "!quat"),
        Parameter::String32(value) => Node::scalar(string_scalar(value)).with_tag("!str32"),
        Parameter::String64(value) => Node::scalar(string_scalar(value)).with_tag("!str64"),
        Parameter::String256(value) => Node::scalar(string_scalar(value)).with_tag("!str256"),
        Parameter::StringRef(value) => Node::scalar(string_scalar(value)),
        Parameter::Curve1(curves) => curve_node(&curves[..]),
        Parameter::Curve2(curves) => curve_node(&curves[..]),
        Parameter::Curve3(curves) => curve_node(&curves[..]),
        Parameter::Curve4(curves) => curve_node(&curves[..]),
        Parameter::BufferInt(values) => Node::seq(
            Style::Flow,
            values
                .iter()
                .map(|v| Node::scalar(ScalarNode::plain(v.to_string())))
                .collect(),
        )
        .with_tag("!buffer_int"),
        Parameter::BufferF32(values) => Node::seq(
            Style::Flow,
            values
                .iter()
                .map(|v| Node::scalar(ScalarNode::plain(fmt_f32(*v))))
                .collect(),
        )
        .with_tag("!buffer_f32"),
        Parameter::BufferU32(values) => Node::seq(
            Style::Flow,
            values
                .iter()
                .map(|v| Node::scalar(ScalarNode::plain(v.to_string())))
                .collect(),
        )
        .with_tag("!buffer_u32"),
        Parameter::BufferBinary(values) => Node::seq(
            Style::Flow,
            values
                .iter()
                .map(|v| Node::scalar(ScalarNode::plain(v.to_string())))
                .collect(),
        )
        .with_tag("!buffer_binary"),
    }
}

fn flow_floats(values: &[f32], tag: &str) -> Node {
    Node::seq(
        Style::Flow,
        values
            .iter()
            .map(|v| Node::scalar(ScalarNode::plain(fmt_f32(*v))))
            .collect(),
    )
    .with_tag(tag)
}

fn curve_node(curves: &[Curve]) -> Node {
    let mut items = Vec::with_capacity(curves.len() * CURVE_SCALARS);
    for curve in curves {
        items.push(Node::scalar(ScalarNode::plain(curve.a.to_string())));
        items.push(Node::scalar(ScalarNode::plain(curve.b.to_string())));
        for value in &curve.floats {
            items.push(Node::scalar(ScalarNode::plain(fmt_f32(*value))));
        }
    }
    Node::seq(Style::Flow, items).with_tag("!curve")
}

pub(crate) fn from_text(text: &str) -> Result<ParameterIO> {
    let doc = parse_document(text)?;
    let Value::Map(_, entries) = &doc.value else {
        return Err(Error::invalid("expected a parameter IO mapping"));
    };
    let mut version = None;
    let mut io_type = None;
    let mut param_root = None;
    for (key, value) in entries {
        match key.text.as_str() {
            "version" => version = Some(scalar_u32(value)?),
            "type" => io_type = Some(scalar_string(value)?),
            "param_root" => param_root = Some(read_list(value)?),
            other => {
                return Err(Error::invalid(format!(
                    "unexpected parameter IO key: {other}"
                )))
            }
        }
    }
    Ok(ParameterIO {
        version: version.ok_or_else(|| Error::invalid("missing version"))?,
        io_type: io_type.ok_or_else(|| Error::invalid("missing type"))?,
        param_root: param_root.ok_or_else(|| Error::invalid("missing param_root"))?,
    })
}

fn read_list(node: &Node) -> Result<ParameterList> {
    let Value::Map(_, entries) = &node.value else {
        return Err(Error::invalid("expected a parameter list mapping"));
    };
    let mut list = ParameterList::default();
    let mut seen_objects = false;
    let mut seen_lists = false;
    for (key, value) in entries {
        match key.text.as_str() {
            "objects" => {
                seen_objects = true;
                for (name, child) in map_entries(value)? {
                    let name = parse_name(name)?;
                    if list.objects.insert(name, read_object(child)?).is_some() {
                        return Err(Error::invalid(format!(
                            "duplicate object name hash: {:#010x}",
                            name.0
                        )));
                    }
                }
            }
            "lists" => {
                seen_lists = true;
                for (name, child) in map_entries(value)? {
                    let name = parse_name(name)?;
                    if list.lists.insert(name, read_list(child)?).is_some() {
                        return Err(Error::invalid(format!(
                            "duplicate list name hash: {:#010x}",
                            name.0
                        )));
                    }
                }
            }
            other => {
                return Err(Error::invalid(format!(
                    "unexpected parameter list key: {other}"
                )))
            }
        }
    }
    if !seen_objects || !seen_lists {
        return Err(Error::invalid(
            "a parameter list needs both \"objects\" and \"lists\"",
        ));
    }
    Ok(list)
}

fn read_object(node: &Node) -> Result<ParameterObject> {
    let mut object = ParameterObject::default();
    for (name, child) in map_entries(node)? {
        let name = parse_name(name)?;
        if object.params.insert(name, read_parameter(child)?).is_some() {
            return Err(Error::invalid(format!(
                "duplicate parameter name hash: {:#010x}",
                name.0
            )));
        }
    }
    Ok(object)
}

fn map_entries(node: &Node) -> Result<&[(ScalarNode, Node)]> {
    match &node.value {
        Value::Map(_, entries) => Ok(entries),
        _ => Err(Error::invalid("expected a mapping")),
    }
}

/// Keys are either recovered names or raw integer hashes.
fn parse_name(key: &ScalarNode) -> Result<Name> {
    if !key.plain {
        return Ok(Name::from(key.text.as_str()));
    }
    match parse_scalar(&key.text, false, None)? {
        Scalar::UInt(value) => u32::try_from(value)
            .map(Name)
            .map_err(|_| Error::invalid(format!("name hash out of range: {value}"))),
        _ => Ok(Name::from(key.text.as_str())),
    }
}

fn read_parameter(node: &Node) -> Result<Parameter> {
    match &node.value {
        Value::Seq(_, items) => read_sequence_parameter(node.tag(), items),
        Value::Scalar(scalar) => read_scalar_parameter(node.tag(), scalar),
        Value::Map(..) => Err(Error::invalid("unexpected mapping for a parameter")),
    }
}

fn read_scalar_parameter(tag: Option<&str>, scalar: &ScalarNode) -> Result<Parameter> {
    let hint = match tag {
        Some("!str32" | "!str64" | "!str256") => Some(TagBasedType::Str),
        Some("!u") => Some(TagBasedType::Int),
        Some(other) => {
            return Err(Error::invalid(format!("unexpected scalar tag: {other}")))
        }
        None => None,
    };
    match parse_scalar(&scalar.text, !scalar.plain, hint)? {
        Scalar::Bool(value) => Ok(Parameter::Bool(value)),
        Scalar::Float(value) => Ok(Parameter::Float(value as f32)),
        Scalar::String(value) => Ok(match tag {
            Some("!str32") => Parameter::String32(FixedSafeString::new(&value)?),
            Some("!str64") => Parameter::String64(FixedSafeString::new(&value)?),
            Some("!str256") => Parameter::String256(FixedSafeString::new(&value)?),
            _ => Parameter::StringRef(value),
        }),
        Scalar::UInt(value) => {
            if tag == Some("!u") {
                u32::try_from(value)
                    .map(Parameter::U32)
                    .map_err(|_| Error::OutOfRange("u32"))
            } else {
                i32::try_from(value)
                    .map(Parameter::Int)
                    .map_err(|_| Error::OutOfRange("i32"))
            }
        }
        Scalar::Int(value) => {
            if tag == Some("!u") {
                u32::try_from(value)
                    .map(Parameter::U32)
                    .map_err(|_| Error::OutOfRange("u32"))
            } else {
                i32::try_from(value)
                    .map(Parameter::Int)
                    .map_err(|_| Error::OutOfRange("i32"))
            }
        }
        Scalar::Null => Err(Error::invalid("unexpected null scalar")),
    }
}

fn read_sequence_parameter(tag: Option<&str>, items: &[Node]) -> Result<Parameter> {
    match tag {
        Some("!vec2") => {
            let [x, y] = floats(items)?;
            Ok(Parameter::Vec2(Vector2f { x, y }))
        }
        Some("!vec3") => {
            let [x, y, z] = floats(items)?;
            Ok(Parameter::Vec3(Vector3f { x, y, z }))
        }
        Some("!vec4") => {
            let [x, y, z, t] = floats(items)?;
            Ok(Parameter::Vec4(Vector4f { x, y, z, t }))
        }
        Some("!color") => {
            let [r, g, b, a] = floats(items)?;
            Ok(Parameter::Color(Color4f { r, g, b, a }))
        }
        Some("!quat") => {
            let [a, b, c, d] = floats(items)?;
            Ok(Parameter::Quat(Quatf { a, b, c, d }))
        }
        Some("!curve") => read_curves(items),
        Some("!buffer_int") => items
            .iter()
            .map(scalar_i32)
            .collect::<Result<_>>()
            .map(Parameter::BufferInt),
        Some("!buffer_f32") => items
            .iter()
            .map(scalar_f32)
            .collect::<Result<_>>()
            .map(Parameter::BufferF32),
        Some("!buffer_u32") => items
            .iter()
            .map(scalar_u32)
            .collect::<Result<_>>()
            .map(Parameter::BufferU32),
        Some("!buffer_binary") => items
            .iter()
            .map(scalar_u8)
            .collect::<Result<_>>()
            .map(Parameter::BufferBinary),
        Some(other) => Err(Error::invalid(format!("unexpected sequence tag: {other}"))),
        None => Err(Error::invalid("a parameter sequence needs a tag")),
    }
}

fn read_curves(items: &[Node]) -> Result<Parameter> {
    let count = items.len() / CURVE_SCALARS;
    if items.len() % CURVE_SCALARS != 0 || !(1..=4).contains(&count) {
        return Err(Error::invalid(
            "invalid curve: unexpected number of children",
        ));
    }
    let mut curves = Vec::with_capacity(count);
    for chunk in items.chunks(CURVE_SCALARS) {
        let mut curve = Curve {
            a: scalar_u32(&chunk[0])?,
            b: scalar_u32(&chunk[1])?,
            ..Curve::default()
        };
        for (slot, item) in curve.floats.iter_mut().zip(&chunk[2..]) {
            *slot = scalar_f32(item)?;
        }
        curves.push(curve);
    }
    let mut curves = curves.into_iter();
    let mut next = || curves.next().ok_or_else(|| Error::invalid("curve"));
    Ok(match count {
        1 => Parameter::Curve1(Box::new([next()?])),
        2 => Parameter::Curve2(Box::new([next()?, next()?])),
        3 => Parameter::Curve3(Box::new([next()?, next()?, next()?])),
        _ => Parameter::Curve4(Box::new([next()?, next()?, next()?, next()?])),
    })
}

fn floats<const N: usize>(items: &[Node]) -> Result<[f32; N]> {
    if items.len() != N {
        return Err(Error::invalid("unexpected number of children"));
    }
    let mut values = [0.0; N];
    for (slot, item) in values.iter_mut().zip(items) {
        *slot = scalar_f32(item)?;
    }
    Ok(values)
}

fn number_scalar(node: &Node) -> Result<Scalar> {
    let Value::Scalar(scalar) = &node.value else {
        return Err(Error::invalid("expected a number"));
    };
    parse_scalar(&scalar.text, !scalar.plain, None)
}

fn scalar_f32(node: &Node) -> Result<f32> {
    match number_scalar(node)? {
        Scalar::Float(value) => Ok(value as f32),
        Scalar::Int(value) => Ok(value as f32),
        Scalar::UInt(value) => Ok(value as f32),
        _ => Err(Error::invalid("expected a number")),
    }
}

fn scalar_i32(node: &Node) -> Result<i32> {
    match number_scalar(node)? {
        Scalar::Int(value) => i32::try_from(value).map_err(|_| Error::OutOfRange("i32")),
        Scalar::UInt(value) => i32::try_from(value).map_err(|_| Error::OutOfRange("i32")),
        _ => Err(Error::invalid("expected an integer")),
    }
}

fn scalar_u32(node: &Node) -> Result<u32> {
    match number_scalar(node)? {
        Scalar::UInt(value) => u32::try_from(value).map_err(|_| Error::OutOfRange("u32")),
        Scalar::Int(value) => u32::try_from(value).map_err(|_| Error::OutOfRange("u32")),
        _ => Err(Error::invalid("expected an integer")),
    }
}

fn scalar_u8(node: &Node) -> Result<u8> {
    match number_scalar(node)? {
        Scalar::UInt(value) => u8::try_from(value).map_err(|_| Error::OutOfRange("u8")),
        Scalar::Int(value) => u8::try_from(value).map_err(|_| Error::OutOfRange("u8")),
        _ => Err(Error::invalid("expected an integer")),
    }
}

fn scalar_string(node: &Node) -> Result<String> {
    let Value::Scalar(scalar) = &node.value else {
        return Err(Error::invalid("expected a string"));
    };
    match parse_scalar(&scalar.text, !scalar.plain, Some(TagBasedType::Str))? {
        Scalar::String(value) => Ok(value),
        _ => Err(Error::invalid("expected a string")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_and_type_are_required() {
        assert!(from_text("!io\nversion: 0\ntype: botw_test\n").is_err());
        assert!(from_text(
            "!io\nversion: 0\nparam_root: !list\n  objects: {}\n  lists: {}\n"
        )
        .is_err());
    }

    #[test]
    fn numeric_keys_become_hashes() {
        let pio = from_text(
            "!io\nversion: 0\ntype: xml\nparam_root: !list\n  objects:\n    12345: !obj\n      6789: 1\n  lists: {}\n",
        )
        .unwrap();
        let object = pio.param_root.objects.get(&Name(12345)).unwrap();
        assert_eq!(object.params.get(&Name(6789)), Some(&Parameter::Int(1)));
    }

    #[test]
    fn quoted_numeric_key_is_a_name() {
        let pio = from_text(
            "!io\nversion: 0\ntype: xml\nparam_root: !list\n  objects:\n    \"12345\": !obj {}\n  lists: {}\n",
        )
        .unwrap();
        assert!(pio.param_root.objects.contains_key(&Name::from("12345")));
    }
}
