//! BYML text (YAML) conversion.
//!
//! Plain YAML cannot distinguish the five numeric node kinds, so scalars
//! carry a tag whenever the default reading would pick a different kind:
//! `!u` for uints, `!l` for int64, `!ul` for uint64, and `!f64` for
//! doubles. Ints and floats stay untagged.
use crate::yaml::emit::{emit_document, fmt_f32, fmt_f64, string_scalar};
use crate::yaml::parse::{parse_document, parse_scalar};
use crate::yaml::{Node, Scalar, ScalarNode, Style, TagBasedType, Value};
use crate::{Error, Result};

use super::{Byml, Hash};

pub(crate) fn to_text(byml: &Byml) -> Result<String> {
    if !matches!(byml, Byml::Null | Byml::Array(_) | Byml::Hash(_)) {
        return Err(Error::TypeMismatch {
            expected: "null, an array or a hash",
            actual: byml.type_name(),
        });
    }
    Ok(emit_document(&build_node(byml)))
}

fn build_node(byml: &Byml) -> Node {
    match byml {
        Byml::Null => Node::scalar(ScalarNode::plain("null")),
        Byml::String(value) => Node::scalar(string_scalar(value)),
        Byml::Array(items) => Node::seq(Style::Block, items.iter().map(build_node).collect()),
        Byml::Hash(hash) => Node::map(
            Style::Block,
            hash.iter()
                .map(|(key, value)| (string_scalar(key), build_node(value)))
                .collect(),
        ),
        Byml::Bool(value) => Node::scalar(ScalarNode::plain(if *value { "true" } else { "false" })),
        Byml::Int(value) => Node::scalar(ScalarNode::plain(value.to_string())),
        Byml::Float(value) => Node::scalar(ScalarNode::plain(fmt_f32(*value))),
        Byml::UInt(value) => {
            Node::scalar(ScalarNode::plain(value.to_string())).with_tag("!u")
        }
        Byml::Int64(value) => {
            Node::scalar(ScalarNode::plain(value.to_string())).with_tag("!l")
        }
        Byml::UInt64(value) => {
            Node::scalar(ScalarNode::plain(value.to_string())).with_tag("!ul")
        }
        Byml::Double(value) => Node::scalar(ScalarNode::plain(fmt_f64(*value))).with_tag("!f64"),
    }
}

pub(crate) fn from_text(text: &str) -> Result<Byml> {
    let doc = parse_document(text)?;
    node_to_byml(&doc)
}

fn node_to_byml(node: &Node) -> Result<Byml> {
    match &node.value {
        Value::Seq(_, items) => {
            let mut array = Vec::with_capacity(items.len());
            for item in items {
                array.push(node_to_byml(item)?);
            }
            Ok(Byml::Array(array))
        }
        Value::Map(_, entries) => {
            let mut hash = Hash::with_capacity(entries.len());
            for (key, value) in entries {
                if hash
                    .insert(key.text.clone(), node_to_byml(value)?)
                    .is_some()
                {
                    return Err(Error::invalid(format!("duplicate hash key: {}", key.text)));
                }
            }
            Ok(Byml::Hash(hash))
        }
        Value::Scalar(scalar) => scalar_to_byml(node.tag(), scalar),
    }
}

fn scalar_to_byml(tag: Option<&str>, scalar: &ScalarNode) -> Result<Byml> {
    match tag {
        Some("!u") => match parse_scalar(&scalar.text, !scalar.plain, Some(TagBasedType::Int))? {
            Scalar::UInt(value) => {
                u32::try_from(value).map(Byml::UInt).map_err(|_| Error::OutOfRange("u32"))
            }
            _ => Err(Error::OutOfRange("u32")),
        },
        Some("!l") => match parse_scalar(&scalar.text, !scalar.plain, Some(TagBasedType::Int))? {
            Scalar::Int(value) => Ok(Byml::Int64(value)),
            Scalar::UInt(value) => {
                i64::try_from(value).map(Byml::Int64).map_err(|_| Error::OutOfRange("i64"))
            }
            _ => Err(Error::OutOfRange("i64")),
        },
        Some("!ul") => match parse_scalar(&scalar.text, !scalar.plain, Some(TagBasedType::Int))? {
            Scalar::UInt(value) => Ok(Byml::UInt64(value)),
            _ => Err(Error::OutOfRange("u64")),
        },
        Some("!f64") => {
            match parse_scalar(&scalar.text, !scalar.plain, Some(TagBasedType::Float))? {
                Scalar::Float(value) => Ok(Byml::Double(value)),
                _ => Err(Error::invalid("expected a float")),
            }
        }
        Some(other) => Err(Error::invalid(format!("unrecognized YAML tag: {other}"))),
        None => Ok(match parse_scalar(&scalar.text, !scalar.plain, None)? {
            Scalar::Null => Byml::Null,
            Scalar::Bool(value) => Byml::Bool(value),
            Scalar::Int(value) => match i32::try_from(value) {
                Ok(value) => Byml::Int(value),
                Err(_) => Byml::Int64(value),
            },
            Scalar::UInt(value) => {
                if value <= i32::MAX as u64 {
                    Byml::Int(value as i32)
                } else if value <= i64::MAX as u64 {
                    Byml::Int64(value as i64)
                } else {
                    Byml::UInt64(value)
                }
            }
            Scalar::Float(value) => untagged_float(&scalar.text, value),
            Scalar::String(value) => Byml::String(value),
        }),
    }
}

/// Untagged floats read as Float unless narrowing to f32 would lose the
/// scalar's value.
fn untagged_float(text: &str, value: f64) -> Byml {
    if value.is_nan() {
        return Byml::Float(f32::NAN);
    }
    let narrowed = value as f32;
    if f64::from(narrowed) == value || narrowed.to_string() == text {
        Byml::Float(narrowed)
    } else {
        Byml::Double(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_document() {
        assert_eq!(Byml::Null.to_text().unwrap(), "null\n");
        assert_eq!(Byml::from_text("null\n").unwrap(), Byml::Null);
    }

    #[test]
    fn scalar_root_is_rejected() {
        assert!(Byml::Int(1).to_text().is_err());
    }

    #[test]
    fn untagged_integer_defaulting() {
        assert_eq!(Byml::from_text("- 5\n").unwrap(), Byml::Array(vec![Byml::Int(5)]));
        assert_eq!(
            Byml::from_text("- 5000000000\n").unwrap(),
            Byml::Array(vec![Byml::Int64(5_000_000_000)])
        );
        assert_eq!(
            Byml::from_text("- -5000000000\n").unwrap(),
            Byml::Array(vec![Byml::Int64(-5_000_000_000)])
        );
        assert_eq!(
            Byml::from_text("- 18446744073709551615\n").unwrap(),
            Byml::Array(vec![Byml::UInt64(u64::MAX)])
        );
    }

    #[test]
    fn untagged_float_defaulting() {
        assert_eq!(
            Byml::from_text("- 0.1\n").unwrap(),
            Byml::Array(vec![Byml::Float(0.1)])
        );
        assert_eq!(
            Byml::from_text("- 0.30000000000000004\n").unwrap(),
            Byml::Array(vec![Byml::Double(0.300_000_000_000_000_04)])
        );
    }

    #[test]
    fn tag_round_trip() {
        let mut hash = Hash::default();
        hash.insert("u".to_string(), Byml::UInt(0xFFFF_FFFF));
        hash.insert("l".to_string(), Byml::Int64(-1));
        hash.insert("ul".to_string(), Byml::UInt64(u64::MAX));
        hash.insert("d".to_string(), Byml::Double(0.5));
        hash.insert("f".to_string(), Byml::Float(-0.5));
        hash.insert("s".to_string(), Byml::String("17".to_string()));
        hash.insert("n".to_string(), Byml::Null);
        let doc = Byml::Hash(hash);
        let text = doc.to_text().unwrap();
        assert_eq!(
            text,
            "u: !u 4294967295\nl: !l -1\nul: !ul 18446744073709551615\nd: !f64 0.5\nf: -0.5\ns: \"17\"\nn: null\n"
        );
        assert_eq!(Byml::from_text(&text).unwrap(), doc);
    }

    #[test]
    fn nested_containers_round_trip() {
        let text = "- a: 1\n  b:\n    - 2\n    - c: 3\n- null\n";
        let doc = Byml::from_text(text).unwrap();
        let emitted = doc.to_text().unwrap();
        assert_eq!(Byml::from_text(&emitted).unwrap(), doc);
    }

    #[test]
    fn unknown_tag_is_rejected() {
        assert!(Byml::from_text("- !wat 5\n").is_err());
    }
}
