//! Rendering of document trees to YAML text.
use super::parse::parse_scalar;
use super::{Node, Scalar, ScalarNode, Style, Value};

/// Renders a document tree, ending with a newline.
pub(crate) fn emit_document(root: &Node) -> String {
    let mut out = String::new();
    match &root.value {
        Value::Map(Style::Block, entries) if !entries.is_empty() => {
            if let Some(tag) = root.tag() {
                out.push_str(tag);
                out.push('\n');
            }
            render_block_map(entries, 0, &mut out, false);
        }
        Value::Seq(Style::Block, items) if !items.is_empty() => {
            if let Some(tag) = root.tag() {
                out.push_str(tag);
                out.push('\n');
            }
            render_block_seq(items, 0, &mut out, false);
        }
        _ => {
            render_inline(root, &mut out);
            out.push('\n');
        }
    }
    out
}

fn indent_by(out: &mut String, indent: usize) {
    for _ in 0..indent {
        out.push(' ');
    }
}

fn render_block_map(entries: &[(ScalarNode, Node)], indent: usize, out: &mut String, mut inline_first: bool) {
    for (key, value) in entries {
        if inline_first {
            inline_first = false;
        } else {
            indent_by(out, indent);
        }
        render_scalar_text(key, out);
        out.push(':');
        render_entry_value(value, indent, out);
    }
}

fn render_entry_value(node: &Node, indent: usize, out: &mut String) {
    match &node.value {
        Value::Map(Style::Block, entries) if !entries.is_empty() => {
            if let Some(tag) = node.tag() {
                out.push(' ');
                out.push_str(tag);
            }
            out.push('\n');
            render_block_map(entries, indent + 2, out, false);
        }
        Value::Seq(Style::Block, items) if !items.is_empty() => {
            if let Some(tag) = node.tag() {
                out.push(' ');
                out.push_str(tag);
            }
            out.push('\n');
            render_block_seq(items, indent + 2, out, false);
        }
        _ => {
            out.push(' ');
            render_inline(node, out);
            out.push('\n');
        }
    }
}

fn render_block_seq(items: &[Node], indent: usize, out: &mut String, mut inline_first: bool) {
    for item in items {
        if inline_first {
            inline_first = false;
        } else {
            indent_by(out, indent);
        }
        out.push('-');
        match &item.value {
            // Untagged nested block collections keep the compact form.
            Value::Map(Style::Block, entries) if !entries.is_empty() => {
                if let Some(tag) = item.tag() {
                    out.push(' ');
                    out.push_str(tag);
                    out.push('\n');
                    render_block_map(entries, indent + 2, out, false);
                } else {
                    out.push(' ');
                    render_block_map(entries, indent + 2, out, true);
                }
            }
            Value::Seq(Style::Block, children) if !children.is_empty() => {
                if let Some(tag) = item.tag() {
                    out.push(' ');
                    out.push_str(tag);
                    out.push('\n');
                    render_block_seq(children, indent + 2, out, false);
                } else {
                    out.push(' ');
                    render_block_seq(children, indent + 2, out, true);
                }
            }
            _ => {
                out.push(' ');
                render_inline(item, out);
                out.push('\n');
            }
        }
    }
}

fn render_inline(node: &Node, out: &mut String) {
    if let Some(tag) = node.tag() {
        out.push_str(tag);
        out.push(' ');
    }
    match &node.value {
        Value::Scalar(scalar) => render_scalar_text(scalar, out),
        Value::Seq(_, items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                render_inline(item, out);
            }
            out.push(']');
        }
        Value::Map(_, entries) => {
            out.push('{');
            for (i, (key, value)) in entries.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                render_scalar_text(key, out);
                out.push_str(": ");
                render_inline(value, out);
            }
            out.push('}');
        }
    }
}

fn render_scalar_text(scalar: &ScalarNode, out: &mut String) {
    if scalar.plain {
        out.push_str(&scalar.text);
    } else {
        quote_double(&scalar.text, out);
    }
}

fn quote_double(text: &str, out: &mut String) {
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

/// Wraps a string value, quoting it whenever a plain rendition would be
/// misread as another scalar type or break the surrounding syntax.
pub(crate) fn string_scalar(text: &str) -> ScalarNode {
    if needs_quotes(text) {
        ScalarNode::quoted(text)
    } else {
        ScalarNode::plain(text)
    }
}

fn needs_quotes(text: &str) -> bool {
    if text.is_empty() {
        return true;
    }
    if !matches!(parse_scalar(text, false, None), Ok(Scalar::String(_))) {
        return true;
    }
    let first = text.chars().next().unwrap_or(' ');
    if "!&*?|>%@`\"'#-:".contains(first) {
        return true;
    }
    if text.starts_with(' ') || text.ends_with(' ') || text.ends_with(':') {
        return true;
    }
    text.chars().any(|c| "[]{},".contains(c) || (c as u32) < 0x20)
        || text.contains(": ")
        || text.contains(" #")
}

pub(crate) fn fmt_f32(value: f32) -> String {
    if value.is_nan() {
        return ".nan".to_string();
    }
    if value.is_infinite() {
        return if value < 0.0 { "-.inf" } else { ".inf" }.to_string();
    }
    let mut text = value.to_string();
    if !text.contains(['.', 'e', 'E']) {
        text.push_str(".0");
    }
    text
}

pub(crate) fn fmt_f64(value: f64) -> String {
    if value.is_nan() {
        return ".nan".to_string();
    }
    if value.is_infinite() {
        return if value < 0.0 { "-.inf" } else { ".inf" }.to_string();
    }
    let mut text = value.to_string();
    if !text.contains(['.', 'e', 'E']) {
        text.push_str(".0");
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_node(text: &str) -> Node {
        Node::scalar(ScalarNode::plain(text))
    }

    #[test]
    fn scalar_document() {
        assert_eq!(emit_document(&plain_node("null")), "null\n");
    }

    #[test]
    fn block_map_with_nested_containers() {
        let doc = Node::map(
            Style::Block,
            vec![
                (ScalarNode::plain("a"), plain_node("1")),
                (
                    ScalarNode::plain("b"),
                    Node::map(
                        Style::Block,
                        vec![(ScalarNode::plain("c"), plain_node("true"))],
                    )
                    .with_tag("!obj"),
                ),
                (ScalarNode::plain("d"), Node::map(Style::Flow, Vec::new())),
            ],
        );
        assert_eq!(
            emit_document(&doc),
            "a: 1\nb: !obj\n  c: true\nd: {}\n"
        );
    }

    #[test]
    fn tagged_flow_sequence() {
        let doc = Node::map(
            Style::Block,
            vec![(
                ScalarNode::plain("pos"),
                Node::seq(
                    Style::Flow,
                    vec![plain_node("1.0"), plain_node("2.0"), plain_node("3.0")],
                )
                .with_tag("!vec3"),
            )],
        );
        assert_eq!(emit_document(&doc), "pos: !vec3 [1.0, 2.0, 3.0]\n");
    }

    #[test]
    fn compact_sequence_items() {
        let doc = Node::seq(
            Style::Block,
            vec![
                Node::map(
                    Style::Block,
                    vec![
                        (ScalarNode::plain("a"), plain_node("1")),
                        (ScalarNode::plain("b"), plain_node("2")),
                    ],
                ),
                plain_node("3"),
            ],
        );
        assert_eq!(emit_document(&doc), "- a: 1\n  b: 2\n- 3\n");
    }

    #[test]
    fn quoting() {
        assert!(string_scalar("3").text == "3" && !string_scalar("3").plain);
        assert!(!string_scalar("true").plain);
        assert!(!string_scalar("").plain);
        assert!(!string_scalar("a: b").plain);
        assert!(string_scalar("Enemy_1").plain);
        let mut out = String::new();
        render_scalar_text(&string_scalar("a\nb"), &mut out);
        assert_eq!(out, "\"a\\nb\"");
    }

    #[test]
    fn float_formatting() {
        assert_eq!(fmt_f32(3.0), "3.0");
        assert_eq!(fmt_f32(0.1), "0.1");
        assert_eq!(fmt_f32(f32::INFINITY), ".inf");
        assert_eq!(fmt_f32(f32::NEG_INFINITY), "-.inf");
        assert_eq!(fmt_f64(-2.0), "-2.0");
        assert_eq!(fmt_f64(f64::NAN), ".nan");
    }
}
