//! Parsing of YAML text to document trees, plus scalar recognition.
use crate::error::{Error, Result};

use super::{Node, Scalar, ScalarNode, Style, TagBasedType, Value};

#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    indent: usize,
    content: &'a str,
}

/// Parses a document into a node tree.
pub(crate) fn parse_document(text: &str) -> Result<Node> {
    let mut lines = Vec::new();
    for raw in text.lines() {
        let trimmed = raw.trim_start_matches(' ');
        if trimmed.starts_with('\t') {
            return Err(Error::invalid("tab characters are not allowed in indentation"));
        }
        let indent = raw.len() - trimmed.len();
        let content = strip_comment(trimmed).trim_end();
        if content.is_empty() {
            continue;
        }
        if content.starts_with('&') || content.starts_with('*') {
            return Err(Error::invalid("anchors and aliases are not supported"));
        }
        lines.push(Line { indent, content });
    }

    if let Some(first) = lines.first_mut() {
        if let Some(rest) = first.content.strip_prefix("--- ") {
            first.content = rest.trim_start_matches(' ');
        }
    }
    let mut start = 0;
    if lines.first().map(|line| line.content) == Some("---") {
        start = 1;
    }
    // A root-level tag on a line of its own applies to the block below it.
    let mut root_tag = None;
    if let Some(line) = lines.get(start) {
        if line.indent == 0 && line.content.starts_with('!') && !line.content.contains(' ') {
            root_tag = Some(line.content.to_string());
            start += 1;
        }
    }

    let lines = &lines[start..];
    if lines.is_empty() {
        let node = Node::scalar(ScalarNode::plain(""));
        return Ok(match root_tag {
            Some(tag) => node.with_tag(&tag),
            None => node,
        });
    }
    if lines[0].indent != 0 {
        return Err(Error::invalid("the document root must not be indented"));
    }
    let mut pos = 0;
    let mut node = parse_block(lines, &mut pos, None)?;
    if pos != lines.len() {
        return Err(Error::invalid("trailing content after the document root"));
    }
    if node.tag.is_none() {
        node.tag = root_tag;
    }
    Ok(node)
}

fn parse_block(lines: &[Line], pos: &mut usize, parent_indent: Option<usize>) -> Result<Node> {
    let indent = lines[*pos].indent;
    if let Some(parent) = parent_indent {
        if indent <= parent {
            return Err(Error::invalid("bad indentation"));
        }
    }
    let content = lines[*pos].content;
    if is_seq_item(content) {
        parse_seq_from(None, indent, lines, pos)
    } else if find_key_sep(content).is_some() {
        parse_map_from(None, indent, lines, pos)
    } else {
        *pos += 1;
        parse_flow_str(content)
    }
}

fn parse_seq_from(
    initial: Option<&str>,
    indent: usize,
    lines: &[Line],
    pos: &mut usize,
) -> Result<Node> {
    let mut items = Vec::new();
    if let Some(content) = initial {
        items.push(parse_seq_item(content, indent, lines, pos)?);
    }
    while *pos < lines.len() && lines[*pos].indent == indent && is_seq_item(lines[*pos].content) {
        let content = lines[*pos].content;
        *pos += 1;
        items.push(parse_seq_item(content, indent, lines, pos)?);
    }
    if *pos < lines.len() && lines[*pos].indent > indent {
        return Err(Error::invalid("bad indentation"));
    }
    Ok(Node::seq(Style::Block, items))
}

fn parse_seq_item(content: &str, indent: usize, lines: &[Line], pos: &mut usize) -> Result<Node> {
    let rest = &content[1..];
    let trimmed = rest.trim_start_matches(' ');
    let rest_col = indent + 1 + (rest.len() - trimmed.len());
    parse_value(trimmed, rest_col, indent, lines, pos, true)
}

fn parse_map_from(
    initial: Option<&str>,
    indent: usize,
    lines: &[Line],
    pos: &mut usize,
) -> Result<Node> {
    let mut entries = Vec::new();
    if let Some(content) = initial {
        entries.push(parse_map_entry(content, indent, lines, pos)?);
    }
    while *pos < lines.len()
        && lines[*pos].indent == indent
        && find_key_sep(lines[*pos].content).is_some()
        && !is_seq_item(lines[*pos].content)
    {
        let content = lines[*pos].content;
        *pos += 1;
        entries.push(parse_map_entry(content, indent, lines, pos)?);
    }
    if *pos < lines.len() && lines[*pos].indent > indent {
        return Err(Error::invalid("bad indentation"));
    }
    Ok(Node::map(Style::Block, entries))
}

fn parse_map_entry(
    content: &str,
    indent: usize,
    lines: &[Line],
    pos: &mut usize,
) -> Result<(ScalarNode, Node)> {
    let (key, rest, rest_col) = split_key(content)?;
    let value = parse_value(rest, indent + rest_col, indent, lines, pos, false)?;
    Ok((key, value))
}

fn parse_value(
    rest: &str,
    rest_col: usize,
    line_indent: usize,
    lines: &[Line],
    pos: &mut usize,
    allow_compact: bool,
) -> Result<Node> {
    if rest.is_empty() {
        if *pos < lines.len() && lines[*pos].indent > line_indent {
            return parse_block(lines, pos, Some(line_indent));
        }
        return Ok(Node::scalar(ScalarNode::plain("")));
    }
    if matches!(rest, "|" | "|-" | "|+" | ">" | ">-" | ">+") {
        return Err(Error::invalid("block scalars are not supported"));
    }
    if rest.starts_with('&') || rest.starts_with('*') {
        return Err(Error::invalid("anchors and aliases are not supported"));
    }
    if rest.starts_with('!') {
        let (tag, after) = match rest.find(' ') {
            Some(i) => (&rest[..i], rest[i..].trim_start_matches(' ')),
            None => (rest, ""),
        };
        if after.is_empty() {
            let node = if *pos < lines.len() && lines[*pos].indent > line_indent {
                parse_block(lines, pos, Some(line_indent))?
            } else {
                Node::scalar(ScalarNode::plain(""))
            };
            return Ok(node.with_tag(tag));
        }
        let col = rest_col + (rest.len() - after.len());
        let node = parse_value(after, col, line_indent, lines, pos, allow_compact)?;
        return Ok(node.with_tag(tag));
    }
    if allow_compact && is_seq_item(rest) {
        return parse_seq_from(Some(rest), rest_col, lines, pos);
    }
    if allow_compact && find_key_sep(rest).is_some() {
        return parse_map_from(Some(rest), rest_col, lines, pos);
    }
    parse_flow_str(rest)
}

fn is_seq_item(content: &str) -> bool {
    content == "-" || content.starts_with("- ")
}

/// Returns the byte index of the `:` separating a mapping key from its
/// value, if the line is a mapping entry.
fn find_key_sep(content: &str) -> Option<usize> {
    let bytes = content.as_bytes();
    match bytes.first()? {
        b'[' | b'{' => None,
        b'"' | b'\'' => {
            let close = find_closing_quote(content)?;
            let mut i = close + 1;
            while i < bytes.len() && bytes[i] == b' ' {
                i += 1;
            }
            if i < bytes.len() && bytes[i] == b':' && (i + 1 == bytes.len() || bytes[i + 1] == b' ')
            {
                Some(i)
            } else {
                None
            }
        }
        _ => {
            for i in 0..bytes.len() {
                if bytes[i] == b':' && (i + 1 == bytes.len() || bytes[i + 1] == b' ') {
                    return Some(i);
                }
            }
            None
        }
    }
}

fn find_closing_quote(content: &str) -> Option<usize> {
    let bytes = content.as_bytes();
    let quote = bytes[0];
    let mut i = 1;
    while i < bytes.len() {
        if quote == b'"' && bytes[i] == b'\\' {
            i += 2;
            continue;
        }
        if bytes[i] == quote {
            if quote == b'\'' && bytes.get(i + 1) == Some(&b'\'') {
                i += 2;
                continue;
            }
            return Some(i);
        }
        i += 1;
    }
    None
}

fn split_key(content: &str) -> Result<(ScalarNode, &str, usize)> {
    let sep =
        find_key_sep(content).ok_or_else(|| Error::invalid("expected a mapping entry"))?;
    let raw_key = content[..sep].trim_end_matches(' ');
    let key = match raw_key.as_bytes().first() {
        Some(b'"') => {
            let mut scanner = Scanner::new(raw_key);
            ScalarNode::quoted(scanner.parse_double_quoted()?)
        }
        Some(b'\'') => {
            let mut scanner = Scanner::new(raw_key);
            ScalarNode::quoted(scanner.parse_single_quoted()?)
        }
        _ => ScalarNode::plain(raw_key),
    };
    let after = &content[sep + 1..];
    let rest = after.trim_start_matches(' ');
    let rest_col = sep + 1 + (after.len() - rest.len());
    Ok((key, rest, rest_col))
}

fn strip_comment(content: &str) -> &str {
    let bytes = content.as_bytes();
    let mut in_double = false;
    let mut in_single = false;
    let mut escaped = false;
    let mut prev_ws = true;
    for (i, &b) in bytes.iter().enumerate() {
        if in_double {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_double = false;
            }
        } else if in_single {
            if b == b'\'' {
                in_single = false;
            }
        } else if b == b'"' {
            in_double = true;
        } else if b == b'\'' {
            in_single = true;
        } else if b == b'#' && prev_ws {
            return &content[..i];
        }
        prev_ws = b == b' ' || b == b'\t';
    }
    content
}

/// Parses one flow value (scalar, `[...]`, or `{...}`), consuming the
/// whole string.
fn parse_flow_str(text: &str) -> Result<Node> {
    let mut scanner = Scanner::new(text);
    let node = scanner.parse_node(false)?;
    scanner.skip_spaces();
    if !scanner.at_end() {
        return Err(Error::invalid(format!(
            "unexpected trailing characters in {text:?}"
        )));
    }
    Ok(node)
}

struct Scanner<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn skip_spaces(&mut self) {
        while self.peek() == Some(b' ') {
            self.pos += 1;
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn parse_node(&mut self, in_flow: bool) -> Result<Node> {
        self.skip_spaces();
        let tag = if self.peek() == Some(b'!') {
            let start = self.pos;
            while let Some(b) = self.peek() {
                if b == b' ' || !b.is_ascii() || (in_flow && matches!(b, b',' | b']' | b'}')) {
                    break;
                }
                self.pos += 1;
            }
            let tag = self.text[start..self.pos].to_string();
            self.skip_spaces();
            Some(tag)
        } else {
            None
        };
        let value = match self.peek() {
            Some(b'[') => self.parse_flow_seq()?,
            Some(b'{') => self.parse_flow_map()?,
            Some(b'"') => Value::Scalar(ScalarNode::quoted(self.parse_double_quoted()?)),
            Some(b'\'') => Value::Scalar(ScalarNode::quoted(self.parse_single_quoted()?)),
            _ => Value::Scalar(ScalarNode::plain(self.parse_plain(in_flow))),
        };
        Ok(Node { tag, value })
    }

    fn parse_flow_seq(&mut self) -> Result<Value> {
        self.pos += 1;
        let mut items = Vec::new();
        loop {
            self.skip_spaces();
            if self.eat(b']') {
                break;
            }
            items.push(self.parse_node(true)?);
            self.skip_spaces();
            if self.eat(b',') {
                continue;
            }
            if self.eat(b']') {
                break;
            }
            return Err(Error::invalid("unterminated flow sequence"));
        }
        Ok(Value::Seq(Style::Flow, items))
    }

    fn parse_flow_map(&mut self) -> Result<Value> {
        self.pos += 1;
        let mut entries = Vec::new();
        loop {
            self.skip_spaces();
            if self.eat(b'}') {
                break;
            }
            let key = match self.peek() {
                Some(b'"') => ScalarNode::quoted(self.parse_double_quoted()?),
                Some(b'\'') => ScalarNode::quoted(self.parse_single_quoted()?),
                _ => {
                    let start = self.pos;
                    while let Some(b) = self.peek() {
                        if matches!(b, b':' | b',' | b'}') {
                            break;
                        }
                        self.pos += 1;
                    }
                    ScalarNode::plain(self.text[start..self.pos].trim_end_matches(' '))
                }
            };
            self.skip_spaces();
            if !self.eat(b':') {
                return Err(Error::invalid("expected ':' in flow mapping"));
            }
            let value = self.parse_node(true)?;
            entries.push((key, value));
            self.skip_spaces();
            if self.eat(b',') {
                continue;
            }
            if self.eat(b'}') {
                break;
            }
            return Err(Error::invalid("unterminated flow mapping"));
        }
        Ok(Value::Map(Style::Flow, entries))
    }

    fn parse_plain(&mut self, in_flow: bool) -> &'a str {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if in_flow && matches!(b, b',' | b']' | b'}') {
                break;
            }
            self.pos += 1;
        }
        self.text[start..self.pos].trim_end_matches(' ')
    }

    fn parse_double_quoted(&mut self) -> Result<String> {
        self.pos += 1;
        let mut out = String::new();
        let rest = &self.text[self.pos..];
        let mut iter = rest.char_indices();
        while let Some((i, c)) = iter.next() {
            match c {
                '"' => {
                    self.pos += i + 1;
                    return Ok(out);
                }
                '\\' => {
                    let (_, escape) = iter
                        .next()
                        .ok_or_else(|| Error::invalid("unterminated escape sequence"))?;
                    match escape {
                        'n' => out.push('\n'),
                        't' => out.push('\t'),
                        'r' => out.push('\r'),
                        '0' => out.push('\0'),
                        '\\' => out.push('\\'),
                        '"' => out.push('"'),
                        '/' => out.push('/'),
                        'u' => {
                            let mut code = 0u32;
                            for _ in 0..4 {
                                let (_, h) = iter.next().ok_or_else(|| {
                                    Error::invalid("truncated unicode escape")
                                })?;
                                code = code * 16
                                    + h.to_digit(16).ok_or_else(|| {
                                        Error::invalid("invalid unicode escape")
                                    })?;
                            }
                            out.push(
                                char::from_u32(code)
                                    .ok_or_else(|| Error::invalid("invalid unicode escape"))?,
                            );
                        }
                        other => {
                            return Err(Error::invalid(format!(
                                "unsupported escape sequence: \\{other}"
                            )))
                        }
                    }
                }
                c => out.push(c),
            }
        }
        Err(Error::invalid("unterminated double-quoted string"))
    }

    fn parse_single_quoted(&mut self) -> Result<String> {
        self.pos += 1;
        let mut out = String::new();
        loop {
            let rest = &self.text[self.pos..];
            match rest.find('\'') {
                None => return Err(Error::invalid("unterminated single-quoted string")),
                Some(i) => {
                    out.push_str(&rest[..i]);
                    self.pos += i + 1;
                    if self.peek() == Some(b'\'') {
                        out.push('\'');
                        self.pos += 1;
                    } else {
                        return Ok(out);
                    }
                }
            }
        }
    }
}

/// Recognizes a raw scalar per the YAML 1.2 core schema.
///
/// An explicit tag's [TagBasedType] takes precedence over recognition,
/// and quoted scalars are always strings.
pub(crate) fn parse_scalar(text: &str, quoted: bool, hint: Option<TagBasedType>) -> Result<Scalar> {
    if let Some(hint) = hint {
        return match hint {
            TagBasedType::Null => Ok(Scalar::Null),
            TagBasedType::Bool => recognize_bool(text)
                .map(Scalar::Bool)
                .ok_or_else(|| Error::invalid(format!("invalid boolean: {text}"))),
            TagBasedType::Int => parse_int(text),
            TagBasedType::Float => {
                if let Some(value) = parse_float(text) {
                    Ok(Scalar::Float(value))
                } else if is_int(text) {
                    Ok(int_as_f64(parse_int(text)?))
                } else {
                    Err(Error::invalid(format!("invalid float: {text}")))
                }
            }
            TagBasedType::Str => Ok(Scalar::String(text.to_string())),
        };
    }
    if quoted {
        return Ok(Scalar::String(text.to_string()));
    }
    if matches!(text, "" | "~" | "null" | "Null" | "NULL") {
        return Ok(Scalar::Null);
    }
    if let Some(value) = recognize_bool(text) {
        return Ok(Scalar::Bool(value));
    }
    if is_int(text) {
        return parse_int(text);
    }
    if let Some(value) = parse_float(text) {
        return Ok(Scalar::Float(value));
    }
    Ok(Scalar::String(text.to_string()))
}

fn int_as_f64(scalar: Scalar) -> Scalar {
    match scalar {
        Scalar::Int(v) => Scalar::Float(v as f64),
        Scalar::UInt(v) => Scalar::Float(v as f64),
        other => other,
    }
}

fn recognize_bool(text: &str) -> Option<bool> {
    match text {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

fn is_int(text: &str) -> bool {
    let digits = text.strip_prefix(['-', '+']).unwrap_or(text);
    if let Some(hex) = digits.strip_prefix("0x") {
        return !hex.is_empty() && hex.bytes().all(|b| b.is_ascii_hexdigit());
    }
    if let Some(oct) = digits.strip_prefix("0o") {
        return !oct.is_empty() && oct.bytes().all(|b| (b'0'..=b'7').contains(&b));
    }
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn parse_int(text: &str) -> Result<Scalar> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let magnitude = if let Some(hex) = digits.strip_prefix("0x") {
        u64::from_str_radix(hex, 16)
    } else if let Some(oct) = digits.strip_prefix("0o") {
        u64::from_str_radix(oct, 8)
    } else {
        digits.parse::<u64>()
    }
    .map_err(|_| Error::invalid(format!("invalid integer: {text}")))?;
    if negative {
        if magnitude > i64::MAX as u64 + 1 {
            return Err(Error::OutOfRange("i64"));
        }
        Ok(Scalar::Int((-(magnitude as i128)) as i64))
    } else {
        Ok(Scalar::UInt(magnitude))
    }
}

fn parse_float(text: &str) -> Option<f64> {
    match text {
        ".inf" | "+.inf" | ".Inf" | ".INF" => return Some(f64::INFINITY),
        "-.inf" | "-.Inf" | "-.INF" => return Some(f64::NEG_INFINITY),
        ".nan" | ".NaN" | ".NAN" => return Some(f64::NAN),
        _ => {}
    }
    if !is_float_shape(text) {
        return None;
    }
    text.parse::<f64>().ok()
}

fn is_float_shape(text: &str) -> bool {
    let rest = text.strip_prefix(['-', '+']).unwrap_or(text);
    let bytes = rest.as_bytes();
    let mut saw_digit = false;
    let mut saw_dot = false;
    let mut saw_exp = false;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'0'..=b'9' => saw_digit = true,
            b'.' if !saw_dot && !saw_exp => saw_dot = true,
            b'e' | b'E' if saw_digit && !saw_exp => {
                saw_exp = true;
                if i + 1 < bytes.len() && matches!(bytes[i + 1], b'+' | b'-') {
                    i += 1;
                }
                if i + 1 >= bytes.len() {
                    return false;
                }
            }
            _ => return false,
        }
        i += 1;
    }
    saw_digit && (saw_dot || saw_exp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yaml::emit::emit_document;

    fn scalar_text(node: &Node) -> &str {
        match &node.value {
            Value::Scalar(s) => &s.text,
            other => panic!("expected scalar, got {other:?}"),
        }
    }

    #[test]
    fn block_map_nesting() {
        let doc = parse_document("a: 1\nb:\n  c: 2\n  d: [3, 4]\n").unwrap();
        let Value::Map(_, entries) = &doc.value else {
            panic!("expected map");
        };
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0.text, "a");
        assert_eq!(scalar_text(&entries[0].1), "1");
        let Value::Map(_, inner) = &entries[1].1.value else {
            panic!("expected nested map");
        };
        assert_eq!(inner.len(), 2);
        let Value::Seq(Style::Flow, items) = &inner[1].1.value else {
            panic!("expected flow sequence");
        };
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn tagged_values() {
        let doc = parse_document("a: !u 5\nroot: !list\n  objects: {}\n  lists: {}\n").unwrap();
        let Value::Map(_, entries) = &doc.value else {
            panic!("expected map");
        };
        assert_eq!(entries[0].1.tag(), Some("!u"));
        assert_eq!(scalar_text(&entries[0].1), "5");
        assert_eq!(entries[1].1.tag(), Some("!list"));
        let Value::Map(_, inner) = &entries[1].1.value else {
            panic!("expected nested map");
        };
        assert!(matches!(inner[0].1.value, Value::Map(_, ref e) if e.is_empty()));
    }

    #[test]
    fn root_tag_line() {
        let doc = parse_document("!io\nversion: 0\ntype: xlink\n").unwrap();
        assert_eq!(doc.tag(), Some("!io"));
        let Value::Map(_, entries) = &doc.value else {
            panic!("expected map");
        };
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn sequences_and_compact_items() {
        let doc = parse_document("- 1\n- a: 2\n  b: 3\n- - 4\n  - 5\n").unwrap();
        let Value::Seq(_, items) = &doc.value else {
            panic!("expected sequence");
        };
        assert_eq!(items.len(), 3);
        assert!(matches!(&items[1].value, Value::Map(_, e) if e.len() == 2));
        assert!(matches!(&items[2].value, Value::Seq(_, e) if e.len() == 2));
    }

    #[test]
    fn quoted_scalars_and_comments() {
        let doc = parse_document("a: \"5\" # not a number\nb: 'it''s'\n").unwrap();
        let Value::Map(_, entries) = &doc.value else {
            panic!("expected map");
        };
        let Value::Scalar(s) = &entries[0].1.value else {
            panic!("expected scalar");
        };
        assert!(!s.plain);
        assert_eq!(s.text, "5");
        assert_eq!(scalar_text(&entries[1].1), "it's");
    }

    #[test]
    fn emit_parse_round_trip() {
        let text = "a: 1\nb: !obj\n  c: \"true\"\nd: !vec3 [1.0, 2.0, 3.0]\ne: {}\n";
        let doc = parse_document(text).unwrap();
        assert_eq!(emit_document(&doc), text);
    }

    #[test]
    fn rejects_unsupported_syntax() {
        assert!(parse_document("a: *alias\n").is_err());
        assert!(parse_document("a: |\n  text\n").is_err());
        assert!(parse_document("\ta: 1\n").is_err());
        assert!(parse_document("a: [1, 2\n").is_err());
    }

    #[test]
    fn scalar_recognition() {
        assert_eq!(parse_scalar("null", false, None).unwrap(), Scalar::Null);
        assert_eq!(
            parse_scalar("true", false, None).unwrap(),
            Scalar::Bool(true)
        );
        assert_eq!(parse_scalar("-12", false, None).unwrap(), Scalar::Int(-12));
        assert_eq!(
            parse_scalar("0xFF", false, None).unwrap(),
            Scalar::UInt(255)
        );
        assert_eq!(
            parse_scalar("1.5", false, None).unwrap(),
            Scalar::Float(1.5)
        );
        assert_eq!(
            parse_scalar("-.inf", false, None).unwrap(),
            Scalar::Float(f64::NEG_INFINITY)
        );
        assert_eq!(
            parse_scalar("1.s", false, None).unwrap(),
            Scalar::String("1.s".to_string())
        );
        assert_eq!(
            parse_scalar("5", true, None).unwrap(),
            Scalar::String("5".to_string())
        );
        assert_eq!(
            parse_scalar("5", false, Some(TagBasedType::Str)).unwrap(),
            Scalar::String("5".to_string())
        );
        assert_eq!(
            parse_scalar("-9223372036854775808", false, None).unwrap(),
            Scalar::Int(i64::MIN)
        );
    }
}
