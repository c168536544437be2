//! Shared YAML reading and writing for the text codecs.
//!
//! Both text formats need precise control over tag placement and flow
//! styles, so the crate carries a compact subset implementation: block
//! mappings and sequences, flow collections, quoted scalars, and `!tag`
//! annotations. Anchors, aliases, and block scalars are outside the
//! subset and rejected.
pub(crate) mod emit;
pub(crate) mod parse;

/// Rendering style for a collection node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Style {
    Block,
    Flow,
}

/// A scalar together with its presentation. Quoted scalars always read
/// back as strings.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ScalarNode {
    pub text: String,
    pub plain: bool,
}

impl ScalarNode {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            plain: true,
        }
    }

    pub fn quoted(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            plain: false,
        }
    }
}

/// One node of a parsed or to-be-emitted document.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Node {
    pub tag: Option<String>,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Value {
    Scalar(ScalarNode),
    Seq(Style, Vec<Node>),
    Map(Style, Vec<(ScalarNode, Node)>),
}

impl Node {
    pub fn scalar(scalar: ScalarNode) -> Self {
        Self {
            tag: None,
            value: Value::Scalar(scalar),
        }
    }

    pub fn seq(style: Style, items: Vec<Node>) -> Self {
        Self {
            tag: None,
            value: Value::Seq(style, items),
        }
    }

    pub fn map(style: Style, entries: Vec<(ScalarNode, Node)>) -> Self {
        Self {
            tag: None,
            value: Value::Map(style, entries),
        }
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tag = Some(tag.to_string());
        self
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }
}

/// How an explicit tag overrides scalar recognition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TagBasedType {
    Null,
    Bool,
    Int,
    Float,
    Str,
}

/// A scalar value recognized from its raw text.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
}
