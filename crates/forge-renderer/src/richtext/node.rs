use forge_common::{Link, LinkKind};
use serde_json::Value;
use smol_str::SmolStr;

/// Inline formatting attached to a text node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mark {
    Bold,
    Italic,
    Underline,
    Code,
    /// Kept so the node round-trips, but renders as plain text.
    Other(SmolStr),
}

impl Mark {
    pub fn from_type(mark_type: &str) -> Self {
        match mark_type {
            "bold" => Self::Bold,
            "italic" => Self::Italic,
            "underline" => Self::Underline,
            "code" => Self::Code,
            other => Self::Other(SmolStr::new(other)),
        }
    }

    /// Decode `{ "type": "bold" }`. A mark without a type is dropped.
    pub fn from_value(value: &Value) -> Option<Self> {
        value.get("type").and_then(Value::as_str).map(Self::from_type)
    }

    /// HTML element this mark wraps its text in.
    pub fn tag(&self) -> Option<&'static str> {
        match self {
            Self::Bold => Some("strong"),
            Self::Italic => Some("em"),
            Self::Underline => Some("u"),
            Self::Code => Some("code"),
            Self::Other(_) => None,
        }
    }
}

/// Content-level node: text, hyperlinks, and any container of further nodes
/// (list items, table cells, nested paragraphs, entry links...).
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text {
        value: String,
        marks: Vec<Mark>,
    },
    Hyperlink {
        uri: Option<String>,
        content: Vec<Node>,
    },
    Element {
        kind: SmolStr,
        content: Vec<Node>,
    },
    /// Anything without a usable shape.
    Empty,
}

impl Node {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text {
            value: value.into(),
            marks: Vec::new(),
        }
    }

    pub fn from_value(value: &Value) -> Self {
        match node_type(value) {
            "text" => Self::Text {
                value: value
                    .get("value")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_owned(),
                marks: value
                    .get("marks")
                    .and_then(Value::as_array)
                    .map(|marks| marks.iter().filter_map(Mark::from_value).collect())
                    .unwrap_or_default(),
            },
            "hyperlink" => Self::Hyperlink {
                uri: value
                    .pointer("/data/uri")
                    .and_then(Value::as_str)
                    .filter(|uri| !uri.is_empty())
                    .map(str::to_owned),
                content: decode_children(value),
            },
            // Containers keep their kind even with no children.
            kind @ ("paragraph" | "list-item" | "table-cell" | "table-header-cell"
            | "blockquote") => Self::Element {
                kind: SmolStr::new(kind),
                content: decode_children(value),
            },
            kind => match value.get("content").and_then(Value::as_array) {
                Some(children) => Self::Element {
                    kind: SmolStr::new(kind),
                    content: children.iter().map(Node::from_value).collect(),
                },
                None => Self::Empty,
            },
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Self::Hyperlink { content, .. } | Self::Element { content, .. } => content,
            Self::Text { .. } | Self::Empty => &[],
        }
    }

    pub fn is_kind(&self, wanted: &str) -> bool {
        matches!(self, Self::Element { kind, .. } if kind == wanted)
    }
}

/// One row of a table block.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub header: bool,
    pub cells: Vec<Node>,
}

impl TableRow {
    fn from_value(value: &Value) -> Self {
        Self {
            header: node_type(value) == "table-header-row",
            cells: decode_children(value),
        }
    }
}

/// Top-level structural node of a document.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(Vec<Node>),
    Heading { level: u8, content: Vec<Node> },
    UnorderedList(Vec<Node>),
    OrderedList(Vec<Node>),
    Blockquote(Vec<Node>),
    HorizontalRule,
    EmbeddedAsset { target: Option<Link> },
    Table(Vec<TableRow>),
    Unknown(SmolStr),
}

impl Block {
    pub fn from_value(value: &Value) -> Self {
        match node_type(value) {
            "paragraph" => Self::Paragraph(decode_children(value)),
            "unordered-list" => Self::UnorderedList(decode_children(value)),
            "ordered-list" => Self::OrderedList(decode_children(value)),
            "blockquote" => Self::Blockquote(decode_children(value)),
            "hr" | "horizontal-rule" => Self::HorizontalRule,
            "embedded-asset-block" => Self::EmbeddedAsset {
                target: value
                    .pointer("/data/target")
                    .and_then(|target| Link::from_value_as(target, LinkKind::Asset)),
            },
            "table" => Self::Table(
                value
                    .get("content")
                    .and_then(Value::as_array)
                    .map(|rows| rows.iter().map(TableRow::from_value).collect())
                    .unwrap_or_default(),
            ),
            kind => match heading_level(kind) {
                Some(level) => Self::Heading {
                    level,
                    content: decode_children(value),
                },
                None => Self::Unknown(SmolStr::new(kind)),
            },
        }
    }
}

/// A rich-text document: the ordered blocks under the root node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// Decode a document root. A root without a `content` array is empty.
    pub fn from_value(value: &Value) -> Self {
        Self {
            blocks: value
                .get("content")
                .and_then(Value::as_array)
                .map(|blocks| blocks.iter().map(Block::from_value).collect())
                .unwrap_or_default(),
        }
    }

    /// Whether a raw value looks like a rich-text root rather than a plain string.
    pub fn is_document(value: &Value) -> bool {
        value.get("content").is_some_and(Value::is_array)
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Characters in the text nodes sitting directly under top-level blocks.
    /// Text nested deeper (list items, cells, quotes, links) isn't counted.
    pub fn text_length(&self) -> usize {
        self.blocks
            .iter()
            .map(|block| match block {
                Block::Paragraph(content) | Block::Heading { content, .. } => content
                    .iter()
                    .map(|node| match node {
                        Node::Text { value, .. } => value.chars().count(),
                        _ => 0,
                    })
                    .sum(),
                _ => 0,
            })
            .sum()
    }
}

fn node_type(value: &Value) -> &str {
    value
        .get("nodeType")
        .and_then(Value::as_str)
        .unwrap_or_default()
}

fn decode_children(value: &Value) -> Vec<Node> {
    value
        .get("content")
        .and_then(Value::as_array)
        .map(|children| children.iter().map(Node::from_value).collect())
        .unwrap_or_default()
}

fn heading_level(kind: &str) -> Option<u8> {
    kind.strip_prefix("heading-")
        .and_then(|level| level.parse::<u8>().ok())
        .filter(|level| (1..=6).contains(level))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_text_with_marks() {
        let node = Node::from_value(&json!({
            "nodeType": "text",
            "value": "hi",
            "marks": [{ "type": "bold" }, { "type": "superscript" }, { "nope": 1 }]
        }));
        assert_eq!(
            node,
            Node::Text {
                value: "hi".into(),
                marks: vec![Mark::Bold, Mark::Other("superscript".into())],
            }
        );
    }

    #[test]
    fn test_decode_text_missing_value() {
        let node = Node::from_value(&json!({ "nodeType": "text" }));
        assert_eq!(node, Node::text(""));
    }

    #[test]
    fn test_decode_hyperlink() {
        let node = Node::from_value(&json!({
            "nodeType": "hyperlink",
            "data": { "uri": "" },
            "content": [{ "nodeType": "text", "value": "x", "marks": [] }]
        }));
        assert_eq!(
            node,
            Node::Hyperlink {
                uri: None,
                content: vec![Node::text("x")],
            }
        );
    }

    #[test]
    fn test_decode_unknown_inline() {
        let with_children = Node::from_value(&json!({
            "nodeType": "entry-hyperlink",
            "content": [{ "nodeType": "text", "value": "see" }]
        }));
        assert!(with_children.is_kind("entry-hyperlink"));
        assert_eq!(with_children.children().len(), 1);

        assert_eq!(Node::from_value(&json!({ "nodeType": "mystery" })), Node::Empty);
        assert_eq!(Node::from_value(&json!(42)), Node::Empty);
    }

    #[test]
    fn test_decode_childless_container() {
        let node = Node::from_value(&json!({ "nodeType": "paragraph" }));
        assert!(node.is_kind("paragraph"));
        assert!(node.children().is_empty());

        let cell = Node::from_value(&json!({ "nodeType": "table-cell", "content": "oops" }));
        assert!(cell.is_kind("table-cell"));
        assert!(cell.children().is_empty());
    }

    #[test]
    fn test_decode_blocks() {
        assert!(matches!(
            Block::from_value(&json!({ "nodeType": "heading-3", "content": [] })),
            Block::Heading { level: 3, .. }
        ));
        assert_eq!(
            Block::from_value(&json!({ "nodeType": "heading-7" })),
            Block::Unknown("heading-7".into())
        );
        assert_eq!(Block::from_value(&json!({ "nodeType": "hr" })), Block::HorizontalRule);
        assert_eq!(
            Block::from_value(&json!({ "nodeType": "horizontal-rule" })),
            Block::HorizontalRule
        );
        assert_eq!(Block::from_value(&json!(null)), Block::Unknown("".into()));
    }

    #[test]
    fn test_decode_embedded_asset_target() {
        let block = Block::from_value(&json!({
            "nodeType": "embedded-asset-block",
            "data": { "target": { "sys": { "id": "img", "type": "Link", "linkType": "Asset" } } }
        }));
        assert_eq!(
            block,
            Block::EmbeddedAsset {
                target: Some(Link::asset("img"))
            }
        );

        let entry_typed = Block::from_value(&json!({
            "nodeType": "embedded-asset-block",
            "data": { "target": { "sys": { "id": "img", "type": "Link", "linkType": "Entry" } } }
        }));
        assert_eq!(
            entry_typed,
            Block::EmbeddedAsset {
                target: Some(Link::asset("img"))
            }
        );

        let missing = Block::from_value(&json!({ "nodeType": "embedded-asset-block" }));
        assert_eq!(missing, Block::EmbeddedAsset { target: None });
    }

    #[test]
    fn test_decode_table_rows() {
        let block = Block::from_value(&json!({
            "nodeType": "table",
            "content": [
                { "nodeType": "table-header-row", "content": [] },
                { "nodeType": "table-row" },
                "garbage"
            ]
        }));
        let Block::Table(rows) = block else {
            panic!("expected a table");
        };
        assert_eq!(rows.len(), 3);
        assert!(rows[0].header);
        assert!(!rows[1].header);
        assert!(rows[2].cells.is_empty());
    }

    #[test]
    fn test_document_from_value() {
        assert!(Document::from_value(&json!({})).is_empty());
        assert!(Document::from_value(&json!("plain")).is_empty());
        assert!(Document::is_document(&json!({ "nodeType": "document", "content": [] })));
        assert!(!Document::is_document(&json!("plain")));
    }

    #[test]
    fn test_text_length() {
        let doc = Document::from_value(&json!({
            "content": [
                { "nodeType": "paragraph", "content": [
                    { "nodeType": "text", "value": "héllo" },
                    { "nodeType": "hyperlink", "content": [{ "nodeType": "text", "value": "skipped" }] }
                ]},
                { "nodeType": "heading-1", "content": [{ "nodeType": "text", "value": "abc" }] },
                { "nodeType": "unordered-list", "content": [
                    { "nodeType": "list-item", "content": [{ "nodeType": "text", "value": "nested" }] }
                ]}
            ]
        }));
        assert_eq!(doc.text_length(), 8);
    }
}
