//! crates/blog_core/src/content.rs
//!
//! The rich-text document model produced by the block editor.
//!
//! A blog body is a list of blocks. Only five block kinds have a typed shape;
//! anything else is kept verbatim as `ContentBlock::Unknown` so that editing a
//! blog never silently drops data the client does not understand.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};

//=========================================================================================
// Content Document
//=========================================================================================

/// The editor document: a list of blocks plus editor bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<i64>,
    pub blocks: Vec<ContentBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl Content {
    pub fn from_blocks(blocks: Vec<ContentBlock>) -> Self {
        Self {
            time: None,
            blocks,
            version: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

#[derive(Deserialize)]
struct ContentDocument {
    #[serde(default)]
    time: Option<i64>,
    #[serde(default)]
    blocks: Vec<ContentBlock>,
    #[serde(default)]
    version: Option<String>,
}

impl From<ContentDocument> for Content {
    fn from(doc: ContentDocument) -> Self {
        Self {
            time: doc.time,
            blocks: doc.blocks,
            version: doc.version,
        }
    }
}

/// Every shape the backend and older drafts have been seen to store.
///
/// Variant order matters for the untagged match: a bare block list must be
/// tried before a list of wrapped documents.
#[derive(Deserialize)]
#[serde(untagged)]
enum ContentShape {
    Document(ContentDocument),
    Blocks(Vec<ContentBlock>),
    Wrapped(Vec<ContentDocument>),
}

impl<'de> Deserialize<'de> for Content {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let shape = Option::<ContentShape>::deserialize(deserializer)?;
        Ok(match shape {
            None => Content::default(),
            Some(ContentShape::Document(doc)) => doc.into(),
            Some(ContentShape::Blocks(blocks)) => Content::from_blocks(blocks),
            Some(ContentShape::Wrapped(docs)) => docs
                .into_iter()
                .next()
                .map(Content::from)
                .unwrap_or_default(),
        })
    }
}

//=========================================================================================
// Blocks
//=========================================================================================

/// Heading sizes the renderer distinguishes. Level 3 is a sub-heading, every
/// other stored level collapses to a section heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderLevel {
    Section,
    Subsection,
}

impl HeaderLevel {
    pub fn from_level(level: u64) -> Self {
        if level == 3 {
            HeaderLevel::Subsection
        } else {
            HeaderLevel::Section
        }
    }

    pub fn as_level(self) -> u8 {
        match self {
            HeaderLevel::Section => 2,
            HeaderLevel::Subsection => 3,
        }
    }
}

/// One editor block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawBlock", into = "RawBlock")]
pub enum ContentBlock {
    Paragraph { text: String },
    Header { level: HeaderLevel, text: String },
    Image { url: String, caption: String },
    Quote { text: String, caption: String },
    List { ordered: bool, items: Vec<String> },
    Unknown { kind: String, data: Value },
}

impl ContentBlock {
    pub fn paragraph(text: impl Into<String>) -> Self {
        ContentBlock::Paragraph { text: text.into() }
    }

    pub fn header(level: u64, text: impl Into<String>) -> Self {
        ContentBlock::Header {
            level: HeaderLevel::from_level(level),
            text: text.into(),
        }
    }
}

/// The wire shape of a block: `{ "type": "...", "data": { ... } }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Value,
}

#[derive(Deserialize)]
struct TextData {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct HeaderData {
    #[serde(default)]
    text: String,
    #[serde(default)]
    level: u64,
}

#[derive(Deserialize)]
struct ImageFile {
    url: String,
}

#[derive(Deserialize)]
struct ImageData {
    file: ImageFile,
    #[serde(default)]
    caption: String,
}

#[derive(Deserialize)]
struct QuoteData {
    #[serde(default)]
    text: String,
    #[serde(default)]
    caption: String,
}

#[derive(Deserialize)]
struct ListData {
    #[serde(default)]
    style: String,
    items: Vec<String>,
}

fn typed<T: DeserializeOwned>(data: &Value) -> Option<T> {
    serde_json::from_value(data.clone()).ok()
}

impl From<RawBlock> for ContentBlock {
    fn from(raw: RawBlock) -> Self {
        let parsed = match raw.kind.as_str() {
            "paragraph" => typed::<TextData>(&raw.data).map(|d| ContentBlock::Paragraph { text: d.text }),
            "header" => typed::<HeaderData>(&raw.data).map(|d| ContentBlock::Header {
                level: HeaderLevel::from_level(d.level),
                text: d.text,
            }),
            "image" => typed::<ImageData>(&raw.data).map(|d| ContentBlock::Image {
                url: d.file.url,
                caption: d.caption,
            }),
            "quote" => typed::<QuoteData>(&raw.data).map(|d| ContentBlock::Quote {
                text: d.text,
                caption: d.caption,
            }),
            "list" => typed::<ListData>(&raw.data).map(|d| ContentBlock::List {
                ordered: d.style == "ordered",
                items: d.items,
            }),
            _ => None,
        };

        parsed.unwrap_or(ContentBlock::Unknown {
            kind: raw.kind,
            data: raw.data,
        })
    }
}

impl From<ContentBlock> for RawBlock {
    fn from(block: ContentBlock) -> Self {
        let (kind, data) = match block {
            ContentBlock::Paragraph { text } => ("paragraph".to_string(), json!({ "text": text })),
            ContentBlock::Header { level, text } => (
                "header".to_string(),
                json!({ "text": text, "level": level.as_level() }),
            ),
            ContentBlock::Image { url, caption } => (
                "image".to_string(),
                json!({ "file": { "url": url }, "caption": caption }),
            ),
            ContentBlock::Quote { text, caption } => (
                "quote".to_string(),
                json!({ "text": text, "caption": caption }),
            ),
            ContentBlock::List { ordered, items } => (
                "list".to_string(),
                json!({ "style": if ordered { "ordered" } else { "unordered" }, "items": items }),
            ),
            ContentBlock::Unknown { kind, data } => (kind, data),
        };
        RawBlock { id: None, kind, data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn content_accepts_document_object() {
        let content: Content = serde_json::from_value(json!({
            "time": 1700000000,
            "blocks": [{ "id": "a1", "type": "paragraph", "data": { "text": "hello" } }],
            "version": "2.28.0"
        }))
        .unwrap();

        assert_eq!(content.time, Some(1700000000));
        assert_eq!(content.blocks, vec![ContentBlock::paragraph("hello")]);
    }

    #[test]
    fn content_unwraps_single_element_array() {
        let content: Content = serde_json::from_value(json!([
            { "blocks": [{ "type": "header", "data": { "text": "Title", "level": 3 } }] }
        ]))
        .unwrap();

        assert_eq!(content.blocks, vec![ContentBlock::header(3, "Title")]);
    }

    #[test]
    fn content_accepts_bare_block_list() {
        let content: Content = serde_json::from_value(json!([
            { "type": "paragraph", "data": { "text": "one" } },
            { "type": "paragraph", "data": { "text": "two" } }
        ]))
        .unwrap();

        assert_eq!(content.blocks.len(), 2);
    }

    #[test]
    fn null_content_is_empty() {
        let content: Content = serde_json::from_value(Value::Null).unwrap();
        assert!(content.is_empty());
    }

    #[test]
    fn unknown_block_kind_is_preserved() {
        let block: ContentBlock =
            serde_json::from_value(json!({ "type": "embed", "data": { "service": "youtube" } }))
                .unwrap();

        assert_eq!(
            block,
            ContentBlock::Unknown {
                kind: "embed".into(),
                data: json!({ "service": "youtube" })
            }
        );
        let back = serde_json::to_value(&block).unwrap();
        assert_eq!(back["type"], "embed");
    }

    #[test]
    fn malformed_known_block_degrades_to_unknown() {
        let block: ContentBlock =
            serde_json::from_value(json!({ "type": "image", "data": { "caption": "no file" } }))
                .unwrap();
        assert!(matches!(block, ContentBlock::Unknown { .. }));
    }

    #[test]
    fn header_levels_collapse_to_two_sizes() {
        assert_eq!(HeaderLevel::from_level(3), HeaderLevel::Subsection);
        assert_eq!(HeaderLevel::from_level(1), HeaderLevel::Section);
        assert_eq!(HeaderLevel::from_level(4), HeaderLevel::Section);
    }

    #[test]
    fn list_style_round_trips_through_wire_shape() {
        let block = ContentBlock::List {
            ordered: true,
            items: vec!["a".into(), "b".into()],
        };
        let wire = serde_json::to_value(&block).unwrap();
        assert_eq!(wire["data"]["style"], "ordered");
        let parsed: ContentBlock = serde_json::from_value(wire).unwrap();
        assert_eq!(parsed, block);
    }
}
