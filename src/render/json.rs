//! JSON rendering of the document tree.
//!
//! The output separates each section's leaf content from its nested sections:
//!
//! ```text
//! {"document": ..., "pages": [{"page_number": 1, "sections": [
//!     {"level": "title", "heading": ..., "content": [...], "children": [...]}
//! ]}]}
//! ```
//!
//! Paragraphs carry `text`, tables carry `table_data`, and figures render as
//! `chart` entries with a null `table_data`.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{BoundingBox, ContentItem, ContentKind, Document, HierarchyLevel, PageTree, SectionNode};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialized view of a [`Document`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonDocument {
    /// Source name
    pub document: String,
    /// Pages in page-number order
    pub pages: Vec<JsonPage>,
}

/// Serialized view of a [`PageTree`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonPage {
    /// Page number (1-indexed)
    pub page_number: u32,
    /// Top-level sections
    pub sections: Vec<JsonSection>,
    /// Failure reason, present only for failed pages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Serialized view of a [`SectionNode`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonSection {
    /// Hierarchy level
    pub level: HierarchyLevel,
    /// Heading text (empty for body groups)
    pub heading: String,
    /// Leaf content in reading order
    pub content: Vec<JsonContent>,
    /// Nested sections in reading order
    pub children: Vec<JsonSection>,
}

/// A leaf content entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum JsonContent {
    /// A text paragraph
    Paragraph {
        /// Paragraph text
        text: String,
        /// Position on the page
        bbox: BoundingBox,
    },
    /// A table with its cell grid
    Table {
        /// Position on the page
        bbox: BoundingBox,
        /// Row-major cells
        table_data: Vec<Vec<String>>,
    },
    /// A figure or chart region
    Chart {
        /// Position on the page
        bbox: BoundingBox,
        /// Always null; charts carry no extracted data
        table_data: (),
    },
}

impl From<&Document> for JsonDocument {
    fn from(doc: &Document) -> Self {
        Self {
            document: doc.metadata.source.clone(),
            pages: doc.pages.iter().map(JsonPage::from).collect(),
        }
    }
}

impl From<&PageTree> for JsonPage {
    fn from(page: &PageTree) -> Self {
        Self {
            page_number: page.page_number,
            sections: page.sections.iter().map(JsonSection::from).collect(),
            error: page.failure_reason().map(str::to_string),
        }
    }
}

impl From<&SectionNode> for JsonSection {
    fn from(node: &SectionNode) -> Self {
        Self {
            level: node.level,
            heading: node.heading.clone(),
            content: node.content().map(JsonContent::from).collect(),
            children: node.sections().map(JsonSection::from).collect(),
        }
    }
}

impl From<&ContentItem> for JsonContent {
    fn from(item: &ContentItem) -> Self {
        match &item.kind {
            ContentKind::Text(text) => JsonContent::Paragraph {
                text: text.text.clone(),
                bbox: item.bbox,
            },
            ContentKind::Table(table) => JsonContent::Table {
                bbox: item.bbox,
                table_data: table.cells.clone(),
            },
            ContentKind::Figure => JsonContent::Chart {
                bbox: item.bbox,
                table_data: (),
            },
        }
    }
}

impl JsonDocument {
    /// Serialize this view.
    pub fn render(&self, format: JsonFormat) -> Result<String> {
        let result = match format {
            JsonFormat::Pretty => serde_json::to_string_pretty(self),
            JsonFormat::Compact => serde_json::to_string(self),
        };

        result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
    }
}

/// Convert a document to JSON.
pub fn to_json(doc: &Document, format: JsonFormat) -> Result<String> {
    JsonDocument::from(doc).render(format)
}

/// Parse JSON produced by [`to_json`].
pub fn from_json(json: &str) -> Result<JsonDocument> {
    serde_json::from_str(json).map_err(|e| Error::InvalidInput(format!("JSON parse error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TableContent, TextContent};

    fn sample_document() -> Document {
        let bbox = BoundingBox::new(10.0, 20.0, 200.0, 40.0);
        let mut title = SectionNode::heading(HierarchyLevel::Title, "Report", bbox, 1);
        title.push_content(ContentItem::text(1, bbox, TextContent::new("Hello", 12.0, false)));
        title.push_content(ContentItem::table(
            1,
            bbox,
            TableContent::new(vec![vec!["a".to_string(), String::new()]]),
        ));
        title.push_content(ContentItem::figure(1, bbox));

        let mut doc = Document::new("report.pdf");
        doc.pages.push(PageTree::new(1, vec![title]));
        doc.pages.push(PageTree::failed(2, "bad table"));
        doc.metadata.page_count = 2;
        doc
    }

    #[test]
    fn test_to_json_shape() {
        let json = to_json(&sample_document(), JsonFormat::Compact).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["document"], "report.pdf");
        let section = &value["pages"][0]["sections"][0];
        assert_eq!(section["level"], "title");
        assert_eq!(section["heading"], "Report");
        assert_eq!(section["content"][0]["type"], "paragraph");
        assert_eq!(section["content"][0]["bbox"][2], 200.0);
        assert_eq!(section["content"][1]["type"], "table");
        assert_eq!(section["content"][1]["table_data"][0][1], "");
        assert_eq!(section["content"][2]["type"], "chart");
        assert!(section["content"][2]["table_data"].is_null());
        assert!(value["pages"][0].get("error").is_none());
        assert_eq!(value["pages"][1]["error"], "bad table");
    }

    #[test]
    fn test_key_order() {
        let json = to_json(&sample_document(), JsonFormat::Compact).unwrap();
        assert!(json.starts_with(r#"{"document":"report.pdf","pages":[{"page_number":1,"sections":[{"level":"title","heading":"Report","content":[{"type":"paragraph","text":"Hello","bbox":[10.0,20.0,200.0,40.0]}"#));
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&sample_document(), JsonFormat::Pretty).unwrap();
        assert!(json.contains('\n'));
        let compact = to_json(&sample_document(), JsonFormat::Compact).unwrap();
        assert!(!compact.contains('\n'));
    }

    #[test]
    fn test_from_json_roundtrip() {
        let doc = sample_document();
        let parsed = from_json(&to_json(&doc, JsonFormat::Pretty).unwrap()).unwrap();
        assert_eq!(parsed, JsonDocument::from(&doc));
    }

    #[test]
    fn test_chart_table_data_must_be_null() {
        let chart = |data: &str| {
            format!(
                r#"{{"document":"d.pdf","pages":[{{"page_number":1,"sections":[{{"level":"body","heading":"","content":[{{"type":"chart","bbox":[0,0,10,10],"table_data":{}}}],"children":[]}}]}}]}}"#,
                data
            )
        };

        let parsed = from_json(&chart("null")).unwrap();
        assert!(matches!(
            parsed.pages[0].sections[0].content[0],
            JsonContent::Chart { .. }
        ));
        assert!(matches!(
            from_json(&chart(r#"[["a"]]"#)),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(matches!(from_json("{"), Err(Error::InvalidInput(_))));
    }
}
