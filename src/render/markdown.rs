//! Markdown rendering of the document tree.

use crate::error::Result;
use crate::model::{ContentItem, ContentKind, Document, PageTree, SectionChild, SectionNode, TableContent};

use super::RenderOptions;

/// Convert a document to Markdown.
pub fn to_markdown(doc: &Document, options: &RenderOptions) -> Result<String> {
    let renderer = MarkdownRenderer::new(options.clone());
    renderer.render(doc)
}

/// Markdown renderer.
pub struct MarkdownRenderer {
    options: RenderOptions,
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render a document to Markdown.
    pub fn render(&self, doc: &Document) -> Result<String> {
        let mut output = String::new();

        for page in &doc.pages {
            if self.options.page_selection.includes(page.page_number) {
                self.render_page(&mut output, page);
            }
        }

        Ok(output.trim().to_string())
    }

    fn render_page(&self, output: &mut String, page: &PageTree) {
        if self.options.include_page_markers {
            output.push_str(&format!("<!-- page {} -->\n\n", page.page_number));
        }

        if let Some(reason) = page.failure_reason() {
            output.push_str(&format!(
                "<!-- page {} failed: {} -->\n\n",
                page.page_number,
                reason.replace("--", "- -")
            ));
            return;
        }

        for section in &page.sections {
            self.render_section(output, section);
        }
    }

    fn render_section(&self, output: &mut String, node: &SectionNode) {
        if let Some(depth) = node.level.slot() {
            let depth = depth + 1 + self.options.heading_offset as usize;
            output.push_str(&"#".repeat(depth.min(6)));
            output.push(' ');
            output.push_str(&self.escape(&node.heading));
            output.push_str("\n\n");
        }

        for child in &node.children {
            match child {
                SectionChild::Content(item) => self.render_content(output, item),
                SectionChild::Section(child) => self.render_section(output, child),
            }
        }
    }

    fn render_content(&self, output: &mut String, item: &ContentItem) {
        match &item.kind {
            ContentKind::Text(text) => {
                output.push_str(&self.escape(&text.text));
                output.push_str("\n\n");
            }
            ContentKind::Table(table) => self.render_table(output, table),
            ContentKind::Figure => {
                output.push_str(&format!("*[Chart {}]*\n\n", item.bbox));
            }
        }
    }

    fn render_table(&self, output: &mut String, table: &TableContent) {
        let col_count = table.column_count();
        if col_count == 0 {
            return;
        }

        for (i, row) in table.cells.iter().enumerate() {
            output.push('|');
            for cell in row {
                let content = self.escape(&cell.replace('\n', " "));
                output.push_str(&format!(" {} |", content.trim()));
            }
            output.push('\n');

            // First row doubles as the header
            if i == 0 {
                output.push('|');
                output.push_str(&" --- |".repeat(col_count));
                output.push('\n');
            }
        }

        output.push('\n');
    }

    fn escape(&self, text: &str) -> String {
        if self.options.escape_special_chars {
            escape_markdown(text)
        } else {
            text.to_string()
        }
    }
}

/// Escape special Markdown characters.
/// Only characters that could be misinterpreted as inline syntax are escaped.
fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '`' | '*' | '_' | '[' | ']' | '|' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoundingBox, HierarchyLevel, TextContent};

    fn bbox() -> BoundingBox {
        BoundingBox::new(0.0, 0.0, 100.0, 20.0)
    }

    fn paragraph(text: &str) -> ContentItem {
        ContentItem::text(1, bbox(), TextContent::new(text, 12.0, false))
    }

    fn sample_document() -> Document {
        let mut section = SectionNode::heading(HierarchyLevel::Section, "Background", bbox(), 1);
        section.push_content(paragraph("Nested text"));
        section.push_content(ContentItem::table(
            1,
            bbox(),
            TableContent::new(vec![
                vec!["Name".to_string(), "Value".to_string()],
                vec!["a|b".to_string(), "1".to_string()],
            ]),
        ));

        let mut title = SectionNode::heading(HierarchyLevel::Title, "Introduction", bbox(), 1);
        title.push_content(paragraph("Hello, world!"));
        title.push_section(section);

        let mut doc = Document::new("doc.pdf");
        doc.pages.push(PageTree::new(1, vec![title]));
        doc.pages.push(PageTree::failed(2, "table grid is not rectangular"));
        doc
    }

    #[test]
    fn test_escape_markdown() {
        assert_eq!(escape_markdown("Hello *world*"), "Hello \\*world\\*");
        assert_eq!(escape_markdown("[link]"), "\\[link\\]");
    }

    #[test]
    fn test_render_headings() {
        let result = to_markdown(&sample_document(), &RenderOptions::new()).unwrap();
        assert!(result.starts_with("# Introduction\n\nHello, world!\n\n## Background"));
    }

    #[test]
    fn test_heading_offset() {
        let options = RenderOptions::new().with_heading_offset(1);
        let result = to_markdown(&sample_document(), &options).unwrap();
        assert!(result.contains("## Introduction"));
        assert!(result.contains("### Background"));
    }

    #[test]
    fn test_render_table() {
        let result = to_markdown(&sample_document(), &RenderOptions::new()).unwrap();
        assert!(result.contains("| Name | Value |\n| --- | --- |\n| a\\|b | 1 |"));
    }

    #[test]
    fn test_failed_page_and_markers() {
        let options = RenderOptions::new().with_page_markers(true);
        let result = to_markdown(&sample_document(), &options).unwrap();
        assert!(result.starts_with("<!-- page 1 -->"));
        assert!(result.contains("<!-- page 2 failed: table grid is not rectangular -->"));
    }

    #[test]
    fn test_page_selection() {
        let options = RenderOptions::new().with_page_range(2..=2);
        let result = to_markdown(&sample_document(), &options).unwrap();
        assert!(!result.contains("Introduction"));
        assert!(result.contains("page 2 failed"));
    }

    #[test]
    fn test_body_group_has_no_heading() {
        let mut group = SectionNode::body_group(1);
        group.push_content(paragraph("Loose"));
        group.push_content(ContentItem::figure(1, bbox()));
        let mut doc = Document::new("doc.pdf");
        doc.pages.push(PageTree::new(1, vec![group]));

        let result = to_markdown(&doc, &RenderOptions::new()).unwrap();
        assert!(result.starts_with("Loose\n\n*[Chart"));
        assert!(!result.contains('#'));
    }
}
