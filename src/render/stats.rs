//! Structure statistics for a document tree.

use serde::{Deserialize, Serialize};

use crate::model::{ContentKind, Document, HierarchyLevel, SectionChild, SectionNode};

/// Counts collected by walking a document tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureStats {
    /// Total number of pages
    pub page_count: u32,

    /// Pages replaced by failure markers
    pub failed_page_count: u32,

    /// Title sections
    pub title_count: u32,

    /// Section sections
    pub section_count: u32,

    /// Sub-section sections
    pub subsection_count: u32,

    /// Headingless body groups
    pub body_group_count: u32,

    /// Paragraph leaves
    pub paragraph_count: u32,

    /// Table leaves
    pub table_count: u32,

    /// Chart leaves
    pub chart_count: u32,

    /// Approximate word count (whitespace-separated tokens)
    pub word_count: u32,
}

impl StructureStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk a document and count its structure.
    pub fn collect(doc: &Document) -> Self {
        let mut stats = Self::new();
        for page in &doc.pages {
            stats.page_count += 1;
            if page.is_failed() {
                stats.failed_page_count += 1;
            }
            for section in &page.sections {
                stats.add_section(section);
            }
        }
        stats
    }

    /// Total number of heading sections.
    pub fn heading_count(&self) -> u32 {
        self.title_count + self.section_count + self.subsection_count
    }

    /// Total number of leaf items.
    pub fn leaf_count(&self) -> u32 {
        self.paragraph_count + self.table_count + self.chart_count
    }

    fn add_section(&mut self, node: &SectionNode) {
        match node.level {
            HierarchyLevel::Title => self.title_count += 1,
            HierarchyLevel::Section => self.section_count += 1,
            HierarchyLevel::SubSection => self.subsection_count += 1,
            HierarchyLevel::Body => self.body_group_count += 1,
        }
        self.count_text(&node.heading);

        for child in &node.children {
            match child {
                SectionChild::Section(child) => self.add_section(child),
                SectionChild::Content(item) => match &item.kind {
                    ContentKind::Text(text) => {
                        self.paragraph_count += 1;
                        self.count_text(&text.text);
                    }
                    ContentKind::Table(_) => self.table_count += 1,
                    ContentKind::Figure => self.chart_count += 1,
                },
            }
        }
    }

    fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
    }
}
