//! Document-level types.

use super::SectionNode;
use serde::{Deserialize, Serialize};

/// An assembled document tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document metadata
    pub metadata: Metadata,

    /// Page trees in page order
    pub pages: Vec<PageTree>,
}

impl Document {
    /// Create a new empty document for a source.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            metadata: Metadata::new(source),
            pages: Vec::new(),
        }
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Get a page by number (1-indexed).
    pub fn get_page(&self, page_number: u32) -> Option<&PageTree> {
        self.pages.iter().find(|p| p.page_number == page_number)
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Iterate over pages whose extraction failed.
    pub fn failed_pages(&self) -> impl Iterator<Item = &PageTree> {
        self.pages.iter().filter(|p| p.is_failed())
    }

    /// Get plain text content of the entire document.
    pub fn plain_text(&self) -> String {
        self.pages
            .iter()
            .map(|page| page.plain_text())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Document metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Source document name
    pub source: String,

    /// Number of pages processed
    pub page_count: u32,

    /// Pages that failed and carry a placeholder instead of content
    pub failed_pages: Vec<u32>,

    /// Whether heading classification degraded to a flat body list
    pub degraded: bool,
}

impl Metadata {
    /// Create metadata for a source name.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Default::default()
        }
    }
}

/// The section tree of a single page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageTree {
    /// Page number (1-indexed)
    pub page_number: u32,

    /// Top-level sections in reading order
    pub sections: Vec<SectionNode>,

    /// Whether the page was built or replaced by a failure marker
    pub status: PageStatus,
}

impl PageTree {
    /// Create a built page.
    pub fn new(page_number: u32, sections: Vec<SectionNode>) -> Self {
        Self {
            page_number,
            sections,
            status: PageStatus::Complete,
        }
    }

    /// Create a placeholder for a page whose primitives were rejected.
    pub fn failed(page_number: u32, reason: impl Into<String>) -> Self {
        Self {
            page_number,
            sections: Vec::new(),
            status: PageStatus::Failed {
                reason: reason.into(),
            },
        }
    }

    /// Check if this page is a failure placeholder.
    pub fn is_failed(&self) -> bool {
        matches!(self.status, PageStatus::Failed { .. })
    }

    /// Failure reason, if any.
    pub fn failure_reason(&self) -> Option<&str> {
        match &self.status {
            PageStatus::Failed { reason } => Some(reason),
            PageStatus::Complete => None,
        }
    }

    /// Count leaf items on the page.
    pub fn leaf_count(&self) -> usize {
        self.sections.iter().map(|s| s.leaf_count()).sum()
    }

    /// Count heading nodes on the page.
    pub fn heading_count(&self) -> usize {
        self.sections.iter().map(|s| s.heading_count()).sum()
    }

    /// Get plain text content of the page.
    pub fn plain_text(&self) -> String {
        self.sections
            .iter()
            .map(|s| s.plain_text())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Outcome of building a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PageStatus {
    /// The page was built normally
    Complete,

    /// The page's primitives were malformed; it carries no sections
    Failed {
        /// Why the page was rejected
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_new() {
        let doc = Document::new("report.pdf");
        assert!(doc.is_empty());
        assert_eq!(doc.page_count(), 0);
        assert_eq!(doc.metadata.source, "report.pdf");
    }

    #[test]
    fn test_failed_page() {
        let page = PageTree::failed(4, "bad bbox");
        assert!(page.is_failed());
        assert_eq!(page.failure_reason(), Some("bad bbox"));
        assert_eq!(page.leaf_count(), 0);

        let mut doc = Document::new("x");
        doc.pages.push(PageTree::new(1, Vec::new()));
        doc.pages.push(page);
        assert_eq!(doc.failed_pages().count(), 1);
        assert_eq!(doc.get_page(4).map(|p| p.page_number), Some(4));
        assert!(doc.get_page(2).is_none());
    }
}
