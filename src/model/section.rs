//! Section hierarchy types.

use super::{BoundingBox, ContentItem};
use serde::{Deserialize, Serialize};

/// Hierarchy level of a section, ordered from most general to most specific.
///
/// `Title < Section < SubSection < Body`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HierarchyLevel {
    /// Document or chapter title
    Title,
    /// Section heading
    Section,
    /// Sub-section heading
    SubSection,
    /// Body text (never opens a section of its own)
    Body,
}

impl HierarchyLevel {
    /// Heading levels in order of specificity.
    pub const HEADINGS: [HierarchyLevel; 3] = [
        HierarchyLevel::Title,
        HierarchyLevel::Section,
        HierarchyLevel::SubSection,
    ];

    /// Check if this level opens a section.
    pub fn is_heading(self) -> bool {
        self != HierarchyLevel::Body
    }

    /// Slot index among heading levels (`None` for body).
    pub fn slot(self) -> Option<usize> {
        match self {
            HierarchyLevel::Title => Some(0),
            HierarchyLevel::Section => Some(1),
            HierarchyLevel::SubSection => Some(2),
            HierarchyLevel::Body => None,
        }
    }

    /// Lowercase name as used in JSON output.
    pub fn as_str(self) -> &'static str {
        match self {
            HierarchyLevel::Title => "title",
            HierarchyLevel::Section => "section",
            HierarchyLevel::SubSection => "subsection",
            HierarchyLevel::Body => "body",
        }
    }
}

impl std::fmt::Display for HierarchyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node of the section tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionNode {
    /// Level of this node
    pub level: HierarchyLevel,

    /// Heading text (empty for body groups)
    pub heading: String,

    /// Position of the heading run, if the node has one
    pub heading_bbox: Option<BoundingBox>,

    /// Page the node starts on (1-indexed)
    pub page_number: u32,

    /// Leaf content and nested sections, in attachment order
    pub children: Vec<SectionChild>,
}

impl SectionNode {
    /// Create a node opened by a heading run.
    pub fn heading(
        level: HierarchyLevel,
        heading: impl Into<String>,
        bbox: BoundingBox,
        page_number: u32,
    ) -> Self {
        Self {
            level,
            heading: heading.into(),
            heading_bbox: Some(bbox),
            page_number,
            children: Vec::new(),
        }
    }

    /// Create an implicit body group with no heading.
    pub fn body_group(page_number: u32) -> Self {
        Self {
            level: HierarchyLevel::Body,
            heading: String::new(),
            heading_bbox: None,
            page_number,
            children: Vec::new(),
        }
    }

    /// Append a leaf content item.
    pub fn push_content(&mut self, item: ContentItem) {
        self.children.push(SectionChild::Content(item));
    }

    /// Append a nested section, which must be more specific than this node.
    pub fn push_section(&mut self, node: SectionNode) {
        debug_assert!(
            node.level > self.level,
            "{} node nested under {} node",
            node.level,
            self.level
        );
        self.children.push(SectionChild::Section(node));
    }

    /// Iterate over leaf content items directly under this node.
    pub fn content(&self) -> impl Iterator<Item = &ContentItem> {
        self.children.iter().filter_map(|c| match c {
            SectionChild::Content(item) => Some(item),
            SectionChild::Section(_) => None,
        })
    }

    /// Iterate over nested sections directly under this node.
    pub fn sections(&self) -> impl Iterator<Item = &SectionNode> {
        self.children.iter().filter_map(|c| match c {
            SectionChild::Section(node) => Some(node),
            SectionChild::Content(_) => None,
        })
    }

    /// Get the last leaf child if the most recent child is a leaf.
    pub fn last_content_mut(&mut self) -> Option<&mut ContentItem> {
        match self.children.last_mut() {
            Some(SectionChild::Content(item)) => Some(item),
            _ => None,
        }
    }

    /// Count leaf items in this subtree.
    pub fn leaf_count(&self) -> usize {
        self.children
            .iter()
            .map(|c| match c {
                SectionChild::Content(_) => 1,
                SectionChild::Section(node) => node.leaf_count(),
            })
            .sum()
    }

    /// Count heading nodes in this subtree (including this one).
    pub fn heading_count(&self) -> usize {
        let own = usize::from(self.level.is_heading());
        own + self.sections().map(|s| s.heading_count()).sum::<usize>()
    }

    /// Get plain text of the subtree: heading first, then children in order.
    pub fn plain_text(&self) -> String {
        let mut parts = Vec::new();
        if !self.heading.is_empty() {
            parts.push(self.heading.clone());
        }
        for child in &self.children {
            let text = match child {
                SectionChild::Content(item) => item.plain_text(),
                SectionChild::Section(node) => node.plain_text(),
            };
            if !text.is_empty() {
                parts.push(text);
            }
        }
        parts.join("\n\n")
    }
}

/// A child of a section node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "child", rename_all = "snake_case")]
pub enum SectionChild {
    /// Leaf content (body text, table, figure)
    Content(ContentItem),

    /// Nested section
    Section(SectionNode),
}
