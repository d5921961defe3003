//! Page tree construction.
//!
//! The builder walks a page's classified items in reading order and keeps an
//! explicit chain of open sections, one slot per heading level. A heading
//! closes its own slot and every more specific one, then opens in its slot;
//! leaf content goes to the most specific open section.

use regex::Regex;

use crate::model::{ContentItem, ContentKind, HierarchyLevel, PageTree, SectionNode};

use super::ClassifiedItem;

/// Builds [`PageTree`]s from classified items.
#[derive(Debug, Clone)]
pub struct HierarchyBuilder {
    merge_numeric_runs: bool,
    numeric_pattern: Regex,
}

impl HierarchyBuilder {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self {
            merge_numeric_runs: false,
            numeric_pattern: Regex::new(r"^[\s.%-]*\d[\d\s.%-]*$")
                .expect("numeric run pattern is valid"),
        }
    }

    /// Append numeric-only body runs to the preceding paragraph.
    pub fn with_numeric_merge(mut self, merge: bool) -> Self {
        self.merge_numeric_runs = merge;
        self
    }

    /// Fold one page's items into a tree.
    ///
    /// Items must already be in reading order.
    pub fn build(&self, page_number: u32, items: Vec<ClassifiedItem>) -> PageTree {
        let mut chain = OpenChain::new(page_number);

        for ClassifiedItem { item, level } in items {
            match level.and_then(|l| l.slot().map(|slot| (l, slot))) {
                Some((level, slot)) => chain.open(slot, heading_node(level, item)),
                None => {
                    let current = chain.current_mut();
                    if self.merge_numeric_runs && self.try_merge(current, &item) {
                        continue;
                    }
                    current.push_content(item);
                }
            }
        }

        let sections = chain.finish();
        let tree = PageTree::new(page_number, sections);
        log::debug!(
            "Page {}: {} top-level sections, {} headings, {} leaves",
            page_number,
            tree.sections.len(),
            tree.heading_count(),
            tree.leaf_count()
        );
        tree
    }

    /// Merge a numeric-only run into the preceding paragraph of `node`.
    fn try_merge(&self, node: &mut SectionNode, item: &ContentItem) -> bool {
        let Some(text) = item.as_text() else {
            return false;
        };
        if !self.numeric_pattern.is_match(&text.text) {
            return false;
        }
        let Some(prev) = node.last_content_mut() else {
            return false;
        };
        let ContentKind::Text(prev_text) = &mut prev.kind else {
            return false;
        };
        prev_text.text.push(' ');
        prev_text.text.push_str(text.text.trim());
        prev.bbox = prev.bbox.union(&item.bbox);
        true
    }
}

impl Default for HierarchyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn heading_node(level: HierarchyLevel, item: ContentItem) -> SectionNode {
    let heading = item.as_text().map(|t| t.text.clone()).unwrap_or_default();
    SectionNode::heading(level, heading, item.bbox, item.page_number)
}

/// Open sections for the page being built.
struct OpenChain {
    page_number: u32,
    /// Title, Section, SubSection
    slots: [Option<SectionNode>; 3],
    /// Body group for content before the first heading
    loose: Option<SectionNode>,
    roots: Vec<SectionNode>,
}

impl OpenChain {
    fn new(page_number: u32) -> Self {
        Self {
            page_number,
            slots: [None, None, None],
            loose: None,
            roots: Vec::new(),
        }
    }

    /// Close `slot` and everything more specific, then open `node` there.
    fn open(&mut self, slot: usize, node: SectionNode) {
        self.close_from(slot);
        self.slots[slot] = Some(node);
    }

    /// The section that receives leaf content.
    fn current_mut(&mut self) -> &mut SectionNode {
        let page_number = self.page_number;
        match self.slots.iter_mut().rev().find_map(|s| s.as_mut()) {
            Some(node) => node,
            None => self
                .loose
                .get_or_insert_with(|| SectionNode::body_group(page_number)),
        }
    }

    fn close_from(&mut self, slot: usize) {
        if let Some(group) = self.loose.take() {
            self.roots.push(group);
        }
        for i in (slot..self.slots.len()).rev() {
            if let Some(node) = self.slots[i].take() {
                self.attach(i, node);
            }
        }
    }

    /// Attach a closed node to the nearest open coarser section, or the page.
    fn attach(&mut self, slot: usize, node: SectionNode) {
        match self.slots[..slot].iter_mut().rev().find_map(|s| s.as_mut()) {
            Some(parent) => parent.push_section(node),
            None => self.roots.push(node),
        }
    }

    fn finish(mut self) -> Vec<SectionNode> {
        self.close_from(0);
        self.roots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoundingBox, SectionChild, TextContent};

    fn bbox(y: f32) -> BoundingBox {
        BoundingBox::new(0.0, y, 200.0, y + 12.0)
    }

    fn heading(level: HierarchyLevel, text: &str, y: f32) -> ClassifiedItem {
        ClassifiedItem {
            item: ContentItem::text(1, bbox(y), TextContent::new(text, 20.0, true)),
            level: Some(level),
        }
    }

    fn body(text: &str, y: f32) -> ClassifiedItem {
        ClassifiedItem {
            item: ContentItem::text(1, bbox(y), TextContent::new(text, 12.0, false)),
            level: Some(HierarchyLevel::Body),
        }
    }

    fn figure(y: f32) -> ClassifiedItem {
        ClassifiedItem {
            item: ContentItem::figure(1, bbox(y)),
            level: None,
        }
    }

    fn leaf_texts(node: &SectionNode) -> Vec<String> {
        node.content().map(|i| i.plain_text()).collect()
    }

    #[test]
    fn test_nested_sections() {
        let items = vec![
            heading(HierarchyLevel::Title, "Introduction", 0.0),
            body("one", 20.0),
            body("two", 40.0),
            heading(HierarchyLevel::Section, "Background", 60.0),
            body("three", 80.0),
        ];
        let tree = HierarchyBuilder::new().build(1, items);

        assert_eq!(tree.sections.len(), 1);
        let title = &tree.sections[0];
        assert_eq!(title.level, HierarchyLevel::Title);
        assert_eq!(title.heading, "Introduction");
        assert_eq!(leaf_texts(title), vec!["one", "two"]);

        let sections: Vec<_> = title.sections().collect();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].heading, "Background");
        assert_eq!(leaf_texts(sections[0]), vec!["three"]);
    }

    #[test]
    fn test_sibling_subsections_not_merged() {
        let items = vec![
            heading(HierarchyLevel::Section, "A", 0.0),
            heading(HierarchyLevel::SubSection, "Details", 20.0),
            body("a", 40.0),
            heading(HierarchyLevel::Section, "B", 60.0),
            heading(HierarchyLevel::SubSection, "Details", 80.0),
            body("b", 100.0),
        ];
        let tree = HierarchyBuilder::new().build(1, items);

        assert_eq!(tree.sections.len(), 2);
        for (section, expected) in tree.sections.iter().zip(["a", "b"]) {
            let subs: Vec<_> = section.sections().collect();
            assert_eq!(subs.len(), 1);
            assert_eq!(subs[0].heading, "Details");
            assert_eq!(leaf_texts(subs[0]), vec![expected]);
        }
    }

    #[test]
    fn test_leading_content_goes_to_body_group() {
        let items = vec![
            body("preamble", 0.0),
            figure(20.0),
            heading(HierarchyLevel::Section, "First", 60.0),
            body("inside", 80.0),
        ];
        let tree = HierarchyBuilder::new().build(1, items);

        assert_eq!(tree.sections.len(), 2);
        let group = &tree.sections[0];
        assert_eq!(group.level, HierarchyLevel::Body);
        assert!(group.heading.is_empty());
        assert_eq!(group.leaf_count(), 2);
        assert_eq!(tree.sections[1].heading, "First");
    }

    #[test]
    fn test_coarser_heading_closes_chain() {
        let items = vec![
            heading(HierarchyLevel::Title, "T1", 0.0),
            heading(HierarchyLevel::Section, "S1", 20.0),
            heading(HierarchyLevel::SubSection, "SS1", 40.0),
            body("x", 60.0),
            heading(HierarchyLevel::Title, "T2", 80.0),
            body("y", 100.0),
        ];
        let tree = HierarchyBuilder::new().build(1, items);

        assert_eq!(tree.sections.len(), 2);
        let t1 = &tree.sections[0];
        let s1 = t1.sections().next().unwrap();
        let ss1 = s1.sections().next().unwrap();
        assert_eq!(ss1.heading, "SS1");
        assert_eq!(leaf_texts(ss1), vec!["x"]);
        assert_eq!(leaf_texts(&tree.sections[1]), vec!["y"]);
    }

    #[test]
    fn test_subsection_without_parents_is_top_level() {
        let items = vec![
            heading(HierarchyLevel::SubSection, "Loose sub", 0.0),
            body("x", 20.0),
            heading(HierarchyLevel::Title, "Title", 40.0),
        ];
        let tree = HierarchyBuilder::new().build(1, items);
        assert_eq!(tree.sections.len(), 2);
        assert_eq!(tree.sections[0].level, HierarchyLevel::SubSection);
        assert_eq!(tree.sections[1].level, HierarchyLevel::Title);
    }

    #[test]
    fn test_child_order_preserved() {
        let items = vec![
            heading(HierarchyLevel::Title, "T", 0.0),
            body("before", 20.0),
            heading(HierarchyLevel::Section, "S", 40.0),
            body("in section", 60.0),
        ];
        let tree = HierarchyBuilder::new().build(1, items);
        let children = &tree.sections[0].children;
        assert!(matches!(children[0], SectionChild::Content(_)));
        assert!(matches!(children[1], SectionChild::Section(_)));
    }

    #[test]
    fn test_numeric_merge() {
        let items = vec![
            body("Revenue grew by", 0.0),
            body("12.5 %", 20.0),
            body("Next paragraph", 40.0),
        ];
        let builder = HierarchyBuilder::new().with_numeric_merge(true);
        let tree = builder.build(1, items.clone());
        let group = &tree.sections[0];
        assert_eq!(leaf_texts(group), vec!["Revenue grew by 12.5 %", "Next paragraph"]);
        let merged = group.content().next().unwrap();
        assert_eq!(merged.bbox, bbox(0.0).union(&bbox(20.0)));

        let tree = HierarchyBuilder::new().build(1, items);
        assert_eq!(tree.leaf_count(), 3);
    }

    #[test]
    fn test_numeric_run_after_heading_not_merged() {
        let items = vec![
            heading(HierarchyLevel::Section, "Totals", 0.0),
            body("2024", 20.0),
        ];
        let tree = HierarchyBuilder::new().with_numeric_merge(true).build(1, items);
        assert_eq!(leaf_texts(&tree.sections[0]), vec!["2024"]);
    }

    #[test]
    fn test_empty_page() {
        let tree = HierarchyBuilder::new().build(5, Vec::new());
        assert_eq!(tree.page_number, 5);
        assert!(tree.sections.is_empty());
    }
}
