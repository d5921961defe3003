//! Integration tests for the extractor seam.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use pdfstruct::error::Result;
use pdfstruct::{
    build_from_extractors, collect_primitives, BoundingBox, BuildOptions, Error, FigureExtractor,
    FigureRegion, HierarchyLevel, TableExtractor, TableRegion, TextExtractor, TextRun,
};

/// Text extractor backed by a fixed map of pages.
struct MockText {
    pages: HashMap<u32, Vec<TextRun>>,
    calls: AtomicUsize,
}

impl MockText {
    fn new() -> Self {
        let mut pages = HashMap::new();
        pages.insert(
            1,
            vec![
                TextRun::bold("Overview", 20.0, BoundingBox::new(40.0, 40.0, 300.0, 60.0)),
                TextRun::new("Inside the grid", 10.0, BoundingBox::new(60.0, 120.0, 160.0, 130.0)),
                TextRun::new("Closing words.", 10.0, BoundingBox::new(40.0, 400.0, 300.0, 410.0)),
            ],
        );
        pages.insert(
            2,
            vec![TextRun::new("Page two body.", 10.0, BoundingBox::new(40.0, 40.0, 300.0, 50.0))],
        );
        Self {
            pages,
            calls: AtomicUsize::new(0),
        }
    }
}

impl TextExtractor for MockText {
    fn extract(&self, page_number: u32) -> Result<Vec<TextRun>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.pages.get(&page_number).cloned().unwrap_or_default())
    }
}

struct MockTables;

impl TableExtractor for MockTables {
    fn extract(&self, page_number: u32) -> Result<Vec<TableRegion>> {
        if page_number == 1 {
            Ok(vec![TableRegion::new(
                BoundingBox::new(40.0, 100.0, 400.0, 200.0),
                vec![vec!["Inside the grid", "1"]],
            )])
        } else {
            Ok(Vec::new())
        }
    }
}

struct NoFigures;

impl FigureExtractor for NoFigures {
    fn extract(&self, _page_number: u32) -> Result<Vec<FigureRegion>> {
        Ok(Vec::new())
    }
}

struct BrokenFigures;

impl FigureExtractor for BrokenFigures {
    fn extract(&self, page_number: u32) -> Result<Vec<FigureRegion>> {
        Err(Error::Extractor {
            page: page_number,
            message: "image decoder unavailable".to_string(),
        })
    }
}

#[test]
fn test_collect_queries_every_page() {
    let text = MockText::new();
    let pages = collect_primitives(3, &text, &MockTables, &NoFigures).unwrap();

    assert_eq!(text.calls.load(Ordering::SeqCst), 3);
    let numbers: Vec<u32> = pages.iter().map(|p| p.page_number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert_eq!(pages[0].tables.len(), 1);
    assert_eq!(pages[2].item_count(), 0);
}

#[test]
fn test_build_from_mock_extractors() {
    let doc = build_from_extractors(
        "mock.pdf",
        2,
        &MockText::new(),
        &MockTables,
        &NoFigures,
        BuildOptions::default(),
    )
    .unwrap();

    let first = &doc.pages[0];
    assert_eq!(first.sections.len(), 1);
    let overview = &first.sections[0];
    assert_eq!(overview.level, HierarchyLevel::Title);

    let leaves: Vec<_> = overview.content().collect();
    assert_eq!(leaves.len(), 2);
    assert!(leaves[0].is_table());
    assert_eq!(leaves[1].plain_text(), "Closing words.");

    assert_eq!(doc.pages[1].sections[0].level, HierarchyLevel::Body);
}

#[test]
fn test_extractor_failure_aborts() {
    let result = build_from_extractors(
        "mock.pdf",
        2,
        &MockText::new(),
        &MockTables,
        &BrokenFigures,
        BuildOptions::default(),
    );

    match result {
        Err(Error::Extractor { page, message }) => {
            assert_eq!(page, 1);
            assert!(message.contains("image decoder"));
        }
        other => panic!("Expected extractor error, got {:?}", other.map(|d| d.page_count())),
    }
}
