//! Extractor abstraction layer.
//!
//! Text, table and figure detection happen outside this crate. The traits
//! here describe what each extractor hands over per page, isolating the
//! reconstruction pipeline from any concrete PDF library.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::model::{FigureRegion, PagePrimitives, PrimitiveSet, TableRegion, TextRun};

/// Source of positioned text runs.
pub trait TextExtractor: Send + Sync {
    /// Return the text runs of a page (1-indexed).
    fn extract(&self, page_number: u32) -> Result<Vec<TextRun>>;
}

/// Source of detected tables.
pub trait TableExtractor: Send + Sync {
    /// Return the tables of a page (1-indexed).
    fn extract(&self, page_number: u32) -> Result<Vec<TableRegion>>;
}

/// Source of figure and chart regions.
pub trait FigureExtractor: Send + Sync {
    /// Return the figure regions of a page (1-indexed).
    fn extract(&self, page_number: u32) -> Result<Vec<FigureRegion>>;
}

/// Query all three extractors for pages `1..=page_count`.
///
/// Any extractor failure aborts collection and is reported as
/// [`Error::Extractor`] for the page it occurred on.
pub fn collect_primitives(
    page_count: u32,
    text: &dyn TextExtractor,
    tables: &dyn TableExtractor,
    figures: &dyn FigureExtractor,
) -> Result<Vec<PagePrimitives>> {
    let mut pages = Vec::with_capacity(page_count as usize);

    for page_number in 1..=page_count {
        let page = PagePrimitives {
            page_number,
            text_runs: text.extract(page_number).map_err(|e| extractor_error(page_number, e))?,
            tables: tables.extract(page_number).map_err(|e| extractor_error(page_number, e))?,
            figures: figures.extract(page_number).map_err(|e| extractor_error(page_number, e))?,
        };
        log::debug!(
            "Collected page {}: {} runs, {} tables, {} figures",
            page_number,
            page.text_runs.len(),
            page.tables.len(),
            page.figures.len()
        );
        pages.push(page);
    }

    Ok(pages)
}

fn extractor_error(page: u32, err: Error) -> Error {
    match err {
        Error::Extractor { .. } => err,
        other => Error::Extractor {
            page,
            message: other.to_string(),
        },
    }
}

/// Replays a recorded [`PrimitiveSet`] through the extractor traits.
#[derive(Debug, Clone, Default)]
pub struct RecordedExtractor {
    pages: BTreeMap<u32, PagePrimitives>,
}

impl RecordedExtractor {
    /// Index a recorded set by page number.
    ///
    /// Later entries for the same page number are appended to earlier ones.
    pub fn new(set: PrimitiveSet) -> Self {
        let mut pages: BTreeMap<u32, PagePrimitives> = BTreeMap::new();
        for page in set.pages {
            let entry = pages
                .entry(page.page_number)
                .or_insert_with(|| PagePrimitives::new(page.page_number));
            entry.text_runs.extend(page.text_runs);
            entry.tables.extend(page.tables);
            entry.figures.extend(page.figures);
        }
        Self { pages }
    }

    /// Highest recorded page number.
    pub fn page_count(&self) -> u32 {
        self.pages.keys().next_back().copied().unwrap_or(0)
    }

    fn page(&self, page_number: u32) -> Option<&PagePrimitives> {
        self.pages.get(&page_number)
    }
}

impl TextExtractor for RecordedExtractor {
    fn extract(&self, page_number: u32) -> Result<Vec<TextRun>> {
        Ok(self.page(page_number).map(|p| p.text_runs.clone()).unwrap_or_default())
    }
}

impl TableExtractor for RecordedExtractor {
    fn extract(&self, page_number: u32) -> Result<Vec<TableRegion>> {
        Ok(self.page(page_number).map(|p| p.tables.clone()).unwrap_or_default())
    }
}

impl FigureExtractor for RecordedExtractor {
    fn extract(&self, page_number: u32) -> Result<Vec<FigureRegion>> {
        Ok(self.page(page_number).map(|p| p.figures.clone()).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BoundingBox;

    struct FailingTables;

    impl TableExtractor for FailingTables {
        fn extract(&self, page_number: u32) -> Result<Vec<TableRegion>> {
            if page_number == 2 {
                Err(Error::Other("detector crashed".to_string()))
            } else {
                Ok(Vec::new())
            }
        }
    }

    fn recorded() -> RecordedExtractor {
        let bbox = BoundingBox::new(0.0, 0.0, 50.0, 10.0);
        let mut set = PrimitiveSet::new("doc.pdf");
        set.pages.push(PagePrimitives::new(1).with_text(TextRun::new("one", 12.0, bbox)));
        set.pages.push(PagePrimitives::new(3).with_figure(FigureRegion::new(bbox)));
        set.pages.push(PagePrimitives::new(1).with_text(TextRun::new("two", 12.0, bbox)));
        RecordedExtractor::new(set)
    }

    #[test]
    fn test_collect_recorded() {
        let source = recorded();
        assert_eq!(source.page_count(), 3);

        let pages = collect_primitives(source.page_count(), &source, &source, &source).unwrap();
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].text_runs.len(), 2);
        assert_eq!(pages[1].item_count(), 0);
        assert_eq!(pages[2].figures.len(), 1);
    }

    #[test]
    fn test_extractor_failure() {
        let source = recorded();
        let result = collect_primitives(3, &source, &FailingTables, &source);
        match result {
            Err(Error::Extractor { page, message }) => {
                assert_eq!(page, 2);
                assert_eq!(message, "detector crashed");
            }
            other => panic!("Expected extractor error, got {:?}", other),
        }
    }
}
