//! Document assembly: runs the per-page pipeline and collects the results.

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::model::{Document, PagePrimitives, PageTree};

use super::classifier::{classify, prepare, Thresholds};
use super::normalizer::normalize_page;
use super::{BuildOptions, ErrorMode, HierarchyBuilder};

/// Builds a [`Document`] from per-page primitives.
///
/// Thresholds are derived once from every input page, before page selection
/// and before any page is built, so a page classifies the same way whichever
/// pages are selected and pages can be processed independently in parallel.
#[derive(Debug, Clone)]
pub struct DocumentAssembler {
    options: BuildOptions,
    builder: HierarchyBuilder,
}

impl DocumentAssembler {
    /// Create an assembler with the given options.
    pub fn new(options: BuildOptions) -> Self {
        let builder = HierarchyBuilder::new().with_numeric_merge(options.merge_numeric_runs);
        Self { options, builder }
    }

    /// Get the build options.
    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Assemble a document.
    ///
    /// Pages come out sorted by page number regardless of input order.
    /// In [`ErrorMode::Lenient`] a malformed page becomes a failure marker;
    /// in [`ErrorMode::Strict`] it aborts the whole document.
    pub fn assemble(&self, source: &str, pages: &[PagePrimitives]) -> Result<Document> {
        let selected: Vec<&PagePrimitives> = pages
            .iter()
            .filter(|p| self.options.pages.includes(p.page_number))
            .collect();

        if selected.is_empty() {
            return Err(Error::EmptyDocument);
        }

        let thresholds = prepare(pages, &self.options.classifier);
        let degraded = match thresholds.check_signal() {
            Ok(()) => false,
            Err(e) => {
                log::warn!("{}: {}", source, e);
                true
            }
        };

        let results: Vec<Result<PageTree>> = if self.options.parallel && selected.len() > 1 {
            selected
                .par_iter()
                .map(|page| self.build_page(page, &thresholds))
                .collect()
        } else {
            selected
                .iter()
                .map(|page| self.build_page(page, &thresholds))
                .collect()
        };

        let mut doc = Document::new(source);
        doc.metadata.degraded = degraded;

        for (page, result) in selected.iter().zip(results) {
            match result {
                Ok(tree) => doc.pages.push(tree),
                Err(e) if self.options.error_mode == ErrorMode::Strict => return Err(e),
                Err(e) => {
                    log::warn!("Skipping page {}: {}", page.page_number, e);
                    doc.pages.push(PageTree::failed(page.page_number, e.to_string()));
                }
            }
        }

        doc.pages.sort_by_key(|p| p.page_number);
        doc.metadata.page_count = doc.pages.len() as u32;
        doc.metadata.failed_pages = doc
            .failed_pages()
            .map(|p| p.page_number)
            .collect();

        log::debug!(
            "Assembled {}: {} pages, {} failed, {} heading levels",
            source,
            doc.metadata.page_count,
            doc.metadata.failed_pages.len(),
            thresholds.heading_levels()
        );

        Ok(doc)
    }

    /// Normalize, classify and build a single page.
    pub fn build_page(&self, page: &PagePrimitives, thresholds: &Thresholds) -> Result<PageTree> {
        let normalized = normalize_page(page, &self.options.normalize)?;
        if normalized.report.discarded() > 0 {
            log::debug!(
                "Page {}: discarded {} primitives ({:?})",
                page.page_number,
                normalized.report.discarded(),
                normalized.report
            );
        }
        let classified = classify(normalized.items, thresholds);
        Ok(self.builder.build(page.page_number, classified))
    }
}

impl Default for DocumentAssembler {
    fn default() -> Self {
        Self::new(BuildOptions::default())
    }
}
