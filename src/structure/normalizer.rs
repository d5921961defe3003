//! Primitive normalization: validation, overlap consumption and reading order.
//!
//! The three extractor outputs for a page are merged into one list of
//! [`ContentItem`]s sorted top-to-bottom, then left-to-right. Items whose
//! vertical spans overlap by more than half of the shorter one are treated
//! as sharing a line and ordered by horizontal position.

use std::cmp::Ordering;
use std::collections::HashSet;

use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};
use crate::model::{
    BoundingBox, ContentItem, ContentKind, PagePrimitives, TableContent, TextContent,
};

use super::NormalizeOptions;

/// Fraction of the shorter height two items must share to count as one line.
const LINE_OVERLAP_RATIO: f32 = 0.5;

/// A page's content items in reading order.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedPage {
    /// Page number (1-indexed)
    pub page_number: u32,

    /// Items sorted by reading order; `order` equals the index
    pub items: Vec<ContentItem>,

    /// What was discarded along the way
    pub report: NormalizeReport,
}

/// Counts of primitives that did not become content items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    /// Text runs whose center fell inside a table or figure
    pub consumed_runs: usize,

    /// Text runs with no visible characters
    pub blank_runs: usize,

    /// Figures repeating the bounding box of an earlier figure
    pub duplicate_figures: usize,

    /// Short all-caps runs dropped as running headers
    pub running_headers: usize,
}

impl NormalizeReport {
    /// Total number of discarded primitives.
    pub fn discarded(&self) -> usize {
        self.consumed_runs + self.blank_runs + self.duplicate_figures + self.running_headers
    }
}

/// Longest running header, in characters.
const RUNNING_HEADER_MAX_CHARS: usize = 14;

/// Most words a running header may have.
const RUNNING_HEADER_MAX_WORDS: usize = 2;

/// Merge one page's primitives into a reading-ordered item list.
///
/// Fails with [`Error::MalformedPrimitive`] on zero or negative box
/// dimensions, bad font sizes, or non-rectangular table grids.
pub fn normalize_page(page: &PagePrimitives, options: &NormalizeOptions) -> Result<NormalizedPage> {
    let page_number = page.page_number;
    if page_number == 0 {
        return Err(Error::malformed(0, "page numbers are 1-based"));
    }

    validate(page)?;

    let mut report = NormalizeReport::default();
    let mut items = Vec::with_capacity(page.item_count());

    // Tables and figures own their full region
    let mut owners: Vec<BoundingBox> = Vec::with_capacity(page.tables.len() + page.figures.len());

    for table in &page.tables {
        owners.push(table.bbox);
        items.push(ContentItem::table(
            page_number,
            table.bbox,
            TableContent::new(table.cells.clone()),
        ));
    }

    let mut seen_figures = HashSet::new();
    for figure in &page.figures {
        if options.dedupe_figures && !seen_figures.insert(figure_key(&figure.bbox)) {
            report.duplicate_figures += 1;
            continue;
        }
        owners.push(figure.bbox);
        items.push(ContentItem::figure(page_number, figure.bbox));
    }

    for run in &page.text_runs {
        let text = if options.normalize_text {
            run.text.trim().nfc().collect::<String>()
        } else {
            run.text.clone()
        };
        if text.trim().is_empty() {
            report.blank_runs += 1;
            continue;
        }

        let (cx, cy) = run.bbox.center();
        if owners.iter().any(|owner| owner.contains_point(cx, cy)) {
            report.consumed_runs += 1;
            continue;
        }

        let content = TextContent::new(text, run.font_size, run.bold);
        if options.skip_running_headers && is_running_header(&content) {
            report.running_headers += 1;
            continue;
        }

        items.push(ContentItem::text(page_number, run.bbox, content));
    }

    let items = reading_order(items);

    log::debug!(
        "Page {}: {} items ({} consumed, {} blank, {} duplicate figures, {} running headers)",
        page_number,
        items.len(),
        report.consumed_runs,
        report.blank_runs,
        report.duplicate_figures,
        report.running_headers
    );

    Ok(NormalizedPage {
        page_number,
        items,
        report,
    })
}

/// Sort items into reading order and assign their order keys.
///
/// The result does not depend on the input order.
pub fn reading_order(mut items: Vec<ContentItem>) -> Vec<ContentItem> {
    // Deterministic starting point, independent of extractor output order
    items.sort_by(total_cmp);

    // Sweep into line bands anchored on the first item of each band
    let mut bands: Vec<Vec<ContentItem>> = Vec::new();
    for item in items {
        match bands.last_mut() {
            Some(band) if shares_line(&band[0].bbox, &item.bbox) => band.push(item),
            _ => bands.push(vec![item]),
        }
    }

    let mut ordered = Vec::new();
    for mut band in bands {
        band.sort_by(|a, b| {
            a.bbox
                .x0
                .total_cmp(&b.bbox.x0)
                .then_with(|| total_cmp(a, b))
        });
        ordered.extend(band);
    }

    for (i, item) in ordered.iter_mut().enumerate() {
        item.order = i as u32;
    }
    ordered
}

/// Whether two boxes overlap vertically by more than half the shorter height.
pub fn shares_line(a: &BoundingBox, b: &BoundingBox) -> bool {
    let shorter = a.height().min(b.height());
    shorter > 0.0 && a.vertical_overlap(b) > shorter * LINE_OVERLAP_RATIO
}

/// Short all-caps text repeated in page margins.
fn is_running_header(text: &TextContent) -> bool {
    let trimmed = text.text.trim();
    text.is_uppercase()
        && trimmed.chars().count() <= RUNNING_HEADER_MAX_CHARS
        && trimmed.split_whitespace().count() <= RUNNING_HEADER_MAX_WORDS
}

fn validate(page: &PagePrimitives) -> Result<()> {
    let page_number = page.page_number;

    for run in &page.text_runs {
        run.bbox
            .validate()
            .map_err(|reason| Error::malformed(page_number, format!("text run: {}", reason)))?;
        if !run.font_size.is_finite() || run.font_size <= 0.0 {
            return Err(Error::malformed(
                page_number,
                format!("text run {:?} has font size {}", run.text, run.font_size),
            ));
        }
    }

    for (i, table) in page.tables.iter().enumerate() {
        table
            .bbox
            .validate()
            .map_err(|reason| Error::malformed(page_number, format!("table {}: {}", i, reason)))?;
        let grid = TableContent::new(table.cells.clone());
        if grid.row_count() == 0 || grid.column_count() == 0 {
            return Err(Error::malformed(
                page_number,
                format!("table {} has an empty grid", i),
            ));
        }
        if !grid.is_rectangular() {
            return Err(Error::malformed(
                page_number,
                format!("table {} grid is not rectangular", i),
            ));
        }
    }

    for (i, figure) in page.figures.iter().enumerate() {
        figure
            .bbox
            .validate()
            .map_err(|reason| Error::malformed(page_number, format!("figure {}: {}", i, reason)))?;
    }

    Ok(())
}

/// Figure identity at 0.1pt precision.
fn figure_key(bbox: &BoundingBox) -> [i64; 4] {
    bbox.to_array().map(|v| (v * 10.0).round() as i64)
}

/// Total order over items: position first, then kind, then payload.
fn total_cmp(a: &ContentItem, b: &ContentItem) -> Ordering {
    a.bbox
        .y0
        .total_cmp(&b.bbox.y0)
        .then_with(|| a.bbox.x0.total_cmp(&b.bbox.x0))
        .then_with(|| a.bbox.y1.total_cmp(&b.bbox.y1))
        .then_with(|| a.bbox.x1.total_cmp(&b.bbox.x1))
        .then_with(|| kind_rank(&a.kind).cmp(&kind_rank(&b.kind)))
        .then_with(|| match (&a.kind, &b.kind) {
            (ContentKind::Text(x), ContentKind::Text(y)) => x
                .text
                .cmp(&y.text)
                .then_with(|| x.font_size.total_cmp(&y.font_size))
                .then_with(|| x.bold.cmp(&y.bold)),
            (ContentKind::Table(x), ContentKind::Table(y)) => x.cells.cmp(&y.cells),
            _ => Ordering::Equal,
        })
}

fn kind_rank(kind: &ContentKind) -> u8 {
    match kind {
        ContentKind::Text(_) => 0,
        ContentKind::Table(_) => 1,
        ContentKind::Figure => 2,
    }
}
