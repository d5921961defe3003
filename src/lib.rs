//! # pdfstruct
//!
//! Hierarchy reconstruction for extracted PDF content.
//!
//! This library takes the per-page primitives produced by external
//! extractors (positioned text runs, table grids, figure regions) and
//! rebuilds the document's logical structure: a tree of titles, sections
//! and sub-sections holding paragraphs, tables and charts in reading order.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfstruct::{build_from_file, render};
//!
//! fn main() -> pdfstruct::Result<()> {
//!     // Load a recorded extractor dump and build the tree
//!     let doc = build_from_file("primitives.json")?;
//!
//!     // Render the section tree as JSON
//!     let json = render::to_json(&doc, render::JsonFormat::Pretty)?;
//!     println!("{}", json);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - **Normalization**: primitives are merged into one reading-ordered list;
//!   text inside tables and figures is dropped
//! - **Classification**: font sizes across the whole document are clustered
//!   into heading levels
//! - **Tree building**: headings open sections, everything else becomes a leaf
//! - **Assembly**: pages are built in parallel and collected in page order

pub mod error;
pub mod extract;
pub mod model;
pub mod render;
pub mod structure;

pub use error::{Error, Result};
pub use extract::{collect_primitives, FigureExtractor, RecordedExtractor, TableExtractor, TextExtractor};
pub use model::{
    load_primitives, BoundingBox, ContentItem, ContentKind, Document, FigureRegion,
    HierarchyLevel, Metadata, PagePrimitives, PageStatus, PageTree, PrimitiveSet, SectionChild,
    SectionNode, TableContent, TableRegion, TextContent, TextRun,
};
pub use render::{JsonDocument, JsonFormat, PageSelection, RenderOptions, StructureStats};
pub use structure::{
    BuildOptions, ClassifierConfig, DocumentAssembler, ErrorMode, HierarchyBuilder,
    NormalizeOptions,
};

use std::path::Path;

/// Build a document tree from per-page primitives.
///
/// # Arguments
///
/// * `source` - Name recorded in the document metadata
/// * `pages` - One entry per page, in any order
///
/// # Example
///
/// ```
/// use pdfstruct::{build_document, BoundingBox, PagePrimitives, TextRun};
///
/// let page = PagePrimitives::new(1)
///     .with_text(TextRun::new("Introduction", 24.0, BoundingBox::new(50.0, 40.0, 300.0, 64.0)))
///     .with_text(TextRun::new("Body text.", 12.0, BoundingBox::new(50.0, 80.0, 300.0, 92.0)));
/// let doc = build_document("report.pdf", &[page]).unwrap();
/// assert_eq!(doc.pages[0].sections[0].heading, "Introduction");
/// ```
pub fn build_document(source: &str, pages: &[PagePrimitives]) -> Result<Document> {
    build_document_with_options(source, pages, BuildOptions::default())
}

/// Build a document tree with custom options.
///
/// # Example
///
/// ```no_run
/// use pdfstruct::{build_document_with_options, BuildOptions};
///
/// let options = BuildOptions::new().strict().sequential();
/// let doc = build_document_with_options("report.pdf", &[], options);
/// assert!(doc.is_err());
/// ```
pub fn build_document_with_options(
    source: &str,
    pages: &[PagePrimitives],
    options: BuildOptions,
) -> Result<Document> {
    DocumentAssembler::new(options).assemble(source, pages)
}

/// Load a recorded primitive dump and build its document tree.
///
/// # Example
///
/// ```no_run
/// use pdfstruct::build_from_file;
///
/// let doc = build_from_file("primitives.json").unwrap();
/// println!("Pages: {}", doc.page_count());
/// ```
pub fn build_from_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    build_from_file_with_options(path, BuildOptions::default())
}

/// Load a recorded primitive dump and build it with custom options.
pub fn build_from_file_with_options<P: AsRef<Path>>(
    path: P,
    options: BuildOptions,
) -> Result<Document> {
    let set = load_primitives(path)?;
    build_document_with_options(&set.source, &set.pages, options)
}

/// Query extractors for `page_count` pages and build the result.
pub fn build_from_extractors(
    source: &str,
    page_count: u32,
    text: &dyn TextExtractor,
    tables: &dyn TableExtractor,
    figures: &dyn FigureExtractor,
    options: BuildOptions,
) -> Result<Document> {
    let pages = collect_primitives(page_count, text, tables, figures)?;
    build_document_with_options(source, &pages, options)
}

/// Convert a recorded primitive dump to JSON.
///
/// # Example
///
/// ```no_run
/// use pdfstruct::{to_json, JsonFormat};
///
/// let json = to_json("primitives.json", JsonFormat::Pretty).unwrap();
/// std::fs::write("structure.json", json).unwrap();
/// ```
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let doc = build_from_file(path)?;
    render::to_json(&doc, format)
}

/// Convert a recorded primitive dump to Markdown.
pub fn to_markdown<P: AsRef<Path>>(path: P) -> Result<String> {
    let doc = build_from_file(path)?;
    render::to_markdown(&doc, &RenderOptions::default())
}

/// Extract plain text in reading order from a recorded primitive dump.
pub fn extract_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let doc = build_from_file(path)?;
    render::to_text(&doc, &RenderOptions::default())
}

/// Builder for building and rendering document trees.
///
/// # Example
///
/// ```no_run
/// use pdfstruct::Pdfstruct;
///
/// let markdown = Pdfstruct::new()
///     .strict()
///     .with_page_markers()
///     .build_file("primitives.json")?
///     .to_markdown()?;
/// # Ok::<(), pdfstruct::Error>(())
/// ```
pub struct Pdfstruct {
    build_options: BuildOptions,
    render_options: RenderOptions,
}

impl Pdfstruct {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            build_options: BuildOptions::default(),
            render_options: RenderOptions::default(),
        }
    }

    /// Abort on the first malformed page.
    pub fn strict(mut self) -> Self {
        self.build_options = self.build_options.strict();
        self
    }

    /// Mark malformed pages as failed and keep going.
    pub fn lenient(mut self) -> Self {
        self.build_options = self.build_options.lenient();
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.build_options = self.build_options.sequential();
        self
    }

    /// Set classifier configuration.
    pub fn with_classifier(mut self, config: ClassifierConfig) -> Self {
        self.build_options = self.build_options.with_classifier(config);
        self
    }

    /// Merge numeric-only runs into the preceding paragraph.
    pub fn with_numeric_merge(mut self) -> Self {
        self.build_options = self.build_options.with_numeric_merge(true);
        self
    }

    /// Emit page markers in Markdown output.
    pub fn with_page_markers(mut self) -> Self {
        self.render_options = self.render_options.with_page_markers(true);
        self
    }

    /// Shift Markdown headings down by `offset` levels.
    pub fn with_heading_offset(mut self, offset: u8) -> Self {
        self.render_options = self.render_options.with_heading_offset(offset);
        self
    }

    /// Set page selection for both building and rendering.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.build_options = self.build_options.with_pages(pages.clone());
        self.render_options = self.render_options.with_pages(pages);
        self
    }

    /// Build from in-memory primitives.
    pub fn build(self, source: &str, pages: &[PagePrimitives]) -> Result<PdfstructResult> {
        let document = build_document_with_options(source, pages, self.build_options)?;
        Ok(PdfstructResult {
            document,
            render_options: self.render_options,
        })
    }

    /// Build from a recorded primitive dump.
    pub fn build_file<P: AsRef<Path>>(self, path: P) -> Result<PdfstructResult> {
        let document = build_from_file_with_options(path, self.build_options)?;
        Ok(PdfstructResult {
            document,
            render_options: self.render_options,
        })
    }
}

impl Default for Pdfstruct {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of building a document tree.
pub struct PdfstructResult {
    /// The assembled document
    pub document: Document,
    /// Render options to use
    render_options: RenderOptions,
}

impl PdfstructResult {
    /// Convert to Markdown.
    pub fn to_markdown(&self) -> Result<String> {
        render::to_markdown(&self.document, &self.render_options)
    }

    /// Convert to plain text.
    pub fn to_text(&self) -> Result<String> {
        render::to_text(&self.document, &self.render_options)
    }

    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Collect structure statistics.
    pub fn stats(&self) -> StructureStats {
        StructureStats::collect(&self.document)
    }

    /// Get the document.
    pub fn document(&self) -> &Document {
        &self.document
    }
}
