//! Raw primitives supplied by the external extractors.
//!
//! These are the inputs of the engine: one [`PagePrimitives`] per page, holding
//! whatever the text, table and figure extractors returned for that page.

use super::BoundingBox;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A run of text with uniform font metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    /// The text content
    pub text: String,

    /// Font size in points
    pub font_size: f32,

    /// Whether the run is set in a bold or title face
    #[serde(default)]
    pub bold: bool,

    /// Position on the page
    pub bbox: BoundingBox,
}

impl TextRun {
    /// Create a regular-weight text run.
    pub fn new(text: impl Into<String>, font_size: f32, bbox: BoundingBox) -> Self {
        Self {
            text: text.into(),
            font_size,
            bold: false,
            bbox,
        }
    }

    /// Create a bold text run.
    pub fn bold(text: impl Into<String>, font_size: f32, bbox: BoundingBox) -> Self {
        Self {
            bold: true,
            ..Self::new(text, font_size, bbox)
        }
    }
}

/// A table detected by the table extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRegion {
    /// Region occupied by the whole table
    pub bbox: BoundingBox,

    /// Row-major cell strings
    pub cells: Vec<Vec<String>>,
}

impl TableRegion {
    /// Create a table region from any grid of string-like values.
    pub fn new<R, S>(bbox: BoundingBox, rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            bbox,
            cells: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }
}

/// A non-text visual region (image, chart, drawing).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FigureRegion {
    /// Region occupied by the figure
    pub bbox: BoundingBox,
}

impl FigureRegion {
    /// Create a figure region.
    pub fn new(bbox: BoundingBox) -> Self {
        Self { bbox }
    }
}

/// Everything the extractors produced for one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PagePrimitives {
    /// Page number (1-indexed)
    pub page_number: u32,

    /// Text runs from the text/layout extractor
    #[serde(default)]
    pub text_runs: Vec<TextRun>,

    /// Tables from the table extractor
    #[serde(default)]
    pub tables: Vec<TableRegion>,

    /// Figures from the image/chart extractor
    #[serde(default)]
    pub figures: Vec<FigureRegion>,
}

impl PagePrimitives {
    /// Create an empty page.
    pub fn new(page_number: u32) -> Self {
        Self {
            page_number,
            ..Default::default()
        }
    }

    /// Add a text run.
    pub fn with_text(mut self, run: TextRun) -> Self {
        self.text_runs.push(run);
        self
    }

    /// Add a table.
    pub fn with_table(mut self, table: TableRegion) -> Self {
        self.tables.push(table);
        self
    }

    /// Add a figure.
    pub fn with_figure(mut self, figure: FigureRegion) -> Self {
        self.figures.push(figure);
        self
    }

    /// Total number of primitives on the page.
    pub fn item_count(&self) -> usize {
        self.text_runs.len() + self.tables.len() + self.figures.len()
    }
}

/// A recorded extractor dump for a whole document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrimitiveSet {
    /// Source document name (usually the PDF file name)
    pub source: String,

    /// Per-page primitives
    pub pages: Vec<PagePrimitives>,
}

impl PrimitiveSet {
    /// Create an empty set for the given source.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            pages: Vec::new(),
        }
    }

    /// Parse a primitive dump from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::InvalidInput(format!("primitive dump: {}", e)))
    }

    /// Serialize the dump to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
    }
}

/// Load a primitive dump from a JSON file.
///
/// An empty `source` field falls back to the file name.
pub fn load_primitives<P: AsRef<Path>>(path: P) -> Result<PrimitiveSet> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)?;
    let mut set = PrimitiveSet::from_json(&json)?;
    if set.source.is_empty() {
        set.source = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
    }
    Ok(set)
}
