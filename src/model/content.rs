//! Normalized content items.

use super::BoundingBox;
use serde::{Deserialize, Serialize};

/// A single piece of page content in reading order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Page number (1-indexed)
    pub page_number: u32,

    /// Position on the page
    pub bbox: BoundingBox,

    /// Reading-order key, unique within a page
    pub order: u32,

    /// What kind of content this is
    pub kind: ContentKind,
}

impl ContentItem {
    /// Create a text item.
    pub fn text(page_number: u32, bbox: BoundingBox, text: TextContent) -> Self {
        Self {
            page_number,
            bbox,
            order: 0,
            kind: ContentKind::Text(text),
        }
    }

    /// Create a table item.
    pub fn table(page_number: u32, bbox: BoundingBox, table: TableContent) -> Self {
        Self {
            page_number,
            bbox,
            order: 0,
            kind: ContentKind::Table(table),
        }
    }

    /// Create a figure item.
    pub fn figure(page_number: u32, bbox: BoundingBox) -> Self {
        Self {
            page_number,
            bbox,
            order: 0,
            kind: ContentKind::Figure,
        }
    }

    /// Get the text payload if this is a text item.
    pub fn as_text(&self) -> Option<&TextContent> {
        match &self.kind {
            ContentKind::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Check if this item is a text run.
    pub fn is_text(&self) -> bool {
        matches!(self.kind, ContentKind::Text(_))
    }

    /// Check if this item is a table.
    pub fn is_table(&self) -> bool {
        matches!(self.kind, ContentKind::Table(_))
    }

    /// Check if this item is a figure.
    pub fn is_figure(&self) -> bool {
        matches!(self.kind, ContentKind::Figure)
    }

    /// Get plain text content of the item.
    pub fn plain_text(&self) -> String {
        match &self.kind {
            ContentKind::Text(t) => t.text.clone(),
            ContentKind::Table(t) => t.plain_text(),
            ContentKind::Figure => String::new(),
        }
    }
}

/// Content payload of an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentKind {
    /// A text run
    Text(TextContent),

    /// A table with its cell grid
    Table(TableContent),

    /// A non-tabular visual region; carries no payload
    Figure,
}

/// Text payload with the font metadata used for classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    /// The text content
    pub text: String,

    /// Font size in points
    pub font_size: f32,

    /// Bold or title face
    pub bold: bool,
}

impl TextContent {
    /// Create a text payload.
    pub fn new(text: impl Into<String>, font_size: f32, bold: bool) -> Self {
        Self {
            text: text.into(),
            font_size,
            bold,
        }
    }

    /// Number of characters (not bytes).
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Check if every letter is uppercase (at least one letter required).
    pub fn is_uppercase(&self) -> bool {
        let mut letters = self.text.chars().filter(|c| c.is_alphabetic()).peekable();
        letters.peek().is_some() && letters.all(|c| c.is_uppercase())
    }
}

/// Rectangular grid of cell strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableContent {
    /// Row-major cells
    pub cells: Vec<Vec<String>>,
}

impl TableContent {
    /// Create a table payload from a grid.
    pub fn new(cells: Vec<Vec<String>>) -> Self {
        Self { cells }
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.cells.len()
    }

    /// Get the number of columns (based on first row).
    pub fn column_count(&self) -> usize {
        self.cells.first().map(|r| r.len()).unwrap_or(0)
    }

    /// Check if the grid is rectangular.
    pub fn is_rectangular(&self) -> bool {
        let cols = self.column_count();
        self.cells.iter().all(|r| r.len() == cols)
    }

    /// Get plain text representation of the table.
    pub fn plain_text(&self) -> String {
        self.cells
            .iter()
            .map(|row| row.join("\t"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
