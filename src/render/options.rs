//! Rendering options and configuration.

use crate::error::{Error, Result};
use std::ops::RangeInclusive;

/// Options for rendering a document tree.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Extra heading depth added to every level (0 = Title renders as `#`)
    pub heading_offset: u8,

    /// Emit a marker line before every page
    pub include_page_markers: bool,

    /// Escape special Markdown characters
    pub escape_special_chars: bool,

    /// Page selection
    pub page_selection: PageSelection,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shift every heading down by `offset` levels (clamped so `###` stays within `######`).
    pub fn with_heading_offset(mut self, offset: u8) -> Self {
        self.heading_offset = offset.min(3);
        self
    }

    /// Enable or disable page markers.
    pub fn with_page_markers(mut self, include: bool) -> Self {
        self.include_page_markers = include;
        self
    }

    /// Enable or disable Markdown escaping.
    pub fn with_escaping(mut self, escape: bool) -> Self {
        self.escape_special_chars = escape;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, selection: PageSelection) -> Self {
        self.page_selection = selection;
        self
    }

    /// Set page range.
    pub fn with_page_range(mut self, range: RangeInclusive<u32>) -> Self {
        self.page_selection = PageSelection::Range(range);
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            heading_offset: 0,
            include_page_markers: false,
            escape_special_chars: true,
            page_selection: PageSelection::All,
        }
    }
}

/// Page selection for building and rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// All pages
    #[default]
    All,
    /// A range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Specific pages (1-indexed)
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
        }
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5,7-10").
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.is_empty() || s == "all" {
            return Ok(PageSelection::All);
        }

        if let Some((start, end)) = s.split_once('-') {
            if !start.contains(',') && !end.contains(',') {
                return Ok(PageSelection::Range(parse_range(start, end, s)?));
            }
        }

        let mut pages = Vec::new();
        for part in s.split(',') {
            match part.split_once('-') {
                Some((start, end)) => pages.extend(parse_range(start, end, s)?),
                None => pages.push(parse_page(part, s)?),
            }
        }

        pages.sort_unstable();
        pages.dedup();
        Ok(PageSelection::Pages(pages))
    }
}

fn parse_range(start: &str, end: &str, whole: &str) -> Result<RangeInclusive<u32>> {
    let (start, end) = (parse_page(start, whole)?, parse_page(end, whole)?);
    if start > end {
        return Err(Error::InvalidPageRange(format!(
            "{}: start page {} is after end page {}",
            whole, start, end
        )));
    }
    Ok(start..=end)
}

fn parse_page(part: &str, whole: &str) -> Result<u32> {
    match part.trim().parse::<u32>() {
        Ok(0) => Err(Error::InvalidPageRange(format!(
            "{}: pages are numbered from 1",
            whole
        ))),
        Ok(page) => Ok(page),
        Err(_) => Err(Error::InvalidPageRange(format!(
            "{}: '{}' is not a page number",
            whole,
            part.trim()
        ))),
    }
}
