//! Plain text rendering of the document tree.

use crate::error::Result;
use crate::model::Document;

use super::RenderOptions;

/// Convert a document to plain text in reading order.
///
/// Headings appear as their own paragraphs; failed pages contribute nothing.
pub fn to_text(doc: &Document, options: &RenderOptions) -> Result<String> {
    let output = doc
        .pages
        .iter()
        .filter(|page| options.page_selection.includes(page.page_number))
        .map(|page| page.plain_text())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");

    Ok(output.trim().to_string())
}
