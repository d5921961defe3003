//! Error types for pdfstruct library.

use std::io;
use thiserror::Error;

/// Result type alias for pdfstruct operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reconstructing a document tree.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A primitive dump could not be decoded.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An extractor handed over bad geometry or a ragged table grid.
    ///
    /// Fatal for the page it occurs on.
    #[error("Malformed primitive on page {page}: {reason}")]
    MalformedPrimitive {
        /// Page the primitive belongs to
        page: u32,
        /// What was wrong with it
        reason: String,
    },

    /// Too few distinct font sizes to infer headings.
    ///
    /// Soft condition: classification falls back to body text only.
    #[error("Insufficient font-size signal: {clusters} cluster(s), no heading levels inferred")]
    InsufficientSignal {
        /// Number of font-size clusters found
        clusters: usize,
    },

    /// No pages were submitted for assembly.
    #[error("Document has no pages")]
    EmptyDocument,

    /// An external extractor failed on a page.
    #[error("Extractor failed on page {page}: {message}")]
    Extractor {
        /// Page being extracted
        page: u32,
        /// Extractor message
        message: String,
    },

    /// Invalid page range specification.
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    /// Error during rendering (Markdown, text, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Build a malformed-primitive error.
    pub fn malformed(page: u32, reason: impl Into<String>) -> Self {
        Error::MalformedPrimitive {
            page,
            reason: reason.into(),
        }
    }

    /// Check whether the error only affects a single page.
    pub fn is_page_level(&self) -> bool {
        matches!(self, Error::MalformedPrimitive { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::EmptyDocument;
        assert_eq!(err.to_string(), "Document has no pages");

        let err = Error::malformed(3, "table grid is not rectangular");
        assert_eq!(
            err.to_string(),
            "Malformed primitive on page 3: table grid is not rectangular"
        );
        assert!(err.is_page_level());

        let err = Error::InsufficientSignal { clusters: 1 };
        assert!(err.to_string().contains("1 cluster(s)"));
        assert!(!err.is_page_level());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
