//! Error types for letterpad library.

use std::io;
use thiserror::Error;

/// Result type alias for letterpad operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal errors. Any of these aborts the whole batch.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted and cannot be read.
    #[error("Document is encrypted")]
    Encrypted,

    /// The document has no pages at all.
    #[error("Document contains no pages")]
    EmptyDocument,

    /// Text could not be extracted from a page.
    #[error("Text extraction failed on page {page}: {reason}")]
    TextExtract {
        /// 0-based page index
        page: usize,
        /// Backend message
        reason: String,
    },

    /// Page index is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(usize, usize),

    /// The footer sequence could not be split into letters.
    #[error("Letter boundary detection failed: {0}")]
    Boundary(#[from] BoundaryError),

    /// A metadata pattern is not a usable regular expression.
    #[error("Invalid metadata pattern: {0}")]
    InvalidPattern(String),

    /// A configured output name has no filename-safe characters.
    #[error("Invalid output name: {0:?}")]
    InvalidName(String),

    /// Error producing an output PDF.
    #[error("PDF write error: {0}")]
    Write(String),

    /// Error rendering the batch manifest.
    #[error("Rendering error: {0}")]
    Render(String),
}

/// Structured reason why a footer sequence could not be grouped into letters.
///
/// All page numbers are 0-based indices into the source document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoundaryError {
    /// A letter has to open with "Page 1 of N".
    #[error("page {page}: expected a letter to start with page 1, found page {observed}")]
    UnexpectedStart { page: usize, observed: u32 },

    /// The footer's page number does not continue the open letter.
    #[error("page {page}: expected footer page {expected}, found page {observed}")]
    SequenceBreak {
        page: usize,
        expected: u32,
        observed: u32,
    },

    /// The footer's total disagrees with the open letter's total.
    #[error("page {page}: expected footer total {expected}, found total {observed}")]
    TotalMismatch {
        page: usize,
        expected: u32,
        observed: u32,
    },

    /// A footerless page that no later footer can vouch for.
    #[error("page {page}: no footer found where page {expected} was expected")]
    MissingFooter { page: usize, expected: u32 },

    /// A footerless page outside of any letter.
    #[error("page {page}: no footer found and no letter is open")]
    UnassignedPage { page: usize },

    /// The document ended before the last letter reached its final page.
    #[error("letter starting at page {start} expects {expected_total} pages but the document ends at page {last_page}")]
    UnterminatedLetter {
        start: usize,
        expected_total: u32,
        last_page: usize,
    },
}

impl BoundaryError {
    /// The page index the failure is attributed to.
    pub fn page(&self) -> usize {
        match self {
            BoundaryError::UnexpectedStart { page, .. }
            | BoundaryError::SequenceBreak { page, .. }
            | BoundaryError::TotalMismatch { page, .. }
            | BoundaryError::MissingFooter { page, .. }
            | BoundaryError::UnassignedPage { page } => *page,
            BoundaryError::UnterminatedLetter { last_page, .. } => *last_page,
        }
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Encrypted;
        assert_eq!(err.to_string(), "Document is encrypted");

        let err = Error::PageOutOfRange(10, 5);
        assert_eq!(
            err.to_string(),
            "Page 10 is out of range (document has 5 pages)"
        );
    }

    #[test]
    fn test_boundary_error_display() {
        let err: Error = BoundaryError::SequenceBreak {
            page: 1,
            expected: 2,
            observed: 1,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Letter boundary detection failed: page 1: expected footer page 2, found page 1"
        );
    }

    #[test]
    fn test_boundary_error_page() {
        let err = BoundaryError::UnterminatedLetter {
            start: 4,
            expected_total: 3,
            last_page: 5,
        };
        assert_eq!(err.page(), 5);
        assert_eq!(BoundaryError::UnassignedPage { page: 7 }.page(), 7);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
