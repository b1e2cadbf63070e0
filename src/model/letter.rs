//! Letter-level types: metadata, output documents and assembled letters.

use super::{LetterSegment, PageSize};
use serde::{Deserialize, Serialize};

/// Naming data read from a letter's first page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterMetadata {
    /// Envelope identifier, digits only, leading zeros preserved
    pub envelope_id: String,

    /// Family name as printed on the letter (trimmed)
    pub family_name: String,

    /// Family name reduced to filename-safe characters
    pub safe_family_name: String,
}

impl LetterMetadata {
    /// Base file stem `{envelope}_{family}`, before collision handling.
    pub fn file_stem(&self) -> String {
        format!("{}_{}", self.envelope_id, self.safe_family_name)
    }
}

/// One page of an output document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PageSlot {
    /// A page copied from the source document
    Content {
        /// Source page index (0-based)
        index: usize,
        /// Source page dimensions, when known
        size: Option<PageSize>,
    },

    /// A blank page added for duplex padding
    Blank {
        /// Blank page dimensions
        size: PageSize,
    },
}

impl PageSlot {
    /// Dimensions of the page, when known.
    pub fn size(&self) -> Option<PageSize> {
        match self {
            PageSlot::Content { size, .. } => *size,
            PageSlot::Blank { size } => Some(*size),
        }
    }

    /// Check if this is a padding page.
    pub fn is_blank(&self) -> bool {
        matches!(self, PageSlot::Blank { .. })
    }

    /// Source page index, if the page is copied content.
    pub fn source_index(&self) -> Option<usize> {
        match self {
            PageSlot::Content { index, .. } => Some(*index),
            PageSlot::Blank { .. } => None,
        }
    }
}

/// An output document under construction.
///
/// Pages are recorded as ordered slots; the source document is never
/// touched until a [`crate::parser::DocumentWriter`] serializes it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputDocument {
    pages: Vec<PageSlot>,
}

impl OutputDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a copy of a source page.
    pub fn append_page(&mut self, index: usize, size: Option<PageSize>) {
        self.pages.push(PageSlot::Content { index, size });
    }

    /// Append a blank page.
    pub fn append_blank_page(&mut self, size: PageSize) {
        self.pages.push(PageSlot::Blank { size });
    }

    /// Append every page of another document, in order.
    pub fn append_document(&mut self, other: &OutputDocument) {
        self.pages.extend_from_slice(&other.pages);
    }

    /// All page slots in order.
    pub fn pages(&self) -> &[PageSlot] {
        &self.pages
    }

    /// Total number of pages, padding included.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Number of pages copied from the source.
    pub fn content_page_count(&self) -> usize {
        self.pages.iter().filter(|p| !p.is_blank()).count()
    }

    /// Number of padding pages.
    pub fn blank_page_count(&self) -> usize {
        self.pages.iter().filter(|p| p.is_blank()).count()
    }

    /// Dimensions of the last page, if there is one and its size is known.
    pub fn last_page_size(&self) -> Option<PageSize> {
        self.pages.last().and_then(PageSlot::size)
    }

    /// Check if the document has no pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Check if the page count is even.
    pub fn is_even(&self) -> bool {
        self.pages.len() % 2 == 0
    }
}

/// Whether a letter needed a padding page.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Padding {
    /// Page count was already even
    #[default]
    NotNeeded,
    /// One blank page of the given size was appended
    BlankPage {
        /// Size of the appended page
        size: PageSize,
    },
}

impl Padding {
    /// Check if a blank page was appended.
    pub fn is_padded(&self) -> bool {
        matches!(self, Padding::BlankPage { .. })
    }
}

/// One letter cut out of the source document, ready for output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssembledLetter {
    /// Position of the letter in the source document (1-based)
    pub ordinal: usize,

    /// Source pages making up the letter
    pub segment: LetterSegment,

    /// Naming data, `None` when extraction failed
    pub metadata: Option<LetterMetadata>,

    /// Final, batch-unique file stem (without extension)
    pub file_stem: String,

    /// The letter's pages
    pub document: OutputDocument,

    /// Padding decision
    pub padding: Padding,
}

impl AssembledLetter {
    /// Create a letter with no pages yet and a provisional name.
    pub fn new(ordinal: usize, segment: LetterSegment) -> Self {
        Self {
            ordinal,
            segment,
            metadata: None,
            file_stem: String::new(),
            document: OutputDocument::new(),
            padding: Padding::NotNeeded,
        }
    }

    /// Output file name, `{file_stem}.pdf`.
    pub fn file_name(&self) -> String {
        format!("{}.pdf", self.file_stem)
    }

    /// Total number of pages, padding included.
    pub fn page_count(&self) -> usize {
        self.document.page_count()
    }

    /// Check if a padding page was appended.
    pub fn is_padded(&self) -> bool {
        self.padding.is_padded()
    }
}
