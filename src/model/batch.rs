//! Batch-level types.

use super::{AssembledLetter, LetterSegment, OutputDocument};
use crate::render::BatchStats;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A letter whose first page did not yield naming metadata.
///
/// The letter is still part of the batch under a fallback name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataWarning {
    /// Letter ordinal (1-based)
    pub ordinal: usize,

    /// Source page index of the letter's first page
    pub page: usize,

    /// Human-readable reason
    pub reason: String,

    /// Name the letter received instead
    pub fallback_name: String,
}

impl std::fmt::Display for MetadataWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "letter {} (page {}): {}; named {}",
            self.ordinal, self.page, self.reason, self.fallback_name
        )
    }
}

/// Everything produced from one input document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Batch {
    /// Letters in source order
    pub letters: Vec<AssembledLetter>,

    /// All padded letters concatenated, in source order
    pub combined: OutputDocument,

    /// File stem of the combined document
    pub combined_name: String,

    /// Recoverable per-letter problems
    pub warnings: Vec<MetadataWarning>,

    /// Number of pages in the source document
    pub source_page_count: usize,

    /// When the batch was produced
    pub created_at: DateTime<Utc>,
}

impl Batch {
    /// Letters in source order.
    pub fn letters(&self) -> &[AssembledLetter] {
        &self.letters
    }

    /// The combined, duplex-ready document.
    pub fn combined(&self) -> &OutputDocument {
        &self.combined
    }

    /// Output file name of the combined document.
    pub fn combined_file_name(&self) -> String {
        format!("{}.pdf", self.combined_name)
    }

    /// Recoverable per-letter problems.
    pub fn warnings(&self) -> &[MetadataWarning] {
        &self.warnings
    }

    /// Number of letters.
    pub fn letter_count(&self) -> usize {
        self.letters.len()
    }

    /// Check if every letter was named from its own metadata.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Summary counters.
    pub fn stats(&self) -> BatchStats {
        BatchStats::collect(self)
    }

    /// Describe the batch for the packaging side.
    pub fn manifest(&self) -> Manifest {
        Manifest {
            letters: self
                .letters
                .iter()
                .map(|letter| ManifestEntry {
                    ordinal: letter.ordinal,
                    file_name: letter.file_name(),
                    envelope_id: letter.metadata.as_ref().map(|m| m.envelope_id.clone()),
                    family_name: letter.metadata.as_ref().map(|m| m.family_name.clone()),
                    segment: letter.segment,
                    content_pages: letter.document.content_page_count(),
                    padded: letter.is_padded(),
                })
                .collect(),
            combined_file_name: self.combined_file_name(),
            combined_page_count: self.combined.page_count(),
            source_page_count: self.source_page_count,
            warnings: self.warnings.clone(),
            created_at: self.created_at,
        }
    }
}

/// Serializable description of a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// One entry per letter, in source order
    pub letters: Vec<ManifestEntry>,

    /// File name of the combined document
    pub combined_file_name: String,

    /// Page count of the combined document
    pub combined_page_count: usize,

    /// Page count of the source document
    pub source_page_count: usize,

    /// Letters that received fallback names
    pub warnings: Vec<MetadataWarning>,

    /// Generation timestamp
    pub created_at: DateTime<Utc>,
}

/// Manifest line for one letter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Letter ordinal (1-based)
    pub ordinal: usize,

    /// Output file name
    pub file_name: String,

    /// Envelope identifier, when found
    pub envelope_id: Option<String>,

    /// Family name as printed, when found
    pub family_name: Option<String>,

    /// Source page range
    pub segment: LetterSegment,

    /// Pages copied from the source
    pub content_pages: usize,

    /// Whether a blank page was appended
    pub padded: bool,
}
