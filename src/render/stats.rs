//! Summary counters for a finished batch.

use serde::{Deserialize, Serialize};

use crate::model::Batch;

/// Counters describing one split run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    /// Pages in the source document
    pub source_pages: usize,

    /// Letters found
    pub letters: usize,

    /// Letters that needed a blank page
    pub padded_letters: usize,

    /// Blank pages added across the batch
    pub blank_pages_added: usize,

    /// Pages in the combined document
    pub combined_pages: usize,

    /// Letters named from a fallback
    pub warnings: usize,
}

impl BatchStats {
    /// Count everything in `batch`.
    pub fn collect(batch: &Batch) -> Self {
        let mut stats = Self {
            source_pages: batch.source_page_count,
            combined_pages: batch.combined.page_count(),
            warnings: batch.warnings.len(),
            ..Self::default()
        };
        for letter in &batch.letters {
            stats.letters += 1;
            if letter.is_padded() {
                stats.padded_letters += 1;
            }
            stats.blank_pages_added += letter.document.blank_page_count();
        }
        stats
    }
}

impl std::fmt::Display for BatchStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} letters from {} pages, {} padded, {} combined pages",
            self.letters, self.source_pages, self.padded_letters, self.combined_pages
        )
    }
}
