//! Letter segments: contiguous page ranges of the source document.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// A contiguous, non-empty run of source pages forming one letter.
///
/// `start` and `end` are inclusive 0-based page indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterSegment {
    /// First page of the letter
    pub start: usize,
    /// Last page of the letter
    pub end: usize,
}

impl LetterSegment {
    /// Create a segment covering `start..=end`.
    ///
    /// # Panics
    ///
    /// Panics if `end < start`; segments are never empty.
    pub fn new(start: usize, end: usize) -> Self {
        assert!(end >= start, "letter segment must not be empty");
        Self { start, end }
    }

    /// Number of pages in the letter.
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Segments always hold at least one page.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Page indices covered by the letter.
    pub fn pages(&self) -> RangeInclusive<usize> {
        self.start..=self.end
    }

    /// Index of the page carrying the letter's metadata.
    pub fn first_page(&self) -> usize {
        self.start
    }

    /// Index of the letter's last page.
    pub fn last_page(&self) -> usize {
        self.end
    }

    /// Check if a page index belongs to the letter.
    pub fn contains(&self, page: usize) -> bool {
        self.pages().contains(&page)
    }
}

impl std::fmt::Display for LetterSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "pages {}-{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_len() {
        let seg = LetterSegment::new(3, 5);
        assert_eq!(seg.len(), 3);
        assert_eq!(seg.first_page(), 3);
        assert_eq!(seg.last_page(), 5);
        assert!(seg.contains(4));
        assert!(!seg.contains(6));
    }

    #[test]
    fn test_single_page_segment() {
        let seg = LetterSegment::new(7, 7);
        assert_eq!(seg.len(), 1);
        assert_eq!(seg.pages().collect::<Vec<_>>(), vec![7]);
    }

    #[test]
    #[should_panic(expected = "must not be empty")]
    fn test_segment_rejects_inverted_range() {
        LetterSegment::new(4, 2);
    }
}
