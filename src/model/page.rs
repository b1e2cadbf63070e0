//! Page-level types.

use serde::{Deserialize, Serialize};

/// Page dimensions in points (1 point = 1/72 inch).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    /// Page width in points
    pub width: f32,
    /// Page height in points
    pub height: f32,
}

impl PageSize {
    /// US Letter (8.5 x 11 inches).
    pub const LETTER: PageSize = PageSize::new(612.0, 792.0);

    /// A4 (210 x 297 mm).
    pub const A4: PageSize = PageSize::new(595.0, 842.0);

    /// Create a page size from width and height in points.
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Check if the page is in landscape orientation.
    pub fn is_landscape(&self) -> bool {
        self.width > self.height
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::LETTER
    }
}

impl std::fmt::Display for PageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}pt", self.width, self.height)
    }
}

/// Extracted text of one source page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageText {
    /// Page index (0-based) in the source document
    pub index: usize,

    /// Extracted plain text; empty when the page has no text layer
    pub text: String,
}

impl PageText {
    /// Create a page text entry.
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }

    /// Check if the page produced no text at all.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size_presets() {
        assert_eq!(PageSize::default(), PageSize::LETTER);
        assert!(!PageSize::LETTER.is_landscape());
        assert!(PageSize::new(842.0, 595.0).is_landscape());
        assert_eq!(PageSize::A4.to_string(), "595x842pt");
    }

    #[test]
    fn test_page_text_blank() {
        assert!(PageText::new(0, "  \n ").is_blank());
        assert!(!PageText::new(1, "Page 1 of 2").is_blank());
    }
}
