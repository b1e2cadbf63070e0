//! Splitting options and configuration.

use crate::error::{Error, Result};
use crate::model::PageSize;
use crate::split::{sanitize_component, MetadataPatterns};

/// Default file stem of the combined, duplex-ready document.
pub const DEFAULT_COMBINED_NAME: &str = "even_page_letters";

/// Default prefix for letters whose metadata could not be read.
pub const DEFAULT_FALLBACK_PREFIX: &str = "letter_unknown";

/// Options for splitting a document into letters.
#[derive(Debug, Clone)]
pub struct SplitOptions {
    /// Error handling mode for page text extraction
    pub error_mode: ErrorMode,

    /// Whether to extract page text in parallel
    pub parallel: bool,

    /// Patterns locating the envelope id and family name
    pub patterns: MetadataPatterns,

    /// Blank page size when a letter's last page has no usable MediaBox
    pub fallback_page_size: PageSize,

    /// File stem prefix for letters without metadata
    pub fallback_prefix: String,

    /// File stem of the combined document
    pub combined_name: String,
}

impl SplitOptions {
    /// Create new split options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Read pages whose text cannot be extracted as empty.
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set metadata patterns.
    pub fn with_patterns(mut self, patterns: MetadataPatterns) -> Self {
        self.patterns = patterns;
        self
    }

    /// Set the blank page size used when a letter's own size is unknown.
    pub fn with_fallback_page_size(mut self, size: PageSize) -> Self {
        self.fallback_page_size = size;
        self
    }

    /// Set the file stem prefix for letters without metadata.
    pub fn with_fallback_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.fallback_prefix = prefix.into();
        self
    }

    /// Set the combined document's file stem.
    pub fn with_combined_name(mut self, name: impl Into<String>) -> Self {
        self.combined_name = name.into();
        self
    }

    /// The combined document's file stem, reduced to a filename-safe
    /// component.
    pub fn combined_stem(&self) -> Result<String> {
        file_stem(&self.combined_name)
    }

    /// The fallback prefix, reduced to a filename-safe component.
    pub fn fallback_stem(&self) -> Result<String> {
        file_stem(&self.fallback_prefix)
    }
}

/// Path separators and other unsafe characters are removed. A name with
/// nothing left is rejected.
fn file_stem(name: &str) -> Result<String> {
    let stem = sanitize_component(name);
    if stem.is_empty() {
        return Err(Error::InvalidName(name.to_string()));
    }
    Ok(stem)
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Strict,
            parallel: true,
            patterns: MetadataPatterns::default(),
            fallback_page_size: PageSize::LETTER,
            fallback_prefix: DEFAULT_FALLBACK_PREFIX.to_string(),
            combined_name: DEFAULT_COMBINED_NAME.to_string(),
        }
    }
}

/// Error handling mode for page text extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// A page whose text cannot be extracted aborts the batch
    #[default]
    Strict,
    /// Such a page is read as empty text
    Lenient,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_options_builder() {
        let options = SplitOptions::new()
            .lenient()
            .sequential()
            .with_fallback_page_size(PageSize::A4)
            .with_fallback_prefix("unnamed")
            .with_combined_name("duplex");

        assert_eq!(options.error_mode, ErrorMode::Lenient);
        assert!(!options.parallel);
        assert_eq!(options.fallback_page_size, PageSize::A4);
        assert_eq!(options.fallback_prefix, "unnamed");
        assert_eq!(options.combined_name, "duplex");
    }

    #[test]
    fn test_default_options() {
        let options = SplitOptions::default();
        assert_eq!(options.error_mode, ErrorMode::Strict);
        assert!(options.parallel);
        assert_eq!(options.fallback_page_size, PageSize::LETTER);
        assert_eq!(options.combined_name, DEFAULT_COMBINED_NAME);
        assert_eq!(options.combined_stem().unwrap(), DEFAULT_COMBINED_NAME);
        assert_eq!(options.fallback_stem().unwrap(), DEFAULT_FALLBACK_PREFIX);
    }

    #[test]
    fn test_output_names_stay_in_directory() {
        let options = SplitOptions::new()
            .with_combined_name("../../etc/run")
            .with_fallback_prefix("/tmp/unnamed letter");

        assert_eq!(options.combined_stem().unwrap(), "etcrun");
        assert_eq!(options.fallback_stem().unwrap(), "tmpunnamed_letter");
    }

    #[test]
    fn test_output_names_without_safe_characters() {
        let options = SplitOptions::new().with_combined_name("///");
        assert!(matches!(options.combined_stem(), Err(Error::InvalidName(name)) if name == "///"));

        let options = SplitOptions::new().with_fallback_prefix(" .. ");
        assert!(matches!(options.fallback_stem(), Err(Error::InvalidName(_))));
    }
}
