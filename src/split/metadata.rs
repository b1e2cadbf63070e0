//! Envelope identifier and family name extraction from a letter's first page.

use regex::Regex;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

use crate::error::{Error as CrateError, Result};
use crate::model::LetterMetadata;

use super::naming::sanitize_component;

/// The envelope number opens the line that carries the print date.
pub const DEFAULT_ENVELOPE_PATTERN: &str = r"(?m)^[ \t]*(\d+)[ \t]+Date Printed:";

/// The family name is the first non-empty line after the print date line.
pub const DEFAULT_FAMILY_NAME_PATTERN: &str =
    r"(?m)^[ \t]*\d+[ \t]+Date Printed:[^\n]*\n(?:[ \t]*\r?\n)*[ \t]*([^\r\n]*\S)";

/// Regular expressions locating the naming data on a first page.
///
/// Each pattern must have at least one capture group; group 1 is the value.
#[derive(Debug, Clone)]
pub struct MetadataPatterns {
    envelope: Regex,
    family_name: Regex,
}

impl MetadataPatterns {
    /// Compile custom patterns.
    pub fn new(envelope: &str, family_name: &str) -> Result<Self> {
        Ok(Self {
            envelope: compile("envelope", envelope)?,
            family_name: compile("family name", family_name)?,
        })
    }

    /// Replace the envelope pattern.
    pub fn with_envelope(mut self, pattern: &str) -> Result<Self> {
        self.envelope = compile("envelope", pattern)?;
        Ok(self)
    }

    /// Replace the family name pattern.
    pub fn with_family_name(mut self, pattern: &str) -> Result<Self> {
        self.family_name = compile("family name", pattern)?;
        Ok(self)
    }

    /// The envelope pattern source.
    pub fn envelope_pattern(&self) -> &str {
        self.envelope.as_str()
    }

    /// The family name pattern source.
    pub fn family_name_pattern(&self) -> &str {
        self.family_name.as_str()
    }
}

impl Default for MetadataPatterns {
    fn default() -> Self {
        Self::new(DEFAULT_ENVELOPE_PATTERN, DEFAULT_FAMILY_NAME_PATTERN)
            .expect("default metadata patterns are valid")
    }
}

fn compile(what: &str, pattern: &str) -> Result<Regex> {
    let re = Regex::new(pattern)
        .map_err(|e| CrateError::InvalidPattern(format!("{} pattern: {}", what, e)))?;
    if re.captures_len() < 2 {
        return Err(CrateError::InvalidPattern(format!(
            "{} pattern has no capture group: {}",
            what, pattern
        )));
    }
    Ok(re)
}

/// Which naming field could not be found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    EnvelopeId,
    FamilyName,
    Both,
}

impl std::fmt::Display for MissingField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingField::EnvelopeId => write!(f, "envelope identifier"),
            MissingField::FamilyName => write!(f, "family name"),
            MissingField::Both => write!(f, "envelope identifier and family name"),
        }
    }
}

/// Recoverable failure: the letter is kept but cannot be named from its content.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no {missing} found on page {page}")]
pub struct MetadataError {
    /// Source page index of the letter's first page
    pub page: usize,
    /// What was missing
    pub missing: MissingField,
}

/// Read the envelope identifier and family name from a first page.
///
/// `page` is only used to tag a failure.
pub fn extract_metadata(
    text: &str,
    page: usize,
    patterns: &MetadataPatterns,
) -> std::result::Result<LetterMetadata, MetadataError> {
    let envelope_id = capture(&patterns.envelope, text)
        .filter(|id| id.bytes().all(|b| b.is_ascii_digit()))
        .map(str::to_string);

    let family = capture(&patterns.family_name, text).and_then(|raw| {
        let family_name: String = raw.nfkc().collect::<String>().trim().to_string();
        let safe = sanitize_component(&family_name);
        (!safe.is_empty()).then_some((family_name, safe))
    });

    match (envelope_id, family) {
        (Some(envelope_id), Some((family_name, safe_family_name))) => Ok(LetterMetadata {
            envelope_id,
            family_name,
            safe_family_name,
        }),
        (None, Some(_)) => Err(MetadataError {
            page,
            missing: MissingField::EnvelopeId,
        }),
        (Some(_), None) => Err(MetadataError {
            page,
            missing: MissingField::FamilyName,
        }),
        (None, None) => Err(MetadataError {
            page,
            missing: MissingField::Both,
        }),
    }
}

fn capture<'t>(re: &Regex, text: &'t str) -> Option<&'t str> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIRST_PAGE: &str = "Riverside Parish\n\
        00417 Date Printed: 03/14/2024\n\
        The Smith Family\n\
        12 Elm Street\n\
        Springfield\n\
        Page 1 of 3\n";

    #[test]
    fn test_extract_default_layout() {
        let meta = extract_metadata(FIRST_PAGE, 0, &MetadataPatterns::default()).unwrap();
        assert_eq!(meta.envelope_id, "00417");
        assert_eq!(meta.family_name, "The Smith Family");
        assert_eq!(meta.safe_family_name, "The_Smith_Family");
        assert_eq!(meta.file_stem(), "00417_The_Smith_Family");
    }

    #[test]
    fn test_extract_skips_blank_lines_and_indentation() {
        let text = "  88 Date Printed: 01/01/2024\n\n   Mr. & Mrs. O'Neil  \n";
        let meta = extract_metadata(text, 0, &MetadataPatterns::default()).unwrap();
        assert_eq!(meta.envelope_id, "88");
        assert_eq!(meta.family_name, "Mr. & Mrs. O'Neil");
        assert_eq!(meta.safe_family_name, "Mr._Mrs._ONeil");
    }

    #[test]
    fn test_missing_family_name() {
        let text = "Riverside Parish\n123 Date Printed: 01/01/2024";
        let err = extract_metadata(text, 5, &MetadataPatterns::default()).unwrap_err();
        assert_eq!(
            err,
            MetadataError {
                page: 5,
                missing: MissingField::FamilyName
            }
        );
        assert_eq!(err.to_string(), "no family name found on page 5");
    }

    #[test]
    fn test_missing_everything() {
        let err = extract_metadata("Page 1 of 1", 2, &MetadataPatterns::default()).unwrap_err();
        assert_eq!(err.missing, MissingField::Both);
    }

    #[test]
    fn test_unsafe_only_name_counts_as_missing() {
        let text = "7 Date Printed: today\n???\n";
        let err = extract_metadata(text, 0, &MetadataPatterns::default()).unwrap_err();
        assert_eq!(err.missing, MissingField::FamilyName);
    }

    #[test]
    fn test_custom_patterns() {
        let patterns =
            MetadataPatterns::new(r"Envelope #\s*(\d+)", r"(?m)^Family:\s*(.+)$").unwrap();
        let text = "Family: Nguyen\nEnvelope # 0042\n";
        let meta = extract_metadata(text, 0, &patterns).unwrap();
        assert_eq!(meta.envelope_id, "0042");
        assert_eq!(meta.family_name, "Nguyen");
    }

    #[test]
    fn test_non_numeric_envelope_rejected() {
        let patterns = MetadataPatterns::default()
            .with_envelope(r"Envelope:\s*(\S+)")
            .unwrap();
        let text = "Envelope: A12\n1 Date Printed: x\nThe Park Family";
        let err = extract_metadata(text, 0, &patterns).unwrap_err();
        assert_eq!(err.missing, MissingField::EnvelopeId);
    }

    #[test]
    fn test_invalid_patterns() {
        assert!(matches!(
            MetadataPatterns::new("(unclosed", DEFAULT_FAMILY_NAME_PATTERN),
            Err(CrateError::InvalidPattern(_))
        ));
        assert!(matches!(
            MetadataPatterns::default().with_family_name(r"Family: \w+"),
            Err(CrateError::InvalidPattern(_))
        ));
    }
}
