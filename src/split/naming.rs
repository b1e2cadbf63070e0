//! Output file naming: filename-safe components and collision handling.

use std::collections::{HashMap, HashSet};

/// Longest file stem component kept, in characters.
const MAX_COMPONENT_CHARS: usize = 100;

/// Reduce a human-readable name to a filename-safe component.
///
/// Letters and digits (any script) are kept, as are `-`, `_` and `.`.
/// Whitespace runs become a single `_` and everything else is dropped.
/// Leading and trailing separators are trimmed, so the result never
/// starts with a dot. May return an empty string.
pub fn sanitize_component(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_whitespace() || c == '_' {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
        } else if c.is_alphanumeric() || c == '-' || c == '.' {
            out.push(c);
        }
    }

    let is_separator = |c: char| c == '_' || c == '.' || c == '-';
    let truncated: String = out
        .trim_start_matches(is_separator)
        .chars()
        .take(MAX_COMPONENT_CHARS)
        .collect();
    truncated.trim_end_matches(is_separator).to_string()
}

/// Hands out batch-unique file stems.
///
/// The first claim of a stem gets it unchanged; later claims get `-2`,
/// `-3`, ... appended, skipping any candidate that is already taken
/// (including suffixed names claimed earlier). Comparison ignores case so
/// the names stay distinct on case-insensitive file systems.
#[derive(Debug, Default)]
pub struct NameRegistry {
    taken: HashSet<String>,
    next_suffix: HashMap<String, usize>,
}

impl NameRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `stem`, or the first free suffixed variant of it.
    pub fn claim(&mut self, stem: &str) -> String {
        let key = stem.to_lowercase();
        if self.taken.insert(key.clone()) {
            return stem.to_string();
        }

        let suffix = self.next_suffix.entry(key).or_insert(2);
        loop {
            let candidate = format!("{}-{}", stem, suffix);
            *suffix += 1;
            if self.taken.insert(candidate.to_lowercase()) {
                log::debug!("Name {} already used, renamed to {}", stem, candidate);
                return candidate;
            }
        }
    }

    /// Check if a stem has been handed out.
    pub fn is_taken(&self, stem: &str) -> bool {
        self.taken.contains(&stem.to_lowercase())
    }

    /// Number of stems handed out.
    pub fn len(&self) -> usize {
        self.taken.len()
    }

    /// Check if nothing has been claimed yet.
    pub fn is_empty(&self) -> bool {
        self.taken.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_spaces_and_punctuation() {
        assert_eq!(sanitize_component("The Smith Family"), "The_Smith_Family");
        assert_eq!(sanitize_component("  Smith / Jones  "), "Smith_Jones");
        assert_eq!(sanitize_component("O'Brien-Kelly"), "OBrien-Kelly");
        assert_eq!(sanitize_component(r#"a<b>c:"d|e?f*g\h"#), "abcdefgh");
    }

    #[test]
    fn test_sanitize_keeps_unicode_letters() {
        assert_eq!(sanitize_component("Família Müller"), "Família_Müller");
    }

    #[test]
    fn test_sanitize_trims_separators() {
        assert_eq!(sanitize_component("..hidden"), "hidden");
        assert_eq!(sanitize_component("__x__"), "x");
        assert_eq!(sanitize_component("!!!"), "");
    }

    #[test]
    fn test_sanitize_truncates() {
        let long = "a".repeat(300);
        assert_eq!(sanitize_component(&long).len(), MAX_COMPONENT_CHARS);
    }

    #[test]
    fn test_sanitize_cut_at_separator_is_trimmed() {
        let name = format!("{} b", "a".repeat(99));
        assert_eq!(sanitize_component(&name), "a".repeat(99));

        let dotted = format!("{}.pdf", "x".repeat(100));
        assert_eq!(sanitize_component(&dotted), "x".repeat(100));
    }

    #[test]
    fn test_claim_unique_names() {
        let mut names = NameRegistry::new();
        assert_eq!(names.claim("1_Lee"), "1_Lee");
        assert_eq!(names.claim("2_Kim"), "2_Kim");
        assert_eq!(names.len(), 2);
    }

    #[test]
    fn test_claim_collisions_in_order() {
        let mut names = NameRegistry::new();
        assert_eq!(names.claim("1_Lee"), "1_Lee");
        assert_eq!(names.claim("1_Lee"), "1_Lee-2");
        assert_eq!(names.claim("1_Lee"), "1_Lee-3");
    }

    #[test]
    fn test_suffixed_name_cannot_be_reclaimed() {
        let mut names = NameRegistry::new();
        assert_eq!(names.claim("1_Lee"), "1_Lee");
        assert_eq!(names.claim("1_Lee"), "1_Lee-2");
        // A letter whose own stem happens to be the suffixed name.
        assert_eq!(names.claim("1_Lee-2"), "1_Lee-2-2");
        assert_eq!(names.claim("1_Lee"), "1_Lee-3");
    }

    #[test]
    fn test_natural_name_skips_taken_suffix() {
        let mut names = NameRegistry::new();
        assert_eq!(names.claim("1_Lee-2"), "1_Lee-2");
        assert_eq!(names.claim("1_Lee"), "1_Lee");
        assert_eq!(names.claim("1_Lee"), "1_Lee-3");
    }

    #[test]
    fn test_claim_ignores_case() {
        let mut names = NameRegistry::new();
        assert_eq!(names.claim("1_LEE"), "1_LEE");
        assert_eq!(names.claim("1_lee"), "1_lee-2");
        assert!(names.is_taken("1_Lee-2"));
    }
}
