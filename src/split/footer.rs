//! "Page X of Y" footer recognition.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// The footer read from one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FooterReading {
    /// A footer "Page `current` of `total`", with `1 <= current <= total`
    Found { current: u32, total: u32 },
    /// No usable footer on the page
    NotFound,
}

impl FooterReading {
    /// Check if a footer was found.
    pub fn is_found(&self) -> bool {
        matches!(self, FooterReading::Found { .. })
    }
}

impl std::fmt::Display for FooterReading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FooterReading::Found { current, total } => write!(f, "{} of {}", current, total),
            FooterReading::NotFound => write!(f, "-"),
        }
    }
}

/// Word boundary before "page" keeps words like "homepage" out; the
/// whitespace is optional because extraction sometimes drops it.
const FOOTER_PATTERN: &str = r"(?i)\bpage\s*(\d+)\s*of\s*(\d+)\b";

fn footer_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(FOOTER_PATTERN).expect("footer pattern is valid"))
}

/// Read the footer of a page from its extracted text.
///
/// The footer may appear anywhere in the text. When several candidates
/// are present the first one with `1 <= current <= total` wins;
/// candidates whose numbers do not fit in a `u32` are skipped.
///
/// # Example
///
/// ```
/// use letterpad::split::{parse_footer, FooterReading};
///
/// let reading = parse_footer("Dear family,\n...\nPAGE  2  of 3");
/// assert_eq!(reading, FooterReading::Found { current: 2, total: 3 });
/// assert_eq!(parse_footer("no footer here"), FooterReading::NotFound);
/// ```
pub fn parse_footer(text: &str) -> FooterReading {
    footer_regex()
        .captures_iter(text)
        .find_map(|caps| {
            let current: u32 = caps[1].parse().ok()?;
            let total: u32 = caps[2].parse().ok()?;
            (current >= 1 && current <= total).then_some(FooterReading::Found { current, total })
        })
        .unwrap_or(FooterReading::NotFound)
}
