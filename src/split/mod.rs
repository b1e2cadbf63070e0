//! The splitting pipeline: footers, letter boundaries, metadata,
//! assembly, padding and naming.

pub mod assemble;
pub mod boundary;
mod footer;
mod metadata;
mod naming;
mod orchestrator;

pub use assemble::{assemble, pad_to_even};
pub use boundary::segment;
pub use footer::{parse_footer, FooterReading};
pub use metadata::{
    extract_metadata, MetadataError, MetadataPatterns, MissingField, DEFAULT_ENVELOPE_PATTERN,
    DEFAULT_FAMILY_NAME_PATTERN,
};
pub use naming::{sanitize_component, NameRegistry};
pub use orchestrator::LetterSplitter;
