//! Data model shared by the splitting pipeline.
//!
//! Everything here is plain in-memory data. Output documents are kept as
//! ordered page slots referring back to the source document; actual PDF
//! bytes are only produced by a [`crate::parser::DocumentWriter`].

mod batch;
mod letter;
mod page;
mod segment;

pub use batch::{Batch, Manifest, ManifestEntry, MetadataWarning};
pub use letter::{AssembledLetter, LetterMetadata, OutputDocument, PageSlot, Padding};
pub use page::{PageSize, PageText};
pub use segment::LetterSegment;
