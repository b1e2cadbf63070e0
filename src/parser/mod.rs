//! Input side: page text sources, document writers and options.

mod backend;
mod options;
mod page_reader;

pub use backend::{DocumentWriter, LopdfBackend, PageSource};
pub use options::{ErrorMode, SplitOptions, DEFAULT_COMBINED_NAME, DEFAULT_FALLBACK_PREFIX};
pub use page_reader::read_pages;
