//! # letterpad
//!
//! Split a concatenated PDF of letters into individual, duplex-ready files.
//!
//! Every page of the input is expected to carry a "Page X of Y" footer.
//! Pages are grouped into letters by those footers, each letter is named
//! from the envelope number and family name on its first page, and
//! letters with an odd page count get one blank page so that every
//! letter starts on a fresh sheet when printed double-sided.
//!
//! ## Quick Start
//!
//! ```no_run
//! use letterpad::split_file;
//!
//! fn main() -> letterpad::Result<()> {
//!     let output = split_file("letters.pdf")?;
//!
//!     for file in &output.rendered.letters {
//!         std::fs::write(&file.name, &file.bytes)?;
//!     }
//!     std::fs::write(&output.rendered.combined.name, &output.rendered.combined.bytes)?;
//!
//!     for warning in output.batch.warnings() {
//!         eprintln!("warning: {}", warning);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Strict boundaries**: any break in the footer numbering fails the
//!   whole document instead of producing misgrouped letters
//! - **Duplex padding**: odd letters get a blank page sized like their last page
//! - **Configurable naming**: custom regular expressions for the envelope
//!   number and family name
//! - **Parallel processing**: Uses Rayon for page text extraction
//! - **Manifest**: JSON description of every produced file

pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;
pub mod split;

// Re-export commonly used types
pub use detect::{is_pdf, is_pdf_bytes, sniff_bytes, sniff_path, PdfHeader};
pub use error::{BoundaryError, Error, Result};
pub use model::{
    AssembledLetter, Batch, LetterMetadata, LetterSegment, Manifest, ManifestEntry,
    MetadataWarning, OutputDocument, PageSize, PageSlot, Padding,
};
pub use parser::{DocumentWriter, ErrorMode, LopdfBackend, PageSource, SplitOptions};
pub use render::{BatchStats, JsonFormat, RenderedBatch, RenderedFile};
pub use split::{FooterReading, LetterSplitter, MetadataPatterns};

use std::io::Read;
use std::path::Path;

/// A split batch together with the PDF bytes of every output file.
#[derive(Debug, Clone)]
pub struct SplitOutput {
    /// Letters, combined document and warnings
    pub batch: Batch,

    /// Serialized output files
    pub rendered: RenderedBatch,
}

impl SplitOutput {
    /// Summary counters of the batch.
    pub fn stats(&self) -> BatchStats {
        self.batch.stats()
    }

    /// The batch manifest rendered as JSON.
    pub fn manifest_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.batch.manifest(), format)
    }
}

/// Split and render the letters of an opened backend.
fn split_backend(backend: &LopdfBackend, options: SplitOptions) -> Result<SplitOutput> {
    let batch = LetterSplitter::new(options).split(backend)?;
    let rendered = render::render_batch(&batch, backend)?;
    Ok(SplitOutput { batch, rendered })
}

/// Split a PDF file into letters with default options.
///
/// # Example
///
/// ```no_run
/// use letterpad::split_file;
///
/// let output = split_file("letters.pdf").unwrap();
/// println!("{} letters", output.batch.letter_count());
/// ```
pub fn split_file<P: AsRef<Path>>(path: P) -> Result<SplitOutput> {
    split_file_with_options(path, SplitOptions::default())
}

/// Split a PDF file with custom options.
///
/// # Example
///
/// ```no_run
/// use letterpad::{split_file_with_options, SplitOptions};
///
/// let options = SplitOptions::new()
///     .lenient()
///     .with_combined_name("print_run");
/// let output = split_file_with_options("letters.pdf", options).unwrap();
/// ```
pub fn split_file_with_options<P: AsRef<Path>>(
    path: P,
    options: SplitOptions,
) -> Result<SplitOutput> {
    let backend = LopdfBackend::open(path)?;
    split_backend(&backend, options)
}

/// Split a PDF held in memory.
///
/// # Example
///
/// ```no_run
/// use letterpad::split_bytes;
///
/// let data = std::fs::read("letters.pdf").unwrap();
/// let output = split_bytes(&data).unwrap();
/// ```
pub fn split_bytes(data: &[u8]) -> Result<SplitOutput> {
    split_bytes_with_options(data, SplitOptions::default())
}

/// Split a PDF held in memory with custom options.
pub fn split_bytes_with_options(data: &[u8], options: SplitOptions) -> Result<SplitOutput> {
    let backend = LopdfBackend::from_bytes(data)?;
    split_backend(&backend, options)
}

/// Split a PDF read from `reader`.
pub fn split_reader<R: Read>(reader: R, options: SplitOptions) -> Result<SplitOutput> {
    let backend = LopdfBackend::from_reader(reader)?;
    split_backend(&backend, options)
}

/// Split a PDF on the blocking thread pool.
///
/// # Example
///
/// ```no_run
/// # async fn run() -> letterpad::Result<()> {
/// use letterpad::{split_bytes_async, SplitOptions};
///
/// let data = std::fs::read("letters.pdf")?;
/// let output = split_bytes_async(data, SplitOptions::default()).await?;
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "async")]
pub async fn split_bytes_async(data: Vec<u8>, options: SplitOptions) -> Result<SplitOutput> {
    tokio::task::spawn_blocking(move || split_bytes_with_options(&data, options))
        .await
        .map_err(|e| Error::Io(std::io::Error::other(e)))?
}

/// Builder for splitting documents.
///
/// # Example
///
/// ```no_run
/// use letterpad::{Letterpad, PageSize};
///
/// let output = Letterpad::new()
///     .lenient()
///     .with_fallback_page_size(PageSize::A4)
///     .with_combined_name("print_run")
///     .split("letters.pdf")?;
/// # Ok::<(), letterpad::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Letterpad {
    options: SplitOptions,
}

impl Letterpad {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read pages whose text cannot be extracted as empty.
    pub fn lenient(mut self) -> Self {
        self.options = self.options.lenient();
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.sequential();
        self
    }

    /// Set metadata patterns.
    pub fn with_patterns(mut self, patterns: MetadataPatterns) -> Self {
        self.options = self.options.with_patterns(patterns);
        self
    }

    /// Set the combined document's file stem.
    pub fn with_combined_name(mut self, name: impl Into<String>) -> Self {
        self.options = self.options.with_combined_name(name);
        self
    }

    /// Set the file stem prefix for letters without metadata.
    pub fn with_fallback_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.options = self.options.with_fallback_prefix(prefix);
        self
    }

    /// Set the blank page size used when a letter's own size is unknown.
    pub fn with_fallback_page_size(mut self, size: PageSize) -> Self {
        self.options = self.options.with_fallback_page_size(size);
        self
    }

    /// The options collected so far.
    pub fn options(&self) -> &SplitOptions {
        &self.options
    }

    /// Split a PDF file.
    pub fn split<P: AsRef<Path>>(self, path: P) -> Result<SplitOutput> {
        split_file_with_options(path, self.options)
    }

    /// Split a PDF held in memory.
    pub fn split_bytes(self, data: &[u8]) -> Result<SplitOutput> {
        split_bytes_with_options(data, self.options)
    }
}
