//! PDF bytes for every file a batch produces.

use crate::error::Result;
use crate::model::{AssembledLetter, Batch};
use crate::parser::DocumentWriter;

/// One output file, ready to be written or packaged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    /// File name, including the `.pdf` extension
    pub name: String,

    /// PDF content
    pub bytes: Vec<u8>,
}

impl RenderedFile {
    /// Size of the file in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the file has no content.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// All files of a batch: one per letter plus the combined document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBatch {
    /// Individual letters, in source order
    pub letters: Vec<RenderedFile>,

    /// The combined document
    pub combined: RenderedFile,
}

impl RenderedBatch {
    /// Iterate over every file, letters first.
    pub fn files(&self) -> impl Iterator<Item = &RenderedFile> {
        self.letters.iter().chain(std::iter::once(&self.combined))
    }

    /// Total size of all files in bytes.
    pub fn total_bytes(&self) -> usize {
        self.files().map(RenderedFile::len).sum()
    }
}

/// Serialize one letter.
pub fn render_letter<W>(letter: &AssembledLetter, writer: &W) -> Result<RenderedFile>
where
    W: DocumentWriter + ?Sized,
{
    let bytes = writer.serialize(&letter.document)?;
    log::debug!(
        "Rendered {} ({} pages, {} bytes)",
        letter.file_name(),
        letter.page_count(),
        bytes.len()
    );
    Ok(RenderedFile {
        name: letter.file_name(),
        bytes,
    })
}

/// Serialize the combined document.
pub fn render_combined<W>(batch: &Batch, writer: &W) -> Result<RenderedFile>
where
    W: DocumentWriter + ?Sized,
{
    Ok(RenderedFile {
        name: batch.combined_file_name(),
        bytes: writer.serialize(&batch.combined)?,
    })
}

/// Serialize every letter and the combined document.
///
/// Nothing is returned unless every file serializes.
pub fn render_batch<W>(batch: &Batch, writer: &W) -> Result<RenderedBatch>
where
    W: DocumentWriter + ?Sized,
{
    let letters = batch
        .letters
        .iter()
        .map(|letter| render_letter(letter, writer))
        .collect::<Result<Vec<_>>>()?;
    let combined = render_combined(batch, writer)?;
    Ok(RenderedBatch { letters, combined })
}
