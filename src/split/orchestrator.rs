//! Drives the whole pipeline for one input document.

use chrono::Utc;

use crate::error::Result;
use crate::model::{Batch, MetadataWarning, OutputDocument, PageText};
use crate::parser::{read_pages, PageSource, SplitOptions};

use super::assemble::{assemble, pad_to_even};
use super::boundary::segment;
use super::footer::{parse_footer, FooterReading};
use super::metadata::extract_metadata;
use super::naming::NameRegistry;

/// Splits one document into named, padded letters.
///
/// A splitter holds only configuration; every call to [`split`] works on
/// its own state, so one splitter can serve many documents at once.
///
/// [`split`]: LetterSplitter::split
#[derive(Debug, Clone, Default)]
pub struct LetterSplitter {
    options: SplitOptions,
}

impl LetterSplitter {
    /// Create a splitter with the given options.
    pub fn new(options: SplitOptions) -> Self {
        Self { options }
    }

    /// The splitter's options.
    pub fn options(&self) -> &SplitOptions {
        &self.options
    }

    /// Read the footer of every page, in page order.
    pub fn read_footers<S>(&self, source: &S) -> Result<Vec<FooterReading>>
    where
        S: PageSource + Sync + ?Sized,
    {
        let pages = read_pages(source, &self.options)?;
        Ok(footers(&pages))
    }

    /// Run the pipeline and build the batch.
    ///
    /// Fails without producing anything when the source cannot be read
    /// or its footers do not split cleanly into letters, or when the
    /// configured output names have no filename-safe characters. Letters whose
    /// first page lacks naming data are kept under a fallback name and
    /// reported in [`Batch::warnings`].
    pub fn split<S>(&self, source: &S) -> Result<Batch>
    where
        S: PageSource + Sync + ?Sized,
    {
        let combined_name = self.options.combined_stem()?;
        let fallback_prefix = self.options.fallback_stem()?;

        let pages = read_pages(source, &self.options)?;
        let readings = footers(&pages);
        let segments = segment(&readings)?;

        let mut names = NameRegistry::new();
        let mut letters = Vec::with_capacity(segments.len());
        let mut warnings = Vec::new();
        let mut combined = OutputDocument::new();

        for (i, seg) in segments.into_iter().enumerate() {
            let ordinal = i + 1;
            let mut letter = assemble(ordinal, seg, source);

            let first_page = &pages[seg.first_page()].text;
            let stem = match extract_metadata(first_page, seg.first_page(), &self.options.patterns)
            {
                Ok(metadata) => {
                    let stem = metadata.file_stem();
                    letter.metadata = Some(metadata);
                    stem
                }
                Err(e) => {
                    let fallback = format!("{}_{}", fallback_prefix, ordinal);
                    log::warn!("Letter {}: {}, using {}", ordinal, e, fallback);
                    warnings.push(MetadataWarning {
                        ordinal,
                        page: e.page,
                        reason: e.to_string(),
                        fallback_name: fallback.clone(),
                    });
                    fallback
                }
            };
            letter.file_stem = names.claim(&stem);

            pad_to_even(&mut letter, self.options.fallback_page_size);
            combined.append_document(&letter.document);
            letters.push(letter);
        }

        let batch = Batch {
            letters,
            combined,
            combined_name,
            warnings,
            source_page_count: pages.len(),
            created_at: Utc::now(),
        };

        log::info!(
            "Split {} pages into {} letters ({} pages after padding, {} warnings)",
            batch.source_page_count,
            batch.letter_count(),
            batch.combined.page_count(),
            batch.warnings.len()
        );
        Ok(batch)
    }
}

fn footers(pages: &[PageText]) -> Vec<FooterReading> {
    pages
        .iter()
        .map(|page| {
            let reading = parse_footer(&page.text);
            log::debug!("Page {}: footer {}", page.index, reading);
            reading
        })
        .collect()
}
