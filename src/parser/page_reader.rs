//! Reads the text of every page of a [`PageSource`], in page order.

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::model::PageText;

use super::backend::PageSource;
use super::options::{ErrorMode, SplitOptions};

/// Extract the text of all pages.
///
/// The returned vector has exactly one entry per page, in document
/// order, regardless of `options.parallel`. In [`ErrorMode::Lenient`] a
/// page whose text cannot be extracted is returned with empty text.
pub fn read_pages<S>(source: &S, options: &SplitOptions) -> Result<Vec<PageText>>
where
    S: PageSource + Sync + ?Sized,
{
    let count = source.page_count();
    if count == 0 {
        return Err(Error::EmptyDocument);
    }

    let read = |index: usize| read_page(source, index, options.error_mode);
    let pages: Result<Vec<PageText>> = if options.parallel && count > 1 {
        (0..count).into_par_iter().map(read).collect()
    } else {
        (0..count).map(read).collect()
    };

    let pages = pages?;
    log::debug!("Read text of {} pages", pages.len());
    Ok(pages)
}

fn read_page<S>(source: &S, index: usize, mode: ErrorMode) -> Result<PageText>
where
    S: PageSource + ?Sized,
{
    match source.page_text(index) {
        Ok(text) => Ok(PageText::new(index, text)),
        Err(e) if mode == ErrorMode::Lenient => {
            log::warn!("Failed to extract text from page {}: {}", index, e);
            Ok(PageText::new(index, String::new()))
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PageSize;

    struct Pages(Vec<Option<&'static str>>);

    impl PageSource for Pages {
        fn page_count(&self) -> usize {
            self.0.len()
        }

        fn page_text(&self, index: usize) -> Result<String> {
            match self.0[index] {
                Some(text) => Ok(text.to_string()),
                None => Err(Error::TextExtract {
                    page: index,
                    reason: "broken content stream".to_string(),
                }),
            }
        }

        fn page_size(&self, _index: usize) -> Option<PageSize> {
            None
        }
    }

    #[test]
    fn test_read_pages_keeps_order() {
        let source = Pages((0..50).map(|_| Some("Page 1 of 1")).collect());
        let pages = read_pages(&source, &SplitOptions::default()).unwrap();
        assert_eq!(pages.len(), 50);
        assert!(pages.iter().enumerate().all(|(i, p)| p.index == i));
    }

    #[test]
    fn test_read_pages_empty_document() {
        let source = Pages(Vec::new());
        let result = read_pages(&source, &SplitOptions::default());
        assert!(matches!(result, Err(Error::EmptyDocument)));
    }

    #[test]
    fn test_read_pages_strict_fails() {
        let source = Pages(vec![Some("Page 1 of 2"), None]);
        let result = read_pages(&source, &SplitOptions::new().sequential());
        assert!(matches!(result, Err(Error::TextExtract { page: 1, .. })));
    }

    #[test]
    fn test_read_pages_lenient_reads_empty() {
        let source = Pages(vec![Some("Page 1 of 2"), None]);
        let pages = read_pages(&source, &SplitOptions::new().lenient()).unwrap();
        assert_eq!(pages[1], PageText::new(1, ""));
    }
}
