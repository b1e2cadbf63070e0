//! Letter assembly and duplex padding.

use crate::model::{AssembledLetter, LetterSegment, OutputDocument, Padding, PageSize};
use crate::parser::PageSource;

/// Copy the pages of `segment` out of `source`, in order.
///
/// The returned letter has no name yet and no padding.
pub fn assemble<S>(ordinal: usize, segment: LetterSegment, source: &S) -> AssembledLetter
where
    S: PageSource + ?Sized,
{
    let mut letter = AssembledLetter::new(ordinal, segment);
    letter.document = copy_pages(segment, source);
    letter
}

fn copy_pages<S>(segment: LetterSegment, source: &S) -> OutputDocument
where
    S: PageSource + ?Sized,
{
    let mut doc = OutputDocument::new();
    for index in segment.pages() {
        doc.append_page(index, source.page_size(index));
    }
    doc
}

/// Make the letter's page count even.
///
/// An odd letter gets one blank page sized like its last page, or
/// `fallback` when that size is unknown. An even letter is left alone,
/// which makes padding idempotent. Returns the letter's padding state.
pub fn pad_to_even(letter: &mut AssembledLetter, fallback: PageSize) -> Padding {
    if letter.document.is_even() {
        return letter.padding;
    }

    let size = letter.document.last_page_size().unwrap_or(fallback);
    letter.document.append_blank_page(size);
    letter.padding = Padding::BlankPage { size };
    log::debug!(
        "Letter {} padded to {} pages with a {} blank page",
        letter.ordinal,
        letter.page_count(),
        size
    );
    letter.padding
}
