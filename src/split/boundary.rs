//! Groups pages into letters from their footer readings.
//!
//! The walk is strict: every page must end up in exactly one letter and
//! any irregularity aborts the whole document. A page without a footer
//! is accepted inside an open letter only as long as a later page of
//! the same letter can still confirm the numbering, so the final page
//! of every letter has to carry its footer.

use crate::error::BoundaryError;
use crate::model::LetterSegment;

use super::footer::FooterReading;

/// The letter currently being walked.
#[derive(Debug, Clone, Copy)]
struct OpenLetter {
    start: usize,
    next: u32,
    total: u32,
}

/// Split the pages `0..readings.len()` into letters.
///
/// On success the returned segments are in page order, contiguous and
/// cover every page exactly once.
pub fn segment(readings: &[FooterReading]) -> Result<Vec<LetterSegment>, BoundaryError> {
    let mut segments = Vec::new();
    let mut open: Option<OpenLetter> = None;

    for (page, reading) in readings.iter().enumerate() {
        open = match (open, *reading) {
            (None, FooterReading::Found { current: 1, total }) => {
                if total == 1 {
                    close(&mut segments, page, page);
                    None
                } else {
                    Some(OpenLetter {
                        start: page,
                        next: 2,
                        total,
                    })
                }
            }
            (None, FooterReading::Found { current, .. }) => {
                return Err(BoundaryError::UnexpectedStart {
                    page,
                    observed: current,
                });
            }
            (None, FooterReading::NotFound) => {
                return Err(BoundaryError::UnassignedPage { page });
            }
            (Some(letter), FooterReading::Found { current, total }) => {
                if current != letter.next {
                    return Err(BoundaryError::SequenceBreak {
                        page,
                        expected: letter.next,
                        observed: current,
                    });
                }
                if total != letter.total {
                    return Err(BoundaryError::TotalMismatch {
                        page,
                        expected: letter.total,
                        observed: total,
                    });
                }
                if current == total {
                    close(&mut segments, letter.start, page);
                    None
                } else {
                    Some(OpenLetter {
                        next: current + 1,
                        ..letter
                    })
                }
            }
            (Some(letter), FooterReading::NotFound) => {
                // Nothing after the last page could vouch for it.
                if letter.next >= letter.total {
                    return Err(BoundaryError::MissingFooter {
                        page,
                        expected: letter.next,
                    });
                }
                log::debug!(
                    "Page {} has no footer, assuming page {} of {}",
                    page,
                    letter.next,
                    letter.total
                );
                Some(OpenLetter {
                    next: letter.next + 1,
                    ..letter
                })
            }
        };
    }

    if let Some(letter) = open {
        return Err(BoundaryError::UnterminatedLetter {
            start: letter.start,
            expected_total: letter.total,
            last_page: readings.len() - 1,
        });
    }

    Ok(segments)
}

fn close(segments: &mut Vec<LetterSegment>, start: usize, end: usize) {
    let segment = LetterSegment::new(start, end);
    log::debug!("Letter {}: {}", segments.len() + 1, segment);
    segments.push(segment);
}
