//! Output side: manifest JSON, batch statistics and PDF bytes.

mod json;
mod output;
mod stats;

pub use json::{to_json, JsonFormat};
pub use output::{render_batch, render_combined, render_letter, RenderedBatch, RenderedFile};
pub use stats::BatchStats;
