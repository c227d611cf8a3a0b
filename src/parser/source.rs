//! The contract between the PDF access layer and the outline pipeline.

use crate::error::Result;
use crate::model::RawSpan;

/// Anything that can hand out per-page text spans.
///
/// Pages are numbered from 1. Spans come back in content-stream order with
/// untrimmed text and unrounded sizes.
pub trait SpanSource {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Spans of a single page.
    fn spans_for_page(&self, page: u32) -> Result<Vec<RawSpan>>;

    /// Title recorded in the document metadata, if any.
    fn metadata_title(&self) -> Option<String> {
        None
    }
}
