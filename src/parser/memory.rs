//! In-memory span source.

use crate::error::{Error, Result};
use crate::model::{BoundingBox, RawSpan};

use super::source::SpanSource;

/// A document whose spans are already known.
///
/// Useful when text and layout come from another extraction layer, and for
/// driving the outline pipeline without a PDF file.
///
/// # Example
/// ```
/// use pdfoutline::parser::{MemoryDocument, SpanSource};
///
/// let doc = MemoryDocument::new()
///     .page()
///     .span("Executive Summary", 14.0)
///     .span("Quarterly figures follow.", 10.0);
/// assert_eq!(doc.page_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    pages: Vec<Vec<RawSpan>>,
    metadata_title: Option<String>,
}

impl MemoryDocument {
    /// Create an empty document with no pages.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from prepared pages.
    pub fn from_pages(pages: Vec<Vec<RawSpan>>) -> Self {
        Self {
            pages,
            metadata_title: None,
        }
    }

    /// Set the metadata title.
    pub fn with_metadata_title(mut self, title: impl Into<String>) -> Self {
        self.metadata_title = Some(title.into());
        self
    }

    /// Start a new page.
    pub fn page(mut self) -> Self {
        self.pages.push(Vec::new());
        self
    }

    /// Append a span to the last page, stacked below the previous one.
    ///
    /// Starts a first page if there is none.
    pub fn span(self, text: impl Into<String>, size: f32) -> Self {
        let top = self
            .pages
            .last()
            .and_then(|spans| spans.last())
            .map(|s| s.bbox.y1 + 2.0)
            .unwrap_or(72.0);
        let bbox = BoundingBox::new(72.0, top, 540.0, top + size);
        self.raw_span(RawSpan::new(text, size, "Helvetica", bbox))
    }

    /// Append a fully specified span to the last page.
    pub fn raw_span(mut self, span: RawSpan) -> Self {
        if self.pages.is_empty() {
            self.pages.push(Vec::new());
        }
        if let Some(page) = self.pages.last_mut() {
            page.push(span);
        }
        self
    }
}

impl SpanSource for MemoryDocument {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn spans_for_page(&self, page: u32) -> Result<Vec<RawSpan>> {
        page.checked_sub(1)
            .and_then(|idx| self.pages.get(idx as usize))
            .cloned()
            .ok_or_else(|| Error::PageOutOfRange(page, self.page_count()))
    }

    fn metadata_title(&self) -> Option<String> {
        self.metadata_title.clone()
    }
}
