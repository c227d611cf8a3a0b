//! PDF document parser using lopdf.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use crate::detect::{detect_format_from_bytes, detect_format_from_path};
use crate::error::{Error, Result};
use crate::model::RawSpan;

use super::backend::{LopdfBackend, PageId, PdfBackend};
use super::content::extract_page_spans;
use super::options::ParseOptions;
use super::source::SpanSource;

/// PDF document parser.
///
/// Owns the parsed document for as long as the parser lives.
pub struct PdfParser {
    backend: LopdfBackend,
    pages: BTreeMap<u32, PageId>,
    options: ParseOptions,
}

impl PdfParser {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let path = path.as_ref();

        // Verify it's a PDF
        detect_format_from_path(path)?;

        let backend = LopdfBackend::load_file(path)?;
        Ok(Self::with_backend(backend, options))
    }

    /// Parse a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Parse a PDF from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        detect_format_from_bytes(data)?;

        let backend = LopdfBackend::load_bytes(data)?;
        Ok(Self::with_backend(backend, options))
    }

    /// Parse a PDF from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, ParseOptions::default())
    }

    /// Parse a PDF from a reader with custom options.
    pub fn from_reader_with_options<R: Read>(mut reader: R, options: ParseOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes_with_options(&data, options)
    }

    fn with_backend(backend: LopdfBackend, options: ParseOptions) -> Self {
        let pages = backend.pages();
        log::debug!(
            "Opened PDF {} with {} pages",
            backend.version(),
            pages.len()
        );
        Self {
            backend,
            pages,
            options,
        }
    }

    /// Get the PDF version.
    pub fn version(&self) -> String {
        self.backend.version()
    }

    /// Get the options this parser was opened with.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    fn read_page(&self, page_id: PageId) -> Result<Vec<RawSpan>> {
        extract_page_spans(&self.backend, page_id, self.options.max_spans_per_page)
    }
}

impl SpanSource for PdfParser {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn spans_for_page(&self, page: u32) -> Result<Vec<RawSpan>> {
        let page_id = *self
            .pages
            .get(&page)
            .ok_or_else(|| Error::PageOutOfRange(page, self.page_count()))?;

        match self.read_page(page_id) {
            Ok(spans) => {
                log::debug!("Page {}: {} spans", page, spans.len());
                Ok(spans)
            }
            Err(e) if self.options.is_lenient() => {
                log::warn!("Failed to extract text from page {}: {}", page, e);
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    fn metadata_title(&self) -> Option<String> {
        self.backend.metadata_title()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes_rejects_non_pdf() {
        let result = PdfParser::from_bytes(b"PK\x03\x04 zip archive");
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_open_missing_file_is_open_error() {
        let err = PdfParser::open("/nonexistent/dir/missing.pdf")
            .err()
            .expect("missing file should not open");
        assert!(err.is_open_error());
    }

    #[test]
    fn test_truncated_pdf_fails() {
        let result = PdfParser::from_bytes(b"%PDF-1.4\n1 0 obj\n<< /Type /Catalog");
        assert!(result.is_err());
    }
}
