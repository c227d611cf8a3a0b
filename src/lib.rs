//! # pdfoutline
//!
//! Title and heading outline extraction from PDF documents.
//!
//! The library reads the text spans of a PDF together with their font sizes
//! and positions, and derives a document title plus a three-level (H1-H3)
//! list of headings with page numbers.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfoutline::{extract_outline_file, to_json, JsonFormat};
//!
//! fn main() -> pdfoutline::Result<()> {
//!     let outline = extract_outline_file("report.pdf")?;
//!     println!("{}", to_json(&outline, JsonFormat::Pretty)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Multi-signal classification**: section numbering, structural keywords
//!   and document-relative font sizes
//! - **Near-duplicate suppression**: repeated running headers are dropped
//! - **Reading order**: headings sorted by page and vertical position
//! - **Batch mode**: whole directories in parallel with Rayon
//! - **Pluggable layout source**: anything implementing [`SpanSource`]

pub mod batch;
pub mod detect;
pub mod error;
pub mod model;
pub mod outline;
pub mod parser;
pub mod render;

#[cfg(feature = "ffi")]
pub mod ffi;

// Re-export commonly used types
pub use batch::{BatchJob, BatchReport, FileOutcome, FileStatus};
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_pdf, PdfFormat};
pub use error::{Error, Result};
pub use model::{
    BoundingBox, DocumentOutline, HeadingCandidate, HeadingLevel, OutlineEntry, RawSpan, TextSpan,
};
pub use outline::{
    similarity, FontProfile, HeadingClassifier, HeadingRule, NumberingScheme, OutlineExtractor,
    OutlineOptions, OutlineReport, TitleStrategy,
};
pub use parser::{ErrorMode, MemoryDocument, ParseOptions, PdfParser, SpanSource};
pub use render::{to_json, write_json, JsonFormat};

use std::io::Read;
use std::path::Path;

/// Extract the outline of a PDF file with default options.
///
/// # Example
///
/// ```no_run
/// use pdfoutline::extract_outline_file;
///
/// let outline = extract_outline_file("report.pdf").unwrap();
/// println!("{} ({} headings)", outline.title, outline.outline.len());
/// ```
pub fn extract_outline_file<P: AsRef<Path>>(path: P) -> Result<DocumentOutline> {
    Outliner::new().extract_file(path)
}

/// Extract the outline of an in-memory PDF.
///
/// `file_name` is only used as the title of last resort.
///
/// # Example
///
/// ```no_run
/// use pdfoutline::extract_outline_bytes;
///
/// let data = std::fs::read("report.pdf").unwrap();
/// let outline = extract_outline_bytes(&data, "report.pdf").unwrap();
/// ```
pub fn extract_outline_bytes(data: &[u8], file_name: &str) -> Result<DocumentOutline> {
    Outliner::new().extract_bytes(data, file_name)
}

/// Extract the outline of a PDF read from `reader`.
pub fn extract_outline_reader<R: Read>(reader: R, file_name: &str) -> Result<DocumentOutline> {
    Outliner::new().extract_reader(reader, file_name)
}

/// Extract the outline of a PDF file without blocking the async runtime.
///
/// # Example
///
/// ```no_run
/// # async fn run() -> pdfoutline::Result<()> {
/// let outline = pdfoutline::extract_outline_file_async("report.pdf").await?;
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "async")]
pub async fn extract_outline_file_async<P: AsRef<Path>>(path: P) -> Result<DocumentOutline> {
    let path = path.as_ref().to_path_buf();
    tokio::task::spawn_blocking(move || extract_outline_file(path))
        .await
        .map_err(|e| Error::Other(format!("Task join error: {}", e)))?
}

/// Builder for configuring and running outline extraction.
///
/// # Example
///
/// ```no_run
/// use pdfoutline::{NumberingScheme, Outliner};
/// use std::time::Duration;
///
/// let report = Outliner::new()
///     .lenient()
///     .with_numbering(NumberingScheme::Legacy)
///     .with_deadline(Duration::from_secs(120))
///     .process_dir("./input", "./output")?;
/// println!("{} files processed", report.processed());
/// # Ok::<(), pdfoutline::Error>(())
/// ```
pub struct Outliner {
    parse_options: ParseOptions,
    outline_options: OutlineOptions,
    format: JsonFormat,
    parallel: bool,
}

impl Outliner {
    /// Create a new Outliner builder.
    pub fn new() -> Self {
        Self {
            parse_options: ParseOptions::default(),
            outline_options: OutlineOptions::default(),
            format: JsonFormat::Pretty,
            parallel: true,
        }
    }

    /// Replace the parse options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse_options = options;
        self
    }

    /// Replace the outline options.
    pub fn with_outline_options(mut self, options: OutlineOptions) -> Self {
        self.outline_options = options;
        self
    }

    /// Skip unreadable pages instead of failing the document.
    pub fn lenient(mut self) -> Self {
        self.parse_options = self.parse_options.lenient();
        self
    }

    /// Set the numbering scheme.
    pub fn with_numbering(mut self, numbering: NumberingScheme) -> Self {
        self.outline_options = self.outline_options.with_numbering(numbering);
        self
    }

    /// Prefer the metadata title when present.
    pub fn prefer_metadata_title(mut self) -> Self {
        self.outline_options = self.outline_options.prefer_metadata_title(true);
        self
    }

    /// Set the per-document deadline.
    pub fn with_deadline(mut self, deadline: std::time::Duration) -> Self {
        self.outline_options = self.outline_options.with_deadline(deadline);
        self
    }

    /// Set the JSON format used by [`process_dir`](Self::process_dir).
    pub fn with_format(mut self, format: JsonFormat) -> Self {
        self.format = format;
        self
    }

    /// Process batch files one at a time.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Build the extractor these options describe.
    pub fn extractor(&self) -> OutlineExtractor {
        OutlineExtractor::new(self.outline_options.clone())
    }

    /// Extract the outline of a PDF file.
    pub fn extract_file<P: AsRef<Path>>(&self, path: P) -> Result<DocumentOutline> {
        let path = path.as_ref();
        let parser = PdfParser::open_with_options(path, self.parse_options.clone())?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.extractor().extract(&parser, &file_name)
    }

    /// Extract the outline of an in-memory PDF.
    pub fn extract_bytes(&self, data: &[u8], file_name: &str) -> Result<DocumentOutline> {
        let parser = PdfParser::from_bytes_with_options(data, self.parse_options.clone())?;
        self.extractor().extract(&parser, file_name)
    }

    /// Extract the outline of a PDF read from `reader`.
    pub fn extract_reader<R: Read>(&self, reader: R, file_name: &str) -> Result<DocumentOutline> {
        let parser = PdfParser::from_reader_with_options(reader, self.parse_options.clone())?;
        self.extractor().extract(&parser, file_name)
    }

    /// Extract the outline of any span source.
    pub fn extract_source<S: SpanSource + ?Sized>(
        &self,
        source: &S,
        file_name: &str,
    ) -> Result<DocumentOutline> {
        self.extractor().extract(source, file_name)
    }

    /// Write `<stem>.json` for every PDF in `input_dir` into `output_dir`.
    pub fn process_dir<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_dir: P,
        output_dir: Q,
    ) -> Result<BatchReport> {
        let extractor = self.extractor();
        BatchJob::new(&extractor)
            .with_parse_options(self.parse_options.clone())
            .with_format(self.format)
            .with_parallel(self.parallel)
            .run(input_dir, output_dir)
    }
}

impl Default for Outliner {
    fn default() -> Self {
        Self::new()
    }
}
