//! PDF access layer.
//!
//! [`PdfParser`] reads text spans out of PDF files through a [`PdfBackend`];
//! [`MemoryDocument`] serves spans that are already known. Both implement
//! [`SpanSource`], which is all the outline pipeline needs.

pub mod backend;
mod content;
mod memory;
mod options;
mod pdf_parser;
mod source;

pub use backend::{LopdfBackend, PdfBackend};
pub use content::extract_page_spans;
pub use memory::MemoryDocument;
pub use options::{ErrorMode, ParseOptions};
pub use pdf_parser::PdfParser;
pub use source::SpanSource;
