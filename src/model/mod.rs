//! Data model for outline extraction.
//!
//! [`RawSpan`]s come out of the PDF access layer, [`TextSpan`]s are what the
//! outline pipeline works on, and [`DocumentOutline`] is the emitted record.

mod outline;
mod span;

pub use outline::{DocumentOutline, HeadingCandidate, HeadingLevel, OutlineEntry};
pub use span::{is_close, round_size, BoundingBox, RawSpan, TextSpan};
