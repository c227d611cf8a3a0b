//! Outline types: heading levels, candidates and the final document outline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Three-tier heading level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    /// Map a numbering depth (1-based) to a level, clamping at H3.
    pub fn from_depth(depth: usize) -> Self {
        match depth {
            0 | 1 => HeadingLevel::H1,
            2 => HeadingLevel::H2,
            _ => HeadingLevel::H3,
        }
    }

    /// Numeric level (1-3).
    pub fn as_u8(self) -> u8 {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "H{}", self.as_u8())
    }
}

/// A provisional heading, not yet deduplicated or ordered.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadingCandidate {
    pub level: HeadingLevel,
    pub text: String,
    pub page: u32,
    /// Rounded size of the span that produced the candidate
    pub font_size: f32,
    /// Vertical position, filled in by the order resolver
    pub y0: Option<f32>,
}

impl HeadingCandidate {
    /// Create a candidate without a resolved position.
    pub fn new(level: HeadingLevel, text: impl Into<String>, page: u32, font_size: f32) -> Self {
        Self {
            level,
            text: text.into(),
            page,
            font_size,
            y0: None,
        }
    }

    /// Sort key used for reading order.
    pub fn position(&self) -> (u32, f32) {
        (self.page, self.y0.unwrap_or(0.0))
    }
}

/// A single entry of the emitted outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    pub level: HeadingLevel,
    pub text: String,
    pub page: u32,
}

impl From<HeadingCandidate> for OutlineEntry {
    fn from(candidate: HeadingCandidate) -> Self {
        Self {
            level: candidate.level,
            text: candidate.text,
            page: candidate.page,
        }
    }
}

/// The extracted outline of one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentOutline {
    /// Document title, never empty
    pub title: String,
    /// Headings in reading order
    pub outline: Vec<OutlineEntry>,
    /// Number of pages in the source document
    pub total_pages: u32,
}

impl DocumentOutline {
    /// Outline with a title and no headings.
    pub fn empty(title: impl Into<String>, total_pages: u32) -> Self {
        Self {
            title: title.into(),
            outline: Vec::new(),
            total_pages,
        }
    }

    /// Whether no headings were found.
    pub fn is_empty(&self) -> bool {
        self.outline.is_empty()
    }

    /// Count headings at a given level.
    pub fn count_level(&self, level: HeadingLevel) -> usize {
        self.outline.iter().filter(|e| e.level == level).count()
    }
}
