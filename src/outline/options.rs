//! Outline extraction options.

use std::time::Duration;

/// Similarity above which a heading counts as a near-duplicate.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.85;

/// Number of leading pages scanned for the title.
pub const DEFAULT_TITLE_SCAN_PAGES: u32 = 3;

/// How numbered headings such as "2.1 Scope" are leveled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberingScheme {
    /// Level follows the number of components: "1." is H1, "1.1" is H2,
    /// "1.1.1" and deeper are H3.
    #[default]
    Depth,
    /// Only two-component numbers with a trailing dot ("1.2. Title") match,
    /// and they are always H2.
    Legacy,
    /// Numbered headings are not recognized.
    Off,
}

/// Options for the outline pipeline.
#[derive(Debug, Clone)]
pub struct OutlineOptions {
    /// How section numbers map to levels
    pub numbering: NumberingScheme,

    /// Use the document's metadata title when it is present
    pub prefer_metadata_title: bool,

    /// Near-duplicate threshold for heading texts (exclusive)
    pub similarity_threshold: f64,

    /// Pages scanned when looking for the title
    pub title_scan_pages: u32,

    /// Apply NFC normalization and ligature expansion to span text
    pub normalize_text: bool,

    /// Time budget for a single document
    pub deadline: Option<Duration>,
}

impl OutlineOptions {
    /// Create new outline options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the numbering scheme.
    pub fn with_numbering(mut self, numbering: NumberingScheme) -> Self {
        self.numbering = numbering;
        self
    }

    /// Prefer the metadata title over layout heuristics.
    pub fn prefer_metadata_title(mut self, prefer: bool) -> Self {
        self.prefer_metadata_title = prefer;
        self
    }

    /// Set the near-duplicate threshold, clamped to `[0, 1]`.
    pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Set how many leading pages are scanned for the title.
    pub fn with_title_scan_pages(mut self, pages: u32) -> Self {
        self.title_scan_pages = pages.max(1);
        self
    }

    /// Enable or disable text normalization.
    pub fn with_normalize_text(mut self, normalize: bool) -> Self {
        self.normalize_text = normalize;
        self
    }

    /// Set a per-document deadline.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Remove the per-document deadline.
    pub fn without_deadline(mut self) -> Self {
        self.deadline = None;
        self
    }
}

impl Default for OutlineOptions {
    fn default() -> Self {
        Self {
            numbering: NumberingScheme::Depth,
            prefer_metadata_title: false,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            title_scan_pages: DEFAULT_TITLE_SCAN_PAGES,
            normalize_text: true,
            deadline: None,
        }
    }
}
