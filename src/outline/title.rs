//! Title detection.
//!
//! A [`TitleDetector`] runs an ordered list of [`TitleStrategy`] values and
//! takes the first answer. The file-name fallback always answers, so the
//! detected title is never empty.

use std::path::Path;

use regex::Regex;

use crate::model::TextSpan;

use super::options::OutlineOptions;

/// Title used when even the file name has no stem.
pub const UNTITLED: &str = "untitled";

/// Everything a strategy may look at.
#[derive(Debug, Clone, Copy)]
pub struct TitleContext<'a> {
    /// Spans from the leading pages only
    pub spans: &'a [TextSpan],
    /// Title from the document metadata
    pub metadata_title: Option<&'a str>,
    /// File name of the document, with extension
    pub file_name: &'a str,
}

/// One way of finding a title.
pub trait TitleStrategy: Send + Sync {
    /// Short name for diagnostics.
    fn name(&self) -> &'static str;

    /// Propose a title, or `None` to defer to the next strategy.
    fn detect(&self, ctx: &TitleContext<'_>) -> Option<String>;
}

/// Metadata title, when present and not blank.
#[derive(Debug, Default)]
pub struct MetadataTitle;

impl TitleStrategy for MetadataTitle {
    fn name(&self) -> &'static str {
        "metadata"
    }

    fn detect(&self, ctx: &TitleContext<'_>) -> Option<String> {
        ctx.metadata_title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    }
}

/// Topmost reasonable span set in (close to) the largest font.
pub struct DominantFontTitle {
    boilerplate: Regex,
    page_marker: Regex,
}

impl DominantFontTitle {
    pub fn new() -> Self {
        Self {
            boilerplate: Regex::new(
                r"(?i)^(Copyright|Version|Table\s+of\s+Contents|Abstract|Preface|Appendix|Index|Glossary|Executive\s+Summary)",
            )
            .unwrap(),
            page_marker: Regex::new(r"(?i)^\d+$|^Page\s+\d+").unwrap(),
        }
    }
}

impl Default for DominantFontTitle {
    fn default() -> Self {
        Self::new()
    }
}

impl TitleStrategy for DominantFontTitle {
    fn name(&self) -> &'static str {
        "dominant-font"
    }

    fn detect(&self, ctx: &TitleContext<'_>) -> Option<String> {
        let max_size = ctx.spans.iter().map(|s| s.size).reduce(f32::max)?;

        let mut candidates: Vec<&TextSpan> = ctx
            .spans
            .iter()
            .filter(|s| crate::model::is_close(s.size, max_size, 0.05))
            .filter(|s| {
                let len = s.char_len();
                len > 5 && len < 100
            })
            .filter(|s| !self.page_marker.is_match(&s.text))
            .filter(|s| !self.boilerplate.is_match(&s.text))
            .collect();

        candidates.sort_by(|a, b| a.top().total_cmp(&b.top()));
        candidates.first().map(|s| s.text.clone())
    }
}

/// Topmost line that looks like a title: capitalized and of moderate length.
pub struct TitleCasedLine {
    excluded: Regex,
}

impl TitleCasedLine {
    pub fn new() -> Self {
        Self {
            excluded: Regex::new(r"(?i)^(Copyright|Version|Page|Table)").unwrap(),
        }
    }
}

impl Default for TitleCasedLine {
    fn default() -> Self {
        Self::new()
    }
}

impl TitleStrategy for TitleCasedLine {
    fn name(&self) -> &'static str {
        "title-cased-line"
    }

    fn detect(&self, ctx: &TitleContext<'_>) -> Option<String> {
        let mut candidates: Vec<&TextSpan> = ctx
            .spans
            .iter()
            .filter(|s| {
                let len = s.char_len();
                len > 10 && len < 80
            })
            .filter(|s| s.text.chars().next().is_some_and(char::is_uppercase))
            .filter(|s| !self.excluded.is_match(&s.text))
            .collect();

        candidates.sort_by(|a, b| a.top().total_cmp(&b.top()));
        candidates.first().map(|s| s.text.clone())
    }
}

/// The file name without its extension.
#[derive(Debug, Default)]
pub struct FileNameTitle;

impl TitleStrategy for FileNameTitle {
    fn name(&self) -> &'static str {
        "file-name"
    }

    fn detect(&self, ctx: &TitleContext<'_>) -> Option<String> {
        Some(file_stem_title(ctx.file_name))
    }
}

/// File stem of `file_name`, or [`UNTITLED`] when there is none.
pub fn file_stem_title(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| UNTITLED.to_string())
}

/// Runs title strategies in order.
pub struct TitleDetector {
    strategies: Vec<Box<dyn TitleStrategy>>,
    scan_pages: u32,
}

impl TitleDetector {
    /// Strategies selected by the options: metadata (if preferred), dominant
    /// font, title-cased line.
    pub fn new(options: &OutlineOptions) -> Self {
        let mut strategies: Vec<Box<dyn TitleStrategy>> = Vec::new();
        if options.prefer_metadata_title {
            strategies.push(Box::new(MetadataTitle));
        }
        strategies.push(Box::new(DominantFontTitle::new()));
        strategies.push(Box::new(TitleCasedLine::new()));

        Self {
            strategies,
            scan_pages: options.title_scan_pages,
        }
    }

    /// Detector with an explicit strategy list.
    pub fn with_strategies(strategies: Vec<Box<dyn TitleStrategy>>, scan_pages: u32) -> Self {
        Self {
            strategies,
            scan_pages,
        }
    }

    /// Append a strategy, tried after the existing ones.
    pub fn push(&mut self, strategy: Box<dyn TitleStrategy>) {
        self.strategies.push(strategy);
    }

    /// Detect a title. Falls back to the file stem, so never empty.
    pub fn detect(
        &self,
        spans: &[TextSpan],
        metadata_title: Option<&str>,
        file_name: &str,
    ) -> String {
        // Collected spans are page ordered, so the scope is a prefix.
        let scope_end = spans
            .iter()
            .position(|s| s.page > self.scan_pages)
            .unwrap_or(spans.len());

        let ctx = TitleContext {
            spans: &spans[..scope_end],
            metadata_title,
            file_name,
        };

        for strategy in &self.strategies {
            if let Some(title) = strategy.detect(&ctx) {
                if !title.trim().is_empty() {
                    log::debug!("Title from {} strategy: {:?}", strategy.name(), title);
                    return title;
                }
            }
        }

        let title = file_stem_title(file_name);
        log::debug!("Title from file name: {:?}", title);
        title
    }
}
