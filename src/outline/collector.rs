//! Span collection: raw spans in, trimmed and rounded spans out.

use unicode_normalization::UnicodeNormalization;

use crate::error::Result;
use crate::model::{round_size, RawSpan, TextSpan};
use crate::parser::SpanSource;

/// Collects spans from every page of a [`SpanSource`].
pub struct SpanCollector {
    normalize: bool,
    ligature_map: Vec<(&'static str, &'static str)>,
}

impl SpanCollector {
    /// Create a collector; `normalize` turns on NFC and ligature expansion.
    pub fn new(normalize: bool) -> Self {
        Self {
            normalize,
            ligature_map: vec![
                ("\u{FB00}", "ff"),  // ﬀ
                ("\u{FB01}", "fi"),  // ﬁ
                ("\u{FB02}", "fl"),  // ﬂ
                ("\u{FB03}", "ffi"), // ﬃ
                ("\u{FB04}", "ffl"), // ﬄ
                ("\u{FB05}", "st"),  // ﬅ (long s + t)
                ("\u{FB06}", "st"),  // ﬆ
            ],
        }
    }

    /// Collect all pages in order. Source errors are propagated.
    pub fn collect<S: SpanSource + ?Sized>(&self, source: &S) -> Result<Vec<TextSpan>> {
        let mut spans = Vec::new();
        for page in 1..=source.page_count() {
            let raw = source.spans_for_page(page)?;
            spans.extend(self.collect_page(page, raw));
        }
        Ok(spans)
    }

    /// Collect one page's spans, dropping those of one character or less.
    pub fn collect_page(&self, page: u32, raw: Vec<RawSpan>) -> Vec<TextSpan> {
        raw.into_iter()
            .filter_map(|span| {
                let text = self.clean(&span.text);
                if text.chars().count() <= 1 {
                    return None;
                }
                Some(TextSpan {
                    text,
                    size: round_size(span.size),
                    page,
                    font_name: span.font_name,
                    bbox: span.bbox,
                })
            })
            .collect()
    }

    fn clean(&self, text: &str) -> String {
        if !self.normalize {
            return text.trim().to_string();
        }

        let mut result: String = text.nfc().collect();
        for (ligature, replacement) in &self.ligature_map {
            if result.contains(ligature) {
                result = result.replace(ligature, replacement);
            }
        }
        result.trim().to_string()
    }
}

impl Default for SpanCollector {
    fn default() -> Self {
        Self::new(true)
    }
}
