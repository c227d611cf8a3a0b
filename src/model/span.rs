//! Text span types shared by the access layer and the outline pipeline.

use serde::{Deserialize, Serialize};

/// Axis-aligned box in page space with the origin at the top-left corner.
///
/// `y0` is the top edge and grows downward, so a smaller `y0` is higher on
/// the page.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Box height.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

/// A span exactly as reported by a [`SpanSource`](crate::parser::SpanSource):
/// untrimmed text and unrounded font size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSpan {
    /// Text content
    pub text: String,
    /// Font size in points
    pub size: f32,
    /// Font name (e.g., "Helvetica-Bold")
    pub font_name: String,
    /// Position on the page
    pub bbox: BoundingBox,
}

impl RawSpan {
    /// Create a new raw span.
    pub fn new(
        text: impl Into<String>,
        size: f32,
        font_name: impl Into<String>,
        bbox: BoundingBox,
    ) -> Self {
        Self {
            text: text.into(),
            size,
            font_name: font_name.into(),
            bbox,
        }
    }
}

/// A collected span: trimmed text, size rounded to one decimal, page attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSpan {
    pub text: String,
    pub size: f32,
    /// 1-based page number
    pub page: u32,
    pub font_name: String,
    pub bbox: BoundingBox,
}

impl TextSpan {
    /// Top-of-box vertical coordinate.
    pub fn top(&self) -> f32 {
        self.bbox.y0
    }

    /// Text length in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Round a font size to one decimal place.
pub fn round_size(size: f32) -> f32 {
    (size * 10.0).round() / 10.0
}

/// Relative closeness test: `|a - b| <= rel_tol * max(|a|, |b|)`.
pub fn is_close(a: f32, b: f32, rel_tol: f32) -> bool {
    (a - b).abs() <= rel_tol * a.abs().max(b.abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_size() {
        assert_eq!(round_size(11.96), 12.0);
        assert_eq!(round_size(9.04), 9.0);
        assert_eq!(round_size(14.25), 14.3);
    }

    #[test]
    fn test_is_close() {
        assert!(is_close(24.0, 23.0, 0.05));
        assert!(!is_close(24.0, 22.0, 0.05));
        assert!(is_close(0.0, 0.0, 0.01));
    }

    #[test]
    fn test_char_len_counts_chars() {
        let span = TextSpan {
            text: "Résumé".to_string(),
            size: 12.0,
            page: 1,
            font_name: "Times".to_string(),
            bbox: BoundingBox::default(),
        };
        assert_eq!(span.char_len(), 6);
        assert_eq!(span.text.len(), 8);
    }
}
