//! Font statistics used for size-relative heading thresholds.

use std::collections::BTreeSet;

use crate::model::{HeadingLevel, TextSpan};

/// Distinct font sizes of a document.
///
/// Sizes are kept in tenths of a point, which matches the rounding applied
/// by the collector, so equality is exact.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FontProfile {
    sizes: Vec<f32>,
}

impl FontProfile {
    /// Build a profile from collected spans.
    pub fn from_spans(spans: &[TextSpan]) -> Self {
        Self::from_sizes(spans.iter().map(|s| s.size))
    }

    /// Build a profile from arbitrary sizes.
    pub fn from_sizes(sizes: impl IntoIterator<Item = f32>) -> Self {
        let tenths: BTreeSet<i64> = sizes
            .into_iter()
            .filter(|s| s.is_finite())
            .map(|s| (s * 10.0).round() as i64)
            .collect();

        Self {
            sizes: tenths.into_iter().rev().map(|t| t as f32 / 10.0).collect(),
        }
    }

    /// Distinct sizes, largest first.
    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    /// Whether no sizes were seen.
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Unweighted mean of the distinct sizes.
    pub fn average(&self) -> Option<f32> {
        if self.sizes.is_empty() {
            return None;
        }
        Some(self.sizes.iter().sum::<f32>() / self.sizes.len() as f32)
    }

    /// Largest size.
    pub fn max(&self) -> Option<f32> {
        self.sizes.first().copied()
    }

    /// Heading thresholds derived from this profile.
    pub fn thresholds(&self) -> Option<FontThresholds> {
        let max = self.max()?;
        let avg = self.average()?;
        Some(FontThresholds {
            h1: max * 0.85,
            h2: avg * 1.2,
            h3: avg * 1.1,
        })
    }
}

/// Minimum sizes for each heading level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontThresholds {
    pub h1: f32,
    pub h2: f32,
    pub h3: f32,
}

impl FontThresholds {
    /// Level for a span of the given size and character length, if any.
    ///
    /// Each level also bounds the text length (exclusive): H1 (5, 100),
    /// H2 (5, 80), H3 (5, 60).
    pub fn level_for(&self, size: f32, len: usize) -> Option<HeadingLevel> {
        if size >= self.h1 && len > 5 && len < 100 {
            Some(HeadingLevel::H1)
        } else if size >= self.h2 && len > 5 && len < 80 {
            Some(HeadingLevel::H2)
        } else if size >= self.h3 && len > 5 && len < 60 {
            Some(HeadingLevel::H3)
        } else {
            None
        }
    }
}
