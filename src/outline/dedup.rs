//! Near-duplicate suppression for heading texts.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::model::HeadingCandidate;

use super::deadline::Deadline;
use super::options::DEFAULT_SIMILARITY_THRESHOLD;

/// Case-insensitive Levenshtein similarity in `[0, 1]`.
///
/// `1 - distance / max_len`, and `1.0` when both strings are empty.
///
/// # Example
/// ```
/// use pdfoutline::outline::similarity;
///
/// assert_eq!(similarity("Table of Contents", "table of contents"), 1.0);
/// assert_eq!(similarity("abc", "xyz"), 0.0);
/// ```
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();
    similarity_chars(&a, &b)
}

fn similarity_chars(a: &[char], b: &[char]) -> f64 {
    let max_len = a.len().max(b.len());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / max_len as f64
}

/// Edit distance with unit costs, two-row table.
fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Remembers accepted headings and rejects near-duplicates of them.
///
/// Accepted texts are bucketed by length. Because the edit distance is at
/// least the length difference, a text of length `n` can only exceed
/// threshold `t` against lengths in `(t·n, n/t)`; other buckets are skipped.
#[derive(Debug, Clone)]
pub struct DuplicateSuppressor {
    threshold: f64,
    accepted: BTreeMap<usize, Vec<Vec<char>>>,
}

impl DuplicateSuppressor {
    /// Create a suppressor; texts with similarity above `threshold` are
    /// duplicates. The threshold is clamped to `[0, 1]`, NaN falls back to
    /// the default.
    pub fn new(threshold: f64) -> Self {
        let threshold = if threshold.is_nan() {
            DEFAULT_SIMILARITY_THRESHOLD
        } else {
            threshold.clamp(0.0, 1.0)
        };
        Self {
            threshold,
            accepted: BTreeMap::new(),
        }
    }

    /// Number of accepted texts.
    pub fn len(&self) -> usize {
        self.accepted.values().map(Vec::len).sum()
    }

    /// Whether nothing was accepted yet.
    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }

    /// Whether `text` is too similar to an accepted text.
    pub fn is_duplicate(&self, text: &str) -> bool {
        let chars: Vec<char> = text.to_lowercase().chars().collect();
        self.is_duplicate_chars(&chars)
    }

    /// Accept `text` unless it is a duplicate. Returns whether it was accepted.
    pub fn admit(&mut self, text: &str) -> bool {
        let chars: Vec<char> = text.to_lowercase().chars().collect();
        if self.is_duplicate_chars(&chars) {
            return false;
        }
        self.accepted.entry(chars.len()).or_default().push(chars);
        true
    }

    fn is_duplicate_chars(&self, chars: &[char]) -> bool {
        let n = chars.len();
        let (lo, hi) = self.length_band(n);
        self.accepted
            .range(lo..=hi)
            .flat_map(|(_, texts)| texts)
            .any(|other| similarity_chars(other, chars) > self.threshold)
    }

    /// Inclusive range of lengths that could exceed the threshold.
    fn length_band(&self, n: usize) -> (usize, usize) {
        if self.threshold <= 0.0 {
            return (0, usize::MAX);
        }
        let lo = (self.threshold * n as f64).floor() as usize;
        let hi = (n as f64 / self.threshold).ceil() as usize;
        (lo.min(n), hi.max(n))
    }

    /// Keep candidates in order, dropping near-duplicates of earlier ones.
    pub fn suppress(
        &mut self,
        candidates: Vec<HeadingCandidate>,
        deadline: &Deadline,
    ) -> Result<Vec<HeadingCandidate>> {
        let mut kept = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            deadline.check("suppressing duplicate headings")?;
            if self.admit(&candidate.text) {
                kept.push(candidate);
            } else {
                log::debug!("Dropping near-duplicate heading {:?}", candidate.text);
            }
        }
        Ok(kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HeadingLevel;

    #[test]
    fn test_similarity_examples() {
        assert_eq!(similarity("Table of Contents", "table of contents"), 1.0);
        assert_eq!(similarity("abc", "xyz"), 0.0);
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("", "abc"), 0.0);
        assert!((similarity("kitten", "sitting") - (1.0 - 3.0 / 7.0)).abs() < 1e-12);
    }

    #[test]
    fn test_levenshtein() {
        let chars = |s: &str| s.chars().collect::<Vec<_>>();
        assert_eq!(levenshtein(&chars("flaw"), &chars("lawn")), 2);
        assert_eq!(levenshtein(&chars("résumé"), &chars("resume")), 2);
        assert_eq!(levenshtein(&chars(""), &chars("abc")), 3);
    }

    #[test]
    fn test_threshold_out_of_range() {
        let mut above = DuplicateSuppressor::new(1.2);
        assert!(above.admit("Overview"));
        // nothing is more similar than identical
        assert!(above.admit("Overview"));
        assert!(above.admit("Summary"));
        assert_eq!(above.len(), 3);

        let mut below = DuplicateSuppressor::new(-0.5);
        assert!(below.admit("Overview"));
        assert!(!below.admit("Overview Two"));

        let mut nan = DuplicateSuppressor::new(f64::NAN);
        assert!(nan.admit("Project Background"));
        assert!(!nan.admit("Project Backgrounds"));
    }

    #[test]
    fn test_admit_rejects_near_duplicates() {
        let mut suppressor = DuplicateSuppressor::new(0.85);
        assert!(suppressor.admit("Project Background"));
        // one edit in 18 chars: 0.944
        assert!(!suppressor.admit("Project Backgrounds"));
        assert!(!suppressor.admit("PROJECT BACKGROUND"));
        assert!(suppressor.admit("Project Budget"));
        assert_eq!(suppressor.len(), 2);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        // one edit in two chars: exactly 0.5, not a duplicate
        let mut suppressor = DuplicateSuppressor::new(0.5);
        assert!(suppressor.admit("ab"));
        assert!(suppressor.admit("ax"));
        assert!(!suppressor.admit("AB"));
    }

    #[test]
    fn test_band_pruning_matches_exhaustive_scan() {
        let texts = [
            "Introduction",
            "Introductions",
            "Intro",
            "Methodology",
            "Methodologies",
            "Results and Discussion",
            "Result and Discussion",
            "Appendix A",
            "Appendix B",
            "Summary",
            "Summaries",
            "A",
            "",
        ];

        let mut suppressor = DuplicateSuppressor::new(0.85);
        let mut exhaustive: Vec<&str> = Vec::new();
        for text in texts {
            let expected = !exhaustive.iter().any(|e| similarity(e, text) > 0.85);
            if expected {
                exhaustive.push(text);
            }
            assert_eq!(suppressor.admit(text), expected, "{:?}", text);
        }
    }

    #[test]
    fn test_suppress_keeps_order() {
        let candidates = vec![
            HeadingCandidate::new(HeadingLevel::H1, "Overview", 1, 18.0),
            HeadingCandidate::new(HeadingLevel::H2, "Scope", 1, 14.0),
            HeadingCandidate::new(HeadingLevel::H1, "overview", 2, 18.0),
        ];
        let kept = DuplicateSuppressor::new(0.85)
            .suppress(candidates, &Deadline::unbounded())
            .unwrap();
        let texts: Vec<&str> = kept.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["Overview", "Scope"]);
    }
}
