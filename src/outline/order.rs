//! Reading-order reconstruction for accepted headings.

use std::collections::HashMap;

use crate::model::{is_close, HeadingCandidate, TextSpan};

/// Relative size tolerance when matching a heading back to its span.
const SIZE_TOLERANCE: f32 = 0.01;

/// Fill in each candidate's `y0` from the spans it came from.
///
/// A candidate takes the position of the first span with the same text, the
/// same page and a size within 1%; without a match it sits at the top (0).
pub fn resolve_positions(candidates: &mut [HeadingCandidate], spans: &[TextSpan]) {
    let mut by_page: HashMap<u32, Vec<&TextSpan>> = HashMap::new();
    for span in spans {
        by_page.entry(span.page).or_default().push(span);
    }

    for candidate in candidates.iter_mut() {
        let y0 = by_page
            .get(&candidate.page)
            .and_then(|page_spans| {
                page_spans.iter().find(|s| {
                    s.text == candidate.text
                        && is_close(s.size, candidate.font_size, SIZE_TOLERANCE)
                })
            })
            .map(|s| s.top())
            .unwrap_or(0.0);
        candidate.y0 = Some(y0);
    }
}

/// Stable sort by (page, y0).
pub fn sort_reading_order(candidates: &mut [HeadingCandidate]) {
    candidates.sort_by(|a, b| {
        let (pa, ya) = a.position();
        let (pb, yb) = b.position();
        pa.cmp(&pb).then(ya.total_cmp(&yb))
    });
}

/// Resolve positions, then sort.
pub fn resolve_order(
    mut candidates: Vec<HeadingCandidate>,
    spans: &[TextSpan],
) -> Vec<HeadingCandidate> {
    resolve_positions(&mut candidates, spans);
    sort_reading_order(&mut candidates);
    candidates
}
