//! Output assembly.

use crate::model::{DocumentOutline, HeadingCandidate, OutlineEntry};

/// Package the title and ordered headings, dropping internal fields.
pub fn assemble(
    title: String,
    headings: Vec<HeadingCandidate>,
    total_pages: u32,
) -> DocumentOutline {
    DocumentOutline {
        title,
        outline: headings.into_iter().map(OutlineEntry::from).collect(),
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HeadingLevel;

    #[test]
    fn test_assemble() {
        let mut heading = HeadingCandidate::new(HeadingLevel::H1, "Overview", 1, 18.0);
        heading.y0 = Some(90.0);

        let outline = assemble("Plan".to_string(), vec![heading], 7);
        assert_eq!(outline.title, "Plan");
        assert_eq!(outline.total_pages, 7);
        assert_eq!(
            outline.outline,
            vec![OutlineEntry {
                level: HeadingLevel::H1,
                text: "Overview".to_string(),
                page: 1,
            }]
        );
    }
}
