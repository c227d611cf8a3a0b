//! Integration tests for outline extraction over in-memory documents.

use pdfoutline::model::BoundingBox;
use pdfoutline::{
    similarity, to_json, DocumentOutline, HeadingLevel, JsonFormat, MemoryDocument,
    NumberingScheme, OutlineEntry, OutlineExtractor, OutlineOptions, Outliner, RawSpan,
};

fn entry(level: HeadingLevel, text: &str, page: u32) -> OutlineEntry {
    OutlineEntry {
        level,
        text: text.to_string(),
        page,
    }
}

/// Two-page report with a running header repeated on page 2.
fn annual_report() -> MemoryDocument {
    MemoryDocument::new()
        .span("Annual Report 2024", 24.0)
        .span("Introduction", 12.0)
        .span("This report covers the fiscal year in detail.", 10.0)
        .span("42", 16.0)
        .span("1.1. Background", 12.0)
        .page()
        .span("ANNUAL REPORT 2024", 24.0)
        .span("2. Methods", 14.0)
        .span("2.1 Data Sources", 12.0)
        .span("Figures were drawn from audited ledgers.", 10.0)
        .span("2.1.3 Sampling frame", 11.0)
}

fn extract(doc: &MemoryDocument) -> DocumentOutline {
    OutlineExtractor::default().extract(doc, "report.pdf").unwrap()
}

#[test]
fn test_annual_report_outline() {
    let outline = extract(&annual_report());

    assert_eq!(outline.title, "Annual Report 2024");
    assert_eq!(outline.total_pages, 2);
    assert_eq!(
        outline.outline,
        vec![
            entry(HeadingLevel::H1, "Annual Report 2024", 1),
            entry(HeadingLevel::H1, "Introduction", 1),
            entry(HeadingLevel::H2, "1.1. Background", 1),
            entry(HeadingLevel::H1, "2. Methods", 2),
            entry(HeadingLevel::H2, "2.1 Data Sources", 2),
            entry(HeadingLevel::H3, "2.1.3 Sampling frame", 2),
        ]
    );
}

#[test]
fn test_bare_numbers_never_headings() {
    let outline = extract(&annual_report());
    assert!(outline.outline.iter().all(|e| e.text != "42"));
}

#[test]
fn test_outline_in_reading_order() {
    let doc = MemoryDocument::new()
        .raw_span(RawSpan::new(
            "Conclusion",
            12.0,
            "Helvetica",
            BoundingBox::new(72.0, 600.0, 300.0, 612.0),
        ))
        .raw_span(RawSpan::new(
            "Introduction",
            12.0,
            "Helvetica",
            BoundingBox::new(72.0, 100.0, 300.0, 112.0),
        ))
        .page()
        .span("Appendix", 12.0);

    let outline = extract(&doc);
    let texts: Vec<&str> = outline.outline.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, vec!["Introduction", "Conclusion", "Appendix"]);

    let pages: Vec<u32> = outline.outline.iter().map(|e| e.page).collect();
    assert!(pages.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_no_near_duplicates_survive() {
    let doc = MemoryDocument::new()
        .span("Overview", 12.0)
        .span("Overview.", 12.0)
        .page()
        .span("OVERVIEW", 12.0)
        .span("Summary", 12.0)
        .span("Summaries", 12.0);

    let outline = extract(&doc);
    for (i, a) in outline.outline.iter().enumerate() {
        for b in &outline.outline[i + 1..] {
            assert!(
                similarity(&a.text, &b.text) <= 0.85,
                "{:?} and {:?} are near-duplicates",
                a.text,
                b.text
            );
        }
    }
    assert_eq!(outline.outline[0], entry(HeadingLevel::H1, "Overview", 1));
}

#[test]
fn test_similarity_examples() {
    assert_eq!(similarity("Introduction", "introduction"), 1.0);
    assert_eq!(similarity("", ""), 1.0);
    assert_eq!(similarity("abc", ""), 0.0);
    // one insertion over eleven characters
    assert!((similarity("Background", "Backgrounds") - 10.0 / 11.0).abs() < 1e-9);
}

#[test]
fn test_numbering_schemes() {
    let doc = MemoryDocument::new()
        .span("Fleet Management Plan", 20.0)
        .span("3. Scope", 10.0)
        .span("3.1. Assets", 10.0)
        .span("3.1.2 Vehicles", 10.0)
        .span("Body text in the same size.", 10.0);

    let depth = extract(&doc);
    assert_eq!(
        depth.outline,
        vec![
            entry(HeadingLevel::H1, "Fleet Management Plan", 1),
            entry(HeadingLevel::H1, "3. Scope", 1),
            entry(HeadingLevel::H2, "3.1. Assets", 1),
            entry(HeadingLevel::H3, "3.1.2 Vehicles", 1),
        ]
    );

    let legacy = OutlineExtractor::new(OutlineOptions::new().with_numbering(NumberingScheme::Legacy))
        .extract(&doc, "scope.pdf")
        .unwrap();
    assert_eq!(
        legacy.outline,
        vec![
            entry(HeadingLevel::H1, "Fleet Management Plan", 1),
            entry(HeadingLevel::H2, "3.1. Assets", 1),
        ]
    );

    let off = OutlineExtractor::new(OutlineOptions::new().with_numbering(NumberingScheme::Off))
        .extract(&doc, "scope.pdf")
        .unwrap();
    assert_eq!(
        off.outline,
        vec![entry(HeadingLevel::H1, "Fleet Management Plan", 1)]
    );
}

#[test]
fn test_shape_filter_rejects_lowercase_and_symbols() {
    let doc = MemoryDocument::new()
        .span("Evaluation Report", 20.0)
        .span("introduction to the topic", 10.0)
        .span("Results: 50% better", 10.0)
        .span("Chapter 4 Evaluation", 10.0)
        .span("Plain body line", 10.0);

    let outline = extract(&doc);
    assert_eq!(
        outline.outline,
        vec![
            entry(HeadingLevel::H1, "Evaluation Report", 1),
            entry(HeadingLevel::H1, "Chapter 4 Evaluation", 1),
        ]
    );
}

#[test]
fn test_title_never_empty() {
    let empty = MemoryDocument::new().page();
    assert_eq!(extract(&empty).title, "report");

    let outline = OutlineExtractor::default().extract(&empty, "").unwrap();
    assert_eq!(outline.title, "untitled");
}

#[test]
fn test_metadata_title_preference() {
    let doc = annual_report().with_metadata_title("FY2024 Report");

    assert_eq!(extract(&doc).title, "Annual Report 2024");

    let preferred = Outliner::new()
        .prefer_metadata_title()
        .extract_source(&doc, "report.pdf")
        .unwrap();
    assert_eq!(preferred.title, "FY2024 Report");
}

#[test]
fn test_title_only_from_leading_pages() {
    let doc = MemoryDocument::new()
        .span("short", 10.0)
        .page()
        .page()
        .page()
        .span("A Late Large Heading Line", 30.0);

    let outline = extract(&doc);
    assert_eq!(outline.title, "report");
    assert_eq!(outline.total_pages, 4);
}

#[test]
fn test_rerun_is_byte_identical() {
    let doc = annual_report();
    let extractor = OutlineExtractor::default();

    let first = to_json(&extractor.extract(&doc, "report.pdf").unwrap(), JsonFormat::Pretty).unwrap();
    let second =
        to_json(&extractor.extract(&doc, "report.pdf").unwrap(), JsonFormat::Pretty).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_ligatures_normalized() {
    let doc = MemoryDocument::new()
        .span("\u{FB01}nancial Overview", 12.0)
        .span("Overview of \u{FB02}ows", 10.0);

    let report = OutlineExtractor::default()
        .extract_report(&doc, "fin.pdf")
        .unwrap();
    assert_eq!(report.outline.title, "financial Overview");
    assert_eq!(report.span_count, 2);
}
