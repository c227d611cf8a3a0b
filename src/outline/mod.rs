//! Outline extraction pipeline.
//!
//! ```text
//! SpanSource → SpanCollector → FontProfile ┐
//!                            → TitleDetector ┤
//!                            → HeadingClassifier → DuplicateSuppressor
//!                            → order → assemble → DocumentOutline
//! ```
//!
//! Processing of one document is sequential; the only shared state is the
//! read-only rule set, so one [`OutlineExtractor`] can serve many threads.

mod assemble;
mod classifier;
mod collector;
mod deadline;
mod dedup;
mod font_stats;
mod options;
mod order;
mod title;

pub use assemble::assemble;
pub use classifier::{
    FontSizeRule, HeadingClassifier, HeadingRule, HeadingShape, KeywordRule, NumberingRule,
    RuleContext,
};
pub use collector::SpanCollector;
pub use deadline::Deadline;
pub use dedup::{similarity, DuplicateSuppressor};
pub use font_stats::{FontProfile, FontThresholds};
pub use options::{
    NumberingScheme, OutlineOptions, DEFAULT_SIMILARITY_THRESHOLD, DEFAULT_TITLE_SCAN_PAGES,
};
pub use order::{resolve_order, resolve_positions, sort_reading_order};
pub use title::{
    file_stem_title, DominantFontTitle, FileNameTitle, MetadataTitle, TitleCasedLine,
    TitleContext, TitleDetector, TitleStrategy, UNTITLED,
};

use crate::error::Result;
use crate::model::{DocumentOutline, TextSpan};
use crate::parser::SpanSource;

/// Outline plus the intermediate facts it was derived from.
#[derive(Debug, Clone)]
pub struct OutlineReport {
    pub outline: DocumentOutline,
    pub profile: FontProfile,
    /// Spans that survived collection
    pub span_count: usize,
    /// Headings before duplicate suppression
    pub candidate_count: usize,
}

/// Runs the full pipeline on one document at a time.
pub struct OutlineExtractor {
    options: OutlineOptions,
    collector: SpanCollector,
    title_detector: TitleDetector,
    classifier: HeadingClassifier,
}

impl OutlineExtractor {
    /// Create an extractor with the given options.
    pub fn new(options: OutlineOptions) -> Self {
        Self {
            collector: SpanCollector::new(options.normalize_text),
            title_detector: TitleDetector::new(&options),
            classifier: HeadingClassifier::new(&options),
            options,
        }
    }

    /// Get the options.
    pub fn options(&self) -> &OutlineOptions {
        &self.options
    }

    /// The heading classifier, for adding or replacing rules.
    pub fn classifier_mut(&mut self) -> &mut HeadingClassifier {
        &mut self.classifier
    }

    /// The title detector, for adding strategies.
    pub fn title_detector_mut(&mut self) -> &mut TitleDetector {
        &mut self.title_detector
    }

    /// Extract the outline of `source`. `file_name` feeds the title fallback.
    pub fn extract<S: SpanSource + ?Sized>(
        &self,
        source: &S,
        file_name: &str,
    ) -> Result<DocumentOutline> {
        self.extract_report(source, file_name).map(|r| r.outline)
    }

    /// Extract the outline along with font statistics and counts.
    pub fn extract_report<S: SpanSource + ?Sized>(
        &self,
        source: &S,
        file_name: &str,
    ) -> Result<OutlineReport> {
        let deadline = Deadline::start(self.options.deadline);
        let spans = self.collector.collect(source)?;
        log::debug!("Collected {} spans from {}", spans.len(), file_name);

        self.process_spans(
            &spans,
            source.page_count(),
            source.metadata_title().as_deref(),
            file_name,
            &deadline,
        )
    }

    /// Run the pipeline on spans that were already collected.
    pub fn extract_from_spans(
        &self,
        spans: &[TextSpan],
        total_pages: u32,
        metadata_title: Option<&str>,
        file_name: &str,
    ) -> Result<DocumentOutline> {
        let deadline = Deadline::start(self.options.deadline);
        self.process_spans(spans, total_pages, metadata_title, file_name, &deadline)
            .map(|r| r.outline)
    }

    fn process_spans(
        &self,
        spans: &[TextSpan],
        total_pages: u32,
        metadata_title: Option<&str>,
        file_name: &str,
        deadline: &Deadline,
    ) -> Result<OutlineReport> {
        let profile = FontProfile::from_spans(spans);
        log::debug!("Font sizes found: {:?}", profile.sizes());

        let title = self
            .title_detector
            .detect(spans, metadata_title, file_name);

        let ctx = RuleContext {
            thresholds: profile.thresholds(),
        };
        if let Some(t) = ctx.thresholds {
            log::debug!(
                "Calculated thresholds: H1={:.1}, H2={:.1}, H3={:.1}",
                t.h1,
                t.h2,
                t.h3
            );
        }

        let candidates = self.classifier.classify_spans(spans, &ctx, deadline)?;
        let candidate_count = candidates.len();

        let accepted = DuplicateSuppressor::new(self.options.similarity_threshold)
            .suppress(candidates, deadline)?;
        let ordered = resolve_order(accepted, spans);
        let outline = assemble(title, ordered, total_pages);

        log::info!(
            "{}: {} pages, {} headings ({} candidates) in {:?}",
            file_name,
            total_pages,
            outline.outline.len(),
            candidate_count,
            deadline.elapsed()
        );

        Ok(OutlineReport {
            outline,
            profile,
            span_count: spans.len(),
            candidate_count,
        })
    }
}

impl Default for OutlineExtractor {
    fn default() -> Self {
        Self::new(OutlineOptions::default())
    }
}
