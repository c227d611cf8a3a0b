//! Heading classification.
//!
//! Each span runs through a pre-filter, an ordered cascade of
//! [`HeadingRule`]s (first match wins) and a shape check on the text.

use regex::Regex;

use crate::error::Result;
use crate::model::{HeadingCandidate, HeadingLevel, TextSpan};

use super::deadline::Deadline;
use super::font_stats::FontThresholds;
use super::options::{NumberingScheme, OutlineOptions};

/// Per-document facts available to every rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleContext {
    /// Size thresholds, `None` for a document without text
    pub thresholds: Option<FontThresholds>,
}

/// One heading signal.
pub trait HeadingRule: Send + Sync {
    /// Name used to find or replace the rule.
    fn name(&self) -> &'static str;

    /// Level for this span, or `None` to defer to the next rule.
    fn classify(&self, span: &TextSpan, ctx: &RuleContext) -> Option<HeadingLevel>;
}

/// Section numbers such as "2.", "2.1" or "2.1.3".
pub struct NumberingRule {
    scheme: NumberingScheme,
    depth_pattern: Regex,
    legacy_pattern: Regex,
}

impl NumberingRule {
    pub fn new(scheme: NumberingScheme) -> Self {
        Self {
            scheme,
            depth_pattern: Regex::new(r"^(\d+(?:\.\d+)*)(\.?)\s+\S").unwrap(),
            legacy_pattern: Regex::new(r"^\d+\.\d+\.\s.+").unwrap(),
        }
    }

    /// Number of components in a leading section number.
    fn depth(&self, text: &str) -> Option<usize> {
        let caps = self.depth_pattern.captures(text)?;
        let number = caps.get(1)?.as_str();
        let trailing_dot = caps.get(2).is_some_and(|m| !m.as_str().is_empty());
        let depth = number.split('.').count();

        // A bare integer is only a section number with its dot: "3. Scope".
        if depth == 1 && !trailing_dot {
            return None;
        }
        Some(depth)
    }
}

impl HeadingRule for NumberingRule {
    fn name(&self) -> &'static str {
        "numbering"
    }

    fn classify(&self, span: &TextSpan, _ctx: &RuleContext) -> Option<HeadingLevel> {
        match self.scheme {
            NumberingScheme::Depth => self.depth(&span.text).map(HeadingLevel::from_depth),
            NumberingScheme::Legacy => self
                .legacy_pattern
                .is_match(&span.text)
                .then_some(HeadingLevel::H2),
            NumberingScheme::Off => None,
        }
    }
}

/// Structural words such as "Chapter 3" or "Introduction".
pub struct KeywordRule {
    numbered_division: Regex,
    section_name: Regex,
}

impl KeywordRule {
    pub fn new() -> Self {
        Self {
            numbered_division: Regex::new(r"(?i)^(Chapter|Section|Part)\s+\d+").unwrap(),
            section_name: Regex::new(
                r"(?i)^(Introduction|Overview|Conclusion|Summary|References|Bibliography|Acknowledge?ments?|Table\s+of\s+Contents|Abstract|Preface|Appendix|Index|Glossary|Executive\s+Summary|Background|Methodology|Results|Discussion|Recommendations)",
            )
            .unwrap(),
        }
    }
}

impl Default for KeywordRule {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadingRule for KeywordRule {
    fn name(&self) -> &'static str {
        "keyword"
    }

    fn classify(&self, span: &TextSpan, _ctx: &RuleContext) -> Option<HeadingLevel> {
        if self.numbered_division.is_match(&span.text) || self.section_name.is_match(&span.text) {
            Some(HeadingLevel::H1)
        } else {
            None
        }
    }
}

/// Size relative to the document's font profile.
#[derive(Debug, Default)]
pub struct FontSizeRule;

impl HeadingRule for FontSizeRule {
    fn name(&self) -> &'static str {
        "font-size"
    }

    fn classify(&self, span: &TextSpan, ctx: &RuleContext) -> Option<HeadingLevel> {
        ctx.thresholds?.level_for(span.size, span.char_len())
    }
}

/// Text-shape check applied to every classified span.
///
/// The text must start with an uppercase letter (after a leading section
/// number), use only letters, digits, whitespace and `: , - _ ( ) & . / [ ]`,
/// and stay under [`HeadingShape::MAX_LEN`] characters.
pub struct HeadingShape {
    section_prefix: Regex,
}

impl HeadingShape {
    pub const MAX_LEN: usize = 300;

    pub fn new() -> Self {
        Self {
            section_prefix: Regex::new(r"^\d+(?:\.\d+)*\.?\s+").unwrap(),
        }
    }

    pub fn accepts(&self, text: &str) -> bool {
        if text.chars().count() >= Self::MAX_LEN {
            return false;
        }

        let body = match self.section_prefix.find(text) {
            Some(prefix) => &text[prefix.end()..],
            None => text,
        };
        if !body.chars().next().is_some_and(char::is_uppercase) {
            return false;
        }

        text.chars().all(is_heading_char)
    }
}

impl Default for HeadingShape {
    fn default() -> Self {
        Self::new()
    }
}

fn is_heading_char(c: char) -> bool {
    c.is_alphabetic()
        || c.is_ascii_digit()
        || c.is_whitespace()
        || matches!(
            c,
            ':' | ',' | '-' | '_' | '(' | ')' | '&' | '.' | '/' | '[' | ']'
        )
}

/// Ordered rule cascade plus pre- and post-filters.
pub struct HeadingClassifier {
    rules: Vec<Box<dyn HeadingRule>>,
    shape: HeadingShape,
}

impl HeadingClassifier {
    /// The standard cascade: numbering, keyword, font size.
    pub fn new(options: &OutlineOptions) -> Self {
        Self::with_rules(vec![
            Box::new(NumberingRule::new(options.numbering)),
            Box::new(KeywordRule::new()),
            Box::new(FontSizeRule),
        ])
    }

    /// A classifier with an explicit rule list.
    pub fn with_rules(rules: Vec<Box<dyn HeadingRule>>) -> Self {
        Self {
            rules,
            shape: HeadingShape::new(),
        }
    }

    /// Append a rule at the end of the cascade.
    pub fn push_rule(&mut self, rule: Box<dyn HeadingRule>) {
        self.rules.push(rule);
    }

    /// Replace the rule with the same name, keeping its position.
    ///
    /// Returns `false` (and appends) if no rule had that name.
    pub fn replace_rule(&mut self, rule: Box<dyn HeadingRule>) -> bool {
        match self.rules.iter().position(|r| r.name() == rule.name()) {
            Some(idx) => {
                self.rules[idx] = rule;
                true
            }
            None => {
                self.rules.push(rule);
                false
            }
        }
    }

    /// Rule names in cascade order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Classify a single span.
    pub fn classify(&self, span: &TextSpan, ctx: &RuleContext) -> Option<HeadingLevel> {
        let text = span.text.as_str();
        if span.char_len() < 3 || text.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }

        let level = self.rules.iter().find_map(|rule| rule.classify(span, ctx))?;

        if self.shape.accepts(text) {
            Some(level)
        } else {
            None
        }
    }

    /// Classify every span in order, checking the deadline as it goes.
    pub fn classify_spans(
        &self,
        spans: &[TextSpan],
        ctx: &RuleContext,
        deadline: &Deadline,
    ) -> Result<Vec<HeadingCandidate>> {
        let mut candidates = Vec::new();
        for span in spans {
            deadline.check("classifying headings")?;
            if let Some(level) = self.classify(span, ctx) {
                candidates.push(HeadingCandidate::new(
                    level,
                    span.text.clone(),
                    span.page,
                    span.size,
                ));
            }
        }
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BoundingBox;

    fn span(text: &str, size: f32) -> TextSpan {
        TextSpan {
            text: text.to_string(),
            size,
            page: 1,
            font_name: "Helvetica".to_string(),
            bbox: BoundingBox::default(),
        }
    }

    fn ctx(h1: f32, h2: f32, h3: f32) -> RuleContext {
        RuleContext {
            thresholds: Some(FontThresholds { h1, h2, h3 }),
        }
    }

    fn default_classifier() -> HeadingClassifier {
        HeadingClassifier::new(&OutlineOptions::default())
    }

    #[test]
    fn test_numbering_depth() {
        let rule = NumberingRule::new(NumberingScheme::Depth);
        let none = RuleContext::default();

        assert_eq!(rule.classify(&span("1. Introduction", 10.0), &none), Some(HeadingLevel::H1));
        assert_eq!(rule.classify(&span("2.1 Scope", 10.0), &none), Some(HeadingLevel::H2));
        assert_eq!(rule.classify(&span("1.1. Background", 10.0), &none), Some(HeadingLevel::H2));
        assert_eq!(rule.classify(&span("3.2.1 Details", 10.0), &none), Some(HeadingLevel::H3));
        assert_eq!(rule.classify(&span("4.1.2.7. Deep", 10.0), &none), Some(HeadingLevel::H3));
        assert_eq!(rule.classify(&span("2024 Annual Report", 10.0), &none), None);
        assert_eq!(rule.classify(&span("1.1.Background", 10.0), &none), None);
    }

    #[test]
    fn test_numbering_legacy() {
        let rule = NumberingRule::new(NumberingScheme::Legacy);
        let none = RuleContext::default();

        assert_eq!(rule.classify(&span("1.1. Background", 10.0), &none), Some(HeadingLevel::H2));
        assert_eq!(rule.classify(&span("1. Introduction", 10.0), &none), None);
        assert_eq!(rule.classify(&span("2.1 Scope", 10.0), &none), None);
        assert_eq!(rule.classify(&span("3.2.1. Details", 10.0), &none), None);
    }

    #[test]
    fn test_numbering_off() {
        let rule = NumberingRule::new(NumberingScheme::Off);
        assert_eq!(rule.classify(&span("2.1 Scope", 10.0), &RuleContext::default()), None);
    }

    #[test]
    fn test_keywords() {
        let rule = KeywordRule::new();
        let none = RuleContext::default();

        for text in [
            "Introduction",
            "EXECUTIVE SUMMARY",
            "Table of  Contents",
            "Acknowledgements",
            "Chapter 7 Results",
            "part 2",
        ] {
            assert_eq!(rule.classify(&span(text, 10.0), &none), Some(HeadingLevel::H1), "{}", text);
        }
        assert_eq!(rule.classify(&span("Chapter Seven", 10.0), &none), None);
        assert_eq!(rule.classify(&span("The Introduction", 10.0), &none), None);
    }

    #[test]
    fn test_font_size_rule_needs_profile() {
        let rule = FontSizeRule;
        assert_eq!(rule.classify(&span("Large Heading", 30.0), &RuleContext::default()), None);
        assert_eq!(
            rule.classify(&span("Large Heading", 30.0), &ctx(20.0, 15.0, 12.0)),
            Some(HeadingLevel::H1)
        );
    }

    #[test]
    fn test_introduction_is_h1_regardless_of_size() {
        let classifier = default_classifier();
        assert_eq!(
            classifier.classify(&span("Introduction", 6.0), &ctx(40.0, 30.0, 20.0)),
            Some(HeadingLevel::H1)
        );
    }

    #[test]
    fn test_pre_filter() {
        let classifier = default_classifier();
        let big = ctx(1.0, 1.0, 1.0);
        assert_eq!(classifier.classify(&span("42", 50.0), &big), None);
        assert_eq!(classifier.classify(&span("2024", 50.0), &big), None);
        assert_eq!(classifier.classify(&span("Ab", 50.0), &big), None);
    }

    #[test]
    fn test_shape_filter() {
        let shape = HeadingShape::new();
        assert!(shape.accepts("Executive Summary"));
        assert!(shape.accepts("1.1. Background"));
        assert!(shape.accepts("Risks & Mitigations (2024)"));
        assert!(shape.accepts("Énergie Renouvelable"));
        assert!(!shape.accepts("lowercase start"));
        assert!(!shape.accepts("Revenue grew 12%"));
        assert!(!shape.accepts("What next?"));
        assert!(!shape.accepts("1.1. background"));
        assert!(!shape.accepts(&format!("A{}", "b".repeat(299))));
        assert!(shape.accepts(&format!("A{}", "b".repeat(298))));
    }

    #[test]
    fn test_shape_rejects_keyword_match() {
        let classifier = default_classifier();
        assert_eq!(
            classifier.classify(&span("Summary: what changed?", 10.0), &RuleContext::default()),
            None
        );
    }

    #[test]
    fn test_cascade_order_first_match_wins() {
        let classifier = default_classifier();
        // Numbering beats font size: depth 3 even though the size says H1.
        assert_eq!(
            classifier.classify(&span("1.2.3 Appendix Tables", 40.0), &ctx(20.0, 15.0, 12.0)),
            Some(HeadingLevel::H3)
        );
        assert_eq!(classifier.rule_names(), vec!["numbering", "keyword", "font-size"]);
    }

    struct ShoutingRule;

    impl HeadingRule for ShoutingRule {
        fn name(&self) -> &'static str {
            "keyword"
        }

        fn classify(&self, span: &TextSpan, _ctx: &RuleContext) -> Option<HeadingLevel> {
            let letters: Vec<char> = span.text.chars().filter(|c| c.is_alphabetic()).collect();
            (!letters.is_empty() && letters.iter().all(|c| c.is_uppercase()))
                .then_some(HeadingLevel::H2)
        }
    }

    #[test]
    fn test_replace_rule() {
        let mut classifier = default_classifier();
        assert!(classifier.replace_rule(Box::new(ShoutingRule)));
        assert_eq!(classifier.rule_names(), vec!["numbering", "keyword", "font-size"]);

        let none = RuleContext::default();
        assert_eq!(classifier.classify(&span("Introduction", 10.0), &none), None);
        assert_eq!(classifier.classify(&span("KEY FINDINGS", 10.0), &none), Some(HeadingLevel::H2));
    }

    #[test]
    fn test_classify_spans_respects_deadline() {
        let classifier = default_classifier();
        let spans = vec![span("Introduction", 10.0)];

        let found = classifier
            .classify_spans(&spans, &RuleContext::default(), &Deadline::unbounded())
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].font_size, 10.0);

        let expired = Deadline::start(Some(std::time::Duration::ZERO));
        std::thread::sleep(std::time::Duration::from_millis(2));
        assert!(classifier
            .classify_spans(&spans, &RuleContext::default(), &expired)
            .is_err());
    }
}
