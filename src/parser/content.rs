//! Content-stream interpretation.
//!
//! Walks a page's decoded operators with a simplified text-rendering state
//! machine and produces [`RawSpan`]s with position and font information.
//! Consecutive show operations that share font, size and baseline are merged
//! into one span, so a heading drawn word by word still arrives as a single
//! run of text.
//!
//! Coordinates are converted from PDF user space (origin bottom-left, y up)
//! to page space (origin top-left, y down).

use super::backend::{get_number_from_value, BackendFontInfo, PageId, PdfBackend, PdfValue};
use crate::error::Result;
use crate::model::{BoundingBox, RawSpan};

/// Approximate glyph width as a fraction of the font size.
const APPROX_CHAR_WIDTH_RATIO: f32 = 0.5;

/// Ascender and descender as fractions of the font size.
const ASCENT_RATIO: f32 = 0.8;
const DESCENT_RATIO: f32 = 0.2;

/// TJ adjustments beyond this (thousandths of an em) are word breaks.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Baselines closer than this (points) belong to the same line.
const BASELINE_TOLERANCE: f32 = 1.0;

/// 2x3 affine matrix `[a b c d e f]` in PDF row-vector convention.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix([f32; 6]);

const IDENTITY: Matrix = Matrix([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

impl Matrix {
    fn from_operands(operands: &[PdfValue]) -> Option<Self> {
        if operands.len() < 6 {
            return None;
        }
        let vals: Vec<f32> = operands
            .iter()
            .take(6)
            .filter_map(get_number_from_value)
            .collect();
        if vals.len() == 6 {
            Some(Matrix([vals[0], vals[1], vals[2], vals[3], vals[4], vals[5]]))
        } else {
            None
        }
    }

    /// `self × other`: apply `self` first, then `other`.
    fn then(&self, other: &Matrix) -> Matrix {
        let [a1, b1, c1, d1, e1, f1] = self.0;
        let [a2, b2, c2, d2, e2, f2] = other.0;
        Matrix([
            a1 * a2 + b1 * c2,
            a1 * b2 + b1 * d2,
            c1 * a2 + d1 * c2,
            c1 * b2 + d1 * d2,
            e1 * a2 + f1 * c2 + e2,
            e1 * b2 + f1 * d2 + f2,
        ])
    }

    fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        let [a, b, c, d, e, f] = self.0;
        (x * a + y * c + e, x * b + y * d + f)
    }

    fn translate(tx: f32, ty: f32) -> Matrix {
        Matrix([1.0, 0.0, 0.0, 1.0, tx, ty])
    }

    fn vertical_scale(&self) -> f32 {
        (self.0[2] * self.0[2] + self.0[3] * self.0[3]).sqrt()
    }

    fn horizontal_scale(&self) -> f32 {
        (self.0[0] * self.0[0] + self.0[1] * self.0[1]).sqrt()
    }
}

/// Text state tracked across operators.
#[derive(Debug, Clone)]
struct TextState {
    font_key: Vec<u8>,
    font_name: String,
    font_size: f32,
    text_matrix: Matrix,
    line_matrix: Matrix,
    horiz_scale: f32,
    char_spacing: f32,
    word_spacing: f32,
    text_rise: f32,
    leading: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font_key: Vec::new(),
            font_name: String::new(),
            font_size: 12.0,
            text_matrix: IDENTITY,
            line_matrix: IDENTITY,
            horiz_scale: 1.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            text_rise: 0.0,
            leading: 0.0,
        }
    }
}

impl TextState {
    fn translate_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix = Matrix::translate(tx, ty).then(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        self.translate_line(0.0, -self.leading);
    }

    /// Advance horizontally after showing `text`, in text-space units.
    fn advance(&mut self, text: &str) {
        let mut dx = 0.0;
        for ch in text.chars() {
            dx += self.font_size * APPROX_CHAR_WIDTH_RATIO + self.char_spacing;
            if ch == ' ' {
                dx += self.word_spacing;
            }
        }
        self.advance_by(dx * self.horiz_scale);
    }

    fn advance_by(&mut self, dx: f32) {
        self.text_matrix = Matrix::translate(dx, 0.0).then(&self.text_matrix);
    }
}

/// A run of text under construction, in user space.
#[derive(Debug)]
struct PendingRun {
    text: String,
    font_name: String,
    size: f32,
    x: f32,
    baseline: f32,
    end_x: f32,
}

/// Collects shown strings into merged spans.
struct SpanBuilder {
    page_height: f32,
    pending: Option<PendingRun>,
    spans: Vec<RawSpan>,
    max_spans: Option<usize>,
}

impl SpanBuilder {
    fn new(page_height: f32, max_spans: Option<usize>) -> Self {
        Self {
            page_height,
            pending: None,
            spans: Vec::new(),
            max_spans,
        }
    }

    fn is_full(&self) -> bool {
        self.max_spans
            .map(|max| self.spans.len() >= max)
            .unwrap_or(false)
    }

    /// Record text shown at the current state, then advance the state.
    fn show(&mut self, text: &str, state: &mut TextState, ctm: &Matrix) {
        if text.is_empty() {
            return;
        }

        let render = state.text_matrix.then(ctm);
        let (x, baseline) = render.apply(0.0, state.text_rise);
        let size = (state.font_size * render.vertical_scale()).abs();
        let start_x = x;

        state.advance(text);
        let end_x = state.text_matrix.then(ctm).apply(0.0, 0.0).0;
        let width = (end_x - start_x).abs().max(size * APPROX_CHAR_WIDTH_RATIO);

        if let Some(run) = self.pending.as_mut() {
            let same_style = run.font_name == state.font_name && (run.size - size).abs() < 0.05;
            let same_line = (run.baseline - baseline).abs() < BASELINE_TOLERANCE;
            let gap = start_x - run.end_x;
            let adjacent = gap > -size && gap < size * 2.0;

            if same_style && same_line && adjacent {
                let needs_space = gap > size * APPROX_CHAR_WIDTH_RATIO * 0.4
                    && !run.text.ends_with(char::is_whitespace)
                    && !text.starts_with(char::is_whitespace);
                if needs_space {
                    run.text.push(' ');
                }
                run.text.push_str(text);
                run.end_x = start_x + width;
                return;
            }
        }

        self.flush();
        self.pending = Some(PendingRun {
            text: text.to_string(),
            font_name: state.font_name.clone(),
            size,
            x: start_x,
            baseline,
            end_x: start_x + width,
        });
    }

    fn flush(&mut self) {
        let Some(run) = self.pending.take() else {
            return;
        };
        if run.text.trim().is_empty() || self.is_full() {
            return;
        }

        let top = run.baseline + run.size * ASCENT_RATIO;
        let bottom = run.baseline - run.size * DESCENT_RATIO;
        let bbox = BoundingBox::new(
            run.x.min(run.end_x),
            self.page_height - top,
            run.x.max(run.end_x),
            self.page_height - bottom,
        );
        self.spans
            .push(RawSpan::new(run.text, run.size, run.font_name, bbox));
    }

    fn finish(mut self) -> Vec<RawSpan> {
        self.flush();
        self.spans
    }
}

/// Walk a single page's content stream and produce its raw spans.
///
/// Handles `q`/`Q`/`cm` for the graphics matrix and the text operators
/// `BT`, `ET`, `Tf`, `Tm`, `Td`, `TD`, `T*`, `TL`, `Tc`, `Tw`, `Tz`, `Ts`,
/// `Tj`, `TJ`, `'` and `"`.
pub fn extract_page_spans(
    backend: &dyn PdfBackend,
    page_id: PageId,
    max_spans: Option<usize>,
) -> Result<Vec<RawSpan>> {
    let (_, page_height) = backend.page_size(page_id);
    let raw_content = backend.page_content(page_id)?;
    let ops = backend.decode_content(&raw_content)?;
    let fonts = backend.page_fonts(page_id).unwrap_or_default();

    let mut state = TextState::default();
    let mut ctm = IDENTITY;
    let mut ctm_stack: Vec<Matrix> = Vec::new();
    let mut builder = SpanBuilder::new(page_height, max_spans);

    for op in &ops {
        if builder.is_full() {
            log::warn!(
                "Page {:?}: span limit of {} reached, ignoring the rest of the page",
                page_id,
                max_spans.unwrap_or_default()
            );
            break;
        }

        match op.operator.as_str() {
            "q" => ctm_stack.push(ctm),
            "Q" => {
                if let Some(saved) = ctm_stack.pop() {
                    ctm = saved;
                }
            }
            "cm" => {
                if let Some(m) = Matrix::from_operands(&op.operands) {
                    ctm = m.then(&ctm);
                }
            }
            "BT" => {
                state.text_matrix = IDENTITY;
                state.line_matrix = IDENTITY;
            }
            "ET" => {}
            "Tf" => handle_tf(&op.operands, &fonts, &mut state),
            "Tm" => {
                if let Some(m) = Matrix::from_operands(&op.operands) {
                    state.text_matrix = m;
                    state.line_matrix = m;
                }
            }
            "Td" | "TD" => {
                if op.operands.len() >= 2 {
                    let tx = get_number_from_value(&op.operands[0]).unwrap_or(0.0);
                    let ty = get_number_from_value(&op.operands[1]).unwrap_or(0.0);
                    if op.operator == "TD" {
                        state.leading = -ty;
                    }
                    state.translate_line(tx, ty);
                }
            }
            "T*" => state.next_line(),
            "TL" => set_number(&op.operands, &mut state.leading),
            "Tc" => set_number(&op.operands, &mut state.char_spacing),
            "Tw" => set_number(&op.operands, &mut state.word_spacing),
            "Ts" => set_number(&op.operands, &mut state.text_rise),
            "Tz" => {
                if let Some(v) = op.operands.first().and_then(get_number_from_value) {
                    state.horiz_scale = v / 100.0;
                }
            }
            "Tj" => {
                if let Some(PdfValue::Str(bytes)) = op.operands.first() {
                    let text = backend.decode_text(page_id, &state.font_key, bytes);
                    builder.show(&text, &mut state, &ctm);
                }
            }
            "TJ" => {
                if let Some(PdfValue::Array(items)) = op.operands.first() {
                    let text = combine_tj_array(items, backend, page_id, &mut state);
                    builder.show(&text, &mut state, &ctm);
                }
            }
            "'" => {
                state.next_line();
                if let Some(PdfValue::Str(bytes)) = op.operands.first() {
                    let text = backend.decode_text(page_id, &state.font_key, bytes);
                    builder.show(&text, &mut state, &ctm);
                }
            }
            "\"" => {
                if op.operands.len() >= 3 {
                    set_number(&op.operands[0..1], &mut state.word_spacing);
                    set_number(&op.operands[1..2], &mut state.char_spacing);
                    state.next_line();
                    if let PdfValue::Str(bytes) = &op.operands[2] {
                        let text = backend.decode_text(page_id, &state.font_key, bytes);
                        builder.show(&text, &mut state, &ctm);
                    }
                }
            }
            _ => {}
        }
    }

    Ok(builder.finish())
}

fn set_number(operands: &[PdfValue], target: &mut f32) {
    if let Some(v) = operands.first().and_then(get_number_from_value) {
        *target = v;
    }
}

/// Handle the `Tf` (set font) operator.
fn handle_tf(operands: &[PdfValue], fonts: &[BackendFontInfo], state: &mut TextState) {
    if operands.len() < 2 {
        return;
    }
    let key = match &operands[0] {
        PdfValue::Name(n) => n.clone(),
        _ => return,
    };
    state.font_size = get_number_from_value(&operands[1]).unwrap_or(state.font_size);
    state.font_name = fonts
        .iter()
        .find(|info| info.name == key)
        .map(|info| info.base_font.clone())
        .unwrap_or_else(|| String::from_utf8_lossy(&key).to_string());
    state.font_key = key;
}

/// Join the strings of a TJ array, turning large negative kerns into spaces.
///
/// Kerning adjustments are not applied to the text matrix here; the merged
/// text is advanced as a whole by the caller.
fn combine_tj_array(
    items: &[PdfValue],
    backend: &dyn PdfBackend,
    page_id: PageId,
    state: &mut TextState,
) -> String {
    let mut combined = String::new();
    for item in items {
        match item {
            PdfValue::Str(bytes) => {
                combined.push_str(&backend.decode_text(page_id, &state.font_key, bytes));
            }
            PdfValue::Integer(_) | PdfValue::Real(_) => {
                let adjustment = -get_number_from_value(item).unwrap_or(0.0);
                if adjustment > TJ_SPACE_THRESHOLD
                    && !combined.is_empty()
                    && !combined.ends_with(char::is_whitespace)
                {
                    combined.push(' ');
                }
            }
            _ => {}
        }
    }
    combined
}
