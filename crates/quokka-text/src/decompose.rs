//! Line decomposition: one run of text → rows.
//!
//! The decomposer is a word-wrap state machine. Paragraphs are split on
//! `\n`, each paragraph into words (a word keeps its trailing spaces,
//! leading spaces form a word of their own) and the words are pushed onto
//! a stack. Popping accumulates a candidate row which is re-measured as a
//! whole every time, since kerning makes widths non-additive. A word that
//! makes the row overflow is pushed back and becomes the start of the
//! next row.
//!
//! Rows are budgeted by `max_lines` and `max_height`. The last row the
//! budget allows is where truncation happens: character-level cutting with
//! an optional trail for `TailTruncation`, a plain cut otherwise.
//!
//! A run that continues a previous run's last row (multi-run labels) gets
//! that row's width as `first_line_offset.x`; its first row is later merged
//! into the previous one by the span merger.

use std::sync::Arc;

use unicode_segmentation::UnicodeSegmentation;

use crate::cache::Measurement;
use crate::config::{LineBreakMode, TextLayoutConfig};
use crate::context::TextContext;
use crate::font::{MIN_FONT_SIZE, TextPaint};
use crate::geometry::{EPSILON, Point, Size};
use crate::line::{DecompositionResult, LineRecord, LineSpan};
use crate::measure::measure_text;
use crate::shaping::needs_bidi;
use crate::spans::{EmbeddedContent, RunId};

/// Where a run starts relative to the rows already laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunContext {
    /// Run being laid out, `None` for plain-text labels.
    pub run: Option<RunId>,
    /// The first row continues the previous run's last row.
    pub continues_line: bool,
    /// Index of the row the run starts on.
    pub row_index: usize,
    /// Top of the row the run starts on.
    pub top: f32,
}

impl RunContext {
    /// Context of the first (or only) run of a label.
    #[must_use]
    pub const fn first(run: Option<RunId>) -> Self {
        Self {
            run,
            continues_line: false,
            row_index: 0,
            top: 0.0,
        }
    }
}

/// Constraints and input of one decomposition.
#[derive(Debug, Clone, Copy)]
pub struct DecomposeRequest<'a> {
    /// Text of the run.
    pub text: &'a str,
    /// Paint the run is measured with.
    pub paint: &'a TextPaint,
    /// Where the first row starts (x = width already used on that row).
    pub first_line_offset: Point,
    /// Row width limit; `f32::INFINITY` for unconstrained.
    pub max_width: f32,
    /// Total height limit; `f32::INFINITY` for unconstrained.
    pub max_height: f32,
    /// Row count limit across the whole label.
    pub max_lines: Option<usize>,
    /// Measure through the shaping engine.
    pub needs_shaping: bool,
    /// Position of the run in the label.
    pub context: RunContext,
}

/// Turns runs into rows under a configuration.
#[derive(Debug, Clone, Copy)]
pub struct LineDecomposer<'a> {
    ctx: &'a TextContext,
    config: &'a TextLayoutConfig,
}

impl<'a> LineDecomposer<'a> {
    /// Decomposer measuring through `ctx`.
    #[must_use]
    pub const fn new(ctx: &'a TextContext, config: &'a TextLayoutConfig) -> Self {
        Self { ctx, config }
    }

    /// Lay out one run of text.
    #[must_use]
    pub fn decompose(&self, request: &DecomposeRequest<'_>) -> DecompositionResult {
        let mut wrapper = Wrapper::new(self, request);
        let paragraphs: Vec<&str> = request.text.split('\n').collect();
        let count = paragraphs.len();

        for (index, paragraph) in paragraphs.iter().enumerate() {
            let paragraph = paragraph.strip_suffix('\r').unwrap_or(paragraph);
            let starts_paragraph = index > 0
                || (!request.context.continues_line && request.first_line_offset.x == 0.0);
            if index > 0 {
                wrapper.top += wrapper.paragraph_gap;
            }
            if !wrapper.row_fits() {
                wrapper.was_cut = true;
                wrapper.exhausted = true;
                break;
            }
            wrapper.wrap_paragraph(paragraph, starts_paragraph, index + 1 < count);
            if wrapper.exhausted {
                if index + 1 < count {
                    wrapper.was_cut = true;
                }
                break;
            }
        }

        let result = wrapper.finish(count);
        #[cfg(feature = "layout-trace")]
        eprintln!(
            "[DECOMPOSE] size={} width={} height={} lines={} cut={} exhausted={}",
            request.paint.size,
            request.max_width,
            request.max_height,
            result.lines.len(),
            result.was_cut,
            result.is_exhausted
        );
        result
    }

    /// Lay out an embedded-content run.
    ///
    /// The content is measured against the width left on the current row;
    /// if it does not fit after earlier content it moves to a new row,
    /// leaving an empty anchor row behind for the merger.
    #[must_use]
    pub fn decompose_embedded(
        &self,
        content: &dyn EmbeddedContent,
        request: &DecomposeRequest<'_>,
        scale: f32,
    ) -> DecompositionResult {
        let mut wrapper = Wrapper::new(self, request);
        let starts_paragraph =
            !request.context.continues_line && request.first_line_offset.x == 0.0;
        let remaining_height = (request.max_height - wrapper.top).max(0.0);
        let mut size = content.measure(wrapper.available_width(), remaining_height, scale);

        if wrapper.offset_x > 0.0 && size.width > wrapper.available_width() + EPSILON {
            if wrapper.is_last_allowed_row() {
                wrapper.was_cut = true;
                wrapper.exhausted = true;
                wrapper.commit_placeholder(false);
                return wrapper.finish(1);
            }
            wrapper.commit_placeholder(false);
            size = content.measure(request.max_width, remaining_height, scale);
        }
        if size.width > wrapper.available_width() + EPSILON {
            wrapper.was_cut = true;
        }

        let span = LineSpan {
            text: String::new(),
            run: request.context.run,
            glyphs: None,
            needs_shaping: false,
            needs_bidi: false,
            embedded: true,
            size,
        };
        let starts = starts_paragraph && wrapper.lines.is_empty();
        wrapper.push_line(LineRecord::with_span(span, wrapper.line_height, starts), true);
        wrapper.finish(1)
    }
}

/// Mutable state of one decomposition.
struct Wrapper<'a> {
    ctx: &'a TextContext,
    config: &'a TextLayoutConfig,
    paint: TextPaint,
    needs_shaping: bool,
    run: Option<RunId>,
    max_width: f32,
    max_height: f32,
    max_lines: Option<usize>,
    row_index: usize,
    first_offset: f32,
    line_height: f32,
    line_advance: f32,
    paragraph_gap: f32,
    lines: Vec<LineRecord>,
    /// Top of the row being filled.
    top: f32,
    /// Width already used on the row being filled.
    offset_x: f32,
    was_cut: bool,
    exhausted: bool,
}

impl<'a> Wrapper<'a> {
    fn new(decomposer: &LineDecomposer<'a>, request: &DecomposeRequest<'_>) -> Self {
        let config = decomposer.config;
        // A collapsing size would make every row zero-height and never cut.
        let paint = request.paint.with_size(request.paint.size.max(MIN_FONT_SIZE));
        let metrics = paint.metrics();
        let line_height = if config.uniform_line_height {
            metrics.line_height()
        } else {
            metrics.text_height()
        };
        Self {
            ctx: decomposer.ctx,
            config,
            paint,
            needs_shaping: request.needs_shaping,
            run: request.context.run,
            max_width: request.max_width,
            max_height: request.max_height,
            max_lines: request.max_lines,
            row_index: request.context.row_index,
            first_offset: request.first_line_offset.x,
            line_height,
            line_advance: line_height * config.line_spacing,
            paragraph_gap: line_height * config.paragraph_spacing,
            lines: Vec::new(),
            top: request.context.top,
            offset_x: request.first_line_offset.x,
            was_cut: false,
            exhausted: false,
        }
    }

    fn current_row(&self) -> usize {
        self.row_index + self.lines.len()
    }

    fn available_width(&self) -> f32 {
        self.max_width - self.offset_x
    }

    /// The row about to be filled is inside the budget. The first row of
    /// a label is always allowed so there is something to draw.
    fn row_fits(&self) -> bool {
        let row = self.current_row();
        if row == 0 {
            return true;
        }
        self.max_lines.is_none_or(|max| row < max)
            && self.top + self.line_height <= self.max_height + EPSILON
    }

    /// No row after the current one would fit.
    fn is_last_allowed_row(&self) -> bool {
        self.is_last_row_before(0.0)
    }

    /// No row would fit after the current one and `gap` of extra space.
    fn is_last_row_before(&self, gap: f32) -> bool {
        let row = self.current_row();
        self.max_lines.is_some_and(|max| row + 1 >= max)
            || self.top + self.line_advance + gap + self.line_height > self.max_height + EPSILON
    }

    fn measure(&self, text: &str) -> Arc<Measurement> {
        measure_text(self.ctx, &self.paint, text, self.needs_shaping)
    }

    fn push_line(&mut self, mut line: LineRecord, is_last_in_paragraph: bool) {
        line.is_last_in_paragraph = is_last_in_paragraph;
        self.lines.push(line);
        self.top += self.line_advance;
        self.offset_x = 0.0;
    }

    fn commit_placeholder(&mut self, is_new_paragraph: bool) {
        self.push_line(LineRecord::placeholder(self.line_height, is_new_paragraph), false);
    }

    fn commit(&mut self, text: String, is_new_paragraph: bool, is_last_in_paragraph: bool) {
        if text.is_empty() {
            let line = LineRecord::placeholder(self.line_height, is_new_paragraph);
            self.push_line(line, is_last_in_paragraph);
            return;
        }
        let measured = self.measure(&text);
        let span = LineSpan {
            needs_bidi: needs_bidi(&text),
            text,
            run: self.run,
            glyphs: measured.glyphs.clone(),
            needs_shaping: self.needs_shaping,
            embedded: false,
            size: Size::new(measured.width, self.paint.metrics().text_height()),
        };
        self.push_line(
            LineRecord::with_span(span, self.line_height, is_new_paragraph),
            is_last_in_paragraph,
        );
    }

    /// [`cut_to_fit`] against the room left on the current row; an empty
    /// cut when not even the trail fits.
    fn cut_to_fit(&self, text: &str, trail: Option<&str>) -> (String, usize) {
        cut_to_fit(
            self.ctx,
            &self.paint,
            self.needs_shaping,
            text,
            trail,
            self.available_width(),
        )
        .unwrap_or_default()
    }

    /// First grapheme of `text`, used to guarantee progress.
    fn first_grapheme_len(text: &str) -> usize {
        text.graphemes(true).next().map_or(text.len(), str::len)
    }

    fn truncating(&self) -> bool {
        self.config.line_break_mode == LineBreakMode::TailTruncation
    }

    fn wrap_paragraph(&mut self, paragraph: &str, starts_paragraph: bool, more_paragraphs: bool) {
        let mut words = split_words(paragraph);
        words.reverse();
        let mut words: Vec<String> = words.into_iter().map(str::to_string).collect();
        let mut line = String::new();
        let mut new_paragraph = starts_paragraph;
        let mut committed = false;
        let mode = self.config.line_break_mode;

        while let Some(word) = words.pop() {
            let candidate = format!("{line}{word}");
            let width = self.measure(&candidate).width;
            let fits = width <= self.available_width() + EPSILON;

            if fits || mode == LineBreakMode::NoWrap {
                if !fits {
                    self.was_cut = true;
                }
                line = candidate;
                continue;
            }

            if self.is_last_allowed_row() {
                // Nothing may follow this row: cut here and stop.
                self.was_cut = true;
                self.exhausted = true;
                let shown = match mode {
                    LineBreakMode::TailTruncation => {
                        self.cut_to_fit(&candidate, Some(&self.config.truncation_trail)).0
                    }
                    LineBreakMode::CharacterWrap => self.cut_to_fit(&candidate, None).0,
                    _ if line.is_empty() && self.offset_x == 0.0 => candidate,
                    _ => line,
                };
                self.commit(shown, new_paragraph, true);
                return;
            }

            if mode == LineBreakMode::CharacterWrap {
                let (mut head, mut consumed) = self.cut_to_fit(&candidate, None);
                if consumed == 0 && self.offset_x == 0.0 {
                    // Not even one grapheme fits an empty row; take it anyway.
                    consumed = Self::first_grapheme_len(&candidate);
                    head = candidate[..consumed].to_string();
                    self.was_cut = true;
                }
                let rest = &candidate[consumed..];
                if !rest.is_empty() {
                    words.push(rest.to_string());
                }
                self.commit(head, new_paragraph, false);
            } else if !line.is_empty() {
                words.push(word);
                self.commit(std::mem::take(&mut line), new_paragraph, false);
            } else if self.offset_x > 0.0 {
                // The previous run's text leaves no room; start a new row.
                words.push(word);
                self.commit(String::new(), new_paragraph, false);
            } else {
                // A single word wider than the row overflows silently.
                self.was_cut = true;
                self.commit(candidate, new_paragraph, false);
            }
            line.clear();
            new_paragraph = false;
            committed = true;

            if !words.is_empty() && !self.row_fits() {
                self.was_cut = true;
                self.exhausted = true;
                return;
            }
        }

        if line.is_empty() && committed {
            // The paragraph ended exactly on a row break.
            if let Some(last) = self.lines.last_mut() {
                last.is_last_in_paragraph = true;
            }
            return;
        }
        if more_paragraphs && self.is_last_row_before(self.paragraph_gap) {
            self.was_cut = true;
            self.exhausted = true;
            if self.truncating() {
                line = self.cut_to_fit(&line, Some(&self.config.truncation_trail)).0;
            }
        }
        self.commit(line, new_paragraph, true);
    }

    fn finish(self, count_paragraphs: usize) -> DecompositionResult {
        let widest = self
            .lines
            .iter()
            .enumerate()
            .map(|(index, line)| {
                if index == 0 {
                    self.first_offset + line.width
                } else {
                    line.width
                }
            })
            .fold(0.0, f32::max);
        let bottom = if self.lines.is_empty() {
            self.top
        } else {
            self.top - self.line_advance + self.line_height
        };
        DecompositionResult {
            lines: self.lines,
            was_cut: self.was_cut,
            count_paragraphs,
            has_more_vertical_space: slack(self.max_height, bottom),
            has_more_horizontal_space: slack(self.max_width, widest),
            auto_size_direction: crate::line::AutoSizeDirection::Idle,
            is_exhausted: self.exhausted,
        }
    }
}

/// Longest grapheme prefix of `text` whose measured width fits `available`.
///
/// With a trail, the prefix loses its trailing whitespace and gets the trail
/// appended before measuring, so prefix plus trail fit together. Returns the
/// visible text and how many bytes of `text` it consumed, or `None` when
/// not even the bare trail fits.
#[must_use]
pub fn cut_to_fit(
    ctx: &TextContext,
    paint: &TextPaint,
    needs_shaping: bool,
    text: &str,
    trail: Option<&str>,
    available: f32,
) -> Option<(String, usize)> {
    let visible = |end: usize| {
        let mut shown = text[..end].to_string();
        if let Some(trail) = trail {
            shown.truncate(shown.trim_end().len());
            shown.push_str(trail);
        }
        shown
    };
    let fits = |end: usize| {
        measure_text(ctx, paint, &visible(end), needs_shaping).width <= available + EPSILON
    };

    if !fits(0) {
        return None;
    }
    let mut ends = vec![0];
    ends.extend(text.grapheme_indices(true).map(|(start, g)| start + g.len()));
    let (mut low, mut high) = (0, ends.len() - 1);
    while low < high {
        let mid = (low + high).div_ceil(2);
        if fits(ends[mid]) {
            low = mid;
        } else {
            high = mid - 1;
        }
    }
    Some((visible(ends[low]), ends[low]))
}

/// Unused room under a constraint; unconstrained boxes have none.
fn slack(limit: f32, used: f32) -> f32 {
    if limit.is_finite() {
        (limit - used).max(0.0)
    } else {
        0.0
    }
}

fn is_space(ch: char) -> bool {
    ch == ' ' || ch == '\t'
}

/// Split a paragraph into words that keep their trailing spaces.
///
/// Leading spaces become a word of their own so they survive wrapping.
#[must_use]
pub fn split_words(paragraph: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let mut start = 0;
    let mut previous_was_space = false;
    for (index, ch) in paragraph.char_indices() {
        let space = is_space(ch);
        if !space && previous_was_space && index > start {
            words.push(&paragraph[start..index]);
            start = index;
        }
        previous_was_space = space;
    }
    if start < paragraph.len() {
        words.push(&paragraph[start..]);
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::ApproximateFace;

    fn ctx() -> TextContext {
        TextContext::new(ApproximateFace::new("approx").into_handle())
    }

    /// Size 10 → every character is 6 px wide, rows are 12 px tall.
    fn run(
        ctx: &TextContext,
        config: &TextLayoutConfig,
        text: &str,
        max_width: f32,
        max_height: f32,
    ) -> DecompositionResult {
        let paint = TextPaint::new(ctx.default_face().clone(), 10.0);
        let request = DecomposeRequest {
            text,
            paint: &paint,
            first_line_offset: Point::default(),
            max_width,
            max_height,
            max_lines: config.effective_max_lines(),
            needs_shaping: false,
            context: RunContext::first(None),
        };
        LineDecomposer::new(ctx, config).decompose(&request)
    }

    fn values(result: &DecompositionResult) -> Vec<&str> {
        result.lines.iter().map(|line| line.value.as_str()).collect()
    }

    #[test]
    fn test_split_words_keeps_spaces() {
        assert_eq!(split_words("  hi there  you"), vec!["  ", "hi ", "there  ", "you"]);
        assert_eq!(split_words(""), Vec::<&str>::new());
        assert_eq!(split_words("one"), vec!["one"]);
    }

    #[test]
    fn test_fits_on_one_line() {
        let ctx = ctx();
        let result = run(&ctx, &TextLayoutConfig::default(), "Hello World", 200.0, f32::INFINITY);
        assert_eq!(values(&result), vec!["Hello World"]);
        assert!(!result.was_cut);
        assert!((result.lines[0].width - 66.0).abs() < 1e-3);
        assert!(result.lines[0].is_new_paragraph);
        assert!(result.lines[0].is_last_in_paragraph);
    }

    #[test]
    fn test_word_wrap_postpones_last_word() {
        let ctx = ctx();
        // 60 px = 10 characters per row.
        let result = run(&ctx, &TextLayoutConfig::default(), "aaa bbb ccc", 60.0, f32::INFINITY);
        assert_eq!(values(&result), vec!["aaa bbb ", "ccc"]);
        assert!(!result.was_cut);
        assert!(!result.lines[1].is_new_paragraph);
    }

    #[test]
    fn test_single_long_word_overflows() {
        let ctx = ctx();
        let result = run(&ctx, &TextLayoutConfig::default(), "abcdefghijkl", 30.0, f32::INFINITY);
        assert_eq!(values(&result), vec!["abcdefghijkl"]);
        assert!(result.was_cut);
    }

    #[test]
    fn test_paragraphs_and_blank_lines() {
        let ctx = ctx();
        let result = run(&ctx, &TextLayoutConfig::default(), "one\n\ntwo", 200.0, f32::INFINITY);
        assert_eq!(values(&result), vec!["one", "", "two"]);
        assert_eq!(result.count_paragraphs, 3);
        assert!(result.lines.iter().all(|line| line.is_new_paragraph));
    }

    #[test]
    fn test_max_lines_cuts() {
        let ctx = ctx();
        let config = TextLayoutConfig {
            max_lines: Some(2),
            ..TextLayoutConfig::default()
        };
        let result = run(&ctx, &config, "aaa bbb ccc ddd eee", 30.0, f32::INFINITY);
        assert_eq!(result.lines.len(), 2);
        assert!(result.was_cut);
        assert!(result.is_exhausted);
    }

    #[test]
    fn test_max_height_cuts() {
        let ctx = ctx();
        // Rows are 12 px; 30 px holds two of them.
        let result = run(&ctx, &TextLayoutConfig::default(), "a\nb\nc\nd", 100.0, 30.0);
        assert_eq!(values(&result), vec!["a", "b"]);
        assert!(result.was_cut);
    }

    #[test]
    fn test_tail_truncation_appends_trail() {
        let ctx = ctx();
        let config = TextLayoutConfig {
            line_break_mode: LineBreakMode::TailTruncation,
            ..TextLayoutConfig::default()
        };
        let result = run(&ctx, &config, "The quick brown fox", 60.0, f32::INFINITY);
        assert_eq!(result.lines.len(), 1);
        let line = &result.lines[0];
        assert!(line.value.ends_with(".."), "got {:?}", line.value);
        assert!(line.width <= 60.0 + EPSILON);
        assert_eq!(line.value, "The quic..");
        assert!(result.was_cut);
    }

    #[test]
    fn test_tail_truncation_marks_dropped_paragraphs() {
        let ctx = ctx();
        let config = TextLayoutConfig {
            line_break_mode: LineBreakMode::TailTruncation,
            ..TextLayoutConfig::default()
        };
        let result = run(&ctx, &config, "short\nhidden", 200.0, f32::INFINITY);
        assert_eq!(values(&result), vec!["short.."]);
        assert!(result.was_cut);
    }

    #[test]
    fn test_trail_when_paragraph_gap_leaves_no_room() {
        let ctx = ctx();
        let config = TextLayoutConfig {
            line_break_mode: LineBreakMode::TailTruncation,
            max_lines: Some(10),
            paragraph_spacing: 0.5,
            ..TextLayoutConfig::default()
        };
        // "c" would start at 36 after the 6 px gap and end past 45.
        let result = run(&ctx, &config, "a\nb\nc", 100.0, 45.0);
        assert_eq!(values(&result), vec!["a", "b.."]);
        assert!(result.was_cut);
    }

    #[test]
    fn test_line_spacing_advances_rows() {
        let ctx = ctx();
        let config = TextLayoutConfig {
            line_spacing: 2.0,
            ..TextLayoutConfig::default()
        };
        // Rows start at 0 and 24; a third would end at 60.
        let result = run(&ctx, &config, "a\nb\nc", 100.0, 40.0);
        assert_eq!(values(&result), vec!["a", "b"]);
        assert!(result.was_cut);
        assert!((result.has_more_vertical_space - 4.0).abs() < 1e-3);
    }

    #[test]
    fn test_paragraph_spacing_adds_gap() {
        let ctx = ctx();
        let config = TextLayoutConfig {
            paragraph_spacing: 0.5,
            ..TextLayoutConfig::default()
        };
        // Paragraphs start at 0, 18 and 36.
        let cut = run(&ctx, &config, "a\nb\nc", 100.0, 40.0);
        assert_eq!(values(&cut), vec!["a", "b"]);
        assert!(cut.was_cut);
        assert!((cut.has_more_vertical_space - 10.0).abs() < 1e-3);

        let fits = run(&ctx, &config, "a\nb\nc", 100.0, 48.0);
        assert_eq!(values(&fits), vec!["a", "b", "c"]);
        assert!(!fits.was_cut);
    }

    #[test]
    fn test_text_height_rows_without_uniform_line_height() {
        let ctx = ctx();
        let tight = TextLayoutConfig {
            uniform_line_height: false,
            ..TextLayoutConfig::default()
        };
        let result = run(&ctx, &tight, "a\nb", 100.0, 20.0);
        assert_eq!(values(&result), vec!["a", "b"]);
        assert!(!result.was_cut);
        assert!((result.lines[0].height - 10.0).abs() < 1e-3);

        let uniform = run(&ctx, &TextLayoutConfig::default(), "a\nb", 100.0, 20.0);
        assert_eq!(values(&uniform), vec!["a"]);
        assert!(uniform.was_cut);
    }

    #[test]
    fn test_right_to_left_spans_are_flagged() {
        let ctx = ctx();
        let text = "shalom \u{5e9}\u{5dc}\u{5d5}\u{5dd}";
        let hebrew = run(&ctx, &TextLayoutConfig::default(), text, 200.0, f32::INFINITY);
        assert!(hebrew.lines[0].spans[0].needs_bidi);

        let latin = run(&ctx, &TextLayoutConfig::default(), "plain", 200.0, f32::INFINITY);
        assert!(!latin.lines[0].spans[0].needs_bidi);
    }

    #[test]
    fn test_character_wrap_breaks_inside_words() {
        let ctx = ctx();
        let config = TextLayoutConfig {
            line_break_mode: LineBreakMode::CharacterWrap,
            ..TextLayoutConfig::default()
        };
        let result = run(&ctx, &config, "abcdefgh", 30.0, f32::INFINITY);
        assert_eq!(values(&result), vec!["abcde", "fgh"]);
        assert!(!result.was_cut);
    }

    #[test]
    fn test_no_wrap_keeps_paragraph_on_one_row() {
        let ctx = ctx();
        let config = TextLayoutConfig {
            line_break_mode: LineBreakMode::NoWrap,
            ..TextLayoutConfig::default()
        };
        let result = run(&ctx, &config, "aaa bbb ccc\nd", 30.0, f32::INFINITY);
        assert_eq!(values(&result), vec!["aaa bbb ccc", "d"]);
        assert!(result.was_cut);
    }

    #[test]
    fn test_empty_text_leaves_placeholder() {
        let ctx = ctx();
        let result = run(&ctx, &TextLayoutConfig::default(), "", 100.0, f32::INFINITY);
        assert_eq!(result.lines.len(), 1);
        assert!(result.lines[0].spans.is_empty());
        assert!(result.lines[0].width.abs() < f32::EPSILON);
        assert!(result.lines[0].height > 0.0);
    }

    #[test]
    fn test_continuing_run_wraps_when_no_room() {
        let ctx = ctx();
        let config = TextLayoutConfig::default();
        let paint = TextPaint::new(ctx.default_face().clone(), 10.0);
        let request = DecomposeRequest {
            text: "word",
            paint: &paint,
            first_line_offset: Point::new(50.0, 0.0),
            max_width: 60.0,
            max_height: f32::INFINITY,
            max_lines: None,
            needs_shaping: false,
            context: RunContext {
                run: Some(RunId(1)),
                continues_line: true,
                row_index: 0,
                top: 0.0,
            },
        };
        let result = LineDecomposer::new(&ctx, &config).decompose(&request);
        assert_eq!(values(&result), vec!["", "word"]);
        assert!(!result.lines[0].is_new_paragraph);
        assert_eq!(result.lines[1].spans[0].run, Some(RunId(1)));
    }

    #[test]
    fn test_slack_is_reported() {
        let ctx = ctx();
        let result = run(&ctx, &TextLayoutConfig::default(), "abc", 100.0, 50.0);
        assert!((result.has_more_horizontal_space - 82.0).abs() < 1e-3);
        assert!((result.has_more_vertical_space - 38.0).abs() < 1e-3);

        let open = run(&ctx, &TextLayoutConfig::default(), "abc", f32::INFINITY, f32::INFINITY);
        assert!(open.has_more_horizontal_space.abs() < f32::EPSILON);
    }
}
