//! A text label: the surface drawing code talks to.
//!
//! A label owns its text (plain or a [`SpanList`]), its configuration and
//! the result of its last layout. Layout happens in two steps so a stale
//! request can be dropped: [`TextLabel::prepare`] computes a layout tagged
//! with the label's generation, [`TextLabel::apply`] stores it only if no
//! invalidation happened in between. [`TextLabel::measure`] does both.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::autosize::{AutoSizeRequest, AutoSizeSolver};
use crate::config::{LineBreakMode, TextLayoutConfig};
use crate::context::TextContext;
use crate::decompose::{DecomposeRequest, LineDecomposer, RunContext, cut_to_fit};
use crate::display_list::{DrawCommand, DrawList};
use crate::font::{MIN_FONT_SIZE, TextPaint};
use crate::geometry::{Point, Rect, Size};
use crate::glyphs::{self, resolve_with_fallback};
use crate::line::{DecompositionResult, LineRecord, LineSpan};
use crate::measure::{measure_text, measure_width};
use crate::merge::SpanMerger;
use crate::render::{LineRenderer, SpanAppearance};
use crate::shaping::{needs_bidi, text_needs_shaping};
use crate::spans::{RunContent, RunId, SpanList, StyledRun};

/// What a label displays.
#[derive(Debug, Clone)]
pub enum LabelContent {
    /// One run in the label's own style.
    Plain(String),
    /// Styled runs.
    Rich(SpanList),
}

/// A computed layout waiting to be applied.
#[derive(Debug, Clone)]
pub struct PreparedLayout {
    /// Label generation the layout was computed for.
    pub generation: u64,
    /// Font size in pixels after auto-size.
    pub font_size: f32,
    /// Content extent.
    pub size: Size,
    /// Something was truncated or overflowed.
    pub was_cut: bool,
    /// Rows.
    pub lines: Arc<[LineRecord]>,
}

#[derive(Debug)]
struct LabelState {
    lines: Arc<[LineRecord]>,
    applied_generation: Option<u64>,
    font_size: f32,
    solver: AutoSizeSolver,
}

/// A laid-out piece of text.
#[derive(Debug)]
pub struct TextLabel {
    ctx: Arc<TextContext>,
    config: TextLayoutConfig,
    content: LabelContent,
    generation: AtomicU64,
    state: Mutex<LabelState>,
}

fn sanitize_constraint(value: f32) -> f32 {
    if value.is_nan() || value < 0.0 {
        f32::INFINITY
    } else {
        value
    }
}

fn sanitize_scale(scale: f32) -> f32 {
    if scale.is_finite() && scale > 0.0 { scale } else { 1.0 }
}

impl TextLabel {
    /// Label showing plain text.
    #[must_use]
    pub fn new(ctx: Arc<TextContext>, text: impl Into<String>) -> Self {
        Self::with_content(ctx, LabelContent::Plain(text.into()))
    }

    /// Label showing styled runs.
    #[must_use]
    pub fn rich(ctx: Arc<TextContext>, spans: SpanList) -> Self {
        Self::with_content(ctx, LabelContent::Rich(spans))
    }

    fn with_content(ctx: Arc<TextContext>, content: LabelContent) -> Self {
        let config = TextLayoutConfig::default();
        Self {
            ctx,
            state: Mutex::new(LabelState {
                lines: Arc::from(Vec::new()),
                applied_generation: None,
                font_size: config.font_size,
                solver: AutoSizeSolver::new(),
            }),
            config,
            content,
            generation: AtomicU64::new(0),
        }
    }

    /// Replace the configuration.
    #[must_use]
    pub fn with_config(mut self, config: TextLayoutConfig) -> Self {
        self.set_config(config);
        self
    }

    /// Current configuration.
    #[must_use]
    pub const fn config(&self) -> &TextLayoutConfig {
        &self.config
    }

    /// Current content.
    #[must_use]
    pub const fn content(&self) -> &LabelContent {
        &self.content
    }

    /// All text of the label.
    #[must_use]
    pub fn text(&self) -> String {
        match &self.content {
            LabelContent::Plain(text) => text.clone(),
            LabelContent::Rich(spans) => spans.text(),
        }
    }

    /// Replace the configuration and invalidate.
    pub fn set_config(&mut self, config: TextLayoutConfig) {
        self.config = config;
        self.invalidate();
    }

    /// Show plain text and invalidate.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.content = LabelContent::Plain(text.into());
        self.content_changed();
    }

    /// Append a styled run and invalidate.
    ///
    /// A plain label turns into a rich one; its text becomes the first run.
    pub fn attach(&mut self, run: StyledRun) -> RunId {
        let content = std::mem::replace(&mut self.content, LabelContent::Rich(SpanList::new()));
        let mut spans = match content {
            LabelContent::Rich(spans) => spans,
            LabelContent::Plain(text) => {
                let mut spans = SpanList::new();
                if !text.is_empty() {
                    let _ = spans.attach(StyledRun::text(text));
                }
                spans
            }
        };
        let id = spans.attach(run);
        self.content = LabelContent::Rich(spans);
        self.content_changed();
        id
    }

    /// Remove a styled run and invalidate.
    pub fn detach(&mut self, id: RunId) -> Option<StyledRun> {
        let LabelContent::Rich(spans) = &mut self.content else {
            return None;
        };
        let removed = spans.detach(id);
        if removed.is_some() {
            self.content_changed();
        }
        removed
    }

    /// Mark the layout stale. Layouts prepared before this call will not
    /// be applied.
    pub fn invalidate(&self) {
        let _ = self.generation.fetch_add(1, Ordering::AcqRel);
    }

    /// Invalidate and drop the auto-size memory, which only describes the
    /// old content.
    fn content_changed(&mut self) {
        self.invalidate();
        self.state.get_mut().solver.reset();
    }

    /// Current generation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Whether the stored layout belongs to the current generation.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.state.lock().applied_generation == Some(self.generation())
    }

    /// Rows of the last applied layout.
    #[must_use]
    pub fn lines(&self) -> Arc<[LineRecord]> {
        self.state.lock().lines.clone()
    }

    /// Font size of the last applied layout, in pixels.
    #[must_use]
    pub fn font_size(&self) -> f32 {
        self.state.lock().font_size
    }

    /// Lay out and store the result; returns the content extent.
    #[must_use]
    pub fn measure(&self, width: f32, height: f32, scale: f32) -> Size {
        let prepared = self.prepare(width, height, scale);
        let size = prepared.size;
        let _ = self.apply(prepared);
        size
    }

    /// Store a prepared layout unless the label changed since.
    #[must_use]
    pub fn apply(&self, prepared: PreparedLayout) -> bool {
        let mut state = self.state.lock();
        if prepared.generation != self.generation() {
            return false;
        }
        state.lines = prepared.lines;
        state.font_size = prepared.font_size;
        state.applied_generation = Some(prepared.generation);
        true
    }

    /// Compute a layout for the given box without storing it.
    #[must_use]
    pub fn prepare(&self, width: f32, height: f32, scale: f32) -> PreparedLayout {
        let generation = self.generation();
        let width = sanitize_constraint(width);
        let height = sanitize_constraint(height);
        let scale = sanitize_scale(scale);
        let config = &self.config;

        let text = self.text();
        let request = AutoSizeRequest {
            initial_size: config.font_size * scale,
            mode: config.auto_size,
            floor: (config.font_size_floor() * scale).max(MIN_FONT_SIZE),
            ceiling: config.max_font_size * scale,
            mask: config.measurement_mask(&text),
        };
        let (font_size, result) = {
            let mut state = self.state.lock();
            state.solver.solve(&request, |size, mask| {
                self.decompose_at(size, mask, width, height, scale)
            })
        };

        let mut lines = result.lines;
        if config.trim_trailing_spaces {
            SpanMerger::trim_trailing_spaces(&mut lines, |span| {
                let paint = self.span_appearance(span.run, font_size, scale).paint;
                measure_width(&self.ctx, &paint, &span.text, span.needs_shaping)
            });
        }

        let metrics = self.base_paint(font_size).metrics();
        let extent = Size::new(
            lines.iter().map(|line| line.width).fold(0.0, f32::max),
            LineRenderer::new(config).content_height(&lines, &metrics),
        );
        PreparedLayout {
            generation,
            font_size,
            size: extent,
            was_cut: result.was_cut,
            lines: Arc::from(lines),
        }
    }

    /// Arrange the stored rows in `destination` and emit draw commands.
    ///
    /// Lays out first when the stored layout is stale.
    #[must_use]
    pub fn draw(&self, destination: Rect, scale: f32) -> DrawList {
        if !self.is_valid() {
            let _ = self.measure(destination.width, destination.height, scale);
        }
        let scale = sanitize_scale(scale);
        let (lines, font_size, generation) = {
            let state = self.state.lock();
            (state.lines.clone(), state.font_size, state.applied_generation)
        };

        let renderer = LineRenderer::new(&self.config);
        let mut arranged = lines.to_vec();
        let metrics = self.base_paint(font_size).metrics();
        renderer.arrange(&mut arranged, destination, &metrics, |run| {
            self.span_appearance(run, font_size, scale).paint.metrics()
        });
        let list = renderer.render(&arranged, destination, |run| {
            self.span_appearance(run, font_size, scale)
        });

        let mut state = self.state.lock();
        if state.applied_generation == generation {
            state.lines = Arc::from(arranged);
        }
        list
    }

    /// Let embedded runs draw themselves for the `Embedded` commands of
    /// `list`.
    pub fn render_embedded(&self, list: &DrawList) {
        let LabelContent::Rich(spans) = &self.content else {
            return;
        };
        for command in list.commands() {
            if let DrawCommand::Embedded { run: Some(id), rect } = command
                && let Some(run) = spans.get(*id)
                && let RunContent::Embedded(content) = &run.content
            {
                content.render(*rect);
            }
        }
    }

    /// Paint of the label's own style at `size` pixels.
    fn base_paint(&self, size: f32) -> TextPaint {
        let config = &self.config;
        let face = self
            .ctx
            .resolve_face(config.font_family.as_deref(), config.font_weight, config.italic);
        TextPaint::new(face, size)
            .with_weight(config.font_weight)
            .with_character_spacing(config.character_spacing)
            .with_italic(config.italic)
    }

    fn span_appearance(&self, run: Option<RunId>, size: f32, scale: f32) -> SpanAppearance {
        let base = self.base_paint(size);
        let styled = match (&self.content, run) {
            (LabelContent::Rich(spans), Some(id)) => spans.get(id),
            _ => None,
        };
        match styled {
            Some(run) => SpanAppearance {
                paint: run.paint(&base, self.config.font_family.as_deref(), &self.ctx, scale),
                color: run.style.color,
                underline: run.style.underline,
                strikeout: run.style.strikeout,
            },
            None => SpanAppearance::plain(base),
        }
    }

    /// Apply glyph fallback to `text` and pick the face it is measured with.
    fn prepare_text(&self, text: &str, paint: &TextPaint) -> (String, TextPaint) {
        let config = &self.config;
        if config.auto_font {
            let resolved = resolve_with_fallback(
                text,
                &paint.face,
                self.ctx.resolver(),
                paint.weight,
                paint.italic,
                config.fallback_character,
            );
            let paint = if resolved.face.identity() == paint.face.identity() {
                paint.clone()
            } else {
                TextPaint::new(resolved.face, paint.size)
                    .with_weight(paint.weight)
                    .with_character_spacing(paint.character_spacing)
                    .with_italic(paint.italic)
            };
            return (resolved.text, paint);
        }
        let resolved = glyphs::resolve(text, paint.face.as_ref());
        let (text, _) = glyphs::substitute_unavailable(text, &resolved, config.fallback_character);
        (text, paint.clone())
    }

    fn decompose_at(
        &self,
        size: f32,
        mask: Option<&str>,
        width: f32,
        height: f32,
        scale: f32,
    ) -> DecompositionResult {
        let base = self.base_paint(size);
        let decomposer = LineDecomposer::new(&self.ctx, &self.config);
        let single = |text: &str| {
            let (text, paint) = self.prepare_text(text, &base);
            decomposer.decompose(&DecomposeRequest {
                text: &text,
                paint: &paint,
                first_line_offset: Point::default(),
                max_width: width,
                max_height: height,
                max_lines: self.config.effective_max_lines(),
                needs_shaping: text_needs_shaping(&text),
                context: RunContext::first(None),
            })
        };
        match (mask, &self.content) {
            (Some(mask), _) => single(mask),
            (None, LabelContent::Plain(text)) => single(text),
            (None, LabelContent::Rich(spans)) => {
                self.decompose_runs(spans, &base, &decomposer, width, height, scale)
            }
        }
    }

    /// Top of the last accumulated row, stacked the way the renderer does.
    fn top_of_last(&self, lines: &[LineRecord], base: &TextPaint) -> f32 {
        LineRenderer::new(&self.config)
            .row_tops(lines, &base.metrics())
            .last()
            .copied()
            .unwrap_or(0.0)
    }

    /// Make the last row end with the truncation trail.
    ///
    /// A run continuing a row that is already nearly full may have had no
    /// room for the trail, leaving earlier runs' text untouched. Spans are
    /// dropped from the end until one can be cut so that it and the trail
    /// fit after the spans before it.
    fn restore_trail(&self, lines: &mut [LineRecord], size: f32, width: f32, scale: f32) {
        let trail = self.config.truncation_trail.as_str();
        let Some(last) = lines.last_mut() else {
            return;
        };
        if trail.is_empty() || last.value.ends_with(trail) {
            return;
        }
        while let Some(span) = last.spans.pop() {
            if span.embedded {
                continue;
            }
            let used: f32 = last.spans.iter().map(|span| span.size.width).sum();
            let paint = self.span_appearance(span.run, size, scale).paint;
            let room = width - used;
            let cut = cut_to_fit(&self.ctx, &paint, span.needs_shaping, &span.text, Some(trail), room);
            let Some((text, _)) = cut else {
                continue;
            };
            let measured = measure_text(&self.ctx, &paint, &text, span.needs_shaping);
            last.spans.push(LineSpan {
                needs_bidi: needs_bidi(&text),
                glyphs: measured.glyphs.clone(),
                size: Size::new(measured.width, span.size.height),
                text,
                ..span
            });
            break;
        }
        last.value = last.spans.iter().map(|span| span.text.as_str()).collect();
        last.width = last.spans.iter().map(|span| span.size.width).sum();
    }

    fn decompose_runs(
        &self,
        spans: &SpanList,
        base: &TextPaint,
        decomposer: &LineDecomposer<'_>,
        width: f32,
        height: f32,
        scale: f32,
    ) -> DecompositionResult {
        if spans.is_empty() {
            return decomposer.decompose(&DecomposeRequest {
                text: "",
                paint: base,
                first_line_offset: Point::default(),
                max_width: width,
                max_height: height,
                max_lines: self.config.effective_max_lines(),
                needs_shaping: false,
                context: RunContext::first(None),
            });
        }
        let mut accumulated: Vec<LineRecord> = Vec::new();
        let mut was_cut = false;
        let mut exhausted = false;
        let mut paragraphs = 0;
        let mut runs = 0;

        for (index, run) in spans.iter().enumerate() {
            let paint = run.paint(base, self.config.font_family.as_deref(), &self.ctx, scale);
            let (first_line_offset, context) = match accumulated.last() {
                None => (Point::default(), RunContext::first(Some(run.id()))),
                Some(last) => (
                    Point::new(last.width, 0.0),
                    RunContext {
                        run: Some(run.id()),
                        continues_line: true,
                        row_index: accumulated.len() - 1,
                        top: self.top_of_last(&accumulated, base),
                    },
                ),
            };
            let request = DecomposeRequest {
                text: "",
                paint: &paint,
                first_line_offset,
                max_width: width,
                max_height: height,
                max_lines: self.config.effective_max_lines(),
                needs_shaping: false,
                context,
            };
            let result = match &run.content {
                RunContent::Text(text) => {
                    let (text, paint) = self.prepare_text(text, &paint);
                    decomposer.decompose(&DecomposeRequest {
                        text: &text,
                        paint: &paint,
                        needs_shaping: text_needs_shaping(&text),
                        ..request
                    })
                }
                RunContent::Embedded(content) => {
                    decomposer.decompose_embedded(content.as_ref(), &request, scale)
                }
            };

            runs += 1;
            paragraphs += result.count_paragraphs;
            was_cut |= result.was_cut;
            SpanMerger::append_run(&mut accumulated, result.lines);
            if result.is_exhausted {
                exhausted = true;
                if index + 1 < spans.len() {
                    was_cut = true;
                }
                break;
            }
        }
        SpanMerger::finish(&mut accumulated);
        if exhausted && was_cut && self.config.line_break_mode == LineBreakMode::TailTruncation {
            self.restore_trail(&mut accumulated, base.size, width, scale);
        }

        let renderer = LineRenderer::new(&self.config);
        let content_height = renderer.content_height(&accumulated, &base.metrics());
        let widest = accumulated.iter().map(|line| line.width).fold(0.0, f32::max);
        let slack = |limit: f32, used: f32| {
            if limit.is_finite() {
                (limit - used).max(0.0)
            } else {
                0.0
            }
        };
        DecompositionResult {
            was_cut,
            count_paragraphs: (paragraphs + 1).saturating_sub(runs),
            has_more_vertical_space: slack(height, content_height),
            has_more_horizontal_space: slack(width, widest),
            lines: accumulated,
            ..DecompositionResult::default()
        }
    }
}
