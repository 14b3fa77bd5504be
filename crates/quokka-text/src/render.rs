//! Positioning and draw-command emission.
//!
//! [`LineRenderer::arrange`] places rows inside the destination box and
//! fixes their baselines; [`LineRenderer::render`] turns the arranged rows
//! into a [`DrawList`].
//!
//! Justification works on *units*: every glyph of an unshaped span is a
//! unit, a shaped or embedded span is a single unit that moves as a whole.
//! `FillWords` widens the spaces between the first and last visible unit,
//! `FillCharacters` widens every gap between units.

use crate::config::{HorizontalAlignment, TextLayoutConfig, VerticalAlignment};
use crate::display_list::{DecorationKind, DrawCommand, DrawList, PlacedGlyph};
use crate::font::{FontMetrics, TextPaint};
use crate::geometry::{EPSILON, Rect};
use crate::line::{LineRecord, LineSpan};
use crate::spans::{Color, RunId};

/// How one span is drawn.
#[derive(Debug, Clone)]
pub struct SpanAppearance {
    /// Paint the span was measured with.
    pub paint: TextPaint,
    /// Fill color, `None` for the canvas default.
    pub color: Option<Color>,
    /// Draw an underline.
    pub underline: bool,
    /// Draw a strikeout line.
    pub strikeout: bool,
}

impl SpanAppearance {
    /// Undecorated appearance in the default color.
    #[must_use]
    pub const fn plain(paint: TextPaint) -> Self {
        Self {
            paint,
            color: None,
            underline: false,
            strikeout: false,
        }
    }
}

/// Places arranged rows and emits draw commands.
#[derive(Debug, Clone, Copy)]
pub struct LineRenderer<'a> {
    config: &'a TextLayoutConfig,
}

fn is_space(ch: char) -> bool {
    ch == ' ' || ch == '\t'
}

/// One justification unit of a row.
#[derive(Debug, Clone, Copy)]
struct Unit {
    is_space: bool,
}

fn units(line: &LineRecord) -> Vec<Unit> {
    line.spans
        .iter()
        .flat_map(|span| match &span.glyphs {
            Some(glyphs) if !span.embedded => glyphs
                .iter()
                .map(|glyph| Unit {
                    is_space: is_space(glyph.glyph.character()),
                })
                .collect::<Vec<_>>(),
            _ => vec![Unit { is_space: false }],
        })
        .collect()
}

/// Shift of every unit of `line` when `extra` width is spread according to
/// `alignment`. Units are numbered as in [`units`].
fn justification_shifts(line: &LineRecord, alignment: HorizontalAlignment, extra: f32) -> Vec<f32> {
    let units = units(line);
    let Some(first) = units.iter().position(|unit| !unit.is_space) else {
        return vec![0.0; units.len()];
    };
    let last = units.iter().rposition(|unit| !unit.is_space).unwrap_or(first);

    if alignment.fills_characters() {
        if last == first {
            return vec![0.0; units.len()];
        }
        let per_gap = extra / usize_to_f32(last - first);
        return (0..units.len())
            .map(|index| per_gap * usize_to_f32(index.clamp(first, last) - first))
            .collect();
    }

    let interior = units[first..=last].iter().filter(|unit| unit.is_space).count();
    if interior == 0 {
        return vec![0.0; units.len()];
    }
    let per_space = extra / usize_to_f32(interior);
    let mut shift = 0.0;
    units
        .iter()
        .enumerate()
        .map(|(index, unit)| {
            let current = shift;
            if unit.is_space && index > first && index < last {
                shift += per_space;
            }
            current
        })
        .collect()
}

/// Distance from the top of `line` to its baseline. The tallest ascent and
/// deepest descent of the spans are centered in the row; embedded content
/// sits on the baseline. Rows without spans use `base`.
fn baseline_offset(
    line: &LineRecord,
    base: &FontMetrics,
    span_metrics: &impl Fn(Option<RunId>) -> FontMetrics,
) -> f32 {
    let (ascent, descent) = if line.spans.is_empty() {
        (base.ascent, base.descent)
    } else {
        line.spans.iter().fold((0.0_f32, 0.0_f32), |(ascent, descent), span| {
            if span.embedded {
                (ascent.max(span.size.height), descent)
            } else {
                let metrics = span_metrics(span.run);
                (ascent.max(metrics.ascent), descent.max(metrics.descent))
            }
        })
    };
    (line.height - ascent - descent) / 2.0 + ascent
}

/// Width of `line` up to the end of its last non-space unit. Trailing
/// spaces hang past the box edge on justified rows.
fn visible_width(line: &LineRecord) -> f32 {
    let mut pen = 0.0;
    let mut visible = 0.0;
    for span in &line.spans {
        match &span.glyphs {
            Some(glyphs) if !span.embedded => {
                let last = glyphs.iter().rev().find(|glyph| !is_space(glyph.glyph.character()));
                if let Some(glyph) = last {
                    visible = pen + glyph.end();
                }
            }
            _ => visible = pen + span.size.width,
        }
        pen += span.size.width;
    }
    visible
}

#[allow(clippy::cast_precision_loss)]
const fn usize_to_f32(value: usize) -> f32 {
    value as f32
}

impl<'a> LineRenderer<'a> {
    /// Renderer for a configuration.
    #[must_use]
    pub const fn new(config: &'a TextLayoutConfig) -> Self {
        Self { config }
    }

    fn line_height(&self, metrics: &FontMetrics) -> f32 {
        if self.config.uniform_line_height {
            metrics.line_height()
        } else {
            metrics.text_height()
        }
    }

    /// Whether `line` gets its leftover width spread out.
    fn justifies(&self, line: &LineRecord) -> bool {
        let alignment = self.config.horizontal_alignment;
        alignment.is_justified() && (alignment.justifies_last_line() || !line.is_last_in_paragraph)
    }

    /// Extra space before every paragraph but the first.
    #[must_use]
    pub fn paragraph_gap(&self, metrics: &FontMetrics) -> f32 {
        self.line_height(metrics) * self.config.paragraph_spacing
    }

    /// Top of every row relative to the first, stacked by line spacing
    /// with the paragraph gap before new paragraphs.
    #[must_use]
    pub fn row_tops(&self, lines: &[LineRecord], metrics: &FontMetrics) -> Vec<f32> {
        let gap = self.paragraph_gap(metrics);
        let mut top = 0.0;
        let mut tops = Vec::with_capacity(lines.len());
        for (index, line) in lines.iter().enumerate() {
            if index > 0 {
                top += lines[index - 1].height * self.config.line_spacing;
                if line.is_new_paragraph {
                    top += gap;
                }
            }
            tops.push(top);
        }
        tops
    }

    /// Total height of the rows once stacked.
    #[must_use]
    pub fn content_height(&self, lines: &[LineRecord], metrics: &FontMetrics) -> f32 {
        self.row_tops(lines, metrics)
            .last()
            .zip(lines.last())
            .map_or(0.0, |(top, line)| top + line.height)
    }

    /// Fill in `bounds` and `baseline` of every row for `destination`.
    ///
    /// Justified rows span the full width; the renderer spreads the
    /// difference between that and the row's measured width. `span_metrics`
    /// maps a span's run to the metrics of its paint so a row's baseline
    /// clears its tallest run.
    pub fn arrange(
        &self,
        lines: &mut [LineRecord],
        destination: Rect,
        metrics: &FontMetrics,
        span_metrics: impl Fn(Option<RunId>) -> FontMetrics,
    ) {
        let tops = self.row_tops(lines, metrics);
        let content = tops
            .last()
            .zip(lines.last())
            .map_or(0.0, |(top, line)| top + line.height);
        let origin = destination.y
            + match self.config.vertical_alignment {
                VerticalAlignment::Start => 0.0,
                VerticalAlignment::Center => (destination.height - content) / 2.0,
                VerticalAlignment::End => destination.height - content,
            };

        for (line, top) in lines.iter_mut().zip(tops) {
            let top = origin + top;
            let x = match self.config.horizontal_alignment {
                HorizontalAlignment::Center => destination.x + (destination.width - line.width) / 2.0,
                HorizontalAlignment::End => destination.right() - line.width,
                _ => destination.x,
            };
            line.bounds = Rect::new(x, top, line.width, line.height);
            line.baseline = top + baseline_offset(line, metrics, &span_metrics);
        }
    }

    /// Emit draw commands for arranged rows.
    ///
    /// `appearance` maps a span's run to its paint and decorations.
    #[must_use]
    pub fn render(
        &self,
        lines: &[LineRecord],
        destination: Rect,
        appearance: impl Fn(Option<RunId>) -> SpanAppearance,
    ) -> DrawList {
        let mut list = DrawList::new();
        let overflows = lines.iter().any(|line| {
            line.bounds.x < destination.x - EPSILON
                || line.bounds.right() > destination.right() + EPSILON
                || line.bounds.bottom() > destination.bottom() + EPSILON
        });
        if overflows {
            list.push(DrawCommand::PushClip { rect: destination });
        }

        for line in lines {
            let shifts = if self.justifies(line) {
                let extra = destination.width - visible_width(line);
                if extra > EPSILON {
                    justification_shifts(line, self.config.horizontal_alignment, extra)
                } else {
                    Vec::new()
                }
            } else {
                Vec::new()
            };
            let shift_of = |unit: usize| shifts.get(unit).copied().unwrap_or(0.0);

            let mut pen = line.bounds.x;
            let mut unit = 0;
            for span in &line.spans {
                let look = appearance(span.run);
                let start_shift = shift_of(unit);
                let drawn_width;
                if span.embedded {
                    let rect = Rect::new(
                        pen + start_shift,
                        line.baseline - span.size.height,
                        span.size.width,
                        span.size.height,
                    );
                    list.push(DrawCommand::Embedded {
                        run: span.run,
                        rect,
                    });
                    unit += 1;
                    drawn_width = span.size.width;
                } else if let Some(glyphs) = &span.glyphs {
                    let placed = glyphs
                        .iter()
                        .enumerate()
                        .map(|(offset, glyph)| PlacedGlyph {
                            glyph_id: glyph.glyph.glyph_id,
                            code_point: glyph.glyph.code_point,
                            x: pen + glyph.position + shift_of(unit + offset),
                            y: line.baseline,
                        })
                        .collect::<Vec<_>>();
                    unit += glyphs.len();
                    drawn_width = span.size.width + shift_of(unit.saturating_sub(1)) - start_shift;
                    if !placed.is_empty() {
                        list.push(DrawCommand::Glyphs {
                            run: span.run,
                            font_size: look.paint.size,
                            skew_x: look.paint.skew_x,
                            color: look.color,
                            glyphs: placed,
                        });
                    }
                } else {
                    list.push(DrawCommand::ShapedText {
                        run: span.run,
                        text: span.text.clone(),
                        x: pen + start_shift,
                        y: line.baseline,
                        width: span.size.width,
                        font_size: look.paint.size,
                        color: look.color,
                    });
                    unit += 1;
                    drawn_width = span.size.width;
                }

                if !span.embedded {
                    Self::decorate(&mut list, span, &look, pen + start_shift, line.baseline, drawn_width);
                }
                pen += span.size.width;
            }
        }

        if overflows {
            list.push(DrawCommand::PopClip);
        }
        list
    }

    fn decorate(
        list: &mut DrawList,
        span: &LineSpan,
        look: &SpanAppearance,
        x: f32,
        baseline: f32,
        width: f32,
    ) {
        if width <= 0.0 {
            return;
        }
        let metrics = look.paint.metrics();
        let thickness = (look.paint.size / 18.0).max(1.0);
        let mut line = |decoration, offset: f32| {
            list.push(DrawCommand::Decoration {
                run: span.run,
                decoration,
                x,
                y: baseline + offset,
                width,
                thickness,
                color: look.color,
            });
        };
        if look.underline {
            line(DecorationKind::Underline, metrics.underline_position);
        }
        if look.strikeout {
            line(DecorationKind::Strikeout, metrics.strikeout_position);
        }
    }
}
