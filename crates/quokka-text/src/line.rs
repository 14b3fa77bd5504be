//! Line records: the output of decomposition and the input of drawing.

use serde::Serialize;

use crate::geometry::{Rect, Size};
use crate::glyphs::PositionedGlyph;
use crate::spans::RunId;

/// One contiguous styled chunk of a line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSpan {
    /// Text of the chunk, empty for embedded content.
    pub text: String,
    /// Run this chunk came from; `None` for plain-text labels.
    pub run: Option<RunId>,
    /// Glyph positions; `None` for shaped text and embedded content.
    pub glyphs: Option<Vec<PositionedGlyph>>,
    /// Whether the chunk goes through the shaping engine.
    pub needs_shaping: bool,
    /// Whether the chunk holds right-to-left text. Rows are not reordered;
    /// drawing code decides what to do with flagged spans.
    pub needs_bidi: bool,
    /// Whether the chunk is an embedded drawable.
    pub embedded: bool,
    /// Measured extent.
    pub size: Size,
}

impl LineSpan {
    /// Whether the span takes up any horizontal space.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.size.width > 0.0
    }
}

/// One visual row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineRecord {
    /// Text of the row.
    pub value: String,
    /// Styled chunks in visual order.
    pub spans: Vec<LineSpan>,
    /// Sum of the visible spans' widths.
    pub width: f32,
    /// Row height before line spacing.
    pub height: f32,
    /// First row of a paragraph.
    pub is_new_paragraph: bool,
    /// Last row of a paragraph.
    pub is_last_in_paragraph: bool,
    /// Position in the destination; only set by the render pass.
    pub bounds: Rect,
    /// Baseline y in the destination; only set by the render pass.
    pub baseline: f32,
}

impl LineRecord {
    /// A row without content. Used for blank paragraphs and as the anchor
    /// an empty run leaves for the merger.
    #[must_use]
    pub fn placeholder(height: f32, is_new_paragraph: bool) -> Self {
        Self {
            value: String::new(),
            spans: Vec::new(),
            width: 0.0,
            height,
            is_new_paragraph,
            is_last_in_paragraph: false,
            bounds: Rect::default(),
            baseline: 0.0,
        }
    }

    /// A row holding one span.
    #[must_use]
    pub fn with_span(span: LineSpan, height: f32, is_new_paragraph: bool) -> Self {
        Self {
            value: span.text.clone(),
            width: span.size.width,
            height: height.max(span.size.height),
            spans: vec![span],
            is_new_paragraph,
            is_last_in_paragraph: false,
            bounds: Rect::default(),
            baseline: 0.0,
        }
    }

    /// Whether any span draws something.
    #[must_use]
    pub fn has_visible_content(&self) -> bool {
        !self.value.is_empty() || self.spans.iter().any(LineSpan::is_visible)
    }
}

/// Direction the auto-size loop should move next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum AutoSizeDirection {
    /// Converged, or auto-size is off.
    #[default]
    Idle,
    /// Text overflows; make it smaller.
    Shrink,
    /// There is slack to grow into.
    Grow,
}

/// Everything one decomposition pass produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DecompositionResult {
    /// Rows in order.
    pub lines: Vec<LineRecord>,
    /// Something was truncated or overflowed.
    pub was_cut: bool,
    /// Paragraphs in the source text before wrapping.
    pub count_paragraphs: usize,
    /// Height left unused (0 when unconstrained).
    pub has_more_vertical_space: f32,
    /// Width left beside the widest row (0 when unconstrained).
    pub has_more_horizontal_space: f32,
    /// What the auto-size loop should do with this result.
    pub auto_size_direction: AutoSizeDirection,
    /// The row/height budget is used up; later runs must not add text.
    pub is_exhausted: bool,
}

impl DecompositionResult {
    /// Widest row.
    #[must_use]
    pub fn max_line_width(&self) -> f32 {
        self.lines.iter().map(|line| line.width).fold(0.0, f32::max)
    }
}
