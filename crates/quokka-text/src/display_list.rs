//! Draw list: the output of the render pass.
//!
//! The renderer does not touch pixels. It emits commands in drawing order
//! and a canvas collaborator executes them front to back.

use serde::Serialize;

use crate::geometry::Rect;
use crate::spans::{Color, RunId};

/// One glyph at its absolute position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlacedGlyph {
    /// Glyph id in the run's face.
    pub glyph_id: u16,
    /// Source scalar.
    pub code_point: u32,
    /// Left edge of the glyph.
    pub x: f32,
    /// Baseline y.
    pub y: f32,
}

/// Kind of text decoration line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DecorationKind {
    /// Below the baseline.
    Underline,
    /// Through the x-height.
    Strikeout,
}

/// A single drawing command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DrawCommand {
    /// Draw positioned glyphs of an unshaped span.
    Glyphs {
        /// Run the glyphs belong to.
        run: Option<RunId>,
        /// Font size in pixels.
        font_size: f32,
        /// Horizontal skew for synthetic italic.
        skew_x: f32,
        /// Fill color, `None` for the canvas default.
        color: Option<Color>,
        /// Glyphs in visual order.
        glyphs: Vec<PlacedGlyph>,
    },

    /// Hand a whole span to the shaping engine at draw time.
    ShapedText {
        /// Run the text belongs to.
        run: Option<RunId>,
        /// Text to shape.
        text: String,
        /// Left edge of the span.
        x: f32,
        /// Baseline y.
        y: f32,
        /// Width reserved for the span.
        width: f32,
        /// Font size in pixels.
        font_size: f32,
        /// Fill color, `None` for the canvas default.
        color: Option<Color>,
    },

    /// Let an embedded run draw itself into a rectangle.
    Embedded {
        /// Run to draw.
        run: Option<RunId>,
        /// Destination rectangle.
        rect: Rect,
    },

    /// Draw an underline or strikeout.
    Decoration {
        /// Run being decorated.
        run: Option<RunId>,
        /// Which line.
        decoration: DecorationKind,
        /// Left edge.
        x: f32,
        /// Center y of the line.
        y: f32,
        /// Length of the line.
        width: f32,
        /// Stroke thickness.
        thickness: f32,
        /// Stroke color, `None` for the canvas default.
        color: Option<Color>,
    },

    /// Clip everything until the matching [`DrawCommand::PopClip`].
    PushClip {
        /// Clip rectangle.
        rect: Rect,
    },

    /// Drop the innermost clip.
    PopClip,
}

/// Drawing commands in painting order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    /// Create an empty draw list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Add a command.
    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    /// Commands in painting order.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of commands.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether nothing will be drawn.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
