//! Font collaborator interfaces and the paint a run is measured with.
//!
//! Font files, family lookup and shaping live outside this crate. The
//! layout engine only talks to them through [`FontFace`], [`FamilyResolver`]
//! and [`ShapingEngine`], so any backend (fontdue, a platform font service,
//! a test double) can drive the same pipeline.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

/// Smallest font size layout will ever run at.
///
/// Auto-size shrinks towards this floor and stops there; decomposition
/// clamps anything below it so a collapsing size can never loop forever.
pub const MIN_FONT_SIZE: f32 = 1.0;

/// Skew applied when italic is requested from a face that has no italic
/// design of its own.
pub const SYNTHETIC_ITALIC_SKEW: f32 = -0.25;

/// Shared handle to a resolved font face.
pub type FontHandle = Arc<dyn FontFace>;

/// Vertical metrics of a face at a given size, in pixels.
///
/// `descent` is a positive distance below the baseline. Decoration positions
/// are offsets from the baseline, positive downwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FontMetrics {
    /// Distance from the baseline to the top of the tallest glyphs.
    pub ascent: f32,
    /// Distance from the baseline to the bottom of the deepest glyphs.
    pub descent: f32,
    /// Extra gap the font designer recommends between lines.
    pub leading: f32,
    /// Offset of the underline from the baseline.
    pub underline_position: f32,
    /// Offset of the strikeout line from the baseline.
    pub strikeout_position: f32,
    /// Height of lowercase letters.
    pub x_height: f32,
}

impl FontMetrics {
    /// Height of the glyph box: ascent plus descent.
    #[must_use]
    pub fn text_height(&self) -> f32 {
        self.ascent + self.descent
    }

    /// Full line height including the recommended leading.
    #[must_use]
    pub fn line_height(&self) -> f32 {
        self.ascent + self.descent + self.leading
    }
}

/// A resolved font face.
///
/// Implementations must be cheap to query; the measurement cache sits in
/// front of them but glyph lookup still happens on every resolve.
pub trait FontFace: Send + Sync + fmt::Debug {
    /// Stable identity of the resolved face (file + index + weight).
    ///
    /// Measurement results are cached under this key, so two different
    /// faces must never share an identity.
    fn identity(&self) -> &str;

    /// Glyph id for a character, `0` when the face has no glyph for it.
    fn glyph_id(&self, ch: char) -> u16;

    /// Glyph ids for every scalar of `text`.
    fn glyph_ids(&self, text: &str) -> Vec<u16> {
        text.chars().map(|ch| self.glyph_id(ch)).collect()
    }

    /// Horizontal advance of a character at `size` pixels.
    fn advance(&self, ch: char, size: f32) -> f32;

    /// Pair kerning adjustment between two characters at `size` pixels.
    fn kerning(&self, _left: char, _right: char, _size: f32) -> f32 {
        0.0
    }

    /// Vertical metrics at `size` pixels.
    fn metrics(&self, size: f32) -> FontMetrics;

    /// Whether the face is an italic design (no synthetic skew needed).
    fn is_italic(&self) -> bool {
        false
    }
}

/// Maps logical family names to resolved faces.
pub trait FamilyResolver: Send + Sync {
    /// Resolve a family at a weight. `None` lets the caller substitute the
    /// default face; resolution never fails hard.
    fn resolve(&self, family: &str, weight: u16, italic: bool) -> Option<FontHandle>;

    /// Find any known face that has a glyph for `ch`.
    fn match_character(&self, ch: char, weight: u16, italic: bool) -> Option<FontHandle>;
}

/// One glyph produced by a shaping engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShapedGlyph {
    /// Glyph id in the shaped face.
    pub glyph_id: u16,
    /// Pen position of the glyph within the run.
    pub position: f32,
    /// Advance of the glyph.
    pub advance: f32,
}

/// Complex-script shaper for runs flagged as needing shaping.
pub trait ShapingEngine: Send + Sync {
    /// Shape `text` with `face` at `size` pixels.
    fn shape(&self, face: &dyn FontFace, text: &str, size: f32) -> Vec<ShapedGlyph>;
}

/// Everything measurement needs to know about how a run is drawn.
#[derive(Debug, Clone)]
pub struct TextPaint {
    /// Resolved face.
    pub face: FontHandle,
    /// Font size in pixels.
    pub size: f32,
    /// Requested weight (400 = normal, 700 = bold).
    pub weight: u16,
    /// Whether italic was requested.
    pub italic: bool,
    /// Horizontal skew (synthetic italic), `0.0` for upright text.
    pub skew_x: f32,
    /// Advance multiplier applied to every glyph (`1.0` = none).
    pub character_spacing: f32,
}

impl TextPaint {
    /// Upright, regular-weight paint for a face at a size.
    #[must_use]
    pub fn new(face: FontHandle, size: f32) -> Self {
        Self {
            face,
            size: size.max(MIN_FONT_SIZE),
            weight: 400,
            italic: false,
            skew_x: 0.0,
            character_spacing: 1.0,
        }
    }

    /// Request italic; synthesizes a skew when the face is upright.
    #[must_use]
    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self.skew_x = if italic && !self.face.is_italic() {
            SYNTHETIC_ITALIC_SKEW
        } else {
            0.0
        };
        self
    }

    /// Set the requested weight.
    #[must_use]
    pub const fn with_weight(mut self, weight: u16) -> Self {
        self.weight = weight;
        self
    }

    /// Set the character spacing multiplier.
    #[must_use]
    pub const fn with_character_spacing(mut self, spacing: f32) -> Self {
        self.character_spacing = spacing;
        self
    }

    /// Same paint at another size, clamped to [`MIN_FONT_SIZE`].
    #[must_use]
    pub fn with_size(&self, size: f32) -> Self {
        Self {
            size: size.max(MIN_FONT_SIZE),
            ..self.clone()
        }
    }

    /// Metrics of the face at this paint's size.
    #[must_use]
    pub fn metrics(&self) -> FontMetrics {
        self.face.metrics(self.size)
    }
}

/// Deterministic face with fixed advance ratios.
///
/// Every covered character advances `0.6 × size`; line height is `1.2 ×
/// size`. Used when no real font is available and throughout the tests,
/// where exact widths make wrapping decisions predictable.
#[derive(Debug, Clone)]
pub struct ApproximateFace {
    identity: String,
    missing: Vec<char>,
    italic: bool,
}

impl ApproximateFace {
    /// Average advance of a glyph as a fraction of the font size.
    pub const CHAR_WIDTH_RATIO: f32 = 0.6;

    /// A face that covers every printable character.
    #[must_use]
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            missing: Vec::new(),
            italic: false,
        }
    }

    /// A face that reports no glyph for the given characters.
    #[must_use]
    pub fn without(mut self, missing: impl IntoIterator<Item = char>) -> Self {
        self.missing.extend(missing);
        self
    }

    /// Mark the face as an italic design.
    #[must_use]
    pub const fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Wrap in a [`FontHandle`].
    #[must_use]
    pub fn into_handle(self) -> FontHandle {
        Arc::new(self)
    }
}

impl FontFace for ApproximateFace {
    fn identity(&self) -> &str {
        &self.identity
    }

    #[allow(clippy::cast_possible_truncation)]
    fn glyph_id(&self, ch: char) -> u16 {
        if ch.is_control() || self.missing.contains(&ch) {
            return 0;
        }
        // Any non-zero id will do; fold the code point into u16 space.
        ((u32::from(ch) % 0xFFFE) + 1) as u16
    }

    fn advance(&self, ch: char, size: f32) -> f32 {
        if ch.is_control() {
            0.0
        } else {
            size * Self::CHAR_WIDTH_RATIO
        }
    }

    fn metrics(&self, size: f32) -> FontMetrics {
        FontMetrics {
            ascent: size * 0.8,
            descent: size * 0.2,
            leading: size * 0.2,
            underline_position: size * 0.1,
            strikeout_position: -size * 0.3,
            x_height: size * 0.5,
        }
    }

    fn is_italic(&self) -> bool {
        self.italic
    }
}
