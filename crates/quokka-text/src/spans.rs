//! Styled runs: the input of a rich-text label.
//!
//! A label owns an explicit [`SpanList`]. Runs are added with
//! [`SpanList::attach`] and removed with [`SpanList::detach`]; there is no
//! change-notification wiring, the owning label invalidates itself when it
//! performs either call.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::context::TextContext;
use crate::font::TextPaint;
use crate::geometry::{Rect, Size};

/// Identifier of a run within its span list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RunId(pub u32);

/// An RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

/// Inline content that takes part in layout but draws itself.
pub trait EmbeddedContent: Send + Sync + fmt::Debug {
    /// Size the content wants within the given bounds.
    fn measure(&self, max_width: f32, max_height: f32, scale: f32) -> Size;

    /// Draw into `destination`.
    fn render(&self, destination: Rect);
}

/// What a run carries.
#[derive(Debug, Clone)]
pub enum RunContent {
    /// Styled text.
    Text(String),
    /// An inline drawable (icon, image, control).
    Embedded(Arc<dyn EmbeddedContent>),
}

/// Per-run overrides of the label's style. `None` inherits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunStyle {
    /// Font family override.
    pub font_family: Option<String>,
    /// Font size override in logical units; not affected by auto-size.
    pub font_size: Option<f32>,
    /// Weight override.
    pub font_weight: Option<u16>,
    /// Italic override.
    pub italic: Option<bool>,
    /// Text color override.
    pub color: Option<Color>,
    /// Draw an underline.
    pub underline: bool,
    /// Draw a line through the text.
    pub strikeout: bool,
}

impl RunStyle {
    /// Whether the run needs a face other than the label's.
    #[must_use]
    pub const fn overrides_font(&self) -> bool {
        self.font_family.is_some() || self.font_weight.is_some() || self.italic.is_some()
    }
}

/// One run of a rich-text label.
#[derive(Debug, Clone)]
pub struct StyledRun {
    id: RunId,
    /// Content of the run.
    pub content: RunContent,
    /// Style overrides.
    pub style: RunStyle,
}

impl StyledRun {
    /// A text run with inherited style.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            id: RunId(0),
            content: RunContent::Text(text.into()),
            style: RunStyle::default(),
        }
    }

    /// An embedded-content run.
    #[must_use]
    pub fn embedded(content: Arc<dyn EmbeddedContent>) -> Self {
        Self {
            id: RunId(0),
            content: RunContent::Embedded(content),
            style: RunStyle::default(),
        }
    }

    /// Replace the style.
    #[must_use]
    pub fn with_style(mut self, style: RunStyle) -> Self {
        self.style = style;
        self
    }

    /// Id assigned when the run was attached.
    #[must_use]
    pub const fn id(&self) -> RunId {
        self.id
    }

    /// Text of the run, empty for embedded content.
    #[must_use]
    pub fn as_text(&self) -> &str {
        match &self.content {
            RunContent::Text(text) => text,
            RunContent::Embedded(_) => "",
        }
    }

    /// Paint for this run, derived from the label's paint.
    ///
    /// Font overrides are resolved through the context and fall back to
    /// the default face, never failing.
    #[must_use]
    pub fn paint(
        &self,
        base: &TextPaint,
        base_family: Option<&str>,
        ctx: &TextContext,
        scale: f32,
    ) -> TextPaint {
        let weight = self.style.font_weight.unwrap_or(base.weight);
        let italic = self.style.italic.unwrap_or(base.italic);
        let mut paint = if self.style.overrides_font() {
            let family = self.style.font_family.as_deref().or(base_family);
            let face = ctx.resolve_face(family, weight, italic);
            TextPaint::new(face, base.size)
                .with_weight(weight)
                .with_character_spacing(base.character_spacing)
                .with_italic(italic)
        } else {
            base.clone()
        };
        if let Some(size) = self.style.font_size {
            paint = paint.with_size(size * scale);
        }
        paint
    }
}

/// Ordered, explicitly owned list of runs.
#[derive(Debug, Clone, Default)]
pub struct SpanList {
    runs: Vec<StyledRun>,
    next_id: u32,
}

impl SpanList {
    /// Empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            runs: Vec::new(),
            next_id: 0,
        }
    }

    /// Append a run and return the id assigned to it.
    pub fn attach(&mut self, mut run: StyledRun) -> RunId {
        let id = RunId(self.next_id);
        self.next_id += 1;
        run.id = id;
        self.runs.push(run);
        id
    }

    /// Remove a run, returning it if it was attached.
    pub fn detach(&mut self, id: RunId) -> Option<StyledRun> {
        let index = self.runs.iter().position(|run| run.id == id)?;
        Some(self.runs.remove(index))
    }

    /// Look up a run by id.
    #[must_use]
    pub fn get(&self, id: RunId) -> Option<&StyledRun> {
        self.runs.iter().find(|run| run.id == id)
    }

    /// Mutable lookup by id.
    pub fn get_mut(&mut self, id: RunId) -> Option<&mut StyledRun> {
        self.runs.iter_mut().find(|run| run.id == id)
    }

    /// Runs in order.
    pub fn iter(&self) -> impl Iterator<Item = &StyledRun> {
        self.runs.iter()
    }

    /// Number of runs.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.runs.len()
    }

    /// Whether there are no runs.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Concatenated text of all text runs.
    #[must_use]
    pub fn text(&self) -> String {
        self.runs.iter().map(StyledRun::as_text).collect()
    }
}
