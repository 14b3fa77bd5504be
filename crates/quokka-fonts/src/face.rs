//! A [`FontFace`] backed by a parsed `fontdue` font.
//!
//! Advances come from `Font::metrics()` rather than `Font::rasterize()`, so
//! measuring never generates bitmaps.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use fontdue::{Font, FontSettings};
use quokka_text::{FontFace, FontHandle, FontMetrics};

use crate::error::FontError;

/// Line height as a multiple of the size when the font has no horizontal
/// line metrics.
const FALLBACK_LINE_HEIGHT_RATIO: f32 = 1.2;

/// One face of a font file.
pub struct FontdueFace {
    identity: String,
    font: Font,
    italic: bool,
}

impl FontdueFace {
    /// Parse a face from raw font data.
    ///
    /// `origin` names the data in errors and, together with the collection
    /// index and weight, forms the face identity.
    ///
    /// # Errors
    ///
    /// Returns [`FontError::Parse`] if fontdue rejects the data.
    pub fn from_bytes(
        data: &[u8],
        origin: &Path,
        collection_index: u32,
        weight: u16,
        italic: bool,
    ) -> Result<Self, FontError> {
        let settings = FontSettings {
            collection_index,
            ..FontSettings::default()
        };
        let font = Font::from_bytes(data, settings).map_err(|reason| FontError::Parse {
            path: origin.to_path_buf(),
            reason: reason.to_string(),
        })?;
        Ok(Self {
            identity: format!("{}#{collection_index}@{weight}", origin.display()),
            font,
            italic,
        })
    }

    /// Read and parse the first face of a font file.
    ///
    /// # Errors
    ///
    /// Returns [`FontError::Io`] if the file cannot be read and
    /// [`FontError::Parse`] if it is not a font fontdue understands.
    pub fn load(path: &Path, weight: u16, italic: bool) -> Result<Self, FontError> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data, path, 0, weight, italic)
    }

    /// Wrap in a [`FontHandle`].
    #[must_use]
    pub fn into_handle(self) -> FontHandle {
        Arc::new(self)
    }
}

impl fmt::Debug for FontdueFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontdueFace")
            .field("identity", &self.identity)
            .field("glyphs", &self.font.glyph_count())
            .field("italic", &self.italic)
            .finish()
    }
}

impl FontFace for FontdueFace {
    fn identity(&self) -> &str {
        &self.identity
    }

    fn glyph_id(&self, ch: char) -> u16 {
        if ch.is_control() {
            return 0;
        }
        self.font.lookup_glyph_index(ch)
    }

    fn advance(&self, ch: char, size: f32) -> f32 {
        if ch.is_control() {
            return 0.0;
        }
        self.font.metrics(ch, size).advance_width
    }

    fn kerning(&self, left: char, right: char, size: f32) -> f32 {
        self.font.horizontal_kern(left, right, size).unwrap_or(0.0)
    }

    fn metrics(&self, size: f32) -> FontMetrics {
        let x_height = self.font.metrics('x', size).bounds.height;
        // fontdue reports descent as a negative offset from the baseline.
        let (ascent, descent, leading) = self.font.horizontal_line_metrics(size).map_or_else(
            || {
                let height = size * FALLBACK_LINE_HEIGHT_RATIO;
                (size * 0.8, size * 0.2, height - size)
            },
            |line| (line.ascent, -line.descent, line.line_gap),
        );
        FontMetrics {
            ascent,
            descent,
            leading,
            underline_position: descent * 0.5,
            strikeout_position: -x_height * 0.5,
            x_height,
        }
    }

    fn is_italic(&self) -> bool {
        self.italic
    }
}
