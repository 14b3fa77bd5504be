//! Text measurement in front of the cache.
//!
//! Unshaped text is positioned glyph by glyph: advance × character
//! spacing, plus pair kerning between neighbours. That kerning is why a
//! line's width is not the sum of its words' widths and the decomposer
//! re-measures the whole candidate line each time.

use std::sync::Arc;

use crate::cache::{MeasureKey, Measurement};
use crate::context::TextContext;
use crate::font::TextPaint;
use crate::glyphs::{self, PositionedGlyph};

/// Extra width reserved for skewed (synthetic italic) text.
///
/// `abs(skew_x) * size` is empirical and kept as-is so layouts stay
/// bit-compatible with existing renderings.
#[must_use]
pub fn skew_compensation(paint: &TextPaint) -> f32 {
    if paint.skew_x == 0.0 {
        0.0
    } else {
        paint.skew_x.abs() * paint.size
    }
}

/// Position every glyph of `text` within its span.
#[must_use]
pub fn position_glyphs(paint: &TextPaint, text: &str) -> Vec<PositionedGlyph> {
    let face = paint.face.as_ref();
    let mut pen = 0.0;
    let mut previous: Option<char> = None;
    glyphs::resolve(text, face)
        .into_iter()
        .map(|glyph| {
            let ch = glyph.character();
            if let Some(previous) = previous {
                pen += face.kerning(previous, ch, paint.size);
            }
            let width = face.advance(ch, paint.size) * paint.character_spacing;
            let positioned = PositionedGlyph {
                glyph,
                position: pen,
                width,
            };
            pen += width;
            previous = Some(ch);
            positioned
        })
        .collect()
}

fn compute(ctx: &TextContext, paint: &TextPaint, text: &str, needs_shaping: bool) -> Measurement {
    if needs_shaping {
        // Shaped runs only have a whole-run width; glyph positions are the
        // shaper's business at draw time.
        let advance = match ctx.shaper() {
            Some(shaper) => {
                shaper
                    .shape(paint.face.as_ref(), text, paint.size)
                    .iter()
                    .map(|glyph| glyph.advance)
                    .sum::<f32>()
                    * paint.character_spacing
            }
            None => position_glyphs(paint, text)
                .last()
                .map_or(0.0, PositionedGlyph::end),
        };
        return Measurement {
            width: advance + skew_compensation(paint),
            glyphs: None,
        };
    }

    let glyphs = position_glyphs(paint, text);
    let advance = glyphs.last().map_or(0.0, PositionedGlyph::end);
    Measurement {
        width: advance + skew_compensation(paint),
        glyphs: Some(glyphs),
    }
}

/// Measure `text`, answering from the context's cache when possible.
#[must_use]
pub fn measure_text(
    ctx: &TextContext,
    paint: &TextPaint,
    text: &str,
    needs_shaping: bool,
) -> Arc<Measurement> {
    if text.is_empty() {
        return Arc::new(Measurement {
            width: 0.0,
            glyphs: (!needs_shaping).then(Vec::new),
        });
    }
    let key = MeasureKey::new(paint, needs_shaping, text);
    if let Some(hit) = ctx.cache().get(&key) {
        return hit;
    }
    ctx.cache().put(key, compute(ctx, paint, text, needs_shaping))
}

/// Width of `text`; shorthand for [`measure_text`] when positions are
/// not needed.
#[must_use]
pub fn measure_width(ctx: &TextContext, paint: &TextPaint, text: &str, needs_shaping: bool) -> f32 {
    measure_text(ctx, paint, text, needs_shaping).width
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{ApproximateFace, FontFace, FontMetrics, ShapedGlyph, ShapingEngine};

    /// Face that pulls "AV" together by one pixel.
    #[derive(Debug)]
    struct Kerned;

    impl FontFace for Kerned {
        fn identity(&self) -> &str {
            "kerned"
        }

        fn glyph_id(&self, _ch: char) -> u16 {
            1
        }

        fn advance(&self, _ch: char, size: f32) -> f32 {
            size / 2.0
        }

        fn kerning(&self, left: char, right: char, _size: f32) -> f32 {
            if (left, right) == ('A', 'V') { -1.0 } else { 0.0 }
        }

        fn metrics(&self, size: f32) -> FontMetrics {
            ApproximateFace::new("m").metrics(size)
        }
    }

    struct FixedShaper;

    impl ShapingEngine for FixedShaper {
        fn shape(&self, _face: &dyn FontFace, text: &str, _size: f32) -> Vec<ShapedGlyph> {
            // Pretend the whole run collapses into one ligature.
            vec![ShapedGlyph {
                glyph_id: 7,
                position: 0.0,
                advance: 3.0 * text.chars().count().min(1) as f32,
            }]
        }
    }

    fn ctx() -> TextContext {
        TextContext::new(ApproximateFace::new("approx").into_handle())
    }

    #[test]
    fn test_glyph_positions_accumulate() {
        let ctx = ctx();
        let paint = TextPaint::new(ctx.default_face().clone(), 10.0);
        let measured = measure_text(&ctx, &paint, "abc", false);
        let glyphs = measured.glyphs.as_ref().expect("unshaped text has glyphs");
        assert_eq!(glyphs.len(), 3);
        assert!((glyphs[2].position - 12.0).abs() < 1e-4);
        assert!((measured.width - 18.0).abs() < 1e-4);
    }

    #[test]
    fn test_kerning_makes_width_non_additive() {
        let ctx = TextContext::new(Arc::new(Kerned));
        let paint = TextPaint::new(ctx.default_face().clone(), 10.0);
        let a = measure_width(&ctx, &paint, "A", false);
        let v = measure_width(&ctx, &paint, "V", false);
        let av = measure_width(&ctx, &paint, "AV", false);
        assert!((a + v - av - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_skew_adds_compensation() {
        let ctx = ctx();
        let upright = TextPaint::new(ctx.default_face().clone(), 10.0);
        let italic = upright.clone().with_italic(true);
        let delta = measure_width(&ctx, &italic, "abc", false) - measure_width(&ctx, &upright, "abc", false);
        assert!((delta - 2.5).abs() < 1e-4);
    }

    #[test]
    fn test_character_spacing_scales_advances() {
        let ctx = ctx();
        let paint = TextPaint::new(ctx.default_face().clone(), 10.0).with_character_spacing(2.0);
        assert!((measure_width(&ctx, &paint, "ab", false) - 24.0).abs() < 1e-4);
    }

    #[test]
    fn test_shaped_text_has_no_glyphs() {
        let ctx = ctx().with_shaper(FixedShaper);
        let paint = TextPaint::new(ctx.default_face().clone(), 10.0);
        let measured = measure_text(&ctx, &paint, "مرحبا", true);
        assert!(measured.glyphs.is_none());
        assert!((measured.width - 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_second_measure_hits_cache() {
        let ctx = ctx();
        let paint = TextPaint::new(ctx.default_face().clone(), 10.0);
        let first = measure_text(&ctx, &paint, "cached", false);
        let second = measure_text(&ctx, &paint, "cached", false);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(ctx.cache().stats().hits, 1);
    }
}
