//! Glyph resolution: text + face → glyph descriptors.
//!
//! Resolution never fails. Characters the face cannot draw are reported as
//! unavailable and the caller decides whether to substitute a fallback
//! character or look for another face.

use serde::Serialize;

use crate::font::{FamilyResolver, FontFace, FontHandle};

/// One resolved Unicode scalar.
///
/// `source_start`/`source_len` address the scalar in the source buffer:
/// bytes for UTF-8 input, code units for UTF-16 input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GlyphDescriptor {
    /// Unicode scalar value.
    pub code_point: u32,
    /// Glyph id in the face, `0` when missing.
    pub glyph_id: u16,
    /// Offset of the scalar in the source buffer.
    pub source_start: usize,
    /// Length of the scalar in the source buffer.
    pub source_len: usize,
    /// Whether the face can draw this scalar.
    pub is_available: bool,
}

impl GlyphDescriptor {
    /// The scalar as a `char`, U+FFFD for invalid values.
    #[must_use]
    pub fn character(&self) -> char {
        char::from_u32(self.code_point).unwrap_or(char::REPLACEMENT_CHARACTER)
    }
}

/// A glyph with its place inside a span.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PositionedGlyph {
    /// The resolved scalar.
    #[serde(flatten)]
    pub glyph: GlyphDescriptor,
    /// X offset of the glyph within its span.
    pub position: f32,
    /// Measured advance, including character spacing.
    pub width: f32,
}

impl PositionedGlyph {
    /// Right edge of the glyph within its span.
    #[must_use]
    pub fn end(&self) -> f32 {
        self.position + self.width
    }
}

/// Characters that count as available even though fonts have no glyph
/// for them: line breaks, tabs and invisible joiners/selectors.
#[must_use]
pub fn is_always_available(code_point: u32) -> bool {
    matches!(
        code_point,
        0x0009 | 0x000A | 0x000D | 0x200B..=0x200D | 0xFE00..=0xFE0F
    )
}

fn descriptor(face: &dyn FontFace, ch: char, start: usize, len: usize) -> GlyphDescriptor {
    let code_point = u32::from(ch);
    let glyph_id = face.glyph_id(ch);
    GlyphDescriptor {
        code_point,
        glyph_id,
        source_start: start,
        source_len: len,
        is_available: glyph_id != 0 || is_always_available(code_point),
    }
}

/// Resolve every scalar of `text` against `face`.
#[must_use]
pub fn resolve(text: &str, face: &dyn FontFace) -> Vec<GlyphDescriptor> {
    text.char_indices()
        .map(|(start, ch)| descriptor(face, ch, start, ch.len_utf8()))
        .collect()
}

/// Resolve UTF-16 code units, decoding surrogate pairs as one unit.
///
/// Unpaired surrogates degrade to a one-unit unavailable U+FFFD glyph.
#[must_use]
pub fn resolve_utf16(units: &[u16], face: &dyn FontFace) -> Vec<GlyphDescriptor> {
    let mut glyphs = Vec::with_capacity(units.len());
    let mut start = 0;
    for decoded in char::decode_utf16(units.iter().copied()) {
        match decoded {
            Ok(ch) => {
                let len = ch.len_utf16();
                glyphs.push(descriptor(face, ch, start, len));
                start += len;
            }
            Err(_) => {
                glyphs.push(GlyphDescriptor {
                    code_point: u32::from(char::REPLACEMENT_CHARACTER),
                    glyph_id: 0,
                    source_start: start,
                    source_len: 1,
                    is_available: false,
                });
                start += 1;
            }
        }
    }
    glyphs
}

/// Replace every unavailable scalar with `fallback`.
///
/// Returns the rewritten text and how many scalars were replaced.
#[must_use]
pub fn substitute_unavailable(
    text: &str,
    glyphs: &[GlyphDescriptor],
    fallback: char,
) -> (String, usize) {
    if glyphs.iter().all(|glyph| glyph.is_available) {
        return (text.to_string(), 0);
    }
    let mut out = String::with_capacity(text.len());
    let mut replaced = 0;
    for glyph in glyphs {
        if glyph.is_available {
            out.push_str(&text[glyph.source_start..glyph.source_start + glyph.source_len]);
        } else {
            out.push(fallback);
            replaced += 1;
        }
    }
    (out, replaced)
}

/// Text ready for measurement together with the face it resolved against.
#[derive(Debug, Clone)]
pub struct ResolvedText {
    /// Text with unavailable scalars substituted.
    pub text: String,
    /// Face the text will be measured with.
    pub face: FontHandle,
    /// Number of scalars replaced by the fallback character.
    pub substituted: usize,
}

/// Resolve `text`, trying one alternate face before substituting.
///
/// When `resolver` is given and some scalar is missing, the resolver is
/// asked once for a face containing the first missing scalar. If one is
/// found the text is re-resolved against it exactly once and that face is
/// kept, whatever it still lacks gets the fallback character. There is no
/// second round: chasing every missing scalar could bounce between faces.
#[must_use]
pub fn resolve_with_fallback(
    text: &str,
    face: &FontHandle,
    resolver: Option<&dyn FamilyResolver>,
    weight: u16,
    italic: bool,
    fallback: char,
) -> ResolvedText {
    let glyphs = resolve(text, face.as_ref());
    let Some(missing) = glyphs.iter().find(|glyph| !glyph.is_available) else {
        return ResolvedText {
            text: text.to_string(),
            face: face.clone(),
            substituted: 0,
        };
    };

    if let Some(resolver) = resolver
        && let Some(alternate) = resolver.match_character(missing.character(), weight, italic)
        && alternate.identity() != face.identity()
    {
        let retry = resolve(text, alternate.as_ref());
        let (text, substituted) = substitute_unavailable(text, &retry, fallback);
        return ResolvedText {
            text,
            face: alternate,
            substituted,
        };
    }

    let (text, substituted) = substitute_unavailable(text, &glyphs, fallback);
    ResolvedText {
        text,
        face: face.clone(),
        substituted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::ApproximateFace;

    struct OneFace(FontHandle);

    impl FamilyResolver for OneFace {
        fn resolve(&self, _family: &str, _weight: u16, _italic: bool) -> Option<FontHandle> {
            Some(self.0.clone())
        }

        fn match_character(&self, ch: char, _weight: u16, _italic: bool) -> Option<FontHandle> {
            (self.0.glyph_id(ch) != 0).then(|| self.0.clone())
        }
    }

    #[test]
    fn test_resolve_marks_newline_available() {
        let face = ApproximateFace::new("latin");
        let glyphs = resolve("a\nb", &face);
        assert_eq!(glyphs.len(), 3);
        assert_eq!(glyphs[1].glyph_id, 0);
        assert!(glyphs[1].is_available);
        assert_eq!(glyphs[2].source_start, 2);
    }

    #[test]
    fn test_resolve_astral_is_one_unit() {
        let face = ApproximateFace::new("latin");
        let glyphs = resolve("a😀b", &face);
        assert_eq!(glyphs.len(), 3);
        assert_eq!(glyphs[1].source_len, 4);
        assert_eq!(glyphs[2].source_start, 5);
    }

    #[test]
    fn test_resolve_utf16_surrogates() {
        let face = ApproximateFace::new("latin");
        let units: Vec<u16> = "x😀".encode_utf16().collect();
        let glyphs = resolve_utf16(&units, &face);
        assert_eq!(glyphs.len(), 2);
        assert_eq!(glyphs[1].source_len, 2);
        assert_eq!(glyphs[1].code_point, 0x1F600);
    }

    #[test]
    fn test_resolve_utf16_unpaired_surrogate_degrades() {
        let face = ApproximateFace::new("latin");
        let glyphs = resolve_utf16(&[0x0061, 0xD800, 0x0062], &face);
        assert_eq!(glyphs.len(), 3);
        assert!(!glyphs[1].is_available);
        assert_eq!(glyphs[1].source_len, 1);
        assert_eq!(glyphs[2].source_start, 2);
    }

    #[test]
    fn test_substitute_unavailable() {
        let face = ApproximateFace::new("latin").without(['ж']);
        let glyphs = resolve("aжb", &face);
        let (text, replaced) = substitute_unavailable("aжb", &glyphs, '?');
        assert_eq!(text, "a?b");
        assert_eq!(replaced, 1);
    }

    #[test]
    fn test_fallback_face_is_tried_once() {
        let primary = ApproximateFace::new("latin").without(['ж', '★']).into_handle();
        let cyrillic = ApproximateFace::new("cyrillic").without(['★']).into_handle();
        let resolver = OneFace(cyrillic);

        let resolved = resolve_with_fallback("aж★", &primary, Some(&resolver), 400, false, '?');
        assert_eq!(resolved.face.identity(), "cyrillic");
        assert_eq!(resolved.text, "aж?");
        assert_eq!(resolved.substituted, 1);
    }

    #[test]
    fn test_without_resolver_substitutes() {
        let primary = ApproximateFace::new("latin").without(['ж']).into_handle();
        let resolved = resolve_with_fallback("жa", &primary, None, 400, false, '■');
        assert_eq!(resolved.face.identity(), "latin");
        assert_eq!(resolved.text, "■a");
    }
}
