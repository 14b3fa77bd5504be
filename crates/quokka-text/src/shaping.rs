//! Complex-script and bidi detection.
//!
//! Pure range lookups. A run containing any scalar that needs shaping is
//! measured as a whole through the shaping engine instead of glyph by
//! glyph, because its glyph count and positions are not 1:1 with its
//! code points.

use std::ops::RangeInclusive;

/// Blocks whose rendering depends on context: joining scripts, scripts
/// with reordering or combining marks, and emoji sequences.
const SHAPING_RANGES: &[RangeInclusive<u32>] = &[
    0x0600..=0x06FF, // Arabic
    0x0700..=0x074F, // Syriac
    0x0750..=0x077F, // Arabic Supplement
    0x0780..=0x07BF, // Thaana
    0x08A0..=0x08FF, // Arabic Extended-A
    0x0900..=0x097F, // Devanagari
    0x0980..=0x09FF, // Bengali
    0x0A00..=0x0A7F, // Gurmukhi
    0x0A80..=0x0AFF, // Gujarati
    0x0B00..=0x0B7F, // Oriya
    0x0B80..=0x0BFF, // Tamil
    0x0C00..=0x0C7F, // Telugu
    0x0C80..=0x0CFF, // Kannada
    0x0D00..=0x0D7F, // Malayalam
    0x0D80..=0x0DFF, // Sinhala
    0x0E00..=0x0E7F, // Thai
    0x0E80..=0x0EFF, // Lao
    0x0F00..=0x0FFF, // Tibetan
    0x1000..=0x109F, // Myanmar
    0x10A0..=0x10FF, // Georgian
    0x1100..=0x11FF, // Hangul Jamo
    0x1200..=0x139F, // Ethiopic + Supplement
    0x1780..=0x17FF, // Khmer
    0x1800..=0x18AF, // Mongolian
    0x200D..=0x200D, // Zero width joiner (emoji sequences)
    0x2600..=0x27BF, // Miscellaneous Symbols + Dingbats
    0xFB50..=0xFDFF, // Arabic Presentation Forms-A
    0xFE70..=0xFEFF, // Arabic Presentation Forms-B
    0x1F1E6..=0x1F1FF, // Regional indicators
    0x1F300..=0x1F5FF, // Misc Symbols and Pictographs
    0x1F3FB..=0x1F3FF, // Fitzpatrick skin-tone modifiers
    0x1F600..=0x1F64F, // Emoticons
    0x1F680..=0x1F6FF, // Transport and Map
    0x1F900..=0x1F9FF, // Supplemental Symbols and Pictographs
    0x1FA70..=0x1FAFF, // Symbols and Pictographs Extended-A
];

/// Right-to-left blocks.
const RTL_RANGES: &[RangeInclusive<u32>] = &[
    0x0590..=0x05FF, // Hebrew
    0x0600..=0x06FF, // Arabic
    0x0700..=0x074F, // Syriac
    0x0750..=0x077F, // Arabic Supplement
    0x0780..=0x07BF, // Thaana
    0x0800..=0x083F, // Samaritan
    0x08A0..=0x08FF, // Arabic Extended-A
    0xFB1D..=0xFB4F, // Hebrew presentation forms
    0xFB50..=0xFDFF, // Arabic Presentation Forms-A
    0xFE70..=0xFEFF, // Arabic Presentation Forms-B
];

fn in_ranges(ranges: &[RangeInclusive<u32>], code_point: u32) -> bool {
    ranges.iter().any(|range| range.contains(&code_point))
}

/// Whether a code point requires complex shaping.
#[must_use]
pub fn needs_shaping(code_point: u32) -> bool {
    in_ranges(SHAPING_RANGES, code_point)
}

/// Whether any scalar of `text` requires complex shaping.
#[must_use]
pub fn text_needs_shaping(text: &str) -> bool {
    text.chars().any(|ch| needs_shaping(u32::from(ch)))
}

/// Whether `text` contains right-to-left scalars.
///
/// Informational only: lines are never reordered.
#[must_use]
pub fn needs_bidi(text: &str) -> bool {
    text.chars().any(|ch| in_ranges(RTL_RANGES, u32::from(ch)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latin_needs_no_shaping() {
        assert!(!text_needs_shaping("Hello, world! 123"));
        assert!(!needs_shaping(u32::from('é')));
    }

    #[test]
    fn test_complex_scripts_need_shaping() {
        assert!(needs_shaping(0x0627)); // Arabic alef
        assert!(needs_shaping(0x0915)); // Devanagari ka
        assert!(needs_shaping(0x0E01)); // Thai ko kai
        assert!(needs_shaping(0x1100)); // Hangul choseong kiyeok
        assert!(text_needs_shaping("abc 😀"));
    }

    #[test]
    fn test_skin_tone_modifier_needs_shaping() {
        assert!(needs_shaping(0x1F3FD));
    }

    #[test]
    fn test_bidi_detection() {
        assert!(needs_bidi("shalom שלום"));
        assert!(needs_bidi("مرحبا"));
        assert!(needs_bidi("\u{0800}"));
        assert!(!needs_bidi("नमस्ते"));
        assert!(!needs_bidi("plain"));
    }
}
