//! Family registration and system font discovery.

use std::path::Path;

use quokka_common::warning::warn_once;
use quokka_text::{FamilyResolver, FontHandle, TextContext};

use crate::error::FontError;
use crate::face::FontdueFace;

/// Family name the system faces are registered under.
pub const SANS_SERIF: &str = "sans-serif";

/// Family name of the coverage faces used for per-character fallback.
pub const FALLBACK: &str = "fallback";

/// Common system font paths to search for a default (regular) font.
const FONT_SEARCH_PATHS: &[&str] = &[
    // macOS
    "/System/Library/Fonts/Helvetica.ttc",
    "/System/Library/Fonts/SFNS.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    // Linux
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    // Windows
    "C:\\Windows\\Fonts\\arial.ttf",
    "C:\\Windows\\Fonts\\segoeui.ttf",
];

/// System font paths for bold variants.
const FONT_BOLD_SEARCH_PATHS: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/Library/Fonts/Arial Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSansBold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

/// System font paths for italic variants.
const FONT_ITALIC_SEARCH_PATHS: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Arial Italic.ttf",
    "/Library/Fonts/Arial Italic.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Oblique.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Oblique.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Italic.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSansOblique.ttf",
    "C:\\Windows\\Fonts\\ariali.ttf",
];

/// System font paths for bold-italic variants.
const FONT_BOLD_ITALIC_SEARCH_PATHS: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Arial Bold Italic.ttf",
    "/Library/Fonts/Arial Bold Italic.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-BoldOblique.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-BoldOblique.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-BoldItalic.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSansBoldOblique.ttf",
    "C:\\Windows\\Fonts\\arialbi.ttf",
];

/// Wide-coverage faces tried when the default family lacks a glyph.
/// Every file found is registered, not just the first.
const FONT_FALLBACK_SEARCH_PATHS: &[&str] = &[
    "/System/Library/Fonts/Apple Symbols.ttf",
    "/Library/Fonts/Arial Unicode.ttf",
    "/usr/share/fonts/truetype/noto/NotoSansSymbols-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSansSymbols2-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSerif.ttf",
    "/usr/share/fonts/truetype/unifont/unifont.ttf",
    "C:\\Windows\\Fonts\\seguisym.ttf",
];

/// Weight of the regular variant.
const REGULAR: u16 = 400;

/// Weight of the bold variant.
const BOLD: u16 = 700;

/// Penalty for an italic/upright mismatch, larger than any weight distance.
const STYLE_MISMATCH: u32 = 1000;

#[derive(Debug)]
struct Registered {
    family: String,
    weight: u16,
    italic: bool,
    face: FontHandle,
}

impl Registered {
    fn distance(&self, weight: u16, italic: bool) -> u32 {
        let style = if self.italic == italic {
            0
        } else {
            STYLE_MISMATCH
        };
        style + u32::from(self.weight.abs_diff(weight))
    }
}

/// Faces grouped by family, resolvable by weight and style.
///
/// Family names compare case-insensitively. A request picks the face with
/// the same style and the nearest weight, then any style.
#[derive(Debug, Default)]
pub struct FontRegistrar {
    faces: Vec<Registered>,
    searched: Vec<String>,
}

impl FontRegistrar {
    /// Registrar with no faces.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the system sans-serif family and any fallback faces, then build
    /// a context that resolves through this registrar.
    ///
    /// # Errors
    ///
    /// Returns [`FontError::NoDefaultFace`] when no regular face was found
    /// in any of the searched locations.
    pub fn bootstrap() -> Result<TextContext, FontError> {
        let mut registrar = Self::new();
        let _ = registrar.load_system_fonts();
        registrar.into_context()
    }

    /// Add a face under a family name.
    pub fn register(&mut self, family: &str, weight: u16, italic: bool, face: FontHandle) {
        self.faces.push(Registered {
            family: family.to_lowercase(),
            weight,
            italic,
            face,
        });
    }

    /// Load a font file and register it.
    ///
    /// # Errors
    ///
    /// Propagates the read or parse failure of the file.
    pub fn load_file(
        &mut self,
        family: &str,
        path: &Path,
        weight: u16,
        italic: bool,
    ) -> Result<FontHandle, FontError> {
        self.searched.push(path.display().to_string());
        let face = FontdueFace::load(path, weight, italic)?.into_handle();
        self.register(family, weight, italic, face.clone());
        Ok(face)
    }

    /// Search the well-known locations for the sans-serif variants and the
    /// fallback faces. Returns how many faces were registered.
    pub fn load_system_fonts(&mut self) -> usize {
        let before = self.faces.len();
        let variants = [
            (FONT_SEARCH_PATHS, REGULAR, false),
            (FONT_BOLD_SEARCH_PATHS, BOLD, false),
            (FONT_ITALIC_SEARCH_PATHS, REGULAR, true),
            (FONT_BOLD_ITALIC_SEARCH_PATHS, BOLD, true),
        ];
        for (paths, weight, italic) in variants {
            if let Some(face) = self.load_from_paths(paths, weight, italic) {
                self.register(SANS_SERIF, weight, italic, face);
            }
        }
        for path in FONT_FALLBACK_SEARCH_PATHS {
            self.searched.push((*path).to_string());
            if let Ok(face) = FontdueFace::load(Path::new(path), REGULAR, false) {
                self.register(FALLBACK, REGULAR, false, face.into_handle());
            }
        }
        self.faces.len() - before
    }

    /// First face of `paths` that exists and parses.
    fn load_from_paths(&mut self, paths: &[&str], weight: u16, italic: bool) -> Option<FontHandle> {
        for path in paths {
            self.searched.push((*path).to_string());
            if let Ok(face) = FontdueFace::load(Path::new(path), weight, italic) {
                return Some(face.into_handle());
            }
        }
        None
    }

    /// The regular upright face layout falls back to: the first one
    /// registered, or failing that any registered face.
    #[must_use]
    pub fn default_face(&self) -> Option<FontHandle> {
        self.faces
            .iter()
            .find(|entry| entry.weight == REGULAR && !entry.italic)
            .or_else(|| self.faces.first())
            .map(|entry| entry.face.clone())
    }

    /// Number of registered faces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// Whether no face has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Build a context whose default face and family resolver come from
    /// this registrar.
    ///
    /// # Errors
    ///
    /// Returns [`FontError::NoDefaultFace`] when nothing was registered.
    pub fn into_context(self) -> Result<TextContext, FontError> {
        let Some(default_face) = self.default_face() else {
            warn_once("Fonts", "no system font found; text cannot be measured");
            return Err(FontError::NoDefaultFace {
                searched: self.searched,
            });
        };
        Ok(TextContext::new(default_face).with_resolver(self))
    }
}

impl FamilyResolver for FontRegistrar {
    fn resolve(&self, family: &str, weight: u16, italic: bool) -> Option<FontHandle> {
        let family = family.to_lowercase();
        self.faces
            .iter()
            .filter(|entry| entry.family == family)
            .min_by_key(|entry| entry.distance(weight, italic))
            .map(|entry| entry.face.clone())
    }

    fn match_character(&self, ch: char, weight: u16, italic: bool) -> Option<FontHandle> {
        self.faces
            .iter()
            .filter(|entry| entry.face.glyph_id(ch) != 0)
            .min_by_key(|entry| entry.distance(weight, italic))
            .map(|entry| entry.face.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quokka_text::ApproximateFace;

    fn registrar() -> FontRegistrar {
        let mut registrar = FontRegistrar::new();
        registrar.register(
            "Sans",
            BOLD,
            false,
            ApproximateFace::new("sans-bold").without(['ж']).into_handle(),
        );
        registrar.register(
            "Sans",
            REGULAR,
            false,
            ApproximateFace::new("sans").without(['ж']).into_handle(),
        );
        registrar.register(
            "Sans",
            REGULAR,
            true,
            ApproximateFace::new("sans-italic")
                .italic()
                .without(['ж'])
                .into_handle(),
        );
        registrar.register(
            "Cyrillic",
            REGULAR,
            false,
            ApproximateFace::new("cyrillic").into_handle(),
        );
        registrar
    }

    #[test]
    fn test_resolve_nearest_weight_and_style() {
        let registrar = registrar();
        let face = |weight, italic| {
            registrar
                .resolve("sans", weight, italic)
                .map(|face| face.identity().to_string())
        };
        assert_eq!(face(400, false).as_deref(), Some("sans"));
        assert_eq!(face(600, false).as_deref(), Some("sans-bold"));
        assert_eq!(face(700, true).as_deref(), Some("sans-italic"));
        assert!(registrar.resolve("Serif", 400, false).is_none());
    }

    #[test]
    fn test_match_character_finds_covering_face() {
        let registrar = registrar();
        let face = registrar
            .match_character('ж', 400, false)
            .expect("cyrillic covers it");
        assert_eq!(face.identity(), "cyrillic");
        let latin = registrar
            .match_character('a', 700, false)
            .expect("every face covers it");
        assert_eq!(latin.identity(), "sans-bold");
    }

    #[test]
    fn test_default_face_prefers_regular_upright() {
        assert_eq!(
            registrar().default_face().map(|face| face.identity().to_string()),
            Some("sans".to_string())
        );
    }

    #[test]
    fn test_context_resolves_through_registrar() {
        let ctx = registrar().into_context().expect("faces registered");
        assert_eq!(ctx.default_face().identity(), "sans");
        assert_eq!(ctx.resolve_face(Some("Cyrillic"), 400, false).identity(), "cyrillic");
        assert_eq!(ctx.resolve_face(Some("Mono"), 400, false).identity(), "sans");
    }

    #[test]
    fn test_empty_registrar_has_no_default() {
        let mut registrar = FontRegistrar::new();
        let error = registrar
            .load_file(SANS_SERIF, Path::new("/nonexistent/quokka.ttf"), REGULAR, false)
            .expect_err("missing file");
        assert!(matches!(error, FontError::Io(_)));
        assert!(registrar.is_empty());
        match registrar.into_context() {
            Err(FontError::NoDefaultFace { searched }) => {
                assert_eq!(searched, vec!["/nonexistent/quokka.ttf".to_string()]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
