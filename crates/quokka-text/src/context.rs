//! Process-scoped layout state.
//!
//! Everything that would otherwise be a global (default face, font
//! resolver, shaping engine, measurement cache) lives in one
//! [`TextContext`] that callers create explicitly at startup and share by
//! `Arc` with every label.

use std::fmt;

use crate::cache::{DEFAULT_CAPACITY, MeasurementCache};
use crate::font::{FamilyResolver, FontHandle, ShapingEngine};

/// Shared state for all labels of a process (or of one window).
pub struct TextContext {
    default_face: FontHandle,
    resolver: Option<Box<dyn FamilyResolver>>,
    shaper: Option<Box<dyn ShapingEngine>>,
    cache: MeasurementCache,
}

impl TextContext {
    /// Context with only a default face and a default-sized cache.
    ///
    /// The default face is mandatory: it is what every layout falls back
    /// to, so a context without one cannot exist.
    #[must_use]
    pub fn new(default_face: FontHandle) -> Self {
        Self {
            default_face,
            resolver: None,
            shaper: None,
            cache: MeasurementCache::new(DEFAULT_CAPACITY),
        }
    }

    /// Install a family resolver.
    #[must_use]
    pub fn with_resolver(mut self, resolver: impl FamilyResolver + 'static) -> Self {
        self.resolver = Some(Box::new(resolver));
        self
    }

    /// Install a shaping engine for complex scripts.
    #[must_use]
    pub fn with_shaper(mut self, shaper: impl ShapingEngine + 'static) -> Self {
        self.shaper = Some(Box::new(shaper));
        self
    }

    /// Replace the measurement cache with one of another capacity.
    #[must_use]
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache = MeasurementCache::new(capacity);
        self
    }

    /// The face used when nothing else resolves.
    #[must_use]
    pub const fn default_face(&self) -> &FontHandle {
        &self.default_face
    }

    /// Installed family resolver, if any.
    #[must_use]
    pub fn resolver(&self) -> Option<&dyn FamilyResolver> {
        self.resolver.as_deref()
    }

    /// Installed shaping engine, if any.
    #[must_use]
    pub fn shaper(&self) -> Option<&dyn ShapingEngine> {
        self.shaper.as_deref()
    }

    /// Shared measurement cache.
    #[must_use]
    pub const fn cache(&self) -> &MeasurementCache {
        &self.cache
    }

    /// Resolve a family, falling back to the default face.
    #[must_use]
    pub fn resolve_face(&self, family: Option<&str>, weight: u16, italic: bool) -> FontHandle {
        family
            .zip(self.resolver())
            .and_then(|(family, resolver)| resolver.resolve(family, weight, italic))
            .unwrap_or_else(|| self.default_face.clone())
    }
}

impl fmt::Debug for TextContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextContext")
            .field("default_face", &self.default_face.identity())
            .field("resolver", &self.resolver.is_some())
            .field("shaper", &self.shaper.is_some())
            .field("cache", &self.cache)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::ApproximateFace;

    struct Serif(FontHandle);

    impl FamilyResolver for Serif {
        fn resolve(&self, family: &str, _weight: u16, _italic: bool) -> Option<FontHandle> {
            (family == "Serif").then(|| self.0.clone())
        }

        fn match_character(&self, _ch: char, _weight: u16, _italic: bool) -> Option<FontHandle> {
            None
        }
    }

    #[test]
    fn test_unknown_family_falls_back_to_default() {
        let serif = ApproximateFace::new("serif").into_handle();
        let ctx = TextContext::new(ApproximateFace::new("default").into_handle())
            .with_resolver(Serif(serif));

        assert_eq!(ctx.resolve_face(Some("Serif"), 400, false).identity(), "serif");
        assert_eq!(ctx.resolve_face(Some("Mono"), 400, false).identity(), "default");
        assert_eq!(ctx.resolve_face(None, 400, false).identity(), "default");
    }

    #[test]
    fn test_without_resolver_everything_is_default() {
        let ctx = TextContext::new(ApproximateFace::new("default").into_handle());
        assert_eq!(ctx.resolve_face(Some("Serif"), 700, true).identity(), "default");
        assert!(ctx.shaper().is_none());
    }
}
