//! Bounded LRU cache of text measurements.
//!
//! Keys are built from the *resolved* face identity, never a logical family
//! name, so swapping a family produces misses instead of stale hits and the
//! cache never has to be invalidated on font changes.
//!
//! A single mutex guards the LRU structure. Values are immutable `Arc`s:
//! a racing `put` replaces the entry wholesale, so a reader can never see
//! a partially written measurement.

use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use lru::LruCache;
use parking_lot::Mutex;
use serde::Serialize;

use crate::font::TextPaint;
use crate::glyphs::PositionedGlyph;

/// Default number of cached measurements.
pub const DEFAULT_CAPACITY: usize = 2000;

/// Style flags that change advances, stored as bit patterns so the key is
/// `Eq + Hash`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StyleKey {
    size: u32,
    weight: u16,
    italic: bool,
    skew: u32,
    spacing: u32,
}

impl StyleKey {
    /// Extract the style part of a paint.
    #[must_use]
    pub fn from_paint(paint: &TextPaint) -> Self {
        Self {
            size: paint.size.to_bits(),
            weight: paint.weight,
            italic: paint.italic,
            skew: paint.skew_x.to_bits(),
            spacing: paint.character_spacing.to_bits(),
        }
    }
}

/// Composite cache key: face identity + style + shaping flag + text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MeasureKey {
    font: String,
    style: StyleKey,
    needs_shaping: bool,
    text: String,
}

impl MeasureKey {
    /// Key for measuring `text` with `paint`.
    #[must_use]
    pub fn new(paint: &TextPaint, needs_shaping: bool, text: &str) -> Self {
        Self {
            font: paint.face.identity().to_string(),
            style: StyleKey::from_paint(paint),
            needs_shaping,
            text: text.to_string(),
        }
    }
}

/// Width of a measured string and, for unshaped text, where each glyph sits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measurement {
    /// Total advance, including skew compensation.
    pub width: f32,
    /// Per-glyph positions. `None` for shaped text.
    pub glyphs: Option<Vec<PositionedGlyph>>,
}

/// Hit/miss counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that found nothing.
    pub misses: u64,
}

/// Thread-safe bounded LRU of measurements.
pub struct MeasurementCache {
    entries: Mutex<LruCache<MeasureKey, Arc<Measurement>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MeasurementCache {
    /// Cache holding at most `capacity` entries (at least one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Look up a measurement, marking it most recently used.
    pub fn get(&self, key: &MeasureKey) -> Option<Arc<Measurement>> {
        let found = self.entries.lock().get(key).cloned();
        let counter = if found.is_some() {
            &self.hits
        } else {
            &self.misses
        };
        let _ = counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    /// Store a measurement, evicting the least recently used entry when full.
    pub fn put(&self, key: MeasureKey, measurement: Measurement) -> Arc<Measurement> {
        let value = Arc::new(measurement);
        let _ = self.entries.lock().put(key, Arc::clone(&value));
        value
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether the cache holds nothing.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.entries.lock().cap().get()
    }

    /// Drop every entry and reset the counters.
    pub fn clear(&self) {
        self.entries.lock().clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    /// Current hit/miss counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl Default for MeasurementCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl fmt::Debug for MeasurementCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeasurementCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("stats", &self.stats())
            .finish()
    }
}
