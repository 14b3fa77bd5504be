//! Rich-text line layout for the Quokka drawing framework.
//!
//! # Scope
//!
//! This crate turns text (or a list of styled runs) plus a box into
//! positioned rows and draw commands:
//!
//! - **Glyph resolution** ([`glyphs`]): scalars to glyph ids, with
//!   availability, one-shot alternate-face retry and fallback substitution
//! - **Shaping classification** ([`shaping`]): which runs need a shaper and
//!   which need bidi handling
//! - **Measurement** ([`measure`], [`cache`]): kerned, spaced, skew-compensated
//!   widths behind a shared LRU cache
//! - **Line decomposition** ([`decompose`]): word/character wrapping, tail
//!   truncation, line and height budgets
//! - **Span merging** ([`merge`]): stitching per-run rows into one list
//! - **Auto-size** ([`autosize`]): stepping the font size to fit or fill a box
//! - **Positioning** ([`render`], [`display_list`]): alignment, justification
//!   and draw-command emission
//! - **Labels** ([`label`]): the stateful surface with generation-stamped
//!   measurement
//!
//! # Not Yet Implemented
//!
//! - Bidi reordering (rows keep logical order; right-to-left spans are
//!   flagged with `LineSpan::needs_bidi`)
//! - Hyphenation
//! - Pixel rasterization (left to the canvas collaborator)

/// Font-size auto-fitting.
pub mod autosize;
/// Shared LRU measurement cache.
pub mod cache;
/// Layout configuration and mode enums.
pub mod config;
/// Process-scoped layout context.
pub mod context;
/// Word-wrap state machine.
pub mod decompose;
/// Draw commands emitted by the renderer.
pub mod display_list;
/// Font collaborator interfaces and paint.
pub mod font;
/// Points, sizes and rectangles.
pub mod geometry;
/// Glyph resolution and fallback.
pub mod glyphs;
/// Stateful text label.
pub mod label;
/// Row records and decomposition results.
pub mod line;
/// Width measurement.
pub mod measure;
/// Joining runs into rows.
pub mod merge;
/// Positioning and draw-command emission.
pub mod render;
/// Complex-script detection.
pub mod shaping;
/// Styled runs and embedded content.
pub mod spans;

pub use autosize::{AutoSizeRequest, AutoSizeSolver};
pub use cache::MeasurementCache;
pub use config::{
    AutoSizeMode, HorizontalAlignment, LineBreakMode, TextLayoutConfig, VerticalAlignment,
};
pub use context::TextContext;
pub use decompose::{DecomposeRequest, LineDecomposer, RunContext};
pub use display_list::{DrawCommand, DrawList};
pub use font::{ApproximateFace, FamilyResolver, FontFace, FontHandle, FontMetrics, TextPaint};
pub use geometry::{Point, Rect, Size};
pub use label::{LabelContent, PreparedLayout, TextLabel};
pub use line::{DecompositionResult, LineRecord, LineSpan};
pub use merge::SpanMerger;
pub use render::{LineRenderer, SpanAppearance};
pub use spans::{EmbeddedContent, RunId, RunStyle, SpanList, StyledRun};
