//! Font backend for the Quokka text engine.
//!
//! `quokka-text` only sees fonts through its `FontFace` and `FamilyResolver`
//! traits. This crate implements both on top of `fontdue`:
//!
//! - [`FontdueFace`] wraps one parsed font file
//! - [`FontRegistrar`] keeps the faces it has loaded, grouped by family, and
//!   searches well-known system locations for a default sans-serif face
//!
//! Startup code calls [`FontRegistrar::bootstrap`] once and shares the
//! resulting context with every label.

/// Errors raised while loading fonts.
pub mod error;
/// fontdue-backed face.
pub mod face;
/// Family registration and system font discovery.
pub mod registrar;

pub use error::FontError;
pub use face::FontdueFace;
pub use registrar::FontRegistrar;
