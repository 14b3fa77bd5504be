//! Common utilities for the Quokka text engine.
//!
//! This crate provides shared infrastructure used by all engine components:
//! - **Warning System** - colored terminal output for degraded layouts

pub mod warning;
