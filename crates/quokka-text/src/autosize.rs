//! Font-size auto-fitting.
//!
//! The solver re-runs decomposition while stepping the font size by
//! [`AUTO_SIZE_STEP`]: down while the text overflows (fit modes), up while
//! there is at least [`AUTO_SIZE_SLACK`] of unused room (fill modes). A
//! grow step that overflows is taken back and ends the search. The floor
//! and the ceiling both stop the loop, and so does a hard iteration cap.

use quokka_common::warning::warn_once;

use crate::config::AutoSizeMode;
use crate::line::{AutoSizeDirection, DecompositionResult};

/// Font-size increment per iteration.
pub const AUTO_SIZE_STEP: f32 = 0.1;

/// Unused room needed before a fill mode grows the text.
pub const AUTO_SIZE_SLACK: f32 = 3.0;

const MAX_ITERATIONS: usize = 10_000;

/// Inputs of one auto-size search.
#[derive(Debug, Clone, Copy)]
pub struct AutoSizeRequest<'a> {
    /// Size the search starts from.
    pub initial_size: f32,
    /// Mode to satisfy.
    pub mode: AutoSizeMode,
    /// Smallest size the search may reach.
    pub floor: f32,
    /// Largest size the search may reach.
    pub ceiling: f32,
    /// Stand-in text to measure instead of the live text.
    pub mask: Option<&'a str>,
}

/// Whether `result` overflows along the axis `mode` works on.
///
/// Horizontally, a paragraph wrapped onto more than one row counts as
/// overflow even when nothing was cut.
#[must_use]
pub fn overflows(mode: AutoSizeMode, result: &DecompositionResult) -> bool {
    if mode.fits_horizontal() || mode.fills_horizontal() {
        result.was_cut || result.lines.len() != result.count_paragraphs
    } else {
        result.was_cut
    }
}

/// Which way the size should move for `result` under `mode`.
#[must_use]
pub fn evaluate(mode: AutoSizeMode, result: &DecompositionResult) -> AutoSizeDirection {
    let overflow = overflows(mode, result);
    if (mode.fits_horizontal() || mode.fits_vertical()) && overflow {
        AutoSizeDirection::Shrink
    } else if !overflow
        && ((mode.fills_horizontal() && result.has_more_horizontal_space >= AUTO_SIZE_SLACK)
            || (mode.fills_vertical() && result.has_more_vertical_space >= AUTO_SIZE_SLACK))
    {
        AutoSizeDirection::Grow
    } else {
        AutoSizeDirection::Idle
    }
}

/// Auto-size driver with memory of its previous answer.
#[derive(Debug, Clone, Default)]
pub struct AutoSizeSolver {
    last_decomposed: Option<(f32, DecompositionResult)>,
    previous_mode: AutoSizeMode,
}

impl AutoSizeSolver {
    /// Fresh solver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the remembered result (the text or constraints changed).
    pub fn reset(&mut self) {
        self.last_decomposed = None;
    }

    /// The last converged size and result.
    #[must_use]
    pub const fn last_decomposed(&self) -> Option<&(f32, DecompositionResult)> {
        self.last_decomposed.as_ref()
    }

    /// Search for a size and return it with its decomposition.
    ///
    /// `decompose(size, text)` lays out at `size`; `text` is the mask to
    /// measure, or `None` for the live text. With a mask the search runs on
    /// the mask only and the live text is laid out once at the end.
    ///
    /// When auto-sizing was just switched off after `FillHorizontal`, the
    /// remembered result is returned unchanged so the text does not jump
    /// back to its configured size.
    pub fn solve(
        &mut self,
        request: &AutoSizeRequest<'_>,
        mut decompose: impl FnMut(f32, Option<&str>) -> DecompositionResult,
    ) -> (f32, DecompositionResult) {
        let previous_mode = std::mem::replace(&mut self.previous_mode, request.mode);
        if request.mode == AutoSizeMode::None {
            if previous_mode == AutoSizeMode::FillHorizontal
                && let Some(remembered) = self.last_decomposed.clone()
            {
                return remembered;
            }
            self.last_decomposed = None;
            return (request.initial_size, decompose(request.initial_size, None));
        }

        let floor = request.floor;
        let ceiling = request.ceiling.max(floor);
        let mut size = request.initial_size.clamp(floor, ceiling);
        let mut result = decompose(size, request.mask);
        let mut shrank = false;
        let mut iterations = 0;

        loop {
            iterations += 1;
            if iterations > MAX_ITERATIONS {
                warn_once("Text", "auto-size did not converge; keeping the last size");
                break;
            }
            match evaluate(request.mode, &result) {
                AutoSizeDirection::Idle => break,
                AutoSizeDirection::Shrink => {
                    if size <= floor {
                        warn_once(
                            "Text",
                            &format!("auto-size reached the minimum font size {floor}; text may overflow"),
                        );
                        break;
                    }
                    size = (size - AUTO_SIZE_STEP).max(floor);
                    result = decompose(size, request.mask);
                    shrank = true;
                }
                AutoSizeDirection::Grow => {
                    if shrank || size >= ceiling {
                        break;
                    }
                    let grown = (size + AUTO_SIZE_STEP).min(ceiling);
                    let candidate = decompose(grown, request.mask);
                    if overflows(request.mode, &candidate) {
                        break;
                    }
                    size = grown;
                    result = candidate;
                }
            }
        }

        #[cfg(feature = "layout-trace")]
        eprintln!(
            "[AUTOSIZE] mode={} initial={} final={size} iterations={iterations}",
            request.mode, request.initial_size
        );

        if request.mask.is_some() {
            result = decompose(size, None);
        }
        result.auto_size_direction = evaluate(request.mode, &result);
        self.last_decomposed = Some((size, result.clone()));
        (size, result)
    }
}
