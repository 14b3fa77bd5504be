//! Engine warnings with colored terminal output.
//!
//! Provides deduplication so a label that re-measures every frame does not
//! spam the same warning. Used by the layout engine to report degraded
//! results (font size clamps, missing fonts, unmeasurable runs).

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use owo_colors::OwoColorize;

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// A poisoned lock only means another thread panicked mid-insert; the set
/// itself is still usable.
fn warned() -> MutexGuard<'static, Option<HashSet<String>>> {
    WARNED.lock().unwrap_or_else(PoisonError::into_inner)
}

fn key(component: &str, message: &str) -> String {
    format!("[{component}] {message}")
}

/// Warn about a degraded layout (prints once per unique message)
///
/// # Example
/// ```ignore
/// warn_once("Text", "auto-size reached the minimum font size 1.0");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let should_print = warned()
        .get_or_insert_with(HashSet::new)
        .insert(key(component, message));

    if should_print {
        eprintln!("{}", format!("[Quokka {component}] ⚠ {message}").yellow());
    }
}

/// Whether `warn_once` has already reported this message.
#[must_use]
pub fn was_warned(component: &str, message: &str) -> bool {
    warned()
        .as_ref()
        .is_some_and(|set| set.contains(&key(component, message)))
}

/// Clear all recorded warnings (call when swapping fonts or contexts)
pub fn clear_warnings() {
    if let Some(set) = warned().as_mut() {
        set.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warn_once_records_message() {
        warn_once("Test", "recorded message");
        assert!(was_warned("Test", "recorded message"));
        assert!(!was_warned("Test", "never emitted"));
    }

    #[test]
    fn test_component_is_part_of_key() {
        warn_once("Fonts", "shared text");
        assert!(was_warned("Fonts", "shared text"));
        assert!(!was_warned("Other", "shared text"));
    }
}
