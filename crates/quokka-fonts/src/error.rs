use std::path::PathBuf;

use thiserror::Error;

/// Failure to load a font or to build a context from loaded fonts.
#[derive(Debug, Error)]
pub enum FontError {
    /// None of the searched locations held a usable regular face.
    #[error("no default font face found (searched {} locations)", searched.len())]
    NoDefaultFace {
        /// Every path that was tried.
        searched: Vec<String>,
    },

    /// The file was read but fontdue rejected it.
    #[error("failed to parse font {}: {reason}", path.display())]
    Parse {
        /// Offending file.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },

    /// The file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
