//! Editor error types.
//!
//! No error here is fatal: every failure is recoverable at the
//! gesture/operation granularity. Operations that target a missing object id
//! are silent no-ops rather than errors; they are expected under undo/delete
//! races between the core and the UI shell.

use thiserror::Error;

/// Errors surfaced by the canvas engine to the host UI.
#[derive(Debug, Error)]
pub enum EditorError {
    /// Unsupported file type, oversized payload, or malformed URL. Nothing
    /// was mutated.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An image failed to load or decode. Nothing was mutated; a previously
    /// loaded background stays untouched.
    #[error("image decode failed: {0}")]
    DecodeFailure(String),

    /// Raster capture failed during export. The view transform is restored
    /// even on this path.
    #[error("export failed: {0}")]
    ExportFailure(String),
}
