//! Platform error types.

use thiserror::Error;

/// Failures reported by the windowing system.
///
/// None of these reach the GUI library; the input bridge logs and drops them.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// The pointer could not be moved.
    #[error("failed to move the cursor: {0}")]
    CursorWarp(String),

    /// The pointer could not be grabbed or released.
    #[error("failed to change cursor grab: {0}")]
    CursorGrab(String),

    /// The system clipboard is not reachable.
    #[error("clipboard error: {0}")]
    Clipboard(String),
}
