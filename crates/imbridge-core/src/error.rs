//! Error types for imbridge.

use thiserror::Error;

/// The main error type for imbridge operations.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The GUI library's font atlas has not been built before the first frame.
    #[error("font atlas not built - build the GUI library's fonts before the first frame")]
    FontAtlasNotBuilt,

    /// `begin_frame` was called twice without an `end_frame` in between.
    #[error("frame already begun - call end_frame() first")]
    FrameAlreadyBegun,

    /// `end_frame` was called without a matching `begin_frame`.
    #[error("no frame in progress - call begin_frame() first")]
    FrameNotBegun,

    /// The bridge was used after `shutdown`.
    #[error("bridge has been shut down")]
    ShutDown,

    /// Rendering error.
    #[error("render error: {0}")]
    Render(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A specialized Result type for imbridge operations.
pub type Result<T> = std::result::Result<T, BridgeError>;
