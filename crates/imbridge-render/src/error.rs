//! Rendering error types.

use imbridge_core::{BridgeError, UserCallbackId};
use thiserror::Error;

use crate::shader::ShaderStage;

/// Errors that can occur during rendering operations.
#[derive(Error, Debug)]
pub enum RenderError {
    /// A shader stage failed to compile. Carries the driver's info log.
    #[error("{stage} shader compilation failed: {log}")]
    ShaderCompilation { stage: ShaderStage, log: String },

    /// The shader program failed to link. Carries the driver's info log.
    #[error("shader program link failed: {0}")]
    ProgramLink(String),

    /// A vertex attribute the UI shader declares is not active after linking.
    #[error("vertex attribute `{0}` not found in linked program")]
    MissingAttribute(&'static str),

    /// The driver refused to create an object.
    #[error("failed to create {what}: {reason}")]
    CreateObject { what: &'static str, reason: String },

    /// The GUI library has no font atlas to upload.
    #[error("font atlas is not available")]
    FontAtlasUnavailable,

    /// The font atlas pixel buffer does not match its dimensions.
    #[error("font atlas pixel buffer has {actual} bytes, expected {expected}")]
    FontAtlasSize { expected: usize, actual: usize },

    /// The draw data contains a user callback, which this renderer does not run.
    #[error("user draw callback {0:?} is not supported")]
    UnsupportedCallback(UserCallbackId),

    /// The renderer was used after `destroy`.
    #[error("renderer has been destroyed")]
    Destroyed,
}

/// A specialized Result type for rendering operations.
pub type RenderResult<T> = std::result::Result<T, RenderError>;

impl From<RenderError> for BridgeError {
    fn from(err: RenderError) -> Self {
        BridgeError::Render(Box::new(err))
    }
}
