//! Core data model for imbridge.
//!
//! This crate holds the types that cross the boundary between the bridge and
//! the immediate-mode GUI library:
//! - [`InputSnapshot`] the per-frame input state the GUI library reads
//! - [`DrawData`] the per-frame draw commands the GUI library produces
//! - [`GuiContext`] and [`ClipboardBackend`], the library-facing traits
//! - [`BridgeOptions`] and [`BridgeError`]

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// The snapshot mirrors the GUI library's flat input record
#![allow(clippy::struct_excessive_bools)]

pub mod cursor;
pub mod draw;
pub mod error;
pub mod gui;
pub mod headless;
pub mod input;
pub mod options;

pub use cursor::MouseCursor;
pub use draw::{
    ClipRect, DrawCmd, DrawCmdParams, DrawData, DrawIdx, DrawList, DrawVert, TextureId,
    UserCallbackId,
};
pub use error::{BridgeError, Result};
pub use gui::{ClipboardBackend, FontAtlasTexture, GuiContext};
pub use headless::ScriptedGui;
pub use input::{
    BackendFlags, ConfigFlags, InputEvent, InputSnapshot, Key, MouseButton, MOUSE_POS_INVALID,
};
pub use options::BridgeOptions;

// Re-export glam types for convenience
pub use glam::Vec2;
