//! Input bridge for imbridge.
//!
//! This crate turns window events and per-frame window state into the GUI
//! library's [`imbridge_core::InputSnapshot`]:
//! - [`WindowBackend`], the window surface the bridge polls and drives
//! - [`InputBridge`], event recording plus the per-frame poll
//! - [`CursorTable`], one platform cursor per GUI cursor kind
//! - [`WinitWindow`] and [`SystemClipboard`] for desktop hosts
//! - [`HeadlessWindow`] for tests

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod clipboard;
pub mod cursor;
pub mod error;
pub mod headless;
pub mod input_bridge;
pub mod window;
pub mod winit_keys;
pub mod winit_window;

pub use clipboard::SystemClipboard;
pub use cursor::CursorTable;
pub use error::PlatformError;
pub use headless::HeadlessWindow;
pub use input_bridge::InputBridge;
pub use window::{CursorHandle, CursorMode, WindowBackend};
pub use winit_keys::{key_from_winit, mouse_button_from_winit, text_characters};
pub use winit_window::{cursor_icon, scroll_lines, WinitWindow, PIXELS_PER_LINE};

// Re-export winit for hosts building their own event loop
pub use winit;
