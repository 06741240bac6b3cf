//! The interface the input bridge expects from the windowing layer.

use glam::Vec2;
use imbridge_core::{MouseButton, MouseCursor};

use crate::error::PlatformError;

/// How the platform cursor behaves over the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CursorMode {
    /// Visible and free.
    #[default]
    Normal,
    /// Invisible while over the window.
    Hidden,
    /// Invisible and captured by the application, e.g. for camera control.
    Disabled,
}

/// A platform cursor created by [`WindowBackend::create_standard_cursor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CursorHandle(pub u32);

/// A window the bridge reads input state from and drives the cursor of.
pub trait WindowBackend {
    /// Window size in logical pixels.
    fn size(&self) -> Vec2;

    /// Framebuffer size in physical pixels.
    fn framebuffer_size(&self) -> Vec2;

    /// Monotonic clock in seconds.
    fn time(&self) -> f64;

    fn is_focused(&self) -> bool;

    /// Live state of a mouse button.
    fn is_mouse_button_down(&self, button: MouseButton) -> bool;

    /// Pointer position in logical window coordinates, if known.
    fn cursor_position(&self) -> Option<Vec2>;

    /// Moves the pointer to a logical window position.
    fn set_cursor_position(&mut self, pos: Vec2) -> Result<(), PlatformError>;

    fn cursor_mode(&self) -> CursorMode;

    fn set_cursor_mode(&mut self, mode: CursorMode);

    /// Creates the platform's standard cursor for `cursor`, or `None` if the
    /// platform has no such shape.
    fn create_standard_cursor(&mut self, cursor: MouseCursor) -> Option<CursorHandle>;

    /// Shows `cursor` while the pointer is over the window.
    fn set_cursor(&mut self, cursor: CursorHandle);

    /// Releases a cursor created by `create_standard_cursor`.
    fn destroy_cursor(&mut self, cursor: CursorHandle);
}
