//! A scriptable window for running the input bridge without a display.

use std::collections::HashMap;

use glam::Vec2;
use imbridge_core::{MouseButton, MouseCursor};

use crate::error::PlatformError;
use crate::window::{CursorHandle, CursorMode, WindowBackend};

/// A [`WindowBackend`] whose state is set directly by the caller.
///
/// Its inspectors need the `headless` feature outside this crate's tests.
#[derive(Debug, Clone)]
#[cfg_attr(not(any(test, feature = "headless")), allow(dead_code))]
pub struct HeadlessWindow {
    size: Vec2,
    framebuffer_size: Vec2,
    time: f64,
    focused: bool,
    buttons: [bool; MouseButton::COUNT],
    cursor_position: Option<Vec2>,
    cursor_mode: CursorMode,
    supported_cursors: Vec<MouseCursor>,
    cursors: HashMap<u32, MouseCursor>,
    next_cursor: u32,
    current_cursor: Option<MouseCursor>,
    destroyed_cursors: usize,
    warps: Vec<Vec2>,
    fail_warps: bool,
}

impl Default for HeadlessWindow {
    fn default() -> Self {
        Self {
            size: Vec2::new(1280.0, 720.0),
            framebuffer_size: Vec2::new(1280.0, 720.0),
            time: 0.0,
            focused: true,
            buttons: [false; MouseButton::COUNT],
            cursor_position: None,
            cursor_mode: CursorMode::Normal,
            supported_cursors: MouseCursor::ALL.to_vec(),
            cursors: HashMap::new(),
            next_cursor: 1,
            current_cursor: None,
            destroyed_cursors: 0,
            warps: Vec::new(),
            fail_warps: false,
        }
    }
}

impl HeadlessWindow {
    /// A focused 1280x720 window that supports every cursor shape.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the logical size, keeping a 1:1 framebuffer.
    #[must_use]
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.size = Vec2::new(width, height);
        self.framebuffer_size = self.size;
        self
    }

    /// Sets the framebuffer size independently of the logical size.
    #[must_use]
    pub fn with_framebuffer_size(mut self, width: f32, height: f32) -> Self {
        self.framebuffer_size = Vec2::new(width, height);
        self
    }

    /// Restricts the cursor shapes the window can create.
    #[must_use]
    pub fn with_supported_cursors(mut self, cursors: &[MouseCursor]) -> Self {
        self.supported_cursors = cursors.to_vec();
        self
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    pub fn set_mouse_button(&mut self, button: MouseButton, down: bool) {
        self.buttons[button.index()] = down;
    }

    /// Moves the pointer as the user would; `None` puts it outside the window.
    pub fn move_pointer(&mut self, pos: Option<Vec2>) {
        self.cursor_position = pos;
    }

    /// Advances the clock.
    pub fn advance_time(&mut self, seconds: f64) {
        self.time += seconds;
    }

    /// Makes every later `set_cursor_position` fail.
    pub fn fail_cursor_warps(&mut self, fail: bool) {
        self.fail_warps = fail;
    }
}

/// Inspectors over what the bridge did to the window.
#[cfg(any(test, feature = "headless"))]
impl HeadlessWindow {
    /// The shape currently shown, if any cursor has been set.
    pub fn current_cursor(&self) -> Option<MouseCursor> {
        self.current_cursor
    }

    /// Every successful pointer warp, in order.
    pub fn warps(&self) -> &[Vec2] {
        &self.warps
    }

    /// Cursors created and not yet destroyed.
    pub fn live_cursors(&self) -> usize {
        self.cursors.len()
    }

    /// Number of cursors destroyed so far.
    pub fn destroyed_cursors(&self) -> usize {
        self.destroyed_cursors
    }
}

impl WindowBackend for HeadlessWindow {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn framebuffer_size(&self) -> Vec2 {
        self.framebuffer_size
    }

    fn time(&self) -> f64 {
        self.time
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn is_mouse_button_down(&self, button: MouseButton) -> bool {
        self.buttons[button.index()]
    }

    fn cursor_position(&self) -> Option<Vec2> {
        self.cursor_position
    }

    fn set_cursor_position(&mut self, pos: Vec2) -> Result<(), PlatformError> {
        if self.fail_warps {
            return Err(PlatformError::CursorWarp("not supported".into()));
        }
        self.warps.push(pos);
        self.cursor_position = Some(pos);
        Ok(())
    }

    fn cursor_mode(&self) -> CursorMode {
        self.cursor_mode
    }

    fn set_cursor_mode(&mut self, mode: CursorMode) {
        self.cursor_mode = mode;
    }

    fn create_standard_cursor(&mut self, cursor: MouseCursor) -> Option<CursorHandle> {
        if !self.supported_cursors.contains(&cursor) {
            return None;
        }
        let handle = self.next_cursor;
        self.next_cursor += 1;
        self.cursors.insert(handle, cursor);
        Some(CursorHandle(handle))
    }

    fn set_cursor(&mut self, cursor: CursorHandle) {
        if let Some(shape) = self.cursors.get(&cursor.0) {
            self.current_cursor = Some(*shape);
        }
    }

    fn destroy_cursor(&mut self, cursor: CursorHandle) {
        if self.cursors.remove(&cursor.0).is_some() {
            self.destroyed_cursors += 1;
        }
    }
}
