//! [`WindowBackend`] for winit windows.

use std::sync::Arc;
use std::time::Instant;

use glam::Vec2;
use imbridge_core::{InputEvent, MouseButton, MouseCursor};
use winit::dpi::LogicalPosition;
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::keyboard::PhysicalKey;
use winit::window::{CursorGrabMode, CursorIcon, Window};

use crate::error::PlatformError;
use crate::window::{CursorHandle, CursorMode, WindowBackend};
use crate::winit_keys::{key_from_winit, mouse_button_from_winit, text_characters};

/// Pixels of touchpad scrolling that count as one wheel line.
pub const PIXELS_PER_LINE: f32 = 10.0;

/// The winit cursor icon shown for a GUI cursor kind.
pub fn cursor_icon(cursor: MouseCursor) -> CursorIcon {
    match cursor {
        MouseCursor::Arrow => CursorIcon::Default,
        MouseCursor::TextInput => CursorIcon::Text,
        MouseCursor::ResizeAll => CursorIcon::Move,
        MouseCursor::ResizeNS => CursorIcon::NsResize,
        MouseCursor::ResizeEW => CursorIcon::EwResize,
        MouseCursor::ResizeNESW => CursorIcon::NeswResize,
        MouseCursor::ResizeNWSE => CursorIcon::NwseResize,
        MouseCursor::Hand => CursorIcon::Pointer,
        MouseCursor::NotAllowed => CursorIcon::NotAllowed,
    }
}

/// Horizontal and vertical wheel movement in lines.
#[allow(clippy::cast_possible_truncation)]
pub fn scroll_lines(delta: &MouseScrollDelta) -> (f32, f32) {
    match delta {
        MouseScrollDelta::LineDelta(x, y) => (*x, *y),
        MouseScrollDelta::PixelDelta(pos) => (
            pos.x as f32 / PIXELS_PER_LINE,
            pos.y as f32 / PIXELS_PER_LINE,
        ),
    }
}

/// A winit window plus the input state winit only reports through events.
///
/// Feed every [`WindowEvent`] for the window through
/// [`WinitWindow::handle_window_event`] so focus, pointer position and button
/// state stay current for the per-frame poll.
pub struct WinitWindow {
    window: Arc<Window>,
    start: Instant,
    focused: bool,
    cursor_position: Option<Vec2>,
    buttons: [bool; MouseButton::COUNT],
    cursor_mode: CursorMode,
    cursors: Vec<Option<CursorIcon>>,
}

impl WinitWindow {
    /// Wraps a window.
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            focused: window.has_focus(),
            window,
            start: Instant::now(),
            cursor_position: None,
            buttons: [false; MouseButton::COUNT],
            cursor_mode: CursorMode::Normal,
            cursors: Vec::new(),
        }
    }

    /// The wrapped window.
    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    /// Updates the tracked window state and translates the event for the GUI.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> Vec<InputEvent> {
        let mut events = Vec::new();
        match event {
            WindowEvent::Focused(focused) => self.focused = *focused,
            WindowEvent::CursorMoved { position, .. } => {
                let logical: LogicalPosition<f32> = position.to_logical(self.window.scale_factor());
                self.cursor_position = Some(Vec2::new(logical.x, logical.y));
            }
            WindowEvent::CursorLeft { .. } => self.cursor_position = None,
            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(button) = mouse_button_from_winit(*button) {
                    let pressed = *state == ElementState::Pressed;
                    self.buttons[button.index()] = pressed;
                    events.push(InputEvent::MouseButton { button, pressed });
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let (dx, dy) = scroll_lines(delta);
                events.push(InputEvent::Scroll { dx, dy });
            }
            WindowEvent::KeyboardInput { event, .. } => {
                let pressed = event.state == ElementState::Pressed;
                if let PhysicalKey::Code(code) = event.physical_key {
                    if let Some(key) = key_from_winit(code) {
                        events.push(InputEvent::Key { key, pressed });
                    }
                }
                if pressed {
                    if let Some(text) = &event.text {
                        events.extend(text_characters(text).map(InputEvent::Text));
                    }
                }
            }
            _ => {}
        }
        events
    }
}

impl WindowBackend for WinitWindow {
    fn size(&self) -> Vec2 {
        let size = self
            .window
            .inner_size()
            .to_logical::<f32>(self.window.scale_factor());
        Vec2::new(size.width, size.height)
    }

    #[allow(clippy::cast_precision_loss)]
    fn framebuffer_size(&self) -> Vec2 {
        let size = self.window.inner_size();
        Vec2::new(size.width as f32, size.height as f32)
    }

    fn time(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
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
        self.window
            .set_cursor_position(LogicalPosition::new(pos.x, pos.y))
            .map_err(|e| PlatformError::CursorWarp(e.to_string()))?;
        self.cursor_position = Some(pos);
        Ok(())
    }

    fn cursor_mode(&self) -> CursorMode {
        self.cursor_mode
    }

    fn set_cursor_mode(&mut self, mode: CursorMode) {
        if mode == self.cursor_mode {
            return;
        }
        let grab = match mode {
            CursorMode::Disabled => self
                .window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined)),
            _ if self.cursor_mode == CursorMode::Disabled => {
                self.window.set_cursor_grab(CursorGrabMode::None)
            }
            _ => Ok(()),
        };
        if let Err(err) = grab {
            log::warn!("{}", PlatformError::CursorGrab(err.to_string()));
        }
        self.window.set_cursor_visible(mode == CursorMode::Normal);
        self.cursor_mode = mode;
    }

    #[allow(clippy::cast_possible_truncation)]
    fn create_standard_cursor(&mut self, cursor: MouseCursor) -> Option<CursorHandle> {
        self.cursors.push(Some(cursor_icon(cursor)));
        Some(CursorHandle((self.cursors.len() - 1) as u32))
    }

    fn set_cursor(&mut self, cursor: CursorHandle) {
        if let Some(Some(icon)) = self.cursors.get(cursor.0 as usize) {
            self.window.set_cursor(*icon);
        }
    }

    fn destroy_cursor(&mut self, cursor: CursorHandle) {
        if let Some(slot) = self.cursors.get_mut(cursor.0 as usize) {
            *slot = None;
        }
    }
}
