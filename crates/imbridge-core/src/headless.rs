//! A scripted GUI context for running the bridge without a real GUI library.
//!
//! [`ScriptedGui`] replays queued [`DrawData`] frames and records the input it
//! was handed. Useful for integration tests and for exercising a renderer on
//! CI machines where the real GUI library is not available.

use std::collections::VecDeque;

use glam::Vec2;

use crate::cursor::MouseCursor;
use crate::draw::{DrawData, TextureId};
use crate::gui::{ClipboardBackend, FontAtlasTexture, GuiContext};
use crate::input::{ConfigFlags, InputSnapshot};

struct FontAtlas {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

/// A [`GuiContext`] that replays prepared frames.
#[derive(Default)]
pub struct ScriptedGui {
    atlas: Option<FontAtlas>,
    font_texture: Option<TextureId>,
    clipboard: Option<Box<dyn ClipboardBackend>>,
    cursor: Option<MouseCursor>,
    draw_own_cursor: bool,
    config_flags: ConfigFlags,
    mouse_pos_request: Option<Vec2>,
    queued: VecDeque<DrawData>,
    current: DrawData,
    frames_begun: u64,
    frames_rendered: u64,
    last_input: Option<InputSnapshot>,
    received_text: String,
    shut_down: bool,
}

impl ScriptedGui {
    /// Creates a context with an unbuilt font atlas and an arrow cursor.
    pub fn new() -> Self {
        Self {
            cursor: Some(MouseCursor::Arrow),
            ..Self::default()
        }
    }

    /// Builds an opaque white font atlas of the given size.
    #[must_use]
    pub fn with_font_atlas(mut self, width: u32, height: u32) -> Self {
        self.build_font_atlas(vec![0xFF; width as usize * height as usize * 4], width, height);
        self
    }

    /// Replaces the font atlas with explicit RGBA8 pixels.
    pub fn build_font_atlas(&mut self, pixels: Vec<u8>, width: u32, height: u32) {
        self.atlas = Some(FontAtlas {
            pixels,
            width,
            height,
        });
    }

    /// Drops the font atlas, as when fonts are cleared for a rebuild.
    pub fn clear_font_atlas(&mut self) {
        self.atlas = None;
    }

    /// Queues draw data returned by a later `render` call.
    pub fn queue_frame(&mut self, draw_data: DrawData) {
        self.queued.push_back(draw_data);
    }

    /// Sets the cursor reported by `mouse_cursor`.
    pub fn set_mouse_cursor(&mut self, cursor: Option<MouseCursor>) {
        self.cursor = cursor;
    }

    /// Makes the context claim it draws its own cursor.
    pub fn set_draw_own_cursor(&mut self, enabled: bool) {
        self.draw_own_cursor = enabled;
    }

    /// Sets the config flags written back at the end of each frame.
    pub fn set_config_flags(&mut self, flags: ConfigFlags) {
        self.config_flags = flags;
    }

    /// Asks the platform to move the pointer at the end of the current frame.
    pub fn request_mouse_pos(&mut self, pos: Vec2) {
        self.mouse_pos_request = Some(pos);
    }

    /// Copies text through the injected clipboard capability.
    pub fn copy_to_clipboard(&mut self, text: &str) -> bool {
        match self.clipboard.as_mut() {
            Some(clipboard) => {
                clipboard.set_text(text);
                true
            }
            None => false,
        }
    }

    /// Reads text through the injected clipboard capability.
    pub fn paste_from_clipboard(&mut self) -> Option<String> {
        self.clipboard.as_mut().and_then(|c| c.get_text())
    }

    /// Whether a clipboard capability has been injected.
    pub fn has_clipboard(&self) -> bool {
        self.clipboard.is_some()
    }

    /// The snapshot seen by the most recent `new_frame`.
    pub fn last_input(&self) -> Option<&InputSnapshot> {
        self.last_input.as_ref()
    }

    /// All text characters consumed so far.
    pub fn received_text(&self) -> &str {
        &self.received_text
    }

    /// Number of `new_frame` calls.
    pub fn frames_begun(&self) -> u64 {
        self.frames_begun
    }

    /// Number of `render` calls.
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Whether `shutdown` has run.
    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }
}

impl GuiContext for ScriptedGui {
    fn font_atlas_built(&self) -> bool {
        self.atlas.is_some()
    }

    fn font_atlas_rgba32(&mut self) -> Option<FontAtlasTexture<'_>> {
        self.atlas.as_ref().map(|atlas| FontAtlasTexture {
            pixels: &atlas.pixels,
            width: atlas.width,
            height: atlas.height,
        })
    }

    fn set_font_texture_id(&mut self, id: Option<TextureId>) {
        self.font_texture = id;
    }

    fn font_texture_id(&self) -> Option<TextureId> {
        self.font_texture
    }

    fn set_clipboard_backend(&mut self, clipboard: Box<dyn ClipboardBackend>) {
        self.clipboard = Some(clipboard);
    }

    fn new_frame(&mut self, input: &mut InputSnapshot) {
        self.frames_begun += 1;
        self.last_input = Some(input.clone());
        self.received_text.extend(input.take_input_characters());
        input.mouse_wheel = 0.0;
        input.mouse_wheel_h = 0.0;
        input.want_set_mouse_pos = false;
    }

    fn mouse_cursor(&self) -> Option<MouseCursor> {
        self.cursor
    }

    fn render(&mut self, input: &mut InputSnapshot) -> &DrawData {
        self.frames_rendered += 1;
        self.current = self.queued.pop_front().unwrap_or_default();

        input.mouse_draw_cursor = self.draw_own_cursor;
        input.config_flags = self.config_flags;
        if let Some(pos) = self.mouse_pos_request.take() {
            input.mouse_pos = pos;
            input.want_set_mouse_pos = true;
        }
        &self.current
    }

    fn shutdown(&mut self) {
        self.queued.clear();
        self.clipboard = None;
        self.shut_down = true;
    }
}
