//! The interface the bridge expects from the immediate-mode GUI library.

use crate::cursor::MouseCursor;
use crate::draw::{DrawData, TextureId};
use crate::input::InputSnapshot;

/// RGBA8 pixels of the GUI library's font atlas.
#[derive(Debug, Clone, Copy)]
pub struct FontAtlasTexture<'a> {
    /// Tightly packed RGBA rows, top to bottom.
    pub pixels: &'a [u8],
    pub width: u32,
    pub height: u32,
}

impl FontAtlasTexture<'_> {
    /// Number of bytes a tightly packed RGBA8 image of this size occupies.
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

/// Text clipboard access the GUI library uses for copy and paste.
pub trait ClipboardBackend {
    /// Returns the current clipboard text, if any.
    fn get_text(&mut self) -> Option<String>;

    /// Replaces the clipboard text.
    fn set_text(&mut self, text: &str);
}

/// A GUI library context owned by the bridge.
///
/// The bridge owns exactly one value implementing this trait and passes it
/// by reference to every operation; nothing relies on library-global state.
pub trait GuiContext {
    /// Whether the font atlas has been finalized.
    fn font_atlas_built(&self) -> bool;

    /// The font atlas pixels, or `None` if the atlas is not built.
    fn font_atlas_rgba32(&mut self) -> Option<FontAtlasTexture<'_>>;

    /// Registers (or clears) the texture the atlas was uploaded to.
    fn set_font_texture_id(&mut self, id: Option<TextureId>);

    /// The texture currently registered for the atlas.
    fn font_texture_id(&self) -> Option<TextureId>;

    /// Hands the library its clipboard capability.
    fn set_clipboard_backend(&mut self, clipboard: Box<dyn ClipboardBackend>);

    /// Begins a frame, consuming the current input snapshot.
    ///
    /// The library clears wheel deltas and drains queued characters.
    fn new_frame(&mut self, input: &mut InputSnapshot);

    /// Cursor requested for the current frame; `None` hides the cursor.
    fn mouse_cursor(&self) -> Option<MouseCursor>;

    /// Ends the frame and returns what to draw.
    ///
    /// The library may write `want_set_mouse_pos`, `mouse_draw_cursor` and
    /// `config_flags` into `input` for the next frame.
    fn render(&mut self, input: &mut InputSnapshot) -> &DrawData;

    /// Tears down the library context. Called once, after GPU objects are gone.
    fn shutdown(&mut self) {}
}
