//! Draw data produced by the GUI library each frame.
//!
//! A [`DrawData`] is an ordered list of [`DrawList`] batches. Each batch owns
//! one vertex and one index buffer and is split into [`DrawCmd`]s by clip
//! rectangle and texture changes. Draw data lives for one frame only.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// Index type used by draw lists.
pub type DrawIdx = u16;

/// One UI vertex: position, texture coordinate and packed RGBA color.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct DrawVert {
    pub pos: [f32; 2],
    pub uv: [f32; 2],
    pub col: [u8; 4],
}

impl DrawVert {
    /// Creates a vertex.
    pub fn new(pos: [f32; 2], uv: [f32; 2], col: [u8; 4]) -> Self {
        Self { pos, uv, col }
    }
}

/// Opaque texture identifier shared between the GUI library and the renderer.
///
/// For the OpenGL renderer this is the texture object name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TextureId(u64);

impl TextureId {
    /// Wraps a raw identifier.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier.
    pub const fn id(self) -> u64 {
        self.0
    }
}

impl From<u32> for TextureId {
    fn from(id: u32) -> Self {
        Self(u64::from(id))
    }
}

/// Identifier of a user callback registered with the GUI library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserCallbackId(pub u64);

/// Axis-aligned rectangle as `(min_x, min_y, max_x, max_y)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClipRect {
    pub min: Vec2,
    pub max: Vec2,
}

impl ClipRect {
    /// Creates a clip rectangle from `[min_x, min_y, max_x, max_y]`.
    pub fn from_array(rect: [f32; 4]) -> Self {
        Self {
            min: Vec2::new(rect[0], rect[1]),
            max: Vec2::new(rect[2], rect[3]),
        }
    }

    /// Projects the rectangle from display space into framebuffer pixels.
    #[must_use]
    pub fn to_framebuffer(self, display_pos: Vec2, framebuffer_scale: Vec2) -> Self {
        Self {
            min: (self.min - display_pos) * framebuffer_scale,
            max: (self.max - display_pos) * framebuffer_scale,
        }
    }

    /// Scissor box for a rectangle already in framebuffer pixels.
    ///
    /// Returns `None` when the rectangle is empty or lies entirely outside
    /// `[0, fb_width) x [0, fb_height)`. The box has a bottom-left origin.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn scissor_box(self, fb_width: i32, fb_height: i32) -> Option<[i32; 4]> {
        let (fb_w, fb_h) = (fb_width as f32, fb_height as f32);
        if self.max.x <= self.min.x || self.max.y <= self.min.y {
            return None;
        }
        if self.min.x >= fb_w || self.min.y >= fb_h || self.max.x < 0.0 || self.max.y < 0.0 {
            return None;
        }

        Some([
            self.min.x as i32,
            (fb_h - self.max.y) as i32,
            (self.max.x - self.min.x) as i32,
            (self.max.y - self.min.y) as i32,
        ])
    }
}

/// Parameters of an indexed draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCmdParams {
    /// Clip rectangle in display space.
    pub clip_rect: ClipRect,
    /// Texture sampled by this draw.
    pub texture_id: TextureId,
    /// Offset added to every index.
    pub vtx_offset: usize,
    /// First index in the list's index buffer.
    pub idx_offset: usize,
}

/// One command in a draw list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCmd {
    /// Draw `count` indices as triangles.
    Elements { count: usize, params: DrawCmdParams },
    /// Re-apply the renderer's UI state.
    ResetRenderState,
    /// Invoke a user callback. Renderers may refuse these.
    UserCallback(UserCallbackId),
}

/// A batch of vertices and indices with the commands that draw them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    pub vtx_buffer: Vec<DrawVert>,
    pub idx_buffer: Vec<DrawIdx>,
    pub commands: Vec<DrawCmd>,
}

impl DrawList {
    /// Creates an empty draw list.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Everything the GUI library produced for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawData {
    /// Top-left of the display area in display space.
    pub display_pos: Vec2,
    /// Size of the display area in display space.
    pub display_size: Vec2,
    /// Framebuffer pixels per display unit.
    pub framebuffer_scale: Vec2,
    /// Batches in draw order.
    pub draw_lists: Vec<DrawList>,
}

impl Default for DrawData {
    fn default() -> Self {
        Self {
            display_pos: Vec2::ZERO,
            display_size: Vec2::ZERO,
            framebuffer_scale: Vec2::ONE,
            draw_lists: Vec::new(),
        }
    }
}

impl DrawData {
    /// Returns whether there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.draw_lists.is_empty()
    }

    /// Framebuffer size in pixels, truncated toward zero.
    #[allow(clippy::cast_possible_truncation)]
    pub fn framebuffer_size(&self) -> (i32, i32) {
        let size = self.display_size * self.framebuffer_scale;
        (size.x as i32, size.y as i32)
    }

    /// Total number of vertices across all lists.
    pub fn total_vtx_count(&self) -> usize {
        self.draw_lists.iter().map(|l| l.vtx_buffer.len()).sum()
    }

    /// Total number of indices across all lists.
    pub fn total_idx_count(&self) -> usize {
        self.draw_lists.iter().map(|l| l.idx_buffer.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_draw_vert_layout() {
        assert_eq!(std::mem::size_of::<DrawVert>(), 20);
        assert_eq!(std::mem::offset_of!(DrawVert, pos), 0);
        assert_eq!(std::mem::offset_of!(DrawVert, uv), 8);
        assert_eq!(std::mem::offset_of!(DrawVert, col), 16);
    }

    #[test]
    fn test_clip_rect_applies_offset_and_scale() {
        let rect = ClipRect::from_array([110.0, 60.0, 150.0, 80.0]);
        let fb = rect.to_framebuffer(Vec2::new(100.0, 50.0), Vec2::splat(2.0));
        assert_eq!(fb.min, Vec2::new(20.0, 20.0));
        assert_eq!(fb.max, Vec2::new(100.0, 60.0));
    }

    #[test]
    fn test_scissor_box_flips_y() {
        let rect = ClipRect::from_array([10.0, 20.0, 110.0, 70.0]);
        assert_eq!(rect.scissor_box(800, 600), Some([10, 530, 100, 50]));
    }

    #[test]
    fn test_scissor_box_rejects_outside_and_degenerate() {
        assert_eq!(ClipRect::from_array([800.0, 0.0, 900.0, 10.0]).scissor_box(800, 600), None);
        assert_eq!(ClipRect::from_array([0.0, 600.0, 10.0, 700.0]).scissor_box(800, 600), None);
        assert_eq!(ClipRect::from_array([-50.0, 0.0, -1.0, 10.0]).scissor_box(800, 600), None);
        assert_eq!(ClipRect::from_array([0.0, -50.0, 10.0, -1.0]).scissor_box(800, 600), None);
        assert_eq!(ClipRect::from_array([5.0, 5.0, 5.0, 10.0]).scissor_box(800, 600), None);
    }

    #[test]
    fn test_partially_visible_rect_is_kept() {
        let rect = ClipRect::from_array([-10.0, -10.0, 10.0, 10.0]);
        assert_eq!(rect.scissor_box(800, 600), Some([-10, 590, 20, 20]));
    }

    #[test]
    fn test_framebuffer_size_uses_scale() {
        let data = DrawData {
            display_size: Vec2::new(640.0, 480.0),
            framebuffer_scale: Vec2::new(1.5, 2.0),
            ..DrawData::default()
        };
        assert_eq!(data.framebuffer_size(), (960, 960));
    }

    proptest! {
        #[test]
        fn prop_scissor_box_stays_inside_framebuffer_bounds(
            x0 in -2000.0f32..2000.0, y0 in -2000.0f32..2000.0,
            w in 0.0f32..2000.0, h in 0.0f32..2000.0,
            fb_w in 1i32..2000, fb_h in 1i32..2000,
        ) {
            let rect = ClipRect::from_array([x0, y0, x0 + w, y0 + h]);
            if let Some([x, _, sw, sh]) = rect.scissor_box(fb_w, fb_h) {
                prop_assert!(x < fb_w);
                prop_assert!(x + sw >= -1);
                prop_assert!(sw >= 0 && sh >= 0);
            }
        }
    }
}
